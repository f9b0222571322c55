//! # Permission request lifecycle types
//!
//! A [`PermissionRequest`] is the unit of work in the approval queue: one
//! proposed addition or removal of one permission for one user. Requests are
//! created `PENDING` and move exactly once, to `APPROVED` or `REJECTED`.
//! Terminal requests are retained as history and never transition again.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Direction of a proposed permission change.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ChangeType {
    /// Grant the permission.
    Add,

    /// Revoke the permission.
    Remove,
}

impl ChangeType {
    /// Get the wire identifier of the change type.
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeType::Add => "ADD",
            ChangeType::Remove => "REMOVE",
        }
    }
}

impl std::fmt::Display for ChangeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why the change was proposed.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RequestType {
    /// Provisioning for a newly onboarded user.
    NewUser,

    /// Adjustment following a role or department change.
    JobTransfer,
}

impl RequestType {
    /// Get the wire identifier of the request type.
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestType::NewUser => "NEW_USER",
            RequestType::JobTransfer => "JOB_TRANSFER",
        }
    }
}

impl std::fmt::Display for RequestType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle status of a permission request.
///
/// `Pending` is the only non-terminal status; `Approved` and `Rejected`
/// are final.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RequestStatus {
    /// Awaiting review.
    Pending,

    /// Approved; the change has been applied to the user's effective set.
    Approved,

    /// Rejected; the user's effective set is untouched.
    Rejected,
}

impl RequestStatus {
    /// Get the wire identifier of the status.
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestStatus::Pending => "PENDING",
            RequestStatus::Approved => "APPROVED",
            RequestStatus::Rejected => "REJECTED",
        }
    }

    /// Check whether the status is final.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, RequestStatus::Pending)
    }
}

impl std::fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One proposed permission change awaiting (or past) review.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PermissionRequest {
    /// Store-assigned identifier, strictly increasing across submissions.
    pub id: u64,

    /// The user whose permissions would change.
    pub target_user_id: String,

    /// Canonical permission key (`{resource}_{action}`).
    pub permission: String,

    /// Grant or revoke.
    pub change_type: ChangeType,

    /// Why the change was proposed.
    pub request_type: RequestType,

    /// Suggestion confidence in `[0.0, 1.0]` from the proposing system.
    pub confidence: f64,

    /// Current lifecycle status.
    pub status: RequestStatus,

    /// When the request was submitted.
    pub requested_at: DateTime<Utc>,

    /// When the request reached a terminal status.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolved_at: Option<DateTime<Utc>>,

    /// Reviewer note recorded at resolution.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// Inbound submission DTO for a proposed permission change.
///
/// # Examples
///
/// ```
/// use emr_approvals::PermissionSubmission;
///
/// let sub: PermissionSubmission = serde_json::from_str(
///     r#"{
///         "targetUserId": "U0042",
///         "resourceType": "LabOrder",
///         "action": "create",
///         "changeType": "ADD",
///         "requestType": "NEW_USER",
///         "confidence": 0.92
///     }"#,
/// )
/// .unwrap();
/// assert_eq!(sub.action, "create");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PermissionSubmission {
    /// The user whose permissions would change.
    pub target_user_id: String,

    /// Resource type of the proposed permission.
    pub resource_type: String,

    /// Action of the proposed permission.
    pub action: String,

    /// Grant or revoke.
    pub change_type: ChangeType,

    /// Why the change is proposed.
    pub request_type: RequestType,

    /// Suggestion confidence in `[0.0, 1.0]`.
    pub confidence: f64,
}

/// Aggregate counts over the full request history.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PermissionStats {
    /// Requests awaiting review.
    pub pending: usize,

    /// Requests approved.
    pub approved: usize,

    /// Requests rejected.
    pub rejected: usize,

    /// All requests ever submitted.
    pub total: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_wire_names_and_terminality() {
        assert_eq!(RequestStatus::Pending.as_str(), "PENDING");
        assert_eq!(RequestStatus::Approved.as_str(), "APPROVED");
        assert_eq!(RequestStatus::Rejected.as_str(), "REJECTED");

        assert!(!RequestStatus::Pending.is_terminal());
        assert!(RequestStatus::Approved.is_terminal());
        assert!(RequestStatus::Rejected.is_terminal());
    }

    #[test]
    fn test_enum_serde_identifiers() {
        assert_eq!(serde_json::to_string(&ChangeType::Add).unwrap(), "\"ADD\"");
        assert_eq!(
            serde_json::to_string(&RequestType::JobTransfer).unwrap(),
            "\"JOB_TRANSFER\""
        );
        assert_eq!(
            serde_json::to_string(&RequestStatus::Pending).unwrap(),
            "\"PENDING\""
        );
    }

    #[test]
    fn test_request_wire_shape() {
        let request = PermissionRequest {
            id: 7,
            target_user_id: "U0042".to_string(),
            permission: "LabOrder_create".to_string(),
            change_type: ChangeType::Add,
            request_type: RequestType::NewUser,
            confidence: 0.92,
            status: RequestStatus::Pending,
            requested_at: Utc::now(),
            resolved_at: None,
            note: None,
        };

        let json = serde_json::to_string(&request).unwrap();
        assert!(json.contains("\"targetUserId\":\"U0042\""));
        assert!(json.contains("\"status\":\"PENDING\""));
        assert!(!json.contains("resolvedAt"));
        assert!(!json.contains("note"));
    }
}
