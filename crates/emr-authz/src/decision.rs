//! # Authorization decisions
//!
//! The result type of one authorization evaluation, plus the inbound
//! request DTO the surrounding service hands to the engine. Decisions are
//! ephemeral: produced and consumed per call, never stored by the core.

use serde::{Deserialize, Serialize};

use crate::context::{Branch, Department, Seniority, UserContext};
use emr_rbac::Role;

/// Machine-readable reasons an access request can be denied.
///
/// The wire identifiers form a fixed taxonomy; `RBAC_DENY` is the generic
/// "permission absent" reason, the others are attribute rules that override
/// an RBAC allow.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DenyReason {
    /// The canonical permission key is absent from the effective set.
    RbacDeny,

    /// Receptionists may not touch clinical resources.
    ReceptionistNoClinicalAccess,

    /// HR staff may not touch patient or finance records.
    HrNoPatientOrFinanceAccess,

    /// Patient data is never deleted through this system.
    NoDeletePatientData,
}

impl DenyReason {
    /// Get the wire identifier of the reason.
    pub fn as_str(&self) -> &'static str {
        match self {
            DenyReason::RbacDeny => "RBAC_DENY",
            DenyReason::ReceptionistNoClinicalAccess => "RECEPTIONIST_NO_CLINICAL_ACCESS",
            DenyReason::HrNoPatientOrFinanceAccess => "HR_NO_PATIENT_OR_FINANCE_ACCESS",
            DenyReason::NoDeletePatientData => "NO_DELETE_PATIENT_DATA",
        }
    }

    /// Parse a deny reason from its wire identifier.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "RBAC_DENY" => Some(DenyReason::RbacDeny),
            "RECEPTIONIST_NO_CLINICAL_ACCESS" => Some(DenyReason::ReceptionistNoClinicalAccess),
            "HR_NO_PATIENT_OR_FINANCE_ACCESS" => Some(DenyReason::HrNoPatientOrFinanceAccess),
            "NO_DELETE_PATIENT_DATA" => Some(DenyReason::NoDeletePatientData),
            _ => None,
        }
    }
}

impl std::fmt::Display for DenyReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of one authorization evaluation.
///
/// The risk score is informational: it never causes a deny by itself, it is
/// surfaced for downstream audit and alerting.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Decision {
    /// Whether the request is allowed.
    pub allowed: bool,

    /// Sensitivity signal for the request, independent of the verdict.
    pub risk_score: u32,

    /// Why the request was denied, if it was.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deny_reason: Option<DenyReason>,
}

impl Decision {
    /// Build an allow decision.
    pub fn allow(risk_score: u32) -> Self {
        Self {
            allowed: true,
            risk_score,
            deny_reason: None,
        }
    }

    /// Build a deny decision.
    pub fn deny(reason: DenyReason, risk_score: u32) -> Self {
        Self {
            allowed: false,
            risk_score,
            deny_reason: Some(reason),
        }
    }
}

/// Inbound authorization check request.
///
/// Field names match the upstream EMR service's authorization endpoint.
/// The seniority attribute is optional on the wire; the identity service
/// does not always return it, in which case `Senior` is assumed (the same
/// fallback the EMR frontend applies).
///
/// # Examples
///
/// ```
/// use emr_authz::AccessRequest;
///
/// let req: AccessRequest = serde_json::from_str(
///     r#"{
///         "userId": "U0006",
///         "role": "Receptionist",
///         "branch": "CN_HN",
///         "department": "Phong_TiepDon",
///         "resourceType": "Appointment",
///         "action": "create"
///     }"#,
/// )
/// .unwrap();
/// assert_eq!(req.resource_type, "Appointment");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessRequest {
    /// User identifier.
    pub user_id: String,

    /// Staff role.
    pub role: Role,

    /// Hospital branch.
    pub branch: Branch,

    /// Department.
    pub department: Department,

    /// Seniority level, when the identity service provides it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seniority: Option<Seniority>,

    /// Requested resource type.
    pub resource_type: String,

    /// Requested action.
    pub action: String,
}

impl AccessRequest {
    /// Build the user context for this request.
    pub fn context(&self) -> UserContext {
        UserContext::new(
            self.user_id.clone(),
            self.role,
            self.branch,
            self.department,
            self.seniority.unwrap_or(Seniority::Senior),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deny_reason_identifiers() {
        assert_eq!(DenyReason::RbacDeny.as_str(), "RBAC_DENY");
        assert_eq!(
            DenyReason::ReceptionistNoClinicalAccess.as_str(),
            "RECEPTIONIST_NO_CLINICAL_ACCESS"
        );
        assert_eq!(
            DenyReason::parse("NO_DELETE_PATIENT_DATA"),
            Some(DenyReason::NoDeletePatientData)
        );
        assert_eq!(DenyReason::parse("WHATEVER"), None);
    }

    #[test]
    fn test_deny_reason_serde_matches_identifiers() {
        for reason in [
            DenyReason::RbacDeny,
            DenyReason::ReceptionistNoClinicalAccess,
            DenyReason::HrNoPatientOrFinanceAccess,
            DenyReason::NoDeletePatientData,
        ] {
            let json = serde_json::to_string(&reason).unwrap();
            assert_eq!(json, format!("\"{}\"", reason.as_str()));
        }
    }

    #[test]
    fn test_decision_wire_shape() {
        let decision = Decision::deny(DenyReason::RbacDeny, 3);
        let json = serde_json::to_string(&decision).unwrap();
        assert_eq!(
            json,
            r#"{"allowed":false,"riskScore":3,"denyReason":"RBAC_DENY"}"#
        );

        let allow = Decision::allow(0);
        let json = serde_json::to_string(&allow).unwrap();
        assert_eq!(json, r#"{"allowed":true,"riskScore":0}"#);
    }

    #[test]
    fn test_access_request_defaults_seniority() {
        let req: AccessRequest = serde_json::from_str(
            r#"{
                "userId": "U0001",
                "role": "Doctor",
                "branch": "CN_HN",
                "department": "Khoa_Noi",
                "resourceType": "MedicalRecord",
                "action": "read"
            }"#,
        )
        .unwrap();

        assert_eq!(req.context().seniority, Seniority::Senior);
    }
}
