//! # Audit records
//!
//! The audit *event* an authorization decision produces. The engine itself
//! never writes audit entries (it is a pure function); the caller builds an
//! [`AuditEntry`] from the decision and hands it to an [`AuditSink`].
//! Storage format and retention are out of scope here. [`MemoryAuditSink`]
//! exists for single-process services and tests.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use crate::context::UserContext;
use crate::decision::{Decision, DenyReason};

/// One access-log entry, carrying everything downstream monitoring needs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AuditEntry {
    /// Unique entry ID.
    pub id: Uuid,

    /// Requesting user.
    pub user_id: String,

    /// Requested resource type.
    pub resource: String,

    /// Requested action.
    pub action: String,

    /// Verdict.
    pub allowed: bool,

    /// Risk score of the request.
    pub risk_score: u32,

    /// Deny reason, when denied.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deny_reason: Option<DenyReason>,

    /// When the decision was made.
    pub timestamp: DateTime<Utc>,
}

impl AuditEntry {
    /// Build an entry from a decision.
    ///
    /// Stamps the current time; decisions carry no timestamp of their own,
    /// the caller owns the clock.
    ///
    /// # Arguments
    ///
    /// * `user` - The requester
    /// * `resource` - Requested resource type
    /// * `action` - Requested action
    /// * `decision` - The engine's verdict
    pub fn record(user: &UserContext, resource: &str, action: &str, decision: &Decision) -> Self {
        Self {
            id: Uuid::now_v7(),
            user_id: user.user_id.clone(),
            resource: resource.to_string(),
            action: action.to_string(),
            allowed: decision.allowed,
            risk_score: decision.risk_score,
            deny_reason: decision.deny_reason,
            timestamp: Utc::now(),
        }
    }
}

/// Sink for audit entries.
///
/// Implementations persist or forward entries; they must not assume the
/// caller holds any lock while recording.
#[async_trait]
pub trait AuditSink: Send + Sync {
    /// Record one entry.
    async fn record(&self, entry: AuditEntry);
}

/// In-memory audit sink.
///
/// Suitable for single-process services and testing; production services
/// forward entries to the platform's audit store instead.
#[derive(Debug, Clone, Default)]
pub struct MemoryAuditSink {
    entries: Arc<RwLock<Vec<AuditEntry>>>,
}

impl MemoryAuditSink {
    /// Create an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// All recorded entries, in recording order.
    pub async fn entries(&self) -> Vec<AuditEntry> {
        self.entries.read().await.clone()
    }

    /// Entries for denied requests.
    pub async fn denied(&self) -> Vec<AuditEntry> {
        self.entries
            .read()
            .await
            .iter()
            .filter(|e| !e.allowed)
            .cloned()
            .collect()
    }

    /// Entries at or above a risk threshold.
    pub async fn high_risk(&self, threshold: u32) -> Vec<AuditEntry> {
        self.entries
            .read()
            .await
            .iter()
            .filter(|e| e.risk_score >= threshold)
            .cloned()
            .collect()
    }
}

#[async_trait]
impl AuditSink for MemoryAuditSink {
    async fn record(&self, entry: AuditEntry) {
        debug!(
            entry_id = %entry.id,
            user_id = %entry.user_id,
            allowed = entry.allowed,
            risk_score = entry.risk_score,
            "audit entry recorded"
        );
        self.entries.write().await.push(entry);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{Branch, Department, Seniority};
    use emr_rbac::Role;

    fn nurse() -> UserContext {
        UserContext::new(
            "U0003",
            Role::Nurse,
            Branch::Hanoi,
            Department::InternalMedicine,
            Seniority::Junior,
        )
    }

    #[test]
    fn test_entry_carries_decision_fields() {
        let decision = Decision::deny(DenyReason::RbacDeny, 3);
        let entry = AuditEntry::record(&nurse(), "MedicalRecord", "update", &decision);

        assert_eq!(entry.user_id, "U0003");
        assert_eq!(entry.resource, "MedicalRecord");
        assert_eq!(entry.action, "update");
        assert!(!entry.allowed);
        assert_eq!(entry.risk_score, 3);
        assert_eq!(entry.deny_reason, Some(DenyReason::RbacDeny));
    }

    #[tokio::test]
    async fn test_memory_sink_queries() {
        let sink = MemoryAuditSink::new();

        sink.record(AuditEntry::record(
            &nurse(),
            "VitalSigns",
            "read",
            &Decision::allow(0),
        ))
        .await;
        sink.record(AuditEntry::record(
            &nurse(),
            "MedicalRecord",
            "delete",
            &Decision::deny(DenyReason::NoDeletePatientData, 10),
        ))
        .await;

        assert_eq!(sink.entries().await.len(), 2);
        assert_eq!(sink.denied().await.len(), 1);
        assert_eq!(sink.high_risk(8).await.len(), 1);
        assert_eq!(sink.high_risk(11).await.len(), 0);
    }
}
