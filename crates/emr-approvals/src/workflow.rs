//! # Approval workflow
//!
//! The pending-permission queue and the per-user effective grant sets it
//! feeds. One store-wide write lock serializes every status transition with
//! its grant mutation, so a request can never read as `APPROVED` while the
//! grant it carries is missing from the target's effective set. Contention
//! is administrative-scale; nothing is awaited while the lock is held.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use emr_rbac::{Action, Permission, PermissionSet};

use crate::error::{WorkflowError, WorkflowResult};
use crate::request::{
    ChangeType, PermissionRequest, PermissionStats, PermissionSubmission, RequestStatus,
};

/// Shared mutable state behind the workflow lock.
#[derive(Debug, Default)]
struct WorkflowState {
    /// Next request ID to assign.
    next_id: u64,

    /// Full request history, terminal entries included. Keyed by ID, so
    /// iteration is in ascending submission order.
    requests: BTreeMap<u64, PermissionRequest>,

    /// Effective permission set per registered user.
    grants: HashMap<String, PermissionSet>,
}

/// The permission approval workflow.
///
/// Requests enter `PENDING` via [`submit`](ApprovalWorkflow::submit) and
/// move exactly once, to `APPROVED` or `REJECTED`. Approval folds the
/// proposed change into the target user's effective permission set in the
/// same critical section as the status flip. Terminal requests are retained
/// as history.
///
/// Cloning is cheap and shares the underlying store.
///
/// # Example
///
/// ```rust,no_run
/// use emr_approvals::{ApprovalWorkflow, ChangeType, PermissionSubmission, RequestType};
/// use emr_rbac::PermissionSet;
///
/// async fn example() -> Result<(), Box<dyn std::error::Error>> {
///     let workflow = ApprovalWorkflow::new();
///     workflow.register_user("U0042", PermissionSet::new()).await;
///
///     let request = workflow
///         .submit(PermissionSubmission {
///             target_user_id: "U0042".to_string(),
///             resource_type: "LabOrder".to_string(),
///             action: "create".to_string(),
///             change_type: ChangeType::Add,
///             request_type: RequestType::NewUser,
///             confidence: 0.92,
///         })
///         .await?;
///
///     workflow.approve(request.id, None).await?;
///     let grants = workflow.effective_permissions("U0042").await?;
///     assert!(grants.contains_key("LabOrder_create"));
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct ApprovalWorkflow {
    state: Arc<RwLock<WorkflowState>>,
}

impl ApprovalWorkflow {
    /// Create an empty workflow store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a user with an initial effective permission set.
    ///
    /// The onboarding path seeds this with the role's catalog defaults.
    /// Re-registering an existing user replaces their set.
    pub async fn register_user(&self, user_id: impl Into<String>, defaults: PermissionSet) {
        let user_id = user_id.into();
        let mut state = self.state.write().await;
        info!(user_id = %user_id, grants = defaults.len(), "user registered");
        state.grants.insert(user_id, defaults);
    }

    /// Submit a proposed permission change for review.
    ///
    /// Validation runs before any state is touched; a rejected submission
    /// persists nothing and consumes no ID.
    ///
    /// # Errors
    ///
    /// [`WorkflowError::InvalidInput`] when the confidence is outside
    /// `[0.0, 1.0]` (NaN included), the resource type is empty, or the
    /// action is not in the fixed vocabulary.
    pub async fn submit(
        &self,
        submission: PermissionSubmission,
    ) -> WorkflowResult<PermissionRequest> {
        if !(0.0..=1.0).contains(&submission.confidence) {
            return Err(WorkflowError::InvalidInput(format!(
                "confidence must be within [0.0, 1.0], got {}",
                submission.confidence
            )));
        }
        let resource = submission.resource_type.trim();
        if resource.is_empty() {
            return Err(WorkflowError::InvalidInput(
                "resource type must not be empty".to_string(),
            ));
        }
        let action = Action::parse(&submission.action).ok_or_else(|| {
            WorkflowError::InvalidInput(format!("unknown action: {:?}", submission.action))
        })?;

        let permission = Permission::new(resource, action);

        let mut state = self.state.write().await;
        let id = state.next_id;
        state.next_id += 1;

        let request = PermissionRequest {
            id,
            target_user_id: submission.target_user_id,
            permission: permission.key(),
            change_type: submission.change_type,
            request_type: submission.request_type,
            confidence: submission.confidence,
            status: RequestStatus::Pending,
            requested_at: Utc::now(),
            resolved_at: None,
            note: None,
        };

        info!(
            request_id = id,
            target_user_id = %request.target_user_id,
            permission = %request.permission,
            change_type = %request.change_type,
            "permission request submitted"
        );
        state.requests.insert(id, request.clone());
        Ok(request)
    }

    /// Approve a pending request and apply its change.
    ///
    /// The status flip and the grant mutation happen under one write lock.
    /// Approving an `ADD` inserts the permission into the target's
    /// effective set (creating the set for an unregistered user); a
    /// `REMOVE` deletes it, and removing an absent grant is a no-op.
    ///
    /// # Errors
    ///
    /// [`WorkflowError::RequestNotFound`] for an unknown ID and
    /// [`WorkflowError::InvalidStateTransition`] when the request is
    /// already terminal.
    pub async fn approve(
        &self,
        id: u64,
        note: Option<String>,
    ) -> WorkflowResult<PermissionRequest> {
        let mut state = self.state.write().await;
        Self::approve_locked(&mut state, id, note)
    }

    /// Reject a pending request.
    ///
    /// The target user's effective set is untouched.
    ///
    /// # Errors
    ///
    /// [`WorkflowError::RequestNotFound`] for an unknown ID and
    /// [`WorkflowError::InvalidStateTransition`] when the request is
    /// already terminal.
    pub async fn reject(&self, id: u64, note: Option<String>) -> WorkflowResult<PermissionRequest> {
        let mut state = self.state.write().await;

        let request = state
            .requests
            .get_mut(&id)
            .ok_or(WorkflowError::RequestNotFound(id))?;
        if request.status.is_terminal() {
            return Err(WorkflowError::InvalidStateTransition {
                id,
                status: request.status,
            });
        }

        request.status = RequestStatus::Rejected;
        request.resolved_at = Some(Utc::now());
        request.note = note;

        info!(
            request_id = id,
            target_user_id = %request.target_user_id,
            permission = %request.permission,
            "permission request rejected"
        );
        Ok(request.clone())
    }

    /// Approve every pending request targeting one user, in ascending ID
    /// order.
    ///
    /// Non-pending entries are skipped; the sweep never aborts part-way.
    ///
    /// # Returns
    ///
    /// The IDs of the requests approved by this call, in the order they
    /// were applied.
    pub async fn approve_all_for_user(&self, user_id: &str) -> WorkflowResult<Vec<u64>> {
        let mut state = self.state.write().await;

        let pending_ids: Vec<u64> = state
            .requests
            .values()
            .filter(|r| r.target_user_id == user_id && r.status == RequestStatus::Pending)
            .map(|r| r.id)
            .collect();

        for &id in &pending_ids {
            // Cannot fail: every ID was pending a moment ago and the lock
            // has been held throughout.
            Self::approve_locked(&mut state, id, None)?;
        }

        info!(
            user_id,
            approved = pending_ids.len(),
            "batch approval completed"
        );
        Ok(pending_ids)
    }

    /// Aggregate counts over the full request history.
    pub async fn stats(&self) -> PermissionStats {
        let state = self.state.read().await;
        let mut stats = PermissionStats::default();
        for request in state.requests.values() {
            match request.status {
                RequestStatus::Pending => stats.pending += 1,
                RequestStatus::Approved => stats.approved += 1,
                RequestStatus::Rejected => stats.rejected += 1,
            }
            stats.total += 1;
        }
        stats
    }

    /// Get a user's current effective permission set.
    ///
    /// # Errors
    ///
    /// [`WorkflowError::UserNotFound`] when the user has never been
    /// registered and no approval has created a set for them.
    pub async fn effective_permissions(&self, user_id: &str) -> WorkflowResult<PermissionSet> {
        let state = self.state.read().await;
        state
            .grants
            .get(user_id)
            .cloned()
            .ok_or_else(|| WorkflowError::UserNotFound(user_id.to_string()))
    }

    /// All requests targeting one user, ascending by ID.
    pub async fn requests_for_user(&self, user_id: &str) -> Vec<PermissionRequest> {
        let state = self.state.read().await;
        state
            .requests
            .values()
            .filter(|r| r.target_user_id == user_id)
            .cloned()
            .collect()
    }

    /// All pending requests, ascending by ID.
    pub async fn pending(&self) -> Vec<PermissionRequest> {
        let state = self.state.read().await;
        state
            .requests
            .values()
            .filter(|r| r.status == RequestStatus::Pending)
            .cloned()
            .collect()
    }

    /// Approve one request with the state lock already held.
    fn approve_locked(
        state: &mut WorkflowState,
        id: u64,
        note: Option<String>,
    ) -> WorkflowResult<PermissionRequest> {
        let request = state
            .requests
            .get_mut(&id)
            .ok_or(WorkflowError::RequestNotFound(id))?;
        if request.status.is_terminal() {
            return Err(WorkflowError::InvalidStateTransition {
                id,
                status: request.status,
            });
        }

        request.status = RequestStatus::Approved;
        request.resolved_at = Some(Utc::now());
        request.note = note;
        let request = request.clone();

        let grants = state
            .grants
            .entry(request.target_user_id.clone())
            .or_default();
        match request.change_type {
            ChangeType::Add => {
                grants.insert_key(&request.permission);
            }
            ChangeType::Remove => {
                if !grants.remove_key(&request.permission) {
                    warn!(
                        request_id = id,
                        permission = %request.permission,
                        "approved removal of a grant the user did not hold"
                    );
                }
            }
        }

        debug!(
            request_id = id,
            target_user_id = %request.target_user_id,
            permission = %request.permission,
            change_type = %request.change_type,
            "permission request approved"
        );
        Ok(request)
    }
}
