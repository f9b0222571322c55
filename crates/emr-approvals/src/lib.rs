//! # EMR Permission Approvals
//!
//! The permission-change approval workflow for the EMR platform. Proposed
//! grants and revocations enter a pending queue, a reviewer approves or
//! rejects each one, and approvals fold the change into the target user's
//! effective permission set atomically with the status flip.
//!
//! ## Architecture
//!
//! - [`request`] - Request lifecycle types, the submission DTO and stats
//! - [`workflow`] - The [`ApprovalWorkflow`] store and state machine
//! - [`error`] - The [`WorkflowError`] taxonomy
//!
//! Requests move `PENDING -> APPROVED` or `PENDING -> REJECTED`, exactly
//! once. Terminal requests are never deleted; they are the audit history
//! behind [`ApprovalWorkflow::stats`].

pub mod error;
pub mod request;
pub mod workflow;

pub use error::{WorkflowError, WorkflowResult};
pub use request::{
    ChangeType, PermissionRequest, PermissionStats, PermissionSubmission, RequestStatus,
    RequestType,
};
pub use workflow::ApprovalWorkflow;
