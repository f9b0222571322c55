//! # Workflow error types

use thiserror::Error;

use crate::request::RequestStatus;

/// Errors that can occur in the approval workflow.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WorkflowError {
    /// A submission failed validation; nothing was persisted.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A transition was attempted on a request that is not pending.
    #[error("Invalid state transition: request {id} is {status}")]
    InvalidStateTransition {
        /// The request the transition targeted.
        id: u64,
        /// Its current (terminal) status.
        status: RequestStatus,
    },

    /// No request with the given ID exists.
    #[error("Request not found: {0}")]
    RequestNotFound(u64),

    /// The user has never been registered with the store.
    #[error("User not found: {0}")]
    UserNotFound(String),
}

/// Result type for workflow operations.
pub type WorkflowResult<T> = Result<T, WorkflowError>;
