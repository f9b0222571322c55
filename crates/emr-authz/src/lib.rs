//! # EMR Authorization Engine
//!
//! Combined RBAC and ABAC authorization for the EMR platform. RBAC answers
//! "does this user hold the permission key"; the ABAC rules layered on top
//! can override an RBAC allow based on requester attributes. Every
//! evaluation also produces a risk score for downstream audit and alerting.
//!
//! ## Architecture
//!
//! - [`context`] - Requester attributes (branch, department, seniority)
//! - [`decision`] - Decision and deny-reason types plus the request DTO
//! - [`rules`] - Ordered ABAC override rules behind the [`PolicyRule`] trait
//! - [`engine`] - The [`AuthorizationEngine`] orchestrating the evaluation
//! - [`audit`] - Audit entries and the [`AuditSink`] trait
//!
//! ## Example
//!
//! ```
//! use emr_authz::{AuthorizationEngine, Branch, Department, Seniority, UserContext};
//! use emr_rbac::Role;
//!
//! let engine = AuthorizationEngine::standard();
//! let receptionist = UserContext::new(
//!     "U0006",
//!     Role::Receptionist,
//!     Branch::Hanoi,
//!     Department::Reception,
//!     Seniority::Mid,
//! );
//!
//! let decision = engine.decide_with_role_defaults(&receptionist, "Appointment", "create");
//! assert!(decision.allowed);
//!
//! let decision = engine.decide_with_role_defaults(&receptionist, "MedicalRecord", "read");
//! assert!(!decision.allowed);
//! ```

pub mod audit;
pub mod context;
pub mod decision;
pub mod engine;
pub mod rules;

pub use audit::{AuditEntry, AuditSink, MemoryAuditSink};
pub use context::{Branch, Department, Seniority, UserContext};
pub use decision::{AccessRequest, Decision, DenyReason};
pub use engine::AuthorizationEngine;
pub use rules::{PolicyRule, PolicyRuleSet, RuleOutcome};
