//! # EMR RBAC (Role-Based Access Control)
//!
//! This crate provides the RBAC foundation for the Meridian EMR platform,
//! shared by the authorization engine and the permission approval workflow.
//!
//! ## Overview
//!
//! The emr-rbac crate handles:
//! - **Actions**: The fixed operation vocabulary (create, read, update,
//!   delete, approve, export)
//! - **Permissions**: Resource + Action combinations with the canonical
//!   `{resource}_{action}` text form
//! - **Permission Sets**: Collections of permissions, with both wire shapes
//! - **Roles**: The eight staff roles and their default permission sets
//!
//! ## Architecture
//!
//! ```text
//! Permission = Resource + Action
//!
//! Examples:
//!   "MedicalRecord_read"     - Read medical records
//!   "Prescription_approve"   - Approve prescriptions
//! ```
//!
//! Permission sets cross the wire in two shapes, normalized at the
//! ingestion boundary into a single in-memory type:
//!
//! ```text
//! flat:    ["MedicalRecord_create", "MedicalRecord_read"]
//! grouped: {"MedicalRecord": "create,read"}
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use emr_rbac::{Action, Permission, PermissionSet, Role, RoleCatalog};
//!
//! // Expand the role matrix once at startup
//! let catalog = RoleCatalog::standard();
//!
//! // Doctors can approve prescriptions by default
//! let doctor = catalog.default_permissions(Role::Doctor);
//! assert!(doctor.contains_key("Prescription_approve"));
//!
//! // Build a set by hand
//! let mut set = PermissionSet::new();
//! set.insert(Permission::new("Invoice", Action::Read));
//! assert!(set.contains_key("Invoice_read"));
//! ```
//!
//! ## CRUD shorthand
//!
//! Role defaults are written in a compact shorthand (`"CRUA"`), expanded
//! by [`roles::expand_shorthand`]: `C` → create, `R` → read, `U` → update,
//! `A` → approve. There is no letter for delete; delete grants are
//! always explicit.

pub mod actions;
pub mod permissions;
pub mod roles;

// Re-export main types for convenience
pub use actions::Action;
pub use permissions::{Permission, PermissionError, PermissionSet, PermissionsWire};
pub use roles::{Role, RoleCatalog};
