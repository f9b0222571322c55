//! # Roles and the role catalog
//!
//! The eight staff roles of the EMR platform and their default permission
//! sets. The catalog is written as a compact CRUD-shorthand matrix
//! (`C,R,U,A` → create, read, update, approve) and expanded exactly once
//! at construction; after that it is read-only and safe to share across
//! threads without synchronization.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::actions::Action;
use crate::permissions::{Permission, PermissionSet};

/// Staff role within the hospital.
///
/// Wire names match the upstream identity service (`"Doctor"`, `"HR"`,
/// `"ITAdmin"`, ...). Each role has exactly one default permission set,
/// defined by [`RoleCatalog::standard`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Role {
    /// Attending physician.
    Doctor,

    /// Ward nurse.
    Nurse,

    /// Front-desk receptionist.
    Receptionist,

    /// Billing cashier.
    Cashier,

    /// Human resources staff.
    #[serde(rename = "HR")]
    Hr,

    /// Branch or department manager.
    Manager,

    /// IT administrator.
    #[serde(rename = "ITAdmin")]
    ItAdmin,

    /// Security administrator.
    SecurityAdmin,
}

impl Role {
    /// Get the wire-name of the role.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Doctor => "Doctor",
            Role::Nurse => "Nurse",
            Role::Receptionist => "Receptionist",
            Role::Cashier => "Cashier",
            Role::Hr => "HR",
            Role::Manager => "Manager",
            Role::ItAdmin => "ITAdmin",
            Role::SecurityAdmin => "SecurityAdmin",
        }
    }

    /// Parse a role from its string representation.
    ///
    /// # Arguments
    ///
    /// * `s` - String to parse (case-insensitive)
    ///
    /// # Returns
    ///
    /// `Some(Role)` if valid, `None` otherwise
    ///
    /// # Examples
    ///
    /// ```
    /// use emr_rbac::Role;
    ///
    /// assert_eq!(Role::parse("Doctor"), Some(Role::Doctor));
    /// assert_eq!(Role::parse("itadmin"), Some(Role::ItAdmin));
    /// assert_eq!(Role::parse("intruder"), None);
    /// ```
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "doctor" => Some(Role::Doctor),
            "nurse" => Some(Role::Nurse),
            "receptionist" => Some(Role::Receptionist),
            "cashier" => Some(Role::Cashier),
            "hr" => Some(Role::Hr),
            "manager" => Some(Role::Manager),
            "itadmin" => Some(Role::ItAdmin),
            "securityadmin" => Some(Role::SecurityAdmin),
            _ => None,
        }
    }

    /// Get all roles.
    pub fn all() -> [Self; 8] {
        [
            Role::Doctor,
            Role::Nurse,
            Role::Receptionist,
            Role::Cashier,
            Role::Hr,
            Role::Manager,
            Role::ItAdmin,
            Role::SecurityAdmin,
        ]
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Expand a CRUD-shorthand entry into a permission set.
///
/// Letters map as `C` → create, `R` → read, `U` → update, `A` → approve;
/// any other letter is ignored. Note that `delete` grants can never come
/// out of shorthand expansion; where a role needs them they are added
/// explicitly.
///
/// # Arguments
///
/// * `resource` - The resource type the letters apply to
/// * `letters` - The shorthand string (e.g. `"CRU"`)
///
/// # Example
///
/// ```
/// use emr_rbac::roles::expand_shorthand;
///
/// let set = expand_shorthand("Prescription", "CRUA");
/// assert!(set.contains_key("Prescription_approve"));
/// assert!(!set.contains_key("Prescription_delete"));
/// ```
pub fn expand_shorthand(resource: &str, letters: &str) -> PermissionSet {
    letters
        .chars()
        .filter_map(Action::from_shorthand)
        .map(|action| Permission::new(resource, action))
        .collect()
}

/// The role-to-default-permissions catalog.
///
/// Built once at process initialization and immutable afterwards; the
/// authorization engine takes it by value at construction time rather than
/// reading process-wide state, so tests can substitute alternative
/// catalogs.
///
/// # Examples
///
/// ```
/// use emr_rbac::{Role, RoleCatalog};
///
/// let catalog = RoleCatalog::standard();
/// let doctor = catalog.default_permissions(Role::Doctor);
/// assert!(doctor.contains_key("Prescription_approve"));
/// ```
#[derive(Debug, Clone)]
pub struct RoleCatalog {
    /// Default permission set per role.
    defaults: HashMap<Role, PermissionSet>,
}

impl RoleCatalog {
    /// Build the standard hospital catalog from the permission matrix.
    pub fn standard() -> Self {
        let mut catalog = Self {
            defaults: HashMap::new(),
        };

        catalog.set_role(
            Role::Doctor,
            &[
                ("PatientProfile", "R"),
                ("MedicalRecord", "CRU"),
                ("ClinicalNote", "CR"),
                ("VitalSigns", "R"),
                ("Prescription", "CRUA"),
                ("LabOrder", "CR"),
                ("LabResult", "R"),
                ("MedicalReport", "R"),
                ("ImagingOrder", "CR"),
                ("ImagingResult", "R"),
            ],
        );
        catalog.set_role(
            Role::Nurse,
            &[
                ("PatientProfile", "R"),
                ("MedicalRecord", "R"),
                ("ClinicalNote", "R"),
                ("VitalSigns", "CRU"),
                ("LabResult", "R"),
                ("ImagingResult", "R"),
            ],
        );
        catalog.set_role(
            Role::Receptionist,
            &[
                ("PatientProfile", "CRU"),
                ("Appointment", "CRU"),
                ("Admission", "CR"),
            ],
        );
        catalog.set_role(
            Role::Cashier,
            &[
                ("BillingRecord", "CRU"),
                ("Invoice", "CRU"),
                ("FinancialReport", "R"),
                ("InsuranceClaim", "CR"),
            ],
        );
        catalog.set_role(
            Role::Hr,
            &[
                ("StaffProfile", "CRU"),
                ("WorkSchedule", "CRU"),
                ("OperationReport", "R"),
            ],
        );
        catalog.set_role(
            Role::Manager,
            &[
                ("StaffProfile", "R"),
                ("WorkSchedule", "R"),
                ("MedicalReport", "R"),
                ("FinancialReport", "R"),
                ("OperationReport", "R"),
            ],
        );
        catalog.set_role(
            Role::ItAdmin,
            &[
                ("SystemConfig", "RU"),
                ("AccessPolicy", "R"),
                ("AuditLog", "R"),
            ],
        );
        catalog.set_role(
            Role::SecurityAdmin,
            &[
                ("SystemConfig", "R"),
                ("AccessPolicy", "RU"),
                ("AuditLog", "R"),
                ("IncidentCase", "CRU"),
            ],
        );

        catalog
    }

    /// Build an empty catalog (every role maps to no permissions).
    ///
    /// Mostly useful as a starting point for test catalogs via
    /// [`RoleCatalog::with_role`].
    pub fn empty() -> Self {
        Self {
            defaults: HashMap::new(),
        }
    }

    /// Replace a role's default permission set (builder form).
    ///
    /// # Arguments
    ///
    /// * `role` - The role to configure
    /// * `permissions` - Its default permission set
    pub fn with_role(mut self, role: Role, permissions: PermissionSet) -> Self {
        self.defaults.insert(role, permissions);
        self
    }

    /// Get the default permission set for a role.
    ///
    /// A pure function of the catalog contents; roles absent from the
    /// catalog map to the empty set.
    pub fn default_permissions(&self, role: Role) -> PermissionSet {
        self.defaults.get(&role).cloned().unwrap_or_default()
    }

    fn set_role(&mut self, role: Role, matrix: &[(&str, &str)]) {
        let mut set = PermissionSet::new();
        for (resource, letters) in matrix {
            set.union(&expand_shorthand(resource, letters));
        }
        self.defaults.insert(role, set);
    }
}
