//! # Authorization engine
//!
//! Composes the role catalog, a user's effective permission set and the
//! ABAC rule set into a single [`Decision`]. Evaluation is a pure function
//! of its inputs: no shared mutable state, safe to call from arbitrarily
//! many concurrent callers without locking.

use tracing::{debug, info};

use crate::context::UserContext;
use crate::decision::{Decision, DenyReason};
use crate::rules::PolicyRuleSet;
use emr_rbac::{PermissionSet, Role, RoleCatalog};

/// Resources whose access is inherently sensitive.
const HIGH_RISK_RESOURCES: [&str; 3] = ["MedicalRecord", "AuditLog", "SystemConfig"];

/// Authorization decision engine (RBAC + ABAC).
///
/// The catalog and rule set are injected at construction time rather than
/// read from process-wide state, so tests can substitute both.
///
/// # Evaluation order
///
/// 1. RBAC: the canonical `{resource}_{action}` key must be present in the
///    effective permission set.
/// 2. ABAC rules, in priority order; a matching rule forces a deny and its
///    reason wins over the generic `RBAC_DENY`.
/// 3. Risk scoring, always computed, never itself a deny cause.
///
/// # Examples
///
/// ```
/// use emr_authz::{AuthorizationEngine, Branch, Department, Seniority, UserContext};
/// use emr_rbac::{PermissionSet, Role};
///
/// let engine = AuthorizationEngine::standard();
/// let doctor = UserContext::new(
///     "U0001",
///     Role::Doctor,
///     Branch::Hanoi,
///     Department::InternalMedicine,
///     Seniority::Senior,
/// );
/// let grants = PermissionSet::from_flat(["Prescription_approve"]).unwrap();
///
/// let decision = engine.decide(&doctor, &grants, "Prescription", "approve");
/// assert!(decision.allowed);
/// assert_eq!(decision.risk_score, 1);
/// ```
#[derive(Debug)]
pub struct AuthorizationEngine {
    /// Role-to-default-permissions catalog.
    catalog: RoleCatalog,

    /// Ordered ABAC override rules.
    rules: PolicyRuleSet,
}

impl AuthorizationEngine {
    /// Create an engine with an explicit catalog and rule set.
    pub fn new(catalog: RoleCatalog, rules: PolicyRuleSet) -> Self {
        Self { catalog, rules }
    }

    /// Create an engine with the standard hospital catalog and rules.
    pub fn standard() -> Self {
        Self::new(RoleCatalog::standard(), PolicyRuleSet::standard())
    }

    /// Evaluate one access request.
    ///
    /// Never fails: unknown resource or action strings are ordinary keys
    /// that are simply absent from the permission set, which alone yields
    /// `RBAC_DENY`.
    ///
    /// # Arguments
    ///
    /// * `user` - Requester attributes
    /// * `effective` - The requester's effective permission set
    /// * `resource` - Requested resource type
    /// * `action` - Requested action
    pub fn decide(
        &self,
        user: &UserContext,
        effective: &PermissionSet,
        resource: &str,
        action: &str,
    ) -> Decision {
        let key = format!("{}_{}", resource, action);
        let rbac_allowed = effective.contains_key(&key);

        // The rule sweep always runs, even after an RBAC deny, so risk
        // contributions from matching rules land in the audit record.
        let (rule_reason, rule_risk) = self.rules.evaluate(user, resource, action);

        let risk_score = Self::base_risk(resource, action) + rule_risk;

        let deny_reason = match rule_reason {
            Some(reason) => Some(reason),
            None if !rbac_allowed => Some(DenyReason::RbacDeny),
            None => None,
        };

        debug!(
            user_id = %user.user_id,
            role = %user.role,
            resource,
            action,
            rbac_allowed,
            risk_score,
            "authorization evaluated"
        );

        match deny_reason {
            Some(reason) => {
                info!(
                    user_id = %user.user_id,
                    resource,
                    action,
                    reason = %reason,
                    risk_score,
                    "access denied"
                );
                Decision::deny(reason, risk_score)
            }
            None => Decision::allow(risk_score),
        }
    }

    /// Evaluate a request against the requester's role defaults.
    ///
    /// Used on paths where no per-user effective set exists yet (a fresh
    /// login before any approved additions or removals).
    pub fn decide_with_role_defaults(
        &self,
        user: &UserContext,
        resource: &str,
        action: &str,
    ) -> Decision {
        let defaults = self.catalog.default_permissions(user.role);
        self.decide(user, &defaults, resource, action)
    }

    /// Get the default permission set for a role from the engine's catalog.
    pub fn default_permissions(&self, role: Role) -> PermissionSet {
        self.catalog.default_permissions(role)
    }

    /// Base risk of a request, before rule contributions.
    ///
    /// +3 for inherently sensitive resources, +2 for export/delete,
    /// +1 for approve.
    fn base_risk(resource: &str, action: &str) -> u32 {
        let mut risk = 0;
        if HIGH_RISK_RESOURCES.contains(&resource) {
            risk += 3;
        }
        match action {
            "export" | "delete" => risk += 2,
            "approve" => risk += 1,
            _ => {}
        }
        risk
    }
}

impl Default for AuthorizationEngine {
    fn default() -> Self {
        Self::standard()
    }
}
