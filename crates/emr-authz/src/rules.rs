//! # ABAC override rules
//!
//! Attribute-based rules layered on top of the RBAC grant check. Rules run
//! in a fixed priority order; each can force a deny regardless of the RBAC
//! result and contribute to the risk score. The engine keeps them as an
//! ordered list of trait objects so new rules can be added and tested
//! independently of the orchestration loop.

use crate::context::UserContext;
use crate::decision::DenyReason;
use emr_rbac::Role;

/// Clinical resources a receptionist must never touch.
const CLINICAL_RESOURCES: [&str; 4] = [
    "MedicalRecord",
    "ClinicalNote",
    "VitalSigns",
    "Prescription",
];

/// Patient and finance resources off-limits to HR staff.
const HR_RESTRICTED_RESOURCES: [&str; 3] = ["PatientProfile", "BillingRecord", "Invoice"];

/// Patient data that is never deleted through this system.
const PROTECTED_PATIENT_DATA: [&str; 2] = ["PatientProfile", "MedicalRecord"];

/// Outcome of evaluating one rule against one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleOutcome {
    /// Whether the rule forces a deny.
    pub deny: bool,

    /// Risk contribution of this rule (accumulated across all matching
    /// rules, even when another rule already denied).
    pub risk_delta: u32,
}

impl RuleOutcome {
    /// The rule does not apply to this request.
    pub fn pass() -> Self {
        Self {
            deny: false,
            risk_delta: 0,
        }
    }

    /// The rule matches and forces a deny.
    pub fn deny(risk_delta: u32) -> Self {
        Self {
            deny: true,
            risk_delta,
        }
    }
}

/// An attribute-based override rule.
///
/// Implementations must be pure: the same inputs always produce the same
/// outcome, with no shared mutable state.
pub trait PolicyRule: Send + Sync {
    /// The deny reason this rule reports when it matches.
    fn reason(&self) -> DenyReason;

    /// Evaluate the rule against the requester and the request.
    fn evaluate(&self, user: &UserContext, resource: &str, action: &str) -> RuleOutcome;
}

/// Receptionists have no clinical access, whatever their grants say.
pub struct ReceptionistClinicalBan;

impl PolicyRule for ReceptionistClinicalBan {
    fn reason(&self) -> DenyReason {
        DenyReason::ReceptionistNoClinicalAccess
    }

    fn evaluate(&self, user: &UserContext, resource: &str, _action: &str) -> RuleOutcome {
        if user.role == Role::Receptionist && CLINICAL_RESOURCES.contains(&resource) {
            RuleOutcome::deny(0)
        } else {
            RuleOutcome::pass()
        }
    }
}

/// HR staff are kept away from patient and finance records.
pub struct HrRestrictedRecordsBan;

impl PolicyRule for HrRestrictedRecordsBan {
    fn reason(&self) -> DenyReason {
        DenyReason::HrNoPatientOrFinanceAccess
    }

    fn evaluate(&self, user: &UserContext, resource: &str, _action: &str) -> RuleOutcome {
        if user.role == Role::Hr && HR_RESTRICTED_RESOURCES.contains(&resource) {
            RuleOutcome::deny(0)
        } else {
            RuleOutcome::pass()
        }
    }
}

/// Patient data is never deleted, by anyone.
///
/// A matching delete attempt also adds +5 to the risk score, even when the
/// request was already denied for another reason.
pub struct PatientDataDeleteBan;

impl PolicyRule for PatientDataDeleteBan {
    fn reason(&self) -> DenyReason {
        DenyReason::NoDeletePatientData
    }

    fn evaluate(&self, _user: &UserContext, resource: &str, action: &str) -> RuleOutcome {
        if action == "delete" && PROTECTED_PATIENT_DATA.contains(&resource) {
            RuleOutcome::deny(5)
        } else {
            RuleOutcome::pass()
        }
    }
}

/// An ordered list of ABAC rules.
///
/// Rules are evaluated front to back. The first matching rule supplies the
/// deny reason; risk deltas from *all* matching rules accumulate.
pub struct PolicyRuleSet {
    rules: Vec<Box<dyn PolicyRule>>,
}

impl std::fmt::Debug for PolicyRuleSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PolicyRuleSet")
            .field("rules", &self.rules.len())
            .finish()
    }
}

impl PolicyRuleSet {
    /// Create an empty rule set (RBAC-only evaluation).
    pub fn empty() -> Self {
        Self { rules: Vec::new() }
    }

    /// The standard hospital rule set, in priority order.
    pub fn standard() -> Self {
        Self {
            rules: vec![
                Box::new(ReceptionistClinicalBan),
                Box::new(HrRestrictedRecordsBan),
                Box::new(PatientDataDeleteBan),
            ],
        }
    }

    /// Append a rule at the lowest priority.
    pub fn push(&mut self, rule: Box<dyn PolicyRule>) {
        self.rules.push(rule);
    }

    /// Number of rules in the set.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Check if the set is empty.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Evaluate every rule against the request.
    ///
    /// # Returns
    ///
    /// The deny reason of the highest-priority matching rule (if any) and
    /// the accumulated risk delta across all matching rules.
    pub fn evaluate(
        &self,
        user: &UserContext,
        resource: &str,
        action: &str,
    ) -> (Option<DenyReason>, u32) {
        let mut reason = None;
        let mut risk_delta = 0;

        for rule in &self.rules {
            let outcome = rule.evaluate(user, resource, action);
            if outcome.deny {
                risk_delta += outcome.risk_delta;
                if reason.is_none() {
                    reason = Some(rule.reason());
                }
            }
        }

        (reason, risk_delta)
    }
}

impl Default for PolicyRuleSet {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{Branch, Department, Seniority};

    fn receptionist() -> UserContext {
        UserContext::new(
            "U0006",
            Role::Receptionist,
            Branch::Hanoi,
            Department::Reception,
            Seniority::Senior,
        )
    }

    fn hr() -> UserContext {
        UserContext::new(
            "U0010",
            Role::Hr,
            Branch::Hanoi,
            Department::HumanResources,
            Seniority::Senior,
        )
    }

    fn doctor() -> UserContext {
        UserContext::new(
            "U0001",
            Role::Doctor,
            Branch::Hanoi,
            Department::InternalMedicine,
            Seniority::Senior,
        )
    }

    #[test]
    fn test_receptionist_clinical_ban() {
        let rule = ReceptionistClinicalBan;
        assert!(rule.evaluate(&receptionist(), "MedicalRecord", "read").deny);
        assert!(rule.evaluate(&receptionist(), "Prescription", "create").deny);
        assert!(!rule.evaluate(&receptionist(), "Appointment", "read").deny);
        assert!(!rule.evaluate(&doctor(), "MedicalRecord", "read").deny);
    }

    #[test]
    fn test_hr_restricted_records_ban() {
        let rule = HrRestrictedRecordsBan;
        assert!(rule.evaluate(&hr(), "PatientProfile", "read").deny);
        assert!(rule.evaluate(&hr(), "Invoice", "update").deny);
        assert!(!rule.evaluate(&hr(), "StaffProfile", "read").deny);
        assert!(!rule.evaluate(&doctor(), "PatientProfile", "read").deny);
    }

    #[test]
    fn test_patient_data_delete_ban_applies_to_everyone() {
        let rule = PatientDataDeleteBan;

        let outcome = rule.evaluate(&doctor(), "MedicalRecord", "delete");
        assert!(outcome.deny);
        assert_eq!(outcome.risk_delta, 5);

        assert!(rule.evaluate(&hr(), "PatientProfile", "delete").deny);
        assert!(!rule.evaluate(&doctor(), "MedicalRecord", "update").deny);
        assert!(!rule.evaluate(&doctor(), "Invoice", "delete").deny);
    }

    #[test]
    fn test_first_matching_rule_supplies_reason() {
        let rules = PolicyRuleSet::standard();

        // Receptionist deleting a medical record matches rules 1 and 3;
        // the reason comes from rule 1, the risk delta from rule 3 still
        // accumulates.
        let (reason, risk) = rules.evaluate(&receptionist(), "MedicalRecord", "delete");
        assert_eq!(reason, Some(DenyReason::ReceptionistNoClinicalAccess));
        assert_eq!(risk, 5);
    }

    #[test]
    fn test_no_rule_matches() {
        let rules = PolicyRuleSet::standard();
        let (reason, risk) = rules.evaluate(&doctor(), "MedicalRecord", "read");
        assert_eq!(reason, None);
        assert_eq!(risk, 0);
    }
}
