//! End-to-end approval flows.
//!
//! Drives the workflow the way the admin service does, including the full
//! onboarding loop where an approved request changes what the
//! authorization engine subsequently allows.

use emr_approvals::{
    ApprovalWorkflow, ChangeType, PermissionSubmission, RequestStatus, RequestType, WorkflowError,
};
use emr_authz::{AuthorizationEngine, Branch, Department, DenyReason, Seniority, UserContext};
use emr_rbac::{Role, RoleCatalog};

fn add(user: &str, resource: &str, action: &str) -> PermissionSubmission {
    PermissionSubmission {
        target_user_id: user.to_string(),
        resource_type: resource.to_string(),
        action: action.to_string(),
        change_type: ChangeType::Add,
        request_type: RequestType::JobTransfer,
        confidence: 0.85,
    }
}

fn remove(user: &str, resource: &str, action: &str) -> PermissionSubmission {
    PermissionSubmission {
        change_type: ChangeType::Remove,
        ..add(user, resource, action)
    }
}

#[tokio::test]
async fn test_invalid_submission_leaves_no_trace() {
    let workflow = ApprovalWorkflow::new();

    let before = workflow.stats().await;
    let err = workflow
        .submit(PermissionSubmission {
            confidence: 1.5,
            ..add("U0042", "LabOrder", "create")
        })
        .await
        .unwrap_err();

    assert!(matches!(err, WorkflowError::InvalidInput(_)));
    assert_eq!(workflow.stats().await, before);
    assert!(workflow.pending().await.is_empty());
}

#[tokio::test]
async fn test_batch_approval_applies_every_change() {
    let workflow = ApprovalWorkflow::new();
    workflow
        .register_user(
            "U0042",
            RoleCatalog::standard().default_permissions(Role::Nurse),
        )
        .await;

    let first = workflow.submit(add("U0042", "LabOrder", "create")).await.unwrap();
    let second = workflow.submit(add("U0042", "ImagingOrder", "create")).await.unwrap();

    let approved = workflow.approve_all_for_user("U0042").await.unwrap();
    assert_eq!(approved, vec![first.id, second.id]);

    let grants = workflow.effective_permissions("U0042").await.unwrap();
    assert!(grants.contains_key("LabOrder_create"));
    assert!(grants.contains_key("ImagingOrder_create"));

    for request in workflow.requests_for_user("U0042").await {
        assert_eq!(request.status, RequestStatus::Approved);
    }
}

#[tokio::test]
async fn test_batch_approval_add_then_remove_on_same_key() {
    let workflow = ApprovalWorkflow::new();
    workflow
        .register_user("U0042", emr_rbac::PermissionSet::new())
        .await;

    // Ascending-id order means the later REMOVE wins over the earlier ADD.
    workflow.submit(add("U0042", "LabOrder", "create")).await.unwrap();
    workflow.submit(remove("U0042", "LabOrder", "create")).await.unwrap();

    workflow.approve_all_for_user("U0042").await.unwrap();

    let grants = workflow.effective_permissions("U0042").await.unwrap();
    assert!(!grants.contains_key("LabOrder_create"));
}

#[tokio::test]
async fn test_onboarding_changes_what_the_engine_allows() {
    let engine = AuthorizationEngine::standard();
    let workflow = ApprovalWorkflow::new();

    let nurse = UserContext::new(
        "U0042",
        Role::Nurse,
        Branch::HoChiMinh,
        Department::InternalMedicine,
        Seniority::Mid,
    );

    // Onboard with role defaults; a nurse cannot create lab orders.
    workflow
        .register_user("U0042", engine.default_permissions(Role::Nurse))
        .await;
    let grants = workflow.effective_permissions("U0042").await.unwrap();
    let decision = engine.decide(&nurse, &grants, "LabOrder", "create");
    assert!(!decision.allowed);
    assert_eq!(decision.deny_reason, Some(DenyReason::RbacDeny));

    // A reviewed and approved request closes the gap.
    let request = workflow.submit(add("U0042", "LabOrder", "create")).await.unwrap();
    workflow.approve(request.id, Some("ward rotation".to_string())).await.unwrap();

    let grants = workflow.effective_permissions("U0042").await.unwrap();
    let decision = engine.decide(&nurse, &grants, "LabOrder", "create");
    assert!(decision.allowed);
}

#[tokio::test]
async fn test_approved_grant_cannot_defeat_attribute_rules() {
    let engine = AuthorizationEngine::standard();
    let workflow = ApprovalWorkflow::new();

    let receptionist = UserContext::new(
        "U0006",
        Role::Receptionist,
        Branch::Hanoi,
        Department::Reception,
        Seniority::Senior,
    );

    workflow
        .register_user("U0006", engine.default_permissions(Role::Receptionist))
        .await;
    let request = workflow.submit(add("U0006", "MedicalRecord", "read")).await.unwrap();
    workflow.approve(request.id, None).await.unwrap();

    // The grant landed, but the clinical-access rule still denies.
    let grants = workflow.effective_permissions("U0006").await.unwrap();
    assert!(grants.contains_key("MedicalRecord_read"));

    let decision = engine.decide(&receptionist, &grants, "MedicalRecord", "read");
    assert!(!decision.allowed);
    assert_eq!(
        decision.deny_reason,
        Some(DenyReason::ReceptionistNoClinicalAccess)
    );
}

#[tokio::test]
async fn test_double_approve_reports_current_status() {
    let workflow = ApprovalWorkflow::new();

    let request = workflow.submit(add("U0042", "LabOrder", "create")).await.unwrap();
    workflow.approve(request.id, None).await.unwrap();

    let err = workflow.approve(request.id, None).await.unwrap_err();
    assert_eq!(
        err,
        WorkflowError::InvalidStateTransition {
            id: request.id,
            status: RequestStatus::Approved,
        }
    );
    assert_eq!(err.to_string(), format!("Invalid state transition: request {} is APPROVED", request.id));
}

#[tokio::test]
async fn test_concurrent_submissions_get_distinct_ids() {
    let workflow = ApprovalWorkflow::new();

    let mut handles = Vec::new();
    for i in 0..16 {
        let workflow = workflow.clone();
        handles.push(tokio::spawn(async move {
            workflow
                .submit(add(&format!("U{:04}", i), "LabOrder", "read"))
                .await
                .unwrap()
                .id
        }));
    }

    let mut ids = Vec::new();
    for handle in handles {
        ids.push(handle.await.unwrap());
    }
    ids.sort_unstable();
    ids.dedup();
    assert_eq!(ids.len(), 16);
    assert_eq!(workflow.stats().await.total, 16);
}
