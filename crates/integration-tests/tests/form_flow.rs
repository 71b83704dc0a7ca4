//! Integration tests for form submission and the timed contact reset.
//!
//! Timers run on a paused tokio clock, so a three-second reset completes
//! instantly while still observing the delay.

#![allow(clippy::unwrap_used)]

use std::time::Duration;

use himsols_cli::TokioResetScheduler;
use himsols_core::catalog::GENERIC_SERVICE;
use himsols_core::{
    FlowState, FormError, FormFlow, FormKind, ManualResetScheduler, Notice, NoticeVariant,
    RequestForm, SequentialRequestIds, ServiceType,
};

// =============================================================================
// Helpers
// =============================================================================

fn filled(kind: FormKind, fields: &[(&str, &str)]) -> FormFlow {
    let mut flow = FormFlow::new(kind);
    for (name, value) in fields {
        flow.update_field(name, *value).unwrap();
    }
    flow
}

fn contact() -> FormFlow {
    filled(
        FormKind::Contact,
        &[("name", "Asha"), ("mobile", "9876543210"), ("message", "Need saplings")],
    )
}

// =============================================================================
// Contact reset
// =============================================================================

#[tokio::test(start_paused = true)]
async fn test_contact_resets_after_three_seconds() {
    let ids = SequentialRequestIds::new();
    let (mut scheduler, mut resets) = TokioResetScheduler::new();
    let mut flow = contact();

    let result = flow.submit(&ids, &mut scheduler).unwrap();
    assert_eq!(result.request_id, "CM000001");
    assert!(flow.is_submitted());

    let started = tokio::time::Instant::now();
    let ticket = resets.recv().await.unwrap();
    let elapsed = started.elapsed();
    assert!(elapsed >= Duration::from_secs(3));
    assert!(elapsed < Duration::from_millis(3_100));

    assert!(flow.fire_reset(ticket));
    assert_eq!(flow.state(), &FlowState::Idle);
    assert!(flow.form().is_blank());
}

#[tokio::test(start_paused = true)]
async fn test_cancelled_reset_never_arrives() {
    let ids = SequentialRequestIds::new();
    let (mut scheduler, mut resets) = TokioResetScheduler::new();
    let mut flow = contact();
    flow.submit(&ids, &mut scheduler).unwrap();

    // Leaving the page before the delay elapses.
    flow.reset(&mut scheduler);
    assert!(flow.form().is_blank());

    tokio::time::sleep(Duration::from_secs(60)).await;
    assert!(resets.try_recv().is_err());
    assert_eq!(scheduler.active(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_stale_ticket_does_not_clear_new_input() {
    let ids = SequentialRequestIds::new();
    let (mut scheduler, mut resets) = TokioResetScheduler::new();
    let mut flow = contact();
    flow.submit(&ids, &mut scheduler).unwrap();
    let first = resets.recv().await.unwrap();
    assert!(flow.fire_reset(first));

    // A replayed ticket from the earlier submission is ignored.
    flow.update_field("name", "Ravi").unwrap();
    assert!(!flow.fire_reset(first));
    assert_eq!(flow.form().get("name"), Some("Ravi"));
}

#[tokio::test(start_paused = true)]
async fn test_resubmission_after_reset_gets_fresh_id() {
    let ids = SequentialRequestIds::new();
    let (mut scheduler, mut resets) = TokioResetScheduler::new();

    let mut flow = contact();
    flow.submit(&ids, &mut scheduler).unwrap();
    assert_eq!(
        flow.submit(&ids, &mut scheduler),
        Err(FormError::AlreadySubmitted)
    );

    let ticket = resets.recv().await.unwrap();
    assert!(flow.fire_reset(ticket));

    for (name, value) in [("name", "Asha"), ("mobile", "1"), ("message", "again")] {
        flow.update_field(name, value).unwrap();
    }
    let second = flow.submit(&ids, &mut scheduler).unwrap();
    assert_eq!(second.request_id, "CM000002");
}

// =============================================================================
// Validation
// =============================================================================

#[test]
fn test_signup_mismatch_keeps_form() {
    let ids = SequentialRequestIds::new();
    let mut scheduler = ManualResetScheduler::new();
    let mut flow = filled(
        FormKind::Signup,
        &[
            ("name", "Asha"),
            ("email", "asha@example.com"),
            ("mobile", "9876543210"),
            ("password", "secret1"),
            ("confirmPassword", "secret2"),
        ],
    );

    let err = flow.submit(&ids, &mut scheduler).unwrap_err();
    assert_eq!(err, FormError::PasswordMismatch);
    assert_eq!(flow.state(), &FlowState::Idle);
    assert_eq!(flow.form().get("password"), Some("secret1"));

    let notice = Notice::for_error(FormKind::Signup, &err);
    assert_eq!(notice.variant, NoticeVariant::Destructive);
    assert!(scheduler.pending().is_empty());
}

#[test]
fn test_login_stays_submitted() {
    let ids = SequentialRequestIds::new();
    let mut scheduler = ManualResetScheduler::new();
    let mut flow = filled(
        FormKind::Login,
        &[("email", "asha@example.com"), ("password", "hunter2")],
    );
    let result = flow.submit(&ids, &mut scheduler).unwrap();
    assert!(result.request_id.starts_with("LG"));
    assert!(flow.pending_reset().is_none());
    assert!(scheduler.pending().is_empty());
    assert!(!format!("{:?}", flow.form()).contains("hunter2"));
}

#[test]
fn test_service_request_variants() {
    let ids = SequentialRequestIds::new();
    let mut scheduler = ManualResetScheduler::new();

    let mut flow = FormFlow::with_form(RequestForm::service_request("conservation"));
    for (name, value) in [("name", "Asha"), ("mobile", "1"), ("address", "Ward 4")] {
        flow.update_field(name, value).unwrap();
    }
    let result = flow.submit(&ids, &mut scheduler).unwrap();
    assert_eq!(result.request_id, "SR000001");
    assert_eq!(
        ServiceType::info_for_slug("conservation"),
        ServiceType::Conservation.info()
    );

    // Unknown slugs fall back to the generic header but still need a type.
    assert_eq!(ServiceType::info_for_slug("plumbing"), GENERIC_SERVICE);
    let form = RequestForm::service_request("");
    let err = form.validate().unwrap_err();
    assert!(err.missing_fields().contains(&"serviceType".to_string()));
}
