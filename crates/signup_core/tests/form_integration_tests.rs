//! Integration tests for the sign-up form core.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use mockall::mock;

use signup_core::{
    controller::INTERRUPTED_NOTICE,
    validation::{EMAIL_INVALID, EMAIL_REQUIRED, FIRST_NAME_REQUIRED},
    FieldName, FieldValues, FormConfig, FormController, FormError, FormEvent, FormSession,
    SimulatedSubmitHandler, SubmissionError, SubmissionState, SubmitHandler, ValidationEngine,
};

mock! {
    pub Handler {}

    #[async_trait]
    impl SubmitHandler for Handler {
        async fn handle(&self, values: FieldValues) -> Result<(), SubmissionError>;
    }
}

/// Handler that takes a while to settle and counts dispatches.
struct SlowHandler {
    calls: AtomicUsize,
    delay: Duration,
}

impl SlowHandler {
    fn new(delay: Duration) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            delay,
        }
    }
}

#[async_trait]
impl SubmitHandler for SlowHandler {
    async fn handle(&self, _values: FieldValues) -> Result<(), SubmissionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(self.delay).await;
        Ok(())
    }
}

/// Handler that panics instead of settling.
struct PanickingHandler;

#[async_trait]
impl SubmitHandler for PanickingHandler {
    async fn handle(&self, _values: FieldValues) -> Result<(), SubmissionError> {
        panic!("handler crashed");
    }
}

fn fill(form: &mut FormController, values: &FieldValues) {
    for field in FieldName::ALL {
        form.set_field_value(field, values.get(field));
    }
}

fn valid_values() -> FieldValues {
    FieldValues::new()
        .with(FieldName::FirstName, "Jeanine")
        .with(FieldName::LastName, "Lee")
        .with(FieldName::Email, "jeanine@bootcampr.io")
        .with(FieldName::Password, "p")
        .with(FieldName::ReenterPassword, "p")
}

/// Empty first names always fail, non-empty ones never do.
#[test]
fn test_first_name_required_property() {
    let engine = ValidationEngine::new().unwrap();

    for name in ["", " ", "\t\n"] {
        let values = valid_values().with(FieldName::FirstName, name);
        assert_eq!(
            engine.validate(&values).get(FieldName::FirstName),
            Some(FIRST_NAME_REQUIRED)
        );
    }

    for name in ["A", "Jeanine", "  padded  ", "Ñandú", "O'Brien"] {
        let values = valid_values().with(FieldName::FirstName, name);
        assert!(!engine.validate(&values).contains(FieldName::FirstName));
    }
}

/// Emails outside `local@domain.tld` with a 2-4 letter TLD are rejected.
#[test]
fn test_email_pattern_property() {
    let engine = ValidationEngine::new().unwrap();

    let matching = [
        "a@b.com",
        "x@y.io",
        "UPPER@CASE.NET",
        "dots.in.local@host.co",
        "plus+tag@mail.example.info",
        "under_score@host.org",
    ];
    for email in matching {
        let values = valid_values().with(FieldName::Email, email);
        assert!(
            !engine.validate(&values).contains(FieldName::Email),
            "unexpected error for {}",
            email
        );
    }

    let not_matching = [
        "no-at-sign.com",
        "two@@signs.com",
        "a@b",
        "a@localhost",
        "a@b.c",
        "a@b.travel",
        "a@b.12",
        "a@",
        "@example.com",
        "spaces in@example.com",
    ];
    for email in not_matching {
        let values = valid_values().with(FieldName::Email, email);
        assert_eq!(
            engine.validate(&values).get(FieldName::Email),
            Some(EMAIL_INVALID),
            "expected error for {}",
            email
        );
    }

    let values = valid_values().with(FieldName::Email, "");
    assert_eq!(engine.validate(&values).get(FieldName::Email), Some(EMAIL_REQUIRED));
}

/// Without agreement, submit is rejected whatever the field values are.
#[tokio::test]
async fn test_submit_without_agreement_always_rejected() {
    for values in [valid_values(), FieldValues::new()] {
        let mut form = FormController::new().unwrap();
        fill(&mut form, &values);

        let mut handler = MockHandler::new();
        handler.expect_handle().never();

        let err = form.submit(&handler).await.unwrap_err();
        assert!(matches!(err, FormError::AgreementRequired));
        assert!(err.is_user_correctable());
        assert_eq!(form.state(), SubmissionState::Idle);
    }
}

/// A missing first name is reported and the handler is not called.
#[tokio::test]
async fn test_missing_first_name_scenario() {
    let mut form = FormController::new().unwrap();
    fill(
        &mut form,
        &FieldValues::new()
            .with(FieldName::LastName, "Lee")
            .with(FieldName::Email, "x@y.com")
            .with(FieldName::Password, "p")
            .with(FieldName::ReenterPassword, "p"),
    );
    form.toggle_agree();

    let mut handler = MockHandler::new();
    handler.expect_handle().never();

    match form.submit(&handler).await {
        Err(FormError::Validation(errors)) => {
            assert_eq!(errors.len(), 1);
            assert_eq!(errors.get(FieldName::FirstName), Some(FIRST_NAME_REQUIRED));
        }
        other => panic!("expected validation error, got {:?}", other),
    }
    assert_eq!(form.visible_error(FieldName::FirstName), Some(FIRST_NAME_REQUIRED));
    assert_eq!(form.state(), SubmissionState::Idle);
}

/// The handler receives exactly the email that was typed.
#[tokio::test]
async fn test_submitted_email_round_trip() {
    let mut form = FormController::new().unwrap();
    fill(&mut form, &valid_values());
    form.set_field_value(FieldName::Email, "a@b.com");
    form.toggle_agree();

    let mut handler = MockHandler::new();
    handler
        .expect_handle()
        .withf(|values| values.email == "a@b.com" && values.first_name == "Jeanine")
        .times(1)
        .returning(|_| Ok(()));

    let submitted = form.submit(&handler).await.unwrap();
    assert_eq!(submitted.email, "a@b.com");
    assert_eq!(form.state(), SubmissionState::Succeeded);
}

/// Each completed click dispatches once.
#[tokio::test]
async fn test_one_dispatch_per_click() {
    let mut form = FormController::new().unwrap();
    fill(&mut form, &valid_values());
    form.toggle_agree();

    let mut handler = MockHandler::new();
    handler.expect_handle().times(3).returning(|_| Ok(()));

    for _ in 0..3 {
        form.submit(&handler).await.unwrap();
    }
}

/// Overlapping submits dispatch at most once.
#[tokio::test]
async fn test_rapid_clicks_dispatch_once() {
    let handler = Arc::new(SlowHandler::new(Duration::from_millis(50)));
    let mut form = FormController::new().unwrap();
    fill(&mut form, &valid_values());
    form.toggle_agree();
    let session = FormSession::new(form, handler.clone());

    let (first, second) = tokio::join!(session.submit(), session.submit());
    assert!(first.is_ok());
    assert!(matches!(second, Err(FormError::SubmitInFlight)));
    assert_eq!(handler.calls.load(Ordering::SeqCst), 1);

    let mut clicks = Vec::new();
    for _ in 0..5 {
        let session = session.clone();
        clicks.push(tokio::spawn(async move { session.submit().await }));
    }

    let mut accepted = 0;
    for click in clicks {
        match click.await.unwrap() {
            Ok(_) => accepted += 1,
            Err(FormError::SubmitInFlight) => {}
            Err(e) => panic!("unexpected error: {}", e),
        }
    }
    assert_eq!(accepted, 1);
    assert_eq!(handler.calls.load(Ordering::SeqCst), 2);
}

/// The form is usable while a submission is in flight.
#[tokio::test]
async fn test_snapshot_during_submission() {
    let handler = Arc::new(SlowHandler::new(Duration::from_millis(50)));
    let mut form = FormController::new().unwrap();
    fill(&mut form, &valid_values());
    form.toggle_agree();
    let session = FormSession::new(form, handler);

    let background = session.clone();
    let pending = tokio::spawn(async move { background.submit().await });
    tokio::time::sleep(Duration::from_millis(10)).await;

    let snapshot = session.snapshot().await;
    assert_eq!(snapshot.state, SubmissionState::Submitting);
    assert!(!snapshot.can_submit);

    pending.await.unwrap().unwrap();
    assert_eq!(session.snapshot().await.state, SubmissionState::Succeeded);
}

/// A failing handler leaves the form retryable with a notice.
#[tokio::test]
async fn test_handler_failure_is_recoverable() {
    let mut form = FormController::new().unwrap();
    fill(&mut form, &valid_values());
    form.toggle_agree();

    let mut failing = MockHandler::new();
    failing
        .expect_handle()
        .times(1)
        .returning(|_| Err(SubmissionError::new("upstream timeout")));

    let err = form.submit(&failing).await.unwrap_err();
    assert_eq!(err.to_string(), "Submission failed: upstream timeout");
    assert_eq!(form.state(), SubmissionState::Failed);
    assert_eq!(form.snapshot().notice.as_deref(), Some("upstream timeout"));

    form.set_field_value(FieldName::LastName, "Leigh");
    assert_eq!(form.state(), SubmissionState::Idle);
    assert!(form.notice().is_none());

    let mut ok = MockHandler::new();
    ok.expect_handle()
        .withf(|values| values.last_name == "Leigh")
        .times(1)
        .returning(|_| Ok(()));
    form.submit(&ok).await.unwrap();
    assert!(form.last_outcome().unwrap().success);
}

/// Replaying recorded events through a configured session.
#[tokio::test]
async fn test_event_replay_with_password_match_rule() {
    let config = FormConfig::from_toml_str(
        "[submit]\ndelay_ms = 1\n\n[validation]\nrequire_password_match = true\n",
    )
    .unwrap();
    let session = FormSession::from_config(&config).unwrap();

    let events: Vec<FormEvent> = serde_json::from_str(
        r#"[
            {"type": "change", "field": "firstName", "value": "Jeanine"},
            {"type": "change", "field": "lastName", "value": "Lee"},
            {"type": "change", "field": "email", "value": "jeanine@bootcampr.io"},
            {"type": "change", "field": "password", "value": "secret"},
            {"type": "change", "field": "reenterPassword", "value": "secrte"},
            {"type": "set_agree", "checked": true}
        ]"#,
    )
    .unwrap();
    for event in events {
        session.apply(event).await.unwrap();
    }

    let err = session.apply(FormEvent::Submit).await.unwrap_err();
    match err {
        FormError::Validation(errors) => {
            assert_eq!(errors.get(FieldName::ReenterPassword), Some("Passwords must match"));
        }
        other => panic!("expected validation error, got {}", other),
    }

    session
        .apply(FormEvent::change(FieldName::ReenterPassword, "secret"))
        .await
        .unwrap();
    let submitted = session.apply(FormEvent::Submit).await.unwrap().unwrap();
    assert_eq!(submitted.reenter_password, "secret");
}

fn ready_form() -> FormController {
    let mut form = FormController::new().unwrap();
    fill(&mut form, &valid_values());
    form.toggle_agree();
    form
}

/// A submit dropped by a timeout leaves the form retryable.
#[tokio::test]
async fn test_timed_out_submit_can_be_retried() {
    let handler = Arc::new(SimulatedSubmitHandler::new(Duration::from_millis(200)));
    let session = FormSession::new(ready_form(), handler);

    let timed_out = tokio::time::timeout(Duration::from_millis(20), session.submit()).await;
    assert!(timed_out.is_err());

    let snapshot = session.snapshot().await;
    assert_eq!(snapshot.state, SubmissionState::Failed);
    assert_eq!(snapshot.notice.as_deref(), Some(INTERRUPTED_NOTICE));
    assert!(snapshot.can_submit);

    let submitted = session.submit().await.unwrap();
    assert_eq!(submitted.email, "jeanine@bootcampr.io");
    assert_eq!(session.snapshot().await.state, SubmissionState::Succeeded);
}

/// Aborting the submitting task settles the form and allows a reset.
#[tokio::test]
async fn test_aborted_submit_task_releases_form() {
    let handler = Arc::new(SlowHandler::new(Duration::from_millis(200)));
    let session = FormSession::new(ready_form(), handler.clone());

    let background = session.clone();
    let task = tokio::spawn(async move { background.submit().await });
    tokio::time::sleep(Duration::from_millis(20)).await;
    assert_eq!(session.snapshot().await.state, SubmissionState::Submitting);

    task.abort();
    assert!(task.await.unwrap_err().is_cancelled());

    assert_eq!(session.with_form(|f| f.state()).await, SubmissionState::Failed);
    session.apply(FormEvent::Reset).await.unwrap();
    assert_eq!(session.snapshot().await.state, SubmissionState::Idle);
    assert_eq!(handler.calls.load(Ordering::SeqCst), 1);
}

/// A panicking handler does not wedge the form.
#[tokio::test]
async fn test_panicking_handler_leaves_form_retryable() {
    let session = FormSession::new(ready_form(), Arc::new(PanickingHandler));

    let background = session.clone();
    let joined = tokio::spawn(async move { background.submit().await }).await;
    assert!(joined.unwrap_err().is_panic());

    let snapshot = session.snapshot().await;
    assert_eq!(snapshot.state, SubmissionState::Failed);
    assert_eq!(snapshot.notice.as_deref(), Some(INTERRUPTED_NOTICE));

    assert!(session.with_form(|f| f.can_submit()).await);
    session.apply(FormEvent::Reset).await.unwrap();
}
