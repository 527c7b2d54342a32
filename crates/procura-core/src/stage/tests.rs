//! Tests for the stage handlers.

use std::cell::RefCell;

use jiff::{civil::date, Timestamp};

use super::*;
use crate::{
    catalog::{Phase, Status},
    error::CollaboratorError,
    models::{
        DocumentBatch, EventCategory, EventEntry, ExpectedState, OutcomeTag, ProcurementState,
        Severity, StageNotification, StageTransition, StatusUpdate,
    },
    params::{DecisionRequest, DocumentUpload, UploadRequest},
    services::{BlockchainService, CallResult, Collaborators, NotificationService, StatusReader},
    transitions::{HandlerId, TransitionTable},
};

#[derive(Debug, Clone, PartialEq)]
enum Call {
    UpdateStatus(StatusUpdate),
    LogEvent(EventEntry),
    Publish(DocumentBatch),
    Transition(StageTransition),
    Notify(StageNotification),
}

impl Call {
    fn name(&self) -> &'static str {
        match self {
            Call::UpdateStatus(_) => "update_status",
            Call::LogEvent(_) => "log_event",
            Call::Publish(_) => "publish_documents",
            Call::Transition(_) => "handle_stage_transition",
            Call::Notify(_) => "notify_stage_update",
        }
    }
}

/// Records every collaborator call in order; optionally fails one operation.
#[derive(Default)]
struct Recorder {
    calls: RefCell<Vec<Call>>,
    fail_on: Option<&'static str>,
}

impl Recorder {
    fn failing_on(operation: &'static str) -> Self {
        Self {
            calls: RefCell::new(Vec::new()),
            fail_on: Some(operation),
        }
    }

    fn services(&self) -> Collaborators<'_> {
        Collaborators::new(self, self)
    }

    fn record(&self, call: Call) -> CallResult {
        if self.fail_on == Some(call.name()) {
            return Err(CollaboratorError::unavailable(call.name(), "ledger offline"));
        }
        self.calls.borrow_mut().push(call);
        Ok(())
    }

    fn names(&self) -> Vec<&'static str> {
        self.calls.borrow().iter().map(Call::name).collect()
    }

    fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }
}

impl BlockchainService for Recorder {
    fn update_status(&self, update: &StatusUpdate) -> CallResult {
        self.record(Call::UpdateStatus(update.clone()))
    }

    fn log_event(&self, event: &EventEntry) -> CallResult {
        self.record(Call::LogEvent(event.clone()))
    }

    fn publish_documents(&self, batch: &DocumentBatch) -> CallResult {
        self.record(Call::Publish(batch.clone()))
    }

    fn handle_stage_transition(&self, transition: &StageTransition) -> CallResult {
        self.record(Call::Transition(transition.clone()))
    }
}

impl NotificationService for Recorder {
    fn notify_stage_update(&self, notification: &StageNotification) -> CallResult {
        self.record(Call::Notify(notification.clone()))
    }
}

struct FixedReader(CallResult<Option<ProcurementState>>);

impl StatusReader for FixedReader {
    fn procurement_state(&self, _procurement_id: &str) -> CallResult<Option<ProcurementState>> {
        self.0.clone()
    }
}

fn table() -> TransitionTable {
    TransitionTable::standard().expect("standard table")
}

fn ctx() -> RequestContext {
    let received_at: Timestamp = "2026-03-05T10:00:00Z".parse().expect("timestamp");
    RequestContext::at(Actor::new("0xbac"), received_at)
}

fn decision(held: bool) -> DecisionRequest {
    DecisionRequest {
        procurement_id: "PR-001".to_string(),
        procurement_title: "Office Supplies".to_string(),
        conference_held: held,
    }
}

fn upload_request(documents: Vec<DocumentUpload>) -> UploadRequest {
    UploadRequest {
        procurement_id: "PR-001".to_string(),
        procurement_title: "Office Supplies".to_string(),
        documents,
        submission_date: Some("2026-03-01".to_string()),
        participants: Some("BAC members, end-user unit".to_string()),
        note: None,
    }
}

fn doc(document_type: &str, path: &str) -> DocumentUpload {
    DocumentUpload {
        document_type: document_type.to_string(),
        path: path.to_string(),
    }
}

fn state(phase: Phase, status: Status) -> ProcurementState {
    ProcurementState {
        procurement_id: "PR-001".to_string(),
        title: "Office Supplies".to_string(),
        phase,
        status,
        updated_at: Timestamp::UNIX_EPOCH,
        updated_by: "0xbac".to_string(),
    }
}

fn run_decision(recorder: &Recorder, request: &DecisionRequest) -> StageOutcome {
    let table = table();
    let rule = table
        .rule(HandlerId::PreProcurementDecision)
        .expect("decision rule");
    handle_decision(rule, recorder.services(), &ctx(), request)
}

fn run_upload(recorder: &Recorder, handler: HandlerId, request: &UploadRequest) -> StageOutcome {
    let table = table();
    let rule = table.rule(handler).expect("upload rule");
    handle_upload(rule, recorder.services(), &ctx(), request)
}

// ---------------------------------------------------------------------------
// Decision handlers
// ---------------------------------------------------------------------------

#[test]
fn test_conference_held_records_status_event_and_notification_in_order() {
    let recorder = Recorder::default();
    let outcome = run_decision(&recorder, &decision(true));

    assert!(outcome.success);
    assert!(outcome.message.ends_with("Please upload documents."));
    assert_eq!(outcome.next_phase, None);
    assert_eq!(
        recorder.names(),
        vec!["update_status", "log_event", "notify_stage_update"]
    );

    let calls = recorder.calls();
    let Call::UpdateStatus(update) = &calls[0] else {
        panic!("expected a status update first");
    };
    assert_eq!(update.status.to_string(), "Pre-Procurement Conference Held");
    assert_eq!(update.phase.to_string(), "Pre-Procurement Conference");
    assert_eq!(update.procurement_id, "PR-001");
    assert_eq!(update.title, "Office Supplies");
    assert_eq!(update.actor, Actor::new("0xbac"));
    assert_eq!(update.timestamp, ctx().received_at);

    let Call::LogEvent(event) = &calls[1] else {
        panic!("expected an event second");
    };
    assert_eq!(event.category, EventCategory::Decision);
    assert_eq!(event.severity, Severity::Info);
    assert_eq!(event.domain, "procurement");
    assert_eq!(event.related_count, 0);

    let Call::Notify(notification) = &calls[2] else {
        panic!("expected a notification last");
    };
    assert_eq!(notification.outcome, OutcomeTag::Held);
    assert!(!notification.phase_changed);
    assert_eq!(notification.next_phase, None);
    assert_eq!(notification.document_count, 0);
}

#[test]
fn test_conference_skipped_jumps_to_override_phase() {
    let recorder = Recorder::default();
    let outcome = run_decision(&recorder, &decision(false));

    assert!(outcome.success);
    assert_eq!(outcome.next_phase.as_deref(), Some("Bidding Documents"));
    assert!(outcome.message.contains("Proceeding to Bidding Documents."));
    assert_eq!(
        recorder.names(),
        vec!["update_status", "log_event", "notify_stage_update"]
    );

    let calls = recorder.calls();
    let Call::UpdateStatus(update) = &calls[0] else {
        panic!("expected a status update first");
    };
    assert_eq!(update.status.to_string(), "Pre-Procurement Conference Skipped");
    assert_eq!(update.phase, Phase::BiddingDocuments);

    let Call::Notify(notification) = &calls[2] else {
        panic!("expected a notification last");
    };
    assert_eq!(notification.outcome, OutcomeTag::Skipped);
    assert!(notification.phase_changed);
    assert_eq!(notification.next_phase, Some(Phase::BiddingDocuments));
}

#[test]
fn test_pre_bid_skip_uses_its_own_override() {
    let recorder = Recorder::default();
    let table = table();
    let rule = table.rule(HandlerId::PreBidDecision).expect("pre-bid rule");
    let outcome = handle_decision(rule, recorder.services(), &ctx(), &decision(false));

    assert_eq!(outcome.next_phase.as_deref(), Some("Bid Opening"));
}

#[test]
fn test_failing_status_update_stops_before_event_and_notification() {
    let recorder = Recorder::failing_on("update_status");
    let outcome = run_decision(&recorder, &decision(true));

    assert!(!outcome.success);
    assert!(outcome
        .message
        .starts_with("Failed to process Pre-Procurement Conference decision: "));
    assert!(outcome.message.contains("ledger offline"));
    assert!(recorder.names().is_empty());
}

#[test]
fn test_failing_event_log_keeps_earlier_update() {
    let recorder = Recorder::failing_on("log_event");
    let outcome = run_decision(&recorder, &decision(true));

    assert!(!outcome.success);
    assert_eq!(recorder.names(), vec!["update_status"]);
}

#[test]
fn test_failing_notification_is_reported() {
    let recorder = Recorder::failing_on("notify_stage_update");
    let outcome = run_decision(&recorder, &decision(false));

    assert!(!outcome.success);
    assert_eq!(outcome.next_phase, None);
    assert_eq!(recorder.names(), vec!["update_status", "log_event"]);
}

#[test]
fn test_blank_procurement_id_fails_without_side_effects() {
    let recorder = Recorder::default();
    let mut request = decision(true);
    request.procurement_id = "   ".to_string();
    let outcome = run_decision(&recorder, &request);

    assert!(!outcome.success);
    assert!(outcome.message.contains("procurement_id"));
    assert!(recorder.names().is_empty());
}

#[test]
fn test_decision_with_upload_rule_fails() {
    let recorder = Recorder::default();
    let table = table();
    let rule = table.rule(HandlerId::BidOpening).expect("upload rule");
    let outcome = handle_decision(rule, recorder.services(), &ctx(), &decision(true));

    assert!(!outcome.success);
    assert!(outcome.message.contains("not a decision handler"));
    assert!(recorder.names().is_empty());
}

#[test]
fn test_double_submission_records_twice() {
    let recorder = Recorder::default();
    let first = run_decision(&recorder, &decision(true));
    let second = run_decision(&recorder, &decision(true));

    assert_eq!(first, second);
    assert_eq!(recorder.names().len(), 6);
}

// ---------------------------------------------------------------------------
// Upload handlers
// ---------------------------------------------------------------------------

#[test]
fn test_upload_without_files_publishes_empty_batch() {
    let recorder = Recorder::default();
    let outcome = run_upload(
        &recorder,
        HandlerId::PreProcurementDocuments,
        &upload_request(vec![]),
    );

    assert!(outcome.success, "{}", outcome.message);
    assert_eq!(
        recorder.names(),
        vec![
            "publish_documents",
            "handle_stage_transition",
            "notify_stage_update"
        ]
    );
    let calls = recorder.calls();
    let Call::Publish(batch) = &calls[0] else {
        panic!("expected a publish first");
    };
    assert!(batch.documents.is_empty());
    let Call::Notify(notification) = &calls[2] else {
        panic!("expected a notification last");
    };
    assert_eq!(notification.document_count, 0);
}

#[test]
fn test_upload_with_one_of_two_slots() {
    let recorder = Recorder::default();
    let request = upload_request(vec![
        doc("Minutes of Meeting", "/uploads/minutes.pdf"),
        doc("Attendance Sheet", ""),
    ]);
    let outcome = run_upload(&recorder, HandlerId::PreProcurementDocuments, &request);

    assert!(outcome.success);
    assert_eq!(outcome.next_phase.as_deref(), Some("Bidding Documents"));
    assert_eq!(
        outcome.message,
        "Uploaded 1 document(s) for Pre-Procurement Conference. Proceeding to Bidding Documents."
    );

    let calls = recorder.calls();
    let Call::Publish(batch) = &calls[0] else {
        panic!("expected a publish first");
    };
    assert_eq!(batch.documents.len(), 1);
    assert_eq!(batch.phase, Phase::PreProcurementConference);
    assert_eq!(batch.status, Status::PreProcurementConferenceCompleted);

    let metadata = &batch.documents[0];
    assert_eq!(metadata.document_type, "Minutes of Meeting");
    assert_eq!(metadata.file_name, "minutes.pdf");
    assert_eq!(metadata.storage_path_segment, "pre-procurement-conference");
    assert_eq!(metadata.submission_date, date(2026, 3, 1));
    assert_eq!(
        metadata.participants.as_deref(),
        Some("BAC members, end-user unit")
    );
}

#[test]
fn test_upload_with_both_slots() {
    let recorder = Recorder::default();
    let request = upload_request(vec![
        doc("minutes of meeting", "/uploads/minutes.pdf"),
        doc("Attendance Sheet", "/uploads/attendance.pdf"),
    ]);
    run_upload(&recorder, HandlerId::PreProcurementDocuments, &request);

    let calls = recorder.calls();
    let Call::Publish(batch) = &calls[0] else {
        panic!("expected a publish first");
    };
    assert_eq!(batch.documents.len(), 2);
    assert_eq!(batch.documents[0].document_type, "Minutes of Meeting");

    let Call::Notify(notification) = &calls[2] else {
        panic!("expected a notification last");
    };
    assert_eq!(notification.document_count, 2);
    assert_eq!(notification.outcome, OutcomeTag::DocumentsUploaded);
    assert_eq!(notification.next_phase, Some(Phase::BiddingDocuments));
}

#[test]
fn test_upload_transition_record_uses_declared_states() {
    let recorder = Recorder::default();
    let mut request = upload_request(vec![doc("Minutes of Meeting", "/uploads/minutes.pdf")]);
    request.note = Some("  Conference held on 28 Feb  ".to_string());
    run_upload(&recorder, HandlerId::PreProcurementDocuments, &request);

    let calls = recorder.calls();
    let Call::Transition(transition) = &calls[1] else {
        panic!("expected the transition second");
    };
    assert_eq!(
        transition.from_status,
        Some(Status::PreProcurementConferenceHeld)
    );
    assert_eq!(
        transition.to_status,
        Status::PreProcurementConferenceCompleted
    );
    assert_eq!(transition.from_phase, Phase::PreProcurementConference);
    assert_eq!(transition.to_phase, Phase::BiddingDocuments);
    assert_eq!(transition.note.as_deref(), Some("Conference held on 28 Feb"));
}

#[test]
fn test_records_carry_the_rule_state() {
    let recorder = Recorder::default();
    run_upload(
        &recorder,
        HandlerId::BiddingDocuments,
        &upload_request(vec![doc("Bidding Documents", "/uploads/pbd.pdf")]),
    );
    run_decision(&recorder, &decision(false));

    let expected_upload = ExpectedState {
        phase: Phase::BiddingDocuments,
        statuses: vec![
            Status::PreProcurementConferenceCompleted,
            Status::PreProcurementConferenceSkipped,
        ],
    };
    let calls = recorder.calls();
    let Call::Publish(batch) = &calls[0] else {
        panic!("expected a publish first");
    };
    assert_eq!(batch.expected, expected_upload);
    let Call::Transition(transition) = &calls[1] else {
        panic!("expected the transition second");
    };
    assert_eq!(transition.expected, expected_upload);
    let Call::UpdateStatus(update) = &calls[3] else {
        panic!("expected the decision's status update after the upload");
    };
    assert_eq!(
        update.expected,
        ExpectedState {
            phase: Phase::PreProcurementConference,
            statuses: vec![Status::PrSubmitted],
        }
    );
}

#[test]
fn test_initiation_has_no_from_status() {
    let recorder = Recorder::default();
    let request = upload_request(vec![doc("Purchase Request", "/uploads/pr.pdf")]);
    let outcome = run_upload(&recorder, HandlerId::Initiation, &request);

    assert_eq!(
        outcome.next_phase.as_deref(),
        Some("Pre-Procurement Conference")
    );
    let calls = recorder.calls();
    let Call::Transition(transition) = &calls[1] else {
        panic!("expected the transition second");
    };
    assert_eq!(transition.from_status, None);
    assert_eq!(transition.to_status, Status::PrSubmitted);
}

#[test]
fn test_upload_defaults_submission_date_to_request_date() {
    let recorder = Recorder::default();
    let mut request = upload_request(vec![doc("Purchase Request", "/uploads/pr.pdf")]);
    request.submission_date = None;
    run_upload(&recorder, HandlerId::Initiation, &request);

    let calls = recorder.calls();
    let Call::Publish(batch) = &calls[0] else {
        panic!("expected a publish first");
    };
    assert_eq!(batch.documents[0].submission_date, date(2026, 3, 5));
}

#[test]
fn test_unknown_document_type_fails_without_side_effects() {
    let recorder = Recorder::default();
    let request = upload_request(vec![doc("Notice of Award", "/uploads/noa.pdf")]);
    let outcome = run_upload(&recorder, HandlerId::PreProcurementDocuments, &request);

    assert!(!outcome.success);
    assert!(outcome
        .message
        .starts_with("Failed to process Pre-Procurement Conference documents: "));
    assert!(outcome.message.contains("Minutes of Meeting, Attendance Sheet"));
    assert!(recorder.names().is_empty());
}

#[test]
fn test_malformed_submission_date_fails() {
    let recorder = Recorder::default();
    let mut request = upload_request(vec![doc("Minutes of Meeting", "/uploads/minutes.pdf")]);
    request.submission_date = Some("03/01/2026".to_string());
    let outcome = run_upload(&recorder, HandlerId::PreProcurementDocuments, &request);

    assert!(!outcome.success);
    assert!(outcome.message.contains("submission_date"));
    assert!(recorder.names().is_empty());
}

#[test]
fn test_failing_transition_stops_before_notification() {
    let recorder = Recorder::failing_on("handle_stage_transition");
    let request = upload_request(vec![doc("Minutes of Meeting", "/uploads/minutes.pdf")]);
    let outcome = run_upload(&recorder, HandlerId::PreProcurementDocuments, &request);

    assert!(!outcome.success);
    assert_eq!(outcome.next_phase, None);
    assert_eq!(recorder.names(), vec!["publish_documents"]);
}

#[test]
fn test_upload_with_decision_rule_fails() {
    let recorder = Recorder::default();
    let table = table();
    let rule = table
        .rule(HandlerId::PreProcurementDecision)
        .expect("decision rule");
    let outcome = handle_upload(rule, recorder.services(), &ctx(), &upload_request(vec![]));

    assert!(!outcome.success);
    assert!(outcome.message.contains("not an upload handler"));
}

// ---------------------------------------------------------------------------
// Form read path
// ---------------------------------------------------------------------------

#[test]
fn test_form_shown_for_expected_state() {
    let table = table();
    let rule = table
        .rule(HandlerId::PreProcurementDocuments)
        .expect("upload rule");
    let reader = FixedReader(Ok(Some(state(
        Phase::PreProcurementConference,
        Status::PreProcurementConferenceHeld,
    ))));

    match show_stage_form(rule, &reader, Some("PR-001")) {
        FormView::Form(form) => {
            assert_eq!(form.handler, HandlerId::PreProcurementDocuments);
            assert_eq!(form.phase, Phase::PreProcurementConference);
            assert!(!form.decision);
            assert_eq!(
                form.document_types,
                vec!["Minutes of Meeting", "Attendance Sheet"]
            );
            assert!(form.procurement.is_some());
        }
        FormView::Redirect(redirect) => panic!("unexpected redirect: {}", redirect.error),
    }
}

#[test]
fn test_form_redirects_when_state_differs() {
    let table = table();
    let rule = table
        .rule(HandlerId::PreProcurementDocuments)
        .expect("upload rule");
    let reader = FixedReader(Ok(Some(state(
        Phase::BiddingDocuments,
        Status::PreProcurementConferenceSkipped,
    ))));

    let FormView::Redirect(redirect) = show_stage_form(rule, &reader, Some("PR-001")) else {
        panic!("expected a redirect");
    };
    assert_eq!(redirect.route, LIST_ROUTE);
    assert!(redirect.error.contains("is at Bidding Documents"));
}

#[test]
fn test_form_redirects_on_lookup_failure() {
    let table = table();
    let rule = table.rule(HandlerId::BidOpening).expect("upload rule");
    let reader = FixedReader(Err(CollaboratorError::unavailable(
        "procurement_state",
        "connection refused",
    )));

    let FormView::Redirect(redirect) = show_stage_form(rule, &reader, Some("PR-001")) else {
        panic!("expected a redirect");
    };
    assert!(redirect.error.starts_with("Unable to load procurement PR-001"));
}

#[test]
fn test_form_redirects_for_unknown_procurement() {
    let table = table();
    let rule = table.rule(HandlerId::BidOpening).expect("upload rule");
    let reader = FixedReader(Ok(None));

    let FormView::Redirect(redirect) = show_stage_form(rule, &reader, Some("PR-404")) else {
        panic!("expected a redirect");
    };
    assert_eq!(redirect.error, "Procurement PR-404 was not found.");
}

#[test]
fn test_initiation_form_needs_no_procurement() {
    let table = table();
    let rule = table.rule(HandlerId::Initiation).expect("initiation rule");
    let reader = FixedReader(Ok(None));

    assert!(matches!(
        show_stage_form(rule, &reader, None),
        FormView::Form(StageForm {
            procurement: None,
            ..
        })
    ));
    assert!(matches!(
        show_stage_form(rule, &reader, Some("PR-002")),
        FormView::Form(_)
    ));

    let existing = FixedReader(Ok(Some(state(
        Phase::PreProcurementConference,
        Status::PrSubmitted,
    ))));
    let FormView::Redirect(redirect) = show_stage_form(rule, &existing, Some("PR-001")) else {
        panic!("expected a redirect");
    };
    assert!(redirect.error.contains("already exists"));
}

#[test]
fn test_form_without_id_redirects_for_later_stages() {
    let table = table();
    let rule = table.rule(HandlerId::BidOpening).expect("upload rule");
    let reader = FixedReader(Ok(None));

    assert!(matches!(
        show_stage_form(rule, &reader, Some("  ")),
        FormView::Redirect(_)
    ));
}

// ---------------------------------------------------------------------------
// Outcome shape
// ---------------------------------------------------------------------------

#[test]
fn test_outcome_json_shape() {
    let advanced = StageOutcome::advanced("moved", Phase::BiddingDocuments);
    let json = serde_json::to_value(&advanced).expect("serialize");
    assert_eq!(
        json,
        serde_json::json!({
            "success": true,
            "message": "moved",
            "nextPhase": "Bidding Documents"
        })
    );

    let failed = serde_json::to_value(StageOutcome::failure("nope")).expect("serialize");
    assert!(failed.get("nextPhase").is_none());
    assert_eq!(failed["success"], false);
}
