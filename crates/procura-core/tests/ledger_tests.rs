use jiff::{civil::date, Timestamp};
use procura_core::{
    models::{
        DocumentBatch, DocumentMetadata, EntryKind, EventCategory, EventEntry, ExpectedState,
        Severity, StageTransition, StatusUpdate, EVENT_DOMAIN,
    },
    services::{BlockchainService, StatusReader},
    Actor, CollaboratorError, Ledger, Phase, Status,
};
use tempfile::{NamedTempFile, TempDir};

/// Helper function to create a temporary ledger for testing
fn create_test_ledger() -> (NamedTempFile, Ledger) {
    let temp_file = NamedTempFile::new().expect("Failed to create temporary file");
    let ledger = Ledger::open(temp_file.path()).expect("Failed to create test ledger");
    (temp_file, ledger)
}

fn at() -> Timestamp {
    "2026-03-05T10:00:00Z".parse().expect("timestamp")
}

fn expect(phase: Phase, statuses: &[Status]) -> ExpectedState {
    ExpectedState {
        phase,
        statuses: statuses.to_vec(),
    }
}

fn create(ledger: &Ledger, procurement_id: &str) {
    ledger
        .handle_stage_transition(&StageTransition {
            procurement_id: procurement_id.to_string(),
            title: "Office Supplies".to_string(),
            expected: expect(Phase::ProcurementInitiation, &[]),
            from_status: None,
            to_status: Status::PrSubmitted,
            from_phase: Phase::ProcurementInitiation,
            to_phase: Phase::PreProcurementConference,
            actor: Actor::new("0xbac"),
            timestamp: at(),
            note: Some("Funded under the annual plan".to_string()),
        })
        .expect("Failed to create procurement");
}

#[test]
fn test_reopening_keeps_data() {
    let temp_file = NamedTempFile::new().expect("Failed to create temporary file");
    {
        let ledger = Ledger::open(temp_file.path()).expect("Failed to open ledger");
        create(&ledger, "PR-001");
    }
    let ledger = Ledger::open(temp_file.path()).expect("Failed to reopen ledger");
    assert!(ledger
        .procurement("PR-001")
        .expect("Failed to query")
        .is_some());
}

#[test]
fn test_transition_creates_and_records_payload() {
    let (_temp_file, ledger) = create_test_ledger();
    create(&ledger, "PR-001");

    let state = ledger
        .procurement_state("PR-001")
        .expect("Failed to read state")
        .expect("Procurement should exist");
    assert_eq!(state.phase, Phase::PreProcurementConference);
    assert_eq!(state.status, Status::PrSubmitted);
    assert_eq!(state.updated_at, at());

    let history = ledger.history("PR-001").expect("Failed to load history");
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].kind, EntryKind::Transition);
    assert_eq!(history[0].payload["note"], "Funded under the annual plan");
    assert_eq!(history[0].payload["to_phase"], "pre-procurement-conference");
    assert_eq!(
        history[0].summary,
        "Advanced from Procurement Initiation to Pre-Procurement Conference"
    );
}

#[test]
fn test_transition_from_wrong_phase_is_rejected() {
    let (_temp_file, ledger) = create_test_ledger();
    create(&ledger, "PR-001");

    let result = ledger.handle_stage_transition(&StageTransition {
        procurement_id: "PR-001".to_string(),
        title: "Office Supplies".to_string(),
        expected: expect(Phase::BidOpening, &[Status::BulletinPublished]),
        from_status: Some(Status::BulletinPublished),
        to_status: Status::BidsOpened,
        from_phase: Phase::BidOpening,
        to_phase: Phase::BidEvaluation,
        actor: Actor::new("0xbac"),
        timestamp: at(),
        note: None,
    });

    assert!(matches!(result, Err(CollaboratorError::Rejected { .. })));
    assert_eq!(
        ledger.history("PR-001").expect("Failed to load history").len(),
        1
    );
}

#[test]
fn test_status_update_requires_procurement() {
    let (_temp_file, ledger) = create_test_ledger();

    let result = ledger.update_status(&StatusUpdate {
        procurement_id: "PR-404".to_string(),
        title: "Ghost".to_string(),
        expected: expect(Phase::PreProcurementConference, &[Status::PrSubmitted]),
        status: Status::PreProcurementConferenceHeld,
        phase: Phase::PreProcurementConference,
        actor: Actor::new("0xbac"),
        timestamp: at(),
    });

    assert_eq!(
        result,
        Err(CollaboratorError::rejected(
            "update_status",
            "procurement 'PR-404' does not exist"
        ))
    );
}

#[test]
fn test_event_is_appended() {
    let (_temp_file, ledger) = create_test_ledger();
    create(&ledger, "PR-001");

    ledger
        .log_event(&EventEntry {
            procurement_id: "PR-001".to_string(),
            title: "Office Supplies".to_string(),
            phase: Phase::PreProcurementConference,
            description: "Pre-Procurement Conference held".to_string(),
            related_count: 0,
            actor: Actor::new("0xbac"),
            category: EventCategory::Decision,
            domain: EVENT_DOMAIN.to_string(),
            severity: Severity::Info,
            timestamp: at(),
        })
        .expect("Failed to log event");

    let history = ledger.history("PR-001").expect("Failed to load history");
    assert_eq!(history.len(), 2);
    assert_eq!(history[1].kind, EntryKind::Event);
    assert_eq!(history[1].status, None);
    assert_eq!(history[1].payload["category"], "decision");
    assert!(history[0].id < history[1].id);
}

fn hold(ledger: &Ledger, procurement_id: &str) {
    ledger
        .update_status(&held_update(procurement_id, Phase::PreProcurementConference))
        .expect("Failed to record held conference");
}

fn held_update(procurement_id: &str, expected_phase: Phase) -> StatusUpdate {
    StatusUpdate {
        procurement_id: procurement_id.to_string(),
        title: "Office Supplies".to_string(),
        expected: expect(expected_phase, &[Status::PrSubmitted]),
        status: Status::PreProcurementConferenceHeld,
        phase: Phase::PreProcurementConference,
        actor: Actor::new("0xbac"),
        timestamp: at(),
    }
}

#[test]
fn test_status_update_from_other_phase_is_rejected() {
    let (_temp_file, ledger) = create_test_ledger();
    create(&ledger, "PR-001");

    let result = ledger.update_status(&StatusUpdate {
        procurement_id: "PR-001".to_string(),
        title: "Office Supplies".to_string(),
        expected: expect(Phase::PreBidConference, &[Status::BiddingDocumentsPublished]),
        status: Status::PreBidConferenceSkipped,
        phase: Phase::BidOpening,
        actor: Actor::new("0xbac"),
        timestamp: at(),
    });

    assert_eq!(
        result,
        Err(CollaboratorError::rejected(
            "update_status",
            "procurement 'PR-001' is in Pre-Procurement Conference, not Pre-Bid Conference"
        ))
    );
    let state = ledger
        .procurement("PR-001")
        .expect("Failed to query")
        .expect("Procurement should exist");
    assert_eq!(state.phase, Phase::PreProcurementConference);
    assert_eq!(state.status, Status::PrSubmitted);
}

#[test]
fn test_repeated_decision_is_rejected() {
    let (_temp_file, ledger) = create_test_ledger();
    create(&ledger, "PR-001");
    hold(&ledger, "PR-001");

    let result = ledger.update_status(&held_update("PR-001", Phase::PreProcurementConference));
    assert!(matches!(result, Err(CollaboratorError::Rejected { .. })));
    assert_eq!(
        ledger.history("PR-001").expect("Failed to load history").len(),
        2
    );
}

#[test]
fn test_transition_requires_accepted_status() {
    let (_temp_file, ledger) = create_test_ledger();
    create(&ledger, "PR-001");

    let result = ledger.handle_stage_transition(&StageTransition {
        procurement_id: "PR-001".to_string(),
        title: "Office Supplies".to_string(),
        expected: expect(
            Phase::PreProcurementConference,
            &[Status::PreProcurementConferenceHeld],
        ),
        from_status: Some(Status::PreProcurementConferenceHeld),
        to_status: Status::PreProcurementConferenceCompleted,
        from_phase: Phase::PreProcurementConference,
        to_phase: Phase::BiddingDocuments,
        actor: Actor::new("0xbac"),
        timestamp: at(),
        note: None,
    });

    assert_eq!(
        result,
        Err(CollaboratorError::rejected(
            "handle_stage_transition",
            "procurement 'PR-001' is PR Submitted, expected Pre-Procurement Conference Held"
        ))
    );
}

#[test]
fn test_documents_without_root_are_recorded_only() {
    let (_temp_file, ledger) = create_test_ledger();
    create(&ledger, "PR-001");
    hold(&ledger, "PR-001");

    ledger
        .publish_documents(&batch("PR-001", "/nowhere/minutes.pdf"))
        .expect("Failed to publish");

    let documents = ledger.documents("PR-001").expect("Failed to list");
    assert_eq!(documents.len(), 1);
    assert_eq!(documents[0].stored_path, None);
    assert_eq!(documents[0].submission_date, date(2026, 3, 1));
    assert_eq!(documents[0].participants.as_deref(), Some("BAC members"));
}

#[test]
fn test_documents_for_unexpected_state_are_rejected() {
    let (_temp_file, ledger) = create_test_ledger();
    create(&ledger, "PR-001");

    let result = ledger.publish_documents(&batch("PR-001", "/nowhere/minutes.pdf"));
    assert!(matches!(result, Err(CollaboratorError::Rejected { .. })));
    assert!(ledger
        .documents("PR-001")
        .expect("Failed to list")
        .is_empty());
}

#[test]
fn test_document_root_rejects_path_segments() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let source = temp_dir.path().join("minutes.pdf");
    std::fs::write(&source, b"minutes").expect("Failed to write source");
    let ledger = Ledger::open(temp_dir.path().join("ledger.db"))
        .expect("Failed to open ledger")
        .with_document_root(temp_dir.path().join("documents"));
    create(&ledger, "../PR-001");
    hold(&ledger, "../PR-001");

    let result = ledger.publish_documents(&batch("../PR-001", &source.to_string_lossy()));
    assert!(matches!(result, Err(CollaboratorError::Rejected { .. })));
    assert!(ledger
        .documents("../PR-001")
        .expect("Failed to list")
        .is_empty());

    create(&ledger, "PR-001");
    hold(&ledger, "PR-001");
    ledger
        .publish_documents(&batch("PR-001", &source.to_string_lossy()))
        .expect("Failed to publish");
    assert!(temp_dir
        .path()
        .join("documents/PR-001/pre-procurement-conference/minutes.pdf")
        .exists());
}

#[test]
fn test_rejected_publish_keeps_stored_documents() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let original = temp_dir.path().join("original/minutes.pdf");
    let forged = temp_dir.path().join("forged/minutes.pdf");
    for (path, content) in [(&original, "ORIGINAL"), (&forged, "FORGED")] {
        std::fs::create_dir_all(path.parent().expect("parent")).expect("Failed to create dir");
        std::fs::write(path, content).expect("Failed to write source");
    }
    let ledger = Ledger::open(temp_dir.path().join("ledger.db"))
        .expect("Failed to open ledger")
        .with_document_root(temp_dir.path().join("documents"));
    create(&ledger, "PR-001");
    hold(&ledger, "PR-001");
    ledger
        .publish_documents(&batch("PR-001", &original.to_string_lossy()))
        .expect("Failed to publish");

    // Same phase and file name, expecting a procurement that does not exist yet.
    let mut late = batch("PR-001", &forged.to_string_lossy());
    late.expected = expect(Phase::ProcurementInitiation, &[]);
    let result = ledger.publish_documents(&late);

    assert!(matches!(result, Err(CollaboratorError::Rejected { .. })));
    let stored = temp_dir
        .path()
        .join("documents/PR-001/pre-procurement-conference/minutes.pdf");
    assert_eq!(
        std::fs::read_to_string(&stored).expect("Failed to read stored file"),
        "ORIGINAL"
    );
    assert_eq!(ledger.documents("PR-001").expect("Failed to list").len(), 1);
}

fn batch(procurement_id: &str, source: &str) -> DocumentBatch {
    DocumentBatch {
        procurement_id: procurement_id.to_string(),
        title: "Office Supplies".to_string(),
        expected: expect(
            Phase::PreProcurementConference,
            &[Status::PreProcurementConferenceHeld],
        ),
        phase: Phase::PreProcurementConference,
        status: Status::PreProcurementConferenceCompleted,
        documents: vec![DocumentMetadata {
            document_type: "Minutes of Meeting".to_string(),
            submission_date: date(2026, 3, 1),
            participants: Some("BAC members".to_string()),
            storage_path_segment: "pre-procurement-conference".to_string(),
            file_name: "minutes.pdf".to_string(),
            source_path: source.into(),
        }],
        actor: Actor::new("0xbac"),
        timestamp: at(),
    }
}
