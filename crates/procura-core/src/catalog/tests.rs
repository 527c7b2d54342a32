use super::*;

#[test]
fn test_tables_are_indexed_by_discriminant() {
    assert_eq!(check_integrity(), Ok(()));
    assert_eq!(phases().len(), 14);
    assert_eq!(statuses().len(), 17);
}

#[test]
fn test_phase_labels_and_segments() {
    let entry = phase(Phase::PreProcurementConference);
    assert_eq!(entry.label, "Pre-Procurement Conference");
    assert_eq!(entry.storage_path_segment, "pre-procurement-conference");
    assert_eq!(phase(Phase::ProcurementInitiation).storage_path_segment, "pr-initiation");
    assert_eq!(Phase::BiddingDocuments.to_string(), "Bidding Documents");
}

#[test]
fn test_status_belongs_to_one_phase() {
    assert_eq!(
        status(Status::PreProcurementConferenceHeld).label,
        "Pre-Procurement Conference Held"
    );
    assert_eq!(
        status(Status::PreProcurementConferenceSkipped).phase,
        Phase::PreProcurementConference
    );
    assert_eq!(status(Status::MonitoringCompleted).phase, Phase::Monitoring);
}

#[test]
fn test_ordinals_follow_lifecycle() {
    assert!(ordinal(Phase::ProcurementInitiation) < ordinal(Phase::BidOpening));
    assert!(ordinal(Phase::Monitoring) < ordinal(Phase::Completed));
}

#[test]
fn test_parse_phase_by_slug_segment_or_label() {
    assert_eq!("bid-opening".parse::<Phase>(), Ok(Phase::BidOpening));
    assert_eq!("pr-initiation".parse::<Phase>(), Ok(Phase::ProcurementInitiation));
    assert_eq!("bac resolution".parse::<Phase>(), Ok(Phase::BacResolution));
    assert!("tendering".parse::<Phase>().is_err());
}

#[test]
fn test_parse_status() {
    assert_eq!("bids_opened".parse::<Status>(), Ok(Status::BidsOpened));
    assert_eq!(
        "Pre-Bid Conference Skipped".parse::<Status>(),
        Ok(Status::PreBidConferenceSkipped)
    );
    assert!("lost".parse::<Status>().is_err());
}

#[test]
fn test_slugs_match_serde_names() {
    for entry in phases() {
        let json = serde_json::to_string(&entry.phase).expect("serialize phase");
        assert_eq!(json, format!("\"{}\"", entry.slug));
    }
    for entry in statuses() {
        let json = serde_json::to_string(&entry.status).expect("serialize status");
        assert_eq!(json, format!("\"{}\"", entry.slug));
    }
}
