//! Phase and status catalog.
//!
//! The catalog is an immutable lookup table, defined once, mapping every
//! [`Phase`] and [`Status`] symbol to a small record: display label, ordinal
//! and storage path segment for phases; display label and owning phase for
//! statuses. The enums themselves carry no behavior beyond `Display` and
//! `FromStr`, both of which go through these tables.
//!
//! ```rust
//! use procura_core::catalog::{self, Phase, Status};
//!
//! assert_eq!(catalog::phase(Phase::BidOpening).label, "Bid Opening");
//! assert_eq!(
//!     catalog::phase(Phase::BidOpening).storage_path_segment,
//!     "bid-opening"
//! );
//! assert_eq!(catalog::status(Status::BidsOpened).phase, Phase::BidOpening);
//! assert_eq!(Status::BidsOpened.to_string(), "Bids Opened");
//! ```

mod phase;
mod status;

#[cfg(test)]
mod tests;

pub use phase::Phase;
pub use status::Status;

/// Catalog record for a phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseEntry {
    pub phase: Phase,
    /// Position in the lifecycle, starting at 0
    pub ordinal: u8,
    /// Machine name, matching the serde representation
    pub slug: &'static str,
    /// Human-readable name
    pub label: &'static str,
    /// Directory segment used to organize stored documents
    pub storage_path_segment: &'static str,
}

/// Catalog record for a status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusEntry {
    pub status: Status,
    /// Machine name, matching the serde representation
    pub slug: &'static str,
    /// Human-readable name
    pub label: &'static str,
    /// The phase context this status belongs to
    pub phase: Phase,
}

const fn p(
    phase: Phase,
    ordinal: u8,
    slug: &'static str,
    label: &'static str,
    storage_path_segment: &'static str,
) -> PhaseEntry {
    PhaseEntry {
        phase,
        ordinal,
        slug,
        label,
        storage_path_segment,
    }
}

const fn s(status: Status, slug: &'static str, label: &'static str, phase: Phase) -> StatusEntry {
    StatusEntry {
        status,
        slug,
        label,
        phase,
    }
}

// Indexed by discriminant; the catalog tests pin that.
#[rustfmt::skip]
static PHASES: [PhaseEntry; 14] = [
    p(Phase::ProcurementInitiation, 0, "procurement-initiation", "Procurement Initiation", "pr-initiation"),
    p(Phase::PreProcurementConference, 1, "pre-procurement-conference", "Pre-Procurement Conference", "pre-procurement-conference"),
    p(Phase::BiddingDocuments, 2, "bidding-documents", "Bidding Documents", "bidding-documents"),
    p(Phase::PreBidConference, 3, "pre-bid-conference", "Pre-Bid Conference", "pre-bid-conference"),
    p(Phase::SupplementalBidBulletin, 4, "supplemental-bid-bulletin", "Supplemental/Bid Bulletin", "supplemental-bid-bulletin"),
    p(Phase::BidOpening, 5, "bid-opening", "Bid Opening", "bid-opening"),
    p(Phase::BidEvaluation, 6, "bid-evaluation", "Bid Evaluation", "bid-evaluation"),
    p(Phase::PostQualification, 7, "post-qualification", "Post-Qualification", "post-qualification"),
    p(Phase::BacResolution, 8, "bac-resolution", "BAC Resolution", "bac-resolution"),
    p(Phase::NoticeOfAward, 9, "notice-of-award", "Notice of Award", "notice-of-award"),
    p(Phase::PerformanceBondContractAndPo, 10, "performance-bond-contract-and-po", "Performance Bond, Contract and PO", "performance-bond-contract-po"),
    p(Phase::NoticeToProceed, 11, "notice-to-proceed", "Notice to Proceed", "notice-to-proceed"),
    p(Phase::Monitoring, 12, "monitoring", "Monitoring", "monitoring"),
    p(Phase::Completed, 13, "completed", "Completed", "completed"),
];

#[rustfmt::skip]
static STATUSES: [StatusEntry; 17] = [
    s(Status::PrSubmitted, "pr_submitted", "PR Submitted", Phase::ProcurementInitiation),
    s(Status::PreProcurementConferenceHeld, "pre_procurement_conference_held", "Pre-Procurement Conference Held", Phase::PreProcurementConference),
    s(Status::PreProcurementConferenceSkipped, "pre_procurement_conference_skipped", "Pre-Procurement Conference Skipped", Phase::PreProcurementConference),
    s(Status::PreProcurementConferenceCompleted, "pre_procurement_conference_completed", "Pre-Procurement Conference Completed", Phase::PreProcurementConference),
    s(Status::BiddingDocumentsPublished, "bidding_documents_published", "Bidding Documents Published", Phase::BiddingDocuments),
    s(Status::PreBidConferenceHeld, "pre_bid_conference_held", "Pre-Bid Conference Held", Phase::PreBidConference),
    s(Status::PreBidConferenceSkipped, "pre_bid_conference_skipped", "Pre-Bid Conference Skipped", Phase::PreBidConference),
    s(Status::PreBidConferenceCompleted, "pre_bid_conference_completed", "Pre-Bid Conference Completed", Phase::PreBidConference),
    s(Status::BulletinPublished, "bulletin_published", "Supplemental/Bid Bulletin Published", Phase::SupplementalBidBulletin),
    s(Status::BidsOpened, "bids_opened", "Bids Opened", Phase::BidOpening),
    s(Status::BidsEvaluated, "bids_evaluated", "Bids Evaluated", Phase::BidEvaluation),
    s(Status::PostQualificationVerified, "post_qualification_verified", "Post-Qualification Verified", Phase::PostQualification),
    s(Status::ResolutionRecorded, "resolution_recorded", "BAC Resolution Recorded", Phase::BacResolution),
    s(Status::AwardIssued, "award_issued", "Notice of Award Issued", Phase::NoticeOfAward),
    s(Status::ContractSigned, "contract_signed", "Performance Bond, Contract and PO Recorded", Phase::PerformanceBondContractAndPo),
    s(Status::NoticeToProceedIssued, "notice_to_proceed_issued", "Notice to Proceed Issued", Phase::NoticeToProceed),
    s(Status::MonitoringCompleted, "monitoring_completed", "Monitoring Completed", Phase::Monitoring),
];

/// Looks up the catalog record for a phase.
pub fn phase(phase: Phase) -> &'static PhaseEntry {
    &PHASES[phase as usize]
}

/// Looks up the catalog record for a status.
pub fn status(status: Status) -> &'static StatusEntry {
    &STATUSES[status as usize]
}

/// All phases in lifecycle order.
pub fn phases() -> &'static [PhaseEntry] {
    &PHASES
}

/// All statuses in declaration order.
pub fn statuses() -> &'static [StatusEntry] {
    &STATUSES
}

/// Lifecycle position of a phase.
pub fn ordinal(of: Phase) -> u8 {
    phase(of).ordinal
}

/// Finds a phase by slug, storage path segment or label (case-insensitive).
pub fn find_phase(name: &str) -> Option<&'static PhaseEntry> {
    let name = name.trim();
    PHASES.iter().find(|entry| {
        entry.slug.eq_ignore_ascii_case(name)
            || entry.storage_path_segment.eq_ignore_ascii_case(name)
            || entry.label.eq_ignore_ascii_case(name)
    })
}

/// Finds a status by slug or label (case-insensitive).
pub fn find_status(name: &str) -> Option<&'static StatusEntry> {
    let name = name.trim();
    STATUSES
        .iter()
        .find(|entry| entry.slug.eq_ignore_ascii_case(name) || entry.label.eq_ignore_ascii_case(name))
}

/// Checks that both tables are indexed by discriminant and that phase
/// ordinals follow table order.
pub(crate) fn check_integrity() -> Result<(), String> {
    for (index, entry) in PHASES.iter().enumerate() {
        if entry.phase as usize != index || usize::from(entry.ordinal) != index {
            return Err(format!("phase table out of order at '{}'", entry.slug));
        }
    }
    for (index, entry) in STATUSES.iter().enumerate() {
        if entry.status as usize != index {
            return Err(format!("status table out of order at '{}'", entry.slug));
        }
    }
    Ok(())
}
