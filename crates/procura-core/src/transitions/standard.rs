//! The built-in procurement lifecycle.

use super::{DocumentSlot, HandlerId, StageKind, TransitionRule};
use crate::catalog::{Phase, Status};

const fn slot(document_type: &'static str) -> DocumentSlot {
    DocumentSlot { document_type }
}

const CONFERENCE_SLOTS: &[DocumentSlot] = &[slot("Minutes of Meeting"), slot("Attendance Sheet")];

pub(super) static RULES: &[TransitionRule] = &[
    TransitionRule {
        handler: HandlerId::Initiation,
        from_phase: Phase::ProcurementInitiation,
        from_statuses: &[],
        to_phase: Phase::PreProcurementConference,
        kind: StageKind::Upload {
            completed: Status::PrSubmitted,
            slots: &[
                slot("Purchase Request"),
                slot("Annual Procurement Plan"),
                slot("Market Study"),
            ],
        },
    },
    TransitionRule {
        handler: HandlerId::PreProcurementDecision,
        from_phase: Phase::PreProcurementConference,
        from_statuses: &[Status::PrSubmitted],
        to_phase: Phase::PreProcurementConference,
        kind: StageKind::Decision {
            held: Status::PreProcurementConferenceHeld,
            skipped: Status::PreProcurementConferenceSkipped,
            skip_to: Phase::BiddingDocuments,
        },
    },
    TransitionRule {
        handler: HandlerId::PreProcurementDocuments,
        from_phase: Phase::PreProcurementConference,
        from_statuses: &[Status::PreProcurementConferenceHeld],
        to_phase: Phase::BiddingDocuments,
        kind: StageKind::Upload {
            completed: Status::PreProcurementConferenceCompleted,
            slots: CONFERENCE_SLOTS,
        },
    },
    TransitionRule {
        handler: HandlerId::BiddingDocuments,
        from_phase: Phase::BiddingDocuments,
        from_statuses: &[
            Status::PreProcurementConferenceCompleted,
            Status::PreProcurementConferenceSkipped,
        ],
        to_phase: Phase::PreBidConference,
        kind: StageKind::Upload {
            completed: Status::BiddingDocumentsPublished,
            slots: &[slot("Bidding Documents"), slot("Invitation to Bid")],
        },
    },
    TransitionRule {
        handler: HandlerId::PreBidDecision,
        from_phase: Phase::PreBidConference,
        from_statuses: &[Status::BiddingDocumentsPublished],
        to_phase: Phase::PreBidConference,
        kind: StageKind::Decision {
            held: Status::PreBidConferenceHeld,
            skipped: Status::PreBidConferenceSkipped,
            skip_to: Phase::BidOpening,
        },
    },
    TransitionRule {
        handler: HandlerId::PreBidDocuments,
        from_phase: Phase::PreBidConference,
        from_statuses: &[Status::PreBidConferenceHeld],
        to_phase: Phase::SupplementalBidBulletin,
        kind: StageKind::Upload {
            completed: Status::PreBidConferenceCompleted,
            slots: CONFERENCE_SLOTS,
        },
    },
    TransitionRule {
        handler: HandlerId::SupplementalBulletin,
        from_phase: Phase::SupplementalBidBulletin,
        from_statuses: &[Status::PreBidConferenceCompleted],
        to_phase: Phase::BidOpening,
        kind: StageKind::Upload {
            completed: Status::BulletinPublished,
            slots: &[slot("Supplemental/Bid Bulletin")],
        },
    },
    TransitionRule {
        handler: HandlerId::BidOpening,
        from_phase: Phase::BidOpening,
        from_statuses: &[Status::BulletinPublished, Status::PreBidConferenceSkipped],
        to_phase: Phase::BidEvaluation,
        kind: StageKind::Upload {
            completed: Status::BidsOpened,
            slots: &[slot("Abstract of Bids as Read"), slot("Minutes of Bid Opening")],
        },
    },
    TransitionRule {
        handler: HandlerId::BidEvaluation,
        from_phase: Phase::BidEvaluation,
        from_statuses: &[Status::BidsOpened],
        to_phase: Phase::PostQualification,
        kind: StageKind::Upload {
            completed: Status::BidsEvaluated,
            slots: &[
                slot("Bid Evaluation Report"),
                slot("Abstract of Bids as Calculated"),
            ],
        },
    },
    TransitionRule {
        handler: HandlerId::PostQualification,
        from_phase: Phase::PostQualification,
        from_statuses: &[Status::BidsEvaluated],
        to_phase: Phase::BacResolution,
        kind: StageKind::Upload {
            completed: Status::PostQualificationVerified,
            slots: &[slot("Post-Qualification Report")],
        },
    },
    TransitionRule {
        handler: HandlerId::BacResolution,
        from_phase: Phase::BacResolution,
        from_statuses: &[Status::PostQualificationVerified],
        to_phase: Phase::NoticeOfAward,
        kind: StageKind::Upload {
            completed: Status::ResolutionRecorded,
            slots: &[slot("BAC Resolution")],
        },
    },
    TransitionRule {
        handler: HandlerId::NoticeOfAward,
        from_phase: Phase::NoticeOfAward,
        from_statuses: &[Status::ResolutionRecorded],
        to_phase: Phase::PerformanceBondContractAndPo,
        kind: StageKind::Upload {
            completed: Status::AwardIssued,
            slots: &[slot("Notice of Award")],
        },
    },
    TransitionRule {
        handler: HandlerId::PerformanceBond,
        from_phase: Phase::PerformanceBondContractAndPo,
        from_statuses: &[Status::AwardIssued],
        to_phase: Phase::NoticeToProceed,
        kind: StageKind::Upload {
            completed: Status::ContractSigned,
            slots: &[
                slot("Performance Bond"),
                slot("Contract"),
                slot("Purchase Order"),
            ],
        },
    },
    TransitionRule {
        handler: HandlerId::NoticeToProceed,
        from_phase: Phase::NoticeToProceed,
        from_statuses: &[Status::ContractSigned],
        to_phase: Phase::Monitoring,
        kind: StageKind::Upload {
            completed: Status::NoticeToProceedIssued,
            slots: &[slot("Notice to Proceed")],
        },
    },
    TransitionRule {
        handler: HandlerId::Monitoring,
        from_phase: Phase::Monitoring,
        from_statuses: &[Status::NoticeToProceedIssued],
        to_phase: Phase::Completed,
        kind: StageKind::Upload {
            completed: Status::MonitoringCompleted,
            slots: &[
                slot("Inspection and Acceptance Report"),
                slot("Certificate of Completion"),
            ],
        },
    },
];
