//! Procurement status symbols.

use std::{fmt, str::FromStr};

#[cfg(feature = "schema")]
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::{find_status, status};

/// A fine-grained outcome within or at the boundary of a phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[serde(rename_all = "snake_case")]
pub enum Status {
    PrSubmitted,
    PreProcurementConferenceHeld,
    PreProcurementConferenceSkipped,
    PreProcurementConferenceCompleted,
    BiddingDocumentsPublished,
    PreBidConferenceHeld,
    PreBidConferenceSkipped,
    PreBidConferenceCompleted,
    BulletinPublished,
    BidsOpened,
    BidsEvaluated,
    PostQualificationVerified,
    ResolutionRecorded,
    AwardIssued,
    ContractSigned,
    NoticeToProceedIssued,
    MonitoringCompleted,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(status(*self).label)
    }
}

impl FromStr for Status {
    type Err = String;

    /// Accepts the slug (`bids_opened`) or the display label,
    /// case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        find_status(s)
            .map(|entry| entry.status)
            .ok_or_else(|| format!("Invalid status: {s}"))
    }
}
