//! Procurement phase symbols.

use std::{fmt, str::FromStr};

#[cfg(feature = "schema")]
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::{find_phase, phase};

/// An ordered, named stage in the procurement lifecycle.
///
/// Variants are plain symbols. Labels, ordering and storage path segments
/// live in the catalog table and are reached through [`super::phase`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[serde(rename_all = "kebab-case")]
pub enum Phase {
    ProcurementInitiation,
    PreProcurementConference,
    BiddingDocuments,
    PreBidConference,
    SupplementalBidBulletin,
    BidOpening,
    BidEvaluation,
    PostQualification,
    BacResolution,
    NoticeOfAward,
    PerformanceBondContractAndPo,
    NoticeToProceed,
    Monitoring,
    Completed,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(phase(*self).label)
    }
}

impl FromStr for Phase {
    type Err = String;

    /// Accepts the slug (`bid-opening`), the storage path segment or the
    /// display label, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        find_phase(s)
            .map(|entry| entry.phase)
            .ok_or_else(|| format!("Invalid phase: {s}"))
    }
}
