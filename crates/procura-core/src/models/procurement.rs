//! Current procurement state as reported by the status reader.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use crate::catalog::{Phase, Status};

/// The current phase and status of a procurement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcurementState {
    /// External procurement identifier (e.g. `PR-001`)
    pub procurement_id: String,

    /// Procurement title
    pub title: String,

    /// Phase the procurement is currently in
    pub phase: Phase,

    /// Last recorded status
    pub status: Status,

    /// Timestamp of the last recorded change (UTC)
    pub updated_at: Timestamp,

    /// Actor address of the last recorded change
    pub updated_by: String,
}

impl ProcurementState {
    /// Whether the procurement has reached the final phase.
    pub fn is_completed(&self) -> bool {
        self.phase == Phase::Completed
    }
}

/// Filter options for listing procurements.
#[derive(Debug, Clone, Default)]
pub struct ProcurementFilter {
    /// Only procurements currently in this phase
    pub phase: Option<Phase>,

    /// Case-insensitive partial match on the title
    pub title_contains: Option<String>,
}

impl ProcurementFilter {
    /// Filter for a single phase.
    pub fn for_phase(phase: Phase) -> Self {
        Self {
            phase: Some(phase),
            ..Default::default()
        }
    }
}
