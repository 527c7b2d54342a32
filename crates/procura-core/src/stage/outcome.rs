//! Result value returned by every stage handler.

use serde::{Deserialize, Serialize};

use crate::catalog::Phase;

/// Outcome of a stage handler, serialized as
/// `{"success": bool, "message": string, "nextPhase"?: string}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StageOutcome {
    pub success: bool,
    pub message: String,
    /// Label of the phase the procurement moved to, when it moved
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_phase: Option<String>,
}

impl StageOutcome {
    /// Successful outcome that leaves the procurement in its phase.
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            next_phase: None,
        }
    }

    /// Successful outcome that moved the procurement to `next`.
    pub fn advanced(message: impl Into<String>, next: Phase) -> Self {
        Self {
            success: true,
            message: message.into(),
            next_phase: Some(next.to_string()),
        }
    }

    /// Failed outcome.
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            next_phase: None,
        }
    }
}
