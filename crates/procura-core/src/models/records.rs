//! Write-once records handed to the collaborators.
//!
//! Each struct carries exactly the parameters of one collaborator call. They
//! are built by a stage handler from the rule, the request and the
//! [`RequestContext`](super::RequestContext), and never mutated afterwards.

use std::path::PathBuf;

use jiff::{civil::Date, Timestamp};
use serde::{Deserialize, Serialize};

use super::{Actor, ProcurementState};
use crate::catalog::{Phase, Status};

/// Domain tag attached to every event log entry.
pub const EVENT_DOMAIN: &str = "procurement";

/// Event log category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventCategory {
    /// A decision handler chose a branch
    Decision,
    /// A workflow step (document upload, phase advance) happened
    Workflow,
}

impl EventCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventCategory::Decision => "decision",
            EventCategory::Workflow => "workflow",
        }
    }
}

/// Event log severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Critical,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Critical => "critical",
        }
    }
}

/// Which branch of a stage handler produced a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeTag {
    Held,
    Skipped,
    DocumentsUploaded,
}

impl OutcomeTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutcomeTag::Held => "held",
            OutcomeTag::Skipped => "skipped",
            OutcomeTag::DocumentsUploaded => "documents_uploaded",
        }
    }
}

/// State a procurement must be in for a record to apply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpectedState {
    pub phase: Phase,
    /// Accepted current statuses; empty when the record creates the
    /// procurement
    pub statuses: Vec<Status>,
}

impl ExpectedState {
    pub fn creates(&self) -> bool {
        self.statuses.is_empty()
    }

    /// Checks `current` against the expectation and returns the rejection
    /// reason on mismatch.
    pub fn check(
        &self,
        procurement_id: &str,
        current: Option<&ProcurementState>,
    ) -> std::result::Result<(), String> {
        match (self.creates(), current) {
            (true, None) => Ok(()),
            (true, Some(existing)) => Err(format!(
                "procurement '{procurement_id}' already exists ({})",
                existing.status
            )),
            (false, None) => Err(format!("procurement '{procurement_id}' does not exist")),
            (false, Some(existing)) if existing.phase != self.phase => Err(format!(
                "procurement '{procurement_id}' is in {}, not {}",
                existing.phase, self.phase
            )),
            (false, Some(existing)) if !self.statuses.contains(&existing.status) => {
                let accepted: Vec<String> = self.statuses.iter().map(ToString::to_string).collect();
                Err(format!(
                    "procurement '{procurement_id}' is {}, expected {}",
                    existing.status,
                    accepted.join(" or ")
                ))
            }
            (false, Some(_)) => Ok(()),
        }
    }
}

/// Parameters of `update_status`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusUpdate {
    pub procurement_id: String,
    pub title: String,
    /// State the procurement must be in before the update
    pub expected: ExpectedState,
    /// New status
    pub status: Status,
    /// Phase the procurement is in once the status is applied
    pub phase: Phase,
    pub actor: Actor,
    pub timestamp: Timestamp,
}

/// Parameters of `log_event`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventEntry {
    pub procurement_id: String,
    pub title: String,
    pub phase: Phase,
    /// Free-text description of what happened
    pub description: String,
    /// Number of related items (documents) involved
    pub related_count: usize,
    pub actor: Actor,
    pub category: EventCategory,
    pub domain: String,
    pub severity: Severity,
    pub timestamp: Timestamp,
}

/// Metadata attached to one uploaded file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    /// Document category, as named by the rule's document slot
    pub document_type: String,
    pub submission_date: Date,
    /// Free-text list of participants (attendees, signatories)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub participants: Option<String>,
    /// Storage directory segment of the phase the document belongs to
    pub storage_path_segment: String,
    pub file_name: String,
    /// Where the uploaded file can be read from
    pub source_path: PathBuf,
}

/// Parameters of `publish_documents`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentBatch {
    pub procurement_id: String,
    pub title: String,
    /// State the procurement must be in for the documents to be accepted
    pub expected: ExpectedState,
    pub phase: Phase,
    pub status: Status,
    pub documents: Vec<DocumentMetadata>,
    pub actor: Actor,
    pub timestamp: Timestamp,
}

/// Parameters of `handle_stage_transition`: the transition record.
///
/// `from_status` is `None` only for the transition that creates the
/// procurement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageTransition {
    pub procurement_id: String,
    pub title: String,
    /// State the procurement must be in for the transition to apply
    pub expected: ExpectedState,
    pub from_status: Option<Status>,
    pub to_status: Status,
    pub from_phase: Phase,
    pub to_phase: Phase,
    pub actor: Actor,
    pub timestamp: Timestamp,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// Parameters of `notify_stage_update`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageNotification {
    pub procurement_id: String,
    pub title: String,
    pub phase: Phase,
    pub status: Status,
    pub timestamp: Timestamp,
    pub document_count: usize,
    pub outcome: OutcomeTag,
    pub phase_changed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_phase: Option<Phase>,
}
