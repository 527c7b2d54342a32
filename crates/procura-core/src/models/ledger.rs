//! Rows of the local ledger.

use std::str::FromStr;

use jiff::{civil::Date, Timestamp};
use serde::{Deserialize, Serialize};

use crate::catalog::{Phase, Status};

/// Kind of an append-only ledger entry, one per collaborator call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    StatusUpdate,
    Event,
    Documents,
    Transition,
    Notification,
}

impl EntryKind {
    /// Convert to database string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryKind::StatusUpdate => "status_update",
            EntryKind::Event => "event",
            EntryKind::Documents => "documents",
            EntryKind::Transition => "transition",
            EntryKind::Notification => "notification",
        }
    }
}

impl FromStr for EntryKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "status_update" => Ok(EntryKind::StatusUpdate),
            "event" => Ok(EntryKind::Event),
            "documents" => Ok(EntryKind::Documents),
            "transition" => Ok(EntryKind::Transition),
            "notification" => Ok(EntryKind::Notification),
            _ => Err(format!("Invalid ledger entry kind: {s}")),
        }
    }
}

/// One append-only audit entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerEntry {
    /// Sequence number, increasing in recording order
    pub id: u64,
    pub procurement_id: String,
    pub kind: EntryKind,
    pub phase: Phase,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<Status>,
    pub actor: String,
    /// One-line human summary
    pub summary: String,
    /// The full record as passed to the collaborator
    pub payload: serde_json::Value,
    pub recorded_at: Timestamp,
}

/// A document published for a procurement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredDocument {
    pub id: u64,
    pub procurement_id: String,
    pub phase: Phase,
    pub document_type: String,
    pub file_name: String,
    /// Location under the document root, when files are copied
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stored_path: Option<String>,
    pub submission_date: Date,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub participants: Option<String>,
    pub recorded_at: Timestamp,
}
