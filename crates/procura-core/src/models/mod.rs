//! Data models for procurements, transition records and ledger entries.
//!
//! The core never owns a procurement: it reads a [`ProcurementState`]
//! through the status reader collaborator and builds write-once records
//! ([`StatusUpdate`], [`EventEntry`], [`DocumentBatch`], [`StageTransition`],
//! [`StageNotification`]) that are handed to the blockchain and notification
//! collaborators. Display implementations for these models live in
//! [`crate::display::models`].

pub mod context;
pub mod ledger;
pub mod procurement;
pub mod records;


pub use context::{Actor, RequestContext};
pub use ledger::{EntryKind, LedgerEntry, StoredDocument};
pub use procurement::{ProcurementFilter, ProcurementState};
pub use records::{
    DocumentBatch, DocumentMetadata, EventCategory, EventEntry, ExpectedState, OutcomeTag, Severity,
    StageNotification, StageTransition, StatusUpdate, EVENT_DOMAIN,
};
