//! Collaborator contracts.
//!
//! Stage handlers never persist anything themselves. They build records and
//! forward them to these collaborators, which own the audit trail, the
//! document store and notification delivery. Each call is expected to be
//! individually atomic; a handler stops at the first `Err` and does not
//! attempt to undo earlier calls.
//!
//! [`crate::ledger::Ledger`] implements all three traits on top of SQLite.

use crate::{
    error::CollaboratorError,
    models::{
        DocumentBatch, EventEntry, ProcurementState, StageNotification, StageTransition,
        StatusUpdate,
    },
};

/// Result of a collaborator call.
pub type CallResult<T = ()> = Result<T, CollaboratorError>;

/// The audit-trail and document-store collaborator.
pub trait BlockchainService {
    /// Records a new status for a procurement.
    fn update_status(&self, update: &StatusUpdate) -> CallResult;

    /// Appends an event to the procurement's log.
    fn log_event(&self, event: &EventEntry) -> CallResult;

    /// Publishes a batch of documents; an empty batch is legal.
    fn publish_documents(&self, batch: &DocumentBatch) -> CallResult;

    /// Advances the procurement's phase and records the final status of the
    /// phase being left, in one step.
    fn handle_stage_transition(&self, transition: &StageTransition) -> CallResult;
}

/// Stakeholder notification collaborator.
pub trait NotificationService {
    fn notify_stage_update(&self, notification: &StageNotification) -> CallResult;
}

/// Read side used by the stage form path.
pub trait StatusReader {
    /// Current state of a procurement, `None` when it does not exist.
    fn procurement_state(&self, procurement_id: &str) -> CallResult<Option<ProcurementState>>;
}

/// The pair of write collaborators a stage handler talks to.
#[derive(Clone, Copy)]
pub struct Collaborators<'a> {
    pub chain: &'a dyn BlockchainService,
    pub notifier: &'a dyn NotificationService,
}

impl<'a> Collaborators<'a> {
    pub fn new(chain: &'a dyn BlockchainService, notifier: &'a dyn NotificationService) -> Self {
        Self { chain, notifier }
    }
}
