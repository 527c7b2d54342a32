//! Collaborator implementations backed by the ledger.

use std::{fs, path::PathBuf};

use log::{debug, info, warn};
use rusqlite::Connection;

use super::{
    entry_queries::{append_entry, insert_document, NewEntry},
    files::store_document,
    procurement_queries::{find_state, insert_state, update_state},
    Ledger,
};
use crate::{
    error::{CollaboratorError, CollaboratorResultExt, DatabaseResultExt, Result},
    models::{
        DocumentBatch, EntryKind, EventEntry, OutcomeTag, ProcurementState, StageNotification,
        StageTransition, StatusUpdate,
    },
    services::{BlockchainService, CallResult, NotificationService, StatusReader},
};

/// Actor recorded on notification entries, which carry no actor of their own.
const NOTIFIER: &str = "notifier";

impl BlockchainService for Ledger {
    fn update_status(&self, update: &StatusUpdate) -> CallResult {
        self.record_status(update).for_operation("update_status")
    }

    fn log_event(&self, event: &EventEntry) -> CallResult {
        self.record_event(event).for_operation("log_event")
    }

    fn publish_documents(&self, batch: &DocumentBatch) -> CallResult {
        self.record_documents(batch)
            .for_operation("publish_documents")
    }

    fn handle_stage_transition(&self, transition: &StageTransition) -> CallResult {
        self.record_transition(transition)
            .for_operation("handle_stage_transition")
    }
}

impl NotificationService for Ledger {
    fn notify_stage_update(&self, notification: &StageNotification) -> CallResult {
        self.record_notification(notification)
            .for_operation("notify_stage_update")
    }
}

impl StatusReader for Ledger {
    fn procurement_state(&self, procurement_id: &str) -> CallResult<Option<ProcurementState>> {
        find_state(&self.connection, procurement_id).for_operation("procurement_state")
    }
}

impl Ledger {
    /// Applies a status to a procurement that is in the update's expected
    /// state.
    fn record_status(&self, update: &StatusUpdate) -> Result<()> {
        let tx = self
            .connection
            .unchecked_transaction()
            .db_context("Failed to begin transaction")?;

        let current = find_state(&tx, &update.procurement_id)?;
        if let Err(reason) = update.expected.check(&update.procurement_id, current.as_ref()) {
            return Err(rejected("update_status", reason));
        }
        // A status update never creates a procurement.
        let Some(current) = current.filter(|_| !update.expected.creates()) else {
            return Err(rejected(
                "update_status",
                format!("procurement '{}' does not exist", update.procurement_id),
            ));
        };

        update_state(
            &tx,
            &ProcurementState {
                procurement_id: current.procurement_id,
                title: update.title.clone(),
                phase: update.phase,
                status: update.status,
                updated_at: update.timestamp,
                updated_by: update.actor.address().to_string(),
            },
        )?;
        append_entry(
            &tx,
            NewEntry {
                procurement_id: &update.procurement_id,
                kind: EntryKind::StatusUpdate,
                phase: update.phase,
                status: Some(update.status),
                actor: update.actor.address(),
                summary: format!("Status set to {}", update.status),
                record: update,
                recorded_at: update.timestamp,
            },
        )?;

        tx.commit().db_context("Failed to commit transaction")?;
        debug!(
            "Procurement '{}' is now {} ({})",
            update.procurement_id, update.status, update.phase
        );
        Ok(())
    }

    fn record_event(&self, event: &EventEntry) -> Result<()> {
        append_entry(
            &self.connection,
            NewEntry {
                procurement_id: &event.procurement_id,
                kind: EntryKind::Event,
                phase: event.phase,
                status: None,
                actor: event.actor.address(),
                summary: event.description.clone(),
                record: event,
                recorded_at: event.timestamp,
            },
        )?;
        Ok(())
    }

    /// Records a document batch for a procurement in the batch's expected
    /// state, copying the files first when a document root is set.
    ///
    /// Files copied before a failure are removed again.
    fn record_documents(&self, batch: &DocumentBatch) -> Result<()> {
        let tx = self
            .connection
            .unchecked_transaction()
            .db_context("Failed to begin transaction")?;

        let current = find_state(&tx, &batch.procurement_id)?;
        if let Err(reason) = batch.expected.check(&batch.procurement_id, current.as_ref()) {
            return Err(rejected("publish_documents", reason));
        }

        let mut stored = Vec::new();
        let result = self
            .insert_batch(&tx, batch, &mut stored)
            .and_then(|()| tx.commit().db_context("Failed to commit transaction"));
        if result.is_err() {
            discard(&stored);
        }
        result
    }

    fn insert_batch(
        &self,
        tx: &Connection,
        batch: &DocumentBatch,
        stored: &mut Vec<PathBuf>,
    ) -> Result<()> {
        for metadata in &batch.documents {
            let stored_path = match self.document_root() {
                Some(root) => {
                    let path = store_document(root, &batch.procurement_id, metadata)?;
                    stored.push(path.clone());
                    Some(path.to_string_lossy().into_owned())
                }
                None => None,
            };
            insert_document(
                tx,
                &batch.procurement_id,
                batch.phase,
                metadata,
                stored_path.as_deref(),
                batch.timestamp,
            )?;
        }

        append_entry(
            tx,
            NewEntry {
                procurement_id: &batch.procurement_id,
                kind: EntryKind::Documents,
                phase: batch.phase,
                status: Some(batch.status),
                actor: batch.actor.address(),
                summary: format!(
                    "{} document(s) published for {}",
                    batch.documents.len(),
                    batch.phase
                ),
                record: batch,
                recorded_at: batch.timestamp,
            },
        )?;
        Ok(())
    }

    /// Moves a procurement to the next phase.
    ///
    /// A creating transition requires the procurement to be absent and
    /// inserts it. Otherwise the procurement must be in the transition's
    /// expected phase with one of its accepted statuses.
    fn record_transition(&self, transition: &StageTransition) -> Result<()> {
        let tx = self
            .connection
            .unchecked_transaction()
            .db_context("Failed to begin transaction")?;

        let current = find_state(&tx, &transition.procurement_id)?;
        if let Err(reason) = transition
            .expected
            .check(&transition.procurement_id, current.as_ref())
        {
            return Err(rejected("handle_stage_transition", reason));
        }

        let next = ProcurementState {
            procurement_id: transition.procurement_id.clone(),
            title: transition.title.clone(),
            phase: transition.to_phase,
            status: transition.to_status,
            updated_at: transition.timestamp,
            updated_by: transition.actor.address().to_string(),
        };
        if current.is_some() {
            update_state(&tx, &next)?;
        } else {
            insert_state(&tx, &next)?;
        }

        append_entry(
            &tx,
            NewEntry {
                procurement_id: &transition.procurement_id,
                kind: EntryKind::Transition,
                phase: transition.to_phase,
                status: Some(transition.to_status),
                actor: transition.actor.address(),
                summary: format!(
                    "Advanced from {} to {}",
                    transition.from_phase, transition.to_phase
                ),
                record: transition,
                recorded_at: transition.timestamp,
            },
        )?;

        tx.commit().db_context("Failed to commit transaction")?;
        Ok(())
    }

    fn record_notification(&self, notification: &StageNotification) -> Result<()> {
        let summary = match (notification.outcome, notification.next_phase) {
            (OutcomeTag::Held, _) => format!("{} held", notification.phase),
            (OutcomeTag::Skipped, Some(next)) => {
                format!("{} skipped, next phase {next}", notification.phase)
            }
            (OutcomeTag::Skipped, None) => format!("{} skipped", notification.phase),
            (OutcomeTag::DocumentsUploaded, Some(next)) => format!(
                "{} document(s) uploaded for {}, next phase {next}",
                notification.document_count, notification.phase
            ),
            (OutcomeTag::DocumentsUploaded, None) => format!(
                "{} document(s) uploaded for {}",
                notification.document_count, notification.phase
            ),
        };

        append_entry(
            &self.connection,
            NewEntry {
                procurement_id: &notification.procurement_id,
                kind: EntryKind::Notification,
                phase: notification.phase,
                status: Some(notification.status),
                actor: NOTIFIER,
                summary: summary.clone(),
                record: notification,
                recorded_at: notification.timestamp,
            },
        )?;

        info!("Notification for '{}': {summary}", notification.procurement_id);
        Ok(())
    }
}

fn rejected(operation: &str, reason: String) -> crate::error::ProcurementError {
    CollaboratorError::rejected(operation, reason).into()
}

fn discard(stored: &[PathBuf]) {
    for path in stored {
        if let Err(e) = fs::remove_file(path) {
            warn!("Failed to remove {} after a failed publish: {e}", path.display());
        }
    }
}
