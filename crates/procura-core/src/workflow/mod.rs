//! High-level async API over the stage handlers and the local ledger.
//!
//! [`Workflow`] is what the CLI and the MCP server talk to. It resolves a
//! [`HandlerId`] to its [`TransitionRule`], then runs the synchronous stage
//! handler on a blocking thread with the ledger as collaborator:
//!
//! ```text
//! ┌─────────────────┐    ┌─────────────────┐    ┌─────────────────┐
//! │    Workflow     │    │  Stage handler  │    │     Ledger      │
//! │  (async, rule   │───▶│ (decision or    │───▶│ (collaborator   │
//! │   lookup)       │    │  upload)        │    │  traits)        │
//! └─────────────────┘    └─────────────────┘    └─────────────────┘
//! ```
//!
//! The ledger is opened per call, so a `Workflow` holds only paths and the
//! transition table.
//!
//! ```rust,no_run
//! use procura_core::{params::DecisionRequest, Actor, HandlerId, WorkflowBuilder};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let workflow = WorkflowBuilder::new()
//!     .with_database_path(Some("ledger.db"))
//!     .build()
//!     .await?;
//!
//! let outcome = workflow
//!     .decide(
//!         HandlerId::PreProcurementDecision,
//!         Actor::new("bac-secretariat"),
//!         &DecisionRequest {
//!             procurement_id: "PR-001".to_string(),
//!             procurement_title: "Office Supplies".to_string(),
//!             conference_held: true,
//!         },
//!     )
//!     .await?;
//! println!("{outcome}");
//! # Ok(())
//! # }
//! ```

use std::path::{Path, PathBuf};

use log::error;
use tokio::task;

use crate::{
    error::{ProcurementError, Result},
    ledger::Ledger,
    models::{Actor, LedgerEntry, ProcurementFilter, ProcurementState, RequestContext, StoredDocument},
    params::{DecisionRequest, ListProcurements, ProcurementRef, StageFormRequest, UploadRequest},
    services::Collaborators,
    stage::{handle_decision, handle_upload, show_stage_form, FormView, StageOutcome},
    transitions::{HandlerId, TransitionRule, TransitionTable},
};

pub mod builder;


pub use builder::WorkflowBuilder;

/// Main entry point for driving procurements through their phases.
#[derive(Debug, Clone)]
pub struct Workflow {
    ledger_path: PathBuf,
    document_root: PathBuf,
    table: TransitionTable,
}

impl Workflow {
    pub(crate) fn new(ledger_path: PathBuf, document_root: PathBuf, table: TransitionTable) -> Self {
        Self {
            ledger_path,
            document_root,
            table,
        }
    }

    pub fn ledger_path(&self) -> &Path {
        &self.ledger_path
    }

    pub fn document_root(&self) -> &Path {
        &self.document_root
    }

    /// Runs a decision handler ("was the conference held?").
    ///
    /// # Errors
    ///
    /// Returns `ProcurementError::InvalidInput` if `handler` is not a decision
    /// handler. Everything else, including a ledger that cannot be opened,
    /// is reported through the returned [`StageOutcome`].
    pub async fn decide(
        &self,
        handler: HandlerId,
        actor: Actor,
        request: &DecisionRequest,
    ) -> Result<StageOutcome> {
        let rule = *self.rule(handler)?;
        if !rule.is_decision() {
            return Err(ProcurementError::invalid_input("handler")
                .with_reason(format!("'{handler}' is not a decision handler")));
        }

        let ctx = RequestContext::now(actor);
        let request = request.clone();
        let (ledger_path, document_root) = self.paths();

        task::spawn_blocking(move || match open_ledger(&ledger_path, document_root) {
            Ok(ledger) => handle_decision(
                &rule,
                Collaborators::new(&ledger, &ledger),
                &ctx,
                &request,
            ),
            Err(e) => {
                error!("Cannot open ledger for '{handler}': {e}");
                StageOutcome::failure(format!(
                    "Failed to process {} decision: {e}",
                    rule.from_phase
                ))
            }
        })
        .await
        .map_err(join_error)
    }

    /// Runs a document upload handler.
    ///
    /// # Errors
    ///
    /// Returns `ProcurementError::InvalidInput` if `handler` is not an upload
    /// handler.
    pub async fn upload(
        &self,
        handler: HandlerId,
        actor: Actor,
        request: &UploadRequest,
    ) -> Result<StageOutcome> {
        let rule = *self.rule(handler)?;
        if rule.is_decision() {
            return Err(ProcurementError::invalid_input("handler")
                .with_reason(format!("'{handler}' is not an upload handler")));
        }

        let ctx = RequestContext::now(actor);
        let request = request.clone();
        let (ledger_path, document_root) = self.paths();

        task::spawn_blocking(move || match open_ledger(&ledger_path, document_root) {
            Ok(ledger) => handle_upload(
                &rule,
                Collaborators::new(&ledger, &ledger),
                &ctx,
                &request,
            ),
            Err(e) => {
                error!("Cannot open ledger for '{handler}': {e}");
                StageOutcome::failure(format!(
                    "Failed to process {} documents: {e}",
                    rule.from_phase
                ))
            }
        })
        .await
        .map_err(join_error)
    }

    /// Shows the form bound to a stage handler, or a redirect when the
    /// procurement is not where the handler expects it.
    pub async fn stage_form(&self, params: &StageFormRequest) -> Result<FormView> {
        let rule = *self.rule(params.handler)?;
        let procurement_id = params.procurement_id.clone();
        let (ledger_path, document_root) = self.paths();

        task::spawn_blocking(move || {
            let ledger = open_ledger(&ledger_path, document_root)?;
            Ok(show_stage_form(&rule, &ledger, procurement_id.as_deref()))
        })
        .await
        .map_err(join_error)?
    }

    /// Retrieves the current state of a procurement.
    pub async fn procurement(&self, params: &ProcurementRef) -> Result<Option<ProcurementState>> {
        let procurement_id = params.procurement_id.trim().to_string();
        self.with_ledger(move |ledger| ledger.procurement(&procurement_id))
            .await
    }

    /// Lists procurements, optionally restricted to one phase or a title
    /// fragment.
    pub async fn list_procurements(
        &self,
        params: &ListProcurements,
    ) -> Result<Vec<ProcurementState>> {
        let filter = ProcurementFilter {
            phase: params.phase,
            title_contains: params.title_contains.clone(),
        };
        self.with_ledger(move |ledger| ledger.list_procurements(&filter))
            .await
    }

    /// Audit trail of a procurement.
    ///
    /// # Errors
    ///
    /// Returns `ProcurementError::ProcurementNotFound` if nothing was ever
    /// recorded for the identifier.
    pub async fn history(&self, params: &ProcurementRef) -> Result<Vec<LedgerEntry>> {
        let procurement_id = params.procurement_id.trim().to_string();
        self.with_ledger(move |ledger| {
            let entries = ledger.history(&procurement_id)?;
            if entries.is_empty() && ledger.procurement(&procurement_id)?.is_none() {
                return Err(ProcurementError::ProcurementNotFound { id: procurement_id });
            }
            Ok(entries)
        })
        .await
    }

    /// Documents published for a procurement.
    pub async fn documents(&self, params: &ProcurementRef) -> Result<Vec<StoredDocument>> {
        let procurement_id = params.procurement_id.trim().to_string();
        self.with_ledger(move |ledger| ledger.documents(&procurement_id))
            .await
    }

    /// All stage handlers in lifecycle order.
    pub fn stages(&self) -> &[TransitionRule] {
        self.table.rules()
    }

    /// Stage handlers that may act on a procurement in `state` (or on a new
    /// procurement when `state` is `None`).
    pub fn next_stages(&self, state: Option<&ProcurementState>) -> Vec<TransitionRule> {
        self.table
            .available_for(state)
            .into_iter()
            .copied()
            .collect()
    }

    fn rule(&self, handler: HandlerId) -> Result<&TransitionRule> {
        self.table.rule(handler).ok_or_else(|| {
            ProcurementError::invalid_input("handler")
                .with_reason(format!("no stage handler '{handler}' in the transition table"))
        })
    }

    fn paths(&self) -> (PathBuf, PathBuf) {
        (self.ledger_path.clone(), self.document_root.clone())
    }

    async fn with_ledger<T, F>(&self, f: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&Ledger) -> Result<T> + Send + 'static,
    {
        let (ledger_path, document_root) = self.paths();
        task::spawn_blocking(move || {
            let ledger = open_ledger(&ledger_path, document_root)?;
            f(&ledger)
        })
        .await
        .map_err(join_error)?
    }
}

fn open_ledger(path: &Path, document_root: PathBuf) -> Result<Ledger> {
    Ok(Ledger::open(path)?.with_document_root(document_root))
}

fn join_error(e: task::JoinError) -> ProcurementError {
    ProcurementError::Configuration {
        message: format!("Task join error: {e}"),
    }
}
