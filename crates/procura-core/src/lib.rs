//! Core library for the Procura procurement tracker.
//!
//! A procurement moves through an ordered sequence of phases, from the
//! purchase request to contract monitoring. Each legal move is a stage
//! handler declared in the [`transitions::TransitionTable`]; running a
//! handler records status changes, events, documents and notifications
//! through the collaborator traits in [`services`]. The [`ledger::Ledger`]
//! implements those traits on a local SQLite file.
//!
//! # Layers
//!
//! - [`catalog`]: phase and status symbols with their labels and storage
//!   path segments
//! - [`transitions`]: the declarative transition table, validated at startup
//! - [`stage`]: decision and upload handlers plus the form read path
//! - [`ledger`]: SQLite audit trail, procurement state and document store
//! - [`workflow`]: async facade used by the CLI and the MCP server
//! - [`display`]: markdown rendering of outcomes, states and ledger entries
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use procura_core::{params::UploadRequest, Actor, HandlerId, WorkflowBuilder};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let workflow = WorkflowBuilder::new()
//!     .with_database_path(Some("ledger.db"))
//!     .with_document_root(Some("documents"))
//!     .build()
//!     .await?;
//!
//! let outcome = workflow
//!     .upload(
//!         HandlerId::Initiation,
//!         Actor::new("end-user-unit"),
//!         &UploadRequest {
//!             procurement_id: "PR-001".to_string(),
//!             procurement_title: "Office Supplies".to_string(),
//!             ..Default::default()
//!         },
//!     )
//!     .await?;
//! assert_eq!(outcome.next_phase.as_deref(), Some("Pre-Procurement Conference"));
//! # Ok(())
//! # }
//! ```

pub mod catalog;
pub mod display;
pub mod error;
pub mod ledger;
pub mod models;
pub mod params;
pub mod services;
pub mod stage;
pub mod transitions;
pub mod workflow;

// Re-export commonly used types
pub use catalog::{Phase, Status};
pub use display::{LedgerEntries, LocalDateTime, Procurements, Stages, StoredDocuments};
pub use error::{CollaboratorError, ProcurementError, Result};
pub use ledger::Ledger;
pub use models::{Actor, LedgerEntry, ProcurementState, RequestContext, StoredDocument};
pub use stage::{FormView, StageOutcome};
pub use transitions::{HandlerId, TransitionRule, TransitionTable};
pub use workflow::{Workflow, WorkflowBuilder};
