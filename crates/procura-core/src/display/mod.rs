//! Markdown display for outcomes, procurement state and the ledger.
//!
//! Domain types implement [`std::fmt::Display`] directly; collections are
//! wrapped in newtypes so that empty lists render a message instead of
//! nothing. The CLI renders the resulting markdown with termimad and the
//! MCP server returns it as text content.
//!
//! ```text
//! ┌─────────────────┐    ┌─────────────────┐    ┌─────────────────┐
//! │  Domain Models  │    │   Collection    │    │   Formatted     │
//! │ (state, entry,  │───▶│    Newtypes     │───▶│    Output       │
//! │  outcome)       │    │                 │    │  (Terminal/MCP) │
//! └─────────────────┘    └─────────────────┘    └─────────────────┘
//! ```
//!
//! - [`collections`]: `Procurements`, `LedgerEntries`, `StoredDocuments`,
//!   `Stages`
//! - [`results`]: `StageOutcome` and the form view
//! - [`models`]: procurement state, ledger entries, transition rules
//! - [`datetime`]: local time formatting

pub mod collections;
pub mod datetime;
pub mod models;
pub mod results;

pub use collections::{LedgerEntries, Procurements, Stages, StoredDocuments};
pub use datetime::LocalDateTime;
