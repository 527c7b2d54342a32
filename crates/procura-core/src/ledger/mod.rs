//! Local SQLite ledger.
//!
//! The ledger is the default collaborator: it implements
//! [`BlockchainService`](crate::services::BlockchainService),
//! [`NotificationService`](crate::services::NotificationService) and
//! [`StatusReader`](crate::services::StatusReader) on one SQLite file.
//!
//! - `procurements` holds the current phase and status per procurement
//! - `ledger_entries` is an append-only audit trail, one row per collaborator
//!   call, carrying the full record as JSON
//! - `documents` lists published files; with a document root configured the
//!   files themselves are copied to
//!   `<document_root>/<procurement_id>/<storage_path_segment>/<file_name>`
//!
//! Each collaborator call runs in its own transaction.

use std::path::{Path, PathBuf};

use rusqlite::Connection;

use crate::error::{DatabaseResultExt, Result};

mod collaborators;
mod entry_queries;
mod files;
mod migrations;
mod procurement_queries;

/// Ledger connection and operations handler.
pub struct Ledger {
    connection: Connection,
    document_root: Option<PathBuf>,
}

impl Ledger {
    /// Opens (or creates) the ledger at `path` and initializes the schema.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let connection = Connection::open(path).db_context("Failed to open ledger database")?;

        let ledger = Self {
            connection,
            document_root: None,
        };
        ledger.initialize_schema()?;
        Ok(ledger)
    }

    /// Copies published files below `root`.
    pub fn with_document_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.document_root = Some(root.into());
        self
    }

    pub fn document_root(&self) -> Option<&Path> {
        self.document_root.as_deref()
    }
}
