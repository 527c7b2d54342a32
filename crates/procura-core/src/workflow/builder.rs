//! Builder for creating and configuring Workflow instances.

use std::path::{Path, PathBuf};

use log::debug;
use tokio::task;

use super::Workflow;
use crate::{
    error::{ProcurementError, Result},
    ledger::Ledger,
    transitions::TransitionTable,
};

const XDG_PREFIX: &str = "procura";

/// Builder for creating and configuring Workflow instances.
#[derive(Debug, Clone, Default)]
pub struct WorkflowBuilder {
    database_path: Option<PathBuf>,
    document_root: Option<PathBuf>,
    table: Option<TransitionTable>,
}

impl WorkflowBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a custom ledger file path.
    ///
    /// If not specified, uses XDG Base Directory specification:
    /// `$XDG_DATA_HOME/procura/ledger.db` or `~/.local/share/procura/ledger.db`
    pub fn with_database_path<P: AsRef<Path>>(mut self, path: Option<P>) -> Self {
        if let Some(path) = path {
            self.database_path = Some(path.as_ref().to_path_buf());
        }
        self
    }

    /// Sets the directory published documents are copied into.
    ///
    /// Defaults to `$XDG_DATA_HOME/procura/documents`.
    pub fn with_document_root<P: AsRef<Path>>(mut self, path: Option<P>) -> Self {
        if let Some(path) = path {
            self.document_root = Some(path.as_ref().to_path_buf());
        }
        self
    }

    /// Replaces the built-in lifecycle.
    pub fn with_transition_table(mut self, table: TransitionTable) -> Self {
        self.table = Some(table);
        self
    }

    /// Builds the configured workflow.
    ///
    /// # Errors
    ///
    /// Returns `ProcurementError::InvalidTransitionTable` if the built-in
    /// lifecycle is inconsistent
    /// Returns `ProcurementError::FileSystem` if a directory cannot be created
    /// Returns `ProcurementError::Database` if ledger initialization fails
    pub async fn build(self) -> Result<Workflow> {
        let table = match self.table {
            Some(table) => table,
            None => TransitionTable::standard()?,
        };

        let ledger_path = match self.database_path {
            Some(path) => path,
            None => Self::default_database_path()?,
        };
        let document_root = match self.document_root {
            Some(path) => path,
            None => Self::default_document_root()?,
        };

        if let Some(parent) = ledger_path.parent() {
            create_dir(parent)?;
        }
        create_dir(&document_root)?;

        let path = ledger_path.clone();
        task::spawn_blocking(move || {
            let _ledger = Ledger::open(&path)?;
            Ok::<(), ProcurementError>(())
        })
        .await
        .map_err(|e| ProcurementError::Configuration {
            message: format!("Task join error: {e}"),
        })??;

        debug!(
            "Workflow ready: ledger {}, documents {}",
            ledger_path.display(),
            document_root.display()
        );
        Ok(Workflow::new(ledger_path, document_root, table))
    }

    /// Returns the default ledger path following XDG Base Directory
    /// specification.
    fn default_database_path() -> Result<PathBuf> {
        xdg::BaseDirectories::with_prefix(XDG_PREFIX)
            .place_data_file("ledger.db")
            .map_err(|e| ProcurementError::XdgDirectory(e.to_string()))
    }

    fn default_document_root() -> Result<PathBuf> {
        xdg::BaseDirectories::with_prefix(XDG_PREFIX)
            .create_data_directory("documents")
            .map_err(|e| ProcurementError::XdgDirectory(e.to_string()))
    }
}

fn create_dir(path: &Path) -> Result<()> {
    if path.as_os_str().is_empty() {
        return Ok(());
    }
    std::fs::create_dir_all(path).map_err(|e| ProcurementError::FileSystem {
        path: path.to_path_buf(),
        source: e,
    })
}
