//! Error types for the procurement workflow library.

use std::path::PathBuf;

use thiserror::Error;

/// Comprehensive error type for all workflow operations.
#[derive(Error, Debug)]
pub enum ProcurementError {
    /// Ledger connection or query errors
    #[error("Database error: {message}")]
    Database {
        message: String,
        #[source]
        source: rusqlite::Error,
    },
    /// Procurement not found for the given ID
    #[error("Procurement '{id}' not found")]
    ProcurementNotFound { id: String },
    /// The built-in or supplied transition table is inconsistent
    #[error("Invalid transition table: {reason}")]
    InvalidTransitionTable { reason: String },
    /// File system operation errors
    #[error("File system error at path '{path}': {source}")]
    FileSystem {
        path: PathBuf,
        source: std::io::Error,
    },
    /// XDG directory specification errors
    #[error("XDG directory error: {0}")]
    XdgDirectory(String),
    /// Invalid input validation errors
    #[error("Invalid input for field '{field}': {reason}")]
    InvalidInput { field: String, reason: String },
    /// Serialization/deserialization errors
    #[error("Serialization error: {source}")]
    Serialization {
        #[from]
        source: serde_json::Error,
    },
    /// A collaborator call failed
    #[error(transparent)]
    Collaborator(#[from] CollaboratorError),
    /// Configuration errors
    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

/// Failure reported by an external collaborator (ledger, notifier, status
/// reader).
///
/// The handler boundary pattern-matches on these instead of unwinding, so
/// every collaborator call returns `Result<_, CollaboratorError>`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CollaboratorError {
    /// The collaborator refused the call because the procurement is not in
    /// the state the caller declared.
    #[error("{operation} rejected: {reason}")]
    Rejected { operation: String, reason: String },
    /// The collaborator could not be reached or failed internally.
    #[error("{operation} failed: {message}")]
    Unavailable { operation: String, message: String },
}

impl CollaboratorError {
    /// Creates a rejection for the given operation.
    pub fn rejected(operation: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Rejected {
            operation: operation.into(),
            reason: reason.into(),
        }
    }

    /// Creates an availability failure for the given operation.
    pub fn unavailable(operation: impl Into<String>, message: impl std::fmt::Display) -> Self {
        Self::Unavailable {
            operation: operation.into(),
            message: message.to_string(),
        }
    }
}

/// Builder for creating database errors with optional context.
pub struct DatabaseErrorBuilder {
    message: String,
}

impl DatabaseErrorBuilder {
    /// Create a new database error builder with a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Build the error with the given source.
    pub fn with_source(self, source: rusqlite::Error) -> ProcurementError {
        ProcurementError::Database {
            message: self.message,
            source,
        }
    }
}

/// Builder for creating input validation errors.
pub struct InvalidInputBuilder {
    field: String,
}

impl InvalidInputBuilder {
    /// Create a new invalid input error builder for a field.
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
        }
    }

    /// Build the error with the given reason.
    pub fn with_reason(self, reason: impl Into<String>) -> ProcurementError {
        ProcurementError::InvalidInput {
            field: self.field,
            reason: reason.into(),
        }
    }
}

impl ProcurementError {
    /// Creates a builder for database errors.
    pub fn database(message: impl Into<String>) -> DatabaseErrorBuilder {
        DatabaseErrorBuilder::new(message)
    }

    /// Creates a builder for input validation errors.
    pub fn invalid_input(field: impl Into<String>) -> InvalidInputBuilder {
        InvalidInputBuilder::new(field)
    }

    /// Creates a transition table error.
    pub fn invalid_table(reason: impl Into<String>) -> Self {
        Self::InvalidTransitionTable {
            reason: reason.into(),
        }
    }
}

/// Specialized extension trait for database-related Results.
pub trait DatabaseResultExt<T> {
    /// Map database errors with a message.
    fn db_context(self, message: &str) -> Result<T>;
}

impl<T> DatabaseResultExt<T> for std::result::Result<T, rusqlite::Error> {
    fn db_context(self, message: &str) -> Result<T> {
        self.map_err(|e| ProcurementError::database(message).with_source(e))
    }
}

/// Extension trait turning ledger-side errors into collaborator failures.
///
/// The ledger implements the collaborator traits on top of the same
/// `Result<T>` plumbing as the rest of the crate; this converts at the trait
/// boundary.
pub trait CollaboratorResultExt<T> {
    /// Map any ledger error to [`CollaboratorError::Unavailable`] for the
    /// named operation, keeping rejections as they are.
    fn for_operation(self, operation: &str) -> std::result::Result<T, CollaboratorError>;
}

impl<T> CollaboratorResultExt<T> for Result<T> {
    fn for_operation(self, operation: &str) -> std::result::Result<T, CollaboratorError> {
        self.map_err(|e| match e {
            ProcurementError::Collaborator(inner) => inner,
            other => CollaboratorError::unavailable(operation, other),
        })
    }
}

/// Result type alias for workflow operations
pub type Result<T> = std::result::Result<T, ProcurementError>;
