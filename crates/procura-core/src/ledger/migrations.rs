//! Ledger schema initialization and migrations.

use crate::error::{DatabaseResultExt, Result};

impl super::Ledger {
    /// Initializes the schema using the embedded SQL file.
    pub(super) fn initialize_schema(&self) -> Result<()> {
        let schema_sql = include_str!("../../assets/schema.sql");
        self.connection
            .execute_batch(schema_sql)
            .db_context("Failed to initialize ledger schema")?;

        self.apply_migrations()
    }

    /// Apply migrations for ledgers created by earlier versions.
    fn apply_migrations(&self) -> Result<()> {
        // Early ledgers did not record where copied files ended up
        let has_stored_path: bool = self
            .connection
            .query_row(
                "SELECT COUNT(*) FROM pragma_table_info('documents') WHERE name = 'stored_path'",
                [],
                |row| row.get(0),
            )
            .map(|count: i64| count > 0)
            .unwrap_or(false);

        if !has_stored_path {
            self.connection
                .execute("ALTER TABLE documents ADD COLUMN stored_path TEXT", [])
                .db_context("Failed to add stored_path column to documents table")?;
        }

        Ok(())
    }
}
