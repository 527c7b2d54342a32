//! Audit trail and document queries.

use jiff::{civil::Date, Timestamp};
use rusqlite::{params, types::Type, Connection, Row};
use serde::Serialize;

use super::procurement_queries::{parse_column, phase_slug, status_slug};
use crate::{
    catalog::{Phase, Status},
    error::{DatabaseResultExt, Result},
    models::{DocumentMetadata, EntryKind, LedgerEntry, StoredDocument},
};

const INSERT_ENTRY_SQL: &str = "INSERT INTO ledger_entries (procurement_id, kind, phase, status, actor, summary, payload, recorded_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)";
const SELECT_ENTRIES_SQL: &str = "SELECT id, procurement_id, kind, phase, status, actor, summary, payload, recorded_at FROM ledger_entries WHERE procurement_id = ?1 ORDER BY id";
const INSERT_DOCUMENT_SQL: &str = "INSERT INTO documents (procurement_id, phase, document_type, file_name, stored_path, submission_date, participants, recorded_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)";
const SELECT_DOCUMENTS_SQL: &str = "SELECT id, procurement_id, phase, document_type, file_name, stored_path, submission_date, participants, recorded_at FROM documents WHERE procurement_id = ?1 ORDER BY id";

/// An audit entry about to be appended.
pub(super) struct NewEntry<'a, R: Serialize> {
    pub procurement_id: &'a str,
    pub kind: EntryKind,
    pub phase: Phase,
    pub status: Option<Status>,
    pub actor: &'a str,
    pub summary: String,
    pub record: &'a R,
    pub recorded_at: Timestamp,
}

impl super::Ledger {
    /// Audit trail of a procurement in recording order.
    pub fn history(&self, procurement_id: &str) -> Result<Vec<LedgerEntry>> {
        let mut stmt = self
            .connection
            .prepare(SELECT_ENTRIES_SQL)
            .db_context("Failed to prepare ledger query")?;
        let rows = stmt
            .query_map(params![procurement_id], entry_from_row)
            .db_context("Failed to query ledger entries")?;

        rows.collect::<std::result::Result<Vec<_>, _>>()
            .db_context("Failed to read ledger entry")
    }

    /// Documents published for a procurement in publishing order.
    pub fn documents(&self, procurement_id: &str) -> Result<Vec<StoredDocument>> {
        let mut stmt = self
            .connection
            .prepare(SELECT_DOCUMENTS_SQL)
            .db_context("Failed to prepare document query")?;
        let rows = stmt
            .query_map(params![procurement_id], document_from_row)
            .db_context("Failed to query documents")?;

        rows.collect::<std::result::Result<Vec<_>, _>>()
            .db_context("Failed to read document row")
    }
}

pub(super) fn append_entry<R: Serialize>(
    connection: &Connection,
    entry: NewEntry<'_, R>,
) -> Result<u64> {
    let payload = serde_json::to_string(entry.record)?;
    connection
        .execute(
            INSERT_ENTRY_SQL,
            params![
                entry.procurement_id,
                entry.kind.as_str(),
                phase_slug(entry.phase),
                entry.status.map(status_slug),
                entry.actor,
                entry.summary,
                payload,
                entry.recorded_at.to_string(),
            ],
        )
        .db_context("Failed to append ledger entry")?;

    Ok(connection.last_insert_rowid() as u64)
}

pub(super) fn insert_document(
    connection: &Connection,
    procurement_id: &str,
    phase: Phase,
    metadata: &DocumentMetadata,
    stored_path: Option<&str>,
    recorded_at: Timestamp,
) -> Result<()> {
    connection
        .execute(
            INSERT_DOCUMENT_SQL,
            params![
                procurement_id,
                phase_slug(phase),
                metadata.document_type,
                metadata.file_name,
                stored_path,
                metadata.submission_date.to_string(),
                metadata.participants,
                recorded_at.to_string(),
            ],
        )
        .db_context("Failed to insert document")?;
    Ok(())
}

fn entry_from_row(row: &Row<'_>) -> rusqlite::Result<LedgerEntry> {
    let status = row
        .get::<_, Option<String>>(4)?
        .map(|raw| {
            raw.parse::<Status>().map_err(|e| {
                rusqlite::Error::FromSqlConversionFailure(
                    4,
                    Type::Text,
                    Box::new(std::io::Error::new(std::io::ErrorKind::InvalidData, e)),
                )
            })
        })
        .transpose()?;

    let payload: String = row.get(7)?;
    let payload = serde_json::from_str(&payload)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(7, Type::Text, Box::new(e)))?;

    Ok(LedgerEntry {
        id: row.get::<_, i64>(0)? as u64,
        procurement_id: row.get(1)?,
        kind: parse_column::<EntryKind>(row, 2)?,
        phase: parse_column::<Phase>(row, 3)?,
        status,
        actor: row.get(5)?,
        summary: row.get(6)?,
        payload,
        recorded_at: parse_column::<Timestamp>(row, 8)?,
    })
}

fn document_from_row(row: &Row<'_>) -> rusqlite::Result<StoredDocument> {
    Ok(StoredDocument {
        id: row.get::<_, i64>(0)? as u64,
        procurement_id: row.get(1)?,
        phase: parse_column::<Phase>(row, 2)?,
        document_type: row.get(3)?,
        file_name: row.get(4)?,
        stored_path: row.get(5)?,
        submission_date: parse_column::<Date>(row, 6)?,
        participants: row.get(7)?,
        recorded_at: parse_column::<Timestamp>(row, 8)?,
    })
}
