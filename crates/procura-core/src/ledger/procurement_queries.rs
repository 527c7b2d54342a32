//! Procurement state queries.

use jiff::Timestamp;
use rusqlite::{params, params_from_iter, types::Type, Connection, OptionalExtension, Row};

use crate::{
    catalog::{Phase, Status},
    error::{DatabaseResultExt, Result},
    models::{ProcurementFilter, ProcurementState},
};

const SELECT_COLUMNS: &str =
    "SELECT procurement_id, title, phase, status, updated_at, updated_by FROM procurements";
const INSERT_PROCUREMENT_SQL: &str = "INSERT INTO procurements (procurement_id, title, phase, status, created_at, updated_at, updated_by) VALUES (?1, ?2, ?3, ?4, ?5, ?5, ?6)";
const UPDATE_STATE_SQL: &str = "UPDATE procurements SET title = ?2, phase = ?3, status = ?4, updated_at = ?5, updated_by = ?6 WHERE procurement_id = ?1";

impl super::Ledger {
    /// Retrieves a procurement by its identifier.
    pub fn procurement(&self, procurement_id: &str) -> Result<Option<ProcurementState>> {
        find_state(&self.connection, procurement_id)
    }

    /// Lists procurements, most recently updated first.
    pub fn list_procurements(&self, filter: &ProcurementFilter) -> Result<Vec<ProcurementState>> {
        let mut conditions = Vec::new();
        let mut values: Vec<String> = Vec::new();

        if let Some(phase) = filter.phase {
            values.push(phase_slug(phase).to_string());
            conditions.push(format!("phase = ?{}", values.len()));
        }
        if let Some(title) = filter
            .title_contains
            .as_deref()
            .map(str::trim)
            .filter(|title| !title.is_empty())
        {
            values.push(format!("%{}%", title.to_lowercase()));
            conditions.push(format!("LOWER(title) LIKE ?{}", values.len()));
        }

        let mut sql = SELECT_COLUMNS.to_string();
        if !conditions.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&conditions.join(" AND "));
        }
        sql.push_str(" ORDER BY updated_at DESC, procurement_id");

        let mut stmt = self
            .connection
            .prepare(&sql)
            .db_context("Failed to prepare procurement query")?;
        let rows = stmt
            .query_map(params_from_iter(values.iter()), state_from_row)
            .db_context("Failed to query procurements")?;

        rows.collect::<std::result::Result<Vec<_>, _>>()
            .db_context("Failed to read procurement row")
    }
}

pub(super) fn find_state(
    connection: &Connection,
    procurement_id: &str,
) -> Result<Option<ProcurementState>> {
    let sql = format!("{SELECT_COLUMNS} WHERE procurement_id = ?1");
    connection
        .query_row(&sql, params![procurement_id], state_from_row)
        .optional()
        .db_context("Failed to query procurement")
}

pub(super) fn insert_state(connection: &Connection, state: &ProcurementState) -> Result<()> {
    connection
        .execute(
            INSERT_PROCUREMENT_SQL,
            params![
                state.procurement_id,
                state.title,
                phase_slug(state.phase),
                status_slug(state.status),
                state.updated_at.to_string(),
                state.updated_by,
            ],
        )
        .db_context("Failed to insert procurement")?;
    Ok(())
}

pub(super) fn update_state(connection: &Connection, state: &ProcurementState) -> Result<()> {
    connection
        .execute(
            UPDATE_STATE_SQL,
            params![
                state.procurement_id,
                state.title,
                phase_slug(state.phase),
                status_slug(state.status),
                state.updated_at.to_string(),
                state.updated_by,
            ],
        )
        .db_context("Failed to update procurement")?;
    Ok(())
}

fn state_from_row(row: &Row<'_>) -> rusqlite::Result<ProcurementState> {
    Ok(ProcurementState {
        procurement_id: row.get(0)?,
        title: row.get(1)?,
        phase: parse_column::<Phase>(row, 2)?,
        status: parse_column::<Status>(row, 3)?,
        updated_at: parse_column::<Timestamp>(row, 4)?,
        updated_by: row.get(5)?,
    })
}

pub(super) fn phase_slug(phase: Phase) -> &'static str {
    crate::catalog::phase(phase).slug
}

pub(super) fn status_slug(status: Status) -> &'static str {
    crate::catalog::status(status).slug
}

/// Reads a text column and parses it, reporting failures as conversion
/// errors on that column.
pub(super) fn parse_column<T>(row: &Row<'_>, index: usize) -> rusqlite::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    let raw: String = row.get(index)?;
    raw.parse::<T>().map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(
            index,
            Type::Text,
            Box::new(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!("Invalid value '{raw}': {e}"),
            )),
        )
    })
}
