//! Error handling utilities for MCP server

use procura_core::ProcurementError;
use rmcp::ErrorData;

/// Convert workflow errors to MCP errors; invalid input maps to an
/// invalid-params error, everything else to an internal error.
pub fn to_mcp_error(message: &str, error: &ProcurementError) -> ErrorData {
    match error {
        ProcurementError::InvalidInput { .. } => {
            ErrorData::invalid_params(format!("{message}: {error}"), None)
        }
        _ => ErrorData::internal_error(format!("{message}: {error}"), None),
    }
}
