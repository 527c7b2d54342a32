//! Parameter structures for workflow operations
//!
//! These are the inbound request payloads shared by every interface (CLI,
//! MCP). They stay free of framework-specific derives apart from serde and
//! the optional JSON schema derive, following the parameter wrapper pattern:
//!
//! ```text
//! ┌─────────────────┐    ┌─────────────────┐    ┌─────────────────┐
//! │   CLI Args      │    │   MCP Params    │    │  Core Params    │
//! │  (clap derives) │───▶│ (serde derives) │───▶│ (minimal deps)  │
//! └─────────────────┘    └─────────────────┘    └─────────────────┘
//! ```
//!
//! Interface layers convert their own argument structs into these with
//! `From` impls; the core validates field contents when a stage handler
//! normalizes the request.

#[cfg(feature = "schema")]
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::{catalog::Phase, transitions::HandlerId};

/// Payload of a decision handler (e.g. "was the conference held?").
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct DecisionRequest {
    /// Procurement identifier (e.g. "PR-001")
    pub procurement_id: String,
    /// Procurement title
    pub procurement_title: String,
    /// Whether the conference took place; false takes the skip branch
    pub conference_held: bool,
}

/// One uploaded file and the document category it belongs to.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct DocumentUpload {
    /// Document category, matching one of the handler's document slots
    pub document_type: String,
    /// Path of the uploaded file
    pub path: String,
}

/// Payload of a document upload handler.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct UploadRequest {
    /// Procurement identifier (e.g. "PR-001")
    pub procurement_id: String,
    /// Procurement title
    pub procurement_title: String,
    /// Uploaded files; slots without a file are simply left out
    #[serde(default)]
    pub documents: Vec<DocumentUpload>,
    /// Submission date as YYYY-MM-DD; defaults to the request date
    #[serde(default)]
    pub submission_date: Option<String>,
    /// Free-text participants (attendees, signatories)
    #[serde(default)]
    pub participants: Option<String>,
    /// Free-text note attached to the transition record
    #[serde(default)]
    pub note: Option<String>,
}

/// Parameters for operations addressing one procurement.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct ProcurementRef {
    /// Procurement identifier
    pub procurement_id: String,
}

/// Parameters for showing the form bound to a stage handler.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct StageFormRequest {
    /// Stage handler whose form to show
    pub handler: HandlerId,
    /// Procurement identifier; omit for the initiation form
    #[serde(default)]
    pub procurement_id: Option<String>,
}

/// Parameters for listing procurements.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct ListProcurements {
    /// Only procurements currently in this phase
    #[serde(default)]
    pub phase: Option<Phase>,
    /// Case-insensitive partial match on the title
    #[serde(default)]
    pub title_contains: Option<String>,
}
