//! MCP server implementation for Procura
//!
//! Exposes the workflow over the Model Context Protocol on stdio: one tool
//! per stage-handler kind plus read tools over the ledger. Stage tools
//! return the `StageOutcome` as JSON; read tools return markdown.

use std::{future::Future, sync::Arc};

use anyhow::Result;
use log::{debug, error, info};
use procura_core::{
    display::{LedgerEntries, Procurements, Stages, StoredDocuments},
    params::{DecisionRequest, ListProcurements, ProcurementRef, StageFormRequest, UploadRequest},
    Actor, HandlerId, StageOutcome, Workflow,
};
use rmcp::{
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{CallToolResult, Content, Implementation, ProtocolVersion, ServerCapabilities, ServerInfo},
    tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler,
};
use schemars::JsonSchema;
use serde::Deserialize;
use tokio::signal::unix::{signal, SignalKind};

pub mod errors;

use errors::to_mcp_error;

pub type McpResult = Result<CallToolResult, McpError>;

/// Parameters of the `decide_stage` tool
#[derive(Debug, Deserialize, JsonSchema)]
pub struct DecideStage {
    /// Decision handler: pre-procurement-decision or pre-bid-decision
    pub handler: HandlerId,
    #[serde(flatten)]
    pub request: DecisionRequest,
}

/// Parameters of the `upload_stage_documents` tool
#[derive(Debug, Deserialize, JsonSchema)]
pub struct UploadStage {
    /// Upload handler, e.g. initiation, bidding-documents, bid-opening
    pub handler: HandlerId,
    #[serde(flatten)]
    pub request: UploadRequest,
}

/// MCP server for Procura
#[derive(Clone)]
pub struct ProcuraMcpServer {
    workflow: Arc<Workflow>,
    actor: Actor,
    tool_router: ToolRouter<Self>,
}

#[tool_router]
impl ProcuraMcpServer {
    /// Create a new server acting as `actor` for every transition.
    pub fn new(workflow: Workflow, actor: Actor) -> Self {
        Self {
            workflow: Arc::new(workflow),
            actor,
            tool_router: Self::tool_router(),
        }
    }

    #[tool(
        name = "decide_stage",
        description = "Record whether a conference was held. Use handler 'pre-procurement-decision' (procurement must be in Pre-Procurement Conference with status PR Submitted) or 'pre-bid-decision' (Pre-Bid Conference after Bidding Documents Published). conference_held=true keeps the phase and waits for the conference documents; false skips ahead (to Bidding Documents or Bid Opening). Returns {success, message, nextPhase?} as JSON."
    )]
    async fn decide_stage(&self, Parameters(params): Parameters<DecideStage>) -> McpResult {
        debug!("decide_stage: {params:?}");
        let outcome = self
            .workflow
            .decide(params.handler, self.actor.clone(), &params.request)
            .await
            .map_err(|e| to_mcp_error("Failed to run decision", &e))?;
        outcome_result(&outcome)
    }

    #[tool(
        name = "upload_stage_documents",
        description = "Upload the documents of the current phase and advance the procurement to the next phase. Each document gives a document_type (one of the handler's slots, see list_stages or stage_form) and a readable file path; slots may be left out. 'initiation' creates the procurement. Optional submission_date (YYYY-MM-DD), participants and note. Returns {success, message, nextPhase?} as JSON."
    )]
    async fn upload_stage_documents(
        &self,
        Parameters(params): Parameters<UploadStage>,
    ) -> McpResult {
        debug!("upload_stage_documents: {params:?}");
        let outcome = self
            .workflow
            .upload(params.handler, self.actor.clone(), &params.request)
            .await
            .map_err(|e| to_mcp_error("Failed to run upload", &e))?;
        outcome_result(&outcome)
    }

    #[tool(
        name = "stage_form",
        description = "Check whether a stage handler can act on a procurement right now. Returns the form (accepted document types or the held/skipped question) or the reason the procurement is not ready. Omit procurement_id for the initiation form."
    )]
    async fn stage_form(&self, Parameters(params): Parameters<StageFormRequest>) -> McpResult {
        debug!("stage_form: {params:?}");
        let view = self
            .workflow
            .stage_form(&params)
            .await
            .map_err(|e| to_mcp_error("Failed to load stage form", &e))?;
        Ok(CallToolResult::success(vec![Content::text(view.to_string())]))
    }

    #[tool(
        name = "show_procurement",
        description = "Show the current phase and status of a procurement and the stage handlers that may act on it next."
    )]
    async fn show_procurement(&self, Parameters(params): Parameters<ProcurementRef>) -> McpResult {
        let state = self
            .workflow
            .procurement(&params)
            .await
            .map_err(|e| to_mcp_error("Failed to load procurement", &e))?;

        let text = match state {
            Some(state) => {
                let next = Stages(self.workflow.next_stages(Some(&state)));
                format!("{state}## Next stages\n\n{next}")
            }
            None => format!("Procurement {} was not found.", params.procurement_id),
        };
        Ok(CallToolResult::success(vec![Content::text(text)]))
    }

    #[tool(
        name = "list_procurements",
        description = "List procurements with their current phase and status, most recently updated first. Optionally filter by phase (e.g. 'bid-opening') or by a title fragment."
    )]
    async fn list_procurements(
        &self,
        Parameters(params): Parameters<ListProcurements>,
    ) -> McpResult {
        let procurements = self
            .workflow
            .list_procurements(&params)
            .await
            .map_err(|e| to_mcp_error("Failed to list procurements", &e))?;
        Ok(CallToolResult::success(vec![Content::text(
            Procurements(procurements).to_string(),
        )]))
    }

    #[tool(
        name = "procurement_history",
        description = "Show the audit trail of a procurement: every status update, event, document batch, phase transition and notification in recording order."
    )]
    async fn procurement_history(
        &self,
        Parameters(params): Parameters<ProcurementRef>,
    ) -> McpResult {
        let entries = self
            .workflow
            .history(&params)
            .await
            .map_err(|e| to_mcp_error("Failed to load history", &e))?;
        Ok(CallToolResult::success(vec![Content::text(
            LedgerEntries(entries).to_string(),
        )]))
    }

    #[tool(
        name = "list_documents",
        description = "List the documents published for a procurement, with their phase, submission date and stored location."
    )]
    async fn list_documents(&self, Parameters(params): Parameters<ProcurementRef>) -> McpResult {
        let documents = self
            .workflow
            .documents(&params)
            .await
            .map_err(|e| to_mcp_error("Failed to list documents", &e))?;
        Ok(CallToolResult::success(vec![Content::text(
            StoredDocuments(documents).to_string(),
        )]))
    }

    #[tool(
        name = "list_stages",
        description = "List every stage handler in lifecycle order with the phase and statuses it accepts, its document types or decision branches, and where it moves the procurement."
    )]
    async fn list_stages(&self) -> McpResult {
        Ok(CallToolResult::success(vec![Content::text(
            Stages(self.workflow.stages().to_vec()).to_string(),
        )]))
    }
}

fn outcome_result(outcome: &StageOutcome) -> McpResult {
    let json = serde_json::to_string(outcome)
        .map_err(|e| McpError::internal_error(format!("Failed to serialize outcome: {e}"), None))?;
    let content = vec![Content::text(json)];
    Ok(if outcome.success {
        CallToolResult::success(content)
    } else {
        CallToolResult::error(content)
    })
}

#[tool_handler(router = self.tool_router)]
impl ServerHandler for ProcuraMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation::from_build_env(),
            instructions: Some(r#"Procura tracks government procurements through a fixed sequence of phases, from the purchase request to contract monitoring.

## Lifecycle
Procurement Initiation → Pre-Procurement Conference → Bidding Documents → Pre-Bid Conference → Supplemental/Bid Bulletin → Bid Opening → Bid Evaluation → Post-Qualification → BAC Resolution → Notice of Award → Performance Bond, Contract and PO → Notice to Proceed → Monitoring → Completed

## Moving a procurement
1. `upload_stage_documents` with handler `initiation` creates it
2. `decide_stage` records whether a conference was held; skipping jumps ahead
3. `upload_stage_documents` with the handler for the current phase advances it

Use `show_procurement` or `stage_form` to see which handler applies before acting, and `list_stages` for the full table.

## Reading
- `list_procurements`, `show_procurement`
- `procurement_history` for the audit trail
- `list_documents` for published files"#.to_string()),
        }
    }
}

/// Run the MCP server with stdio transport
pub async fn run_stdio_server(server: ProcuraMcpServer) -> Result<()> {
    use rmcp::{transport::stdio, ServiceExt};

    info!("Starting Procura MCP server on stdio");
    debug!(
        "Server created with {} tools",
        server.tool_router.list_all().len()
    );

    let service = server.serve(stdio()).await.inspect_err(|e| {
        error!("serving error: {e:?}");
    })?;

    let mut sigint = signal(SignalKind::interrupt())?;
    let mut sigterm = signal(SignalKind::terminate())?;

    tokio::select! {
        result = service.waiting() => {
            match result {
                Ok(_) => info!("MCP server stopped normally"),
                Err(e) => error!("MCP server error: {e:?}"),
            }
        }
        _ = sigint.recv() => {
            info!("Received SIGINT, shutting down gracefully...");
        }
        _ = sigterm.recv() => {
            info!("Received SIGTERM, shutting down gracefully...");
        }
    }

    info!("MCP server shutdown complete");
    Ok(())
}
