//! Command-line argument structures and command execution
//!
//! Argument structs carry the clap derives and convert into the core
//! parameter types with `From` impls, so the core stays free of CLI
//! concerns:
//!
//! ```text
//! User Input → CLI Args (clap) → Core Params → Workflow
//! ```

use std::process::ExitCode;

use anyhow::{anyhow, Context, Result};
use clap::{ArgAction, Args};
use log::debug;
use procura_core::{
    display::{LedgerEntries, Procurements, Stages, StoredDocuments},
    params::{
        DecisionRequest, DocumentUpload, ListProcurements, ProcurementRef, StageFormRequest,
        UploadRequest,
    },
    Actor, FormView, HandlerId, Phase, StageOutcome, Workflow,
};
use serde::Serialize;

use crate::renderer::TerminalRenderer;

/// Record whether a conference was held
///
/// A held conference keeps the procurement in its phase and waits for the
/// conference documents; a skipped one jumps ahead.
#[derive(Args)]
pub struct DecideArgs {
    #[arg(help = "Decision handler, e.g. pre-procurement-decision or pre-bid-decision")]
    pub handler: HandlerId,
    #[arg(help = "Procurement identifier, e.g. PR-001")]
    pub procurement_id: String,
    #[arg(short, long, help = "Procurement title")]
    pub title: String,
    #[arg(
        long,
        action = ArgAction::Set,
        required = true,
        help = "Whether the conference took place (true or false)"
    )]
    pub conference_held: bool,
}

impl From<DecideArgs> for DecisionRequest {
    fn from(val: DecideArgs) -> Self {
        DecisionRequest {
            procurement_id: val.procurement_id,
            procurement_title: val.title,
            conference_held: val.conference_held,
        }
    }
}

/// Upload the documents of a phase and advance
#[derive(Args)]
pub struct UploadArgs {
    #[arg(help = "Upload handler, e.g. initiation or bid-opening")]
    pub handler: HandlerId,
    #[arg(help = "Procurement identifier, e.g. PR-001")]
    pub procurement_id: String,
    #[arg(short, long, help = "Procurement title")]
    pub title: String,
    #[arg(
        short,
        long = "document",
        value_parser = parse_document,
        help = "Document as TYPE=PATH, e.g. \"Minutes of Meeting=./minutes.pdf\"; repeatable"
    )]
    pub documents: Vec<DocumentUpload>,
    #[arg(long, help = "Submission date as YYYY-MM-DD; defaults to today")]
    pub submission_date: Option<String>,
    #[arg(short, long, help = "Participants or signatories, free text")]
    pub participants: Option<String>,
    #[arg(short, long, help = "Note attached to the transition record")]
    pub note: Option<String>,
}

impl From<UploadArgs> for UploadRequest {
    fn from(val: UploadArgs) -> Self {
        UploadRequest {
            procurement_id: val.procurement_id,
            procurement_title: val.title,
            documents: val.documents,
            submission_date: val.submission_date,
            participants: val.participants,
            note: val.note,
        }
    }
}

fn parse_document(raw: &str) -> Result<DocumentUpload, String> {
    let (document_type, path) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected TYPE=PATH, got '{raw}'"))?;
    Ok(DocumentUpload {
        document_type: document_type.trim().to_string(),
        path: path.trim().to_string(),
    })
}

/// Show the form bound to a stage handler
#[derive(Args)]
pub struct FormArgs {
    #[arg(help = "Stage handler")]
    pub handler: HandlerId,
    #[arg(help = "Procurement identifier; omit for the initiation form")]
    pub procurement_id: Option<String>,
}

impl From<FormArgs> for StageFormRequest {
    fn from(val: FormArgs) -> Self {
        StageFormRequest {
            handler: val.handler,
            procurement_id: val.procurement_id,
        }
    }
}

/// Address one procurement
#[derive(Args)]
pub struct ProcurementArgs {
    #[arg(help = "Procurement identifier, e.g. PR-001")]
    pub procurement_id: String,
}

impl From<ProcurementArgs> for ProcurementRef {
    fn from(val: ProcurementArgs) -> Self {
        ProcurementRef {
            procurement_id: val.procurement_id,
        }
    }
}

/// List procurements
#[derive(Args, Default)]
pub struct ListArgs {
    #[arg(long, help = "Only procurements currently in this phase, e.g. bid-opening")]
    pub phase: Option<Phase>,
    #[arg(short, long, help = "Only procurements whose title contains this text")]
    pub title: Option<String>,
}

impl From<ListArgs> for ListProcurements {
    fn from(val: ListArgs) -> Self {
        ListProcurements {
            phase: val.phase,
            title_contains: val.title,
        }
    }
}

/// Executes commands against the workflow and prints the result.
pub struct Cli {
    workflow: Workflow,
    renderer: TerminalRenderer,
    actor: Actor,
    json: bool,
}

impl Cli {
    pub fn new(workflow: Workflow, renderer: TerminalRenderer, actor: Actor, json: bool) -> Self {
        Self {
            workflow,
            renderer,
            actor,
            json,
        }
    }

    pub async fn decide(self, args: DecideArgs) -> Result<ExitCode> {
        let handler = args.handler;
        let outcome = self
            .workflow
            .decide(handler, self.actor.clone(), &args.into())
            .await
            .with_context(|| format!("Failed to run '{handler}'"))?;
        self.print_outcome(&outcome)
    }

    pub async fn upload(self, args: UploadArgs) -> Result<ExitCode> {
        let handler = args.handler;
        let outcome = self
            .workflow
            .upload(handler, self.actor.clone(), &args.into())
            .await
            .with_context(|| format!("Failed to run '{handler}'"))?;
        self.print_outcome(&outcome)
    }

    pub async fn form(self, args: FormArgs) -> Result<ExitCode> {
        let view = self
            .workflow
            .stage_form(&args.into())
            .await
            .context("Failed to load stage form")?;
        let code = match view {
            FormView::Form(_) => ExitCode::SUCCESS,
            FormView::Redirect(_) => ExitCode::FAILURE,
        };
        self.print(&view, || view.to_string())?;
        Ok(code)
    }

    pub async fn show(self, args: ProcurementArgs) -> Result<ExitCode> {
        let params: ProcurementRef = args.into();
        let state = self
            .workflow
            .procurement(&params)
            .await
            .context("Failed to load procurement")?
            .ok_or_else(|| anyhow!("Procurement '{}' not found", params.procurement_id))?;

        let next = Stages(self.workflow.next_stages(Some(&state)));
        self.print(&state, || {
            if next.is_empty() {
                format!("{state}No further stages.\n")
            } else {
                format!("{state}## Next stages\n\n{next}")
            }
        })?;
        Ok(ExitCode::SUCCESS)
    }

    pub async fn list(self, args: ListArgs) -> Result<ExitCode> {
        let procurements = self
            .workflow
            .list_procurements(&args.into())
            .await
            .context("Failed to list procurements")?;
        let procurements = Procurements(procurements);
        self.print(&procurements.0, || format!("# Procurements\n\n{procurements}"))?;
        Ok(ExitCode::SUCCESS)
    }

    pub async fn history(self, args: ProcurementArgs) -> Result<ExitCode> {
        let params: ProcurementRef = args.into();
        let entries = self
            .workflow
            .history(&params)
            .await
            .context("Failed to load history")?;
        let entries = LedgerEntries(entries);
        self.print(&entries.0, || {
            format!("# History of {}\n\n{entries}", params.procurement_id)
        })?;
        Ok(ExitCode::SUCCESS)
    }

    pub async fn documents(self, args: ProcurementArgs) -> Result<ExitCode> {
        let params: ProcurementRef = args.into();
        let documents = self
            .workflow
            .documents(&params)
            .await
            .context("Failed to list documents")?;
        let documents = StoredDocuments(documents);
        self.print(&documents.0, || {
            format!("# Documents of {}\n\n{documents}", params.procurement_id)
        })?;
        Ok(ExitCode::SUCCESS)
    }

    pub fn stages(self) -> Result<ExitCode> {
        let stages = Stages(self.workflow.stages().to_vec());
        self.print(&stages.0, || format!("# Stage handlers\n\n{stages}"))?;
        Ok(ExitCode::SUCCESS)
    }

    fn print_outcome(&self, outcome: &StageOutcome) -> Result<ExitCode> {
        debug!("Outcome: {outcome:?}");
        self.print(outcome, || outcome.to_string())?;
        Ok(if outcome.success {
            ExitCode::SUCCESS
        } else {
            ExitCode::FAILURE
        })
    }

    /// Prints `value` as JSON with `--json`, otherwise the rendered markdown.
    fn print<T: Serialize>(&self, value: &T, markdown: impl FnOnce() -> String) -> Result<()> {
        if self.json {
            let json = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
            println!("{json}");
            Ok(())
        } else {
            self.renderer.render(&markdown())
        }
    }
}
