//! Procura CLI
//!
//! Command-line and MCP front end for the procurement workflow.

mod args;
mod cli;
mod mcp;
mod renderer;

use std::process::ExitCode;

use anyhow::{Context, Result};
use args::{Args, Commands};
use clap::Parser;
use cli::{Cli, ListArgs};
use log::info;
use mcp::{run_stdio_server, ProcuraMcpServer};
use procura_core::{Actor, WorkflowBuilder};
use renderer::TerminalRenderer;
use Commands::*;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    env_logger::init();

    let Args {
        database_file,
        document_dir,
        actor,
        no_color,
        json,
        command,
    } = Args::parse();

    let workflow = WorkflowBuilder::new()
        .with_database_path(database_file)
        .with_document_root(document_dir)
        .build()
        .await
        .context("Failed to initialize workflow")?;

    let actor = Actor::new(actor);
    let cli = Cli::new(workflow.clone(), TerminalRenderer::new(!no_color), actor.clone(), json);

    info!("Procura started as {actor}");

    match command {
        Some(Decide(args)) => cli.decide(args).await,
        Some(Upload(args)) => cli.upload(args).await,
        Some(Form(args)) => cli.form(args).await,
        Some(Show(args)) => cli.show(args).await,
        Some(List(args)) => cli.list(args).await,
        Some(History(args)) => cli.history(args).await,
        Some(Documents(args)) => cli.documents(args).await,
        Some(Stages) => cli.stages(),
        Some(Serve) => {
            info!("Starting Procura MCP server");
            run_stdio_server(ProcuraMcpServer::new(workflow, actor))
                .await
                .context("MCP server failed")?;
            Ok(ExitCode::SUCCESS)
        }
        None => cli.list(ListArgs::default()).await,
    }
}
