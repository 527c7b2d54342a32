use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::cli::{DecideArgs, FormArgs, ListArgs, ProcurementArgs, UploadArgs};

/// Track government procurements through their phases
///
/// Every command acts on a local ledger: a SQLite file holding the current
/// phase of each procurement, an append-only audit trail and the list of
/// published documents. Stage commands (`decide`, `upload`) move a
/// procurement forward; the others read the ledger. `serve` exposes the same
/// operations as an MCP server over stdio.
#[derive(Parser)]
#[command(version, about, name = "procura")]
pub struct Args {
    /// Path to the ledger database. Defaults to
    /// $XDG_DATA_HOME/procura/ledger.db
    #[arg(long, global = true)]
    pub database_file: Option<PathBuf>,

    /// Directory uploaded documents are copied into. Defaults to
    /// $XDG_DATA_HOME/procura/documents
    #[arg(long, global = true)]
    pub document_dir: Option<PathBuf>,

    /// Identity recorded on every transition
    #[arg(long, global = true, env = "PROCURA_ACTOR", default_value = "bac-secretariat")]
    pub actor: String,

    /// Disable colored output and use plain text
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands; without one, procurements are listed.
#[derive(Subcommand)]
pub enum Commands {
    /// Record a held/skipped decision for a conference phase
    #[command(alias = "d")]
    Decide(DecideArgs),
    /// Upload the documents of a phase and advance to the next one
    #[command(alias = "u")]
    Upload(UploadArgs),
    /// Show the form of a stage handler, or why it is not available
    Form(FormArgs),
    /// Show a procurement and the stage handlers that may act on it
    #[command(alias = "s")]
    Show(ProcurementArgs),
    /// List procurements
    #[command(alias = "l")]
    List(ListArgs),
    /// Show the audit trail of a procurement
    #[command(alias = "h")]
    History(ProcurementArgs),
    /// List documents published for a procurement
    Documents(ProcurementArgs),
    /// List all stage handlers
    Stages,
    /// Start the MCP server
    Serve,
}
