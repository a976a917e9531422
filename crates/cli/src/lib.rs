mod clear;
mod index;
mod resolve;
mod watch;

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tagscope_api::{MetadataCompiler, WorkspaceType};
use tagscope_core::{SessionConfig, WorkspaceSession};
use tagscope_lwc::LwcCompiler;

#[derive(Parser)]
#[command(
    name = "tagscope",
    version,
    about = "Index and resolve Lightning web components in a workspace",
    long_about = "Tagscope discovers component modules under a workspace, keeps a persisted \
                  index of their metadata, and resolves tag references written in markup, \
                  aura or script form to the component that defines them."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build or refresh the component index of a workspace
    #[command(
        long_about = "Loads the persisted snapshot, compiles new or modified component modules, \
                      drops components whose files are gone, and writes the snapshot back."
    )]
    Index {
        #[command(flatten)]
        workspace: WorkspaceArgs,
        /// Recompile every module instead of trusting the snapshot
        #[arg(long)]
        force: bool,
    },
    /// Resolve a tag reference such as `c-todo-item` or `c:todoItem`
    Resolve {
        #[command(flatten)]
        workspace: WorkspaceArgs,
        /// Tag reference to resolve
        #[arg(value_name = "QUERY")]
        query: String,
        /// Print the full indexed record as JSON
        #[arg(long)]
        json: bool,
    },
    /// Index, then keep the index current as files change on disk
    Watch {
        #[command(flatten)]
        workspace: WorkspaceArgs,
    },
    /// Delete the persisted snapshot of a workspace
    Clear {
        #[command(flatten)]
        workspace: WorkspaceArgs,
    },
    /// Start the Language Server Protocol (LSP) server on stdio
    Lsp,
}

#[derive(Args, Debug, Clone)]
pub struct WorkspaceArgs {
    /// Path to the workspace root
    #[arg(value_name = "PROJECT_PATH")]
    pub path: PathBuf,
    /// Declared layout (SFDX, CORE_ALL, CORE_PARTIAL, STANDARD). Detected when omitted.
    #[arg(long, value_name = "TYPE", value_parser = parse_workspace_type)]
    pub workspace_type: Option<WorkspaceType>,
    /// Snapshot file to use instead of the standard location
    #[arg(long, value_name = "FILE")]
    pub snapshot: Option<PathBuf>,
}

impl WorkspaceArgs {
    pub fn session_config(&self) -> SessionConfig {
        let mut config = SessionConfig::new(&self.path);
        if let Some(workspace_type) = self.workspace_type {
            config = config.with_workspace_type(workspace_type);
        }
        if let Some(snapshot) = &self.snapshot {
            config = config.with_snapshot_path(snapshot);
        }
        config
    }

    pub fn open_session(&self) -> Arc<WorkspaceSession> {
        WorkspaceSession::on_disk(self.session_config(), default_compiler())
    }
}

fn parse_workspace_type(value: &str) -> Result<WorkspaceType, String> {
    let normalized = value.trim().to_uppercase().replace('-', "_");
    serde_json::from_value(serde_json::Value::String(normalized))
        .map_err(|_| format!("unknown workspace type '{}'", value))
}

pub fn default_compiler() -> Arc<dyn MetadataCompiler> {
    Arc::new(LwcCompiler::new())
}

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let component = match &cli.command {
        Commands::Lsp => "lsp",
        _ => "cli",
    };
    // stdout belongs to the protocol when serving LSP
    let _guard = tagscope_core::logging::init_logging(component, !matches!(cli.command, Commands::Lsp));

    let rt = tokio::runtime::Runtime::new()?;

    match cli.command {
        Commands::Index { workspace, force } => rt.block_on(index::run(workspace, force)),
        Commands::Resolve {
            workspace,
            query,
            json,
        } => rt.block_on(resolve::run(workspace, query, json)),
        Commands::Watch { workspace } => rt.block_on(watch::run(workspace)),
        Commands::Clear { workspace } => rt.block_on(clear::run(workspace)),
        Commands::Lsp => rt.block_on(tagscope_lsp::run_server(default_compiler())),
    }
}
