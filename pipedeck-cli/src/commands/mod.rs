//! Commands module
//!
//! Defines all CLI commands and their handlers.

mod field;
mod pipeline;
mod stage;
mod tree;

pub use field::FieldCommands;
pub use pipeline::PipelineCommands;
pub use stage::StageCommands;

use anyhow::Result;
use chrono::{DateTime, Utc};
use clap::Subcommand;
use colored::*;
use pipedeck_client::ClientError;

use crate::config::Config;

/// Top-level CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Pipeline management
    Pipeline {
        #[command(subcommand)]
        command: PipelineCommands,
    },
    /// Stage management
    Stage {
        #[command(subcommand)]
        command: StageCommands,
    },
    /// Field management
    Field {
        #[command(subcommand)]
        command: FieldCommands,
    },
    /// Show the whole hierarchy
    Tree {
        /// Print JSON instead of an indented listing
        #[arg(long)]
        json: bool,
    },
}

/// Handle a CLI command
///
/// Routes the command to the appropriate handler module.
pub async fn handle_command(command: Commands, config: &Config) -> Result<()> {
    match command {
        Commands::Pipeline { command } => pipeline::handle_pipeline_command(command, config).await,
        Commands::Stage { command } => stage::handle_stage_command(command, config).await,
        Commands::Field { command } => field::handle_field_command(command, config).await,
        Commands::Tree { json } => tree::show_tree(config, json).await,
    }
}

/// Formats a timestamp for display
fn timestamp(at: &DateTime<Utc>) -> String {
    at.format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Adds a hint to cascade failures caused by a concurrent create
fn explain_delete(err: ClientError) -> anyhow::Error {
    if err.is_conflict() {
        println!(
            "{}",
            "Delete stopped part way: a child was added meanwhile. Run the command again to finish."
                .yellow()
        );
    }
    err.into()
}
