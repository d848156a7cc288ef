//! Stage command handlers

use anyhow::Result;
use clap::Subcommand;
use colored::*;
use pipedeck_client::PipedeckClient;
use pipedeck_core::domain::stage::Stage;

use super::{explain_delete, field::print_field_summary, timestamp};
use crate::config::Config;
use crate::id_resolver::{resolve_pipeline_id, resolve_stage_id};
use crate::types::IdOrPrefix;

/// Stage subcommands
#[derive(Subcommand)]
pub enum StageCommands {
    /// Create a stage in a pipeline
    Create {
        /// Pipeline ID or unambiguous prefix
        pipeline: String,
        /// Display name
        name: String,
    },
    /// Get stage details
    Get {
        /// Stage ID or unambiguous prefix
        id: String,
    },
    /// Rename a stage
    Rename {
        /// Stage ID or unambiguous prefix
        id: String,
        /// New display name
        name: String,
    },
    /// Delete a stage and its fields
    Delete {
        /// Stage ID or unambiguous prefix
        id: String,
    },
    /// List the fields of a stage
    Fields {
        /// Stage ID or unambiguous prefix
        id: String,
    },
}

/// Handle stage commands
pub async fn handle_stage_command(command: StageCommands, config: &Config) -> Result<()> {
    let client = config.client();

    match command {
        StageCommands::Create { pipeline, name } => create_stage(&client, &pipeline, &name).await,
        StageCommands::Get { id } => get_stage(&client, &id).await,
        StageCommands::Rename { id, name } => rename_stage(&client, &id, &name).await,
        StageCommands::Delete { id } => delete_stage(&client, &id).await,
        StageCommands::Fields { id } => list_fields(&client, &id).await,
    }
}

async fn create_stage(client: &PipedeckClient, pipeline: &str, name: &str) -> Result<()> {
    let pipeline_id = resolve_pipeline_id(client, &IdOrPrefix::parse(pipeline)).await?;

    let stage = client.create_stage(pipeline_id, name).await?;

    println!("{}", "✓ Stage created successfully!".green().bold());
    println!("  ID:       {}", stage.id.to_string().cyan());
    println!("  Name:     {}", stage.name.bold());
    println!("  Pipeline: {}", stage.pipeline_id.to_string().dimmed());

    Ok(())
}

async fn get_stage(client: &PipedeckClient, id: &str) -> Result<()> {
    let uuid = resolve_stage_id(client, &IdOrPrefix::parse(id)).await?;

    let stage = client.get_stage(uuid).await?;
    let fields = client.list_fields(uuid).await?;

    println!("{}", "Stage Details:".bold());
    println!("  ID:       {}", stage.id.to_string().cyan());
    println!("  Name:     {}", stage.name.bold());
    println!("  Pipeline: {}", stage.pipeline_id);
    println!("  Created:  {}", timestamp(&stage.created_at));
    println!("  Updated:  {}", timestamp(&stage.updated_at));
    println!("  Fields:   {}", fields.len());

    Ok(())
}

async fn rename_stage(client: &PipedeckClient, id: &str, name: &str) -> Result<()> {
    let uuid = resolve_stage_id(client, &IdOrPrefix::parse(id)).await?;

    let stage = client.rename_stage(uuid, name).await?;

    println!(
        "{}",
        format!("✓ Stage renamed to '{}'", stage.name).green().bold()
    );

    Ok(())
}

async fn delete_stage(client: &PipedeckClient, id: &str) -> Result<()> {
    let uuid = resolve_stage_id(client, &IdOrPrefix::parse(id)).await?;

    client.delete_stage(uuid).await.map_err(explain_delete)?;

    println!(
        "{}",
        format!("✓ Stage {} deleted successfully!", uuid)
            .green()
            .bold()
    );

    Ok(())
}

async fn list_fields(client: &PipedeckClient, id: &str) -> Result<()> {
    let uuid = resolve_stage_id(client, &IdOrPrefix::parse(id)).await?;

    let fields = client.list_fields(uuid).await?;

    if fields.is_empty() {
        println!("{}", "No fields found.".yellow());
    }
    for field in fields {
        print_field_summary(&field);
    }

    Ok(())
}

/// Print a stage summary
pub(super) fn print_stage_summary(stage: &Stage) {
    println!("  {} {}", "▸".cyan(), stage.name.bold());
    println!("    ID: {}", stage.id.to_string().dimmed());
}
