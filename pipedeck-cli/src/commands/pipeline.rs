//! Pipeline command handlers
//!
//! Handles pipeline creation, listing, renaming and cascading deletion.

use anyhow::Result;
use clap::Subcommand;
use colored::*;
use pipedeck_client::PipedeckClient;
use pipedeck_core::domain::pipeline::Pipeline;

use super::{explain_delete, stage::print_stage_summary, timestamp};
use crate::config::Config;
use crate::id_resolver::resolve_pipeline_id;
use crate::types::IdOrPrefix;

/// Pipeline subcommands
#[derive(Subcommand)]
pub enum PipelineCommands {
    /// List all pipelines
    List,
    /// Create a new pipeline
    Create {
        /// Display name
        name: String,
    },
    /// Get pipeline details
    Get {
        /// Pipeline ID or unambiguous prefix
        id: String,
    },
    /// Rename a pipeline
    Rename {
        /// Pipeline ID or unambiguous prefix
        id: String,
        /// New display name
        name: String,
    },
    /// Delete a pipeline with all of its stages and fields
    Delete {
        /// Pipeline ID or unambiguous prefix
        id: String,
    },
    /// List the stages of a pipeline
    Stages {
        /// Pipeline ID or unambiguous prefix
        id: String,
    },
}

/// Handle pipeline commands
pub async fn handle_pipeline_command(command: PipelineCommands, config: &Config) -> Result<()> {
    let client = config.client();

    match command {
        PipelineCommands::List => list_pipelines(&client).await,
        PipelineCommands::Create { name } => create_pipeline(&client, &name).await,
        PipelineCommands::Get { id } => get_pipeline(&client, &id).await,
        PipelineCommands::Rename { id, name } => rename_pipeline(&client, &id, &name).await,
        PipelineCommands::Delete { id } => delete_pipeline(&client, &id).await,
        PipelineCommands::Stages { id } => list_stages(&client, &id).await,
    }
}

async fn create_pipeline(client: &PipedeckClient, name: &str) -> Result<()> {
    let pipeline = client.create_pipeline(name).await?;

    println!("{}", "✓ Pipeline created successfully!".green().bold());
    println!("  ID:   {}", pipeline.id.to_string().cyan());
    println!("  Name: {}", pipeline.name.bold());

    Ok(())
}

async fn list_pipelines(client: &PipedeckClient) -> Result<()> {
    let pipelines = client.list_pipelines().await?;

    if pipelines.is_empty() {
        println!("{}", "No pipelines found.".yellow());
    } else {
        println!(
            "{}",
            format!("Found {} pipeline(s):", pipelines.len()).bold()
        );
        println!();
        for pipeline in pipelines {
            print_pipeline_summary(&pipeline);
        }
    }

    Ok(())
}

async fn get_pipeline(client: &PipedeckClient, id: &str) -> Result<()> {
    let uuid = resolve_pipeline_id(client, &IdOrPrefix::parse(id)).await?;

    let pipeline = client.get_pipeline(uuid).await?;
    let stages = client.list_stages(uuid).await?;

    println!("{}", "Pipeline Details:".bold());
    println!("  ID:      {}", pipeline.id.to_string().cyan());
    println!("  Name:    {}", pipeline.name.bold());
    println!("  Created: {}", timestamp(&pipeline.created_at));
    println!("  Updated: {}", timestamp(&pipeline.updated_at));
    println!("  Stages:  {}", stages.len());

    Ok(())
}

async fn rename_pipeline(client: &PipedeckClient, id: &str, name: &str) -> Result<()> {
    let uuid = resolve_pipeline_id(client, &IdOrPrefix::parse(id)).await?;

    let pipeline = client.rename_pipeline(uuid, name).await?;

    println!(
        "{}",
        format!("✓ Pipeline renamed to '{}'", pipeline.name)
            .green()
            .bold()
    );

    Ok(())
}

async fn delete_pipeline(client: &PipedeckClient, id: &str) -> Result<()> {
    let uuid = resolve_pipeline_id(client, &IdOrPrefix::parse(id)).await?;

    client.delete_pipeline(uuid).await.map_err(explain_delete)?;

    println!(
        "{}",
        format!("✓ Pipeline {} deleted successfully!", uuid)
            .green()
            .bold()
    );

    Ok(())
}

async fn list_stages(client: &PipedeckClient, id: &str) -> Result<()> {
    let uuid = resolve_pipeline_id(client, &IdOrPrefix::parse(id)).await?;

    let stages = client.list_stages(uuid).await?;

    if stages.is_empty() {
        println!("{}", "No stages found.".yellow());
    }
    for stage in stages {
        print_stage_summary(&stage);
    }

    Ok(())
}

/// Print a pipeline summary
fn print_pipeline_summary(pipeline: &Pipeline) {
    println!("  {} {}", "▸".cyan(), pipeline.name.bold());
    println!("    ID:      {}", pipeline.id.to_string().dimmed());
    println!("    Created: {}", timestamp(&pipeline.created_at).dimmed());
    println!();
}
