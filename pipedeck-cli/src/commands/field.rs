//! Field command handlers

use anyhow::Result;
use clap::Subcommand;
use colored::*;
use pipedeck_client::PipedeckClient;
use pipedeck_core::domain::field::{Field, FieldType};

use super::{explain_delete, timestamp};
use crate::config::Config;
use crate::id_resolver::{resolve_field_id, resolve_stage_id};
use crate::types::IdOrPrefix;

/// Field subcommands
#[derive(Subcommand)]
pub enum FieldCommands {
    /// Create a field in a stage
    Create {
        /// Stage ID or unambiguous prefix
        stage: String,
        /// Display name
        name: String,
        /// Field type (text, checkbox or file)
        #[arg(short = 't', long = "type", default_value = "text")]
        field_type: FieldType,
    },
    /// Get field details
    Get {
        /// Field ID or unambiguous prefix
        id: String,
    },
    /// Change the name or type of a field
    Edit {
        /// Field ID or unambiguous prefix
        id: String,
        /// New display name
        #[arg(short, long)]
        name: Option<String>,
        /// New field type
        #[arg(short = 't', long = "type")]
        field_type: Option<FieldType>,
    },
    /// Delete a field
    Delete {
        /// Field ID or unambiguous prefix
        id: String,
    },
}

/// Handle field commands
pub async fn handle_field_command(command: FieldCommands, config: &Config) -> Result<()> {
    let client = config.client();

    match command {
        FieldCommands::Create {
            stage,
            name,
            field_type,
        } => create_field(&client, &stage, &name, field_type).await,
        FieldCommands::Get { id } => get_field(&client, &id).await,
        FieldCommands::Edit {
            id,
            name,
            field_type,
        } => edit_field(&client, &id, name, field_type).await,
        FieldCommands::Delete { id } => delete_field(&client, &id).await,
    }
}

async fn create_field(
    client: &PipedeckClient,
    stage: &str,
    name: &str,
    field_type: FieldType,
) -> Result<()> {
    let stage_id = resolve_stage_id(client, &IdOrPrefix::parse(stage)).await?;

    let field = client.create_field(stage_id, name, field_type).await?;

    println!("{}", "✓ Field created successfully!".green().bold());
    println!("  ID:    {}", field.id.to_string().cyan());
    println!("  Name:  {}", field.name.bold());
    println!("  Type:  {}", field.field_type);
    println!("  Stage: {}", field.stage_id.to_string().dimmed());

    Ok(())
}

async fn get_field(client: &PipedeckClient, id: &str) -> Result<()> {
    let uuid = resolve_field_id(client, &IdOrPrefix::parse(id)).await?;

    let field = client.get_field(uuid).await?;

    println!("{}", "Field Details:".bold());
    println!("  ID:      {}", field.id.to_string().cyan());
    println!("  Name:    {}", field.name.bold());
    println!("  Type:    {}", field.field_type);
    println!("  Stage:   {}", field.stage_id);
    println!("  Created: {}", timestamp(&field.created_at));
    println!("  Updated: {}", timestamp(&field.updated_at));

    Ok(())
}

/// Applies the given changes on top of the current name and type
async fn edit_field(
    client: &PipedeckClient,
    id: &str,
    name: Option<String>,
    field_type: Option<FieldType>,
) -> Result<()> {
    if name.is_none() && field_type.is_none() {
        anyhow::bail!("Nothing to change: pass --name and/or --type");
    }

    let uuid = resolve_field_id(client, &IdOrPrefix::parse(id)).await?;
    let current = client.get_field(uuid).await?;

    let field = client
        .update_field(
            uuid,
            name.unwrap_or(current.name),
            field_type.unwrap_or(current.field_type),
        )
        .await?;

    println!("{}", "✓ Field updated successfully!".green().bold());
    print_field_summary(&field);

    Ok(())
}

async fn delete_field(client: &PipedeckClient, id: &str) -> Result<()> {
    let uuid = resolve_field_id(client, &IdOrPrefix::parse(id)).await?;

    client.delete_field(uuid).await.map_err(explain_delete)?;

    println!(
        "{}",
        format!("✓ Field {} deleted successfully!", uuid)
            .green()
            .bold()
    );

    Ok(())
}

/// Print a field summary
pub(super) fn print_field_summary(field: &Field) {
    println!(
        "  {} {} {}",
        "▸".cyan(),
        field.name.bold(),
        format!("[{}]", field.field_type).dimmed()
    );
    println!("    ID: {}", field.id.to_string().dimmed());
}
