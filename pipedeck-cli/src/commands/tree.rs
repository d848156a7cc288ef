//! Tree command handler
//!
//! Prints the whole hierarchy with one request.

use anyhow::Result;
use colored::*;

use crate::config::Config;

/// Show every pipeline with its stages and fields
pub async fn show_tree(config: &Config, json: bool) -> Result<()> {
    let tree = config.client().tree().await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&tree)?);
        return Ok(());
    }

    if tree.is_empty() {
        println!("{}", "No pipelines found.".yellow());
        return Ok(());
    }

    for node in &tree {
        println!(
            "{} {} {}",
            "▸".cyan(),
            node.pipeline.name.bold(),
            short_id(&node.pipeline.id).dimmed()
        );

        for stage in &node.stages {
            println!(
                "  {} {} {}",
                "▸".cyan(),
                stage.stage.name,
                short_id(&stage.stage.id).dimmed()
            );

            for field in &stage.fields {
                println!(
                    "    - {} {} {}",
                    field.name,
                    format!("[{}]", field.field_type).dimmed(),
                    short_id(&field.id).dimmed()
                );
            }
        }
    }

    let stages: usize = tree.iter().map(|p| p.stages.len()).sum();
    let fields: usize = tree.iter().map(|p| p.field_count()).sum();
    println!();
    println!(
        "{}",
        format!(
            "{} pipeline(s), {} stage(s), {} field(s)",
            tree.len(),
            stages,
            fields
        )
        .dimmed()
    );

    Ok(())
}

/// First block of a UUID, enough for prefix lookups
fn short_id(id: &uuid::Uuid) -> String {
    id.to_string().chars().take(8).collect()
}
