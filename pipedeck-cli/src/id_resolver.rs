//! ID resolver module
//!
//! Resolves UUID prefixes to full UUIDs using the hierarchy tree.
//! This allows users to specify short, unambiguous prefixes instead of full UUIDs.

use anyhow::{Context, Result, anyhow};
use pipedeck_client::{PipedeckClient, PipelineTree};
use uuid::Uuid;

use crate::types::IdOrPrefix;

/// Resolve a pipeline ID or prefix to a full UUID
///
/// Full UUIDs are returned as-is without contacting the server.
pub async fn resolve_pipeline_id(client: &PipedeckClient, id: &IdOrPrefix) -> Result<Uuid> {
    if let Some(uuid) = id.as_uuid() {
        return Ok(uuid);
    }

    let tree = fetch_tree(client).await?;
    pick("pipeline", id, tree.iter().map(|p| p.pipeline.id))
}

/// Resolve a stage ID or prefix to a full UUID
pub async fn resolve_stage_id(client: &PipedeckClient, id: &IdOrPrefix) -> Result<Uuid> {
    if let Some(uuid) = id.as_uuid() {
        return Ok(uuid);
    }

    let tree = fetch_tree(client).await?;
    pick(
        "stage",
        id,
        tree.iter().flat_map(|p| p.stages.iter().map(|s| s.stage.id)),
    )
}

/// Resolve a field ID or prefix to a full UUID
pub async fn resolve_field_id(client: &PipedeckClient, id: &IdOrPrefix) -> Result<Uuid> {
    if let Some(uuid) = id.as_uuid() {
        return Ok(uuid);
    }

    let tree = fetch_tree(client).await?;
    pick(
        "field",
        id,
        tree.iter()
            .flat_map(|p| p.stages.iter())
            .flat_map(|s| s.fields.iter().map(|f| f.id)),
    )
}

async fn fetch_tree(client: &PipedeckClient) -> Result<Vec<PipelineTree>> {
    client
        .tree()
        .await
        .context("Failed to fetch hierarchy for ID resolution")
}

/// Picks the single candidate matched by `id`
///
/// # Errors
/// Returns an error if no candidate matches or if the prefix is ambiguous.
fn pick(kind: &str, id: &IdOrPrefix, candidates: impl Iterator<Item = Uuid>) -> Result<Uuid> {
    let matches: Vec<Uuid> = candidates.filter(|c| id.matches(c)).collect();

    match matches.as_slice() {
        [] => Err(anyhow!("No {} found with ID starting with '{}'", kind, id)),
        [only] => Ok(*only),
        _ => {
            let ids: Vec<String> = matches.iter().map(Uuid::to_string).collect();
            Err(anyhow!(
                "Ambiguous prefix '{}' matches multiple {}s: {}",
                id,
                kind,
                ids.join(", ")
            ))
        }
    }
}
