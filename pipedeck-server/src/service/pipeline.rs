//! Pipeline Service
//!
//! Business logic for pipeline management.

use pipedeck_core::domain::pipeline::Pipeline;
use pipedeck_core::domain::stage::Stage;
use pipedeck_core::dto::pipeline::{CreatePipeline, UpdatePipeline};
use pipedeck_core::dto::tree::PipelineTree;
use pipedeck_store::Coordinator;
use uuid::Uuid;

use super::{Result, ServiceError, validate_name};

/// Create a new pipeline
pub async fn create_pipeline(hierarchy: &Coordinator, req: CreatePipeline) -> Result<Pipeline> {
    let name = validate_name("Pipeline", &req.name)?;

    let pipeline = hierarchy.pipelines().create(name).await?;

    Ok(pipeline)
}

/// Get a pipeline by ID
pub async fn get_pipeline(hierarchy: &Coordinator, id: Uuid) -> Result<Pipeline> {
    hierarchy
        .pipelines()
        .get(id)
        .await?
        .ok_or_else(|| not_found(id))
}

/// List all pipelines
pub async fn list_pipelines(hierarchy: &Coordinator) -> Result<Vec<Pipeline>> {
    let pipelines = hierarchy.pipelines().list().await?;
    Ok(pipelines)
}

/// Rename a pipeline
pub async fn update_pipeline(
    hierarchy: &Coordinator,
    id: Uuid,
    req: UpdatePipeline,
) -> Result<Pipeline> {
    let name = validate_name("Pipeline", &req.name)?;

    hierarchy
        .pipelines()
        .update(id, name)
        .await
        .map_err(|e| if e.is_not_found() { not_found(id) } else { e.into() })
}

/// Delete a pipeline with all of its stages and fields
///
/// Only a missing pipeline is reported as `NotFound` for the pipeline; a
/// failing step of the cascade is returned as the backend reported it.
pub async fn delete_pipeline(hierarchy: &Coordinator, id: Uuid) -> Result<()> {
    get_pipeline(hierarchy, id).await?;

    hierarchy.pipelines().delete_cascade(id).await?;

    Ok(())
}

/// List the stages of a pipeline
pub async fn list_stages(hierarchy: &Coordinator, id: Uuid) -> Result<Vec<Stage>> {
    // Distinguish "no stages" from "no such pipeline"
    get_pipeline(hierarchy, id).await?;

    let stages = hierarchy.stages().list(id).await?;
    Ok(stages)
}

/// The whole hierarchy, nested
pub async fn load_tree(hierarchy: &Coordinator) -> Result<Vec<PipelineTree>> {
    let tree = hierarchy.load_tree().await?;
    Ok(tree)
}

fn not_found(id: Uuid) -> ServiceError {
    ServiceError::NotFound(format!("Pipeline {} not found", id))
}
