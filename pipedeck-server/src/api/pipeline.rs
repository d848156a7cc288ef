//! Pipeline API Handlers
//!
//! HTTP endpoints for pipeline management.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use pipedeck_core::domain::pipeline::Pipeline;
use pipedeck_core::domain::stage::Stage;
use pipedeck_core::dto::pipeline::{CreatePipeline, UpdatePipeline};
use pipedeck_core::dto::tree::PipelineTree;
use pipedeck_store::Coordinator;
use uuid::Uuid;

use crate::api::error::ApiResult;
use crate::service::pipeline_service;

/// POST /pipeline/create
/// Create a new pipeline
pub async fn create_pipeline(
    State(hierarchy): State<Coordinator>,
    Json(req): Json<CreatePipeline>,
) -> ApiResult<Json<Pipeline>> {
    tracing::info!("Creating pipeline: {}", req.name);

    let pipeline = pipeline_service::create_pipeline(&hierarchy, req).await?;

    Ok(Json(pipeline))
}

/// GET /pipeline/list
/// List all pipelines
pub async fn list_pipelines(
    State(hierarchy): State<Coordinator>,
) -> ApiResult<Json<Vec<Pipeline>>> {
    tracing::debug!("Listing all pipelines");

    let pipelines = pipeline_service::list_pipelines(&hierarchy).await?;

    Ok(Json(pipelines))
}

/// GET /pipeline/{id}
/// Get pipeline by ID
pub async fn get_pipeline(
    State(hierarchy): State<Coordinator>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Pipeline>> {
    tracing::debug!("Getting pipeline: {}", id);

    let pipeline = pipeline_service::get_pipeline(&hierarchy, id).await?;

    Ok(Json(pipeline))
}

/// PUT /pipeline/{id}
/// Rename a pipeline
pub async fn update_pipeline(
    State(hierarchy): State<Coordinator>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdatePipeline>,
) -> ApiResult<Json<Pipeline>> {
    tracing::info!("Renaming pipeline {} to {}", id, req.name);

    let pipeline = pipeline_service::update_pipeline(&hierarchy, id, req).await?;

    Ok(Json(pipeline))
}

/// DELETE /pipeline/{id}
/// Delete a pipeline together with its stages and fields
pub async fn delete_pipeline(
    State(hierarchy): State<Coordinator>,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    tracing::info!("Deleting pipeline: {}", id);

    pipeline_service::delete_pipeline(&hierarchy, id).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// GET /pipeline/{id}/stages
/// List the stages of a pipeline
pub async fn list_stages(
    State(hierarchy): State<Coordinator>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Vec<Stage>>> {
    tracing::debug!("Listing stages for pipeline: {}", id);

    let stages = pipeline_service::list_stages(&hierarchy, id).await?;

    Ok(Json(stages))
}

/// GET /tree
/// The whole hierarchy, nested
pub async fn get_tree(State(hierarchy): State<Coordinator>) -> ApiResult<Json<Vec<PipelineTree>>> {
    tracing::debug!("Loading hierarchy tree");

    let tree = pipeline_service::load_tree(&hierarchy).await?;

    Ok(Json(tree))
}
