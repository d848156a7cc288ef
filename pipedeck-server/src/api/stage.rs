//! Stage API Handlers
//!
//! HTTP endpoints for stage management.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use pipedeck_core::domain::field::Field;
use pipedeck_core::domain::stage::Stage;
use pipedeck_core::dto::stage::{CreateStage, UpdateStage};
use pipedeck_store::Coordinator;
use uuid::Uuid;

use crate::api::error::ApiResult;
use crate::service::stage_service;

/// POST /stage/create
pub async fn create_stage(
    State(hierarchy): State<Coordinator>,
    Json(req): Json<CreateStage>,
) -> ApiResult<Json<Stage>> {
    tracing::info!(
        "Creating stage {} in pipeline {}",
        req.name,
        req.pipeline_id
    );

    let stage = stage_service::create_stage(&hierarchy, req).await?;

    Ok(Json(stage))
}

/// GET /stage/{id}
pub async fn get_stage(
    State(hierarchy): State<Coordinator>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Stage>> {
    tracing::debug!("Getting stage: {}", id);

    let stage = stage_service::get_stage(&hierarchy, id).await?;

    Ok(Json(stage))
}

/// PUT /stage/{id}
pub async fn update_stage(
    State(hierarchy): State<Coordinator>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateStage>,
) -> ApiResult<Json<Stage>> {
    tracing::info!("Renaming stage {} to {}", id, req.name);

    let stage = stage_service::update_stage(&hierarchy, id, req).await?;

    Ok(Json(stage))
}

/// DELETE /stage/{id}
/// Delete a stage together with its fields
pub async fn delete_stage(
    State(hierarchy): State<Coordinator>,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    tracing::info!("Deleting stage: {}", id);

    stage_service::delete_stage(&hierarchy, id).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// GET /stage/{id}/fields
pub async fn list_fields(
    State(hierarchy): State<Coordinator>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Vec<Field>>> {
    tracing::debug!("Listing fields for stage: {}", id);

    let fields = stage_service::list_fields(&hierarchy, id).await?;

    Ok(Json(fields))
}
