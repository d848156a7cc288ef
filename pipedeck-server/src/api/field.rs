//! Field API Handlers

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use pipedeck_core::domain::field::Field;
use pipedeck_core::dto::field::{CreateField, UpdateField};
use pipedeck_store::Coordinator;
use uuid::Uuid;

use crate::api::error::ApiResult;
use crate::service::field_service;

/// POST /field/create
pub async fn create_field(
    State(hierarchy): State<Coordinator>,
    Json(req): Json<CreateField>,
) -> ApiResult<Json<Field>> {
    tracing::info!(
        "Creating {} field {} in stage {}",
        req.field_type,
        req.name,
        req.stage_id
    );

    let field = field_service::create_field(&hierarchy, req).await?;

    Ok(Json(field))
}

/// GET /field/{id}
pub async fn get_field(
    State(hierarchy): State<Coordinator>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Field>> {
    let field = field_service::get_field(&hierarchy, id).await?;

    Ok(Json(field))
}

/// PUT /field/{id}
pub async fn update_field(
    State(hierarchy): State<Coordinator>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateField>,
) -> ApiResult<Json<Field>> {
    tracing::info!("Updating field: {}", id);

    let field = field_service::update_field(&hierarchy, id, req).await?;

    Ok(Json(field))
}

/// DELETE /field/{id}
pub async fn delete_field(
    State(hierarchy): State<Coordinator>,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    tracing::info!("Deleting field: {}", id);

    field_service::delete_field(&hierarchy, id).await?;

    Ok(StatusCode::NO_CONTENT)
}
