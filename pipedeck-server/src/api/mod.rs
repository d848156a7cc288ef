//! API Module
//!
//! HTTP API layer for the hierarchy server.
//! Each submodule handles endpoints for one level of the hierarchy.

pub mod error;
pub mod field;
pub mod health;
pub mod pipeline;
pub mod stage;

use axum::{
    Router,
    routing::{get, post},
};
use pipedeck_store::Coordinator;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Create the main API router with all endpoints
pub fn create_router(hierarchy: Coordinator) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health::health_check))
        // Whole hierarchy
        .route("/tree", get(pipeline::get_tree))
        // Pipeline endpoints
        .route("/pipeline/create", post(pipeline::create_pipeline))
        .route("/pipeline/list", get(pipeline::list_pipelines))
        .route(
            "/pipeline/{id}",
            get(pipeline::get_pipeline)
                .put(pipeline::update_pipeline)
                .delete(pipeline::delete_pipeline),
        )
        .route("/pipeline/{id}/stages", get(pipeline::list_stages))
        // Stage endpoints
        .route("/stage/create", post(stage::create_stage))
        .route(
            "/stage/{id}",
            get(stage::get_stage)
                .put(stage::update_stage)
                .delete(stage::delete_stage),
        )
        .route("/stage/{id}/fields", get(stage::list_fields))
        // Field endpoints
        .route("/field/create", post(field::create_field))
        .route(
            "/field/{id}",
            get(field::get_field)
                .put(field::update_field)
                .delete(field::delete_field),
        )
        // Add state and middleware
        .with_state(hierarchy)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
