//! Stage DTOs

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Request to create a stage inside a pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateStage {
    pub pipeline_id: Uuid,
    pub name: String,
}

/// Request to rename a stage
///
/// The owning pipeline cannot be changed once the stage exists.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateStage {
    pub name: String,
}
