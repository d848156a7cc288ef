//! Pipeline DTOs

use serde::{Deserialize, Serialize};

/// Request to create a new pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePipeline {
    pub name: String,
}

/// Request to replace the mutable attributes of a pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdatePipeline {
    pub name: String,
}
