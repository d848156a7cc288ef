//! Field DTOs

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::field::FieldType;

/// Request to create a field inside a stage
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateField {
    pub stage_id: Uuid,
    pub name: String,
    #[serde(default)]
    pub field_type: FieldType,
}

/// Whole replacement of a field's mutable attributes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateField {
    pub name: String,
    pub field_type: FieldType,
}
