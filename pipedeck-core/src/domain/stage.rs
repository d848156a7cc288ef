//! Stage domain types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A step within a pipeline (e.g. "Lead", "Quoted", "Won")
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stage {
    pub id: Uuid,

    /// Owning pipeline. Fixed at creation.
    pub pipeline_id: Uuid,

    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
