//! Stage Store
//!
//! Stages belong to a pipeline and own their fields. Deleting a stage always
//! goes through [`DeletePlan::for_stage`], which removes the fields first.

use chrono::{DateTime, Utc};
use pipedeck_core::domain::stage::Stage;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use uuid::Uuid;

use super::{expect_one, from_record, to_record};
use crate::backend::{Backend, Filter, Record};
use crate::error::{BackendError, Result};
use crate::plan::DeletePlan;
use crate::schema::{PIPELINE_ID, STAGE_ID, STAGE_NAME, Table, UPDATED_AT};

#[derive(Clone)]
pub struct StageStore {
    backend: Arc<dyn Backend>,
}

impl StageStore {
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self { backend }
    }

    /// Stages of one pipeline, in creation order
    pub async fn list(&self, pipeline_id: Uuid) -> Result<Vec<Stage>> {
        tracing::debug!("Listing stages of pipeline {}", pipeline_id);
        self.select(&Filter::eq(PIPELINE_ID, pipeline_id.to_string()))
            .await
    }

    /// Every stage of every pipeline
    pub async fn list_all(&self) -> Result<Vec<Stage>> {
        self.select(&Filter::all()).await
    }

    pub async fn get(&self, id: Uuid) -> Result<Option<Stage>> {
        let mut stages = self.select(&Filter::eq(STAGE_ID, id.to_string())).await?;
        Ok(stages.pop())
    }

    /// Create a stage inside `pipeline_id`
    pub async fn create(&self, pipeline_id: Uuid, name: &str) -> Result<Stage> {
        let now = Utc::now();
        let row = StageRow {
            stage_id: Uuid::new_v4(),
            pipeline_id,
            stage_name: name.to_string(),
            created_at: now,
            updated_at: now,
        };

        let record = self
            .backend
            .insert(Table::Stages, to_record(Table::Stages, &row)?)
            .await?;
        let stage: Stage = from_record::<StageRow>(Table::Stages, record)?.into();

        tracing::info!(
            "Stage created: {} ({}) in pipeline {}",
            stage.name,
            stage.id,
            pipeline_id
        );

        Ok(stage)
    }

    /// Rename a stage
    pub async fn update(&self, id: Uuid, name: &str) -> Result<Stage> {
        let mut patch = Record::new();
        patch.insert(STAGE_NAME.to_string(), json!(name));
        patch.insert(UPDATED_AT.to_string(), json!(Utc::now()));

        let rows = self
            .backend
            .update(Table::Stages, &Filter::eq(STAGE_ID, id.to_string()), patch)
            .await?;
        let stage: Stage = expect_one::<StageRow>(Table::Stages, id, rows)?.into();

        tracing::info!("Stage updated: {} ({})", stage.name, stage.id);

        Ok(stage)
    }

    /// Delete a stage and all of its fields
    ///
    /// Fields go first. If removing them fails the stage is left in place and
    /// the error is returned, so the cascade can simply be retried.
    pub async fn delete_cascade(&self, id: Uuid) -> Result<()> {
        DeletePlan::for_stage(id)
            .execute(self.backend.as_ref())
            .await?;

        tracing::info!("Stage deleted: {}", id);

        Ok(())
    }

    /// Ids of the stages belonging to a pipeline
    pub(crate) async fn ids_of(&self, pipeline_id: Uuid) -> Result<Vec<Uuid>> {
        let stages = self.list(pipeline_id).await?;
        Ok(stages.into_iter().map(|s| s.id).collect())
    }

    async fn select(&self, filter: &Filter) -> Result<Vec<Stage>> {
        self.backend
            .select(Table::Stages, filter)
            .await?
            .into_iter()
            .map(|record| from_record::<StageRow>(Table::Stages, record).map(Stage::from))
            .collect::<std::result::Result<Vec<_>, BackendError>>()
    }
}

// =============================================================================
// Row Types
// =============================================================================

#[derive(Serialize, Deserialize)]
struct StageRow {
    stage_id: Uuid,
    pipeline_id: Uuid,
    stage_name: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<StageRow> for Stage {
    fn from(row: StageRow) -> Self {
        Stage {
            id: row.stage_id,
            pipeline_id: row.pipeline_id,
            name: row.stage_name,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}
