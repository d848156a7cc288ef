//! Pipeline Store
//!
//! Top level of the hierarchy. A pipeline delete enumerates its stages and
//! runs each stage cascade before removing the pipeline row itself.

use chrono::{DateTime, Utc};
use pipedeck_core::domain::pipeline::Pipeline;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use uuid::Uuid;

use super::{StageStore, expect_one, from_record, to_record};
use crate::backend::{Backend, Filter, Record};
use crate::error::{BackendError, Result};
use crate::plan::DeletePlan;
use crate::schema::{PIPELINE_ID, PIPELINE_NAME, Table, UPDATED_AT};

#[derive(Clone)]
pub struct PipelineStore {
    backend: Arc<dyn Backend>,
    stages: StageStore,
}

impl PipelineStore {
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self {
            stages: StageStore::new(backend.clone()),
            backend,
        }
    }

    /// List all pipelines, in creation order
    pub async fn list(&self) -> Result<Vec<Pipeline>> {
        tracing::debug!("Listing pipelines");
        self.select(&Filter::all()).await
    }

    pub async fn get(&self, id: Uuid) -> Result<Option<Pipeline>> {
        let mut pipelines = self
            .select(&Filter::eq(PIPELINE_ID, id.to_string()))
            .await?;
        Ok(pipelines.pop())
    }

    /// Create a new pipeline
    pub async fn create(&self, name: &str) -> Result<Pipeline> {
        let now = Utc::now();
        let row = PipelineRow {
            pipeline_id: Uuid::new_v4(),
            pipeline_name: name.to_string(),
            created_at: now,
            updated_at: now,
        };

        let record = self
            .backend
            .insert(Table::Pipelines, to_record(Table::Pipelines, &row)?)
            .await?;
        let pipeline: Pipeline = from_record::<PipelineRow>(Table::Pipelines, record)?.into();

        tracing::info!("Pipeline created: {} ({})", pipeline.name, pipeline.id);

        Ok(pipeline)
    }

    /// Rename a pipeline
    pub async fn update(&self, id: Uuid, name: &str) -> Result<Pipeline> {
        let mut patch = Record::new();
        patch.insert(PIPELINE_NAME.to_string(), json!(name));
        patch.insert(UPDATED_AT.to_string(), json!(Utc::now()));

        let rows = self
            .backend
            .update(
                Table::Pipelines,
                &Filter::eq(PIPELINE_ID, id.to_string()),
                patch,
            )
            .await?;
        let pipeline: Pipeline = expect_one::<PipelineRow>(Table::Pipelines, id, rows)?.into();

        tracing::info!("Pipeline updated: {} ({})", pipeline.name, pipeline.id);

        Ok(pipeline)
    }

    /// Build the delete plan for a pipeline
    ///
    /// Reads the pipeline's current stages; nothing is deleted.
    pub async fn plan_delete(&self, id: Uuid) -> Result<DeletePlan> {
        let stage_ids = self.stages.ids_of(id).await?;
        Ok(DeletePlan::for_pipeline(id, stage_ids))
    }

    /// Delete a pipeline, its stages and their fields
    ///
    /// If enumerating the stages fails nothing is deleted. If a stage cascade
    /// fails part-way, the stages already handled stay deleted, the remaining
    /// ones are untouched and the pipeline row is kept.
    pub async fn delete_cascade(&self, id: Uuid) -> Result<()> {
        let plan = self.plan_delete(id).await?;
        plan.execute(self.backend.as_ref()).await?;

        tracing::info!("Pipeline deleted: {}", id);

        Ok(())
    }

    async fn select(&self, filter: &Filter) -> Result<Vec<Pipeline>> {
        self.backend
            .select(Table::Pipelines, filter)
            .await?
            .into_iter()
            .map(|record| from_record::<PipelineRow>(Table::Pipelines, record).map(Pipeline::from))
            .collect::<std::result::Result<Vec<_>, BackendError>>()
    }
}

// =============================================================================
// Row Types
// =============================================================================

#[derive(Serialize, Deserialize)]
struct PipelineRow {
    pipeline_id: Uuid,
    pipeline_name: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<PipelineRow> for Pipeline {
    fn from(row: PipelineRow) -> Self {
        Pipeline {
            id: row.pipeline_id,
            name: row.pipeline_name,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::memory::Operation;
    use crate::error::BackendErrorKind;
    use crate::plan::DeleteStep;
    use crate::store::fixtures;
    use pipedeck_core::domain::field::FieldType;

    #[tokio::test]
    async fn test_create_then_list_includes_new_pipeline() {
        let sales = fixtures::sales().await;
        let pipelines = sales.coordinator.pipelines();

        let support = pipelines.create("Support").await.unwrap();

        let listed = pipelines.list().await.unwrap();
        assert_eq!(listed, vec![sales.pipeline.clone(), support]);
    }

    #[tokio::test]
    async fn test_update_renames() {
        let sales = fixtures::sales().await;
        let pipelines = sales.coordinator.pipelines();

        let renamed = pipelines.update(sales.pipeline.id, "Enterprise").await.unwrap();

        assert_eq!(renamed.name, "Enterprise");
        assert!(renamed.updated_at >= sales.pipeline.updated_at);
        assert_eq!(pipelines.get(sales.pipeline.id).await.unwrap(), Some(renamed));
    }

    #[tokio::test]
    async fn test_update_missing_pipeline_is_not_found() {
        let sales = fixtures::sales().await;

        let err = sales
            .coordinator
            .pipelines()
            .update(Uuid::new_v4(), "Ghost")
            .await
            .unwrap_err();

        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_plan_delete_orders_children_first() {
        let sales = fixtures::sales().await;
        let won = sales
            .coordinator
            .stages()
            .create(sales.pipeline.id, "Won")
            .await
            .unwrap();

        let plan = sales
            .coordinator
            .pipelines()
            .plan_delete(sales.pipeline.id)
            .await
            .unwrap();

        assert_eq!(
            plan.steps(),
            &[
                DeleteStep::FieldsOfStage(sales.stage.id),
                DeleteStep::Stage(sales.stage.id),
                DeleteStep::FieldsOfStage(won.id),
                DeleteStep::Stage(won.id),
                DeleteStep::Pipeline(sales.pipeline.id),
            ]
        );
    }

    #[tokio::test]
    async fn test_delete_cascade_removes_whole_hierarchy() {
        let sales = fixtures::sales().await;
        let coordinator = &sales.coordinator;
        let won = coordinator.stages().create(sales.pipeline.id, "Won").await.unwrap();
        coordinator
            .fields()
            .create(won.id, "Contract", FieldType::File)
            .await
            .unwrap();

        coordinator.pipelines().delete_cascade(sales.pipeline.id).await.unwrap();

        assert!(coordinator.fields().list(sales.stage.id).await.unwrap().is_empty());
        assert!(coordinator.fields().list(won.id).await.unwrap().is_empty());
        assert!(coordinator.stages().list(sales.pipeline.id).await.unwrap().is_empty());
        assert_eq!(coordinator.pipelines().get(sales.pipeline.id).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_delete_cascade_keeps_other_pipelines() {
        let sales = fixtures::sales().await;
        let coordinator = &sales.coordinator;
        let support = coordinator.pipelines().create("Support").await.unwrap();
        let triage = coordinator.stages().create(support.id, "Triage").await.unwrap();

        coordinator.pipelines().delete_cascade(sales.pipeline.id).await.unwrap();

        assert_eq!(coordinator.pipelines().list().await.unwrap(), vec![support.clone()]);
        assert_eq!(coordinator.stages().list(support.id).await.unwrap(), vec![triage]);
    }

    #[tokio::test]
    async fn test_delete_cascade_without_stages() {
        let sales = fixtures::sales().await;
        let pipelines = sales.coordinator.pipelines();
        let empty = pipelines.create("Empty").await.unwrap();

        pipelines.delete_cascade(empty.id).await.unwrap();

        assert_eq!(pipelines.get(empty.id).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_enumeration_failure_deletes_nothing() {
        let sales = fixtures::sales().await;
        sales.backend.fail_on(
            Operation::Select,
            Table::Stages,
            BackendError::transport("timeout"),
        );

        let err = sales
            .coordinator
            .pipelines()
            .delete_cascade(sales.pipeline.id)
            .await
            .unwrap_err();

        assert_eq!(err.kind, BackendErrorKind::Transport);
        assert_eq!(sales.backend.row_count(Table::Pipelines), 1);
        assert_eq!(sales.backend.row_count(Table::Stages), 1);
        assert_eq!(sales.backend.row_count(Table::Fields), 1);
    }

    #[tokio::test]
    async fn test_field_failure_keeps_field_stage_and_pipeline() {
        let sales = fixtures::sales().await;
        sales.backend.fail_on(
            Operation::Delete,
            Table::Fields,
            BackendError::transport("simulated outage"),
        );

        let err = sales
            .coordinator
            .pipelines()
            .delete_cascade(sales.pipeline.id)
            .await
            .unwrap_err();

        assert_eq!(err.message, "simulated outage");
        let coordinator = &sales.coordinator;
        assert_eq!(
            coordinator.fields().get(sales.field.id).await.unwrap(),
            Some(sales.field.clone())
        );
        assert_eq!(
            coordinator.stages().get(sales.stage.id).await.unwrap(),
            Some(sales.stage.clone())
        );
        assert_eq!(
            coordinator.pipelines().get(sales.pipeline.id).await.unwrap(),
            Some(sales.pipeline.clone())
        );
    }

    #[tokio::test]
    async fn test_mid_cascade_failure_leaves_partially_pruned_pipeline() {
        let sales = fixtures::sales().await;
        let coordinator = &sales.coordinator;
        let won = coordinator.stages().create(sales.pipeline.id, "Won").await.unwrap();
        let reason = coordinator
            .fields()
            .create(won.id, "Reason", FieldType::Text)
            .await
            .unwrap();

        // "Lead" cascades fine, the field cleanup of "Won" fails
        sales.backend.fail_after(
            Operation::Delete,
            Table::Fields,
            1,
            BackendError::transport("connection reset"),
        );

        let err = coordinator
            .pipelines()
            .delete_cascade(sales.pipeline.id)
            .await
            .unwrap_err();

        assert_eq!(err.kind, BackendErrorKind::Transport);
        assert_eq!(coordinator.stages().get(sales.stage.id).await.unwrap(), None);
        assert_eq!(
            coordinator.stages().list(sales.pipeline.id).await.unwrap(),
            vec![won.clone()]
        );
        assert_eq!(coordinator.fields().list(won.id).await.unwrap(), vec![reason]);
        assert!(coordinator.pipelines().get(sales.pipeline.id).await.unwrap().is_some());

        // Nothing is orphaned and a retry finishes the job
        sales.backend.clear_failures();
        coordinator.pipelines().delete_cascade(sales.pipeline.id).await.unwrap();
        assert_eq!(sales.backend.row_count(Table::Pipelines), 0);
        assert_eq!(sales.backend.row_count(Table::Stages), 0);
        assert_eq!(sales.backend.row_count(Table::Fields), 0);
    }

    #[tokio::test]
    async fn test_delete_missing_pipeline_is_not_found() {
        let sales = fixtures::sales().await;

        let err = sales
            .coordinator
            .pipelines()
            .delete_cascade(Uuid::new_v4())
            .await
            .unwrap_err();

        assert!(err.is_not_found());
    }
}
