//! Hierarchy Coordinator
//!
//! Cross-level actions over the three stores. The coordinator holds no state
//! of its own: what is "currently open" lives in a [`Selection`] owned by the
//! caller and passed into every action that scopes or refreshes a view.
//!
//! Every mutating action re-fetches the visible collections afterwards. The
//! backend stays the only source of truth; nothing is merged optimistically.

use pipedeck_core::domain::field::{Field, FieldType};
use pipedeck_core::domain::pipeline::Pipeline;
use pipedeck_core::domain::stage::Stage;
use pipedeck_core::dto::tree::PipelineTree;
use std::sync::Arc;
use uuid::Uuid;

use crate::backend::Backend;
use crate::error::Result;
use crate::store::{FieldStore, PipelineStore, StageStore};

/// Caller-owned view state
///
/// Tracks at most one selected pipeline and one selected stage, plus the
/// collections fetched for them. The stage list only ever holds stages of the
/// selected pipeline, and the field list only fields of the selected stage.
#[derive(Debug, Clone, Default)]
pub struct Selection {
    pipelines: Vec<Pipeline>,
    pipeline: Option<Uuid>,
    stages: Vec<Stage>,
    stage: Option<Uuid>,
    fields: Vec<Field>,
    stale: bool,
}

impl Selection {
    pub fn pipelines(&self) -> &[Pipeline] {
        &self.pipelines
    }

    pub fn selected_pipeline(&self) -> Option<Uuid> {
        self.pipeline
    }

    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    pub fn selected_stage(&self) -> Option<Uuid> {
        self.stage
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// True when the last refresh after a mutation failed, so the
    /// collections may not reflect the backend
    pub fn is_stale(&self) -> bool {
        self.stale
    }

    fn clear_pipeline(&mut self) {
        self.pipeline = None;
        self.stages.clear();
        self.clear_stage();
    }

    fn clear_stage(&mut self) {
        self.stage = None;
        self.fields.clear();
    }
}

/// Stateless entry point to the hierarchy
#[derive(Clone)]
pub struct Coordinator {
    pipelines: PipelineStore,
    stages: StageStore,
    fields: FieldStore,
}

impl Coordinator {
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self {
            pipelines: PipelineStore::new(backend.clone()),
            stages: StageStore::new(backend.clone()),
            fields: FieldStore::new(backend),
        }
    }

    pub fn pipelines(&self) -> &PipelineStore {
        &self.pipelines
    }

    pub fn stages(&self) -> &StageStore {
        &self.stages
    }

    pub fn fields(&self) -> &FieldStore {
        &self.fields
    }

    /// Load the whole hierarchy, nested
    pub async fn load_tree(&self) -> Result<Vec<PipelineTree>> {
        let pipelines = self.pipelines.list().await?;
        let stages = self.stages.list_all().await?;
        let fields = self.fields.list_all().await?;

        Ok(PipelineTree::assemble(pipelines, stages, fields))
    }

    // =============================================================================
    // Selection
    // =============================================================================

    /// Select a pipeline (or none) and fetch its stages
    ///
    /// Switching to a different pipeline drops the stage selection. If the
    /// fetch fails the stage list is left empty rather than stale.
    pub async fn select_pipeline(
        &self,
        selection: &mut Selection,
        pipeline_id: Option<Uuid>,
    ) -> Result<()> {
        let Some(id) = pipeline_id else {
            selection.clear_pipeline();
            return Ok(());
        };

        if selection.pipeline != Some(id) {
            selection.clear_stage();
        }
        selection.pipeline = Some(id);

        match self.stages.list(id).await {
            Ok(stages) => {
                selection.stages = stages;
                Ok(())
            }
            Err(err) => {
                selection.stages.clear();
                Err(err)
            }
        }
    }

    /// Select a stage (or none) and fetch its fields
    pub async fn select_stage(
        &self,
        selection: &mut Selection,
        stage_id: Option<Uuid>,
    ) -> Result<()> {
        let Some(id) = stage_id else {
            selection.clear_stage();
            return Ok(());
        };

        selection.stage = Some(id);

        match self.fields.list(id).await {
            Ok(fields) => {
                selection.fields = fields;
                Ok(())
            }
            Err(err) => {
                selection.fields.clear();
                Err(err)
            }
        }
    }

    /// Re-fetch every collection of the selection
    ///
    /// Selections pointing at records that no longer exist are dropped. A
    /// stage selected under a pipeline must still belong to it; a stage
    /// selected with no pipeline is kept as long as it exists.
    pub async fn refresh(&self, selection: &mut Selection) -> Result<()> {
        selection.pipelines = self.pipelines.list().await?;

        let stage = selection.stage;
        let pipeline = selection
            .pipeline
            .filter(|id| selection.pipelines.iter().any(|p| p.id == *id));

        let stage = match (pipeline, stage) {
            (Some(_), _) => {
                self.select_pipeline(selection, pipeline).await?;
                stage.filter(|id| selection.stages.iter().any(|s| s.id == *id))
            }
            (None, Some(id)) if selection.pipeline.is_none() => {
                self.stages.get(id).await?.map(|s| s.id)
            }
            (None, _) => None,
        };

        if pipeline.is_none() {
            selection.clear_pipeline();
        }
        if stage.is_none() {
            selection.clear_stage();
            return Ok(());
        }
        self.select_stage(selection, stage).await
    }

    // =============================================================================
    // Actions
    // =============================================================================

    pub async fn add_pipeline(&self, selection: &mut Selection, name: &str) -> Result<Pipeline> {
        let outcome = self.pipelines.create(name).await;
        self.settle(selection, outcome).await
    }

    pub async fn edit_pipeline(
        &self,
        selection: &mut Selection,
        id: Uuid,
        name: &str,
    ) -> Result<Pipeline> {
        let outcome = self.pipelines.update(id, name).await;
        self.settle(selection, outcome).await
    }

    /// Cascade-delete a pipeline; deselects it when it was selected
    pub async fn delete_pipeline(&self, selection: &mut Selection, id: Uuid) -> Result<()> {
        let outcome = self.pipelines.delete_cascade(id).await;
        self.settle(selection, outcome).await
    }

    pub async fn add_stage(
        &self,
        selection: &mut Selection,
        pipeline_id: Uuid,
        name: &str,
    ) -> Result<Stage> {
        let outcome = self.stages.create(pipeline_id, name).await;
        self.settle(selection, outcome).await
    }

    pub async fn edit_stage(
        &self,
        selection: &mut Selection,
        id: Uuid,
        name: &str,
    ) -> Result<Stage> {
        let outcome = self.stages.update(id, name).await;
        self.settle(selection, outcome).await
    }

    /// Cascade-delete a stage; deselects it when it was selected
    pub async fn delete_stage(&self, selection: &mut Selection, id: Uuid) -> Result<()> {
        let outcome = self.stages.delete_cascade(id).await;
        self.settle(selection, outcome).await
    }

    pub async fn add_field(
        &self,
        selection: &mut Selection,
        stage_id: Uuid,
        name: &str,
        field_type: FieldType,
    ) -> Result<Field> {
        let outcome = self.fields.create(stage_id, name, field_type).await;
        self.settle(selection, outcome).await
    }

    pub async fn edit_field(
        &self,
        selection: &mut Selection,
        id: Uuid,
        name: &str,
        field_type: FieldType,
    ) -> Result<Field> {
        let outcome = self.fields.update(id, name, field_type).await;
        self.settle(selection, outcome).await
    }

    pub async fn delete_field(&self, selection: &mut Selection, id: Uuid) -> Result<()> {
        let outcome = self.fields.delete(id).await;
        self.settle(selection, outcome).await
    }

    /// Refreshes after a mutation attempt and hands back its outcome
    ///
    /// The refresh also runs after a failed mutation, since a failed cascade
    /// may still have removed records. A refresh failure never masks the
    /// mutation's own result; it marks the selection stale instead.
    async fn settle<T>(&self, selection: &mut Selection, outcome: Result<T>) -> Result<T> {
        match self.refresh(selection).await {
            Ok(()) => selection.stale = false,
            Err(err) => {
                tracing::warn!("Refresh after mutation failed: {}", err);
                selection.stale = true;
            }
        }

        if let Err(err) = &outcome {
            tracing::error!("Hierarchy action failed: {}", err);
        }

        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::memory::{MemoryBackend, Operation};
    use crate::error::BackendError;
    use crate::schema::Table;
    use crate::store::fixtures;

    #[tokio::test]
    async fn test_select_pipeline_scopes_stage_list() {
        let sales = fixtures::sales().await;
        let coordinator = &sales.coordinator;
        let support = coordinator.pipelines().create("Support").await.unwrap();
        let triage = coordinator.stages().create(support.id, "Triage").await.unwrap();
        let mut selection = Selection::default();

        coordinator
            .select_pipeline(&mut selection, Some(sales.pipeline.id))
            .await
            .unwrap();
        assert_eq!(selection.stages(), &[sales.stage.clone()]);

        coordinator
            .select_pipeline(&mut selection, Some(support.id))
            .await
            .unwrap();
        assert_eq!(selection.selected_pipeline(), Some(support.id));
        assert_eq!(selection.stages(), &[triage]);
    }

    #[tokio::test]
    async fn test_switching_pipeline_drops_stage_selection() {
        let sales = fixtures::sales().await;
        let coordinator = &sales.coordinator;
        let support = coordinator.pipelines().create("Support").await.unwrap();
        let mut selection = Selection::default();

        coordinator
            .select_pipeline(&mut selection, Some(sales.pipeline.id))
            .await
            .unwrap();
        coordinator
            .select_stage(&mut selection, Some(sales.stage.id))
            .await
            .unwrap();
        assert_eq!(selection.fields(), &[sales.field.clone()]);

        coordinator
            .select_pipeline(&mut selection, Some(support.id))
            .await
            .unwrap();
        assert_eq!(selection.selected_stage(), None);
        assert!(selection.fields().is_empty());
    }

    #[tokio::test]
    async fn test_reselecting_same_pipeline_keeps_stage() {
        let sales = fixtures::sales().await;
        let coordinator = &sales.coordinator;
        let mut selection = Selection::default();

        coordinator
            .select_pipeline(&mut selection, Some(sales.pipeline.id))
            .await
            .unwrap();
        coordinator
            .select_stage(&mut selection, Some(sales.stage.id))
            .await
            .unwrap();
        coordinator
            .select_pipeline(&mut selection, Some(sales.pipeline.id))
            .await
            .unwrap();

        assert_eq!(selection.selected_stage(), Some(sales.stage.id));
        assert_eq!(selection.stages(), &[sales.stage.clone()]);
    }

    #[tokio::test]
    async fn test_select_none_clears_lists() {
        let sales = fixtures::sales().await;
        let coordinator = &sales.coordinator;
        let mut selection = Selection::default();
        coordinator
            .select_pipeline(&mut selection, Some(sales.pipeline.id))
            .await
            .unwrap();
        coordinator
            .select_stage(&mut selection, Some(sales.stage.id))
            .await
            .unwrap();

        coordinator.select_stage(&mut selection, None).await.unwrap();
        assert!(selection.fields().is_empty());
        assert_eq!(selection.stages().len(), 1);

        coordinator.select_pipeline(&mut selection, None).await.unwrap();
        assert!(selection.stages().is_empty());
        assert_eq!(selection.selected_pipeline(), None);
    }

    #[tokio::test]
    async fn test_failed_stage_fetch_never_shows_previous_pipeline() {
        let sales = fixtures::sales().await;
        let coordinator = &sales.coordinator;
        let support = coordinator.pipelines().create("Support").await.unwrap();
        let mut selection = Selection::default();
        coordinator
            .select_pipeline(&mut selection, Some(sales.pipeline.id))
            .await
            .unwrap();

        sales.backend.fail_on(
            Operation::Select,
            Table::Stages,
            BackendError::transport("offline"),
        );
        let err = coordinator
            .select_pipeline(&mut selection, Some(support.id))
            .await
            .unwrap_err();

        assert_eq!(err.kind, crate::BackendErrorKind::Transport);
        assert_eq!(selection.selected_pipeline(), Some(support.id));
        assert!(selection.stages().is_empty());
    }

    #[tokio::test]
    async fn test_add_actions_refresh_visible_lists() {
        let coordinator = Coordinator::new(Arc::new(MemoryBackend::new()));
        let mut selection = Selection::default();

        let sales = coordinator.add_pipeline(&mut selection, "Sales").await.unwrap();
        assert_eq!(selection.pipelines(), &[sales.clone()]);

        coordinator
            .select_pipeline(&mut selection, Some(sales.id))
            .await
            .unwrap();
        let lead = coordinator.add_stage(&mut selection, sales.id, "Lead").await.unwrap();
        assert_eq!(selection.stages(), &[lead.clone()]);

        coordinator
            .select_stage(&mut selection, Some(lead.id))
            .await
            .unwrap();
        let source = coordinator
            .add_field(&mut selection, lead.id, "Source", FieldType::Text)
            .await
            .unwrap();
        assert_eq!(selection.fields(), &[source.clone()]);

        let edited = coordinator
            .edit_field(&mut selection, source.id, "Channel", FieldType::Checkbox)
            .await
            .unwrap();
        assert_eq!(selection.fields(), &[edited]);

        let renamed = coordinator
            .edit_stage(&mut selection, lead.id, "Prospect")
            .await
            .unwrap();
        assert_eq!(selection.stages(), &[renamed]);

        let renamed = coordinator
            .edit_pipeline(&mut selection, sales.id, "Revenue")
            .await
            .unwrap();
        assert_eq!(selection.pipelines(), &[renamed]);
        assert!(!selection.is_stale());
    }

    #[tokio::test]
    async fn test_deleting_selected_pipeline_clears_selection() {
        let sales = fixtures::sales().await;
        let coordinator = &sales.coordinator;
        let mut selection = Selection::default();
        coordinator
            .select_pipeline(&mut selection, Some(sales.pipeline.id))
            .await
            .unwrap();
        coordinator
            .select_stage(&mut selection, Some(sales.stage.id))
            .await
            .unwrap();

        coordinator
            .delete_pipeline(&mut selection, sales.pipeline.id)
            .await
            .unwrap();

        assert!(selection.pipelines().is_empty());
        assert_eq!(selection.selected_pipeline(), None);
        assert_eq!(selection.selected_stage(), None);
        assert!(selection.stages().is_empty());
        assert!(selection.fields().is_empty());
    }

    #[tokio::test]
    async fn test_deleting_selected_stage_keeps_pipeline_selected() {
        let sales = fixtures::sales().await;
        let coordinator = &sales.coordinator;
        let mut selection = Selection::default();
        coordinator
            .select_pipeline(&mut selection, Some(sales.pipeline.id))
            .await
            .unwrap();
        coordinator
            .select_stage(&mut selection, Some(sales.stage.id))
            .await
            .unwrap();

        coordinator
            .delete_stage(&mut selection, sales.stage.id)
            .await
            .unwrap();

        assert_eq!(selection.selected_pipeline(), Some(sales.pipeline.id));
        assert_eq!(selection.selected_stage(), None);
        assert!(selection.stages().is_empty());
    }

    #[tokio::test]
    async fn test_delete_field_refreshes_field_list() {
        let sales = fixtures::sales().await;
        let coordinator = &sales.coordinator;
        let mut selection = Selection::default();
        coordinator
            .select_pipeline(&mut selection, Some(sales.pipeline.id))
            .await
            .unwrap();
        coordinator
            .select_stage(&mut selection, Some(sales.stage.id))
            .await
            .unwrap();

        coordinator
            .delete_field(&mut selection, sales.field.id)
            .await
            .unwrap();

        assert!(selection.fields().is_empty());
        assert_eq!(selection.selected_stage(), Some(sales.stage.id));
    }

    #[tokio::test]
    async fn test_stage_selected_without_pipeline_survives_refresh() {
        let sales = fixtures::sales().await;
        let coordinator = &sales.coordinator;
        let mut selection = Selection::default();
        coordinator
            .select_stage(&mut selection, Some(sales.stage.id))
            .await
            .unwrap();

        let budget = coordinator
            .add_field(
                &mut selection,
                sales.stage.id,
                "Budget",
                FieldType::Checkbox,
            )
            .await
            .unwrap();

        assert_eq!(selection.selected_pipeline(), None);
        assert_eq!(selection.selected_stage(), Some(sales.stage.id));
        assert_eq!(selection.fields(), &[sales.field.clone(), budget]);

        coordinator
            .delete_stage(&mut selection, sales.stage.id)
            .await
            .unwrap();

        assert_eq!(selection.selected_stage(), None);
        assert!(selection.fields().is_empty());
    }

    #[tokio::test]
    async fn test_failed_cascade_refreshes_to_actual_state() {
        let sales = fixtures::sales().await;
        let coordinator = &sales.coordinator;
        let mut selection = Selection::default();
        coordinator
            .select_pipeline(&mut selection, Some(sales.pipeline.id))
            .await
            .unwrap();
        sales.backend.fail_on(
            Operation::Delete,
            Table::Fields,
            BackendError::transport("simulated"),
        );

        let err = coordinator
            .delete_pipeline(&mut selection, sales.pipeline.id)
            .await
            .unwrap_err();

        assert_eq!(err.message, "simulated");
        assert_eq!(selection.pipelines(), &[sales.pipeline.clone()]);
        assert_eq!(selection.stages(), &[sales.stage.clone()]);
        assert!(!selection.is_stale());
    }

    #[tokio::test]
    async fn test_refresh_failure_marks_selection_stale() {
        let sales = fixtures::sales().await;
        let coordinator = &sales.coordinator;
        let mut selection = Selection::default();
        sales.backend.fail_on(
            Operation::Select,
            Table::Pipelines,
            BackendError::transport("offline"),
        );

        let stage = coordinator
            .add_stage(&mut selection, sales.pipeline.id, "Won")
            .await
            .unwrap();

        assert_eq!(stage.name, "Won");
        assert!(selection.is_stale());

        sales.backend.clear_failures();
        coordinator.add_pipeline(&mut selection, "Support").await.unwrap();
        assert!(!selection.is_stale());
        assert_eq!(selection.pipelines().len(), 2);
    }

    #[tokio::test]
    async fn test_load_tree_nests_sales_scenario() {
        let sales = fixtures::sales().await;

        let tree = sales.coordinator.load_tree().await.unwrap();

        assert_eq!(tree.len(), 1);
        assert_eq!(tree[0].pipeline, sales.pipeline);
        assert_eq!(tree[0].stages.len(), 1);
        assert_eq!(tree[0].stages[0].stage, sales.stage);
        assert_eq!(tree[0].stages[0].fields, vec![sales.field.clone()]);
    }
}
