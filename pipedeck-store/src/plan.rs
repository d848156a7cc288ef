//! Delete plans
//!
//! Cascading deletes are built as an ordered list of [`DeleteStep`]s before
//! anything is removed, then executed one step at a time. Children always
//! come before their parent, and execution stops at the first failing step.
//! Steps that already ran are not rolled back: a failed pipeline cascade can
//! leave some stages removed while the pipeline and the remaining stages stay
//! intact, which is never an orphaned state.

use uuid::Uuid;

use crate::backend::{Backend, Filter};
use crate::error::{BackendError, Result};
use crate::schema::{FIELD_ID, PIPELINE_ID, STAGE_ID, Table};

/// A single delete request of a plan
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteStep {
    /// One field by id
    Field(Uuid),

    /// Every field of a stage; matching nothing is fine
    FieldsOfStage(Uuid),

    /// One stage by id
    Stage(Uuid),

    /// One pipeline by id
    Pipeline(Uuid),
}

impl DeleteStep {
    pub fn table(&self) -> Table {
        match self {
            DeleteStep::Field(_) | DeleteStep::FieldsOfStage(_) => Table::Fields,
            DeleteStep::Stage(_) => Table::Stages,
            DeleteStep::Pipeline(_) => Table::Pipelines,
        }
    }

    pub fn filter(&self) -> Filter {
        match self {
            DeleteStep::Field(id) => Filter::eq(FIELD_ID, id.to_string()),
            DeleteStep::FieldsOfStage(stage_id) => Filter::eq(STAGE_ID, stage_id.to_string()),
            DeleteStep::Stage(id) => Filter::eq(STAGE_ID, id.to_string()),
            DeleteStep::Pipeline(id) => Filter::eq(PIPELINE_ID, id.to_string()),
        }
    }

    /// Whether removing zero rows means the addressed record was missing
    pub fn requires_match(&self) -> bool {
        !matches!(self, DeleteStep::FieldsOfStage(_))
    }

    /// Runs this step against `backend`, returning the number of rows removed
    pub async fn execute(&self, backend: &dyn Backend) -> Result<u64> {
        let removed = backend.delete(self.table(), &self.filter()).await?;

        if removed == 0 && self.requires_match() {
            return Err(BackendError::not_found(format!("{} does not exist", self)));
        }

        Ok(removed)
    }
}

impl std::fmt::Display for DeleteStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeleteStep::Field(id) => write!(f, "field {}", id),
            DeleteStep::FieldsOfStage(id) => write!(f, "fields of stage {}", id),
            DeleteStep::Stage(id) => write!(f, "stage {}", id),
            DeleteStep::Pipeline(id) => write!(f, "pipeline {}", id),
        }
    }
}

/// Ordered sequence of delete steps
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeletePlan {
    steps: Vec<DeleteStep>,
}

impl DeletePlan {
    /// Plan for a single field
    pub fn for_field(field_id: Uuid) -> Self {
        Self {
            steps: vec![DeleteStep::Field(field_id)],
        }
    }

    /// Plan for a stage: its fields, then the stage
    pub fn for_stage(stage_id: Uuid) -> Self {
        Self {
            steps: vec![
                DeleteStep::FieldsOfStage(stage_id),
                DeleteStep::Stage(stage_id),
            ],
        }
    }

    /// Plan for a pipeline: each stage cascade in order, then the pipeline
    pub fn for_pipeline(pipeline_id: Uuid, stage_ids: impl IntoIterator<Item = Uuid>) -> Self {
        let mut steps: Vec<DeleteStep> = stage_ids
            .into_iter()
            .flat_map(|stage_id| Self::for_stage(stage_id).steps)
            .collect();
        steps.push(DeleteStep::Pipeline(pipeline_id));

        Self { steps }
    }

    pub fn steps(&self) -> &[DeleteStep] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Executes the steps sequentially, stopping at the first failure
    ///
    /// Returns the total number of rows removed.
    pub async fn execute(&self, backend: &dyn Backend) -> Result<u64> {
        let mut removed = 0;

        for (index, step) in self.steps.iter().enumerate() {
            match step.execute(backend).await {
                Ok(rows) => {
                    tracing::debug!(
                        "Delete step {}/{} ({}) removed {} row(s)",
                        index + 1,
                        self.len(),
                        step,
                        rows
                    );
                    removed += rows;
                }
                Err(err) => {
                    tracing::warn!(
                        "Delete plan aborted at step {}/{} ({}), {} step(s) left untouched: {}",
                        index + 1,
                        self.len(),
                        step,
                        self.len() - index - 1,
                        err
                    );
                    return Err(err);
                }
            }
        }

        Ok(removed)
    }
}
