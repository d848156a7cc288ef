//! Nested hierarchy view
//!
//! The board view of the pipeline configuration: every pipeline with its
//! stages, and every stage with its fields.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

use crate::domain::field::Field;
use crate::domain::pipeline::Pipeline;
use crate::domain::stage::Stage;

/// A pipeline together with its stages
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineTree {
    pub pipeline: Pipeline,
    pub stages: Vec<StageTree>,
}

/// A stage together with its fields
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageTree {
    pub stage: Stage,
    pub fields: Vec<Field>,
}

impl PipelineTree {
    /// Assemble nested trees from three flat collections
    ///
    /// Input order is preserved at every level. Stages whose pipeline is not
    /// in `pipelines` and fields whose stage is not in `stages` are dropped.
    pub fn assemble(pipelines: Vec<Pipeline>, stages: Vec<Stage>, fields: Vec<Field>) -> Vec<Self> {
        let mut fields_by_stage: HashMap<Uuid, Vec<Field>> = HashMap::new();
        for field in fields {
            fields_by_stage.entry(field.stage_id).or_default().push(field);
        }

        let mut stages_by_pipeline: HashMap<Uuid, Vec<StageTree>> = HashMap::new();
        for stage in stages {
            let fields = fields_by_stage.remove(&stage.id).unwrap_or_default();
            stages_by_pipeline
                .entry(stage.pipeline_id)
                .or_default()
                .push(StageTree { stage, fields });
        }

        pipelines
            .into_iter()
            .map(|pipeline| {
                let stages = stages_by_pipeline.remove(&pipeline.id).unwrap_or_default();
                PipelineTree { pipeline, stages }
            })
            .collect()
    }

    /// Total number of fields across all stages
    pub fn field_count(&self) -> usize {
        self.stages.iter().map(|s| s.fields.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::field::FieldType;
    use chrono::Utc;

    fn pipeline(name: &str) -> Pipeline {
        let now = Utc::now();
        Pipeline {
            id: Uuid::new_v4(),
            name: name.to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    fn stage(pipeline_id: Uuid, name: &str) -> Stage {
        let now = Utc::now();
        Stage {
            id: Uuid::new_v4(),
            pipeline_id,
            name: name.to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    fn field(stage_id: Uuid, name: &str) -> Field {
        let now = Utc::now();
        Field {
            id: Uuid::new_v4(),
            stage_id,
            name: name.to_string(),
            field_type: FieldType::Text,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_assemble_groups_by_parent() {
        let sales = pipeline("Sales");
        let support = pipeline("Support");
        let lead = stage(sales.id, "Lead");
        let won = stage(sales.id, "Won");
        let triage = stage(support.id, "Triage");
        let source = field(lead.id, "Source");
        let budget = field(lead.id, "Budget");

        let trees = PipelineTree::assemble(
            vec![sales.clone(), support.clone()],
            vec![lead.clone(), triage.clone(), won.clone()],
            vec![source.clone(), budget.clone()],
        );

        assert_eq!(trees.len(), 2);
        assert_eq!(trees[0].pipeline, sales);
        assert_eq!(trees[0].stages.len(), 2);
        assert_eq!(trees[0].stages[0].stage, lead);
        assert_eq!(trees[0].stages[0].fields, vec![source, budget]);
        assert_eq!(trees[0].stages[1].stage, won);
        assert!(trees[0].stages[1].fields.is_empty());
        assert_eq!(trees[0].field_count(), 2);
        assert_eq!(trees[1].stages[0].stage, triage);
    }

    #[test]
    fn test_assemble_drops_dangling_children() {
        let sales = pipeline("Sales");
        let orphan = stage(Uuid::new_v4(), "Orphan");
        let stray = field(Uuid::new_v4(), "Stray");

        let trees = PipelineTree::assemble(vec![sales], vec![orphan], vec![stray]);

        assert_eq!(trees.len(), 1);
        assert!(trees[0].stages.is_empty());
    }
}
