//! Stage Service
//!
//! Business logic for the stages of a pipeline.

use pipedeck_core::domain::field::Field;
use pipedeck_core::domain::stage::Stage;
use pipedeck_core::dto::stage::{CreateStage, UpdateStage};
use pipedeck_store::Coordinator;
use uuid::Uuid;

use super::{Result, ServiceError, pipeline_service, validate_name};

/// Create a stage under an existing pipeline
pub async fn create_stage(hierarchy: &Coordinator, req: CreateStage) -> Result<Stage> {
    let name = validate_name("Stage", &req.name)?;

    pipeline_service::get_pipeline(hierarchy, req.pipeline_id).await?;

    let stage = hierarchy.stages().create(req.pipeline_id, name).await?;

    Ok(stage)
}

/// Get a stage by ID
pub async fn get_stage(hierarchy: &Coordinator, id: Uuid) -> Result<Stage> {
    hierarchy
        .stages()
        .get(id)
        .await?
        .ok_or_else(|| not_found(id))
}

/// Rename a stage
pub async fn update_stage(hierarchy: &Coordinator, id: Uuid, req: UpdateStage) -> Result<Stage> {
    let name = validate_name("Stage", &req.name)?;

    hierarchy
        .stages()
        .update(id, name)
        .await
        .map_err(|e| if e.is_not_found() { not_found(id) } else { e.into() })
}

/// Delete a stage and its fields
pub async fn delete_stage(hierarchy: &Coordinator, id: Uuid) -> Result<()> {
    hierarchy
        .stages()
        .delete_cascade(id)
        .await
        .map_err(|e| if e.is_not_found() { not_found(id) } else { e.into() })
}

/// List the fields of a stage
pub async fn list_fields(hierarchy: &Coordinator, id: Uuid) -> Result<Vec<Field>> {
    get_stage(hierarchy, id).await?;

    let fields = hierarchy.fields().list(id).await?;
    Ok(fields)
}

fn not_found(id: Uuid) -> ServiceError {
    ServiceError::NotFound(format!("Stage {} not found", id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pipedeck_core::domain::field::FieldType;
    use pipedeck_store::MemoryBackend;
    use std::sync::Arc;

    fn hierarchy() -> Coordinator {
        Coordinator::new(Arc::new(MemoryBackend::new()))
    }

    #[tokio::test]
    async fn test_create_under_missing_pipeline() {
        let hierarchy = hierarchy();

        let result = create_stage(
            &hierarchy,
            CreateStage {
                pipeline_id: Uuid::new_v4(),
                name: "Lead".to_string(),
            },
        )
        .await;

        assert!(matches!(result, Err(ServiceError::NotFound(msg)) if msg.starts_with("Pipeline")));
    }

    #[tokio::test]
    async fn test_create_validates_before_lookup() {
        let result = create_stage(
            &hierarchy(),
            CreateStage {
                pipeline_id: Uuid::new_v4(),
                name: String::new(),
            },
        )
        .await;

        assert!(matches!(result, Err(ServiceError::ValidationError(_))));
    }

    #[tokio::test]
    async fn test_rename_and_list_fields() {
        let hierarchy = hierarchy();
        let pipeline = hierarchy.pipelines().create("Sales").await.unwrap();
        let stage = create_stage(
            &hierarchy,
            CreateStage {
                pipeline_id: pipeline.id,
                name: "Lead".to_string(),
            },
        )
        .await
        .unwrap();
        let field = hierarchy
            .fields()
            .create(stage.id, "Source", FieldType::Text)
            .await
            .unwrap();

        let renamed = update_stage(
            &hierarchy,
            stage.id,
            UpdateStage {
                name: "Qualified".to_string(),
            },
        )
        .await
        .unwrap();

        assert_eq!(renamed.name, "Qualified");
        assert_eq!(renamed.pipeline_id, pipeline.id);
        assert_eq!(list_fields(&hierarchy, stage.id).await.unwrap(), vec![field]);
    }

    #[tokio::test]
    async fn test_delete_removes_fields() {
        let hierarchy = hierarchy();
        let pipeline = hierarchy.pipelines().create("Sales").await.unwrap();
        let stage = hierarchy.stages().create(pipeline.id, "Lead").await.unwrap();
        hierarchy
            .fields()
            .create(stage.id, "Source", FieldType::File)
            .await
            .unwrap();

        delete_stage(&hierarchy, stage.id).await.unwrap();

        assert!(hierarchy.fields().list_all().await.unwrap().is_empty());
        assert!(matches!(
            get_stage(&hierarchy, stage.id).await,
            Err(ServiceError::NotFound(_))
        ));
    }
}
