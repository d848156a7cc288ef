//! Field Service
//!
//! Business logic for the fields of a stage.

use pipedeck_core::domain::field::Field;
use pipedeck_core::dto::field::{CreateField, UpdateField};
use pipedeck_store::Coordinator;
use uuid::Uuid;

use super::{Result, ServiceError, stage_service, validate_name};

/// Create a field under an existing stage
pub async fn create_field(hierarchy: &Coordinator, req: CreateField) -> Result<Field> {
    let name = validate_name("Field", &req.name)?;

    stage_service::get_stage(hierarchy, req.stage_id).await?;

    let field = hierarchy
        .fields()
        .create(req.stage_id, name, req.field_type)
        .await?;

    Ok(field)
}

/// Get a field by ID
pub async fn get_field(hierarchy: &Coordinator, id: Uuid) -> Result<Field> {
    hierarchy
        .fields()
        .get(id)
        .await?
        .ok_or_else(|| not_found(id))
}

/// Change the name and type of a field
pub async fn update_field(hierarchy: &Coordinator, id: Uuid, req: UpdateField) -> Result<Field> {
    let name = validate_name("Field", &req.name)?;

    hierarchy
        .fields()
        .update(id, name, req.field_type)
        .await
        .map_err(|e| if e.is_not_found() { not_found(id) } else { e.into() })
}

/// Delete a single field
pub async fn delete_field(hierarchy: &Coordinator, id: Uuid) -> Result<()> {
    hierarchy
        .fields()
        .delete(id)
        .await
        .map_err(|e| if e.is_not_found() { not_found(id) } else { e.into() })
}

fn not_found(id: Uuid) -> ServiceError {
    ServiceError::NotFound(format!("Field {} not found", id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pipedeck_core::domain::field::FieldType;
    use pipedeck_store::{BackendError, MemoryBackend, Operation, Table};
    use std::sync::Arc;

    struct Fixture {
        backend: Arc<MemoryBackend>,
        hierarchy: Coordinator,
        stage_id: Uuid,
    }

    async fn fixture() -> Fixture {
        let backend = Arc::new(MemoryBackend::new());
        let hierarchy = Coordinator::new(backend.clone());
        let pipeline = hierarchy.pipelines().create("Sales").await.unwrap();
        let stage = hierarchy.stages().create(pipeline.id, "Lead").await.unwrap();

        Fixture {
            backend,
            hierarchy,
            stage_id: stage.id,
        }
    }

    #[tokio::test]
    async fn test_create_under_missing_stage() {
        let fx = fixture().await;

        let result = create_field(
            &fx.hierarchy,
            CreateField {
                stage_id: Uuid::new_v4(),
                name: "Source".to_string(),
                field_type: FieldType::Text,
            },
        )
        .await;

        assert!(matches!(result, Err(ServiceError::NotFound(msg)) if msg.starts_with("Stage")));
    }

    #[tokio::test]
    async fn test_create_and_update() {
        let fx = fixture().await;

        let field = create_field(
            &fx.hierarchy,
            CreateField {
                stage_id: fx.stage_id,
                name: " Contract ".to_string(),
                field_type: FieldType::Text,
            },
        )
        .await
        .unwrap();
        assert_eq!(field.name, "Contract");

        let updated = update_field(
            &fx.hierarchy,
            field.id,
            UpdateField {
                name: "Signed contract".to_string(),
                field_type: FieldType::File,
            },
        )
        .await
        .unwrap();

        assert_eq!(updated.field_type, FieldType::File);
        assert_eq!(get_field(&fx.hierarchy, field.id).await.unwrap(), updated);
    }

    #[tokio::test]
    async fn test_delete_missing_is_not_found() {
        let fx = fixture().await;

        let result = delete_field(&fx.hierarchy, Uuid::new_v4()).await;

        assert!(matches!(result, Err(ServiceError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_backend_failure_is_passed_through() {
        let fx = fixture().await;
        fx.backend.fail_on(
            Operation::Insert,
            Table::Fields,
            BackendError::transport("connection reset"),
        );

        let result = create_field(
            &fx.hierarchy,
            CreateField {
                stage_id: fx.stage_id,
                name: "Source".to_string(),
                field_type: FieldType::Checkbox,
            },
        )
        .await;

        assert!(matches!(result, Err(ServiceError::Backend(err)) if !err.is_not_found()));
    }
}
