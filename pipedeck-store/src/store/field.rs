//! Field Store
//!
//! Leaf records of the hierarchy, always scoped to a parent stage.

use chrono::{DateTime, Utc};
use pipedeck_core::domain::field::{Field, FieldType};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use uuid::Uuid;

use super::{expect_one, from_record, to_record};
use crate::backend::{Backend, Filter, Record};
use crate::error::{BackendError, Result};
use crate::plan::DeletePlan;
use crate::schema::{FIELD_ID, FIELD_NAME, FIELD_TYPE, STAGE_ID, Table, UPDATED_AT};

#[derive(Clone)]
pub struct FieldStore {
    backend: Arc<dyn Backend>,
}

impl FieldStore {
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self { backend }
    }

    /// Fields of one stage, in creation order
    pub async fn list(&self, stage_id: Uuid) -> Result<Vec<Field>> {
        tracing::debug!("Listing fields of stage {}", stage_id);
        self.select(&Filter::eq(STAGE_ID, stage_id.to_string()))
            .await
    }

    /// Every field of every stage
    pub async fn list_all(&self) -> Result<Vec<Field>> {
        self.select(&Filter::all()).await
    }

    pub async fn get(&self, id: Uuid) -> Result<Option<Field>> {
        let mut fields = self.select(&Filter::eq(FIELD_ID, id.to_string())).await?;
        Ok(fields.pop())
    }

    /// Create a field inside `stage_id`
    ///
    /// The name is stored as given. A stage that does not exist is reported
    /// by the backend as a constraint violation.
    pub async fn create(&self, stage_id: Uuid, name: &str, field_type: FieldType) -> Result<Field> {
        let now = Utc::now();
        let row = FieldRow {
            field_id: Uuid::new_v4(),
            stage_id,
            field_name: name.to_string(),
            field_type,
            created_at: now,
            updated_at: now,
        };

        let record = self
            .backend
            .insert(Table::Fields, to_record(Table::Fields, &row)?)
            .await?;
        let field: Field = from_record::<FieldRow>(Table::Fields, record)?.into();

        tracing::info!(
            "Field created: {} ({}) in stage {}",
            field.name,
            field.id,
            stage_id
        );

        Ok(field)
    }

    /// Replace the name and type of a field
    pub async fn update(&self, id: Uuid, name: &str, field_type: FieldType) -> Result<Field> {
        let mut patch = Record::new();
        patch.insert(FIELD_NAME.to_string(), json!(name));
        patch.insert(FIELD_TYPE.to_string(), json!(field_type));
        patch.insert(UPDATED_AT.to_string(), json!(Utc::now()));

        let rows = self
            .backend
            .update(Table::Fields, &Filter::eq(FIELD_ID, id.to_string()), patch)
            .await?;
        let field: Field = expect_one::<FieldRow>(Table::Fields, id, rows)?.into();

        tracing::info!("Field updated: {} ({})", field.name, field.id);

        Ok(field)
    }

    /// Delete a single field
    ///
    /// Deleting a field that does not exist is a `NotFound` error.
    pub async fn delete(&self, id: Uuid) -> Result<()> {
        DeletePlan::for_field(id).execute(self.backend.as_ref()).await?;
        tracing::info!("Field deleted: {}", id);
        Ok(())
    }

    async fn select(&self, filter: &Filter) -> Result<Vec<Field>> {
        self.backend
            .select(Table::Fields, filter)
            .await?
            .into_iter()
            .map(|record| from_record::<FieldRow>(Table::Fields, record).map(Field::from))
            .collect::<std::result::Result<Vec<_>, BackendError>>()
    }
}

// =============================================================================
// Row Types
// =============================================================================

#[derive(Serialize, Deserialize)]
struct FieldRow {
    field_id: Uuid,
    stage_id: Uuid,
    field_name: String,
    field_type: FieldType,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<FieldRow> for Field {
    fn from(row: FieldRow) -> Self {
        Field {
            id: row.field_id,
            stage_id: row.stage_id,
            name: row.field_name,
            field_type: row.field_type,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}
