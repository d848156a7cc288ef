//! Field-related API endpoints

use crate::PipedeckClient;
use crate::error::Result;
use pipedeck_core::domain::field::{Field, FieldType};
use pipedeck_core::dto::field::{CreateField, UpdateField};
use uuid::Uuid;

impl PipedeckClient {
    /// Create a field under a stage
    pub async fn create_field(
        &self,
        stage_id: Uuid,
        name: impl Into<String>,
        field_type: FieldType,
    ) -> Result<Field> {
        let req = CreateField {
            stage_id,
            name: name.into(),
            field_type,
        };
        let response = self
            .client
            .post(self.url("/field/create"))
            .json(&req)
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// Get a field by ID
    pub async fn get_field(&self, field_id: Uuid) -> Result<Field> {
        let response = self
            .client
            .get(self.url(&format!("/field/{}", field_id)))
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// Replace the name and type of a field
    pub async fn update_field(
        &self,
        field_id: Uuid,
        name: impl Into<String>,
        field_type: FieldType,
    ) -> Result<Field> {
        let req = UpdateField {
            name: name.into(),
            field_type,
        };
        let response = self
            .client
            .put(self.url(&format!("/field/{}", field_id)))
            .json(&req)
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// Delete a field
    pub async fn delete_field(&self, field_id: Uuid) -> Result<()> {
        let response = self
            .client
            .delete(self.url(&format!("/field/{}", field_id)))
            .send()
            .await?;

        self.handle_empty_response(response).await
    }
}
