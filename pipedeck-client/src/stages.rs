//! Stage-related API endpoints

use crate::PipedeckClient;
use crate::error::Result;
use pipedeck_core::domain::field::Field;
use pipedeck_core::domain::stage::Stage;
use pipedeck_core::dto::stage::{CreateStage, UpdateStage};
use uuid::Uuid;

impl PipedeckClient {
    // =============================================================================
    // Stage Management
    // =============================================================================

    /// Create a stage under a pipeline
    pub async fn create_stage(&self, pipeline_id: Uuid, name: impl Into<String>) -> Result<Stage> {
        let req = CreateStage {
            pipeline_id,
            name: name.into(),
        };
        let response = self
            .client
            .post(self.url("/stage/create"))
            .json(&req)
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// Get a stage by ID
    pub async fn get_stage(&self, stage_id: Uuid) -> Result<Stage> {
        let response = self
            .client
            .get(self.url(&format!("/stage/{}", stage_id)))
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// Rename a stage
    pub async fn rename_stage(&self, stage_id: Uuid, name: impl Into<String>) -> Result<Stage> {
        let req = UpdateStage { name: name.into() };
        let response = self
            .client
            .put(self.url(&format!("/stage/{}", stage_id)))
            .json(&req)
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// Delete a stage and its fields
    pub async fn delete_stage(&self, stage_id: Uuid) -> Result<()> {
        let response = self
            .client
            .delete(self.url(&format!("/stage/{}", stage_id)))
            .send()
            .await?;

        self.handle_empty_response(response).await
    }

    /// List the fields of a stage
    pub async fn list_fields(&self, stage_id: Uuid) -> Result<Vec<Field>> {
        let response = self
            .client
            .get(self.url(&format!("/stage/{}/fields", stage_id)))
            .send()
            .await?;

        self.handle_response(response).await
    }
}
