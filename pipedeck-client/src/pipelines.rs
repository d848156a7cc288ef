//! Pipeline-related API endpoints

use crate::PipedeckClient;
use crate::error::Result;
use pipedeck_core::domain::pipeline::Pipeline;
use pipedeck_core::domain::stage::Stage;
use pipedeck_core::dto::pipeline::{CreatePipeline, UpdatePipeline};
use pipedeck_core::dto::tree::PipelineTree;
use uuid::Uuid;

impl PipedeckClient {
    // =============================================================================
    // Pipeline Management
    // =============================================================================

    /// Create a new pipeline
    ///
    /// # Example
    /// ```no_run
    /// # use pipedeck_client::PipedeckClient;
    /// # async fn example() -> anyhow::Result<()> {
    /// let client = PipedeckClient::new("http://localhost:8080");
    /// let pipeline = client.create_pipeline("Sales").await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn create_pipeline(&self, name: impl Into<String>) -> Result<Pipeline> {
        let req = CreatePipeline { name: name.into() };
        let response = self
            .client
            .post(self.url("/pipeline/create"))
            .json(&req)
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// List all pipelines, oldest first
    pub async fn list_pipelines(&self) -> Result<Vec<Pipeline>> {
        let response = self.client.get(self.url("/pipeline/list")).send().await?;

        self.handle_response(response).await
    }

    /// Get a pipeline by ID
    pub async fn get_pipeline(&self, pipeline_id: Uuid) -> Result<Pipeline> {
        let response = self
            .client
            .get(self.url(&format!("/pipeline/{}", pipeline_id)))
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// Rename a pipeline
    pub async fn rename_pipeline(
        &self,
        pipeline_id: Uuid,
        name: impl Into<String>,
    ) -> Result<Pipeline> {
        let req = UpdatePipeline { name: name.into() };
        let response = self
            .client
            .put(self.url(&format!("/pipeline/{}", pipeline_id)))
            .json(&req)
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// Delete a pipeline with all of its stages and fields
    pub async fn delete_pipeline(&self, pipeline_id: Uuid) -> Result<()> {
        let response = self
            .client
            .delete(self.url(&format!("/pipeline/{}", pipeline_id)))
            .send()
            .await?;

        self.handle_empty_response(response).await
    }

    /// List the stages of a pipeline
    pub async fn list_stages(&self, pipeline_id: Uuid) -> Result<Vec<Stage>> {
        let response = self
            .client
            .get(self.url(&format!("/pipeline/{}/stages", pipeline_id)))
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// Fetch the whole hierarchy in one request
    pub async fn tree(&self) -> Result<Vec<PipelineTree>> {
        let response = self.client.get(self.url("/tree")).send().await?;

        self.handle_response(response).await
    }
}
