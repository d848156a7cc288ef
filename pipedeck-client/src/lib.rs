//! Pipedeck HTTP Client
//!
//! A small, typed HTTP client for the Pipedeck hierarchy server.
//!
//! # Example
//!
//! ```no_run
//! use pipedeck_client::PipedeckClient;
//! use pipedeck_core::domain::field::FieldType;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = PipedeckClient::new("http://localhost:8080");
//!
//!     let pipeline = client.create_pipeline("Sales").await?;
//!     let stage = client.create_stage(pipeline.id, "Lead").await?;
//!     client.create_field(stage.id, "Source", FieldType::Text).await?;
//!
//!     println!("Created pipeline: {}", pipeline.id);
//!     Ok(())
//! }
//! ```

pub mod error;
mod fields;
mod pipelines;
mod stages;

// Re-export commonly used types
pub use error::{ClientError, Result};
pub use pipedeck_core::dto::tree::{PipelineTree, StageTree};

use reqwest::Client;
use serde::Deserialize;
use serde::de::DeserializeOwned;

/// HTTP client for the Pipedeck server API
///
/// Methods are grouped by hierarchy level:
/// - Pipelines (create, list, get, rename, delete, stages, tree)
/// - Stages (create, get, rename, delete, fields)
/// - Fields (create, get, edit, delete)
#[derive(Debug, Clone)]
pub struct PipedeckClient {
    /// Base URL of the server (e.g., "http://localhost:8080")
    base_url: String,
    /// HTTP client instance
    client: Client,
}

/// Error body returned by the server
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

impl PipedeckClient {
    /// Create a new client
    ///
    /// # Example
    /// ```
    /// use pipedeck_client::PipedeckClient;
    ///
    /// let client = PipedeckClient::new("http://localhost:8080");
    /// ```
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, Client::new())
    }

    /// Create a new client with a custom HTTP client
    ///
    /// This allows you to configure timeouts, proxies, TLS settings, etc.
    pub fn with_client(base_url: impl Into<String>, client: Client) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        }
    }

    /// Get the base URL of the server
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    // =============================================================================
    // Response Handlers
    // =============================================================================

    /// Check the status code and deserialize a JSON body
    async fn handle_response<T: DeserializeOwned>(&self, response: reqwest::Response) -> Result<T> {
        let response = Self::check_status(response).await?;

        response
            .json()
            .await
            .map_err(|e| ClientError::ParseError(format!("Failed to parse JSON response: {}", e)))
    }

    /// Check the status code of a response without a body (e.g., DELETE)
    async fn handle_empty_response(&self, response: reqwest::Response) -> Result<()> {
        Self::check_status(response).await?;
        Ok(())
    }

    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response> {
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        let text = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        tracing::debug!("Request failed with status {}: {}", status, text);

        Err(ClientError::api_error(status.as_u16(), error_message(text)))
    }
}

/// Pulls the message out of an `{"error": "..."}` body
fn error_message(text: String) -> String {
    match serde_json::from_str::<ErrorBody>(&text) {
        Ok(body) => body.error,
        Err(_) => text,
    }
}
