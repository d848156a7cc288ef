//! Configuration module
//!
//! Handles CLI configuration such as the server URL.

use pipedeck_client::PipedeckClient;

/// CLI configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// URL of the Pipedeck server
    pub server_url: String,
}

impl Config {
    /// Client for the configured server
    pub fn client(&self) -> PipedeckClient {
        PipedeckClient::new(&self.server_url)
    }
}
