//! Scenegen HTTP Client
//!
//! A type-safe HTTP client for the scenegen generation backend.
//!
//! The backend exposes two parallel endpoint families with the same
//! shape, one per asset type (3D objects, HDRI environments). A single
//! [`GenerationClient`] covers both, selected by [`EndpointFamily`]
//! rather than by separate client types.
//!
//! # Example
//!
//! ```no_run
//! use scenegen_client::{EndpointFamily, GenerationBackend, GenerationClient};
//! use scenegen_core::domain::job::JobConfiguration;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = GenerationClient::new("http://localhost:3000", "my_client", EndpointFamily::Hdri);
//!
//!     let config = JobConfiguration::new("overcast harbor at dusk");
//!     let job_id = client.submit(&config).await?;
//!
//!     println!("Submitted job: {}", job_id);
//!     Ok(())
//! }
//! ```

pub mod backend;
pub mod error;
mod generation;

// Re-export commonly used types
pub use backend::{EventBatch, GenerationBackend};
pub use error::{ClientError, Result};

use reqwest::Client;
use serde::de::DeserializeOwned;

/// Endpoint family served by the backend, one per asset type.
///
/// Each family mounts the same four operations (`add_task`,
/// `get_events`, `get_status`, `get_result`) under its own path prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndpointFamily {
    /// 3D object generation (accepts a reference sketch image)
    Object,
    /// HDRI environment generation (prompt only)
    Hdri,
}

impl EndpointFamily {
    /// The URL path prefix for this family
    pub fn path_prefix(&self) -> &'static str {
        match self {
            Self::Object => "3d_obj",
            Self::Hdri => "hdri",
        }
    }
}

/// HTTP client for one endpoint family of the generation backend
///
/// Holds no per-job state; a single instance is safe to share across
/// concurrently running tasks.
#[derive(Debug, Clone)]
pub struct GenerationClient {
    /// Base URL of the backend (e.g., "http://localhost:3000")
    base_url: String,
    /// Client identifier sent with every request
    client_id: String,
    /// Endpoint family this client targets
    family: EndpointFamily,
    /// HTTP client instance
    client: Client,
}

impl GenerationClient {
    /// Create a new generation client
    ///
    /// # Arguments
    /// * `base_url` - The base URL of the backend (e.g., "http://localhost:3000")
    /// * `client_id` - Identifier reported to the backend with every request
    /// * `family` - Which endpoint family to target
    pub fn new(
        base_url: impl Into<String>,
        client_id: impl Into<String>,
        family: EndpointFamily,
    ) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client_id: client_id.into(),
            family,
            client: Client::new(),
        }
    }

    /// Create a new generation client with a custom HTTP client
    ///
    /// This allows you to configure timeouts, proxies, TLS settings, etc.
    ///
    /// # Example
    /// ```
    /// use scenegen_client::{EndpointFamily, GenerationClient};
    /// use reqwest::Client;
    /// use std::time::Duration;
    ///
    /// let http_client = Client::builder()
    ///     .timeout(Duration::from_secs(30))
    ///     .build()
    ///     .unwrap();
    ///
    /// let client = GenerationClient::with_client(
    ///     "http://localhost:3000",
    ///     "my_client",
    ///     EndpointFamily::Object,
    ///     http_client,
    /// );
    /// ```
    pub fn with_client(
        base_url: impl Into<String>,
        client_id: impl Into<String>,
        family: EndpointFamily,
        client: Client,
    ) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client_id: client_id.into(),
            family,
            client,
        }
    }

    /// Get the base URL of the backend
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Get the client identifier
    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    /// Get the endpoint family this client targets
    pub fn family(&self) -> EndpointFamily {
        self.family
    }

    /// Full URL for an operation within this client's endpoint family
    pub(crate) fn endpoint(&self, operation: &str) -> String {
        format!(
            "{}/{}/{}",
            self.base_url,
            self.family.path_prefix(),
            operation
        )
    }

    /// Handle an API response and deserialize JSON
    ///
    /// Checks the status code and returns an appropriate error if the
    /// request failed, or deserializes the response body if successful.
    pub(crate) async fn handle_response<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T> {
        let status = response.status();

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ClientError::api_error(status.as_u16(), error_text));
        }

        response
            .json()
            .await
            .map_err(|e| ClientError::Parse(format!("Failed to parse JSON response: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = GenerationClient::new("http://localhost:3000", "c1", EndpointFamily::Object);
        assert_eq!(client.base_url(), "http://localhost:3000");
        assert_eq!(client.client_id(), "c1");
        assert_eq!(client.family(), EndpointFamily::Object);
    }

    #[test]
    fn test_client_trims_trailing_slash() {
        let client = GenerationClient::new("http://localhost:3000/", "c1", EndpointFamily::Hdri);
        assert_eq!(client.base_url(), "http://localhost:3000");
    }

    #[test]
    fn test_endpoint_paths_per_family() {
        let object = GenerationClient::new("http://host:3000", "c1", EndpointFamily::Object);
        assert_eq!(object.endpoint("add_task"), "http://host:3000/3d_obj/add_task");

        let hdri = GenerationClient::new("http://host:3000", "c1", EndpointFamily::Hdri);
        assert_eq!(hdri.endpoint("get_status"), "http://host:3000/hdri/get_status");
    }

    #[test]
    fn test_client_with_custom_client() {
        let http_client = Client::new();
        let client = GenerationClient::with_client(
            "http://localhost:3000",
            "c1",
            EndpointFamily::Object,
            http_client,
        );
        assert_eq!(client.base_url(), "http://localhost:3000");
    }
}
