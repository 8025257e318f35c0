//! Main client for the Pulse SDK.

use crate::api::ServersApi;
use crate::config::{ClientConfig, RetryConfig, DEFAULT_BASE_URL};
use crate::error::PulseResult;
use crate::transport::HttpTransport;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// Client for the PulseMCP API.
///
/// Cheap to clone; clones share one connection pool.
#[derive(Debug, Clone)]
pub struct PulseClient {
    config: Arc<ClientConfig>,
    pub(crate) http: HttpTransport,
}

impl PulseClient {
    /// Create a new client builder.
    pub fn builder() -> PulseClientBuilder {
        PulseClientBuilder::new()
    }

    /// Create a client from configuration.
    pub fn from_config(config: ClientConfig) -> PulseResult<Self> {
        let config = Arc::new(config);
        let http = HttpTransport::new(config.clone())?;

        Ok(Self { config, http })
    }

    /// Effective configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Get the servers API.
    pub fn servers(&self) -> ServersApi<'_> {
        ServersApi::new(self)
    }
}

/// Builder for creating a PulseClient.
pub struct PulseClientBuilder {
    base_url: Option<String>,
    timeout: Duration,
    retry_config: RetryConfig,
    user_agent: Option<String>,
}

impl PulseClientBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            base_url: None,
            timeout: Duration::from_secs(30),
            retry_config: RetryConfig::no_retry(),
            user_agent: None,
        }
    }

    /// Set the API base URL. Defaults to the public PulseMCP endpoint.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the retry configuration.
    pub fn retry_config(mut self, config: RetryConfig) -> Self {
        self.retry_config = config;
        self
    }

    /// Override the `User-Agent` header.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Build the client.
    pub fn build(self) -> PulseResult<PulseClient> {
        let base_url = Url::parse(self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL))?;

        let mut config = ClientConfig::new(base_url);
        config.timeout = self.timeout;
        config.retry_config = self.retry_config;
        if let Some(user_agent) = self.user_agent {
            config.user_agent = user_agent;
        }

        PulseClient::from_config(config)
    }
}

impl Default for PulseClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
