//! Servers API endpoints.

use crate::client::PulseClient;
use crate::error::PulseResult;
use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

/// Servers API for searching the MCP server directory.
pub struct ServersApi<'a> {
    client: &'a PulseClient,
}

impl<'a> ServersApi<'a> {
    pub(crate) fn new(client: &'a PulseClient) -> Self {
        Self { client }
    }

    /// List servers, decoded into typed records.
    pub async fn list(&self, params: &ListServersParams) -> PulseResult<ListServersResponse> {
        self.client.http.get_with_query("servers", params).await
    }

    /// List servers and return the response body untouched.
    ///
    /// Field order is preserved, so re-serializing yields the payload exactly
    /// as the API sent it (modulo whitespace).
    pub async fn list_raw(&self, params: &ListServersParams) -> PulseResult<Value> {
        self.client.http.get_with_query("servers", params).await
    }
}

/// Query parameters for `GET /servers`. Unset fields are omitted from the URL.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ListServersParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    /// Page size. The API documents a maximum of 5000.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count_per_page: Option<Number>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<Number>,
}

impl ListServersParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    pub fn count_per_page(mut self, count: u64) -> Self {
        self.count_per_page = Some(count.into());
        self
    }

    pub fn offset(mut self, offset: u64) -> Self {
        self.offset = Some(offset.into());
        self
    }
}

/// One page of directory results.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListServersResponse {
    pub servers: Vec<ServerRecord>,
    /// URL of the next page, absent on the last page.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next: Option<String>,
    pub total_count: u64,
}

/// A directory entry for a single MCP server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerRecord {
    pub name: String,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub short_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_code_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub github_stars: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub package_registry: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub package_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub package_download_count: Option<u64>,
    #[serde(
        rename = "EXPERIMENTAL_ai_generated_description",
        skip_serializing_if = "Option::is_none"
    )]
    pub ai_generated_description: Option<String>,
}
