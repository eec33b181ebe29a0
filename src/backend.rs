//! The highlighting backend and its HTTP client.

use serde_json::Value;
use tracing::debug;

use crate::error::BackendError;
use crate::query::SelectQuery;

/// Anything that can answer a select query with a decoded JSON payload.
///
/// Implementations distinguish transport failures
/// ([`BackendError::Unreachable`]) from bodies that are not JSON
/// ([`BackendError::MalformedResponse`]). Shape checks belong to the
/// normalizer.
#[async_trait::async_trait]
pub trait SearchBackend: Send + Sync {
    async fn select(&self, query: &SelectQuery) -> Result<Value, BackendError>;
}

/// Solr core with the OCR highlighting plugin installed.
#[derive(Debug, Clone)]
pub struct SolrClient {
    client: reqwest::Client,
    select_url: String,
}

impl SolrClient {
    pub fn new(client: reqwest::Client, select_url: impl Into<String>) -> Self {
        Self {
            client,
            select_url: select_url.into(),
        }
    }

    pub fn select_url(&self) -> &str {
        &self.select_url
    }
}

#[async_trait::async_trait]
impl SearchBackend for SolrClient {
    async fn select(&self, query: &SelectQuery) -> Result<Value, BackendError> {
        debug!(url = %self.select_url, params = ?query.params(), "querying search backend");

        let response = self
            .client
            .get(&self.select_url)
            .query(query.params())
            .send()
            .await
            .map_err(|e| BackendError::Unreachable(e.to_string()))?;
        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| BackendError::Unreachable(e.to_string()))?;

        serde_json::from_slice(&body).map_err(|e| {
            BackendError::MalformedResponse(format!("HTTP {status}, body is not JSON: {e}"))
        })
    }
}
