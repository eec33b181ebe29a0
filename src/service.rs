//! Request-level orchestration.
//!
//! Every search issues exactly one backend call, normalizes the payload and
//! hands it to the scope's assembler. Backend failures never escape: they are
//! logged with their kind and turned into the scope's empty result.

use std::sync::Arc;

use serde_json::Value;
use tracing::{error, info};

use crate::annotation::{assemble_annotation_list, AnnotationList};
use crate::backend::{SearchBackend, SolrClient};
use crate::collection::{assemble_collection, CollectionDocument};
use crate::config::SearchConfig;
use crate::error::BackendError;
use crate::manifest::{FsManifestStore, ManifestStore};
use crate::normalize::normalize;
use crate::query::{sanitize_query, snippet_count, SelectQuery};
use crate::snippet::{assemble_snippets, SnippetDocument};
use crate::types::{NormalizedDocument, SearchScope};

/// Within-document search input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WithinRequest {
    pub document_id: String,
    /// Raw `q`; sanitized before use.
    pub query: String,
    /// Unimplemented filters present on the request, in request order.
    pub ignored: Vec<String>,
    /// Absolute URL of the request, echoed as the response `@id`.
    pub search_id: String,
}

/// Shared, read-only entry point for all three search scopes.
#[derive(Clone)]
pub struct SearchService {
    config: Arc<SearchConfig>,
    backend: Arc<dyn SearchBackend>,
    manifests: Arc<dyn ManifestStore>,
}

impl SearchService {
    pub fn new(
        config: SearchConfig,
        backend: Arc<dyn SearchBackend>,
        manifests: Arc<dyn ManifestStore>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            backend,
            manifests,
        }
    }

    /// Wire the Solr client and filesystem manifest store from `config`.
    pub fn from_config(config: SearchConfig) -> Self {
        let backend = SolrClient::new(reqwest::Client::new(), config.select_url());
        let manifests = FsManifestStore::new(config.manifest_location.clone());
        info!(
            backend = %backend.select_url(),
            manifests = %manifests.root().display(),
            "search service configured"
        );
        Self::new(config, Arc::new(backend), Arc::new(manifests))
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// IIIF Content Search response for one document.
    pub async fn search_within(&self, request: WithinRequest) -> AnnotationList {
        let query = sanitize_query(&request.query);
        let select = SelectQuery::within_document(&self.config, &request.document_id, &query);

        match self.fetch(&select, SearchScope::WithinDocument).await {
            Ok(documents) => assemble_annotation_list(
                &documents,
                &request.search_id,
                request.ignored,
                &self.config.annotation_namespace,
            ),
            Err(e) => {
                log_backend_failure(SearchScope::WithinDocument, &e);
                AnnotationList::empty(request.search_id, request.ignored)
            }
        }
    }

    /// Digest of matches across every document, with preview images.
    pub async fn search_collection(&self, query: &str) -> Vec<CollectionDocument> {
        let query = sanitize_query(query);
        let select = SelectQuery::collection(&self.config, &query);

        let documents = match self.fetch(&select, SearchScope::Collection).await {
            Ok(documents) => documents,
            Err(e) => {
                log_backend_failure(SearchScope::Collection, &e);
                return Vec::new();
            }
        };

        // One blocking manifest read per document.
        let manifests = Arc::clone(&self.manifests);
        match tokio::task::spawn_blocking(move || {
            assemble_collection(&documents, manifests.as_ref())
        })
        .await
        {
            Ok(digests) => digests,
            Err(e) => {
                error!(error = %e, "collection assembly task failed");
                Vec::new()
            }
        }
    }

    /// Snippet listing for one document. `snips` is the raw request value.
    pub async fn search_snippets(
        &self,
        document_id: &str,
        query: &str,
        snips: Option<&str>,
    ) -> Vec<SnippetDocument> {
        let query = sanitize_query(query);
        let count = snippet_count(snips, &self.config);
        let select = SelectQuery::snippet(&self.config, document_id, &query, count);

        match self.fetch(&select, SearchScope::Snippet).await {
            Ok(documents) => assemble_snippets(&documents),
            Err(e) => {
                log_backend_failure(SearchScope::Snippet, &e);
                Vec::new()
            }
        }
    }

    async fn fetch(
        &self,
        select: &SelectQuery,
        scope: SearchScope,
    ) -> Result<Vec<NormalizedDocument>, BackendError> {
        let payload: Value = self.backend.select(select).await?;
        normalize(&payload, scope, &self.config)
    }
}

fn log_backend_failure(scope: SearchScope, err: &BackendError) {
    error!(
        scope = scope.as_str(),
        kind = err.kind(),
        error = %err,
        "search backend failed, returning empty result"
    );
}
