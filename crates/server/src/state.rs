use crate::config::ServerConfig;
use crate::error::ServerResult;
use std::sync::Arc;
use whiiif::SearchService;

/// Shared application state
///
/// Everything in here is read-only after startup; requests never mutate it.
#[derive(Clone)]
pub struct ServerState {
    /// Server configuration
    pub config: Arc<ServerConfig>,

    /// Search core (backend client + manifest store)
    pub search: SearchService,
}

impl ServerState {
    /// Create new server state backed by Solr and the manifest directory
    pub fn new(config: ServerConfig) -> ServerResult<Self> {
        config.search.validate()?;
        let search = SearchService::from_config(config.search.clone());

        Ok(Self::with_search(config, search))
    }

    /// Create server state around an already-built search service
    pub fn with_search(config: ServerConfig, search: SearchService) -> Self {
        Self {
            config: Arc::new(config),
            search,
        }
    }
}

/// Server metadata for health checks
#[derive(Debug, serde::Serialize)]
pub struct ServerMetadata {
    pub version: String,
    pub uptime_seconds: u64,
    pub solr_core: String,
}
