//! whiiif server - HTTP API for IIIF content search
//!
//! Exposes the `whiiif` search core over HTTP. Every search endpoint answers
//! 200 with a well-formed JSON body, even when the Solr backend is down; only
//! a missing `q` (400) or an unknown route (404) produce error bodies.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use server::ServerConfig;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ServerConfig::load()?;
//!     server::start_server(config).await?;
//!     Ok(())
//! }
//! ```
//!
//! # API Endpoints
//!
//! - `GET /` - API information
//! - `GET /health` - Liveness probe
//! - `GET /ready` - Readiness probe
//! - `GET /search/{document_id}?q=` - IIIF Content Search annotation list
//! - `GET /collection_search?q=` - Collection digest with preview images
//! - `GET /snippet_search/{document_id}?q=&snips=` - Snippet listing
//!
//! Configuration comes from an optional `whiiif.{toml,yaml,json}` file and
//! `WHIIIF__*` environment variables, e.g. `WHIIIF__SEARCH__SOLR_URL`.

pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod server;
pub mod state;

pub use config::ServerConfig;
pub use error::{ServerError, ServerResult};
pub use server::{build_router, start_server};
pub use state::ServerState;
