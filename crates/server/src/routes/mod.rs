//! API route handlers
//!
//! - `health`: liveness and readiness probes
//! - `search`: within-document, collection and snippet search

pub mod health;
pub mod search;

use crate::error::{ServerError, ServerResult};
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;

/// API version and base info
///
/// Root endpoint (GET /).
///
/// # Response
///
/// ```json
/// {
///   "name": "whiiif",
///   "version": "0.1.0",
///   "endpoints": ["..."]
/// }
/// ```
pub async fn api_info() -> ServerResult<impl IntoResponse> {
    Ok(Json(json!({
        "name": "whiiif",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": [
            "/search/{document_id}?q=",
            "/collection_search?q=",
            "/snippet_search/{document_id}?q=&snips=",
            "/health",
            "/ready"
        ]
    })))
}

/// 404 Not Found handler
pub async fn not_found() -> ServerError {
    ServerError::NotFound
}
