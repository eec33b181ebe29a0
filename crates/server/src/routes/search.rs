use crate::error::{ServerError, ServerResult};
use crate::state::ServerState;
use axum::extract::{OriginalUri, Path, Query, State};
use axum::response::IntoResponse;
use axum::Json;
use std::sync::Arc;
use whiiif::{ignored_filters, WithinRequest};

/// Raw query string pairs, in request order
type QueryPairs = Vec<(String, String)>;

fn param<'a>(pairs: &'a QueryPairs, name: &str) -> Option<&'a str> {
    pairs
        .iter()
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.as_str())
}

fn required_query(pairs: &QueryPairs) -> ServerResult<&str> {
    param(pairs, "q").ok_or_else(|| ServerError::BadRequest("missing query parameter 'q'".into()))
}

/// IIIF Content Search within one document
///
/// `motivation`, `date` and `user` are accepted but only echoed back in
/// `within.ignored`.
pub async fn search_within(
    State(state): State<Arc<ServerState>>,
    Path(document_id): Path<String>,
    OriginalUri(uri): OriginalUri,
    Query(pairs): Query<QueryPairs>,
) -> ServerResult<impl IntoResponse> {
    let query = required_query(&pairs)?.to_string();
    let ignored = ignored_filters(pairs.iter().map(|(key, _)| key.as_str()));

    let path_and_query = uri
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or_else(|| uri.path());
    let search_id = state.config.absolute_url(path_and_query);

    tracing::debug!(document_id = %document_id, ignored = ?ignored, "within-document search");

    let list = state
        .search
        .search_within(WithinRequest {
            document_id,
            query,
            ignored,
            search_id,
        })
        .await;

    Ok(Json(list))
}

/// Match digest across the whole collection
pub async fn collection_search(
    State(state): State<Arc<ServerState>>,
    Query(pairs): Query<QueryPairs>,
) -> ServerResult<impl IntoResponse> {
    let query = required_query(&pairs)?;
    let documents = state.search.search_collection(query).await;

    tracing::debug!(documents = documents.len(), "collection search");

    Ok(Json(documents))
}

/// Snippet listing for one document
pub async fn snippet_search(
    State(state): State<Arc<ServerState>>,
    Path(document_id): Path<String>,
    Query(pairs): Query<QueryPairs>,
) -> ServerResult<impl IntoResponse> {
    let query = required_query(&pairs)?;
    let snips = param(&pairs, "snips");

    let documents = state
        .search
        .search_snippets(&document_id, query, snips)
        .await;

    Ok(Json(documents))
}
