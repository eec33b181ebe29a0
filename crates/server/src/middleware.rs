use axum::extract::{MatchedPath, Request};
use axum::http::HeaderValue;
use axum::middleware::Next;
use axum::response::Response;
use whiiif::SearchScope;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Request id stored in request extensions
#[derive(Debug, Clone)]
pub struct RequestId(pub String);

/// Request ID injection middleware
///
/// Reuses an incoming `x-request-id` or generates a v4 uuid, and echoes it
/// on the response.
pub async fn request_id(mut request: Request, next: Next) -> Response {
    let id = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

    request.extensions_mut().insert(RequestId(id.clone()));

    let mut response = next.run(request).await;

    if let Ok(value) = HeaderValue::from_str(&id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }

    response
}

/// Search scope served by a route template, if any
pub fn scope_for_route(route: &str) -> Option<SearchScope> {
    match route {
        "/search/{document_id}" => Some(SearchScope::WithinDocument),
        "/collection_search" => Some(SearchScope::Collection),
        "/snippet_search/{document_id}" => Some(SearchScope::Snippet),
        _ => None,
    }
}

/// Logging middleware
///
/// One line per request, tagged with the route template and search scope.
/// Searches never fail on backend trouble, so a 4xx here means a bad request
/// and is logged at warn.
pub async fn log_requests(request: Request, next: Next) -> Response {
    let start = std::time::Instant::now();
    let method = request.method().clone();
    let uri = request.uri().clone();
    let route = request
        .extensions()
        .get::<MatchedPath>()
        .map(|path| path.as_str().to_string());
    let scope = route
        .as_deref()
        .and_then(scope_for_route)
        .map(|scope| scope.as_str())
        .unwrap_or("none");
    let request_id = request
        .extensions()
        .get::<RequestId>()
        .map(|id| id.0.clone())
        .unwrap_or_default();

    let response = next.run(request).await;
    let status = response.status();
    let duration_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
    let route = route.as_deref().unwrap_or("unmatched");

    if status.is_client_error() || status.is_server_error() {
        tracing::warn!(
            method = %method,
            uri = %uri,
            route,
            scope,
            status = status.as_u16(),
            duration_ms,
            request_id = %request_id,
            "request rejected"
        );
    } else {
        tracing::info!(
            method = %method,
            route,
            scope,
            status = status.as_u16(),
            duration_ms,
            request_id = %request_id,
            "request served"
        );
    }

    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_routes_map_to_scopes() {
        assert_eq!(
            scope_for_route("/search/{document_id}"),
            Some(SearchScope::WithinDocument)
        );
        assert_eq!(
            scope_for_route("/collection_search"),
            Some(SearchScope::Collection)
        );
        assert_eq!(
            scope_for_route("/snippet_search/{document_id}"),
            Some(SearchScope::Snippet)
        );
    }

    #[test]
    fn test_other_routes_have_no_scope() {
        assert_eq!(scope_for_route("/health"), None);
        assert_eq!(scope_for_route("/search/book-1"), None);
    }
}
