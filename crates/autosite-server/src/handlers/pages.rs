//! Page dispatch.
//!
//! Looks the request up in the route table and lets the page decide between
//! rendering, redirecting and 404.

use std::sync::Arc;

use autosite_site::PageResponse;
use axum::extract::{Request, State};
use axum::http::uri::PathAndQuery;
use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{Html, IntoResponse, Response};

use crate::error::ServerError;
use crate::handlers::request_host;
use crate::state::AppState;

/// Serve the page routed for the request.
pub(crate) async fn serve_page(
    State(state): State<Arc<AppState>>,
    request: Request,
) -> Result<Response, ServerError> {
    let path = request.uri().path();
    let request_uri = request
        .uri()
        .path_and_query()
        .map_or(path, PathAndQuery::as_str);
    let host = request_host(&request);

    let Some(page) = state.routes.lookup(host, path) else {
        tracing::debug!(host = ?host, uri = %request_uri, "No page registered");
        return Err(ServerError::PageNotFound(request_uri.to_owned()));
    };
    tracing::debug!(page = %page, uri = %request_uri, "Serving page");

    match page.respond(request_uri) {
        Ok(PageResponse::Html(body)) => Ok(Html(body).into_response()),
        Ok(PageResponse::Redirect(target)) => found(page.uri(), target),
        Ok(PageResponse::NotFound) => {
            tracing::warn!(uri = %request_uri, want = %page.uri(), "Bad request URI, serving 404");
            Err(ServerError::PageNotFound(request_uri.to_owned()))
        }
        Err(err) => {
            tracing::error!(error = %err, "Page failed to render");
            state.report_render_failure();
            Err(err.into())
        }
    }
}

/// 302 Found response to `target`.
fn found(uri: &str, target: &str) -> Result<Response, ServerError> {
    let location = HeaderValue::from_str(target).map_err(|_| ServerError::InvalidRedirect {
        uri: uri.to_owned(),
        target: target.to_owned(),
    })?;
    Ok((StatusCode::FOUND, [(header::LOCATION, location)]).into_response())
}
