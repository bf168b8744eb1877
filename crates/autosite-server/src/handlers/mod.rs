//! HTTP request handlers.

pub(crate) mod pages;

use axum::extract::Request;
use axum::http::header;

/// Host the request was sent to, from the request target or `Host` header.
pub(crate) fn request_host(request: &Request) -> Option<&str> {
    request.uri().host().or_else(|| {
        request
            .headers()
            .get(header::HOST)
            .and_then(|value| value.to_str().ok())
    })
}
