//! Error types for the HTTP server.

use autosite_site::RenderError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Server error type.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// No page matches the request.
    #[error("Page not found: {0}")]
    PageNotFound(String),

    /// A page template failed to render.
    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    /// A redirect target is not a valid `Location` header value.
    #[error("Invalid redirect target for {uri}: {target:?}")]
    InvalidRedirect {
        /// Redirect page URI.
        uri: String,
        /// Configured target.
        target: String,
    },

    /// I/O error while binding or serving.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The server was stopped because a page failed to render.
    #[error("Server stopped after a page failed to render")]
    Stopped,
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        match self {
            Self::PageNotFound(_) => (StatusCode::NOT_FOUND, "404 page not found\n").into_response(),
            Self::Render(_) | Self::InvalidRedirect { .. } | Self::Io(_) | Self::Stopped => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error.\n",
            )
                .into_response(),
        }
    }
}
