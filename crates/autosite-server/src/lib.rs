//! HTTP server for autosite.
//!
//! Serves a registered [`Routes`] table with axum. Every request is looked up
//! in the table; the matching page renders its template, answers with a 302
//! redirect, or yields 404 when the request URI is not exactly its own.
//!
//! # Quick Start
//!
//! ```ignore
//! use autosite_server::{ServerConfig, run_server};
//! use autosite_site::{Site, SiteConfig};
//!
//! #[tokio::main]
//! async fn main() {
//!     let site = Site::new(SiteConfig::default()).unwrap();
//!     run_server(ServerConfig::default(), site.register()).await.unwrap();
//! }
//! ```
//!
//! # Render Failures
//!
//! A page that fails to render answers 500. With
//! [`ServerConfig::exit_on_render_error`] set, the server then shuts down
//! gracefully and [`run_server`] returns [`ServerError::Stopped`].

mod app;
mod error;
mod handlers;
mod middleware;
mod state;

use std::sync::Arc;

use autosite_site::Routes;
use state::AppState;

pub use error::ServerError;

/// Server configuration.
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Host address to bind to.
    pub host: String,
    /// Port to listen on.
    pub port: u16,
    /// Stop serving after a page fails to render.
    pub exit_on_render_error: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_owned(),
            port: 8080,
            exit_on_render_error: true,
        }
    }
}

/// Run the server.
///
/// # Arguments
///
/// * `config` - Server configuration
/// * `routes` - Registered pages
///
/// # Errors
///
/// Returns [`ServerError::Io`] if the server fails to bind or serve, and
/// [`ServerError::Stopped`] if it was stopped by a render failure.
pub async fn run_server(config: ServerConfig, routes: Routes) -> Result<(), ServerError> {
    tracing::info!(
        routes = routes.len(),
        live = routes.is_live(),
        "Serving pages"
    );

    let state = Arc::new(AppState::new(routes, config.exit_on_render_error));
    let app = app::create_router(Arc::clone(&state));

    let listener = tokio::net::TcpListener::bind((config.host.as_str(), config.port)).await?;
    tracing::info!(address = %listener.local_addr()?, "Starting server");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(Arc::clone(&state)))
        .await?;

    if state.render_failed() {
        return Err(ServerError::Stopped);
    }
    Ok(())
}

/// Wait for shutdown signal (Ctrl-C) or a fatal render failure.
async fn shutdown_signal(state: Arc<AppState>) {
    tokio::select! {
        result = tokio::signal::ctrl_c() => {
            result.expect("Failed to install Ctrl+C handler");
            tracing::info!("Shutdown signal received, stopping server...");
        }
        () = state.fatal.notified() => {
            tracing::error!("Page failed to render, stopping server...");
        }
    }
}

/// Create server configuration from autosite config.
#[must_use]
pub fn server_config_from_config(config: &autosite_config::Config) -> ServerConfig {
    ServerConfig {
        host: config.server.host.clone(),
        port: config.server.port,
        exit_on_render_error: config.site.exit_on_render_error,
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;
    use std::time::Duration;

    use autosite_config::Config;
    use autosite_site::{Site, SiteConfig};
    use pretty_assertions::assert_eq;

    use super::*;

    fn create_site(page: &str) -> (tempfile::TempDir, Site) {
        let temp_dir = tempfile::tempdir().unwrap();
        let root = temp_dir.path();
        std::fs::create_dir_all(root.join("pages")).unwrap();
        std::fs::write(root.join("base.tmpl"), "{% include \"page\" %}").unwrap();
        std::fs::write(root.join("pages/Foo.tmpl"), page).unwrap();
        let site = Site::new(SiteConfig {
            title: "Test".to_owned(),
            base_dir: root.to_path_buf(),
            templates: vec![PathBuf::from("base.tmpl")],
            ..SiteConfig::default()
        })
        .unwrap();
        (temp_dir, site)
    }

    #[test]
    fn test_server_config_from_config() {
        let mut config = Config::default();
        config.server.host = "0.0.0.0".to_owned();
        config.server.port = 9000;
        config.site.exit_on_render_error = false;

        let server_config = server_config_from_config(&config);

        assert_eq!(server_config.host, "0.0.0.0");
        assert_eq!(server_config.port, 9000);
        assert!(!server_config.exit_on_render_error);
    }

    #[test]
    fn test_server_config_default() {
        let config = ServerConfig::default();

        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 8080);
        assert!(config.exit_on_render_error);
    }

    #[tokio::test]
    async fn test_shutdown_on_render_failure() {
        let (_dir, site) = create_site("foo");
        let state = Arc::new(AppState::new(site.register(), true));

        state.report_render_failure();

        tokio::time::timeout(Duration::from_secs(5), shutdown_signal(Arc::clone(&state)))
            .await
            .unwrap();
        assert!(state.render_failed());
    }

    #[tokio::test]
    async fn test_run_server_stops_after_render_failure() {
        let (_dir, site) = create_site("{{ nothing() }}");

        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);
        let config = ServerConfig {
            port,
            ..ServerConfig::default()
        };
        let server = tokio::spawn(run_server(config, site.register()));

        let mut stream = None;
        for _ in 0..50 {
            if let Ok(s) = tokio::net::TcpStream::connect(("127.0.0.1", port)).await {
                stream = Some(s);
                break;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        let mut stream = stream.unwrap();
        tokio::io::AsyncWriteExt::write_all(
            &mut stream,
            b"GET /Foo HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n",
        )
        .await
        .unwrap();
        let mut response = Vec::new();
        tokio::io::AsyncReadExt::read_to_end(&mut stream, &mut response)
            .await
            .unwrap();

        assert!(String::from_utf8_lossy(&response).starts_with("HTTP/1.1 500"));
        let result = tokio::time::timeout(Duration::from_secs(5), server)
            .await
            .unwrap()
            .unwrap();
        assert!(matches!(result, Err(ServerError::Stopped)));
    }
}
