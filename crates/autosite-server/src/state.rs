//! Application state.
//!
//! Shared state for all request handlers.

use std::sync::atomic::{AtomicBool, Ordering};

use autosite_site::Routes;
use tokio::sync::Notify;

/// Application state shared across all handlers.
///
/// The route table is read-only once the server starts.
pub(crate) struct AppState {
    /// Registered pages.
    pub(crate) routes: Routes,
    /// Stop the server when a page fails to render.
    exit_on_render_error: bool,
    /// Woken when the server must stop.
    pub(crate) fatal: Notify,
    render_failed: AtomicBool,
}

impl AppState {
    pub(crate) fn new(routes: Routes, exit_on_render_error: bool) -> Self {
        Self {
            routes,
            exit_on_render_error,
            fatal: Notify::new(),
            render_failed: AtomicBool::new(false),
        }
    }

    /// Record a render failure, stopping the server if configured to.
    pub(crate) fn report_render_failure(&self) {
        if self.exit_on_render_error {
            self.render_failed.store(true, Ordering::SeqCst);
            self.fatal.notify_one();
        }
    }

    /// Whether a render failure has stopped the server.
    pub(crate) fn render_failed(&self) -> bool {
        self.render_failed.load(Ordering::SeqCst)
    }
}
