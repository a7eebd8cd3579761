//! Application state for the HTTP server.

use std::sync::Arc;

use crate::catalog::Catalog;

/// Shared application state passed to all handlers.
///
/// The catalog is loaded once at startup and never mutated afterwards, so
/// handlers can run concurrently without locking.
#[derive(Clone)]
pub struct AppState {
    /// Read-only window/patch catalog.
    pub catalog: Arc<Catalog>,
}

impl AppState {
    /// Create a new application state around the given catalog.
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self { catalog }
    }
}
