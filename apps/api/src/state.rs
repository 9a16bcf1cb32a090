use std::sync::Arc;

use crate::config::Config;
use crate::documents::DocumentStore;

/// Shared application state injected into all route handlers via Axum extractors.
/// Exports themselves share nothing; only the document store is common.
#[derive(Clone)]
pub struct AppState {
    /// Postgres when `DATABASE_URL` is set, in-memory otherwise.
    pub store: Arc<dyn DocumentStore>,
    pub config: Config,
}
