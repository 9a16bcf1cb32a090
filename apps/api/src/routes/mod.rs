pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::limit::RequestBodyLimitLayer;

use crate::documents::handlers as documents;
use crate::export::handlers as export;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let body_limit = RequestBodyLimitLayer::new(state.config.max_export_bytes);

    let api = Router::new()
        .route("/templates", get(export::handle_templates))
        .route("/validate", post(export::handle_validate))
        .route("/export", post(export::handle_export))
        // Document store
        .route("/documents", post(documents::handle_create))
        .route(
            "/documents/:id",
            get(documents::handle_get)
                .put(documents::handle_replace)
                .delete(documents::handle_delete),
        )
        .route("/documents/:id/export", post(documents::handle_export_stored))
        // MAX_EXPORT_BYTES replaces axum's built-in 2 MiB cap.
        .layer(DefaultBodyLimit::disable())
        .layer(body_limit);

    Router::new()
        .route("/health", get(health::health_handler))
        .nest("/api/v1", api)
        .with_state(state)
}
