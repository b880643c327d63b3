//! Router

use std::path::Path;

use axum::{routing::{get, post}, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};

use crate::handlers::{create_payment_intent, health_check, public_config, stripe_webhook};
use crate::state::AppState;

/// Build the application router.
///
/// `/webhook` extracts raw bytes; the other POST route parses JSON.
/// Everything else falls through to the built front end in `static_dir`.
pub fn router(state: AppState, static_dir: &Path) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health & config
        .route("/health", get(health_check))
        .route("/api/config", get(public_config))

        // Payments
        .route("/create-payment-intent", post(create_payment_intent))
        .route("/webhook", post(stripe_webhook))

        // Static files (WASM frontend)
        .fallback_service(ServeDir::new(static_dir).append_index_html_on_directories(true))

        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
