pub mod bootstrap;
pub mod config;
pub mod events;
pub mod handlers;
pub mod secrets;
pub mod services;
pub mod storage;

use axum::{
    routing::{delete, get},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use bootstrap::AppState;

/// Assemble the request dispatcher over bootstrapped state. Only called
/// once bootstrap has produced an `AppState`, which is what keeps the
/// delete endpoint unreachable until credentials are in place.
pub fn app(state: AppState) -> Router {
    Router::new()
        // Liveness
        .route("/", get(root))
        // The one operation this service performs
        .route("/clients/:ci", delete(handlers::clients::client_delete))
        // Global middleware
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn root() -> &'static str {
    "Delete Client Service Running"
}
