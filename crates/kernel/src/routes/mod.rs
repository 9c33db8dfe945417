//! HTTP route handlers.

pub mod dex;
pub mod health;

use axum::Router;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Build the application router.
pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(health::router())
        .merge(dex::router())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
