//! HTTP router setup.

use crate::handlers;
use crate::middleware::inject_request_id;
use crate::state::AppState;
use crate::transport::Transport;
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use tower::limit::ConcurrencyLimitLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Requests served at once; wallet prompts are slow.
const MAX_CONCURRENT_REQUESTS: usize = 64;

/// Create the application router.
pub fn create<T: Transport>(state: Arc<AppState<T>>) -> Router {
    Router::new()
        .route("/health", get(handlers::health::<T>))
        .route("/metrics", get(handlers::metrics::<T>))
        .route("/page", get(handlers::page::<T>))
        .route("/alerts", get(handlers::alerts::<T>))
        .route("/connect", post(handlers::connect::<T>))
        .route("/presale/start", post(handlers::start_presale::<T>))
        .route("/mint/presale", post(handlers::presale_mint::<T>))
        .route("/mint/public", post(handlers::public_mint::<T>))
        .layer(axum::middleware::from_fn(inject_request_id))
        .layer(ConcurrencyLimitLayer::new(MAX_CONCURRENT_REQUESTS))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
