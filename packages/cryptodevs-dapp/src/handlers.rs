//! HTTP request handlers.

use axum::extract::{Request, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use cryptodevs_types::Action;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

use crate::metrics::METRICS;
use crate::middleware::RequestId;
use crate::response::{ActionResponse, AlertsResponse, HealthResponse, PageView};
use crate::state::AppState;
use crate::transport::Transport;
use crate::Error;

/// Health check with wallet connection status.
pub async fn health<T: Transport>(State(state): State<Arc<AppState<T>>>) -> impl IntoResponse {
    state.request_count.fetch_add(1, Ordering::Relaxed);
    let snapshot = state.page.snapshot();
    let status = if !state.page.is_mounted() {
        "stopped"
    } else if snapshot.connected {
        "ok"
    } else {
        "disconnected"
    };

    Json(HealthResponse {
        status,
        wallet_url: state.config.wallet_url.clone(),
        contract: state.config.contract_address.clone(),
        required_chain_id: state.config.required_chain_id,
        wallet_connected: snapshot.connected,
        uptime_secs: state.start_time.elapsed().as_secs(),
        requests: state.request_count.load(Ordering::Relaxed),
    })
}

/// Prometheus metrics in text exposition format.
pub async fn metrics<T: Transport>(State(state): State<Arc<AppState<T>>>) -> impl IntoResponse {
    let snapshot = state.page.snapshot();
    let body = METRICS.render(snapshot.connected, snapshot.loading);
    (
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        body,
    )
}

/// Rendered page view.
pub async fn page<T: Transport>(State(state): State<Arc<AppState<T>>>) -> Json<PageView> {
    state.request_count.fetch_add(1, Ordering::Relaxed);
    Json(PageView::render(
        state.page.snapshot(),
        state.config.max_supply,
    ))
}

/// Drain pending alerts, oldest first.
pub async fn alerts<T: Transport>(State(state): State<Arc<AppState<T>>>) -> Json<AlertsResponse> {
    state.request_count.fetch_add(1, Ordering::Relaxed);
    Json(AlertsResponse {
        alerts: state.page.alerts().drain(),
    })
}

pub async fn connect<T: Transport>(
    State(state): State<Arc<AppState<T>>>,
    request: Request,
) -> Result<impl IntoResponse, Error> {
    dispatch(&state, &request, Action::Connect)
}

pub async fn start_presale<T: Transport>(
    State(state): State<Arc<AppState<T>>>,
    request: Request,
) -> Result<impl IntoResponse, Error> {
    dispatch(&state, &request, Action::StartPresale)
}

pub async fn presale_mint<T: Transport>(
    State(state): State<Arc<AppState<T>>>,
    request: Request,
) -> Result<impl IntoResponse, Error> {
    dispatch(&state, &request, Action::PresaleMint)
}

pub async fn public_mint<T: Transport>(
    State(state): State<Arc<AppState<T>>>,
    request: Request,
) -> Result<impl IntoResponse, Error> {
    dispatch(&state, &request, Action::PublicMint)
}

/// Start `action` in the background. 202 once accepted; the outcome shows up
/// in `/page` and `/alerts`.
fn dispatch<T: Transport>(
    state: &AppState<T>,
    request: &Request,
    action: Action,
) -> Result<(StatusCode, Json<ActionResponse>), Error> {
    state.request_count.fetch_add(1, Ordering::Relaxed);
    let req_id = request
        .extensions()
        .get::<RequestId>()
        .map(|r| r.0.clone())
        .unwrap_or_default();

    info!(req_id = %req_id, ?action, "Action requested");
    state.page.dispatch(action)?;
    Ok((StatusCode::ACCEPTED, Json(ActionResponse::accepted(action))))
}
