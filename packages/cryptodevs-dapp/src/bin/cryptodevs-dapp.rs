//! Crypto Devs dApp binary.

use cryptodevs_dapp::{create_router, AppState, Config, HttpTransport};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Crypto Devs dApp");

    let config = match Config::load("dapp") {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "FATAL: Config error, fix env vars or dapp.toml");
            std::process::exit(1);
        }
    };

    if let Err(e) = config.validate() {
        error!(error = %e, "FATAL: Invalid configuration");
        std::process::exit(1);
    }

    info!(
        wallet = %config.wallet_url,
        contract = %config.contract_address,
        chain_id = config.required_chain_id,
        "Configuration loaded"
    );

    let bind_address = config.bind_address.clone();
    let transport = Arc::new(HttpTransport::new(&config.wallet_url, config.rpc_timeout())?);
    let state = Arc::new(AppState::new(config, transport)?);

    // Initial sync runs in the background; the page serves its defaults meanwhile.
    let initial = state.page.mount();

    let app = create_router(Arc::clone(&state));

    info!(address = %bind_address, "Listening");

    let listener = tokio::net::TcpListener::bind(&bind_address).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("HTTP server stopped, tearing down page...");
    initial.abort();
    state.page.teardown().await;

    info!("dApp shut down gracefully");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received SIGINT, shutting down..."),
        _ = terminate => info!("Received SIGTERM, shutting down..."),
    }
}
