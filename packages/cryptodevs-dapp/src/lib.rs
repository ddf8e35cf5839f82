//! # Crypto Devs dApp
//!
//! Wallet connection and on-chain state sync for the Crypto Devs NFT mint
//! page. Talks to the user's wallet over EIP-1193 JSON-RPC, keeps a local
//! mirror of the presale and mint state, and serves the rendered page.
//!
//! ## Quick Start
//! ```bash
//! DAPP_CONTRACT_ADDRESS=0x... cargo run --bin cryptodevs-dapp
//! ```
//!
//! ## Endpoints
//! - `GET /health` - Health check with wallet status
//! - `GET /metrics` - Prometheus counters
//! - `GET /page` - Rendered page view
//! - `GET /alerts` - Drain pending alerts
//! - `POST /connect` - Connect the wallet
//! - `POST /presale/start` - Owner starts the presale
//! - `POST /mint/presale` - Presale mint
//! - `POST /mint/public` - Public mint

pub mod alerts;
pub mod config;
pub mod connection;
pub mod contract;
mod error;
mod handlers;
pub mod metrics;
mod middleware;
pub mod page;
pub mod poller;
mod response;
mod router;
pub mod state;
pub mod submitter;
#[cfg(test)]
mod testing;
pub mod transport;
pub mod wallet;

pub use config::Config;
pub use error::Error;
pub use page::PageController;
pub use router::create as create_router;
pub use state::AppState;
pub use transport::{HttpTransport, Transport};
