//! Wallet connection manager.
//!
//! Owns the page's single wallet connection and gates every handle it hands
//! out on the wallet being on the required network.

use serde_json::json;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::{error, info, warn};

use crate::alerts::Alerts;
use crate::metrics::METRICS;
use crate::state::PageState;
use crate::transport::Transport;
use crate::wallet::{first_account, Signer, Web3Provider};
use crate::Error;

/// What `provider_or_signer` hands back.
pub enum Handle<T> {
    Provider(Web3Provider<T>),
    Signer(Signer<T>),
}

pub struct ConnectionManager<T> {
    transport: Arc<T>,
    required_chain_id: u64,
    mismatch_alert: String,
    alerts: Arc<Alerts>,
    /// Created on first use, reused for the page's lifetime.
    connection: OnceCell<Web3Provider<T>>,
}

impl<T: Transport> ConnectionManager<T> {
    pub fn new(
        transport: Arc<T>,
        required_chain_id: u64,
        mismatch_alert: impl Into<String>,
        alerts: Arc<Alerts>,
    ) -> Self {
        Self {
            transport,
            required_chain_id,
            mismatch_alert: mismatch_alert.into(),
            alerts,
            connection: OnceCell::new(),
        }
    }

    /// Connect on first call (may wait on the wallet's approval prompt), then
    /// verify the network on every call.
    pub async fn provider_or_signer(&self, need_signer: bool) -> Result<Handle<T>, Error> {
        let provider = self
            .connection
            .get_or_try_init(|| self.connect())
            .await?
            .clone();

        let chain_id = provider.chain_id().await?;
        if chain_id != self.required_chain_id {
            METRICS.network_mismatches.fetch_add(1, Ordering::Relaxed);
            warn!(
                expected = self.required_chain_id,
                actual = chain_id,
                "Wallet on wrong network"
            );
            self.alerts.push(self.mismatch_alert.clone());
            return Err(Error::NetworkMismatch {
                expected: self.required_chain_id,
                actual: chain_id,
            });
        }

        Ok(if need_signer {
            Handle::Signer(provider.signer())
        } else {
            Handle::Provider(provider)
        })
    }

    pub async fn provider(&self) -> Result<Web3Provider<T>, Error> {
        match self.provider_or_signer(false).await? {
            Handle::Provider(provider) => Ok(provider),
            Handle::Signer(signer) => Ok(signer.provider().clone()),
        }
    }

    pub async fn signer(&self) -> Result<Signer<T>, Error> {
        match self.provider_or_signer(true).await? {
            Handle::Signer(signer) => Ok(signer),
            Handle::Provider(provider) => Ok(provider.signer()),
        }
    }

    /// Force the connection prompt and record the outcome in page state.
    /// Errors are logged and leave the page disconnected.
    pub async fn connect_wallet(&self, state: &PageState) -> bool {
        match self.provider().await {
            Ok(_) => {
                let network_id = self.required_chain_id;
                state.update(|s| {
                    s.connected = true;
                    s.network_id = Some(network_id);
                });
                true
            }
            Err(e) => {
                error!(error = %e, "Wallet connection failed");
                false
            }
        }
    }

    /// Whether the wallet connection has been established.
    pub fn is_established(&self) -> bool {
        self.connection.initialized()
    }

    async fn connect(&self) -> Result<Web3Provider<T>, Error> {
        info!("Requesting wallet connection");
        let accounts = self
            .transport
            .request("eth_requestAccounts", json!([]))
            .await?;
        let account = first_account(accounts)?;
        METRICS.wallet_connects.fetch_add(1, Ordering::Relaxed);
        info!(account = %account, "Wallet connected");
        Ok(Web3Provider::new(Arc::clone(&self.transport)))
    }
}
