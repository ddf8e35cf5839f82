//! Transaction submitter for the mint and owner calls.
//!
//! Pattern for every call: get a signer, submit, flag `loading` once the
//! wallet accepted, wait for the receipt, clear `loading`, then report.

use alloy_primitives::{Address, U256};
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{error, info};

use crate::alerts::{Alerts, MINT_SUCCESS};
use crate::connection::ConnectionManager;
use crate::contract::NftWriter;
use crate::metrics::METRICS;
use crate::poller::ChainStatePoller;
use crate::state::PageState;
use crate::transport::Transport;
use crate::wallet::{PendingTransaction, Receipt};
use crate::Error;

pub struct TransactionSubmitter<T> {
    connection: Arc<ConnectionManager<T>>,
    poller: Arc<ChainStatePoller<T>>,
    state: Arc<PageState>,
    alerts: Arc<Alerts>,
    contract: Address,
    mint_fee_wei: U256,
    receipt_poll_interval: Duration,
}

impl<T: Transport> TransactionSubmitter<T> {
    pub fn new(
        connection: Arc<ConnectionManager<T>>,
        poller: Arc<ChainStatePoller<T>>,
        state: Arc<PageState>,
        alerts: Arc<Alerts>,
        contract: Address,
        mint_fee_wei: U256,
        receipt_poll_interval: Duration,
    ) -> Self {
        Self {
            connection,
            poller,
            state,
            alerts,
            contract,
            mint_fee_wei,
            receipt_poll_interval,
        }
    }

    /// Whitelisted mint during the presale window.
    pub async fn presale_mint(&self) -> Result<Receipt, Error> {
        let result = async {
            let pending = self.writer().await?.presale_mint(self.mint_fee_wei).await?;
            self.confirm(pending).await
        }
        .await;
        self.finish_mint("presaleMint", result)
    }

    /// Public mint after the presale.
    pub async fn public_mint(&self) -> Result<Receipt, Error> {
        let result = async {
            let pending = self.writer().await?.mint(self.mint_fee_wei).await?;
            self.confirm(pending).await
        }
        .await;
        self.finish_mint("mint", result)
    }

    /// Owner starts the presale, then the page re-reads presale state at once.
    pub async fn start_presale(&self) -> Result<Receipt, Error> {
        let result = async {
            let pending = self.writer().await?.start_presale().await?;
            self.confirm(pending).await
        }
        .await;
        match result {
            Ok(receipt) => {
                info!(tx_hash = %receipt.transaction_hash, "Presale started");
                self.poller.refresh_presale().await;
                Ok(receipt)
            }
            Err(e) => {
                error!(method = "startPresale", error = %e, "Transaction failed");
                Err(e)
            }
        }
    }

    async fn writer(&self) -> Result<NftWriter<T>, Error> {
        let signer = self.connection.signer().await?;
        Ok(NftWriter::new(self.contract, signer))
    }

    /// Hold `loading` from acceptance until the receipt (or failure).
    async fn confirm(&self, pending: PendingTransaction<T>) -> Result<Receipt, Error> {
        METRICS.tx_submitted.fetch_add(1, Ordering::Relaxed);
        let start = Instant::now();
        let _loading = self.state.begin_loading();
        let result = pending.wait(self.receipt_poll_interval).await;
        METRICS.record_confirmation(start);
        match &result {
            Ok(_) => METRICS.tx_confirmed.fetch_add(1, Ordering::Relaxed),
            Err(_) => METRICS.tx_failed.fetch_add(1, Ordering::Relaxed),
        };
        result
    }

    fn finish_mint(
        &self,
        method: &'static str,
        result: Result<Receipt, Error>,
    ) -> Result<Receipt, Error> {
        match result {
            Ok(receipt) => {
                info!(method, tx_hash = %receipt.transaction_hash, "Mint confirmed");
                self.alerts.push(MINT_SUCCESS);
                Ok(receipt)
            }
            Err(e) => {
                error!(method, error = %e, "Transaction failed");
                Err(e)
            }
        }
    }
}
