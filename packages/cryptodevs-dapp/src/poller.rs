//! Chain state poller.
//!
//! Each read is fault-isolated: a failure is logged, marks only its own field
//! stale, and never aborts the other reads.

use alloy_primitives::Address;
use cryptodevs_types::{has_ended, unix_now};
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::{debug, error};

use crate::connection::ConnectionManager;
use crate::contract::NftContract;
use crate::metrics::METRICS;
use crate::state::PageState;
use crate::transport::Transport;
use crate::Error;

pub struct ChainStatePoller<T> {
    connection: Arc<ConnectionManager<T>>,
    state: Arc<PageState>,
    contract: Address,
}

impl<T: Transport> ChainStatePoller<T> {
    pub fn new(
        connection: Arc<ConnectionManager<T>>,
        state: Arc<PageState>,
        contract: Address,
    ) -> Self {
        Self {
            connection,
            state,
            contract,
        }
    }

    /// Read `presaleStarted`. Returns `false` when the read fails.
    pub async fn check_presale_started(&self) -> bool {
        self.read_presale_started().await.unwrap_or(false)
    }

    /// `None` when the read failed; the stored flag is left as it was.
    async fn read_presale_started(&self) -> Option<bool> {
        METRICS.polls_total.fetch_add(1, Ordering::Relaxed);
        let result = async { self.contract().await?.presale_started().await }.await;
        match result {
            Ok(started) => {
                self.state.update(|s| {
                    s.presale_started = started;
                    s.stale.presale_started = false;
                });
                Some(started)
            }
            Err(e) => {
                self.read_failed("presaleStarted", &e);
                self.state.update(|s| s.stale.presale_started = true);
                None
            }
        }
    }

    /// Read `presaleEnded` and compare it with wall-clock time. Returns `false`
    /// when the read fails.
    pub async fn check_presale_ended(&self) -> bool {
        METRICS.polls_total.fetch_add(1, Ordering::Relaxed);
        let result = async { self.contract().await?.presale_ended().await }.await;
        match result {
            Ok(end) => {
                let ended = has_ended(end, unix_now());
                self.state.update(|s| {
                    s.presale_end_timestamp = Some(end);
                    s.presale_ended = ended;
                    s.stale.presale_ended = false;
                });
                ended
            }
            Err(e) => {
                self.read_failed("presaleEnded", &e);
                self.state.update(|s| s.stale.presale_ended = true);
                false
            }
        }
    }

    /// Compare the connected account with the contract owner. Only a match
    /// sets the flag; a mismatch leaves the last value in place.
    pub async fn get_owner(&self) {
        METRICS.polls_total.fetch_add(1, Ordering::Relaxed);
        let result = async {
            let owner = self.contract().await?.owner().await?;
            let address = self.connection.signer().await?.address().await?;
            Ok::<_, Error>((owner, address))
        }
        .await;
        match result {
            Ok((owner, address)) => {
                let is_owner = owner == address;
                debug!(owner = %owner, account = %address, is_owner, "Owner check");
                self.state.update(|s| {
                    if is_owner {
                        s.is_owner = true;
                    }
                    s.stale.is_owner = false;
                });
            }
            Err(e) => {
                self.read_failed("owner", &e);
                self.state.update(|s| s.stale.is_owner = true);
            }
        }
    }

    /// Read `tokenIds` into the display counter.
    pub async fn get_token_ids_minted(&self) {
        METRICS.polls_total.fetch_add(1, Ordering::Relaxed);
        let result = async { self.contract().await?.token_ids().await }.await;
        match result {
            Ok(minted) => {
                self.state.update(|s| {
                    s.token_ids_minted = minted.to_string();
                    s.stale.token_ids_minted = false;
                });
            }
            Err(e) => {
                self.read_failed("tokenIds", &e);
                self.state.update(|s| s.stale.token_ids_minted = true);
            }
        }
    }

    /// Presale refresh: started, then owner if not started, else ended.
    /// The owner is only read after `presaleStarted` came back `false`.
    /// Returns whether the presale is known to have ended.
    pub async fn refresh_presale(&self) -> bool {
        match self.read_presale_started().await {
            Some(true) => self.check_presale_ended().await,
            Some(false) => {
                self.get_owner().await;
                false
            }
            None => false,
        }
    }

    async fn contract(&self) -> Result<NftContract<T>, Error> {
        let provider = self.connection.provider().await?;
        Ok(NftContract::new(self.contract, provider))
    }

    fn read_failed(&self, field: &'static str, e: &Error) {
        METRICS.poll_errors.fetch_add(1, Ordering::Relaxed);
        error!(field, error = %e, "Contract read failed");
    }
}
