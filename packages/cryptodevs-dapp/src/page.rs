//! Page lifecycle controller.
//!
//! Mount starts the initial sync and both polling timers; teardown cancels
//! them, abandons suspended operations and closes the state so nothing lands
//! after unmount.

use cryptodevs_types::{Action, ButtonState};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::{debug, info, warn};

use crate::alerts::Alerts;
use crate::config::Config;
use crate::connection::ConnectionManager;
use crate::poller::ChainStatePoller;
use crate::state::{PageSnapshot, PageState};
use crate::submitter::TransactionSubmitter;
use crate::transport::Transport;
use crate::Error;

pub struct PageController<T> {
    connection: Arc<ConnectionManager<T>>,
    poller: Arc<ChainStatePoller<T>>,
    submitter: Arc<TransactionSubmitter<T>>,
    state: Arc<PageState>,
    alerts: Arc<Alerts>,
    poll_interval: Duration,
    cancel: CancellationToken,
    tasks: TaskTracker,
}

impl<T: Transport> PageController<T> {
    pub fn new(config: &Config, transport: Arc<T>) -> Result<Self, Error> {
        let contract = config.contract()?;
        let mint_fee_wei = config.mint_price_wei()?;

        let state = Arc::new(PageState::new());
        let alerts = Arc::new(Alerts::new());
        let connection = Arc::new(ConnectionManager::new(
            transport,
            config.required_chain_id,
            config.network_mismatch_alert.clone(),
            Arc::clone(&alerts),
        ));
        let poller = Arc::new(ChainStatePoller::new(
            Arc::clone(&connection),
            Arc::clone(&state),
            contract,
        ));
        let submitter = Arc::new(TransactionSubmitter::new(
            Arc::clone(&connection),
            Arc::clone(&poller),
            Arc::clone(&state),
            Arc::clone(&alerts),
            contract,
            mint_fee_wei,
            config.receipt_poll_interval(),
        ));

        Ok(Self {
            connection,
            poller,
            submitter,
            state,
            alerts,
            poll_interval: config.poll_interval(),
            cancel: CancellationToken::new(),
            tasks: TaskTracker::new(),
        })
    }

    /// Start the page: initial connect + reads, then both timers.
    /// The returned handle resolves when the initial sync is done.
    pub fn mount(&self) -> JoinHandle<()> {
        info!(poll_secs = self.poll_interval.as_secs(), "Mounting page");

        let connection = Arc::clone(&self.connection);
        let poller = Arc::clone(&self.poller);
        let state = Arc::clone(&self.state);
        let initial = self.spawn_cancellable(async move {
            connection.connect_wallet(&state).await;
            poller.refresh_presale().await;
            poller.get_token_ids_minted().await;
        });

        self.spawn_presale_timer();
        self.spawn_mint_counter_timer();
        initial
    }

    /// Cancel timers and in-flight operations, then wait for them to stop.
    pub async fn teardown(&self) {
        info!("Tearing down page");
        self.state.close();
        self.cancel.cancel();
        self.tasks.close();
        self.tasks.wait().await;
        info!("Page torn down");
    }

    pub fn snapshot(&self) -> PageSnapshot {
        self.state.snapshot()
    }

    pub fn button(&self) -> ButtonState {
        self.state.button()
    }

    pub fn alerts(&self) -> &Alerts {
        &self.alerts
    }

    pub fn is_mounted(&self) -> bool {
        !self.cancel.is_cancelled()
    }

    /// Run `action` to completion, as if its control was clicked.
    pub async fn click(&self, action: Action) -> Result<(), Error> {
        self.ensure_offered(action)?;
        run_action(
            action,
            &self.connection,
            &self.submitter,
            &self.state,
        )
        .await
    }

    /// Start `action` in the background if the rendered control offers it.
    pub fn dispatch(&self, action: Action) -> Result<(), Error> {
        self.ensure_offered(action)?;
        let connection = Arc::clone(&self.connection);
        let submitter = Arc::clone(&self.submitter);
        let state = Arc::clone(&self.state);
        self.spawn_cancellable(async move {
            if let Err(e) = run_action(action, &connection, &submitter, &state).await {
                debug!(?action, error = %e, "Action finished with error");
            }
        });
        Ok(())
    }

    fn ensure_offered(&self, action: Action) -> Result<(), Error> {
        let button = self.button();
        if button.action() == Some(action) {
            Ok(())
        } else {
            warn!(?action, ?button, "Action not offered by current control");
            Err(Error::ActionUnavailable { action, button })
        }
    }

    /// Re-read presale state every period until the end is observed.
    fn spawn_presale_timer(&self) {
        let poller = Arc::clone(&self.poller);
        let cancel = self.cancel.clone();
        let period = self.poll_interval;
        self.tasks.spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    _ = ticker.tick() => {}
                    _ = cancel.cancelled() => break,
                }
                let ended = tokio::select! {
                    ended = poller.refresh_presale() => ended,
                    _ = cancel.cancelled() => break,
                };
                if ended {
                    info!("Presale over, stopping presale timer");
                    break;
                }
            }
            debug!("Presale timer stopped");
        });
    }

    /// Re-read the minted counter every period until teardown.
    fn spawn_mint_counter_timer(&self) {
        let poller = Arc::clone(&self.poller);
        let cancel = self.cancel.clone();
        let period = self.poll_interval;
        self.tasks.spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    _ = ticker.tick() => {}
                    _ = cancel.cancelled() => break,
                }
                tokio::select! {
                    _ = poller.get_token_ids_minted() => {}
                    _ = cancel.cancelled() => break,
                }
            }
            debug!("Mint counter timer stopped");
        });
    }

    fn spawn_cancellable<F>(&self, fut: F) -> JoinHandle<()>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let cancel = self.cancel.clone();
        self.tasks.spawn(async move {
            tokio::select! {
                _ = fut => {}
                _ = cancel.cancelled() => debug!("Abandoned suspended operation at teardown"),
            }
        })
    }
}

impl<T> Drop for PageController<T> {
    fn drop(&mut self) {
        self.state.close();
        self.cancel.cancel();
    }
}

async fn run_action<T: Transport>(
    action: Action,
    connection: &ConnectionManager<T>,
    submitter: &TransactionSubmitter<T>,
    state: &PageState,
) -> Result<(), Error> {
    match action {
        Action::Connect => {
            if connection.connect_wallet(state).await {
                Ok(())
            } else {
                Err(Error::Wallet("wallet connection failed".into()))
            }
        }
        Action::StartPresale => submitter.start_presale().await.map(drop),
        Action::PresaleMint => submitter.presale_mint().await.map(drop),
        Action::PublicMint => submitter.public_mint().await.map(drop),
    }
}
