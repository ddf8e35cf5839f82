//! Page state: the local mirror of wallet and contract fields.

use cryptodevs_types::{select_button, ButtonInputs, ButtonState};
use serde::Serialize;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, RwLock};
use std::time::Instant;
use tracing::{debug, info};

use crate::config::Config;
use crate::page::PageController;
use crate::transport::Transport;

/// Set when the last refresh of a field failed. The field keeps its last good value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Staleness {
    pub presale_started: bool,
    pub presale_ended: bool,
    pub is_owner: bool,
    pub token_ids_minted: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageSnapshot {
    pub connected: bool,
    pub network_id: Option<u64>,
    pub presale_started: bool,
    /// Unix seconds, as last read from the contract.
    pub presale_end_timestamp: Option<u64>,
    pub presale_ended: bool,
    pub is_owner: bool,
    /// Decimal string for display.
    pub token_ids_minted: String,
    pub loading: bool,
    pub stale: Staleness,
}

impl Default for PageSnapshot {
    fn default() -> Self {
        Self {
            connected: false,
            network_id: None,
            presale_started: false,
            presale_end_timestamp: None,
            presale_ended: false,
            is_owner: false,
            token_ids_minted: "0".into(),
            loading: false,
            stale: Staleness::default(),
        }
    }
}

impl PageSnapshot {
    /// Owner flag is masked once the presale has started, so the owner gets
    /// the presale and public mint controls like any other account.
    pub fn button_inputs(&self) -> ButtonInputs {
        ButtonInputs {
            connected: self.connected,
            loading: self.loading,
            is_owner: self.is_owner && !self.presale_started,
            presale_started: self.presale_started,
            presale_ended: self.presale_ended,
        }
    }

    pub fn button(&self) -> ButtonState {
        select_button(self.button_inputs())
    }
}

/// Shared page state with a liveness switch.
///
/// After [`PageState::close`] every update is dropped, so operations still
/// suspended at teardown cannot write into a dead page.
pub struct PageState {
    inner: RwLock<PageSnapshot>,
    alive: AtomicBool,
}

impl Default for PageState {
    fn default() -> Self {
        Self::new()
    }
}

impl PageState {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(PageSnapshot::default()),
            alive: AtomicBool::new(true),
        }
    }

    pub fn snapshot(&self) -> PageSnapshot {
        self.inner.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Apply `f` unless the page is closed. Returns whether it was applied.
    pub fn update(&self, f: impl FnOnce(&mut PageSnapshot)) -> bool {
        if !self.is_alive() {
            debug!("Dropping state update after teardown");
            return false;
        }
        let mut inner = self.inner.write().unwrap_or_else(|e| e.into_inner());
        f(&mut inner);
        true
    }

    pub fn button(&self) -> ButtonState {
        self.inner.read().unwrap_or_else(|e| e.into_inner()).button()
    }

    pub fn is_alive(&self) -> bool {
        self.alive.load(Ordering::Acquire)
    }

    pub fn close(&self) {
        self.alive.store(false, Ordering::Release);
    }

    /// Set `loading` until the returned guard is dropped.
    pub fn begin_loading(&self) -> LoadingGuard<'_> {
        self.update(|s| s.loading = true);
        LoadingGuard { state: self }
    }
}

/// Clears `loading` on drop, including on error and cancellation paths.
pub struct LoadingGuard<'a> {
    state: &'a PageState,
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.state.update(|s| s.loading = false);
    }
}

/// Shared application state.
pub struct AppState<T> {
    pub config: Config,
    pub page: PageController<T>,
    pub start_time: Instant,
    pub request_count: AtomicU64,
}

impl<T: Transport> AppState<T> {
    pub fn new(config: Config, transport: Arc<T>) -> Result<Self, crate::Error> {
        let page = PageController::new(&config, transport)?;
        info!(contract = %config.contract_address, chain_id = config.required_chain_id, "Page ready");
        Ok(Self {
            config,
            page,
            start_time: Instant::now(),
            request_count: AtomicU64::new(0),
        })
    }
}
