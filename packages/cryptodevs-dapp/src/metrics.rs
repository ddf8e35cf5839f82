//! Prometheus metrics (lock-free atomics, zero allocation on hot path).

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

pub static METRICS: Metrics = Metrics::new();

pub struct Metrics {
    // --- Polling ---
    pub polls_total: AtomicU64,
    pub poll_errors: AtomicU64,

    // --- Connection ---
    pub wallet_connects: AtomicU64,
    pub network_mismatches: AtomicU64,

    // --- Transactions ---
    pub tx_submitted: AtomicU64,
    pub tx_confirmed: AtomicU64,
    pub tx_failed: AtomicU64,

    // --- Confirmation latency (μs) ---
    pub tx_confirm_us_sum: AtomicU64,
    pub tx_confirm_us_max: AtomicU64,

    // --- RPC ---
    pub rpc_errors: AtomicU64,
    pub alerts_raised: AtomicU64,
}

impl Metrics {
    const fn new() -> Self {
        Self {
            polls_total: AtomicU64::new(0),
            poll_errors: AtomicU64::new(0),
            wallet_connects: AtomicU64::new(0),
            network_mismatches: AtomicU64::new(0),
            tx_submitted: AtomicU64::new(0),
            tx_confirmed: AtomicU64::new(0),
            tx_failed: AtomicU64::new(0),
            tx_confirm_us_sum: AtomicU64::new(0),
            tx_confirm_us_max: AtomicU64::new(0),
            rpc_errors: AtomicU64::new(0),
            alerts_raised: AtomicU64::new(0),
        }
    }

    pub fn record_confirmation(&self, start: Instant) {
        let us = start.elapsed().as_micros() as u64;
        self.tx_confirm_us_sum.fetch_add(us, Ordering::Relaxed);
        // CAS loop for max tracking
        let mut cur = self.tx_confirm_us_max.load(Ordering::Relaxed);
        while us > cur {
            match self.tx_confirm_us_max.compare_exchange_weak(
                cur,
                us,
                Ordering::Relaxed,
                Ordering::Relaxed,
            ) {
                Ok(_) => break,
                Err(actual) => cur = actual,
            }
        }
    }

    /// Render in Prometheus text exposition format.
    pub fn render(&self, connected: bool, loading: bool) -> String {
        let polls_total = self.polls_total.load(Ordering::Relaxed);
        let poll_errors = self.poll_errors.load(Ordering::Relaxed);
        let wallet_connects = self.wallet_connects.load(Ordering::Relaxed);
        let network_mismatches = self.network_mismatches.load(Ordering::Relaxed);
        let tx_submitted = self.tx_submitted.load(Ordering::Relaxed);
        let tx_confirmed = self.tx_confirmed.load(Ordering::Relaxed);
        let tx_failed = self.tx_failed.load(Ordering::Relaxed);
        let confirm_sum = self.tx_confirm_us_sum.load(Ordering::Relaxed);
        let confirm_max = self.tx_confirm_us_max.swap(0, Ordering::Relaxed);
        let rpc_errors = self.rpc_errors.load(Ordering::Relaxed);
        let alerts_raised = self.alerts_raised.load(Ordering::Relaxed);

        let confirm_sum_s = confirm_sum as f64 / 1_000_000.0;
        let confirm_max_s = confirm_max as f64 / 1_000_000.0;
        let connected = u8::from(connected);
        let loading = u8::from(loading);

        format!(
            "\
# HELP dapp_polls_total Contract reads issued by the poller.\n\
# TYPE dapp_polls_total counter\n\
dapp_polls_total {polls_total}\n\
# HELP dapp_poll_errors_total Contract reads that failed.\n\
# TYPE dapp_poll_errors_total counter\n\
dapp_poll_errors_total {poll_errors}\n\
# HELP dapp_wallet_connects_total Successful wallet connections.\n\
# TYPE dapp_wallet_connects_total counter\n\
dapp_wallet_connects_total {wallet_connects}\n\
# HELP dapp_network_mismatches_total Calls aborted on the wrong chain.\n\
# TYPE dapp_network_mismatches_total counter\n\
dapp_network_mismatches_total {network_mismatches}\n\
# HELP dapp_tx_submitted_total Transactions accepted by the wallet.\n\
# TYPE dapp_tx_submitted_total counter\n\
dapp_tx_submitted_total {tx_submitted}\n\
# HELP dapp_tx_confirmed_total Transactions mined successfully.\n\
# TYPE dapp_tx_confirmed_total counter\n\
dapp_tx_confirmed_total {tx_confirmed}\n\
# HELP dapp_tx_failed_total Transactions that failed or reverted.\n\
# TYPE dapp_tx_failed_total counter\n\
dapp_tx_failed_total {tx_failed}\n\
# HELP dapp_tx_confirm_seconds_sum Total submit-to-receipt time (seconds).\n\
# TYPE dapp_tx_confirm_seconds_sum counter\n\
dapp_tx_confirm_seconds_sum {confirm_sum_s:.6}\n\
# HELP dapp_tx_confirm_seconds_max Max submit-to-receipt time since last scrape (seconds).\n\
# TYPE dapp_tx_confirm_seconds_max gauge\n\
dapp_tx_confirm_seconds_max {confirm_max_s:.6}\n\
# HELP dapp_rpc_errors_total Wallet JSON-RPC errors.\n\
# TYPE dapp_rpc_errors_total counter\n\
dapp_rpc_errors_total {rpc_errors}\n\
# HELP dapp_alerts_raised_total Alerts shown to the user.\n\
# TYPE dapp_alerts_raised_total counter\n\
dapp_alerts_raised_total {alerts_raised}\n\
# HELP dapp_wallet_connected Whether the page has a connected wallet.\n\
# TYPE dapp_wallet_connected gauge\n\
dapp_wallet_connected {connected}\n\
# HELP dapp_loading Whether a transaction is awaiting confirmation.\n\
# TYPE dapp_loading gauge\n\
dapp_loading {loading}\n"
        )
    }
}
