//! Blocking-dialog replacement: a bounded queue of user-facing messages.

use cryptodevs_types::unix_now;
use serde::Serialize;
use std::collections::VecDeque;
use std::sync::atomic::Ordering;
use std::sync::Mutex;
use tracing::info;

use crate::metrics::METRICS;

/// Oldest alerts are dropped past this.
const MAX_PENDING: usize = 32;

pub const MINT_SUCCESS: &str = "You successfully minted a Crypto Dev!";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Alert {
    pub message: String,
    pub raised_at: u64,
}

#[derive(Default)]
pub struct Alerts {
    queue: Mutex<VecDeque<Alert>>,
}

impl Alerts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, message: impl Into<String>) {
        let message = message.into();
        info!(message = %message, "Alert raised");
        METRICS.alerts_raised.fetch_add(1, Ordering::Relaxed);

        let mut queue = self.queue.lock().unwrap_or_else(|e| e.into_inner());
        if queue.len() == MAX_PENDING {
            queue.pop_front();
        }
        queue.push_back(Alert {
            message,
            raised_at: unix_now(),
        });
    }

    /// Take every pending alert, oldest first.
    pub fn drain(&self) -> Vec<Alert> {
        self.queue
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .drain(..)
            .collect()
    }

    pub fn pending(&self) -> usize {
        self.queue.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn messages(&self) -> Vec<String> {
        self.queue
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .map(|a| a.message.clone())
            .collect()
    }
}
