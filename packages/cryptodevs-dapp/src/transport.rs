//! JSON-RPC transport to the wallet's EIP-1193 provider.

use serde::Deserialize;
use serde_json::{json, Value};
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tracing::{debug, warn};

use crate::metrics::METRICS;
use crate::Error;

/// EIP-1193 error code for a request the user rejected in the wallet.
const USER_REJECTED: i64 = 4001;
/// EIP-1193 error code for a method the wallet has not authorized yet.
const UNAUTHORIZED: i64 = 4100;

/// A provider that answers EIP-1193 `request({ method, params })` calls.
///
/// Everything above this trait (network checks, signer, contract reads and
/// writes) is plain JSON-RPC, so swapping the wallet only means swapping this.
pub trait Transport: Send + Sync + 'static {
    fn request(
        &self,
        method: &str,
        params: Value,
    ) -> impl Future<Output = Result<Value, Error>> + Send;
}

#[derive(Deserialize)]
struct RpcResponse {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<RpcErrorObject>,
}

#[derive(Deserialize)]
struct RpcErrorObject {
    code: i64,
    message: String,
}

/// JSON-RPC 2.0 over HTTP, as served by desktop wallets and dev nodes.
pub struct HttpTransport {
    http: reqwest::Client,
    url: String,
    next_id: AtomicU64,
}

impl HttpTransport {
    pub fn new(url: &str, timeout: Duration) -> Result<Self, Error> {
        let mut builder = reqwest::Client::builder();
        if !timeout.is_zero() {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|e| Error::Config(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self {
            http,
            url: url.to_string(),
            next_id: AtomicU64::new(1),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl Transport for HttpTransport {
    async fn request(&self, method: &str, params: Value) -> Result<Value, Error> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let body = json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": method,
            "params": params,
        });
        debug!(id, method, "JSON-RPC request");

        let resp = self
            .http
            .post(&self.url)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                METRICS.rpc_errors.fetch_add(1, Ordering::Relaxed);
                Error::Rpc(format!("{method}: {e}"))
            })?;

        let status = resp.status();
        if !status.is_success() {
            METRICS.rpc_errors.fetch_add(1, Ordering::Relaxed);
            return Err(Error::Rpc(format!("{method}: HTTP {status}")));
        }

        let parsed: RpcResponse = resp.json().await.map_err(|e| {
            METRICS.rpc_errors.fetch_add(1, Ordering::Relaxed);
            Error::Rpc(format!("{method}: invalid JSON-RPC response: {e}"))
        })?;

        into_result(method, parsed)
    }
}

fn into_result(method: &str, resp: RpcResponse) -> Result<Value, Error> {
    if let Some(err) = resp.error {
        METRICS.rpc_errors.fetch_add(1, Ordering::Relaxed);
        warn!(method, code = err.code, message = %err.message, "JSON-RPC error");
        return Err(match err.code {
            USER_REJECTED | UNAUTHORIZED => Error::Wallet(err.message),
            _ => Error::Rpc(format!("{method}: {} (code {})", err.message, err.code)),
        });
    }
    // `null` is a legitimate result (e.g. a receipt that is not mined yet).
    Ok(resp.result.unwrap_or(Value::Null))
}
