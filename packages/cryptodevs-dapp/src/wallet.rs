//! Provider and signer handles over the wallet transport.

use alloy_primitives::{Address, Bytes, B256, U64};
use alloy_rpc_types_eth::TransactionRequest;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use crate::transport::Transport;
use crate::Error;

/// Read-only handle: network id, `eth_call`, receipts.
pub struct Web3Provider<T> {
    transport: Arc<T>,
}

impl<T> Clone for Web3Provider<T> {
    fn clone(&self) -> Self {
        Self {
            transport: Arc::clone(&self.transport),
        }
    }
}

impl<T: Transport> Web3Provider<T> {
    pub fn new(transport: Arc<T>) -> Self {
        Self { transport }
    }

    pub async fn chain_id(&self) -> Result<u64, Error> {
        let id: U64 = self.request("eth_chainId", json!([])).await?;
        Ok(id.to::<u64>())
    }

    /// `eth_call` against the latest block. Returns raw return data.
    pub async fn call(&self, tx: &TransactionRequest) -> Result<Bytes, Error> {
        self.request("eth_call", params((tx, "latest"))?).await
    }

    /// `None` until the transaction is mined.
    pub async fn transaction_receipt(&self, tx_hash: B256) -> Result<Option<Receipt>, Error> {
        self.request("eth_getTransactionReceipt", params((tx_hash,))?)
            .await
    }

    pub fn signer(&self) -> Signer<T> {
        Signer {
            provider: self.clone(),
        }
    }

    async fn request<R: DeserializeOwned>(&self, method: &str, params: Value) -> Result<R, Error> {
        let value = self.transport.request(method, params).await?;
        serde_json::from_value(value)
            .map_err(|e| Error::Rpc(format!("{method}: unexpected result: {e}")))
    }
}

/// Signing handle. Keys stay in the wallet; this only asks it to sign and send.
pub struct Signer<T> {
    provider: Web3Provider<T>,
}

impl<T: Transport> Signer<T> {
    /// The wallet's selected account.
    pub async fn address(&self) -> Result<Address, Error> {
        let accounts = self
            .provider
            .transport
            .request("eth_accounts", json!([]))
            .await?;
        first_account(accounts)
    }

    pub async fn send_transaction(
        &self,
        tx: TransactionRequest,
    ) -> Result<PendingTransaction<T>, Error> {
        let hash: B256 = self
            .provider
            .request("eth_sendTransaction", params((tx,))?)
            .await?;
        Ok(PendingTransaction {
            hash,
            provider: self.provider.clone(),
        })
    }

    pub fn provider(&self) -> &Web3Provider<T> {
        &self.provider
    }
}

/// First entry of an `eth_accounts` / `eth_requestAccounts` result.
pub(crate) fn first_account(accounts: Value) -> Result<Address, Error> {
    serde_json::from_value::<Vec<Address>>(accounts)
        .map_err(|e| Error::Wallet(format!("invalid account list: {e}")))?
        .into_iter()
        .next()
        .ok_or_else(|| Error::Wallet("no account available".into()))
}

/// Positional JSON-RPC params from a tuple.
fn params(values: impl Serialize) -> Result<Value, Error> {
    serde_json::to_value(values).map_err(|e| Error::Rpc(format!("invalid params: {e}")))
}

/// The receipt fields the page needs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Receipt {
    pub transaction_hash: B256,
    #[serde(default)]
    pub block_number: Option<U64>,
    /// `0x1` success, `0x0` failure. Absent on pre-Byzantium chains.
    #[serde(default)]
    pub status: Option<U64>,
}

impl Receipt {
    pub fn succeeded(&self) -> bool {
        self.status != Some(U64::ZERO)
    }
}

/// A transaction the wallet accepted but that may not be mined yet.
pub struct PendingTransaction<T> {
    hash: B256,
    provider: Web3Provider<T>,
}

impl<T: Transport> PendingTransaction<T> {
    pub fn hash(&self) -> B256 {
        self.hash
    }

    /// Suspend until the transaction is mined. A failed receipt is an error.
    pub async fn wait(self, poll_interval: Duration) -> Result<Receipt, Error> {
        loop {
            match self.provider.transaction_receipt(self.hash).await? {
                Some(receipt) if receipt.succeeded() => return Ok(receipt),
                Some(_) => {
                    return Err(Error::Reverted {
                        tx_hash: self.hash.to_string(),
                    })
                }
                None => {
                    debug!(tx_hash = %self.hash, "Receipt not available yet");
                    tokio::time::sleep(poll_interval).await;
                }
            }
        }
    }
}
