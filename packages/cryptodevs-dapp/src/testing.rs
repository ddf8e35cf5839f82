//! In-memory wallet + contract used by unit tests.
//!
//! Answers the same JSON-RPC methods a real wallet would and applies the
//! contract's effects (start presale, mint) when transactions are sent.

use alloy_primitives::{Address, Bytes, B256, U256};
use alloy_sol_types::{SolInterface, SolValue};
use cryptodevs_types::ICryptoDevs::ICryptoDevsCalls;
use cryptodevs_types::unix_now;
use serde_json::{json, Value};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use crate::config::Config;
use crate::transport::Transport;
use crate::Error;

pub(crate) const CONTRACT: Address = Address::new([0xc0; 20]);
pub(crate) const USER: Address = Address::new([0x11; 20]);
pub(crate) const DEPLOYER: Address = Address::new([0x0d; 20]);

pub(crate) fn test_config() -> Config {
    Config {
        contract_address: CONTRACT.to_string(),
        receipt_poll_interval_ms: 1,
        ..Config::default()
    }
}

#[derive(Debug, Clone)]
pub(crate) struct SentTx {
    pub from: Address,
    pub to: Address,
    pub value: Option<U256>,
    pub input: Bytes,
}

pub(crate) struct FakeChain {
    pub chain_id: u64,
    pub accounts: Vec<Address>,
    pub owner: Address,
    pub presale_started: bool,
    pub presale_end: u64,
    /// Seconds added to "now" when the presale is started.
    pub presale_duration: u64,
    pub token_ids: u64,
    /// Receipt lookups that return `null` before the receipt appears.
    pub receipt_delay_polls: u32,
    /// While set, every receipt lookup returns `null`.
    pub hold_receipts: bool,
    pub revert_transactions: bool,
    pub reject_connect: bool,
    pub reject_signing: bool,
    /// Call keys (`eth_chainId`, `eth_call:owner`, ...) that fail with an RPC error.
    pub failing: HashSet<String>,
    /// Raw `eth_call` return data used instead of the real answer.
    pub return_override: Option<Bytes>,
    sent: Vec<SentTx>,
    pending: HashMap<B256, u32>,
    reverted: HashSet<B256>,
    calls: Vec<String>,
}

impl Default for FakeChain {
    fn default() -> Self {
        Self {
            chain_id: 4,
            accounts: vec![USER],
            owner: DEPLOYER,
            presale_started: false,
            presale_end: 0,
            presale_duration: 300,
            token_ids: 0,
            receipt_delay_polls: 0,
            hold_receipts: false,
            revert_transactions: false,
            reject_connect: false,
            reject_signing: false,
            failing: HashSet::new(),
            return_override: None,
            sent: Vec::new(),
            pending: HashMap::new(),
            reverted: HashSet::new(),
            calls: Vec::new(),
        }
    }
}

fn method_name(call: &ICryptoDevsCalls) -> &'static str {
    match call {
        ICryptoDevsCalls::presaleStarted(_) => "presaleStarted",
        ICryptoDevsCalls::presaleEnded(_) => "presaleEnded",
        ICryptoDevsCalls::owner(_) => "owner",
        ICryptoDevsCalls::tokenIds(_) => "tokenIds",
        ICryptoDevsCalls::presaleMint(_) => "presaleMint",
        ICryptoDevsCalls::mint(_) => "mint",
        ICryptoDevsCalls::startPresale(_) => "startPresale",
    }
}

/// Calldata of a transaction object, from `input` or the legacy `data` key.
fn calldata(tx: &Value) -> Option<Bytes> {
    let raw = tx.get("input").or_else(|| tx.get("data"))?;
    serde_json::from_value(raw.clone()).ok()
}

fn parse<T: serde::de::DeserializeOwned>(value: &Value) -> Option<T> {
    serde_json::from_value(value.clone()).ok()
}

impl FakeChain {
    fn handle(&mut self, method: &str, params: &Value) -> Result<Value, Error> {
        let call = match method {
            "eth_call" | "eth_sendTransaction" => calldata(&params[0])
                .and_then(|data| ICryptoDevsCalls::abi_decode(&data, true).ok()),
            _ => None,
        };
        let key = match &call {
            Some(call) => format!("{method}:{}", method_name(call)),
            None => method.to_string(),
        };
        self.calls.push(key.clone());

        if self.failing.contains(&key) || self.failing.contains(method) {
            return Err(Error::Rpc(format!("injected failure: {key}")));
        }

        match method {
            "eth_requestAccounts" if self.reject_connect => {
                Err(Error::Wallet("User rejected the request.".into()))
            }
            "eth_requestAccounts" | "eth_accounts" => Ok(json!(self.accounts)),
            "eth_chainId" => Ok(json!(format!("0x{:x}", self.chain_id))),
            "eth_call" => self.call(call),
            "eth_sendTransaction" => self.send(&params[0], call),
            "eth_getTransactionReceipt" => Ok(parse(&params[0])
                .map(|hash| self.receipt(hash))
                .unwrap_or(Value::Null)),
            _ => Err(Error::Rpc(format!("method not found: {method}"))),
        }
    }

    fn call(&self, call: Option<ICryptoDevsCalls>) -> Result<Value, Error> {
        if let Some(data) = &self.return_override {
            return Ok(json!(data));
        }
        let result = match call {
            Some(ICryptoDevsCalls::presaleStarted(_)) => self.presale_started.abi_encode(),
            Some(ICryptoDevsCalls::presaleEnded(_)) => U256::from(self.presale_end).abi_encode(),
            Some(ICryptoDevsCalls::tokenIds(_)) => U256::from(self.token_ids).abi_encode(),
            Some(ICryptoDevsCalls::owner(_)) => self.owner.abi_encode(),
            _ => return Err(Error::Rpc("execution reverted".into())),
        };
        Ok(json!(Bytes::from(result)))
    }

    fn send(&mut self, tx: &Value, call: Option<ICryptoDevsCalls>) -> Result<Value, Error> {
        if self.reject_signing {
            return Err(Error::Wallet("User rejected the request.".into()));
        }
        let hash = B256::from(U256::from(self.sent.len() + 1));
        self.sent.push(SentTx {
            from: parse(&tx["from"]).unwrap_or_default(),
            to: parse(&tx["to"]).unwrap_or_default(),
            value: parse(&tx["value"]),
            input: calldata(tx).unwrap_or_default(),
        });

        if self.revert_transactions {
            self.reverted.insert(hash);
        } else {
            match call {
                Some(ICryptoDevsCalls::startPresale(_)) => {
                    self.presale_started = true;
                    self.presale_end = unix_now() + self.presale_duration;
                }
                Some(ICryptoDevsCalls::presaleMint(_) | ICryptoDevsCalls::mint(_)) => {
                    self.token_ids += 1
                }
                _ => {}
            }
        }
        self.pending.insert(hash, self.receipt_delay_polls);
        Ok(json!(hash))
    }

    fn receipt(&mut self, hash: B256) -> Value {
        if self.hold_receipts {
            return Value::Null;
        }
        match self.pending.get_mut(&hash) {
            None => Value::Null,
            Some(remaining) if *remaining > 0 => {
                *remaining -= 1;
                Value::Null
            }
            Some(_) => {
                let status = if self.reverted.contains(&hash) { "0x0" } else { "0x1" };
                json!({
                    "transactionHash": hash,
                    "blockNumber": "0x1",
                    "status": status,
                })
            }
        }
    }
}

pub(crate) struct FakeWallet {
    chain: Mutex<FakeChain>,
}

impl FakeWallet {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self {
            chain: Mutex::new(FakeChain::default()),
        })
    }

    /// Inspect or reconfigure the chain.
    pub(crate) fn with<R>(&self, f: impl FnOnce(&mut FakeChain) -> R) -> R {
        f(&mut self.chain.lock().unwrap())
    }

    pub(crate) fn fail(&self, key: &str) {
        self.with(|chain| chain.failing.insert(key.to_string()));
    }

    pub(crate) fn heal(&self, key: &str) {
        self.with(|chain| chain.failing.remove(key));
    }

    pub(crate) fn calls(&self) -> Vec<String> {
        self.with(|chain| chain.calls.clone())
    }

    pub(crate) fn clear_calls(&self) {
        self.with(|chain| chain.calls.clear());
    }

    /// Calls whose key is `key` or `key:<contract method>`.
    pub(crate) fn count(&self, key: &str) -> usize {
        let prefix = format!("{key}:");
        self.calls()
            .iter()
            .filter(|c| c.as_str() == key || c.starts_with(&prefix))
            .count()
    }

    pub(crate) fn sent(&self) -> Vec<SentTx> {
        self.with(|chain| chain.sent.clone())
    }
}

impl Transport for FakeWallet {
    async fn request(&self, method: &str, params: Value) -> Result<Value, Error> {
        // Every wallet call is a suspension point.
        tokio::task::yield_now().await;
        self.with(|chain| chain.handle(method, &params))
    }
}
