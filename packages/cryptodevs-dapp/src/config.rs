//! dApp configuration.

use crate::Error;
use alloy_primitives::utils::parse_ether;
use alloy_primitives::{Address, U256};
use config::builder::DefaultState;
use config::{ConfigBuilder, ConfigError, Environment, File};
use serde::Deserialize;
use std::time::Duration;

/// Configuration for the mint page client.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// EIP-1193 JSON-RPC endpoint exposed by the wallet.
    #[serde(default = "defaults::wallet_url")]
    pub wallet_url: String,

    #[serde(default = "defaults::contract_address")]
    pub contract_address: String,

    #[serde(default = "defaults::required_chain_id")]
    pub required_chain_id: u64,

    #[serde(default = "defaults::network_mismatch_alert")]
    pub network_mismatch_alert: String,

    /// Fee attached to presale and public mints, in ether.
    #[serde(default = "defaults::mint_price_eth")]
    pub mint_price_eth: String,

    #[serde(default = "defaults::poll_interval_secs")]
    pub poll_interval_secs: u64,

    #[serde(default = "defaults::receipt_poll_interval_ms")]
    pub receipt_poll_interval_ms: u64,

    #[serde(default = "defaults::rpc_timeout_secs")]
    pub rpc_timeout_secs: u64,

    /// Collection size shown next to the minted count.
    #[serde(default = "defaults::max_supply")]
    pub max_supply: u64,

    #[serde(default = "defaults::bind_address")]
    pub bind_address: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            wallet_url: defaults::wallet_url(),
            contract_address: defaults::contract_address(),
            required_chain_id: defaults::required_chain_id(),
            network_mismatch_alert: defaults::network_mismatch_alert(),
            mint_price_eth: defaults::mint_price_eth(),
            poll_interval_secs: defaults::poll_interval_secs(),
            receipt_poll_interval_ms: defaults::receipt_poll_interval_ms(),
            rpc_timeout_secs: defaults::rpc_timeout_secs(),
            max_supply: defaults::max_supply(),
            bind_address: defaults::bind_address(),
        }
    }
}

impl Config {
    /// Load `<file>.toml` if present, then `DAPP_*` environment overrides.
    /// A missing file is not an error; every field has a default.
    pub fn load(file: &str) -> Result<Self, ConfigError> {
        Self::from_builder(
            config::Config::builder().add_source(File::with_name(file).required(false)),
        )
    }

    fn from_builder(builder: ConfigBuilder<DefaultState>) -> Result<Self, ConfigError> {
        builder
            .add_source(Environment::with_prefix("DAPP"))
            .build()?
            .try_deserialize()
    }

    pub fn contract(&self) -> Result<Address, Error> {
        self.contract_address
            .parse()
            .map_err(|e| Error::Config(format!("Invalid contract_address: {e}")))
    }

    pub fn mint_price_wei(&self) -> Result<U256, Error> {
        parse_ether(&self.mint_price_eth)
            .map_err(|e| Error::Config(format!("Invalid mint_price_eth: {e}")))
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs.max(1))
    }

    pub fn receipt_poll_interval(&self) -> Duration {
        Duration::from_millis(self.receipt_poll_interval_ms.max(1))
    }

    pub fn rpc_timeout(&self) -> Duration {
        Duration::from_secs(self.rpc_timeout_secs)
    }

    /// Fail fast on values that would only surface at the first poll.
    pub fn validate(&self) -> Result<(), Error> {
        self.contract()?;
        self.mint_price_wei()?;
        if self.wallet_url.is_empty() {
            return Err(Error::Config("wallet_url is empty".into()));
        }
        Ok(())
    }
}

mod defaults {
    pub fn wallet_url() -> String {
        // Frame and similar desktop wallets expose their provider here.
        "http://127.0.0.1:1248".into()
    }

    pub fn contract_address() -> String {
        "0x0000000000000000000000000000000000000000".into()
    }

    /// Rinkeby.
    pub fn required_chain_id() -> u64 {
        4
    }

    pub fn network_mismatch_alert() -> String {
        "Please connect to the Rinkey Testnet.".into()
    }

    pub fn mint_price_eth() -> String {
        "0.01".into()
    }

    pub fn poll_interval_secs() -> u64 {
        5
    }

    pub fn receipt_poll_interval_ms() -> u64 {
        1_000
    }

    pub fn rpc_timeout_secs() -> u64 {
        30
    }

    pub fn max_supply() -> u64 {
        20
    }

    pub fn bind_address() -> String {
        "0.0.0.0:3050".into()
    }
}
