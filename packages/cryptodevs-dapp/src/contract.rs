//! Bindings for the Crypto Devs NFT contract.

use alloy_primitives::{Address, TxKind, U256};
use alloy_rpc_types_eth::{TransactionInput, TransactionRequest};
use alloy_sol_types::SolCall;
use cryptodevs_types::ICryptoDevs;
use tracing::info;

use crate::transport::Transport;
use crate::wallet::{PendingTransaction, Signer, Web3Provider};
use crate::Error;

/// Read-only view of the contract.
pub struct NftContract<T> {
    address: Address,
    provider: Web3Provider<T>,
}

impl<T: Transport> NftContract<T> {
    pub fn new(address: Address, provider: Web3Provider<T>) -> Self {
        Self { address, provider }
    }

    pub async fn presale_started(&self) -> Result<bool, Error> {
        Ok(self.read(ICryptoDevs::presaleStartedCall {}).await?._0)
    }

    /// Presale end as Unix seconds.
    pub async fn presale_ended(&self) -> Result<u64, Error> {
        let end = self.read(ICryptoDevs::presaleEndedCall {}).await?._0;
        narrow(ICryptoDevs::presaleEndedCall::SIGNATURE, end)
    }

    pub async fn owner(&self) -> Result<Address, Error> {
        Ok(self.read(ICryptoDevs::ownerCall {}).await?._0)
    }

    /// Number of tokens minted so far.
    pub async fn token_ids(&self) -> Result<u64, Error> {
        let minted = self.read(ICryptoDevs::tokenIdsCall {}).await?._0;
        narrow(ICryptoDevs::tokenIdsCall::SIGNATURE, minted)
    }

    async fn read<C: SolCall + Send>(&self, call: C) -> Result<C::Return, Error> {
        let tx = TransactionRequest {
            to: Some(TxKind::Call(self.address)),
            input: TransactionInput::both(call.abi_encode().into()),
            ..Default::default()
        };
        let data = self.provider.call(&tx).await?;
        C::abi_decode_returns(&data, true)
            .map_err(|e| Error::Abi(format!("{}: {e}", C::SIGNATURE)))
    }
}

/// Chain integers are u64 past this point; anything wider is bad data.
fn narrow(method: &str, value: U256) -> Result<u64, Error> {
    u64::try_from(value).map_err(|_| Error::Abi(format!("{method} returned {value}, wider than u64")))
}

/// State-changing calls, sent through the wallet's signer.
pub struct NftWriter<T> {
    address: Address,
    signer: Signer<T>,
}

impl<T: Transport> NftWriter<T> {
    pub fn new(address: Address, signer: Signer<T>) -> Self {
        Self { address, signer }
    }

    /// Whitelisted mint while the presale window is open.
    pub async fn presale_mint(&self, fee_wei: U256) -> Result<PendingTransaction<T>, Error> {
        self.send(ICryptoDevs::presaleMintCall {}, Some(fee_wei)).await
    }

    /// Public mint once the presale is over.
    pub async fn mint(&self, fee_wei: U256) -> Result<PendingTransaction<T>, Error> {
        self.send(ICryptoDevs::mintCall {}, Some(fee_wei)).await
    }

    /// Owner only.
    pub async fn start_presale(&self) -> Result<PendingTransaction<T>, Error> {
        self.send(ICryptoDevs::startPresaleCall {}, None).await
    }

    async fn send<C: SolCall + Send>(
        &self,
        call: C,
        value: Option<U256>,
    ) -> Result<PendingTransaction<T>, Error> {
        let from = self.signer.address().await?;
        let tx = TransactionRequest {
            from: Some(from),
            to: Some(TxKind::Call(self.address)),
            value,
            input: TransactionInput::both(call.abi_encode().into()),
            ..Default::default()
        };
        let pending = self.signer.send_transaction(tx).await?;
        info!(
            method = C::SIGNATURE,
            tx_hash = %pending.hash(),
            from = %from,
            "Transaction submitted"
        );
        Ok(pending)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeWallet, CONTRACT};
    use alloy_sol_types::SolValue;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_reads_decode_contract_fields() {
        let wallet = FakeWallet::new();
        let owner = wallet.with(|chain| {
            chain.presale_started = true;
            chain.presale_end = 1_700_000_000;
            chain.token_ids = 7;
            chain.owner
        });
        let contract = NftContract::new(CONTRACT, Web3Provider::new(wallet));

        assert!(contract.presale_started().await.unwrap());
        assert_eq!(contract.presale_ended().await.unwrap(), 1_700_000_000);
        assert_eq!(contract.token_ids().await.unwrap(), 7);
        assert_eq!(contract.owner().await.unwrap(), owner);
    }

    #[tokio::test]
    async fn test_counter_wider_than_u64_is_abi_error() {
        let wallet = FakeWallet::new();
        let wide = U256::from(u64::MAX) + U256::from(1);
        wallet.with(|chain| chain.return_override = Some(wide.abi_encode().into()));
        let contract = NftContract::new(CONTRACT, Web3Provider::new(wallet));

        assert!(matches!(contract.token_ids().await, Err(Error::Abi(_))));
    }

    #[tokio::test]
    async fn test_short_return_data_is_abi_error() {
        let wallet = FakeWallet::new();
        wallet.with(|chain| chain.return_override = Some(vec![0u8; 8].into()));
        let contract = NftContract::new(CONTRACT, Web3Provider::new(wallet));

        assert!(matches!(contract.owner().await, Err(Error::Abi(_))));
    }

    #[tokio::test]
    async fn test_mint_attaches_fee_and_selector() {
        let wallet = FakeWallet::new();
        let writer = NftWriter::new(CONTRACT, Web3Provider::new(Arc::clone(&wallet)).signer());
        let fee = U256::from(10_000_000_000_000_000u64);

        writer.presale_mint(fee).await.unwrap();
        writer.start_presale().await.unwrap();

        let sent = wallet.sent();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0].input[..], ICryptoDevs::presaleMintCall::SELECTOR);
        assert_eq!(sent[0].value, Some(fee));
        assert_eq!(sent[0].to, CONTRACT);
        assert_eq!(sent[1].input[..], ICryptoDevs::startPresaleCall::SELECTOR);
        assert_eq!(sent[1].value, None);
    }
}
