//! ABI of the Crypto Devs NFT contract, as called by the mint page.

// The sol! macro generates code that we can't document.
#![allow(missing_docs)]

use alloy_sol_types::sol;

sol! {
    /// Presale-gated ERC-721 collection with a fixed mint fee.
    #[derive(Debug, PartialEq, Eq)]
    interface ICryptoDevs {
        /// Whether the owner has opened the presale.
        function presaleStarted() external view returns (bool);

        /// Presale end, Unix seconds.
        function presaleEnded() external view returns (uint256);

        function owner() external view returns (address);

        /// Tokens minted so far.
        function tokenIds() external view returns (uint256);

        /// Whitelisted mint while the presale is open.
        function presaleMint() external payable;

        /// Public mint once the presale is over.
        function mint() external payable;

        /// Owner only.
        function startPresale() external;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::{Address, U256, hex};
    use alloy_sol_types::{SolCall, SolInterface, SolValue};

    #[test]
    fn test_selectors() {
        assert_eq!(ICryptoDevs::presaleStartedCall::SELECTOR, hex!("04549d6f"));
        assert_eq!(ICryptoDevs::presaleEndedCall::SELECTOR, hex!("e580b2b0"));
        assert_eq!(ICryptoDevs::ownerCall::SELECTOR, hex!("8da5cb5b"));
        assert_eq!(ICryptoDevs::tokenIdsCall::SELECTOR, hex!("714cff56"));
        assert_eq!(ICryptoDevs::presaleMintCall::SELECTOR, hex!("59533d6c"));
        assert_eq!(ICryptoDevs::mintCall::SELECTOR, hex!("1249c58b"));
        assert_eq!(ICryptoDevs::startPresaleCall::SELECTOR, hex!("04c98b2b"));
    }

    #[test]
    fn test_no_argument_calls_are_bare_selectors() {
        assert_eq!(
            ICryptoDevs::mintCall {}.abi_encode(),
            ICryptoDevs::mintCall::SELECTOR.to_vec()
        );
    }

    #[test]
    fn test_decode_calldata_into_call_enum() {
        let data = ICryptoDevs::startPresaleCall {}.abi_encode();
        let call = ICryptoDevs::ICryptoDevsCalls::abi_decode(&data, true).unwrap();
        assert!(matches!(call, ICryptoDevs::ICryptoDevsCalls::startPresale(_)));
    }

    #[test]
    fn test_decode_returns() {
        let owner = Address::repeat_byte(0xab);
        let decoded =
            ICryptoDevs::ownerCall::abi_decode_returns(&owner.abi_encode(), true).unwrap();
        assert_eq!(decoded._0, owner);

        let end = U256::from(1_700_000_000u64);
        let decoded =
            ICryptoDevs::presaleEndedCall::abi_decode_returns(&end.abi_encode(), true).unwrap();
        assert_eq!(decoded._0, end);
    }
}
