//! Static registry of the chains the check-in contract is deployed on.

use num_enum::{IntoPrimitive, TryFromPrimitive};
use serde::Serialize;

/// Chains with a deployed check-in contract.
#[repr(u64)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, IntoPrimitive, TryFromPrimitive)]
pub enum ChainId {
    Optimism = 10,
    Unichain = 130,
    Soneium = 1868,
    Base = 8453,
    Celo = 42220,
    Ink = 57073,
}

/// The only chain hosting the referral contract.
pub const REFERRAL_CHAIN: ChainId = ChainId::Base;

/// Referral contract on [`REFERRAL_CHAIN`].
pub const REFERRAL_CONTRACT: &str = "0x7f3c8e5a2b1d9f04c6e8a3b5d7f9e1c2a4b6d8e0";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct NativeCurrency {
    pub name: &'static str,
    pub symbol: &'static str,
    pub decimals: u8,
}

const ETHER: NativeCurrency = NativeCurrency {
    name: "Ether",
    symbol: "ETH",
    decimals: 18,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChainConfig {
    pub id: ChainId,
    pub name: &'static str,
    pub native_currency: NativeCurrency,
    pub rpc_urls: &'static [&'static str],
    pub explorer_urls: &'static [&'static str],
    pub checkin_contract: &'static str,
    pub token_factory: Option<&'static str>,
    pub subgraph_url: &'static str,
    pub logo: &'static str,
    pub is_mainnet: bool,
    pub enabled: bool,
}

impl ChainConfig {
    pub fn chain_id(&self) -> u64 {
        self.id.into()
    }

    pub fn hosts_referrals(&self) -> bool {
        self.id == REFERRAL_CHAIN
    }

    pub fn rpc_url(&self) -> &'static str {
        self.rpc_urls[0]
    }

    pub fn explorer_url(&self) -> &'static str {
        self.explorer_urls[0]
    }

    pub fn explorer_tx_url(&self, tx_hash: &str) -> String {
        format!("{}/tx/{}", self.explorer_url(), tx_hash)
    }

    pub fn explorer_address_url(&self, address: &str) -> String {
        format!("{}/address/{}", self.explorer_url(), address)
    }
}

/// All supported chains, referral chain first.
pub const ALL: &[ChainConfig] = &[
    ChainConfig {
        id: ChainId::Base,
        name: "Base",
        native_currency: ETHER,
        rpc_urls: &["https://mainnet.base.org", "https://base-rpc.publicnode.com"],
        explorer_urls: &["https://basescan.org"],
        checkin_contract: "0x2c4e1b0a8f6d3e5c7a9b1d3f5e7c9a0b2d4f6e81",
        token_factory: Some("0x9a1e3c5b7d9f0a2c4e6b8d0f1a3c5e7b9d1f3a52"),
        subgraph_url: "https://api.studio.thegraph.com/query/106565/gm-base/version/latest",
        logo: "/assets/chains/base.svg",
        is_mainnet: true,
        enabled: true,
    },
    ChainConfig {
        id: ChainId::Optimism,
        name: "OP Mainnet",
        native_currency: ETHER,
        rpc_urls: &["https://mainnet.optimism.io", "https://optimism-rpc.publicnode.com"],
        explorer_urls: &["https://optimistic.etherscan.io"],
        checkin_contract: "0x4b6d8f0a2c4e6a8c0e2b4d6f8a0c2e4b6d8f0a13",
        token_factory: Some("0x1c3e5a7b9d0f2a4c6e8b0d2f4a6c8e0b2d4f6a74"),
        subgraph_url: "https://api.studio.thegraph.com/query/106565/gm-optimism/version/latest",
        logo: "/assets/chains/optimism.svg",
        is_mainnet: true,
        enabled: true,
    },
    ChainConfig {
        id: ChainId::Celo,
        name: "Celo",
        native_currency: NativeCurrency {
            name: "Celo",
            symbol: "CELO",
            decimals: 18,
        },
        rpc_urls: &["https://forno.celo.org"],
        explorer_urls: &["https://celoscan.io"],
        checkin_contract: "0x6d8f0a2c4e6b8d0f2a4c6e8a0b2d4f6a8c0e2b35",
        token_factory: None,
        subgraph_url: "https://api.studio.thegraph.com/query/106565/gm-celo/version/latest",
        logo: "/assets/chains/celo.svg",
        is_mainnet: true,
        enabled: true,
    },
    ChainConfig {
        id: ChainId::Ink,
        name: "Ink",
        native_currency: ETHER,
        rpc_urls: &["https://rpc-gel.inkonchain.com", "https://rpc-qnd.inkonchain.com"],
        explorer_urls: &["https://explorer.inkonchain.com"],
        checkin_contract: "0x8f0a2c4e6b8d0a2c4e6f8b0d2a4c6e8f0b2d4a96",
        token_factory: None,
        subgraph_url: "https://api.studio.thegraph.com/query/106565/gm-ink/version/latest",
        logo: "/assets/chains/ink.svg",
        is_mainnet: true,
        enabled: true,
    },
    ChainConfig {
        id: ChainId::Soneium,
        name: "Soneium",
        native_currency: ETHER,
        rpc_urls: &["https://rpc.soneium.org"],
        explorer_urls: &["https://soneium.blockscout.com"],
        checkin_contract: "0xa0c2e4b6d8f0a2c4e6b8d0f2a4c6e8b0d2f4a6c7",
        token_factory: None,
        subgraph_url: "https://api.studio.thegraph.com/query/106565/gm-soneium/version/latest",
        logo: "/assets/chains/soneium.svg",
        is_mainnet: true,
        enabled: true,
    },
    ChainConfig {
        id: ChainId::Unichain,
        name: "Unichain",
        native_currency: ETHER,
        rpc_urls: &["https://mainnet.unichain.org"],
        explorer_urls: &["https://uniscan.xyz"],
        checkin_contract: "0xc2e4a6b8d0f2c4e6a8b0d2f4c6e8a0b2d4f6c8e9",
        token_factory: None,
        subgraph_url: "https://api.studio.thegraph.com/query/106565/gm-unichain/version/latest",
        logo: "/assets/chains/unichain.svg",
        is_mainnet: true,
        enabled: true,
    },
];

pub fn find(chain_id: u64) -> Option<&'static ChainConfig> {
    let id = ChainId::try_from(chain_id).ok()?;
    ALL.iter().find(|c| c.id == id)
}

pub fn enabled() -> impl Iterator<Item = &'static ChainConfig> {
    ALL.iter().filter(|c| c.enabled)
}

pub fn is_supported(chain_id: u64) -> bool {
    find(chain_id).is_some_and(|c| c.enabled)
}

pub fn is_referral_chain(chain_id: u64) -> bool {
    chain_id == u64::from(REFERRAL_CHAIN)
}

pub fn referral_chain() -> &'static ChainConfig {
    ALL.iter()
        .find(|c| c.id == REFERRAL_CHAIN)
        .unwrap_or(&ALL[0])
}

/// Payload for `wallet_addEthereumChain` (EIP-3085).
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddChainParams {
    pub chain_id: String,
    pub chain_name: String,
    pub native_currency: NativeCurrency,
    pub rpc_urls: Vec<String>,
    pub block_explorer_urls: Vec<String>,
}

impl From<&ChainConfig> for AddChainParams {
    fn from(chain: &ChainConfig) -> Self {
        Self {
            chain_id: format!("{:#x}", chain.chain_id()),
            chain_name: chain.name.to_string(),
            native_currency: chain.native_currency,
            rpc_urls: chain.rpc_urls.iter().map(|u| u.to_string()).collect(),
            block_explorer_urls: chain.explorer_urls.iter().map(|u| u.to_string()).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::address::Address;

    #[test]
    fn lookup_by_id() {
        assert_eq!(find(8453).map(|c| c.name), Some("Base"));
        assert_eq!(find(42220).map(|c| c.native_currency.symbol), Some("CELO"));
        assert!(find(1).is_none());
        assert!(find(0).is_none());
    }

    #[test]
    fn registry_is_well_formed() {
        let mut ids: Vec<u64> = ALL.iter().map(|c| c.chain_id()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), ALL.len());
        for chain in ALL {
            assert!(!chain.rpc_urls.is_empty(), "{} has no rpc", chain.name);
            assert!(!chain.explorer_urls.is_empty(), "{} has no explorer", chain.name);
            assert!(chain.checkin_contract.parse::<Address>().is_ok(), "{}", chain.name);
            if let Some(factory) = chain.token_factory {
                assert!(factory.parse::<Address>().is_ok(), "{}", chain.name);
            }
        }
        assert!(REFERRAL_CONTRACT.parse::<Address>().is_ok());
    }

    #[test]
    fn only_base_hosts_referrals() {
        assert!(is_referral_chain(8453));
        assert!(!is_referral_chain(10));
        assert_eq!(referral_chain().id, ChainId::Base);
        assert_eq!(ALL.iter().filter(|c| c.hosts_referrals()).count(), 1);
    }

    #[test]
    fn add_chain_params_shape() {
        let params = AddChainParams::from(find(57073).unwrap());
        let json = serde_json::to_value(&params).unwrap();
        assert_eq!(json["chainId"], "0xdef1");
        assert_eq!(json["chainName"], "Ink");
        assert_eq!(json["nativeCurrency"]["symbol"], "ETH");
        assert_eq!(json["rpcUrls"][0], "https://rpc-gel.inkonchain.com");
        assert_eq!(json["blockExplorerUrls"][0], "https://explorer.inkonchain.com");
    }

    #[test]
    fn explorer_links() {
        let base = find(8453).unwrap();
        assert_eq!(base.explorer_tx_url("0xabc"), "https://basescan.org/tx/0xabc");
    }
}
