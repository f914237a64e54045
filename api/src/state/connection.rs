use crate::{address::Address, chains, contracts::BoundContracts};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConnectionStatus {
    Disconnected,
    Connecting,
    Connected,
}

/// Referral facts for the connected address on the active chain.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ReferralStatus {
    /// The active chain hosts the referral contract.
    pub on_referral_chain: bool,

    /// The connected address already registered a referrer.
    pub has_referrer: bool,

    pub referrer: Option<Address>,
}

/// Everything the UI knows about the wallet session.
///
/// `address` is `Some` exactly when `connected` is true. During a reconnect
/// (chain or account switch) `connected` stays true and `loading` is set.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WalletConnectionState {
    pub connected: bool,
    pub address: Option<Address>,
    pub chain_id: Option<u64>,
    pub loading: bool,
    pub error: Option<String>,
    pub contracts: BoundContracts,
    pub referral: ReferralStatus,
}

impl WalletConnectionState {
    pub fn status(&self) -> ConnectionStatus {
        if self.loading {
            ConnectionStatus::Connecting
        } else if self.connected {
            ConnectionStatus::Connected
        } else {
            ConnectionStatus::Disconnected
        }
    }

    /// The wallet is on a chain from the registry.
    pub fn on_supported_chain(&self) -> bool {
        self.chain_id.is_some_and(chains::is_supported)
    }

    pub fn chain(&self) -> Option<&'static chains::ChainConfig> {
        self.chain_id.and_then(chains::find)
    }
}
