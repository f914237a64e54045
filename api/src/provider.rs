//! Capability interface over an injected EIP-1193 wallet.

use crate::{
    chains::AddChainParams,
    contracts::TransactionRequest,
    error::ProviderError,
};

/// `wallet_switchEthereumChain` error when the wallet does not know the chain.
pub const UNRECOGNIZED_CHAIN_CODE: i64 = 4902;

/// The user rejected the request in the wallet UI.
pub const USER_REJECTED_CODE: i64 = 4001;

/// Notifications pushed by the wallet.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum WalletEvent {
    AccountsChanged(Vec<String>),
    ChainChanged(u64),
}

pub type EventHandler = Box<dyn Fn(WalletEvent)>;

/// Live event subscription. Dropping it unsubscribes.
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    pub fn new(cancel: impl FnOnce() + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    /// A subscription with nothing to cancel, for providers without events.
    pub fn noop() -> Self {
        Self { cancel: None }
    }

    pub fn unsubscribe(mut self) {
        self.cancel_now();
    }

    fn cancel_now(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.cancel_now();
    }
}

/// The operations the client needs from a browser wallet. Requests follow the
/// EIP-1193 convention: a value on success, a [`ProviderError`] with a numeric
/// code on failure.
#[allow(async_fn_in_trait)]
pub trait WalletProvider {
    /// `eth_accounts`: accounts already authorized for this site, no prompt.
    async fn get_accounts(&self) -> Result<Vec<String>, ProviderError>;

    /// `eth_requestAccounts`: prompts the user.
    async fn request_accounts(&self) -> Result<Vec<String>, ProviderError>;

    /// `eth_chainId`.
    async fn chain_id(&self) -> Result<u64, ProviderError>;

    /// `wallet_switchEthereumChain`.
    async fn switch_chain(&self, chain_id: u64) -> Result<(), ProviderError>;

    /// `wallet_addEthereumChain`.
    async fn add_chain(&self, params: &AddChainParams) -> Result<(), ProviderError>;

    /// `eth_sendTransaction`, returning the transaction hash.
    async fn send_transaction(&self, tx: &TransactionRequest) -> Result<String, ProviderError>;

    /// Registers for `accountsChanged` and `chainChanged`.
    fn subscribe(&self, handler: EventHandler) -> Subscription;
}

impl<T: WalletProvider + ?Sized> WalletProvider for std::rc::Rc<T> {
    async fn get_accounts(&self) -> Result<Vec<String>, ProviderError> {
        (**self).get_accounts().await
    }

    async fn request_accounts(&self) -> Result<Vec<String>, ProviderError> {
        (**self).request_accounts().await
    }

    async fn chain_id(&self) -> Result<u64, ProviderError> {
        (**self).chain_id().await
    }

    async fn switch_chain(&self, chain_id: u64) -> Result<(), ProviderError> {
        (**self).switch_chain(chain_id).await
    }

    async fn add_chain(&self, params: &AddChainParams) -> Result<(), ProviderError> {
        (**self).add_chain(params).await
    }

    async fn send_transaction(&self, tx: &TransactionRequest) -> Result<String, ProviderError> {
        (**self).send_transaction(tx).await
    }

    fn subscribe(&self, handler: EventHandler) -> Subscription {
        (**self).subscribe(handler)
    }
}

/// Parses a chain id as wallets report it: `0x` hex or decimal.
pub fn parse_chain_id(raw: &str) -> Option<u64> {
    let raw = raw.trim();
    match raw.strip_prefix("0x").or_else(|| raw.strip_prefix("0X")) {
        Some(hex) => u64::from_str_radix(hex, 16).ok(),
        None => raw.parse().ok(),
    }
}
