use serde::Deserialize;
use thiserror::Error;

/// EIP-1193 error object returned by an injected wallet.
#[derive(Clone, Debug, Deserialize, Error, PartialEq, Eq)]
#[error("{message} (code {code})")]
pub struct ProviderError {
    pub code: i64,
    pub message: String,
}

impl ProviderError {
    pub fn new(code: i64, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum WalletError {
    #[error("No wallet extension detected. Install a browser wallet and refresh.")]
    NoProvider,

    #[error("No accounts authorized by the wallet")]
    NoAccounts,

    #[error("Chain {0} is not supported")]
    UnsupportedChain(u64),

    #[error("Network switch failed: {0}")]
    NetworkSwitch(String),

    #[error("Wallet is not connected")]
    NotConnected,

    #[error("A wallet connection is already in progress")]
    ConnectInFlight,

    #[error("Connection attempt was superseded by a newer one")]
    Superseded,

    #[error("Wallet returned an invalid address: {0}")]
    InvalidAddress(String),

    #[error("Wallet request failed: {0}")]
    Provider(#[from] ProviderError),
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum AddressError {
    #[error("address must start with 0x")]
    MissingPrefix,

    #[error("address must be 20 bytes, got {0}")]
    InvalidLength(usize),

    #[error("address is not valid hex")]
    InvalidHex,
}

/// Failure of a single per-chain (or referral) subgraph/RPC query.
#[derive(Debug, Error)]
pub enum QueryError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("graphql error: {0}")]
    GraphQl(String),

    #[error("rpc error {code}: {message}")]
    Rpc { code: i64, message: String },

    #[error("decode error: {0}")]
    Decode(String),

    #[error("response contained no data")]
    MissingData,

    #[error("chain {0} has no configured endpoint")]
    UnknownChain(u64),
}

#[derive(Debug, Error)]
pub enum ReferralLookupError {
    #[error("chain {0} does not host the referral contract")]
    NotReferralChain(u64),

    #[error(transparent)]
    Query(#[from] QueryError),
}
