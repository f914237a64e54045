pub mod address;
pub mod chains;
pub mod config;
pub mod contracts;
pub mod error;
pub mod provider;
pub mod referral;
pub mod rpc;
pub mod state;
pub mod storage;
pub mod subgraph;
pub mod wallet;

#[cfg(test)]
pub(crate) mod mock;

pub mod prelude {
    pub use crate::address::*;
    pub use crate::chains::{self, AddChainParams, ChainConfig, ChainId};
    pub use crate::config::*;
    pub use crate::contracts::*;
    pub use crate::error::*;
    pub use crate::provider::*;
    pub use crate::referral::*;
    pub use crate::rpc::*;
    pub use crate::state::*;
    pub use crate::storage::*;
    pub use crate::subgraph::{
        settle_all, Aggregator, ChainOutcome, GraphqlSource, StatsSource,
    };
    pub use crate::wallet::*;
}
