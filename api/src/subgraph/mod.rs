//! Per-chain check-in subgraphs and the cross-chain views built on them.

mod aggregate;
mod graphql;
pub mod queries;

use std::future::Future;

use futures::future::join_all;

pub use aggregate::*;
pub use graphql::*;

use crate::{
    address::Address,
    chains::ChainConfig,
    error::QueryError,
    state::{ChainGlobalStats, CheckinRecord, DailyStats, NavigatorStats},
};

/// Read access to one chain's check-in index.
#[allow(async_fn_in_trait)]
pub trait StatsSource {
    /// `None` when the address never checked in on this chain.
    async fn navigator(
        &self,
        chain: &ChainConfig,
        address: Address,
    ) -> Result<Option<NavigatorStats>, QueryError>;

    async fn global_stats(&self, chain: &ChainConfig) -> Result<ChainGlobalStats, QueryError>;

    /// Top `first` navigators by total check-ins.
    async fn leaderboard(
        &self,
        chain: &ChainConfig,
        first: usize,
    ) -> Result<Vec<NavigatorStats>, QueryError>;

    async fn user_checkins(
        &self,
        chain: &ChainConfig,
        address: Address,
        first: usize,
    ) -> Result<Vec<CheckinRecord>, QueryError>;

    async fn daily_stats(&self, chain: &ChainConfig, days: usize)
        -> Result<Vec<DailyStats>, QueryError>;
}

/// How one chain's query settled.
#[derive(Debug)]
pub struct ChainOutcome<T> {
    pub chain_id: u64,
    pub result: Result<T, QueryError>,
}

impl<T> ChainOutcome<T> {
    /// The value, or `None` after logging the failure.
    pub fn ok(self) -> Option<T> {
        match self.result {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(chain_id = self.chain_id, "subgraph query failed: {}", e);
                None
            }
        }
    }
}

/// Runs `query` against every chain concurrently and waits for all of them.
/// A failing chain never short-circuits the others.
pub async fn settle_all<T, F, Fut>(
    chains: &[&'static ChainConfig],
    query: F,
) -> Vec<ChainOutcome<T>>
where
    F: Fn(&'static ChainConfig) -> Fut,
    Fut: Future<Output = Result<T, QueryError>>,
{
    join_all(chains.iter().map(|&chain| {
        let pending = query(chain);
        async move {
            ChainOutcome {
                chain_id: chain.chain_id(),
                result: pending.await,
            }
        }
    }))
    .await
}
