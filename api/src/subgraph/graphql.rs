use std::{fmt::Display, str::FromStr};

use serde::{
    de::{DeserializeOwned, IgnoredAny},
    Deserialize, Deserializer, Serialize,
};
use serde_json::{json, Value};

use super::{queries, StatsSource};
use crate::{
    address::Address,
    chains::ChainConfig,
    error::QueryError,
    state::{ChainGlobalStats, CheckinRecord, DailyStats, NavigatorStats, UserRanking},
};

#[derive(Serialize)]
struct GraphQlQuery<'a> {
    query: &'a str,
    variables: Value,
}

#[derive(Deserialize)]
struct GraphQlResponse<T> {
    data: Option<T>,
    errors: Option<Vec<GraphQlError>>,
}

#[derive(Deserialize)]
struct GraphQlError {
    message: String,
}

/// Posts `query` to a subgraph endpoint and decodes `data`.
pub async fn post_query<T: DeserializeOwned>(
    client: &reqwest::Client,
    url: &str,
    query: &str,
    variables: Value,
) -> Result<T, QueryError> {
    let response = client
        .post(url)
        .json(&GraphQlQuery { query, variables })
        .send()
        .await?
        .error_for_status()?;

    let body: GraphQlResponse<T> = response.json().await?;

    if let Some(errors) = body.errors.filter(|e| !e.is_empty()) {
        let message = errors
            .into_iter()
            .map(|e| e.message)
            .collect::<Vec<_>>()
            .join("; ");
        return Err(QueryError::GraphQl(message));
    }

    body.data.ok_or(QueryError::MissingData)
}

/// Subgraphs encode `BigInt` as strings and `Int` as numbers; accept both.
pub(crate) fn flexible<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: Display,
{
    let raw = match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        Value::Null => "0".to_string(),
        other => {
            return Err(serde::de::Error::custom(format!(
                "expected a number, got {other}"
            )))
        }
    };
    raw.parse().map_err(serde::de::Error::custom)
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawNavigator {
    id: Address,
    #[serde(deserialize_with = "flexible")]
    total_checkins: u64,
    #[serde(deserialize_with = "flexible")]
    current_streak: u32,
    #[serde(deserialize_with = "flexible")]
    max_streak: u32,
    #[serde(deserialize_with = "flexible")]
    total_tax_paid: u128,
    #[serde(deserialize_with = "flexible")]
    first_checkin_timestamp: u64,
    #[serde(deserialize_with = "flexible")]
    last_checkin_timestamp: u64,
}

impl From<RawNavigator> for NavigatorStats {
    fn from(raw: RawNavigator) -> Self {
        Self {
            address: raw.id,
            total_checkins: raw.total_checkins,
            current_streak: raw.current_streak,
            max_streak: raw.max_streak,
            total_tax_paid: raw.total_tax_paid,
            first_checkin_at: raw.first_checkin_timestamp,
            last_checkin_at: raw.last_checkin_timestamp,
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawGlobalStats {
    #[serde(deserialize_with = "flexible")]
    total_navigators: u64,
    #[serde(deserialize_with = "flexible")]
    total_checkins: u64,
    #[serde(deserialize_with = "flexible")]
    total_tax_collected: u128,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawCheckin {
    id: String,
    #[serde(deserialize_with = "flexible")]
    timestamp: u64,
    #[serde(deserialize_with = "flexible")]
    block_number: u64,
    transaction_hash: String,
    #[serde(deserialize_with = "flexible")]
    streak: u32,
    #[serde(deserialize_with = "flexible")]
    tax_paid: u128,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawDailyStats {
    #[serde(deserialize_with = "flexible")]
    day: u64,
    #[serde(deserialize_with = "flexible")]
    checkins: u64,
    #[serde(deserialize_with = "flexible")]
    unique_navigators: u64,
    #[serde(deserialize_with = "flexible")]
    tax_collected: u128,
}

#[derive(Deserialize)]
struct NavigatorData {
    navigator: Option<RawNavigator>,
}

#[derive(Deserialize)]
struct NavigatorsData {
    navigators: Vec<RawNavigator>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GlobalStatsData {
    global_stats: Option<RawGlobalStats>,
}

#[derive(Deserialize)]
struct CheckinsData {
    checkins: Vec<RawCheckin>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct DailyStatsData {
    daily_stats: Vec<RawDailyStats>,
}

#[derive(Deserialize)]
struct TotalOnly {
    #[serde(rename = "totalCheckins", deserialize_with = "flexible")]
    total_checkins: u64,
}

#[derive(Deserialize)]
struct NavigatorCount {
    #[serde(rename = "totalNavigators", deserialize_with = "flexible")]
    total_navigators: u64,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RankingData {
    navigator: Option<TotalOnly>,
    ahead: Vec<IgnoredAny>,
    global_stats: Option<NavigatorCount>,
}

/// [`StatsSource`] backed by each chain's check-in subgraph.
#[derive(Clone, Default)]
pub struct GraphqlSource {
    client: reqwest::Client,
}

impl GraphqlSource {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// Rank of `address` on a single chain, from the chain's own index.
    pub async fn chain_rank(
        &self,
        chain: &ChainConfig,
        address: Address,
    ) -> Result<UserRanking, QueryError> {
        let Some(navigator) = self.navigator(chain, address).await? else {
            let global = self.global_stats(chain).await?;
            return Ok(UserRanking {
                rank: 0,
                total_users: global.total_navigators as usize,
            });
        };
        let data: RankingData = post_query(
            &self.client,
            chain.subgraph_url,
            queries::USER_RANKING,
            json!({ "id": address.to_hex(), "total": navigator.total_checkins.to_string() }),
        )
        .await?;
        Ok(UserRanking::from(data))
    }
}

impl From<RankingData> for UserRanking {
    fn from(data: RankingData) -> Self {
        let total_users = data
            .global_stats
            .map(|g| g.total_navigators as usize)
            .unwrap_or_default();
        match data.navigator {
            Some(n) if n.total_checkins > 0 => UserRanking {
                rank: data.ahead.len() + 1,
                total_users,
            },
            _ => UserRanking {
                rank: 0,
                total_users,
            },
        }
    }
}

impl StatsSource for GraphqlSource {
    async fn navigator(
        &self,
        chain: &ChainConfig,
        address: Address,
    ) -> Result<Option<NavigatorStats>, QueryError> {
        let data: NavigatorData = post_query(
            &self.client,
            chain.subgraph_url,
            queries::USER_STATS,
            json!({ "id": address.to_hex() }),
        )
        .await?;
        Ok(data.navigator.map(NavigatorStats::from))
    }

    async fn global_stats(&self, chain: &ChainConfig) -> Result<ChainGlobalStats, QueryError> {
        let data: GlobalStatsData =
            post_query(&self.client, chain.subgraph_url, queries::GLOBAL_STATS, json!({})).await?;
        let stats = data.global_stats.ok_or(QueryError::MissingData)?;
        Ok(ChainGlobalStats {
            chain_id: chain.chain_id(),
            total_navigators: stats.total_navigators,
            total_checkins: stats.total_checkins,
            total_tax_collected: stats.total_tax_collected,
        })
    }

    async fn leaderboard(
        &self,
        chain: &ChainConfig,
        first: usize,
    ) -> Result<Vec<NavigatorStats>, QueryError> {
        let data: NavigatorsData = post_query(
            &self.client,
            chain.subgraph_url,
            queries::LEADERBOARD,
            json!({ "first": first }),
        )
        .await?;
        Ok(data.navigators.into_iter().map(NavigatorStats::from).collect())
    }

    async fn user_checkins(
        &self,
        chain: &ChainConfig,
        address: Address,
        first: usize,
    ) -> Result<Vec<CheckinRecord>, QueryError> {
        let data: CheckinsData = post_query(
            &self.client,
            chain.subgraph_url,
            queries::USER_CHECKINS,
            json!({ "navigator": address.to_hex(), "first": first }),
        )
        .await?;
        let chain_id = chain.chain_id();
        Ok(data
            .checkins
            .into_iter()
            .map(|c| CheckinRecord {
                chain_id,
                id: c.id,
                timestamp: c.timestamp,
                block_number: c.block_number,
                transaction_hash: c.transaction_hash,
                streak: c.streak,
                tax_paid: c.tax_paid,
            })
            .collect())
    }

    async fn daily_stats(
        &self,
        chain: &ChainConfig,
        days: usize,
    ) -> Result<Vec<DailyStats>, QueryError> {
        let data: DailyStatsData = post_query(
            &self.client,
            chain.subgraph_url,
            queries::DAILY_STATS,
            json!({ "first": days }),
        )
        .await?;
        Ok(data
            .daily_stats
            .into_iter()
            .map(|d| DailyStats {
                day: d.day,
                checkins: d.checkins,
                unique_navigators: d.unique_navigators,
                tax_collected: d.tax_collected,
            })
            .collect())
    }
}
