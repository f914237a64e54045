//! Read path over the referral subgraph. Referrals live on a single chain, so
//! nothing here fans out.

use serde::Deserialize;
use serde_json::json;

use crate::{
    address::Address,
    config::Config,
    error::QueryError,
    state::{ReferralRecord, ReferralStats, ReferrerInfo},
    subgraph::{flexible, post_query, queries},
};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawReferrer {
    id: Address,
    #[serde(deserialize_with = "flexible")]
    total_referrals: u64,
    #[serde(deserialize_with = "flexible")]
    total_rewards: u128,
}

impl From<RawReferrer> for ReferrerInfo {
    fn from(raw: RawReferrer) -> Self {
        Self {
            address: raw.id,
            total_referrals: raw.total_referrals,
            total_rewards: raw.total_rewards,
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawReferralStats {
    #[serde(deserialize_with = "flexible")]
    total_referrals: u64,
    #[serde(deserialize_with = "flexible")]
    total_referrers: u64,
    #[serde(deserialize_with = "flexible")]
    total_rewards_paid: u128,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawReferral {
    id: String,
    referrer: Address,
    referee: Address,
    #[serde(deserialize_with = "flexible")]
    timestamp: u64,
    transaction_hash: String,
}

#[derive(Deserialize)]
struct ReferrerData {
    referrer: Option<RawReferrer>,
}

#[derive(Deserialize)]
struct IdOnly {
    id: Address,
}

#[derive(Deserialize)]
struct UserNode {
    referrer: Option<IdOnly>,
}

#[derive(Deserialize)]
struct UserData {
    user: Option<UserNode>,
}

#[derive(Deserialize)]
struct ReferrersData {
    referrers: Vec<RawReferrer>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReferralStatsData {
    referral_stats: Option<RawReferralStats>,
}

#[derive(Deserialize)]
struct ReferralsData {
    referrals: Vec<RawReferral>,
}

#[derive(Clone)]
pub struct ReferralService {
    client: reqwest::Client,
    url: String,
}

impl ReferralService {
    pub fn new(client: reqwest::Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }

    pub fn from_config(client: reqwest::Client, config: &Config) -> Self {
        Self::new(client, config.referral_subgraph_url.clone())
    }

    /// `None` when `address` never referred anyone.
    pub async fn referrer_info(&self, address: Address) -> Result<Option<ReferrerInfo>, QueryError> {
        let data: ReferrerData = post_query(
            &self.client,
            &self.url,
            queries::REFERRER_INFO,
            json!({ "id": address.to_hex() }),
        )
        .await?;
        Ok(data.referrer.map(ReferrerInfo::from))
    }

    /// Who referred `address`, as indexed.
    pub async fn user_referrer(&self, address: Address) -> Result<Option<Address>, QueryError> {
        let data: UserData = post_query(
            &self.client,
            &self.url,
            queries::USER_REFERRER,
            json!({ "id": address.to_hex() }),
        )
        .await?;
        Ok(data.user.and_then(|u| u.referrer).map(|r| r.id))
    }

    pub async fn top_referrers(&self, first: usize) -> Result<Vec<ReferrerInfo>, QueryError> {
        let data: ReferrersData = post_query(
            &self.client,
            &self.url,
            queries::TOP_REFERRERS,
            json!({ "first": first }),
        )
        .await?;
        Ok(data.referrers.into_iter().map(ReferrerInfo::from).collect())
    }

    /// Program-wide totals. Zero before the first referral is indexed.
    pub async fn referral_stats(&self) -> Result<ReferralStats, QueryError> {
        let data: ReferralStatsData =
            post_query(&self.client, &self.url, queries::REFERRAL_STATS, json!({})).await?;
        Ok(data
            .referral_stats
            .map(|s| ReferralStats {
                total_referrals: s.total_referrals,
                total_referrers: s.total_referrers,
                total_rewards_paid: s.total_rewards_paid,
            })
            .unwrap_or_default())
    }

    pub async fn recent_referrals(&self, first: usize) -> Result<Vec<ReferralRecord>, QueryError> {
        let data: ReferralsData = post_query(
            &self.client,
            &self.url,
            queries::RECENT_REFERRALS,
            json!({ "first": first }),
        )
        .await?;
        Ok(data
            .referrals
            .into_iter()
            .map(|r| ReferralRecord {
                id: r.id,
                referrer: r.referrer,
                referee: r.referee,
                timestamp: r.timestamp,
                transaction_hash: r.transaction_hash,
            })
            .collect())
    }
}
