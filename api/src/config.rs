use std::{str::FromStr, time::Duration};

/// Referral subgraph (Base only).
pub const REFERRAL_SUBGRAPH_URL: &str =
    "https://api.studio.thegraph.com/query/106565/gm-referrals/version/latest";

/// Rows shown on the leaderboard page.
pub const LEADERBOARD_SIZE: usize = 10;

/// Navigators fetched per chain when computing a global rank.
pub const RANKING_PAGE_SIZE: usize = 1000;

pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    pub referral_subgraph_url: String,
    pub leaderboard_size: usize,
    pub ranking_page_size: usize,
    pub request_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            referral_subgraph_url: REFERRAL_SUBGRAPH_URL.to_string(),
            leaderboard_size: LEADERBOARD_SIZE,
            ranking_page_size: RANKING_PAGE_SIZE,
            request_timeout: REQUEST_TIMEOUT,
        }
    }
}

impl Config {
    /// Defaults, overridden by `GM_REFERRAL_SUBGRAPH`, `GM_LEADERBOARD_SIZE`
    /// and `GM_RANKING_PAGE_SIZE` when set. Unparseable values are ignored.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(url) = lookup("GM_REFERRAL_SUBGRAPH").filter(|u| !u.is_empty()) {
            config.referral_subgraph_url = url;
        }
        if let Some(size) = parse_var(&lookup, "GM_LEADERBOARD_SIZE") {
            config.leaderboard_size = size;
        }
        if let Some(size) = parse_var(&lookup, "GM_RANKING_PAGE_SIZE") {
            config.ranking_page_size = size;
        }
        config
    }
}

fn parse_var<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    let raw = lookup(key)?;
    match raw.parse() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!(key, value = %raw, "ignoring unparseable config value");
            None
        }
    }
}
