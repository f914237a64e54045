use std::collections::{BTreeMap, HashMap};

use futures::future::join;

use super::{settle_all, ChainOutcome, StatsSource};
use crate::{
    address::Address,
    chains::{self, ChainConfig},
    config::RANKING_PAGE_SIZE,
    state::{
        AggregatedUserStats, ChainNavigatorStats, CheckinRecord, DailyStats, GlobalStats,
        LeaderboardEntry, NavigatorStats, UserRanking,
    },
};

/// Cross-chain views over independent per-chain subgraphs.
///
/// Chains are queried concurrently and are not snapshot-consistent with each
/// other. A chain whose query fails contributes nothing; when every chain
/// fails the result is the empty/zero value. None of these calls fail.
pub struct Aggregator<S> {
    source: S,
    chains: Vec<&'static ChainConfig>,
    ranking_page_size: usize,
}

impl<S: StatsSource> Aggregator<S> {
    /// Aggregates over every enabled chain in the registry.
    pub fn new(source: S) -> Self {
        Self::with_chains(source, chains::enabled().collect())
    }

    pub fn with_chains(source: S, chains: Vec<&'static ChainConfig>) -> Self {
        Self {
            source,
            chains,
            ranking_page_size: RANKING_PAGE_SIZE,
        }
    }

    pub fn ranking_page_size(mut self, size: usize) -> Self {
        self.ranking_page_size = size;
        self
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn chains(&self) -> &[&'static ChainConfig] {
        &self.chains
    }

    pub async fn user_stats_all_chains(&self, address: Address) -> AggregatedUserStats {
        let outcomes = settle_all(&self.chains, |chain| self.source.navigator(chain, address)).await;
        combine_user_stats(outcomes)
    }

    pub async fn global_stats_all_chains(&self) -> GlobalStats {
        let outcomes = settle_all(&self.chains, |chain| self.source.global_stats(chain)).await;
        let mut global = GlobalStats::default();
        for stats in outcomes.into_iter().filter_map(ChainOutcome::ok) {
            global.total_navigators += stats.total_navigators;
            global.total_checkins += stats.total_checkins;
            global.total_tax_collected += stats.total_tax_collected;
            global.per_chain.push(stats);
        }
        global
    }

    /// Merged top `limit` across chains. Each chain contributes its own top
    /// `limit`, so an address just outside every chain's page can be missed.
    pub async fn top_leaderboard_all_chains(&self, limit: usize) -> Vec<LeaderboardEntry> {
        let outcomes = settle_all(&self.chains, |chain| self.source.leaderboard(chain, limit)).await;
        let mut entries = merge_leaderboards(flatten(outcomes));
        entries.truncate(limit);
        entries
    }

    /// 1-based rank of `address` within the merged leaderboard. The address's
    /// own totals are read directly so its row is exact even when it falls
    /// outside a chain's leaderboard page.
    pub async fn user_ranking_all_chains(&self, address: Address) -> UserRanking {
        let (pages, own) = join(
            settle_all(&self.chains, |chain| {
                self.source.leaderboard(chain, self.ranking_page_size)
            }),
            settle_all(&self.chains, |chain| self.source.navigator(chain, address)),
        )
        .await;

        let own = own.into_iter().filter_map(|outcome| {
            let chain_id = outcome.chain_id;
            outcome.ok().flatten().map(|stats| (chain_id, stats))
        });
        let entries = merge_leaderboards(flatten(pages).chain(own));
        rank_of(&entries, address)
    }

    /// Most recent check-ins across chains, newest first.
    pub async fn user_checkins_all_chains(
        &self,
        address: Address,
        first: usize,
    ) -> Vec<CheckinRecord> {
        let outcomes =
            settle_all(&self.chains, |chain| self.source.user_checkins(chain, address, first))
                .await;
        let mut records: Vec<CheckinRecord> = outcomes
            .into_iter()
            .filter_map(ChainOutcome::ok)
            .flatten()
            .collect();
        records.sort_by(|a, b| {
            b.timestamp
                .cmp(&a.timestamp)
                .then_with(|| a.chain_id.cmp(&b.chain_id))
        });
        records.truncate(first);
        records
    }

    /// Per-day totals across chains for the last `days` indexed days, oldest
    /// first. `unique_navigators` is summed per chain, so an address active
    /// on two chains the same day counts twice.
    pub async fn daily_stats_all_chains(&self, days: usize) -> Vec<DailyStats> {
        let outcomes = settle_all(&self.chains, |chain| self.source.daily_stats(chain, days)).await;
        let mut by_day: BTreeMap<u64, DailyStats> = BTreeMap::new();
        for day in outcomes.into_iter().filter_map(ChainOutcome::ok).flatten() {
            let merged = by_day.entry(day.day).or_insert_with(|| DailyStats {
                day: day.day,
                ..DailyStats::default()
            });
            merged.checkins += day.checkins;
            merged.unique_navigators += day.unique_navigators;
            merged.tax_collected += day.tax_collected;
        }
        let skip = by_day.len().saturating_sub(days);
        by_day.into_values().skip(skip).collect()
    }
}

fn flatten(
    outcomes: Vec<ChainOutcome<Vec<NavigatorStats>>>,
) -> impl Iterator<Item = (u64, NavigatorStats)> {
    outcomes.into_iter().flat_map(|outcome| {
        let chain_id = outcome.chain_id;
        outcome
            .ok()
            .unwrap_or_default()
            .into_iter()
            .map(move |stats| (chain_id, stats))
    })
}

/// Folds per-chain navigator snapshots for one address into a single view.
///
/// `current_streak` comes from the chain with the most recent check-in; the
/// streak counters on chains the user has not touched lately are stale.
pub fn combine_user_stats(
    outcomes: Vec<ChainOutcome<Option<NavigatorStats>>>,
) -> AggregatedUserStats {
    let mut combined = AggregatedUserStats::default();
    for outcome in outcomes {
        let chain_id = outcome.chain_id;
        let Some(stats) = outcome.ok().flatten() else {
            continue;
        };
        if stats.total_checkins == 0 {
            continue;
        }

        combined.total_checkins += stats.total_checkins;
        combined.total_tax_paid += stats.total_tax_paid;
        combined.max_streak = combined.max_streak.max(stats.max_streak);

        let fresher = stats.last_checkin_at > combined.last_checkin_at
            || (stats.last_checkin_at == combined.last_checkin_at
                && stats.current_streak > combined.current_streak);
        if fresher || combined.chains.is_empty() {
            combined.last_checkin_at = stats.last_checkin_at;
            combined.current_streak = stats.current_streak;
        }

        combined.chains.push(chain_id);
        combined.per_chain.push(ChainNavigatorStats { chain_id, stats });
    }
    combined
}

#[derive(Default)]
struct MergedRow {
    total_checkins: u64,
    max_streak: u32,
    chains: Vec<u64>,
}

/// Merges `(chain, navigator)` rows into one row per address.
///
/// Rows for the same (address, chain) pair replace each other, the last one
/// winning. Addresses without check-ins are dropped. Ordering is total
/// check-ins descending, ties broken by ascending address.
pub fn merge_leaderboards(
    rows: impl IntoIterator<Item = (u64, NavigatorStats)>,
) -> Vec<LeaderboardEntry> {
    let mut per_chain: HashMap<(Address, u64), NavigatorStats> = HashMap::new();
    for (chain_id, stats) in rows {
        per_chain.insert((stats.address, chain_id), stats);
    }

    let mut by_address: HashMap<Address, MergedRow> = HashMap::new();
    for ((address, chain_id), stats) in per_chain {
        if stats.total_checkins == 0 {
            continue;
        }
        let row = by_address.entry(address).or_default();
        row.total_checkins += stats.total_checkins;
        row.max_streak = row.max_streak.max(stats.max_streak);
        row.chains.push(chain_id);
    }

    let mut entries: Vec<LeaderboardEntry> = by_address
        .into_iter()
        .map(|(address, mut row)| {
            row.chains.sort_unstable();
            LeaderboardEntry {
                rank: 0,
                address,
                total_checkins: row.total_checkins,
                max_streak: row.max_streak,
                chains: row.chains,
            }
        })
        .collect();

    entries.sort_by(|a, b| {
        b.total_checkins
            .cmp(&a.total_checkins)
            .then_with(|| a.address.cmp(&b.address))
    });
    for (i, entry) in entries.iter_mut().enumerate() {
        entry.rank = i + 1;
    }
    entries
}

/// `rank` is 0 when `address` is absent; `total_users` always counts every
/// address with at least one check-in.
pub fn rank_of(entries: &[LeaderboardEntry], address: Address) -> UserRanking {
    UserRanking {
        rank: entries
            .iter()
            .find(|e| e.address == address)
            .map(|e| e.rank)
            .unwrap_or(0),
        total_users: entries.len(),
    }
}
