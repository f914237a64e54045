use serde::{Deserialize, Serialize};

use crate::address::Address;

/// A navigator (tracked user) on one chain, as indexed by that chain's subgraph.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigatorStats {
    pub address: Address,
    pub total_checkins: u64,
    pub current_streak: u32,
    pub max_streak: u32,
    /// Check-in fees paid, in wei.
    pub total_tax_paid: u128,
    pub first_checkin_at: u64,
    pub last_checkin_at: u64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainNavigatorStats {
    pub chain_id: u64,
    pub stats: NavigatorStats,
}

/// One address's stats summed across every chain that answered.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregatedUserStats {
    pub total_checkins: u64,
    pub max_streak: u32,
    /// Streak on the chain with the most recent check-in.
    pub current_streak: u32,
    pub total_tax_paid: u128,
    pub last_checkin_at: u64,
    /// Chains with at least one check-in, in registry order.
    pub chains: Vec<u64>,
    pub per_chain: Vec<ChainNavigatorStats>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainGlobalStats {
    pub chain_id: u64,
    pub total_navigators: u64,
    pub total_checkins: u64,
    pub total_tax_collected: u128,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalStats {
    pub total_navigators: u64,
    pub total_checkins: u64,
    pub total_tax_collected: u128,
    pub per_chain: Vec<ChainGlobalStats>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    /// 1-based.
    pub rank: usize,
    pub address: Address,
    pub total_checkins: u64,
    pub max_streak: u32,
    pub chains: Vec<u64>,
}

/// `rank == 0` means the address has no check-ins anywhere.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRanking {
    pub rank: usize,
    pub total_users: usize,
}

impl UserRanking {
    pub fn is_ranked(&self) -> bool {
        self.rank > 0
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckinRecord {
    pub chain_id: u64,
    pub id: String,
    pub timestamp: u64,
    pub block_number: u64,
    pub transaction_hash: String,
    pub streak: u32,
    pub tax_paid: u128,
}

/// Activity for one UTC day (`day` is days since the unix epoch).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyStats {
    pub day: u64,
    pub checkins: u64,
    pub unique_navigators: u64,
    pub tax_collected: u128,
}
