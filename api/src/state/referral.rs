use serde::{Deserialize, Serialize};

use crate::address::Address;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferrerInfo {
    pub address: Address,
    pub total_referrals: u64,
    /// Rewards earned from referrals, in wei.
    pub total_rewards: u128,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferralStats {
    pub total_referrals: u64,
    pub total_referrers: u64,
    pub total_rewards_paid: u128,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferralRecord {
    pub id: String,
    pub referrer: Address,
    pub referee: Address,
    pub timestamp: u64,
    pub transaction_hash: String,
}
