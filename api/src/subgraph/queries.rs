pub const GLOBAL_STATS: &str = r#"
query GlobalStats {
  globalStats(id: "global") {
    totalNavigators
    totalCheckins
    totalTaxCollected
  }
}"#;

pub const LEADERBOARD: &str = r#"
query Leaderboard($first: Int!) {
  navigators(first: $first, orderBy: totalCheckins, orderDirection: desc) {
    id
    totalCheckins
    currentStreak
    maxStreak
    totalTaxPaid
    firstCheckinTimestamp
    lastCheckinTimestamp
  }
}"#;

pub const USER_STATS: &str = r#"
query UserStats($id: ID!) {
  navigator(id: $id) {
    id
    totalCheckins
    currentStreak
    maxStreak
    totalTaxPaid
    firstCheckinTimestamp
    lastCheckinTimestamp
  }
}"#;

pub const USER_CHECKINS: &str = r#"
query UserCheckins($navigator: String!, $first: Int!) {
  checkins(
    where: { navigator: $navigator }
    first: $first
    orderBy: timestamp
    orderDirection: desc
  ) {
    id
    timestamp
    blockNumber
    transactionHash
    streak
    taxPaid
  }
}"#;

pub const DAILY_STATS: &str = r#"
query DailyStats($first: Int!) {
  dailyStats(first: $first, orderBy: day, orderDirection: desc) {
    day
    checkins
    uniqueNavigators
    taxCollected
  }
}"#;

pub const USER_RANKING: &str = r#"
query UserRanking($id: ID!, $total: BigInt!) {
  navigator(id: $id) {
    totalCheckins
  }
  ahead: navigators(first: 1000, where: { totalCheckins_gt: $total }) {
    id
  }
  globalStats(id: "global") {
    totalNavigators
  }
}"#;

pub const REFERRER_INFO: &str = r#"
query ReferrerInfo($id: ID!) {
  referrer(id: $id) {
    id
    totalReferrals
    totalRewards
  }
}"#;

pub const USER_REFERRER: &str = r#"
query UserReferrer($id: ID!) {
  user(id: $id) {
    referrer {
      id
    }
  }
}"#;

pub const TOP_REFERRERS: &str = r#"
query TopReferrers($first: Int!) {
  referrers(first: $first, orderBy: totalReferrals, orderDirection: desc) {
    id
    totalReferrals
    totalRewards
  }
}"#;

pub const REFERRAL_STATS: &str = r#"
query ReferralStats {
  referralStats(id: "global") {
    totalReferrals
    totalReferrers
    totalRewardsPaid
  }
}"#;

pub const RECENT_REFERRALS: &str = r#"
query RecentReferrals($first: Int!) {
  referrals(first: $first, orderBy: timestamp, orderDirection: desc) {
    id
    referrer
    referee
    timestamp
    transactionHash
  }
}"#;
