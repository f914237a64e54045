mod checkin;
mod leaderboard;
mod referrals;
mod stats;

pub use checkin::Checkin;
pub use leaderboard::Leaderboard;
pub use referrals::Referrals;
pub use stats::Stats;
