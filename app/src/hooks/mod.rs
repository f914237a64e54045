mod use_checkin;
mod use_leaderboard;
mod use_referral;
mod use_stats;
mod use_wallet;

pub use use_checkin::{checkin_transaction, register_referral_transaction};
pub use use_leaderboard::use_leaderboard;
pub use use_referral::use_referral;
pub use use_stats::{use_checkin_history, use_global_stats, use_ranking, use_user_stats, CheckinHistory};
pub use use_wallet::{use_wallet, use_wallet_session, WalletAction};
