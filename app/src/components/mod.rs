mod layout;
mod network_selector;
mod user_stats;
mod wallet_button;

pub use layout::Layout;
pub use network_selector::NetworkSelector;
pub use user_stats::{StatRow, UserStats};
pub use wallet_button::WalletButton;
