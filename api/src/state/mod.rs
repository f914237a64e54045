mod connection;
mod referral;
mod stats;

pub use connection::*;
pub use referral::*;
pub use stats::*;
