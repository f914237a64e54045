use dioxus::prelude::*;

use crate::components::Layout;
use crate::pages::{Checkin, Leaderboard, Referrals, Stats};

#[derive(Clone, Routable, Debug, PartialEq)]
#[rustfmt::skip]
pub enum Route {
    #[layout(Layout)]
    #[route("/")]
    Checkin {},
    #[route("/leaderboard")]
    Leaderboard {},
    #[route("/stats")]
    Stats {},
    #[route("/referrals")]
    Referrals {},
}
