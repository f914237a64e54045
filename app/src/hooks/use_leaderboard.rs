use dioxus::prelude::*;
use gm_api::prelude::*;

use crate::Services;

#[derive(Clone, Default)]
pub struct LeaderboardState {
    pub entries: Vec<LeaderboardEntry>,
    pub loading: bool,
}

pub fn use_leaderboard() -> Signal<LeaderboardState> {
    let services = use_context::<Services>();
    let mut state = use_signal(|| LeaderboardState {
        loading: true,
        ..LeaderboardState::default()
    });

    let _resource = use_resource(move || {
        let aggregator = services.aggregator.clone();
        let limit = services.config.leaderboard_size;
        async move {
            let entries = aggregator.top_leaderboard_all_chains(limit).await;
            let mut s = state.write();
            s.entries = entries;
            s.loading = false;
        }
    });

    state
}
