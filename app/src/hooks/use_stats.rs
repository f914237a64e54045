use dioxus::prelude::*;
use gm_api::prelude::*;

use crate::Services;

const GLOBAL_POLL_MS: u32 = 30_000;
const HISTORY_SIZE: usize = 20;
const HEATMAP_DAYS: usize = 90;

fn use_connected_address() -> Memo<Option<Address>> {
    let wallet = use_context::<Signal<WalletConnectionState>>();
    use_memo(move || {
        let wallet = wallet.read();
        wallet.address.filter(|_| wallet.connected)
    })
}

/// Cross-chain totals for the connected address. `None` while disconnected.
pub fn use_user_stats() -> Resource<Option<AggregatedUserStats>> {
    let services = use_context::<Services>();
    let address = use_connected_address();

    use_resource(move || {
        let aggregator = services.aggregator.clone();
        async move {
            let address = address()?;
            Some(aggregator.user_stats_all_chains(address).await)
        }
    })
}

pub fn use_ranking() -> Resource<Option<UserRanking>> {
    let services = use_context::<Services>();
    let address = use_connected_address();

    use_resource(move || {
        let aggregator = services.aggregator.clone();
        async move {
            let address = address()?;
            Some(aggregator.user_ranking_all_chains(address).await)
        }
    })
}

#[derive(Clone, Default, PartialEq)]
pub struct CheckinHistory {
    pub recent: Vec<CheckinRecord>,
    pub daily: Vec<DailyStats>,
}

/// Recent check-ins for the connected address and the network-wide daily
/// activity used by the heatmap.
pub fn use_checkin_history() -> Resource<CheckinHistory> {
    let services = use_context::<Services>();
    let address = use_connected_address();

    use_resource(move || {
        let aggregator = services.aggregator.clone();
        async move {
            let recent = async {
                match address() {
                    Some(address) => aggregator.user_checkins_all_chains(address, HISTORY_SIZE).await,
                    None => Vec::new(),
                }
            };
            let (recent, daily) =
                futures::join!(recent, aggregator.daily_stats_all_chains(HEATMAP_DAYS));
            CheckinHistory { recent, daily }
        }
    })
}

/// Network-wide totals, refreshed periodically.
pub fn use_global_stats() -> Signal<Option<GlobalStats>> {
    let services = use_context::<Services>();
    let mut global = use_signal(|| None);

    use_future(move || {
        let aggregator = services.aggregator.clone();
        async move {
            loop {
                let stats = aggregator.global_stats_all_chains().await;
                global.set(Some(stats));
                gloo_timers::future::TimeoutFuture::new(GLOBAL_POLL_MS).await;
            }
        }
    });

    global
}
