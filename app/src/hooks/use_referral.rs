use dioxus::prelude::*;
use gm_api::prelude::*;

use crate::Services;

const TOP_REFERRERS: usize = 10;
const RECENT_REFERRALS: usize = 10;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ReferralState {
    /// Referrer stats for the connected address, if it ever referred anyone.
    pub mine: Option<ReferrerInfo>,
    /// Who referred the connected address, per the index.
    pub referred_by: Option<Address>,
    pub program: ReferralStats,
    pub top: Vec<ReferrerInfo>,
    pub recent: Vec<ReferralRecord>,
    pub error: Option<String>,
}

/// Referral program view. Re-runs when the connected address changes.
pub fn use_referral() -> Resource<ReferralState> {
    let services = use_context::<Services>();
    let wallet = use_context::<Signal<WalletConnectionState>>();
    let address = use_memo(move || wallet.read().address);

    use_resource(move || {
        let referrals = services.referrals.clone();
        async move {
            match load(&referrals, address()).await {
                Ok(state) => state,
                Err(e) => {
                    tracing::warn!("referral subgraph query failed: {}", e);
                    ReferralState {
                        error: Some(e.to_string()),
                        ..ReferralState::default()
                    }
                }
            }
        }
    })
}

async fn load(referrals: &ReferralService, address: Option<Address>) -> Result<ReferralState, QueryError> {
    let (program, top, recent) = futures::try_join!(
        referrals.referral_stats(),
        referrals.top_referrers(TOP_REFERRERS),
        referrals.recent_referrals(RECENT_REFERRALS),
    )?;

    let (mine, referred_by) = match address {
        Some(address) => futures::try_join!(
            referrals.referrer_info(address),
            referrals.user_referrer(address),
        )?,
        None => (None, None),
    };

    Ok(ReferralState {
        mine,
        referred_by,
        program,
        top,
        recent,
        error: None,
    })
}
