use std::rc::Rc;

use dioxus::prelude::*;
use gm_api::prelude::*;

use crate::components::UserStats;
use crate::hooks::{checkin_transaction, use_checkin_history, use_user_stats, use_wallet, WalletAction};
use crate::{AppWallet, Services};

const SECONDS_PER_DAY: u64 = 86_400;

#[component]
pub fn Checkin() -> Element {
    let (wallet, actions) = use_wallet();
    let controller = use_context::<Rc<AppWallet>>();
    let services = use_context::<Services>();
    let mut user_stats = use_user_stats();
    let mut history = use_checkin_history();

    let mut submitting = use_signal(|| false);
    let mut tx_result = use_signal(|| None::<Result<String, String>>);

    let wallet_read = wallet.read();
    let connected = wallet_read.connected;
    let has_provider = controller.has_provider();
    let chain = wallet_read.chain();
    let can_checkin = wallet_read.contracts.checkin.is_some();
    drop(wallet_read);

    let checked_in_today = user_stats
        .read()
        .as_ref()
        .and_then(|s| s.as_ref())
        .is_some_and(|s| s.total_checkins > 0 && s.last_checkin_at / SECONDS_PER_DAY == now_secs() / SECONDS_PER_DAY);

    let on_checkin = move |_| {
        let controller = controller.clone();
        let services = services.clone();
        submitting.set(true);
        tx_result.set(None);
        spawn(async move {
            let result = checkin_transaction(&controller, &services).await;
            if let Err(e) = &result {
                tracing::error!("check-in failed: {}", e);
            }
            tx_result.set(Some(result));
            submitting.set(false);
            user_stats.restart();
            history.restart();
        });
    };

    rsx! {
        div { class: "max-w-5xl mx-auto",
            div { class: "grid md:grid-cols-2 gap-6",
                div { class: "card text-center py-10",
                    h1 { class: "text-4xl font-bold text-gold mb-2", "GM" }
                    p { class: "text-low mb-8", "Check in once a day on any chain to grow your streak." }

                    if !has_provider {
                        p { class: "text-low",
                            "No browser wallet detected. "
                            a { href: "https://metamask.io/download/", target: "_blank", class: "text-gold underline",
                                "Install one"
                            }
                            " and refresh."
                        }
                    } else if !connected {
                        button {
                            class: "controls-primary px-8 py-3 rounded-lg font-semibold",
                            onclick: move |_| actions.send(WalletAction::Connect),
                            "Connect Wallet"
                        }
                    } else if !can_checkin {
                        p { class: "text-red-400", "Switch to a supported network to check in." }
                    } else {
                        button {
                            class: "controls-primary px-8 py-3 rounded-lg font-semibold transition-all hover:scale-[1.02]",
                            disabled: *submitting.read() || checked_in_today,
                            onclick: on_checkin,
                            if *submitting.read() {
                                "Confirm in your wallet..."
                            } else if checked_in_today {
                                "Checked in today"
                            } else {
                                "Say GM"
                            }
                        }
                    }

                    if let Some(result) = tx_result.read().as_ref() {
                        match result {
                            Ok(hash) => {
                                let explorer_url = chain
                                    .map(|c| c.explorer_tx_url(hash))
                                    .unwrap_or_default();
                                rsx! {
                                    div { class: "mt-4 p-2 bg-green-500/10 border border-green-500/30 rounded text-sm",
                                        a { href: "{explorer_url}", target: "_blank", class: "text-green-400 underline",
                                            "View transaction"
                                        }
                                    }
                                }
                            }
                            Err(e) => rsx! {
                                div { class: "mt-4 p-2 bg-red-500/10 border border-red-500/30 rounded text-sm text-red-400",
                                    "{e}"
                                }
                            },
                        }
                    }
                }

                if connected {
                    UserStats {}
                }
            }

            CheckinHistoryCard { history: history.read().clone().unwrap_or_default() }
        }
    }
}

#[component]
fn CheckinHistoryCard(history: crate::hooks::CheckinHistory) -> Element {
    let peak = history.daily.iter().map(|d| d.checkins).max().unwrap_or(0).max(1);

    rsx! {
        div { class: "card mt-6",
            h3 { class: "text-lg font-semibold text-gold mb-4", "Activity" }
            div { class: "flex flex-wrap gap-1 mb-6",
                for day in history.daily.iter() {
                    {
                        let level = (day.checkins * 4).div_ceil(peak).min(4);
                        let title = format!("day {}: {} check-ins", day.day, day.checkins);
                        rsx! {
                            div { key: "{day.day}", class: "heat heat-{level} w-3 h-3 rounded-sm", title: "{title}" }
                        }
                    }
                }
            }

            if history.recent.is_empty() {
                p { class: "text-low text-center py-4", "No check-ins yet." }
            } else {
                div { class: "divide-y divide-gray-800",
                    for record in history.recent.iter() {
                        {
                            let chain = chains::find(record.chain_id);
                            let name = chain.map(|c| c.name).unwrap_or("unknown");
                            let url = chain.map(|c| c.explorer_tx_url(&record.transaction_hash)).unwrap_or_default();
                            rsx! {
                                div { key: "{record.id}", class: "flex justify-between py-2 text-sm",
                                    span { class: "text-mid", "{name}" }
                                    span { class: "font-mono text-gray-400", "streak {record.streak}" }
                                    a { href: "{url}", target: "_blank", class: "text-gold underline", "tx" }
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}

#[cfg(feature = "web")]
fn now_secs() -> u64 {
    (js_sys::Date::now() / 1000.0) as u64
}

#[cfg(not(feature = "web"))]
fn now_secs() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}
