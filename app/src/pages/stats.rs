use dioxus::prelude::*;
use gm_api::prelude::*;

use crate::components::{StatRow, UserStats};
use crate::hooks::use_global_stats;

#[component]
pub fn Stats() -> Element {
    let wallet = use_context::<Signal<WalletConnectionState>>();
    let global = use_global_stats();

    let connected = wallet.read().connected;
    let global = global.read().clone();

    rsx! {
        div { class: "max-w-4xl mx-auto",
            h1 { class: "text-3xl font-bold mb-8", "Stats" }

            div { class: "grid md:grid-cols-2 gap-6",
                if connected {
                    UserStats {}
                } else {
                    div { class: "card text-center py-12",
                        p { class: "text-gray-500", "Connect your wallet to view your stats" }
                    }
                }

                div { class: "card",
                    h3 { class: "text-lg font-semibold text-gold mb-4", "All Chains" }
                    match global {
                        None => rsx! {
                            div { class: "animate-pulse space-y-3",
                                div { class: "h-4 bg-gray-700 rounded w-3/4" }
                                div { class: "h-4 bg-gray-700 rounded w-1/2" }
                            }
                        },
                        Some(global) => rsx! {
                            div { class: "space-y-3",
                                StatRow { label: "Navigators", value: global.total_navigators.to_string() }
                                StatRow { label: "Check-ins", value: global.total_checkins.to_string() }
                            }
                            div { class: "mt-6 space-y-2 pt-3 border-t border-gray-700",
                                for chain in global.per_chain.iter() {
                                    ChainRow { key: "{chain.chain_id}", stats: chain.clone() }
                                }
                            }
                        },
                    }
                }
            }
        }
    }
}

#[component]
fn ChainRow(stats: ChainGlobalStats) -> Element {
    let Some(chain) = chains::find(stats.chain_id) else {
        return rsx! {};
    };
    rsx! {
        div { class: "flex justify-between items-center text-sm",
            span { class: "flex items-center space-x-2",
                img { class: "w-4 h-4", src: "{chain.logo}" }
                span { class: "text-mid", "{chain.name}" }
            }
            span { class: "font-mono text-gray-400",
                "{stats.total_checkins} check-ins · {stats.total_navigators} navigators"
            }
        }
    }
}
