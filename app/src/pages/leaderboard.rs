use dioxus::prelude::*;
use gm_api::prelude::*;

use crate::hooks::use_leaderboard;

#[component]
pub fn Leaderboard() -> Element {
    let leaderboard = use_leaderboard();
    let wallet = use_context::<Signal<WalletConnectionState>>();
    let me = wallet.read().address;
    let state = leaderboard.read();

    rsx! {
        div { class: "max-w-4xl mx-auto",
            h1 { class: "text-3xl font-bold mb-8", "Leaderboard" }

            div { class: "card",
                if state.loading {
                    div { class: "text-center py-12",
                        div { class: "animate-spin w-8 h-8 border-2 border-gold border-t-transparent rounded-full mx-auto mb-4" }
                        p { class: "text-gray-500", "Loading leaderboard..." }
                    }
                } else if state.entries.is_empty() {
                    div { class: "text-center py-12",
                        p { class: "text-gray-500", "Nobody has checked in yet. Be the first!" }
                    }
                } else {
                    div { class: "grid grid-cols-6 gap-4 pb-3 border-b border-gray-700 text-sm text-gray-500",
                        div { "Rank" }
                        div { class: "col-span-2", "Address" }
                        div { class: "text-right", "Check-ins" }
                        div { class: "text-right", "Best streak" }
                        div { class: "text-right", "Chains" }
                    }

                    div { class: "divide-y divide-gray-800",
                        for entry in state.entries.iter() {
                            {
                                let short = entry.address.short();
                                let url = chains::referral_chain().explorer_address_url(&entry.address.to_hex());
                                let row_class = if me == Some(entry.address) {
                                    "grid grid-cols-6 gap-4 py-3 items-center bg-gold/10"
                                } else {
                                    "grid grid-cols-6 gap-4 py-3 items-center"
                                };
                                rsx! {
                                    div { key: "{entry.address}", class: "{row_class}",
                                        div {
                                            if entry.rank <= 3 {
                                                span { class: "text-2xl",
                                                    match entry.rank {
                                                        1 => "🥇",
                                                        2 => "🥈",
                                                        3 => "🥉",
                                                        _ => "",
                                                    }
                                                }
                                            } else {
                                                span { class: "text-gray-400 font-mono", "#{entry.rank}" }
                                            }
                                        }
                                        div { class: "col-span-2 font-mono text-sm",
                                            a {
                                                href: "{url}",
                                                target: "_blank",
                                                class: "text-gray-300 hover:text-gold transition-colors",
                                                "{short}"
                                            }
                                        }
                                        div { class: "text-right font-mono text-gold", "{entry.total_checkins}" }
                                        div { class: "text-right font-mono text-gray-400", "{entry.max_streak}" }
                                        div { class: "flex justify-end space-x-1",
                                            for chain in entry.chains.iter().filter_map(|id| chains::find(*id)) {
                                                img { key: "{chain.name}", class: "w-4 h-4", src: "{chain.logo}", title: "{chain.name}" }
                                            }
                                        }
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}
