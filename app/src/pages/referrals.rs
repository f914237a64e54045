use std::rc::Rc;

use dioxus::prelude::*;
use gm_api::prelude::*;

use crate::components::StatRow;
use crate::hooks::{register_referral_transaction, use_referral, use_wallet, WalletAction};
use crate::AppWallet;

#[component]
pub fn Referrals() -> Element {
    let (wallet, actions) = use_wallet();
    let controller = use_context::<Rc<AppWallet>>();
    let mut referral = use_referral();

    let mut referrer_input = use_signal(String::new);
    let mut submitting = use_signal(|| false);
    let mut tx_result = use_signal(|| None::<Result<String, String>>);

    let wallet_read = wallet.read();
    let connected = wallet_read.connected;
    let status = wallet_read.referral;
    drop(wallet_read);

    let referral_chain = chains::referral_chain();
    let referral_chain_id = referral_chain.chain_id();
    let state = referral.read().clone().unwrap_or_default();

    let on_register = move |_| {
        let controller = controller.clone();
        let referrer = referrer_input.read().trim().to_string();
        submitting.set(true);
        tx_result.set(None);
        spawn(async move {
            let result = register_referral_transaction(&controller, &referrer).await;
            tx_result.set(Some(result));
            submitting.set(false);
            referral.restart();
        });
    };

    rsx! {
        div { class: "max-w-4xl mx-auto",
            h1 { class: "text-3xl font-bold mb-8", "Referrals" }

            if let Some(error) = &state.error {
                div { class: "card mb-6 text-red-400 text-sm", "Referral data unavailable: {error}" }
            }

            div { class: "grid md:grid-cols-2 gap-6",
                div { class: "card",
                    h3 { class: "text-lg font-semibold text-gold mb-4", "Your Referrals" }
                    if !connected {
                        p { class: "text-gray-500", "Connect your wallet to join the referral program." }
                    } else if !status.on_referral_chain {
                        p { class: "text-gray-500 mb-4", "Referrals live on {referral_chain.name}." }
                        button {
                            class: "btn btn-primary",
                            onclick: move |_| actions.send(WalletAction::SwitchNetwork(referral_chain_id)),
                            "Switch to {referral_chain.name}"
                        }
                    } else {
                        div { class: "space-y-3",
                            StatRow {
                                label: "Referred by",
                                value: status
                                    .referrer
                                    .or(state.referred_by)
                                    .map(|a| a.short())
                                    .unwrap_or_else(|| "-".to_string()),
                            }
                            StatRow {
                                label: "People referred",
                                value: state.mine.as_ref().map(|m| m.total_referrals).unwrap_or(0).to_string(),
                                highlight: state.mine.is_some(),
                            }
                        }

                        if !status.has_referrer {
                            div { class: "mt-6",
                                p { class: "text-low text-sm mb-2", "Who invited you?" }
                                div { class: "flex gap-2",
                                    input {
                                        class: "elevated-control rounded px-3 py-2 font-mono text-sm w-full outline-none",
                                        placeholder: "0x...",
                                        value: "{referrer_input}",
                                        oninput: move |e| referrer_input.set(e.value()),
                                    }
                                    button {
                                        class: "btn btn-primary",
                                        disabled: *submitting.read() || referrer_input.read().trim().is_empty(),
                                        onclick: on_register,
                                        if *submitting.read() { "Confirming..." } else { "Register" }
                                    }
                                }
                            }
                        }

                        if let Some(result) = tx_result.read().as_ref() {
                            match result {
                                Ok(_) => rsx! {
                                    p { class: "mt-3 text-green-400 text-sm", "Referral registered." }
                                },
                                Err(e) => rsx! {
                                    p { class: "mt-3 text-red-400 text-sm", "{e}" }
                                },
                            }
                        }
                    }
                }

                div { class: "card",
                    h3 { class: "text-lg font-semibold text-gold mb-4", "Program" }
                    div { class: "space-y-3",
                        StatRow { label: "Referrals", value: state.program.total_referrals.to_string() }
                        StatRow { label: "Referrers", value: state.program.total_referrers.to_string() }
                    }
                }
            }

            div { class: "grid md:grid-cols-2 gap-6 mt-6",
                div { class: "card",
                    h3 { class: "text-lg font-semibold text-gold mb-4", "Top Referrers" }
                    div { class: "divide-y divide-gray-800",
                        for (i, info) in state.top.iter().enumerate() {
                            {
                                let rank = i + 1;
                                let short = info.address.short();
                                rsx! {
                                    div { key: "{info.address}", class: "flex justify-between py-2 text-sm",
                                        span { class: "text-gray-400 font-mono", "#{rank} {short}" }
                                        span { class: "font-mono text-gold", "{info.total_referrals}" }
                                    }
                                }
                            }
                        }
                    }
                }

                div { class: "card",
                    h3 { class: "text-lg font-semibold text-gold mb-4", "Recent" }
                    div { class: "divide-y divide-gray-800",
                        for record in state.recent.iter() {
                            {
                                let referrer = record.referrer.short();
                                let referee = record.referee.short();
                                rsx! {
                                    div { key: "{record.id}", class: "py-2 text-sm font-mono text-gray-400",
                                        "{referrer} → {referee}"
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
