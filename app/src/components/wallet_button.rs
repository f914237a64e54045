use dioxus::prelude::*;
use gm_api::prelude::*;

use crate::hooks::{use_wallet, WalletAction};

#[component]
pub fn WalletButton() -> Element {
    let (wallet, actions) = use_wallet();
    let wallet_read = wallet.read();

    match (wallet_read.status(), wallet_read.address) {
        (ConnectionStatus::Connecting, _) => rsx! {
            button { class: "btn btn-secondary", disabled: true, "Connecting..." }
        },
        (ConnectionStatus::Connected, Some(address)) => {
            let short = address.short();
            rsx! {
                div { class: "flex items-center space-x-2",
                    span { class: "text-sm text-gray-400 font-mono", "{short}" }
                    button {
                        class: "btn btn-secondary text-sm",
                        onclick: move |_| actions.send(WalletAction::Disconnect),
                        "Disconnect"
                    }
                }
            }
        }
        _ => {
            let error = wallet_read.error.clone();
            rsx! {
                div { class: "flex items-center space-x-2",
                    if let Some(error) = error {
                        span { class: "text-xs text-red-400 max-w-xs truncate", title: "{error}", "{error}" }
                    }
                    button {
                        class: "btn btn-primary",
                        onclick: move |_| actions.send(WalletAction::Connect),
                        "Connect Wallet"
                    }
                }
            }
        }
    }
}
