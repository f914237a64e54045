use dioxus::prelude::*;
use gm_api::chains;

use crate::hooks::{use_wallet, WalletAction};

/// Chain picker. Hidden until a wallet is connected.
#[component]
pub fn NetworkSelector() -> Element {
    let (wallet, actions) = use_wallet();
    let wallet_read = wallet.read();
    if !wallet_read.connected {
        return rsx! {};
    }

    let current = wallet_read.chain_id;
    let busy = wallet_read.loading;
    let unsupported = !wallet_read.on_supported_chain();

    rsx! {
        div { class: "flex items-center space-x-1",
            if unsupported {
                span { class: "text-xs text-red-400 mr-2", "Unsupported network" }
            }
            for chain in chains::enabled() {
                {
                    let id = chain.chain_id();
                    let active = current == Some(id);
                    let class = if active {
                        "chip chip-active"
                    } else {
                        "chip hover:text-gold"
                    };
                    rsx! {
                        button {
                            key: "{id}",
                            class: "{class}",
                            title: "{chain.name}",
                            disabled: busy || active,
                            onclick: move |_| actions.send(WalletAction::SwitchNetwork(id)),
                            img { class: "w-5 h-5", src: "{chain.logo}", alt: "{chain.name}" }
                        }
                    }
                }
            }
        }
    }
}
