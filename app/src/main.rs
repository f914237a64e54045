#![allow(non_snake_case)]

mod components;
mod ethereum;
mod hooks;
mod pages;
mod route;
mod storage;

use std::rc::Rc;

use dioxus::prelude::*;
use gm_api::prelude::*;
use route::Route;

use crate::{ethereum::InjectedProvider, storage::LocalStore};

pub type AppWallet = WalletController<InjectedProvider, LocalStore, Rc<JsonRpcClient>>;

fn main() {
    #[cfg(feature = "web")]
    {
        tracing_wasm::set_as_global_default();
        dioxus::launch(App);
    }

    #[cfg(feature = "desktop")]
    {
        dioxus::launch(App);
    }
}

/// Read-side clients shared by every page.
#[derive(Clone)]
pub struct Services {
    pub config: Config,
    pub aggregator: Rc<Aggregator<GraphqlSource>>,
    pub referrals: ReferralService,
    pub rpc: Rc<JsonRpcClient>,
}

impl Services {
    fn new(config: Config) -> Self {
        let client = http_client(&config);
        Self {
            aggregator: Rc::new(
                Aggregator::new(GraphqlSource::new(client.clone()))
                    .ranking_page_size(config.ranking_page_size),
            ),
            referrals: ReferralService::from_config(client.clone(), &config),
            rpc: Rc::new(JsonRpcClient::new(client)),
            config,
        }
    }
}

#[component]
fn App() -> Element {
    let store = use_hook(LocalStore::default);
    let services = use_context_provider(|| Services::new(Config::default()));

    let wallet_store = store.clone();
    let rpc = services.rpc.clone();
    use_context_provider(move || {
        Rc::new(AppWallet::new(InjectedProvider::detect(), wallet_store, rpc))
    });
    use_context_provider(|| Signal::new(WalletConnectionState::default()));
    use_context_provider(|| Signal::new(Preferences::load(&store)));
    use_context_provider(move || store);

    hooks::use_wallet_session();

    rsx! {
        Router::<Route> {}
    }
}
