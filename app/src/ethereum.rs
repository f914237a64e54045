//! `window.ethereum` as a [`WalletProvider`].

use gm_api::{
    chains::AddChainParams,
    contracts::TransactionRequest,
    error::ProviderError,
    provider::{EventHandler, Subscription, WalletProvider},
};

/// JSON-RPC "internal error", used when the extension misbehaves.
const INTERNAL_ERROR: i64 = -32603;

#[cfg(feature = "web")]
pub use web::InjectedProvider;

#[cfg(feature = "web")]
mod web {
    use std::rc::Rc;

    use gm_api::provider::{parse_chain_id, WalletEvent};
    use js_sys::{Array, Function, Object, Promise, Reflect, JSON};
    use serde::Serialize;
    use wasm_bindgen::{prelude::*, JsCast};

    use super::*;

    pub struct InjectedProvider {
        ethereum: JsValue,
    }

    impl InjectedProvider {
        /// `None` when no wallet extension injected `window.ethereum`.
        pub fn detect() -> Option<Self> {
            let window = web_sys::window()?;
            let ethereum = Reflect::get(&window, &JsValue::from_str("ethereum")).ok()?;
            if ethereum.is_undefined() || ethereum.is_null() {
                return None;
            }
            Some(Self { ethereum })
        }

        fn method(&self, name: &str) -> Result<Function, ProviderError> {
            Reflect::get(&self.ethereum, &JsValue::from_str(name))
                .ok()
                .and_then(|f| f.dyn_into::<Function>().ok())
                .ok_or_else(|| ProviderError::new(INTERNAL_ERROR, format!("ethereum.{name} is not a function")))
        }

        async fn request(&self, method: &str, params: Array) -> Result<JsValue, ProviderError> {
            let args = Object::new();
            set(&args, "method", &JsValue::from_str(method))?;
            set(&args, "params", &params)?;

            let promise = self
                .method("request")?
                .call1(&self.ethereum, &args)
                .map_err(provider_error)?;
            let promise: Promise = promise
                .dyn_into()
                .map_err(|_| ProviderError::new(INTERNAL_ERROR, "request did not return a promise"))?;
            wasm_bindgen_futures::JsFuture::from(promise)
                .await
                .map_err(provider_error)
        }

        async fn request_accounts_via(&self, method: &str) -> Result<Vec<String>, ProviderError> {
            let result = self.request(method, Array::new()).await?;
            Ok(Array::from(&result)
                .iter()
                .filter_map(|a| a.as_string())
                .collect())
        }
    }

    fn set(target: &Object, key: &str, value: &JsValue) -> Result<(), ProviderError> {
        Reflect::set(target, &JsValue::from_str(key), value)
            .map(|_| ())
            .map_err(provider_error)
    }

    fn to_js<T: Serialize>(value: &T) -> Result<JsValue, ProviderError> {
        let json = serde_json::to_string(value)
            .map_err(|e| ProviderError::new(INTERNAL_ERROR, e.to_string()))?;
        JSON::parse(&json).map_err(provider_error)
    }

    /// EIP-1193 errors carry `code` and `message`; anything else is internal.
    fn provider_error(err: JsValue) -> ProviderError {
        let code = Reflect::get(&err, &JsValue::from_str("code"))
            .ok()
            .and_then(|c| c.as_f64())
            .map(|c| c as i64)
            .unwrap_or(INTERNAL_ERROR);
        let message = Reflect::get(&err, &JsValue::from_str("message"))
            .ok()
            .and_then(|m| m.as_string())
            .unwrap_or_else(|| format!("{err:?}"));
        ProviderError::new(code, message)
    }

    impl WalletProvider for InjectedProvider {
        async fn get_accounts(&self) -> Result<Vec<String>, ProviderError> {
            self.request_accounts_via("eth_accounts").await
        }

        async fn request_accounts(&self) -> Result<Vec<String>, ProviderError> {
            self.request_accounts_via("eth_requestAccounts").await
        }

        async fn chain_id(&self) -> Result<u64, ProviderError> {
            let raw = self.request("eth_chainId", Array::new()).await?;
            raw.as_string()
                .as_deref()
                .and_then(parse_chain_id)
                .ok_or_else(|| ProviderError::new(INTERNAL_ERROR, "malformed eth_chainId result"))
        }

        async fn switch_chain(&self, chain_id: u64) -> Result<(), ProviderError> {
            let param = Object::new();
            set(&param, "chainId", &JsValue::from_str(&format!("{chain_id:#x}")))?;
            self.request("wallet_switchEthereumChain", Array::of1(&param))
                .await
                .map(|_| ())
        }

        async fn add_chain(&self, params: &AddChainParams) -> Result<(), ProviderError> {
            self.request("wallet_addEthereumChain", Array::of1(&to_js(params)?))
                .await
                .map(|_| ())
        }

        async fn send_transaction(&self, tx: &TransactionRequest) -> Result<String, ProviderError> {
            let hash = self
                .request("eth_sendTransaction", Array::of1(&to_js(tx)?))
                .await?;
            hash.as_string()
                .ok_or_else(|| ProviderError::new(INTERNAL_ERROR, "transaction hash is not a string"))
        }

        fn subscribe(&self, handler: EventHandler) -> Subscription {
            let (Ok(on), Ok(remove)) = (self.method("on"), self.method("removeListener")) else {
                tracing::warn!("wallet does not support event listeners");
                return Subscription::noop();
            };
            let handler = Rc::new(handler);

            let accounts_handler = handler.clone();
            let accounts_changed = Closure::<dyn Fn(JsValue)>::new(move |accounts: JsValue| {
                let accounts = Array::from(&accounts)
                    .iter()
                    .filter_map(|a| a.as_string())
                    .collect();
                accounts_handler(WalletEvent::AccountsChanged(accounts));
            });
            let chain_changed = Closure::<dyn Fn(JsValue)>::new(move |chain: JsValue| {
                match chain.as_string().as_deref().and_then(parse_chain_id) {
                    Some(id) => handler(WalletEvent::ChainChanged(id)),
                    None => tracing::warn!("ignoring malformed chainChanged payload"),
                }
            });

            let listeners = [
                ("accountsChanged", accounts_changed),
                ("chainChanged", chain_changed),
            ];
            for (event, listener) in &listeners {
                if let Err(e) = on.call2(&self.ethereum, &JsValue::from_str(event), listener.as_ref()) {
                    tracing::error!("failed to subscribe to {}: {:?}", event, e);
                }
            }

            let ethereum = self.ethereum.clone();
            Subscription::new(move || {
                for (event, listener) in &listeners {
                    let _ = remove.call2(&ethereum, &JsValue::from_str(event), listener.as_ref());
                }
            })
        }
    }
}

/// Stand-in for non-browser builds. There is never an injected wallet.
#[cfg(not(feature = "web"))]
pub struct InjectedProvider;

#[cfg(not(feature = "web"))]
impl InjectedProvider {
    pub fn detect() -> Option<Self> {
        None
    }

    fn unavailable() -> ProviderError {
        ProviderError::new(INTERNAL_ERROR, "Browser wallets are only available in web mode")
    }
}

#[cfg(not(feature = "web"))]
impl WalletProvider for InjectedProvider {
    async fn get_accounts(&self) -> Result<Vec<String>, ProviderError> {
        Err(Self::unavailable())
    }

    async fn request_accounts(&self) -> Result<Vec<String>, ProviderError> {
        Err(Self::unavailable())
    }

    async fn chain_id(&self) -> Result<u64, ProviderError> {
        Err(Self::unavailable())
    }

    async fn switch_chain(&self, _chain_id: u64) -> Result<(), ProviderError> {
        Err(Self::unavailable())
    }

    async fn add_chain(&self, _params: &AddChainParams) -> Result<(), ProviderError> {
        Err(Self::unavailable())
    }

    async fn send_transaction(&self, _tx: &TransactionRequest) -> Result<String, ProviderError> {
        Err(Self::unavailable())
    }

    fn subscribe(&self, _handler: EventHandler) -> Subscription {
        Subscription::noop()
    }
}
