use std::{cell::RefCell, future::Future, rc::Rc};

use dioxus::prelude::*;
use futures::StreamExt;
use gm_api::prelude::*;
use gm_api::provider::EventHandler;

use crate::AppWallet;

#[derive(Clone, Debug)]
pub enum WalletAction {
    Connect,
    Disconnect,
    SwitchNetwork(u64),
    Event(WalletEvent),
}

/// Owns the wallet session for the whole app: restores the persisted
/// connection once, subscribes to wallet events for as long as the root
/// component lives, and runs every [`WalletAction`] against the controller.
/// Called once from `App`; components reach it through [`use_wallet`].
pub fn use_wallet_session() -> Coroutine<WalletAction> {
    let controller = use_context::<Rc<AppWallet>>();
    let state = use_context::<Signal<WalletConnectionState>>();

    let wallet = controller.clone();
    let actions = use_coroutine(move |mut rx: UnboundedReceiver<WalletAction>| {
        let wallet = wallet.clone();
        async move {
            if let Err(e) = publish(&wallet, state, wallet.restore()).await {
                tracing::warn!("session restore failed: {}", e);
            }
            refresh_referral(&wallet, state).await;

            while let Some(action) = rx.next().await {
                // Each action runs on its own task so a newer one can
                // supersede a connect that is still waiting on the wallet.
                let wallet = wallet.clone();
                spawn(async move {
                    let result = match action {
                        WalletAction::Connect => publish(&wallet, state, wallet.connect()).await.map(|_| ()),
                        WalletAction::Disconnect => {
                            wallet.disconnect();
                            Ok(())
                        }
                        WalletAction::SwitchNetwork(chain_id) => {
                            publish(&wallet, state, wallet.switch_network(chain_id)).await
                        }
                        WalletAction::Event(event) => publish(&wallet, state, wallet.handle_event(event)).await,
                    };
                    match result {
                        Ok(()) => refresh_referral(&wallet, state).await,
                        Err(WalletError::Superseded) => {}
                        Err(e) => tracing::error!("wallet action failed: {}", e),
                    }
                    let mut state = state;
                    state.set(wallet.snapshot());
                });
            }
        }
    });

    let subscription = use_hook(|| {
        let handler: EventHandler = Box::new(move |event| actions.send(WalletAction::Event(event)));
        let subscription = controller
            .provider()
            .map(|provider| provider.subscribe(handler))
            .unwrap_or_else(Subscription::noop);
        Rc::new(RefCell::new(Some(subscription)))
    });
    use_drop(move || {
        if let Some(subscription) = subscription.borrow_mut().take() {
            subscription.unsubscribe();
        }
    });

    actions
}

/// Session state plus the action channel, for any component under `App`.
pub fn use_wallet() -> (Signal<WalletConnectionState>, Coroutine<WalletAction>) {
    (
        use_context::<Signal<WalletConnectionState>>(),
        use_coroutine_handle::<WalletAction>(),
    )
}

/// Runs `op` while mirroring the controller's state into `state`, once as
/// soon as the operation has started and again when it completes.
async fn publish<T>(
    wallet: &AppWallet,
    mut state: Signal<WalletConnectionState>,
    op: impl Future<Output = Result<T, WalletError>>,
) -> Result<T, WalletError> {
    let (result, ()) = futures::join!(op, async { state.set(wallet.snapshot()) });
    state.set(wallet.snapshot());
    result
}

async fn refresh_referral(wallet: &AppWallet, mut state: Signal<WalletConnectionState>) {
    if wallet.snapshot().connected {
        wallet.refresh_referral().await;
        state.set(wallet.snapshot());
    }
}
