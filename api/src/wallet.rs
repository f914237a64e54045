//! Wallet session state machine.
//!
//! `Disconnected -> Connecting -> Connected`, back to `Disconnected` on an
//! explicit disconnect or when the wallet reports no accounts, and
//! `Connected -> Connecting -> Connected` on account or chain changes.
//!
//! Execution is single threaded: state lives behind `RefCell`/`Cell` and no
//! borrow is held across an await. Every connect attempt is tagged; a
//! completion whose tag is no longer current is discarded, so a slow stale
//! attempt can never overwrite a newer session.

use std::cell::{Cell, RefCell};

use crate::{
    address::Address,
    chains::{self, AddChainParams, ChainConfig},
    contracts::BoundContracts,
    error::{ProviderError, ReferralLookupError, WalletError},
    provider::{WalletEvent, WalletProvider, UNRECOGNIZED_CHAIN_CODE, USER_REJECTED_CODE},
    state::{ReferralStatus, WalletConnectionState},
    storage::{keys, KeyValueStore},
};

/// On-chain referrer lookup for the referral sub-state.
#[allow(async_fn_in_trait)]
pub trait ReferralReader {
    async fn referrer_of(
        &self,
        chain: &ChainConfig,
        user: Address,
    ) -> Result<Option<Address>, ReferralLookupError>;
}

impl<T: ReferralReader + ?Sized> ReferralReader for std::rc::Rc<T> {
    async fn referrer_of(
        &self,
        chain: &ChainConfig,
        user: Address,
    ) -> Result<Option<Address>, ReferralLookupError> {
        (**self).referrer_of(chain, user).await
    }
}

pub struct WalletController<P, S, R> {
    provider: Option<P>,
    store: S,
    referrals: R,
    state: RefCell<WalletConnectionState>,
    attempt: Cell<u64>,
}

impl<P, S, R> WalletController<P, S, R>
where
    P: WalletProvider,
    S: KeyValueStore,
    R: ReferralReader,
{
    /// `provider` is `None` when no wallet extension is injected.
    pub fn new(provider: Option<P>, store: S, referrals: R) -> Self {
        Self {
            provider,
            store,
            referrals,
            state: RefCell::new(WalletConnectionState::default()),
            attempt: Cell::new(0),
        }
    }

    pub fn snapshot(&self) -> WalletConnectionState {
        self.state.borrow().clone()
    }

    pub fn provider(&self) -> Option<&P> {
        self.provider.as_ref()
    }

    pub fn has_provider(&self) -> bool {
        self.provider.is_some()
    }

    /// User-initiated connect. Fails with [`WalletError::ConnectInFlight`]
    /// without touching state when another attempt is still running.
    pub async fn connect(&self) -> Result<Address, WalletError> {
        if self.state.borrow().loading {
            return Err(WalletError::ConnectInFlight);
        }
        self.run_connect().await
    }

    /// Connect that supersedes whatever attempt is in flight. Used for wallet
    /// events and after a network switch.
    async fn reconnect(&self) -> Result<Address, WalletError> {
        self.run_connect().await
    }

    async fn run_connect(&self) -> Result<Address, WalletError> {
        let attempt = self.attempt.get() + 1;
        self.attempt.set(attempt);
        {
            let mut state = self.state.borrow_mut();
            state.loading = true;
            state.error = None;
        }

        let outcome = self.establish().await;

        if self.attempt.get() != attempt {
            tracing::debug!(attempt, "discarding superseded connect attempt");
            return Err(WalletError::Superseded);
        }

        match outcome {
            Ok((address, chain_id)) => {
                self.apply_session(address, chain_id);
                tracing::info!(%address, chain_id, "wallet connected");
                Ok(address)
            }
            Err(err) => {
                tracing::error!("wallet connection failed: {}", err);
                let lost_session = matches!(err, WalletError::NoAccounts | WalletError::NoProvider);
                if lost_session {
                    self.clear_persisted();
                }
                let mut state = self.state.borrow_mut();
                if lost_session {
                    *state = WalletConnectionState::default();
                }
                state.loading = false;
                state.error = Some(err.to_string());
                Err(err)
            }
        }
    }

    async fn establish(&self) -> Result<(Address, u64), WalletError> {
        let provider = self.provider.as_ref().ok_or(WalletError::NoProvider)?;

        let mut accounts = provider.get_accounts().await?;
        if accounts.is_empty() {
            accounts = provider.request_accounts().await.map_err(|e| match e.code {
                USER_REJECTED_CODE => WalletError::NoAccounts,
                _ => WalletError::Provider(e),
            })?;
        }

        let raw = accounts.into_iter().next().ok_or(WalletError::NoAccounts)?;
        let address = raw
            .parse::<Address>()
            .map_err(|_| WalletError::InvalidAddress(raw.clone()))?;
        let chain_id = provider.chain_id().await?;
        Ok((address, chain_id))
    }

    fn apply_session(&self, address: Address, chain_id: u64) {
        {
            let mut state = self.state.borrow_mut();
            let same_session = state.address == Some(address) && state.chain_id == Some(chain_id);
            state.connected = true;
            state.address = Some(address);
            state.chain_id = Some(chain_id);
            state.contracts = BoundContracts::for_chain(chain_id);
            state.loading = false;
            state.error = None;
            if !same_session {
                state.referral = ReferralStatus {
                    on_referral_chain: chains::is_referral_chain(chain_id),
                    ..ReferralStatus::default()
                };
            }
        }
        self.store.set(keys::WALLET_CONNECTED, "true");
        self.store.set(keys::WALLET_ADDRESS, &address.to_hex());
    }

    fn clear_persisted(&self) {
        self.store.remove(keys::WALLET_CONNECTED);
        self.store.remove(keys::WALLET_ADDRESS);
    }

    /// Drops the session and the persisted flags. Wallet-side authorization
    /// cannot be revoked from here and is left alone.
    pub fn disconnect(&self) {
        self.attempt.set(self.attempt.get() + 1);
        *self.state.borrow_mut() = WalletConnectionState::default();
        self.clear_persisted();
        tracing::info!("wallet disconnected");
    }

    /// Silently re-establishes a persisted session on startup, as long as the
    /// wallet still authorizes the stored address. Never prompts.
    pub async fn restore(&self) -> Result<Option<Address>, WalletError> {
        if self.store.get(keys::WALLET_CONNECTED).as_deref() != Some("true") {
            return Ok(None);
        }
        let Some(provider) = self.provider.as_ref() else {
            self.clear_persisted();
            return Ok(None);
        };

        let stored = self
            .store
            .get(keys::WALLET_ADDRESS)
            .and_then(|raw| raw.parse::<Address>().ok());
        let authorized = provider.get_accounts().await?;
        let still_authorized = stored.is_some_and(|stored| {
            authorized
                .iter()
                .filter_map(|raw| raw.parse::<Address>().ok())
                .any(|a| a == stored)
        });

        if !still_authorized {
            tracing::info!("persisted wallet session is no longer authorized");
            self.clear_persisted();
            return Ok(None);
        }

        self.connect().await.map(Some)
    }

    /// Moves the wallet to `target`, adding the chain to the wallet first if it
    /// does not know it, then reconnects so every chain-bound handle and the
    /// referral sub-state are rebuilt.
    pub async fn switch_network(&self, target: u64) -> Result<(), WalletError> {
        let chain = chains::find(target)
            .filter(|c| c.enabled)
            .ok_or(WalletError::UnsupportedChain(target))?;

        {
            let state = self.state.borrow();
            if state.connected && !state.loading && state.chain_id == Some(target) {
                return Ok(());
            }
        }

        let provider = self.provider.as_ref().ok_or(WalletError::NoProvider)?;
        let attempt = self.attempt.get();
        let switched = request_switch(provider, chain).await;
        if self.attempt.get() != attempt {
            tracing::debug!(target, "network switch superseded");
            return Err(WalletError::Superseded);
        }
        if let Err(err) = switched {
            tracing::error!(target, "network switch failed: {}", err);
            self.state.borrow_mut().error = Some(err.to_string());
            return Err(err);
        }

        self.reconnect().await.map(|_| ())
    }

    /// Reacts to `accountsChanged` / `chainChanged`.
    pub async fn handle_event(&self, event: WalletEvent) -> Result<(), WalletError> {
        match event {
            WalletEvent::AccountsChanged(accounts) => {
                let Some(first) = accounts.first() else {
                    self.disconnect();
                    return Ok(());
                };
                let next = first.parse::<Address>().ok();
                let (current, loading) = {
                    let state = self.state.borrow();
                    (state.address, state.loading)
                };
                if next.is_some() && next == current && !loading {
                    return Ok(());
                }
                self.reconnect().await.map(|_| ())
            }
            WalletEvent::ChainChanged(chain_id) => {
                let (connected, loading) = {
                    let state = self.state.borrow();
                    (state.connected, state.loading)
                };
                if !connected && !loading {
                    return Ok(());
                }
                tracing::debug!(chain_id, "wallet chain changed");
                self.reconnect().await.map(|_| ())
            }
        }
    }

    /// Recomputes the referral sub-state for the current session. Lookup
    /// failures leave the referrer fields empty; a result for a session that
    /// changed meanwhile is dropped.
    pub async fn refresh_referral(&self) -> ReferralStatus {
        let (address, chain_id) = {
            let state = self.state.borrow();
            match (state.connected, state.address, state.chain_id) {
                (true, Some(address), Some(chain_id)) => (address, chain_id),
                _ => return ReferralStatus::default(),
            }
        };

        let status = if chains::is_referral_chain(chain_id) {
            match self.referrals.referrer_of(chains::referral_chain(), address).await {
                Ok(referrer) => ReferralStatus {
                    on_referral_chain: true,
                    has_referrer: referrer.is_some(),
                    referrer,
                },
                Err(e) => {
                    tracing::warn!(%address, "referral lookup failed: {}", e);
                    ReferralStatus {
                        on_referral_chain: true,
                        ..ReferralStatus::default()
                    }
                }
            }
        } else {
            ReferralStatus::default()
        };

        let mut state = self.state.borrow_mut();
        if state.connected && state.address == Some(address) && state.chain_id == Some(chain_id) {
            state.referral = status;
        }
        status
    }

    /// Submits today's check-in on the active chain. Returns the tx hash.
    pub async fn checkin(&self, fee: u128) -> Result<String, WalletError> {
        let (from, contract) = {
            let state = self.state.borrow();
            let from = state.address.ok_or(WalletError::NotConnected)?;
            let chain_id = state.chain_id.unwrap_or_default();
            let contract = state
                .contracts
                .checkin
                .ok_or(WalletError::UnsupportedChain(chain_id))?;
            (from, contract)
        };
        let provider = self.provider.as_ref().ok_or(WalletError::NoProvider)?;
        let hash = provider.send_transaction(&contract.checkin_tx(from, fee)).await?;
        tracing::info!(%from, chain_id = contract.0.chain_id, %hash, "check-in submitted");
        Ok(hash)
    }

    /// Registers `referrer` for the connected address. Referral chain only.
    pub async fn register_referral(&self, referrer: Address) -> Result<String, WalletError> {
        let (from, contract) = {
            let state = self.state.borrow();
            let from = state.address.ok_or(WalletError::NotConnected)?;
            let chain_id = state.chain_id.unwrap_or_default();
            let contract = state
                .contracts
                .referral
                .ok_or(WalletError::UnsupportedChain(chain_id))?;
            (from, contract)
        };
        let provider = self.provider.as_ref().ok_or(WalletError::NoProvider)?;
        let hash = provider
            .send_transaction(&contract.register_tx(from, referrer))
            .await?;
        tracing::info!(%from, %referrer, %hash, "referral registration submitted");
        Ok(hash)
    }
}

async fn request_switch<P: WalletProvider>(
    provider: &P,
    chain: &ChainConfig,
) -> Result<(), WalletError> {
    let target = chain.chain_id();
    let passthrough = |e: ProviderError| WalletError::NetworkSwitch(e.message);
    match provider.switch_chain(target).await {
        Ok(()) => Ok(()),
        Err(e) if e.code == UNRECOGNIZED_CHAIN_CODE => {
            tracing::info!(target, "wallet does not know chain, adding it");
            provider
                .add_chain(&AddChainParams::from(chain))
                .await
                .map_err(passthrough)?;
            provider.switch_chain(target).await.map_err(passthrough)
        }
        Err(e) => Err(passthrough(e)),
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use assert_matches::assert_matches;

    use super::*;
    use crate::{
        mock::{MockProvider, MockReferrals},
        state::ConnectionStatus,
        storage::MemoryStore,
    };

    const ALICE: &str = "0x00000000000000000000000000000000000a11ce";
    const BOB: &str = "0x0000000000000000000000000000000000000b0b";

    type Controller = WalletController<Rc<MockProvider>, Rc<MemoryStore>, Rc<MockReferrals>>;

    struct Harness {
        provider: Rc<MockProvider>,
        store: Rc<MemoryStore>,
        referrals: Rc<MockReferrals>,
        wallet: Controller,
    }

    fn harness(accounts: &[&str], chain_id: u64) -> Harness {
        let provider = Rc::new(MockProvider::new(accounts, chain_id));
        let store = Rc::new(MemoryStore::new());
        let referrals = Rc::new(MockReferrals::default());
        let wallet = WalletController::new(Some(provider.clone()), store.clone(), referrals.clone());
        Harness {
            provider,
            store,
            referrals,
            wallet,
        }
    }

    fn addr(s: &str) -> Address {
        s.parse().unwrap()
    }

    #[tokio::test]
    async fn connect_uses_authorized_accounts_and_persists() {
        let h = harness(&[ALICE], 8453);
        let address = h.wallet.connect().await.unwrap();
        assert_eq!(address, addr(ALICE));

        let state = h.wallet.snapshot();
        assert_eq!(state.status(), ConnectionStatus::Connected);
        assert_eq!(state.chain_id, Some(8453));
        assert!(state.contracts.checkin.is_some());
        assert!(state.contracts.referral.is_some());
        assert_eq!(h.provider.call_count("eth_requestAccounts"), 0);
        assert_eq!(h.store.get(keys::WALLET_CONNECTED).as_deref(), Some("true"));
        assert_eq!(h.store.get(keys::WALLET_ADDRESS), Some(addr(ALICE).to_hex()));
    }

    #[tokio::test]
    async fn connect_prompts_when_nothing_authorized() {
        let h = harness(&[], 10);
        h.provider.grant_on_request(&[BOB]);
        assert_eq!(h.wallet.connect().await.unwrap(), addr(BOB));
        assert_eq!(h.provider.call_count("eth_requestAccounts"), 1);
    }

    #[tokio::test]
    async fn rejected_authorization_is_no_accounts() {
        let h = harness(&[], 10);
        let err = h.wallet.connect().await.unwrap_err();
        assert_eq!(err, WalletError::NoAccounts);

        let state = h.wallet.snapshot();
        assert!(!state.connected);
        assert!(state.address.is_none());
        assert!(!state.loading);
        assert_eq!(state.error, Some(WalletError::NoAccounts.to_string()));
    }

    #[tokio::test]
    async fn missing_extension_is_no_provider() {
        let wallet: WalletController<Rc<MockProvider>, _, _> =
            WalletController::new(None, MemoryStore::new(), MockReferrals::default());
        assert_eq!(wallet.connect().await, Err(WalletError::NoProvider));
        assert_eq!(wallet.snapshot().error, Some(WalletError::NoProvider.to_string()));
    }

    #[tokio::test]
    async fn overlapping_connects_apply_once() {
        let h = harness(&[ALICE], 8453);
        h.provider.set_latency(true);

        let (first, second) = futures::join!(h.wallet.connect(), h.wallet.connect());
        assert_eq!(first, Ok(addr(ALICE)));
        assert_eq!(second, Err(WalletError::ConnectInFlight));
        assert_eq!(h.provider.call_count("eth_accounts"), 1);
        assert_eq!(h.provider.call_count("eth_chainId"), 1);
        assert_eq!(h.wallet.snapshot().status(), ConnectionStatus::Connected);
    }

    #[tokio::test]
    async fn disconnect_supersedes_in_flight_connect() {
        let h = harness(&[ALICE], 8453);
        h.provider.set_latency(true);

        let (connect, ()) = futures::join!(h.wallet.connect(), async { h.wallet.disconnect() });
        assert_eq!(connect, Err(WalletError::Superseded));

        let state = h.wallet.snapshot();
        assert_eq!(state.status(), ConnectionStatus::Disconnected);
        assert!(state.address.is_none());
        assert!(h.store.get(keys::WALLET_CONNECTED).is_none());
    }

    #[tokio::test]
    async fn account_switch_mid_connect_wins() {
        let h = harness(&[ALICE], 8453);
        h.provider.set_latency(true);

        let (first, second) = futures::join!(h.wallet.connect(), async {
            h.provider.set_accounts(&[BOB]);
            h.wallet
                .handle_event(WalletEvent::AccountsChanged(vec![BOB.to_string()]))
                .await
        });
        assert_eq!(first, Err(WalletError::Superseded));
        assert_eq!(second, Ok(()));
        assert_eq!(h.wallet.snapshot().address, Some(addr(BOB)));
    }

    #[tokio::test]
    async fn disconnect_clears_state_and_storage() {
        let h = harness(&[ALICE], 8453);
        h.wallet.connect().await.unwrap();
        h.wallet.disconnect();
        assert_eq!(h.wallet.snapshot(), WalletConnectionState::default());
        assert!(h.store.get(keys::WALLET_CONNECTED).is_none());
        assert!(h.store.get(keys::WALLET_ADDRESS).is_none());
    }

    #[tokio::test]
    async fn unsupported_switch_leaves_state_untouched() {
        let h = harness(&[ALICE], 8453);
        h.wallet.connect().await.unwrap();
        let before = h.wallet.snapshot();

        for target in [1, 56, 137, 0, u64::MAX] {
            assert_eq!(
                h.wallet.switch_network(target).await,
                Err(WalletError::UnsupportedChain(target))
            );
            assert_eq!(h.wallet.snapshot(), before);
        }
        assert_eq!(h.provider.call_count("wallet_switchEthereumChain"), 0);
    }

    #[tokio::test]
    async fn switch_to_current_chain_is_a_no_op() {
        let h = harness(&[ALICE], 8453);
        h.wallet.connect().await.unwrap();
        let before = h.wallet.snapshot();

        h.wallet.switch_network(8453).await.unwrap();
        assert_eq!(h.wallet.snapshot(), before);
        assert_eq!(h.provider.call_count("wallet_switchEthereumChain"), 0);
    }

    #[tokio::test]
    async fn switch_rebinds_chain_contracts() {
        let h = harness(&[ALICE], 8453);
        h.wallet.connect().await.unwrap();
        assert!(h.wallet.snapshot().contracts.referral.is_some());

        h.wallet.switch_network(10).await.unwrap();
        let state = h.wallet.snapshot();
        assert_eq!(state.chain_id, Some(10));
        assert_eq!(state.contracts.chain_id, Some(10));
        assert!(state.contracts.referral.is_none());
        assert!(!state.referral.on_referral_chain);
        assert_eq!(state.address, Some(addr(ALICE)));
    }

    #[tokio::test]
    async fn unknown_chain_is_added_then_switched() {
        let h = harness(&[ALICE], 8453);
        h.provider.forget_chain(57073);
        h.wallet.connect().await.unwrap();

        h.wallet.switch_network(57073).await.unwrap();
        assert_eq!(h.provider.call_count("wallet_addEthereumChain"), 1);
        assert_eq!(h.provider.call_count("wallet_switchEthereumChain"), 2);
        assert_eq!(h.wallet.snapshot().chain_id, Some(57073));
        let added = h.provider.added_chains();
        assert_eq!(added[0].chain_id, "0xdef1");
    }

    #[tokio::test]
    async fn wallet_switch_error_passes_message_through() {
        let h = harness(&[ALICE], 8453);
        h.wallet.connect().await.unwrap();
        h.provider
            .fail_switch(ProviderError::new(USER_REJECTED_CODE, "User rejected the request."));

        let err = h.wallet.switch_network(10).await.unwrap_err();
        assert_eq!(err, WalletError::NetworkSwitch("User rejected the request.".to_string()));
        let state = h.wallet.snapshot();
        assert_eq!(state.chain_id, Some(8453));
        assert!(state.error.unwrap().contains("User rejected the request."));
    }

    #[tokio::test]
    async fn failed_add_chain_is_network_switch_error() {
        let h = harness(&[ALICE], 8453);
        h.provider.forget_chain(1868);
        h.provider.fail_add(ProviderError::new(-32602, "Invalid rpc url"));
        h.wallet.connect().await.unwrap();

        assert_eq!(
            h.wallet.switch_network(1868).await,
            Err(WalletError::NetworkSwitch("Invalid rpc url".to_string()))
        );
    }

    #[tokio::test]
    async fn accounts_changed_to_empty_disconnects() {
        let h = harness(&[ALICE], 8453);
        h.wallet.connect().await.unwrap();

        let events = [
            WalletEvent::AccountsChanged(vec![BOB.to_string()]),
            WalletEvent::AccountsChanged(vec![ALICE.to_string()]),
            WalletEvent::AccountsChanged(vec![]),
        ];
        for event in events {
            if let WalletEvent::AccountsChanged(accounts) = &event {
                let accounts: Vec<&str> = accounts.iter().map(String::as_str).collect();
                h.provider.set_accounts(&accounts);
            }
            h.wallet.handle_event(event).await.unwrap();
        }
        let state = h.wallet.snapshot();
        assert_eq!(state.status(), ConnectionStatus::Disconnected);
        assert!(state.address.is_none());
    }

    #[tokio::test]
    async fn same_account_event_does_not_reconnect() {
        let h = harness(&[ALICE], 8453);
        h.wallet.connect().await.unwrap();
        h.wallet
            .handle_event(WalletEvent::AccountsChanged(vec![ALICE.to_uppercase().replacen("0X", "0x", 1)]))
            .await
            .unwrap();
        assert_eq!(h.provider.call_count("eth_accounts"), 1);
    }

    #[tokio::test]
    async fn chain_changed_reconnects_only_when_connected() {
        let h = harness(&[ALICE], 8453);
        h.wallet
            .handle_event(WalletEvent::ChainChanged(10))
            .await
            .unwrap();
        assert_eq!(h.provider.call_count("eth_accounts"), 0);

        h.wallet.connect().await.unwrap();
        h.provider.set_chain(10);
        h.wallet
            .handle_event(WalletEvent::ChainChanged(10))
            .await
            .unwrap();
        let state = h.wallet.snapshot();
        assert_eq!(state.chain_id, Some(10));
        assert_eq!(state.contracts.chain_id, Some(10));
    }

    #[tokio::test]
    async fn restore_reconnects_silently() {
        let h = harness(&[ALICE], 8453);
        h.store.set(keys::WALLET_CONNECTED, "true");
        h.store.set(keys::WALLET_ADDRESS, ALICE);

        assert_eq!(h.wallet.restore().await, Ok(Some(addr(ALICE))));
        assert_eq!(h.provider.call_count("eth_requestAccounts"), 0);
        assert!(h.wallet.snapshot().connected);
    }

    #[tokio::test]
    async fn restore_drops_revoked_session() {
        let h = harness(&[BOB], 8453);
        h.store.set(keys::WALLET_CONNECTED, "true");
        h.store.set(keys::WALLET_ADDRESS, ALICE);

        assert_eq!(h.wallet.restore().await, Ok(None));
        assert!(!h.wallet.snapshot().connected);
        assert!(h.store.get(keys::WALLET_CONNECTED).is_none());
    }

    #[tokio::test]
    async fn restore_without_flag_does_nothing() {
        let h = harness(&[ALICE], 8453);
        assert_eq!(h.wallet.restore().await, Ok(None));
        assert_eq!(h.provider.call_count("eth_accounts"), 0);
    }

    #[tokio::test]
    async fn referral_lookup_on_referral_chain() {
        let h = harness(&[ALICE], 8453);
        h.referrals.set_referrer(Some(addr(BOB)));
        h.wallet.connect().await.unwrap();

        let status = h.wallet.refresh_referral().await;
        assert!(status.on_referral_chain);
        assert!(status.has_referrer);
        assert_eq!(status.referrer, Some(addr(BOB)));
        assert_eq!(h.wallet.snapshot().referral, status);
    }

    #[tokio::test]
    async fn referral_lookup_skipped_off_chain() {
        let h = harness(&[ALICE], 10);
        h.wallet.connect().await.unwrap();
        assert_eq!(h.wallet.refresh_referral().await, ReferralStatus::default());
        assert_eq!(h.referrals.calls(), 0);
    }

    #[tokio::test]
    async fn referral_failure_degrades_to_defaults() {
        let h = harness(&[ALICE], 8453);
        h.referrals.fail();
        h.wallet.connect().await.unwrap();

        let status = h.wallet.refresh_referral().await;
        assert!(!status.has_referrer);
        assert!(status.referrer.is_none());
        assert!(h.wallet.snapshot().connected);
        assert!(h.wallet.snapshot().error.is_none());
    }

    #[tokio::test]
    async fn stale_referral_result_is_dropped() {
        let h = harness(&[ALICE], 8453);
        h.referrals.set_referrer(Some(addr(BOB)));
        h.referrals.set_latency(true);
        h.wallet.connect().await.unwrap();

        let (status, ()) = futures::join!(h.wallet.refresh_referral(), async {
            h.wallet.disconnect()
        });
        assert!(status.has_referrer);
        assert_eq!(h.wallet.snapshot().referral, ReferralStatus::default());
    }

    #[tokio::test]
    async fn checkin_sends_to_bound_contract() {
        let h = harness(&[ALICE], 8453);
        assert_eq!(h.wallet.checkin(0).await, Err(WalletError::NotConnected));

        h.wallet.connect().await.unwrap();
        let hash = h.wallet.checkin(1_000).await.unwrap();
        assert!(hash.starts_with("0x"));
        let sent = h.provider.sent_transactions();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].from, addr(ALICE));
        assert_eq!(
            Some(sent[0].to),
            h.wallet.snapshot().contracts.checkin.map(|c| c.0.address)
        );
    }

    #[tokio::test]
    async fn checkin_on_unknown_chain_fails() {
        let h = harness(&[ALICE], 1);
        h.wallet.connect().await.unwrap();
        assert!(!h.wallet.snapshot().on_supported_chain());
        assert_eq!(h.wallet.checkin(0).await, Err(WalletError::UnsupportedChain(1)));
    }

    #[tokio::test]
    async fn disconnect_during_switch_prompt_sticks() {
        let h = harness(&[ALICE], 8453);
        h.wallet.connect().await.unwrap();
        h.provider.set_latency(true);

        let (switched, ()) = futures::join!(h.wallet.switch_network(10), async {
            h.wallet.disconnect()
        });
        assert_eq!(switched, Err(WalletError::Superseded));

        let state = h.wallet.snapshot();
        assert!(!state.connected);
        assert!(state.address.is_none());
        assert!(h.store.get(keys::WALLET_CONNECTED).is_none());
        assert!(h.store.get(keys::WALLET_ADDRESS).is_none());
    }

    #[tokio::test]
    async fn failed_switch_after_disconnect_leaves_no_error() {
        let h = harness(&[ALICE], 8453);
        h.wallet.connect().await.unwrap();
        h.provider.set_latency(true);
        h.provider
            .fail_switch(ProviderError::new(USER_REJECTED_CODE, "User rejected the request."));

        let (switched, ()) = futures::join!(h.wallet.switch_network(10), async {
            h.wallet.disconnect()
        });
        assert_eq!(switched, Err(WalletError::Superseded));
        assert_eq!(h.wallet.snapshot(), WalletConnectionState::default());
    }

    #[tokio::test]
    async fn register_referral_requires_connection() {
        let h = harness(&[ALICE], 8453);
        assert_eq!(
            h.wallet.register_referral(addr(BOB)).await,
            Err(WalletError::NotConnected)
        );
        assert_eq!(h.provider.call_count("eth_sendTransaction"), 0);
    }

    #[tokio::test]
    async fn register_referral_off_base_is_unsupported() {
        let h = harness(&[ALICE], 10);
        h.wallet.connect().await.unwrap();
        assert_eq!(
            h.wallet.register_referral(addr(BOB)).await,
            Err(WalletError::UnsupportedChain(10))
        );
        assert!(h.provider.sent_transactions().is_empty());
    }

    #[tokio::test]
    async fn register_referral_sends_referrer_word() {
        let h = harness(&[ALICE], 8453);
        h.wallet.connect().await.unwrap();
        h.wallet.register_referral(addr(BOB)).await.unwrap();

        let sent = h.provider.sent_transactions();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].from, addr(ALICE));
        assert_eq!(sent[0].to, addr(chains::REFERRAL_CONTRACT));
        assert_eq!(sent[0].value, None);
        let expected = format!(
            "{}{:0>64}",
            crate::contracts::to_hex_data(&crate::contracts::selector(
                crate::contracts::ReferralContract::REGISTER
            )),
            &BOB[2..]
        );
        assert_eq!(sent[0].data, expected);
    }
}
