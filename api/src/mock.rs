//! In-memory stand-ins for the wallet, the referral contract and the
//! subgraphs.

use std::{
    cell::{Cell, RefCell},
    collections::{HashMap, HashSet},
    rc::Rc,
};

use crate::{
    address::Address,
    chains::{AddChainParams, ChainConfig},
    contracts::TransactionRequest,
    error::{ProviderError, QueryError, ReferralLookupError},
    provider::{
        EventHandler, Subscription, WalletEvent, WalletProvider, UNRECOGNIZED_CHAIN_CODE,
        USER_REJECTED_CODE,
    },
    state::{ChainGlobalStats, CheckinRecord, DailyStats, NavigatorStats},
    subgraph::StatsSource,
    wallet::ReferralReader,
};

type Handlers = Rc<RefCell<Vec<Option<EventHandler>>>>;

#[derive(Default)]
pub struct MockProvider {
    accounts: RefCell<Vec<String>>,
    grant: RefCell<Option<Vec<String>>>,
    chain_id: Cell<u64>,
    unknown_chains: RefCell<HashSet<u64>>,
    switch_error: RefCell<Option<ProviderError>>,
    add_error: RefCell<Option<ProviderError>>,
    latency: Cell<bool>,
    calls: RefCell<HashMap<&'static str, usize>>,
    added: RefCell<Vec<AddChainParams>>,
    sent: RefCell<Vec<TransactionRequest>>,
    handlers: Handlers,
}

impl MockProvider {
    pub fn new(accounts: &[&str], chain_id: u64) -> Self {
        let provider = Self::default();
        provider.set_accounts(accounts);
        provider.chain_id.set(chain_id);
        provider
    }

    /// Makes `eth_accounts` and `wallet_switchEthereumChain` yield once before
    /// answering.
    pub fn set_latency(&self, on: bool) {
        self.latency.set(on);
    }

    pub fn set_accounts(&self, accounts: &[&str]) {
        *self.accounts.borrow_mut() = accounts.iter().map(|a| a.to_string()).collect();
    }

    /// `eth_requestAccounts` approves with `accounts`. Rejects with 4001 otherwise.
    pub fn grant_on_request(&self, accounts: &[&str]) {
        *self.grant.borrow_mut() = Some(accounts.iter().map(|a| a.to_string()).collect());
    }

    pub fn set_chain(&self, chain_id: u64) {
        self.chain_id.set(chain_id);
    }

    /// Switching to `chain_id` fails with 4902 until it is added.
    pub fn forget_chain(&self, chain_id: u64) {
        self.unknown_chains.borrow_mut().insert(chain_id);
    }

    pub fn fail_switch(&self, err: ProviderError) {
        *self.switch_error.borrow_mut() = Some(err);
    }

    pub fn fail_add(&self, err: ProviderError) {
        *self.add_error.borrow_mut() = Some(err);
    }

    pub fn call_count(&self, method: &str) -> usize {
        self.calls.borrow().get(method).copied().unwrap_or(0)
    }

    pub fn added_chains(&self) -> Vec<AddChainParams> {
        self.added.borrow().clone()
    }

    pub fn sent_transactions(&self) -> Vec<TransactionRequest> {
        self.sent.borrow().clone()
    }

    pub fn subscriber_count(&self) -> usize {
        self.handlers.borrow().iter().filter(|h| h.is_some()).count()
    }

    pub fn emit(&self, event: WalletEvent) {
        for handler in self.handlers.borrow().iter().flatten() {
            handler(event.clone());
        }
    }

    fn record(&self, method: &'static str) {
        *self.calls.borrow_mut().entry(method).or_default() += 1;
    }
}

impl WalletProvider for MockProvider {
    async fn get_accounts(&self) -> Result<Vec<String>, ProviderError> {
        self.record("eth_accounts");
        if self.latency.get() {
            tokio::task::yield_now().await;
        }
        Ok(self.accounts.borrow().clone())
    }

    async fn request_accounts(&self) -> Result<Vec<String>, ProviderError> {
        self.record("eth_requestAccounts");
        match self.grant.borrow().clone() {
            Some(accounts) => {
                *self.accounts.borrow_mut() = accounts.clone();
                Ok(accounts)
            }
            None => Err(ProviderError::new(
                USER_REJECTED_CODE,
                "User rejected the request.",
            )),
        }
    }

    async fn chain_id(&self) -> Result<u64, ProviderError> {
        self.record("eth_chainId");
        Ok(self.chain_id.get())
    }

    async fn switch_chain(&self, chain_id: u64) -> Result<(), ProviderError> {
        self.record("wallet_switchEthereumChain");
        if self.latency.get() {
            tokio::task::yield_now().await;
        }
        if let Some(err) = self.switch_error.borrow().clone() {
            return Err(err);
        }
        if self.unknown_chains.borrow().contains(&chain_id) {
            return Err(ProviderError::new(
                UNRECOGNIZED_CHAIN_CODE,
                format!("Unrecognized chain ID {chain_id:#x}"),
            ));
        }
        self.chain_id.set(chain_id);
        Ok(())
    }

    async fn add_chain(&self, params: &AddChainParams) -> Result<(), ProviderError> {
        self.record("wallet_addEthereumChain");
        if let Some(err) = self.add_error.borrow().clone() {
            return Err(err);
        }
        self.added.borrow_mut().push(params.clone());
        if let Some(id) = crate::provider::parse_chain_id(&params.chain_id) {
            self.unknown_chains.borrow_mut().remove(&id);
        }
        Ok(())
    }

    async fn send_transaction(&self, tx: &TransactionRequest) -> Result<String, ProviderError> {
        self.record("eth_sendTransaction");
        let mut sent = self.sent.borrow_mut();
        sent.push(tx.clone());
        Ok(format!("0x{:064x}", sent.len()))
    }

    fn subscribe(&self, handler: EventHandler) -> Subscription {
        let index = {
            let mut handlers = self.handlers.borrow_mut();
            handlers.push(Some(handler));
            handlers.len() - 1
        };
        let handlers = self.handlers.clone();
        Subscription::new(move || {
            if let Some(slot) = handlers.borrow_mut().get_mut(index) {
                *slot = None;
            }
        })
    }
}

#[derive(Default)]
pub struct MockReferrals {
    referrer: Cell<Option<Address>>,
    failing: Cell<bool>,
    latency: Cell<bool>,
    calls: Cell<usize>,
}

impl MockReferrals {
    pub fn set_referrer(&self, referrer: Option<Address>) {
        self.referrer.set(referrer);
    }

    pub fn fail(&self) {
        self.failing.set(true);
    }

    pub fn set_latency(&self, on: bool) {
        self.latency.set(on);
    }

    pub fn calls(&self) -> usize {
        self.calls.get()
    }
}

impl ReferralReader for MockReferrals {
    async fn referrer_of(
        &self,
        _chain: &ChainConfig,
        _user: Address,
    ) -> Result<Option<Address>, ReferralLookupError> {
        self.calls.set(self.calls.get() + 1);
        if self.latency.get() {
            tokio::task::yield_now().await;
        }
        if self.failing.get() {
            return Err(QueryError::Rpc {
                code: -32000,
                message: "execution reverted".to_string(),
            }
            .into());
        }
        Ok(self.referrer.get())
    }
}

/// Canned per-chain subgraph answers.
#[derive(Default)]
pub struct MockStats {
    navigators: RefCell<HashMap<(u64, Address), NavigatorStats>>,
    globals: RefCell<HashMap<u64, ChainGlobalStats>>,
    leaderboards: RefCell<HashMap<u64, Vec<NavigatorStats>>>,
    checkins: RefCell<HashMap<u64, Vec<CheckinRecord>>>,
    daily: RefCell<HashMap<u64, Vec<DailyStats>>>,
    failing: RefCell<HashSet<u64>>,
}

impl MockStats {
    pub fn set_navigator(&self, chain_id: u64, stats: NavigatorStats) {
        self.navigators
            .borrow_mut()
            .insert((chain_id, stats.address), stats);
    }

    pub fn set_global(&self, chain_id: u64, navigators: u64, checkins: u64, tax: u128) {
        self.globals.borrow_mut().insert(
            chain_id,
            ChainGlobalStats {
                chain_id,
                total_navigators: navigators,
                total_checkins: checkins,
                total_tax_collected: tax,
            },
        );
    }

    pub fn set_leaderboard(&self, chain_id: u64, rows: Vec<NavigatorStats>) {
        self.leaderboards.borrow_mut().insert(chain_id, rows);
    }

    /// `(timestamp, streak)` pairs, newest first.
    pub fn set_checkins(&self, chain_id: u64, rows: Vec<(u64, u32)>) {
        let records = rows
            .into_iter()
            .map(|(timestamp, streak)| CheckinRecord {
                chain_id,
                id: format!("{chain_id}-{timestamp}"),
                timestamp,
                block_number: timestamp / 2,
                transaction_hash: format!("0x{timestamp:064x}"),
                streak,
                tax_paid: 0,
            })
            .collect();
        self.checkins.borrow_mut().insert(chain_id, records);
    }

    /// `(day, checkins)` pairs.
    pub fn set_daily(&self, chain_id: u64, rows: Vec<(u64, u64)>) {
        let days = rows
            .into_iter()
            .map(|(day, checkins)| DailyStats {
                day,
                checkins,
                unique_navigators: checkins,
                tax_collected: 0,
            })
            .collect();
        self.daily.borrow_mut().insert(chain_id, days);
    }

    /// Every query against `chain_id` fails.
    pub fn fail_chain(&self, chain_id: u64) {
        self.failing.borrow_mut().insert(chain_id);
    }

    fn check(&self, chain: &ChainConfig) -> Result<u64, QueryError> {
        let chain_id = chain.chain_id();
        if self.failing.borrow().contains(&chain_id) {
            return Err(QueryError::GraphQl("indexing_error".to_string()));
        }
        Ok(chain_id)
    }
}

impl StatsSource for MockStats {
    async fn navigator(
        &self,
        chain: &ChainConfig,
        address: Address,
    ) -> Result<Option<NavigatorStats>, QueryError> {
        let chain_id = self.check(chain)?;
        Ok(self.navigators.borrow().get(&(chain_id, address)).cloned())
    }

    async fn global_stats(&self, chain: &ChainConfig) -> Result<ChainGlobalStats, QueryError> {
        let chain_id = self.check(chain)?;
        self.globals
            .borrow()
            .get(&chain_id)
            .cloned()
            .ok_or(QueryError::MissingData)
    }

    async fn leaderboard(
        &self,
        chain: &ChainConfig,
        first: usize,
    ) -> Result<Vec<NavigatorStats>, QueryError> {
        let chain_id = self.check(chain)?;
        let mut rows = self
            .leaderboards
            .borrow()
            .get(&chain_id)
            .cloned()
            .unwrap_or_default();
        rows.truncate(first);
        Ok(rows)
    }

    async fn user_checkins(
        &self,
        chain: &ChainConfig,
        _address: Address,
        first: usize,
    ) -> Result<Vec<CheckinRecord>, QueryError> {
        let chain_id = self.check(chain)?;
        let mut rows = self.checkins.borrow().get(&chain_id).cloned().unwrap_or_default();
        rows.truncate(first);
        Ok(rows)
    }

    async fn daily_stats(
        &self,
        chain: &ChainConfig,
        days: usize,
    ) -> Result<Vec<DailyStats>, QueryError> {
        let chain_id = self.check(chain)?;
        let mut rows = self.daily.borrow().get(&chain_id).cloned().unwrap_or_default();
        rows.truncate(days);
        Ok(rows)
    }
}
