//! The wallet session service.
//!
//! Single source of truth for the wallet connection. It:
//! 1.  Publishes account, balance, network and the three status flags as observables.
//! 2.  Mediates every provider call (connect, reconnect, chain switch, balance).
//! 3.  Applies provider events (`accountsChanged`, `chainChanged`) in emission order.
//! 4.  Persists the "previously connected" flag so the next start can reconnect silently.

use crate::domain::balance::format_balance;
use crate::domain::error::WalletError;
use crate::domain::network::network_name;
use crate::domain::session::{Observable, Session, SessionState};
use crate::infra::config::SessionConfig;
use crate::infra::provider::{ProviderError, ProviderEvent, ProviderHandle, WalletProvider};
use crate::storage::kv_store::{KeyValueStore, WALLET_CONNECTED_KEY};
use std::sync::{Arc, Weak};
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

pub struct WalletSession {
    state: SessionState,
    /// The injected provider. `None` means no wallet is installed.
    provider: Option<Arc<dyn WalletProvider>>,
    store: Arc<dyn KeyValueStore>,
    config: SessionConfig,
}

impl WalletSession {
    /// Creates a session in the initial state (checking pending). Nothing is called yet.
    pub fn new(
        provider: Option<Arc<dyn WalletProvider>>,
        store: Arc<dyn KeyValueStore>,
        config: SessionConfig,
    ) -> Self {
        Self {
            state: SessionState::new(),
            provider,
            store,
            config,
        }
    }

    /// Creates the session, starts the event dispatcher and runs the start-up connection check.
    pub async fn start(
        provider: Option<Arc<dyn WalletProvider>>,
        store: Arc<dyn KeyValueStore>,
        config: SessionConfig,
    ) -> Arc<Self> {
        let session = Arc::new(Self::new(provider, store, config));
        session.spawn_event_dispatcher();
        session.check_connection().await;
        session
    }

    pub fn has_provider(&self) -> bool {
        self.provider.is_some()
    }

    // --- Observables ---

    pub fn snapshot(&self) -> Session {
        self.state.snapshot()
    }

    /// Whole-snapshot receiver, for consumers that need several fields at once.
    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.state.subscribe()
    }

    pub fn account(&self) -> Observable<String> {
        self.state.observe(|s| s.account().to_string())
    }

    pub fn balance(&self) -> Observable<String> {
        self.state.observe(|s| s.balance().to_string())
    }

    pub fn network(&self) -> Observable<String> {
        self.state.observe(|s| s.network().to_string())
    }

    pub fn is_connected(&self) -> Observable<bool> {
        self.state.observe(Session::is_connected)
    }

    pub fn is_connecting(&self) -> Observable<bool> {
        self.state.observe(Session::is_connecting)
    }

    pub fn is_checking_connection(&self) -> Observable<bool> {
        self.state.observe(Session::is_checking_connection)
    }

    // --- Commands ---

    /// Silently restores a previous connection. Returns whether the wallet is connected.
    ///
    /// Requires the persisted flag and a provider; only `eth_accounts` is used, so the
    /// wallet never prompts. Any failure clears the flag.
    pub async fn check_connection(&self) -> bool {
        self.state.set_checking(true);
        let connected = self.restore_connection().await;
        self.state.set_checking(false);
        connected
    }

    /// Alias for [`check_connection`](Self::check_connection).
    pub async fn auto_reconnect(&self) -> bool {
        self.check_connection().await
    }

    async fn restore_connection(&self) -> bool {
        let provider = match (&self.provider, self.flag_is_set()) {
            (Some(provider), true) => provider.clone(),
            _ => {
                info!("no previous wallet connection found");
                self.state.reset_connection();
                return false;
            }
        };

        debug!("checking existing wallet connection");
        let handle = ProviderHandle::new(provider);
        let account = match handle.accounts().await {
            Ok(accounts) => match accounts.into_iter().next() {
                Some(account) => account,
                None => {
                    info!("no accounts exposed; wallet is locked or permission was revoked");
                    self.forget_connection();
                    return false;
                }
            },
            Err(e) => {
                warn!(error = %e, "failed to reconnect wallet");
                self.forget_connection();
                return false;
            }
        };

        match handle.chain_id().await {
            Ok(chain_id) => self.apply_chain(&chain_id),
            Err(e) => {
                warn!(error = %e, "failed to read chain id while reconnecting");
                self.forget_connection();
                return false;
            }
        }

        info!(account = %account, "wallet reconnected");
        self.state.set_account(account.clone());
        self.update_balance(&account).await;
        true
    }

    /// Requests account access (the wallet may prompt) and returns the selected account.
    pub async fn connect(&self) -> Result<String, WalletError> {
        let provider = self.provider.clone().ok_or(WalletError::NoProvider)?;

        self.state.set_connecting(true);
        let result = self.establish(provider).await;
        if let Err(e) = &result {
            warn!(error = %e, "wallet connection failed");
            self.forget_connection();
        }
        self.state.set_connecting(false);
        result
    }

    async fn establish(&self, provider: Arc<dyn WalletProvider>) -> Result<String, WalletError> {
        let handle = ProviderHandle::new(provider);
        let account = handle
            .request_accounts()
            .await?
            .into_iter()
            .next()
            .ok_or(WalletError::NoAccounts)?;

        self.state.set_account(account.clone());
        self.set_flag();

        let chain_id = handle.chain_id().await?;
        self.apply_chain(&chain_id);

        let network = network_name(&chain_id);
        info!(account = %account, network = %network, "wallet connected");
        self.update_balance(&account).await;
        Ok(account)
    }

    /// Resets account and balance and forgets the persisted connection. Never fails.
    pub fn disconnect(&self) {
        self.state.reset_connection();
        self.clear_flag();
        info!("wallet disconnected");
    }

    /// Asks the wallet to switch to `chain_id`.
    ///
    /// Network name and balance are not touched here; the provider's
    /// `chainChanged` event updates them once the switch lands.
    pub async fn switch_network(&self, chain_id: &str) -> Result<(), WalletError> {
        let provider = self.provider.clone().ok_or(WalletError::NoProvider)?;
        info!(chain_id = %chain_id, "switching network");

        ProviderHandle::new(provider)
            .switch_chain(chain_id)
            .await
            .map_err(|e| {
                warn!(error = %e, chain_id = %chain_id, "network switch failed");
                if e.code == ProviderError::UNRECOGNIZED_CHAIN {
                    WalletError::UnconfiguredNetwork {
                        chain_id: chain_id.to_string(),
                    }
                } else {
                    e.into()
                }
            })
    }

    /// Re-reads the balance of the current account. No-op without an account.
    pub async fn refresh_balance(&self) {
        let account = self.state.snapshot().account().to_string();
        if account.is_empty() {
            debug!("no account available to refresh balance");
            return;
        }
        self.update_balance(&account).await;
    }

    // --- Balance refresher ---

    /// Fetches the balance with retries. After the last failure the previous value stays.
    /// A result that lands after `account` was dropped or replaced is discarded.
    async fn update_balance(&self, account: &str) {
        let Some(provider) = self.provider.clone() else {
            debug!("no provider available to update balance");
            return;
        };

        let attempts = self.config.balance_attempts.max(1);
        let mut last_error = None;
        for attempt in 1..=attempts {
            // Fresh handle per attempt so a chain switch in between is picked up.
            let handle = ProviderHandle::new(provider.clone());
            match handle.balance(account).await {
                Ok(wei) => {
                    let formatted = format_balance(wei);
                    if self.state.set_balance_for(account, formatted.clone()) {
                        debug!(account = %account, balance = %formatted, "balance fetched");
                    } else {
                        debug!(account = %account, "account no longer active; balance discarded");
                    }
                    return;
                }
                Err(e) => {
                    warn!(attempt, error = %e, "error fetching balance");
                    last_error = Some(e);
                    if attempt < attempts {
                        tokio::time::sleep(self.config.balance_retry_delay).await;
                    }
                }
            }
        }

        let err = WalletError::BalanceFetch(
            last_error.map(|e| e.to_string()).unwrap_or_default(),
        );
        error!(attempts, error = %err, "keeping previous balance");
    }

    // --- Event dispatcher ---

    /// Starts the task that applies provider events. `None` without a provider.
    ///
    /// The dispatcher only holds a weak reference and stops when the session is
    /// dropped or the provider closes its event channel.
    pub fn spawn_event_dispatcher(self: &Arc<Self>) -> Option<JoinHandle<()>> {
        let mut events = self.provider.as_ref()?.subscribe();
        let weak: Weak<Self> = Arc::downgrade(self);

        Some(tokio::spawn(async move {
            loop {
                let event = match events.recv().await {
                    Ok(event) => event,
                    Err(RecvError::Lagged(skipped)) => {
                        warn!(skipped, "provider events dropped");
                        continue;
                    }
                    Err(RecvError::Closed) => break,
                };
                let Some(session) = weak.upgrade() else {
                    break;
                };
                session.dispatch(event);
            }
            debug!("provider event dispatcher stopped");
        }))
    }

    /// Applies one event. State changes happen inline; balance refreshes are spawned
    /// and may overlap with later events (last write wins).
    fn dispatch(self: &Arc<Self>, event: ProviderEvent) {
        match event {
            ProviderEvent::AccountsChanged(accounts) => match accounts.into_iter().next() {
                None => self.disconnect(),
                Some(account) => {
                    info!(account = %account, "account changed");
                    self.state.set_account(account.clone());
                    let session = Arc::clone(self);
                    tokio::spawn(async move {
                        session.update_balance(&account).await;
                    });
                }
            },
            ProviderEvent::ChainChanged(chain_id) => {
                info!(chain_id = %chain_id, "chain changed");
                self.apply_chain(&chain_id);

                let account = self.state.snapshot().account().to_string();
                if account.is_empty() {
                    return;
                }
                let session = Arc::clone(self);
                tokio::spawn(async move {
                    // The provider may not serve the new chain right after the event.
                    tokio::time::sleep(session.config.chain_settle_delay).await;
                    session.update_balance(&account).await;
                });
            }
        }
    }

    fn apply_chain(&self, chain_id: &str) {
        let name = network_name(chain_id);
        debug!(chain_id = %chain_id, network = %name, "network updated");
        self.state.set_network(name);
    }

    // --- Persisted flag ---

    fn flag_is_set(&self) -> bool {
        match self.store.get_item(WALLET_CONNECTED_KEY) {
            Ok(value) => value.as_deref() == Some("true"),
            Err(e) => {
                warn!(error = %e, "failed to read connection flag");
                false
            }
        }
    }

    fn set_flag(&self) {
        if let Err(e) = self.store.set_item(WALLET_CONNECTED_KEY, "true") {
            warn!(error = %e, "failed to persist connection flag");
        }
    }

    fn clear_flag(&self) {
        if let Err(e) = self.store.remove_item(WALLET_CONNECTED_KEY) {
            warn!(error = %e, "failed to clear connection flag");
        }
    }

    /// Failed connect/reconnect: drop the account, its balance and the persisted flag.
    fn forget_connection(&self) {
        self.state.reset_connection();
        self.clear_flag();
    }
}
