//! Shared fixtures: a scripted wallet provider and session builders.

#![allow(dead_code)]

use async_trait::async_trait;
use criptopay_session::storage::kv_store::WALLET_CONNECTED_KEY;
use criptopay_session::{
    KeyValueStore, MemoryKeyValueStore, ProviderError, ProviderEvent, SessionConfig,
    WalletProvider, WalletSession,
};
use serde_json::{json, Value as JsonValue};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::broadcast;

pub const ALICE: &str = "0x00000000000000000000000000000000000a11ce";
pub const BOB: &str = "0x0000000000000000000000000000000000000b0b";

/// 1.5 ether in wei, as a JSON-RPC quantity.
pub const ONE_AND_A_HALF_ETH: &str = "0x14d1120d7b160000";
/// 2 ether in wei.
pub const TWO_ETH: &str = "0x1bc16d674ec80000";

pub fn transient_error() -> ProviderError {
    ProviderError::new(-32000, "header not found")
}

/// Provider whose answers are set by the test.
pub struct StubProvider {
    accounts: Mutex<Vec<String>>,
    request_accounts_error: Mutex<Option<ProviderError>>,
    chain_id: Mutex<String>,
    /// Consumed front to back by `eth_getBalance`; falls back to `default_balance`.
    balance_script: Mutex<VecDeque<Result<String, ProviderError>>>,
    default_balance: Mutex<String>,
    switch_error: Mutex<Option<ProviderError>>,
    events: broadcast::Sender<ProviderEvent>,
    calls: Mutex<Vec<String>>,
    balance_calls: AtomicUsize,
}

impl StubProvider {
    pub fn new() -> Arc<Self> {
        let (events, _) = broadcast::channel(16);
        Arc::new(Self {
            accounts: Mutex::new(vec![ALICE.to_string()]),
            request_accounts_error: Mutex::new(None),
            chain_id: Mutex::new("0xaa36a7".to_string()),
            balance_script: Mutex::new(VecDeque::new()),
            default_balance: Mutex::new(ONE_AND_A_HALF_ETH.to_string()),
            switch_error: Mutex::new(None),
            events,
            calls: Mutex::new(Vec::new()),
            balance_calls: AtomicUsize::new(0),
        })
    }

    pub fn set_accounts(&self, accounts: &[&str]) {
        *self.accounts.lock().unwrap() = accounts.iter().map(|a| a.to_string()).collect();
    }

    pub fn reject_request_accounts(&self, err: ProviderError) {
        *self.request_accounts_error.lock().unwrap() = Some(err);
    }

    pub fn set_chain_id(&self, chain_id: &str) {
        *self.chain_id.lock().unwrap() = chain_id.to_string();
    }

    pub fn set_default_balance(&self, quantity: &str) {
        *self.default_balance.lock().unwrap() = quantity.to_string();
    }

    pub fn script_balances(&self, script: Vec<Result<&str, ProviderError>>) {
        let mut queue = self.balance_script.lock().unwrap();
        queue.clear();
        queue.extend(script.into_iter().map(|r| r.map(str::to_string)));
    }

    pub fn fail_switch(&self, err: ProviderError) {
        *self.switch_error.lock().unwrap() = Some(err);
    }

    pub fn emit(&self, event: ProviderEvent) {
        let _ = self.events.send(event);
    }

    pub fn balance_calls(&self) -> usize {
        self.balance_calls.load(Ordering::SeqCst)
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl WalletProvider for StubProvider {
    async fn request(&self, method: &str, params: JsonValue) -> Result<JsonValue, ProviderError> {
        self.calls.lock().unwrap().push(method.to_string());
        // Real providers answer asynchronously; let other tasks observe intermediate state.
        tokio::task::yield_now().await;
        match method {
            "eth_accounts" => Ok(json!(*self.accounts.lock().unwrap())),
            "eth_requestAccounts" => match self.request_accounts_error.lock().unwrap().clone() {
                Some(err) => Err(err),
                None => Ok(json!(*self.accounts.lock().unwrap())),
            },
            "eth_chainId" => Ok(json!(*self.chain_id.lock().unwrap())),
            "eth_getBalance" => {
                self.balance_calls.fetch_add(1, Ordering::SeqCst);
                let scripted = self.balance_script.lock().unwrap().pop_front();
                match scripted {
                    Some(result) => result.map(|q| json!(q)),
                    None => Ok(json!(*self.default_balance.lock().unwrap())),
                }
            }
            "wallet_switchEthereumChain" => {
                if let Some(err) = self.switch_error.lock().unwrap().clone() {
                    return Err(err);
                }
                let chain_id = params[0]["chainId"].as_str().unwrap_or_default().to_string();
                self.set_chain_id(&chain_id);
                self.emit(ProviderEvent::ChainChanged(chain_id));
                Ok(JsonValue::Null)
            }
            other => Err(ProviderError::new(4200, format!("unsupported method {}", other))),
        }
    }

    fn subscribe(&self) -> broadcast::Receiver<ProviderEvent> {
        self.events.subscribe()
    }
}

pub fn memory_store() -> Arc<MemoryKeyValueStore> {
    Arc::new(MemoryKeyValueStore::new())
}

pub fn flag_of(store: &MemoryKeyValueStore) -> Option<String> {
    store.get_item(WALLET_CONNECTED_KEY).unwrap()
}

pub fn set_flag(store: &MemoryKeyValueStore) {
    store.set_item(WALLET_CONNECTED_KEY, "true").unwrap();
}

/// Session over `stub` with zero delays and the dispatcher running. No start-up check.
pub fn session_with(stub: &Arc<StubProvider>, store: &Arc<MemoryKeyValueStore>) -> Arc<WalletSession> {
    let provider: Arc<dyn WalletProvider> = stub.clone();
    let store: Arc<dyn KeyValueStore> = store.clone();
    let session = Arc::new(WalletSession::new(
        Some(provider),
        store,
        SessionConfig::immediate(),
    ));
    session.spawn_event_dispatcher();
    session
}

/// Upper bound for waiting on background updates.
pub const WAIT: Duration = Duration::from_secs(2);
