//! JSON-RPC provider backed by an Ethereum node over HTTP.
//!
//! Nodes never prompt, so `eth_requestAccounts` is answered with the node's
//! `eth_accounts`. Nodes do not push events either: [`HttpProvider::spawn_change_watcher`]
//! polls the chain id and account list and broadcasts a [`ProviderEvent`] whenever one changes.

use super::{ProviderError, ProviderEvent, WalletProvider, EVENT_CHANNEL_CAPACITY};
use crate::infra::config;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value as JsonValue};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{debug, info};

#[derive(Deserialize)]
struct RpcResponse {
    #[serde(default)]
    result: Option<JsonValue>,
    #[serde(default)]
    error: Option<RpcErrorBody>,
}

#[derive(Deserialize)]
struct RpcErrorBody {
    code: i64,
    message: String,
}

pub struct HttpProvider {
    client: reqwest::Client,
    rpc_url: String,
    next_id: AtomicU64,
    events: broadcast::Sender<ProviderEvent>,
}

impl HttpProvider {
    pub fn new(rpc_url: impl Into<String>) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Ok(Self {
            client,
            rpc_url: rpc_url.into(),
            next_id: AtomicU64::new(1),
            events,
        })
    }

    /// Builds a provider from `CRIPTOPAY_RPC_URL`. `None` when unset (no provider injected).
    pub fn from_env() -> anyhow::Result<Option<Self>> {
        config::rpc_url().map(Self::new).transpose()
    }

    pub fn rpc_url(&self) -> &str {
        &self.rpc_url
    }

    async fn call(&self, method: &str, params: JsonValue) -> Result<JsonValue, ProviderError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let body = json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": method,
            "params": params,
        });

        let response = self
            .client
            .post(&self.rpc_url)
            .json(&body)
            .send()
            .await
            .map_err(|e| ProviderError::internal(format!("RPC request failed: {}", e)))?;

        let parsed: RpcResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::internal(format!("invalid RPC response: {}", e)))?;

        if let Some(err) = parsed.error {
            return Err(ProviderError::new(err.code, err.message));
        }
        Ok(parsed.result.unwrap_or(JsonValue::Null))
    }

    /// Polls the node every `every` and emits change events. Stops once the provider is dropped.
    pub fn spawn_change_watcher(self: &Arc<Self>, every: Duration) -> JoinHandle<()> {
        let weak: Weak<Self> = Arc::downgrade(self);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(every);
            let mut last_chain: Option<String> = None;
            let mut last_accounts: Option<Vec<String>> = None;

            loop {
                ticker.tick().await;
                let Some(provider) = weak.upgrade() else {
                    break;
                };

                match provider.call("eth_chainId", json!([])).await {
                    Ok(JsonValue::String(chain_id)) => {
                        if last_chain.as_ref().is_some_and(|c| *c != chain_id) {
                            info!(chain_id = %chain_id, "node chain changed");
                            let _ = provider.events.send(ProviderEvent::ChainChanged(chain_id.clone()));
                        }
                        last_chain = Some(chain_id);
                    }
                    Ok(other) => debug!(result = %other, "unexpected eth_chainId result"),
                    Err(e) => debug!(error = %e, "chain poll failed"),
                }

                match provider.call("eth_accounts", json!([])).await {
                    Ok(value) => match serde_json::from_value::<Vec<String>>(value) {
                        Ok(accounts) => {
                            if last_accounts.as_ref().is_some_and(|a| *a != accounts) {
                                info!(count = accounts.len(), "node accounts changed");
                                let _ = provider
                                    .events
                                    .send(ProviderEvent::AccountsChanged(accounts.clone()));
                            }
                            last_accounts = Some(accounts);
                        }
                        Err(e) => debug!(error = %e, "unexpected eth_accounts result"),
                    },
                    Err(e) => debug!(error = %e, "accounts poll failed"),
                }
            }
        })
    }
}

#[async_trait]
impl WalletProvider for HttpProvider {
    async fn request(&self, method: &str, params: JsonValue) -> Result<JsonValue, ProviderError> {
        let method = match method {
            "eth_requestAccounts" => "eth_accounts",
            other => other,
        };
        self.call(method, params).await
    }

    fn subscribe(&self) -> broadcast::Receiver<ProviderEvent> {
        self.events.subscribe()
    }
}
