//! Wallet provider abstraction (EIP-1193 style).
//!
//! A provider answers `request(method, params)` calls and broadcasts
//! [`ProviderEvent`]s when the selected accounts or chain change.

pub mod handle;
pub mod http;

pub use handle::ProviderHandle;
pub use http::HttpProvider;

use async_trait::async_trait;
use serde_json::Value as JsonValue;
use thiserror::Error;
use tokio::sync::broadcast;

/// Capacity of provider event channels.
pub const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Error returned by a provider request, carrying the EIP-1193 / JSON-RPC code.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("provider error {code}: {message}")]
pub struct ProviderError {
    pub code: i64,
    pub message: String,
}

impl ProviderError {
    /// The user rejected the request.
    pub const USER_REJECTED: i64 = 4001;
    /// The requested chain has not been added to the wallet.
    pub const UNRECOGNIZED_CHAIN: i64 = 4902;
    /// JSON-RPC internal error; also used for transport failures.
    pub const INTERNAL: i64 = -32603;

    pub fn new(code: i64, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(Self::INTERNAL, message)
    }
}

/// Notifications emitted by the provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderEvent {
    /// `accountsChanged`: the exposed accounts, first one selected. Empty means locked/disconnected.
    AccountsChanged(Vec<String>),
    /// `chainChanged`: the new hex chain id.
    ChainChanged(String),
}

#[async_trait]
pub trait WalletProvider: Send + Sync {
    /// Sends one request. `params` is the JSON-RPC params array.
    async fn request(&self, method: &str, params: JsonValue) -> Result<JsonValue, ProviderError>;

    /// Subscribes to provider events. Only events sent after this call are received.
    fn subscribe(&self) -> broadcast::Receiver<ProviderEvent>;
}
