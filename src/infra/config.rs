//! Centralized configuration (environment variables + defaults).

use std::path::PathBuf;
use std::time::Duration;

/// Wallet JSON-RPC URL. Unset means no provider is injected.
pub fn rpc_url() -> Option<String> {
    std::env::var("CRIPTOPAY_RPC_URL")
        .ok()
        .filter(|v| !v.trim().is_empty())
}

/// File backing the persisted key-value store (holds the `walletConnected` flag).
pub fn state_file() -> PathBuf {
    std::env::var("CRIPTOPAY_STATE_FILE")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("wallet_state.json"))
}

/// Address the HTTP API binds to.
pub fn bind_addr() -> String {
    std::env::var("API_BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string())
}

/// How often the HTTP provider polls the node for chain/account changes.
pub fn provider_poll_interval() -> anyhow::Result<Duration> {
    env_millis("PROVIDER_POLL_INTERVAL_MS", 2_000).map(|d| d.max(Duration::from_millis(100)))
}

/// Tunables of the wallet session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// Balance fetch attempts before keeping the stale value.
    pub balance_attempts: u32,
    /// Pause between failed balance attempts.
    pub balance_retry_delay: Duration,
    /// Wait after `chainChanged` before re-reading the balance.
    pub chain_settle_delay: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            balance_attempts: 3,
            balance_retry_delay: Duration::from_millis(500),
            chain_settle_delay: Duration::from_millis(1_000),
        }
    }
}

impl SessionConfig {
    /// Zero delays; for tests and scripted providers.
    pub fn immediate() -> Self {
        Self {
            balance_retry_delay: Duration::ZERO,
            chain_settle_delay: Duration::ZERO,
            ..Self::default()
        }
    }

    pub fn from_env() -> anyhow::Result<Self> {
        let defaults = Self::default();
        let balance_attempts = match std::env::var("BALANCE_FETCH_ATTEMPTS") {
            Ok(v) => v
                .parse::<u32>()
                .map_err(|e| anyhow::anyhow!("BALANCE_FETCH_ATTEMPTS must be a valid u32: {}", e))?
                .max(1),
            Err(_) => defaults.balance_attempts,
        };
        Ok(Self {
            balance_attempts,
            balance_retry_delay: env_millis(
                "BALANCE_RETRY_DELAY_MS",
                defaults.balance_retry_delay.as_millis() as u64,
            )?,
            chain_settle_delay: env_millis(
                "CHAIN_SETTLE_DELAY_MS",
                defaults.chain_settle_delay.as_millis() as u64,
            )?,
        })
    }
}

fn env_millis(key: &str, default_ms: u64) -> anyhow::Result<Duration> {
    match std::env::var(key) {
        Ok(v) => v
            .parse::<u64>()
            .map(Duration::from_millis)
            .map_err(|e| anyhow::anyhow!("{} must be a number of milliseconds: {}", key, e)),
        Err(_) => Ok(Duration::from_millis(default_ms)),
    }
}
