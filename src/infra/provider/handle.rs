// Typed wrapper over a raw provider, rebuilt for each use so it never caches chain state.

use super::{ProviderError, WalletProvider};
use crate::domain::balance::parse_quantity;
use primitive_types::U256;
use serde_json::{json, Value as JsonValue};
use std::sync::Arc;

pub struct ProviderHandle {
    inner: Arc<dyn WalletProvider>,
}

impl ProviderHandle {
    pub fn new(inner: Arc<dyn WalletProvider>) -> Self {
        Self { inner }
    }

    /// Accounts already exposed to us (`eth_accounts`). Never prompts.
    pub async fn accounts(&self) -> Result<Vec<String>, ProviderError> {
        let value = self.inner.request("eth_accounts", json!([])).await?;
        parse_accounts(value)
    }

    /// Asks the wallet for account access (`eth_requestAccounts`). May prompt.
    pub async fn request_accounts(&self) -> Result<Vec<String>, ProviderError> {
        let value = self.inner.request("eth_requestAccounts", json!([])).await?;
        parse_accounts(value)
    }

    pub async fn chain_id(&self) -> Result<String, ProviderError> {
        let value = self.inner.request("eth_chainId", json!([])).await?;
        value
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| ProviderError::internal(format!("unexpected eth_chainId result: {}", value)))
    }

    /// Native balance of `account` at the latest block, in wei.
    pub async fn balance(&self, account: &str) -> Result<U256, ProviderError> {
        let value = self
            .inner
            .request("eth_getBalance", json!([account, "latest"]))
            .await?;
        let quantity = value.as_str().ok_or_else(|| {
            ProviderError::internal(format!("unexpected eth_getBalance result: {}", value))
        })?;
        parse_quantity(quantity).map_err(|e| ProviderError::internal(e.to_string()))
    }

    pub async fn switch_chain(&self, chain_id: &str) -> Result<(), ProviderError> {
        self.inner
            .request("wallet_switchEthereumChain", json!([{ "chainId": chain_id }]))
            .await?;
        Ok(())
    }
}

fn parse_accounts(value: JsonValue) -> Result<Vec<String>, ProviderError> {
    serde_json::from_value::<Vec<String>>(value)
        .map_err(|e| ProviderError::internal(format!("unexpected accounts result: {}", e)))
}
