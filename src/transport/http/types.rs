use crate::app::wallet_session::WalletSession;
use crate::domain::network::NetworkEntry;
use crate::domain::session::Session;
use crate::domain::transfer::TransferKind;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::sync::Arc;
use utoipa::ToSchema;

#[derive(Clone)]
pub struct AppState {
    pub session: Arc<WalletSession>,
}

#[derive(Serialize, Debug, ToSchema)]
pub struct ApiResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Object)]
    pub data: Option<JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ApiResponse {
    pub fn ok(data: JsonValue) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn err(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
        }
    }
}

/// Snapshot of the wallet session as seen by consumers.
#[derive(Serialize, Debug, ToSchema)]
pub struct SessionView {
    pub account: String,
    /// Native balance in ether, 4 decimals.
    pub balance: String,
    pub network: String,
    pub is_connected: bool,
    pub is_connecting: bool,
    pub is_checking_connection: bool,
}

impl From<&Session> for SessionView {
    fn from(s: &Session) -> Self {
        Self {
            account: s.account().to_string(),
            balance: s.balance().to_string(),
            network: s.network().to_string(),
            is_connected: s.is_connected(),
            is_connecting: s.is_connecting(),
            is_checking_connection: s.is_checking_connection(),
        }
    }
}

#[derive(Serialize, Debug, ToSchema)]
pub struct NetworkView {
    pub chain_id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_contract: Option<String>,
}

impl From<&NetworkEntry> for NetworkView {
    fn from(n: &NetworkEntry) -> Self {
        Self {
            chain_id: n.chain_id.to_string(),
            name: n.name.to_string(),
            payment_contract: Some(n.payment_contract.to_string()),
        }
    }
}

#[derive(Deserialize, Debug, ToSchema)]
pub struct SwitchNetworkRequest {
    /// Hex chain id, e.g. `0xaa36a7`.
    pub chain_id: String,
}

#[derive(Deserialize, Debug, Clone, Copy, Default, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum TransferKindParam {
    #[default]
    Native,
    ContractPayment,
}

impl From<TransferKindParam> for TransferKind {
    fn from(k: TransferKindParam) -> Self {
        match k {
            TransferKindParam::Native => TransferKind::Native,
            TransferKindParam::ContractPayment => TransferKind::ContractPayment,
        }
    }
}

#[derive(Deserialize, Debug, ToSchema)]
pub struct ValidateTransferRequest {
    pub recipient: String,
    /// Ether amount as typed, e.g. `"0.25"`.
    pub amount: String,
    #[serde(default)]
    pub kind: TransferKindParam,
}
