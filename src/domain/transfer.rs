//! Validation of the transfer form before anything reaches the wallet.

use crate::domain::balance::parse_ether;
use crate::domain::network::payment_contract;
use primitive_types::U256;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransferKind {
    /// Plain value transfer to the recipient.
    #[default]
    Native,
    /// Call to the network's payment contract forwarding value to the recipient.
    ContractPayment,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransferValidationError {
    #[error("'{0}' is not a valid wallet address (expected 0x followed by 40 hex digits)")]
    InvalidRecipient(String),

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Amount must be greater than zero")]
    ZeroAmount,

    #[error("No payment contract is configured for network '{0}'")]
    NoPaymentContract(String),
}

/// A transfer that passed validation, ready to hand to the signing library.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedTransfer {
    /// Recipient, trimmed and lower-cased.
    pub recipient: String,
    pub value_wei: U256,
    pub kind: TransferKind,
    /// Contract to call for [`TransferKind::ContractPayment`].
    pub contract: Option<&'static str>,
}

/// True for `0x` followed by exactly 40 hex digits.
pub fn is_valid_address(address: &str) -> bool {
    match address.strip_prefix("0x") {
        Some(digits) => digits.len() == 40 && hex::decode(digits).is_ok(),
        None => false,
    }
}

pub fn validate_transfer(
    recipient: &str,
    amount: &str,
    kind: TransferKind,
    network: &str,
) -> Result<ValidatedTransfer, TransferValidationError> {
    let recipient = recipient.trim();
    if !is_valid_address(recipient) {
        return Err(TransferValidationError::InvalidRecipient(recipient.to_string()));
    }

    let value_wei = parse_ether(amount).map_err(TransferValidationError::InvalidAmount)?;
    if value_wei.is_zero() {
        return Err(TransferValidationError::ZeroAmount);
    }

    let contract = match kind {
        TransferKind::Native => None,
        TransferKind::ContractPayment => Some(
            payment_contract(network)
                .ok_or_else(|| TransferValidationError::NoPaymentContract(network.to_string()))?,
        ),
    };

    Ok(ValidatedTransfer {
        recipient: recipient.to_lowercase(),
        value_wei,
        kind,
        contract,
    })
}
