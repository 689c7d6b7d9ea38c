//! Error types for wallet session commands.

use crate::infra::provider::ProviderError;
use thiserror::Error;

/// Errors surfaced by session commands (`connect`, `switch_network`, ...).
///
/// Balance failures never reach callers: they are logged and the previous
/// balance is kept. `BalanceFetch` exists so the refresher can log a typed value.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WalletError {
    /// No wallet provider is injected.
    #[error("No wallet provider is installed")]
    NoProvider,

    /// The user declined the request in the wallet.
    #[error("Request rejected by the user: {message}")]
    UserRejected { message: String },

    /// The provider granted access but returned no account.
    #[error("No account was selected")]
    NoAccounts,

    /// Any other provider-side failure.
    #[error("Provider error {code}: {message}")]
    Provider { code: i64, message: String },

    /// The switch target is not configured in the wallet (provider code 4902).
    #[error("Network {chain_id} is not configured in the wallet")]
    UnconfiguredNetwork { chain_id: String },

    #[error("Balance fetch failed: {0}")]
    BalanceFetch(String),
}

impl From<ProviderError> for WalletError {
    fn from(err: ProviderError) -> Self {
        if err.code == ProviderError::USER_REJECTED {
            WalletError::UserRejected {
                message: err.message,
            }
        } else {
            WalletError::Provider {
                code: err.code,
                message: err.message,
            }
        }
    }
}
