pub mod app;
pub mod domain;
pub mod infra;
pub mod storage;
pub mod transport;

// Convenience re-exports (keeps call-sites clean)
pub use app::auth_guard::{AuthGuard, GuardDecision};
pub use app::wallet_session::WalletSession;
pub use domain::error::WalletError;
pub use domain::network::{network_name, UNKNOWN_NETWORK};
pub use domain::session::{Observable, Session};
pub use infra::config::SessionConfig;
pub use infra::provider::{HttpProvider, ProviderError, ProviderEvent, WalletProvider};
pub use storage::kv_store::{FileKeyValueStore, KeyValueStore, MemoryKeyValueStore};
