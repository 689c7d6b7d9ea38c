pub mod auth_guard;
pub mod wallet_session;
