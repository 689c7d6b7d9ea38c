//! Route gate for pages that need a connected wallet.

use crate::app::wallet_session::WalletSession;
use serde::Serialize;
use std::sync::{Arc, Weak};
use tracing::debug;

/// Where unauthenticated visitors are sent.
pub const LANDING_ROUTE: &str = "/";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "decision", content = "to", rename_all = "snake_case")]
pub enum GuardDecision {
    Allow,
    Redirect(&'static str),
}

impl GuardDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, GuardDecision::Allow)
    }
}

/// Holds the session weakly; a guard never keeps a dropped session alive.
pub struct AuthGuard {
    session: Weak<WalletSession>,
}

impl AuthGuard {
    pub fn new(session: &Arc<WalletSession>) -> Self {
        Self {
            session: Arc::downgrade(session),
        }
    }

    /// Waits out a running connection check, then allows only connected sessions.
    /// A session dropped before or during the wait redirects.
    pub async fn can_activate(&self) -> GuardDecision {
        let Some(mut checking) = self.session.upgrade().map(|s| s.is_checking_connection()) else {
            return GuardDecision::Redirect(LANDING_ROUTE);
        };
        if checking.current() {
            debug!("auth guard waiting for connection check to complete");
        }
        if checking.wait_for(|c| !*c).await.is_none() {
            debug!("session dropped while the auth guard was waiting");
            return GuardDecision::Redirect(LANDING_ROUTE);
        }

        match self.session.upgrade() {
            Some(session) if session.snapshot().is_connected() => GuardDecision::Allow,
            _ => {
                debug!("auth guard redirecting to landing page");
                GuardDecision::Redirect(LANDING_ROUTE)
            }
        }
    }
}
