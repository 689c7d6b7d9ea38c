//! Session snapshot and its single-writer state cell.
//!
//! All six session fields live in one [`Session`] value published through a
//! `tokio::sync::watch` channel. Every mutation replaces the snapshot in one
//! step, so observers never see `is_connected` disagree with `account`.

pub mod observable;

pub use observable::Observable;

use crate::domain::network::UNKNOWN_NETWORK;
use serde::Serialize;
use tokio::sync::watch;

/// Balance shown when no balance has been fetched.
pub const ZERO_BALANCE: &str = "0";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Session {
    account: String,
    balance: String,
    network: String,
    is_connected: bool,
    is_connecting: bool,
    is_checking_connection: bool,
}

impl Session {
    /// The session at process start: disconnected, start-up check pending.
    pub fn initial() -> Self {
        Self {
            account: String::new(),
            balance: ZERO_BALANCE.to_string(),
            network: UNKNOWN_NETWORK.to_string(),
            is_connected: false,
            is_connecting: false,
            is_checking_connection: true,
        }
    }

    pub fn account(&self) -> &str {
        &self.account
    }

    pub fn balance(&self) -> &str {
        &self.balance
    }

    pub fn network(&self) -> &str {
        &self.network
    }

    pub fn is_connected(&self) -> bool {
        self.is_connected
    }

    pub fn is_connecting(&self) -> bool {
        self.is_connecting
    }

    pub fn is_checking_connection(&self) -> bool {
        self.is_checking_connection
    }

    fn set_account(&mut self, account: String) {
        self.is_connected = !account.is_empty();
        self.account = account;
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::initial()
    }
}

/// Owner of the session snapshot. Only the wallet session writes through it.
pub struct SessionState {
    tx: watch::Sender<Session>,
}

impl SessionState {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(Session::initial());
        Self { tx }
    }

    /// Clone of the current snapshot.
    pub fn snapshot(&self) -> Session {
        self.tx.borrow().clone()
    }

    /// Raw receiver over whole snapshots.
    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.tx.subscribe()
    }

    /// Stream of one projected field.
    pub fn observe<T>(&self, project: fn(&Session) -> T) -> Observable<T>
    where
        T: Clone + PartialEq,
    {
        Observable::new(self.tx.subscribe(), project)
    }

    /// Adopts `account` and derives the connected flag from it.
    pub fn set_account(&self, account: impl Into<String>) {
        let account = account.into();
        self.tx.send_if_modified(|s| {
            if s.account == account {
                return false;
            }
            s.set_account(account);
            true
        });
    }

    /// Disconnect reset: no account, zero balance.
    pub fn reset_connection(&self) {
        self.tx.send_if_modified(|s| {
            if s.account.is_empty() && s.balance == ZERO_BALANCE {
                return false;
            }
            s.set_account(String::new());
            s.balance = ZERO_BALANCE.to_string();
            true
        });
    }

    /// Writes a balance fetched for `account`. Returns `false` without touching the
    /// snapshot when the session no longer holds that account.
    pub fn set_balance_for(&self, account: &str, balance: impl Into<String>) -> bool {
        let balance = balance.into();
        let mut current = true;
        self.tx.send_if_modified(|s| {
            if s.account != account {
                current = false;
                return false;
            }
            replace(&mut s.balance, balance)
        });
        current
    }

    pub fn set_network(&self, network: impl Into<String>) {
        let network = network.into();
        self.tx.send_if_modified(|s| replace(&mut s.network, network));
    }

    pub fn set_connecting(&self, connecting: bool) {
        self.tx
            .send_if_modified(|s| replace(&mut s.is_connecting, connecting));
    }

    pub fn set_checking(&self, checking: bool) {
        self.tx
            .send_if_modified(|s| replace(&mut s.is_checking_connection, checking));
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}

fn replace<T: PartialEq>(slot: &mut T, value: T) -> bool {
    if *slot == value {
        return false;
    }
    *slot = value;
    true
}
