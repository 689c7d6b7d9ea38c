//! Contact and transaction-history records.
//!
//! Both are stored by an external backend. This module only builds them,
//! infers the history direction, and de-duplicates / filters lists for display.

use crate::domain::transfer::is_valid_address;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecordError {
    #[error("'{0}' is not a valid wallet address (expected 0x followed by 40 hex digits)")]
    InvalidAddress(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub wallet_address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub owner_wallet: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Contact {
    pub fn new(
        owner_wallet: impl Into<String>,
        wallet_address: &str,
        name: Option<String>,
    ) -> Result<Self, RecordError> {
        let wallet_address = wallet_address.trim();
        if !is_valid_address(wallet_address) {
            return Err(RecordError::InvalidAddress(wallet_address.to_string()));
        }
        Ok(Self {
            id: None,
            wallet_address: wallet_address.to_string(),
            name: name.map(|n| n.trim().to_string()).filter(|n| !n.is_empty()),
            owner_wallet: owner_wallet.into(),
            created_at: Some(Utc::now()),
        })
    }

    /// Case-insensitive search over name and address. An empty term matches everything.
    pub fn matches(&self, term: &str) -> bool {
        let term = term.trim().to_lowercase();
        if term.is_empty() {
            return true;
        }
        self.wallet_address.to_lowercase().contains(&term)
            || self
                .name
                .as_deref()
                .is_some_and(|n| n.to_lowercase().contains(&term))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TxDirection {
    Sent,
    Received,
}

impl TxDirection {
    /// `Sent` when the owner is the sender (addresses compared ignoring case).
    pub fn infer(from_address: &str, owner_wallet: &str) -> Self {
        if from_address.eq_ignore_ascii_case(owner_wallet) {
            TxDirection::Sent
        } else {
            TxDirection::Received
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub tx_hash: String,
    pub from_address: String,
    pub to_address: String,
    /// Ether amount as entered in the transfer form.
    pub amount: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
    pub owner_wallet: String,
    #[serde(rename = "type")]
    pub direction: TxDirection,
}

impl HistoryRecord {
    /// Builds a record for `owner_wallet`, inferring the direction from the sender.
    pub fn new(
        tx_hash: impl Into<String>,
        from_address: impl Into<String>,
        to_address: impl Into<String>,
        amount: impl Into<String>,
        owner_wallet: impl Into<String>,
        note: Option<String>,
    ) -> Self {
        let from_address = from_address.into();
        let owner_wallet = owner_wallet.into();
        let direction = TxDirection::infer(&from_address, &owner_wallet);
        Self {
            id: None,
            tx_hash: tx_hash.into(),
            from_address,
            to_address: to_address.into(),
            amount: amount.into(),
            note,
            timestamp: Some(Utc::now()),
            owner_wallet,
            direction,
        }
    }

    /// The other party: recipient for sent records, sender for received ones.
    pub fn counterparty(&self) -> &str {
        match self.direction {
            TxDirection::Sent => &self.to_address,
            TxDirection::Received => &self.from_address,
        }
    }

    /// Identity of a history entry: one per (hash, owner, direction).
    pub fn dedup_key(&self) -> (&str, &str, TxDirection) {
        (&self.tx_hash, &self.owner_wallet, self.direction)
    }
}

/// Keeps the first record of every duplicate group, preserving order.
pub fn dedupe_history(records: Vec<HistoryRecord>) -> Vec<HistoryRecord> {
    let mut seen = HashSet::new();
    let mut out = Vec::with_capacity(records.len());
    for record in records {
        let (hash, owner, direction) = record.dedup_key();
        if seen.insert((hash.to_string(), owner.to_string(), direction)) {
            out.push(record);
        }
    }
    out
}

/// Display filter for the history list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct HistoryFilter {
    /// `None` shows both directions.
    #[serde(default)]
    pub direction: Option<TxDirection>,
    #[serde(default)]
    pub search: Option<String>,
}

impl HistoryFilter {
    pub fn matches(&self, record: &HistoryRecord) -> bool {
        if let Some(direction) = self.direction {
            if record.direction != direction {
                return false;
            }
        }

        let term = match self.search.as_deref().map(str::trim) {
            Some(t) if !t.is_empty() => t.to_lowercase(),
            _ => return true,
        };

        record.counterparty().to_lowercase().contains(&term)
            || record.tx_hash.to_lowercase().contains(&term)
            || record
                .note
                .as_deref()
                .is_some_and(|n| n.to_lowercase().contains(&term))
    }

    pub fn apply<'a>(&self, records: &'a [HistoryRecord]) -> Vec<&'a HistoryRecord> {
        records.iter().filter(|r| self.matches(r)).collect()
    }
}
