//! Wallet session domain: session snapshot, networks, amounts, transfers and records.

pub mod balance;
pub mod error;
pub mod network;
pub mod records;
pub mod session;
pub mod transfer;
