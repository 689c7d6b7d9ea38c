//! Connect / disconnect / reconnect / switch-network behavior of the wallet session.

mod common;

use common::*;
use criptopay_session::{
    KeyValueStore, ProviderError, Session, SessionConfig, WalletError, WalletSession,
    UNKNOWN_NETWORK,
};
use std::sync::Arc;

fn assert_invariant(s: &Session) {
    assert_eq!(
        s.is_connected(),
        !s.account().is_empty(),
        "is_connected must track the account: {:?}",
        s
    );
}

#[tokio::test]
async fn initial_session_is_disconnected_and_checking() {
    let stub = StubProvider::new();
    let store = memory_store();
    let session = session_with(&stub, &store);

    let s = session.snapshot();
    assert_eq!(s.account(), "");
    assert_eq!(s.balance(), "0");
    assert_eq!(s.network(), UNKNOWN_NETWORK);
    assert!(!s.is_connected());
    assert!(!s.is_connecting());
    assert!(s.is_checking_connection());
    assert!(stub.calls().is_empty());
}

#[tokio::test]
async fn connect_adopts_first_account_and_persists_flag() {
    let stub = StubProvider::new();
    stub.set_accounts(&[ALICE, BOB]);
    let store = memory_store();
    let session = session_with(&stub, &store);

    let account = session.connect().await.expect("connect should succeed");

    assert_eq!(account, ALICE);
    let s = session.snapshot();
    assert_eq!(s.account(), ALICE);
    assert!(s.is_connected());
    assert!(!s.is_connecting());
    assert_eq!(s.network(), "Sepolia");
    assert_eq!(s.balance(), "1.5000");
    assert_eq!(flag_of(&store).as_deref(), Some("true"));
}

#[tokio::test]
async fn connect_without_provider_fails() {
    let store = memory_store();
    let session = WalletSession::new(None, store.clone(), SessionConfig::immediate());

    assert_eq!(session.connect().await, Err(WalletError::NoProvider));
    assert!(!session.snapshot().is_connected());
}

#[tokio::test]
async fn connect_with_zero_accounts_clears_flag() {
    let stub = StubProvider::new();
    stub.set_accounts(&[]);
    let store = memory_store();
    set_flag(&store);
    let session = session_with(&stub, &store);

    assert_eq!(session.connect().await, Err(WalletError::NoAccounts));

    let s = session.snapshot();
    assert!(!s.is_connected());
    assert!(!s.is_connecting());
    assert_eq!(flag_of(&store), None);
}

#[tokio::test]
async fn connect_rejected_by_user() {
    let stub = StubProvider::new();
    stub.reject_request_accounts(ProviderError::new(
        ProviderError::USER_REJECTED,
        "User rejected the request.",
    ));
    let store = memory_store();
    let session = session_with(&stub, &store);

    let err = session.connect().await.unwrap_err();
    assert!(matches!(err, WalletError::UserRejected { .. }), "got {:?}", err);
    assert!(!session.snapshot().is_connected());
    assert_eq!(flag_of(&store), None);
}

#[tokio::test]
async fn failed_connect_after_success_resets_balance() {
    let stub = StubProvider::new();
    let store = memory_store();
    let session = session_with(&stub, &store);
    session.connect().await.unwrap();
    assert_eq!(session.snapshot().balance(), "1.5000");

    stub.reject_request_accounts(ProviderError::new(
        ProviderError::USER_REJECTED,
        "User rejected the request.",
    ));
    assert!(session.connect().await.is_err());

    let s = session.snapshot();
    assert_eq!(s.account(), "");
    assert!(!s.is_connected());
    assert_eq!(s.balance(), "0");
    assert_eq!(flag_of(&store), None);
}

#[tokio::test]
async fn connect_propagates_other_provider_errors() {
    let stub = StubProvider::new();
    stub.reject_request_accounts(ProviderError::new(-32002, "Request already pending"));
    let store = memory_store();
    let session = session_with(&stub, &store);

    assert_eq!(
        session.connect().await,
        Err(WalletError::Provider {
            code: -32002,
            message: "Request already pending".to_string()
        })
    );
}

#[tokio::test]
async fn is_connecting_is_raised_during_connect() {
    let stub = StubProvider::new();
    let store = memory_store();
    let session = session_with(&stub, &store);
    let mut connecting = session.is_connecting();
    assert!(!connecting.current());

    let watcher = tokio::spawn(async move {
        let raised = connecting.changed().await;
        let lowered = connecting.changed().await;
        (raised, lowered)
    });
    session.connect().await.unwrap();

    let (raised, lowered) = tokio::time::timeout(WAIT, watcher).await.unwrap().unwrap();
    assert_eq!(raised, Some(true));
    assert_eq!(lowered, Some(false));
}

#[tokio::test]
async fn disconnect_resets_session_and_flag() {
    let stub = StubProvider::new();
    let store = memory_store();
    let session = session_with(&stub, &store);
    session.connect().await.unwrap();

    session.disconnect();

    let s = session.snapshot();
    assert_eq!(s.account(), "");
    assert_eq!(s.balance(), "0");
    assert!(!s.is_connected());
    assert_eq!(flag_of(&store), None);
}

#[tokio::test]
async fn check_connection_restores_previous_session() {
    let stub = StubProvider::new();
    stub.set_chain_id("0x89");
    let store = memory_store();
    set_flag(&store);
    let session = session_with(&stub, &store);

    assert!(session.check_connection().await);

    let s = session.snapshot();
    assert_eq!(s.account(), ALICE);
    assert!(s.is_connected());
    assert_eq!(s.network(), "Polygon");
    assert_eq!(s.balance(), "1.5000");
    assert!(!s.is_checking_connection());
    assert_eq!(flag_of(&store).as_deref(), Some("true"));
    assert!(!stub.calls().iter().any(|m| m == "eth_requestAccounts"));
}

#[tokio::test]
async fn check_connection_with_zero_accounts_clears_flag() {
    let stub = StubProvider::new();
    stub.set_accounts(&[]);
    let store = memory_store();
    set_flag(&store);
    let session = session_with(&stub, &store);

    assert!(!session.check_connection().await);

    let s = session.snapshot();
    assert!(!s.is_connected());
    assert!(!s.is_checking_connection());
    assert_eq!(flag_of(&store), None);
}

#[tokio::test]
async fn check_connection_without_flag_does_not_touch_provider() {
    let stub = StubProvider::new();
    let store = memory_store();
    let session = session_with(&stub, &store);

    assert!(!session.auto_reconnect().await);
    assert!(stub.calls().is_empty());
    assert!(!session.snapshot().is_checking_connection());
}

#[tokio::test]
async fn start_runs_the_connection_check() {
    let stub = StubProvider::new();
    let store = memory_store();
    set_flag(&store);
    let provider: Arc<dyn criptopay_session::WalletProvider> = stub.clone();
    let kv: Arc<dyn KeyValueStore> = store.clone();

    let session = WalletSession::start(Some(provider), kv, SessionConfig::immediate()).await;

    let s = session.snapshot();
    assert!(s.is_connected());
    assert!(!s.is_checking_connection());
}

#[tokio::test]
async fn switch_network_to_unconfigured_chain() {
    let stub = StubProvider::new();
    stub.fail_switch(ProviderError::new(
        ProviderError::UNRECOGNIZED_CHAIN,
        "Unrecognized chain ID \"0x2105\"",
    ));
    let store = memory_store();
    let session = session_with(&stub, &store);

    assert_eq!(
        session.switch_network("0x2105").await,
        Err(WalletError::UnconfiguredNetwork {
            chain_id: "0x2105".to_string()
        })
    );
}

#[tokio::test]
async fn switch_network_propagates_other_errors() {
    let stub = StubProvider::new();
    stub.fail_switch(ProviderError::new(ProviderError::USER_REJECTED, "denied"));
    let store = memory_store();
    let session = session_with(&stub, &store);

    let err = session.switch_network("0x1").await.unwrap_err();
    assert!(matches!(err, WalletError::UserRejected { .. }), "got {:?}", err);
}

#[tokio::test]
async fn switch_network_updates_through_chain_changed_event() {
    let stub = StubProvider::new();
    let store = memory_store();
    let session = session_with(&stub, &store);
    session.connect().await.unwrap();
    assert_eq!(session.snapshot().network(), "Sepolia");

    let mut network = session.network();
    stub.set_default_balance(TWO_ETH);
    session.switch_network("0x1").await.unwrap();

    let name = tokio::time::timeout(WAIT, network.wait_for(|n| n == "Ethereum"))
        .await
        .unwrap();
    assert_eq!(name.as_deref(), Some("Ethereum"));

    let mut balance = session.balance();
    let value = tokio::time::timeout(WAIT, balance.wait_for(|b| b == "2.0000"))
        .await
        .unwrap();
    assert_eq!(value.as_deref(), Some("2.0000"));
}

#[tokio::test]
async fn invariant_holds_on_every_observed_transition() {
    let stub = StubProvider::new();
    let store = memory_store();
    let session = session_with(&stub, &store);
    let mut rx = session.subscribe();

    let observer = tokio::spawn(async move {
        let mut seen = vec![rx.borrow_and_update().clone()];
        while rx.changed().await.is_ok() {
            seen.push(rx.borrow_and_update().clone());
        }
        seen
    });

    session.connect().await.unwrap();
    stub.set_accounts(&[]);
    session.connect().await.unwrap_err();
    stub.set_accounts(&[BOB]);
    session.connect().await.unwrap();
    session.disconnect();
    drop(session);

    let seen = tokio::time::timeout(WAIT, observer).await.unwrap().unwrap();
    assert!(seen.len() > 1);
    for s in &seen {
        assert_invariant(s);
    }
}
