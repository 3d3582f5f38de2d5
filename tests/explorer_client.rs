mod common;

use common::{start_programmable_explorer, test_config, tx};
use sentinel_flow::blockchain::{ChainId, ExplorerClient, ProviderError, TransactionHistoryProvider, WalletAddress};
use serde_json::json;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

const ALICE: &str = "0x1111111111111111111111111111111111111111";
const BOB: &str = "0x2222222222222222222222222222222222222222";

#[tokio::test]
async fn test_retries_server_errors_then_succeeds() {
    let calls = Arc::new(AtomicU32::new(0));
    let counter = calls.clone();
    let explorer = start_programmable_explorer(move |_| {
        if counter.fetch_add(1, Ordering::SeqCst) < 2 {
            (503, json!({ "error": "unavailable" }))
        } else {
            (200, json!({ "status": "1", "message": "OK", "result": [tx(BOB, "7", 1, "0xaa")] }))
        }
    })
    .await;

    let client = ExplorerClient::from_config(&test_config(explorer)).unwrap();
    let txs = client
        .fetch_transactions(&WalletAddress::new(ALICE), ChainId(1))
        .await
        .unwrap();

    assert_eq!(calls.load(Ordering::SeqCst), 3);
    assert_eq!(txs.len(), 1);
    assert_eq!(txs[0].value, "7");
    assert_eq!(txs[0].hash, "0xaa");
}

#[tokio::test]
async fn test_gives_up_after_max_attempts() {
    let calls = Arc::new(AtomicU32::new(0));
    let counter = calls.clone();
    let explorer = start_programmable_explorer(move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
        (502, json!({}))
    })
    .await;

    let mut config = test_config(explorer);
    config.retries.max_attempts = 2;
    let client = ExplorerClient::from_config(&config).unwrap();
    let err = client
        .fetch_transactions(&WalletAddress::new(ALICE), ChainId(1))
        .await
        .unwrap_err();

    assert!(matches!(err, ProviderError::Status(502)));
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_client_errors_are_not_retried() {
    let calls = Arc::new(AtomicU32::new(0));
    let counter = calls.clone();
    let explorer = start_programmable_explorer(move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
        (400, json!({ "error": "bad request" }))
    })
    .await;

    let client = ExplorerClient::from_config(&test_config(explorer)).unwrap();
    let err = client
        .fetch_transactions(&WalletAddress::new(ALICE), ChainId(1))
        .await
        .unwrap_err();

    assert!(matches!(err, ProviderError::Status(400)));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_retries_disabled_makes_single_attempt() {
    let calls = Arc::new(AtomicU32::new(0));
    let counter = calls.clone();
    let explorer = start_programmable_explorer(move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
        (503, json!({}))
    })
    .await;

    let mut config = test_config(explorer);
    config.retries.enabled = false;
    let client = ExplorerClient::from_config(&config).unwrap();
    assert!(client
        .fetch_transactions(&WalletAddress::new(ALICE), ChainId(1))
        .await
        .is_err());
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_query_parameters_forwarded() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let recorder = seen.clone();
    let explorer = start_programmable_explorer(move |params| {
        recorder.lock().unwrap().push(params);
        (200, json!({ "status": "0", "message": "No transactions found", "result": [] }))
    })
    .await;

    let mut config = test_config(explorer);
    config.explorer.api_key = Some("secret".to_string());
    config.explorer.page_size = 25;
    let client = ExplorerClient::from_config(&config).unwrap();

    let txs = client
        .fetch_transactions(&WalletAddress::new(ALICE), ChainId(8453))
        .await
        .unwrap();
    assert!(txs.is_empty());

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    let params = &seen[0];
    assert_eq!(params["chainid"], "8453");
    assert_eq!(params["module"], "account");
    assert_eq!(params["action"], "txlist");
    assert_eq!(params["address"], ALICE);
    assert_eq!(params["offset"], "25");
    assert_eq!(params["sort"], "desc");
    assert_eq!(params["apikey"], "secret");
}

#[tokio::test]
async fn test_rate_limit_message_is_retried() {
    let calls = Arc::new(AtomicU32::new(0));
    let counter = calls.clone();
    let explorer = start_programmable_explorer(move |_| {
        if counter.fetch_add(1, Ordering::SeqCst) == 0 {
            (200, json!({ "status": "0", "message": "NOTOK", "result": "Max rate limit reached" }))
        } else {
            (200, json!({ "status": "1", "message": "OK", "result": [] }))
        }
    })
    .await;

    let client = ExplorerClient::from_config(&test_config(explorer)).unwrap();
    let txs = client
        .fetch_transactions(&WalletAddress::new(ALICE), ChainId(1))
        .await
        .unwrap();

    assert!(txs.is_empty());
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_page_truncated_to_configured_size() {
    let explorer = start_programmable_explorer(|_| {
        let result: Vec<_> = (0..80).map(|i| tx(BOB, "1", i, &format!("0x{:02x}", i))).collect();
        (200, json!({ "status": "1", "message": "OK", "result": result }))
    })
    .await;

    let client = ExplorerClient::from_config(&test_config(explorer)).unwrap();
    let txs = client
        .fetch_transactions(&WalletAddress::new(ALICE), ChainId(1))
        .await
        .unwrap();

    assert_eq!(txs.len(), 50);
}
