//! Shared utilities for integration tests.

use axum::{extract::Query, http::StatusCode, routing::get, Json, Router};
use sentinel_flow::{HttpServer, ServiceConfig, Shutdown};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::mpsc;

pub type Params = HashMap<String, String>;

/// Start a programmable explorer on a loopback port. `f` maps query
/// parameters to a status code and JSON body.
pub async fn start_programmable_explorer<F>(f: F) -> SocketAddr
where
    F: Fn(Params) -> (u16, Value) + Send + Sync + 'static,
{
    let f = Arc::new(f);
    let app = Router::new().route(
        "/api",
        get(move |Query(params): Query<Params>| {
            let f = f.clone();
            async move {
                let (status, body) = f(params);
                (StatusCode::from_u16(status).unwrap(), Json(body))
            }
        }),
    );

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    addr
}

/// Start an explorer serving fixed histories. Returns its address and a
/// counter of requests served.
#[allow(dead_code)]
pub async fn start_mock_explorer(history: Vec<(&str, Vec<Value>)>) -> (SocketAddr, Arc<AtomicU32>) {
    let history: HashMap<String, Vec<Value>> = history
        .into_iter()
        .map(|(address, txs)| (address.to_lowercase(), txs))
        .collect();
    let calls = Arc::new(AtomicU32::new(0));
    let counter = calls.clone();

    let addr = start_programmable_explorer(move |params| {
        counter.fetch_add(1, Ordering::SeqCst);
        let address = params.get("address").cloned().unwrap_or_default();
        match history.get(&address) {
            Some(txs) => (200, json!({ "status": "1", "message": "OK", "result": txs })),
            None => (
                200,
                json!({ "status": "0", "message": "No transactions found", "result": [] }),
            ),
        }
    })
    .await;

    (addr, calls)
}

/// One explorer `txlist` entry.
#[allow(dead_code)]
pub fn tx(to: &str, value: &str, timestamp: u64, hash: &str) -> Value {
    json!({
        "blockNumber": "1",
        "timeStamp": timestamp.to_string(),
        "hash": hash,
        "from": "0x0000000000000000000000000000000000000000",
        "to": to,
        "value": value,
        "isError": "0",
    })
}

/// Config pointing at a mock explorer, with fast retries and no metrics.
pub fn test_config(explorer: SocketAddr) -> ServiceConfig {
    let mut config = ServiceConfig::default();
    config.explorer.base_url = format!("http://{}/api", explorer);
    config.explorer.api_key = None;
    config.explorer.request_timeout_secs = 5;
    config.retries.base_delay_ms = 10;
    config.retries.max_delay_ms = 50;
    config.observability.metrics_enabled = false;
    config
}

/// Start the service on a loopback port.
#[allow(dead_code)]
pub async fn start_service(config: ServiceConfig) -> (SocketAddr, Shutdown) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server = HttpServer::new(config).unwrap();

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    let (_, config_updates) = mpsc::unbounded_channel();
    tokio::spawn(async move {
        let _ = server.run(listener, config_updates, server_shutdown).await;
    });

    (addr, shutdown)
}

#[allow(dead_code)]
pub fn http_client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}
