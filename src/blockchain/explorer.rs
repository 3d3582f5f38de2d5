//! Etherscan-compatible explorer client.
//!
//! # Responsibilities
//! - Fetch the most recent transactions of an address (`account/txlist`)
//! - Route to the right network via the v2 `chainid` parameter
//! - Enforce per-request timeouts and retry transient failures
//! - Never log the API key

use async_trait::async_trait;
use serde::Deserialize;
use std::time::{Duration, Instant};
use url::Url;

use crate::blockchain::provider::{RawTransaction, TransactionHistoryProvider};
use crate::blockchain::types::{ChainId, ProviderError, ProviderResult, WalletAddress};
use crate::config::{ExplorerConfig, RetryConfig, ServiceConfig};
use crate::observability::metrics;
use crate::resilience::{calculate_backoff, is_retryable};

/// Top-level explorer envelope. `result` is an array on success and a
/// message string on failure.
#[derive(Debug, Deserialize)]
struct ExplorerResponse {
    #[serde(default)]
    message: String,
    #[serde(default)]
    result: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct ExplorerTx {
    #[serde(default)]
    to: Option<String>,
    #[serde(default)]
    value: String,
    #[serde(rename = "timeStamp", default)]
    time_stamp: String,
    #[serde(default)]
    hash: String,
}

impl From<ExplorerTx> for RawTransaction {
    fn from(tx: ExplorerTx) -> Self {
        RawTransaction {
            to: tx.to,
            value: tx.value,
            timestamp: tx.time_stamp.trim().parse().unwrap_or_default(),
            hash: tx.hash,
        }
    }
}

/// HTTP client for the explorer's transaction list endpoint.
#[derive(Clone)]
pub struct ExplorerClient {
    http: reqwest::Client,
    base_url: Url,
    api_key: Option<String>,
    page_size: usize,
    timeout_secs: u64,
    retry: RetryConfig,
}

impl ExplorerClient {
    /// Build a client from the explorer and retry sections.
    pub fn new(explorer: &ExplorerConfig, retry: &RetryConfig) -> ProviderResult<Self> {
        let base_url = Url::parse(&explorer.base_url).map_err(|e| {
            ProviderError::Config(format!("invalid base URL '{}': {}", explorer.base_url, e))
        })?;

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(explorer.request_timeout_secs))
            .user_agent(concat!("sentinel-flow/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ProviderError::Config(e.to_string()))?;

        Ok(Self {
            http,
            base_url,
            api_key: explorer.api_key.clone().filter(|k| !k.is_empty()),
            page_size: explorer.page_size,
            timeout_secs: explorer.request_timeout_secs,
            retry: retry.clone(),
        })
    }

    pub fn from_config(config: &ServiceConfig) -> ProviderResult<Self> {
        Self::new(&config.explorer, &config.retries)
    }

    /// Full request URL for one address page, newest first.
    fn request_url(&self, address: &WalletAddress, chain: ChainId) -> Url {
        let mut url = self.base_url.clone();
        {
            let mut query = url.query_pairs_mut();
            query
                .append_pair("chainid", &chain.to_string())
                .append_pair("module", "account")
                .append_pair("action", "txlist")
                .append_pair("address", address.as_str())
                .append_pair("startblock", "0")
                .append_pair("endblock", "99999999")
                .append_pair("page", "1")
                .append_pair("offset", &self.page_size.to_string())
                .append_pair("sort", "desc");
            if let Some(key) = &self.api_key {
                query.append_pair("apikey", key);
            }
        }
        url
    }

    async fn fetch_once(&self, url: &Url) -> ProviderResult<Vec<RawTransaction>> {
        let response = self
            .http
            .get(url.clone())
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::Status(status.as_u16()));
        }

        let body: ExplorerResponse = response.json().await.map_err(|e| self.transport_error(e))?;
        parse_response(body, self.page_size)
    }

    fn transport_error(&self, error: reqwest::Error) -> ProviderError {
        // Strip the URL: it carries the API key.
        let error = error.without_url();
        if error.is_timeout() {
            ProviderError::Timeout(self.timeout_secs)
        } else if error.is_decode() {
            ProviderError::Decode(error.to_string())
        } else {
            ProviderError::Http(error.to_string())
        }
    }
}

#[async_trait]
impl TransactionHistoryProvider for ExplorerClient {
    async fn fetch_transactions(
        &self,
        address: &WalletAddress,
        chain: ChainId,
    ) -> ProviderResult<Vec<RawTransaction>> {
        let url = self.request_url(address, chain);
        let max_attempts = if self.retry.enabled {
            self.retry.max_attempts.max(1)
        } else {
            1
        };

        let mut attempts = 0;
        loop {
            attempts += 1;
            let start = Instant::now();

            match self.fetch_once(&url).await {
                Ok(transactions) => {
                    metrics::record_provider_request(chain.0, "ok", start);
                    tracing::debug!(
                        address = %address,
                        chain_id = %chain,
                        count = transactions.len(),
                        "Fetched transactions"
                    );
                    return Ok(transactions);
                }
                Err(e) => {
                    metrics::record_provider_request(chain.0, "error", start);

                    if attempts < max_attempts && is_retryable(&e) {
                        let backoff = calculate_backoff(attempts, &self.retry);
                        tracing::warn!(
                            address = %address,
                            chain_id = %chain,
                            attempt = attempts,
                            delay = ?backoff,
                            error = %e,
                            "Explorer request failed, retrying"
                        );
                        tokio::time::sleep(backoff).await;
                        continue;
                    }

                    tracing::warn!(
                        address = %address,
                        chain_id = %chain,
                        attempts,
                        error = %e,
                        "Explorer request failed"
                    );
                    return Err(e);
                }
            }
        }
    }
}

impl std::fmt::Debug for ExplorerClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExplorerClient")
            .field("base_url", &self.base_url.as_str())
            .field("has_api_key", &self.api_key.is_some())
            .field("page_size", &self.page_size)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

/// Decode an explorer envelope into at most `limit` transactions.
fn parse_response(body: ExplorerResponse, limit: usize) -> ProviderResult<Vec<RawTransaction>> {
    match body.result {
        serde_json::Value::Array(items) => items
            .into_iter()
            .take(limit)
            .map(|item| {
                serde_json::from_value::<ExplorerTx>(item)
                    .map(RawTransaction::from)
                    .map_err(|e| ProviderError::Decode(e.to_string()))
            })
            .collect(),
        _ if body.message.starts_with("No transactions found") => Ok(Vec::new()),
        serde_json::Value::String(reason) => Err(ProviderError::Upstream(reason)),
        _ => Err(ProviderError::Upstream(body.message)),
    }
}
