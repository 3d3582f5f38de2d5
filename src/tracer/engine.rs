//! Breadth-first money-flow search.
//!
//! # Algorithm
//! ```text
//! queue = [(from, [], 0)], visited = {from}
//! while queue not empty and paths < MAX_PATHS:
//!     pop (address, path, depth)
//!     depth >= max_hops → skip (no fetch)
//!     for tx in fetch(address), newest first:
//!         no recipient or zero value → skip
//!         recipient == to           → record path
//!         unvisited and depth+1 < max_hops → mark visited, enqueue
//! ```
//!
//! # Bounds
//! - Hop budget clamped to 1..=5 by [`FlowQuery`]
//! - At most [`FETCH_LIMIT`] transactions per address
//! - At most [`MAX_PATHS`] paths; no fetch happens after the last one is found
//! - Each address is expanded at most once

use std::collections::{HashSet, VecDeque};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::blockchain::provider::TransactionHistoryProvider;
use crate::blockchain::types::{wei_to_native, WalletAddress};
use crate::tracer::path::{build_flow_path, total_amount};
use crate::tracer::types::{
    FlowPath, FlowQuery, FlowResult, TraceError, TransactionEdge, FETCH_LIMIT, MAX_PATHS,
};

/// Frontier entry: an address waiting to be expanded.
struct SearchNode {
    address: WalletAddress,
    path: Vec<TransactionEdge>,
    depth: u32,
}

/// Traces fund movement between two addresses over a transaction history
/// provider. Holds no state between traces.
#[derive(Clone)]
pub struct FlowTracer {
    provider: Arc<dyn TransactionHistoryProvider>,
    deadline: Option<Duration>,
}

impl FlowTracer {
    pub fn new(provider: Arc<dyn TransactionHistoryProvider>) -> Self {
        Self {
            provider,
            deadline: None,
        }
    }

    /// Abort traces that run longer than `deadline`.
    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Find up to [`MAX_PATHS`] paths from `query.from()` to `query.to()`.
    ///
    /// Results are not exhaustive: once an intermediate address has been
    /// reached it is never expanded again, so only the first-discovered
    /// route through each intermediate address is reported.
    ///
    /// A provider failure on the source address fails the trace. Failures on
    /// later addresses end that branch only.
    pub async fn trace(&self, query: &FlowQuery) -> Result<FlowResult, TraceError> {
        let started = Instant::now();
        let paths = self.search(query, started).await?;

        Ok(FlowResult {
            from: query.from().clone(),
            to: query.to().clone(),
            chain: query.chain_name().to_string(),
            chain_id: query.chain().chain_id(),
            total_amount: total_amount(&paths),
            found: !paths.is_empty(),
            paths,
            search_depth: query.max_hops(),
            execution_time_ms: started.elapsed().as_millis() as u64,
        })
    }

    async fn search(&self, query: &FlowQuery, started: Instant) -> Result<Vec<FlowPath>, TraceError> {
        let chain_id = query.chain().chain_id();
        let max_hops = query.max_hops();
        let deadline = self.deadline.map(|d| tokio::time::Instant::from_std(started + d));

        let mut paths = Vec::new();
        let mut visited = HashSet::from([query.from().clone()]);
        let mut queue = VecDeque::from([SearchNode {
            address: query.from().clone(),
            path: Vec::new(),
            depth: 0,
        }]);

        while paths.len() < MAX_PATHS {
            let Some(node) = queue.pop_front() else {
                break;
            };

            if node.depth >= max_hops {
                continue;
            }

            let fetch = self.provider.fetch_transactions(&node.address, chain_id);
            let fetched = match deadline {
                Some(at) => tokio::time::timeout_at(at, fetch).await.map_err(|_| {
                    TraceError::DeadlineExceeded {
                        elapsed_ms: started.elapsed().as_millis() as u64,
                    }
                })?,
                None => fetch.await,
            };

            let transactions = match fetched {
                Ok(transactions) => transactions,
                Err(source) if node.depth == 0 => {
                    return Err(TraceError::Provider {
                        address: node.address,
                        source,
                    });
                }
                Err(e) => {
                    tracing::warn!(
                        address = %node.address,
                        depth = node.depth,
                        error = %e,
                        "Treating unreachable address as dead end"
                    );
                    continue;
                }
            };

            tracing::debug!(
                address = %node.address,
                depth = node.depth,
                transactions = transactions.len(),
                "Expanding node"
            );

            for tx in transactions.into_iter().take(FETCH_LIMIT) {
                let Some(destination) = tx.destination() else {
                    continue;
                };

                let amount = wei_to_native(&tx.value);
                if amount == 0.0 {
                    continue;
                }

                let mut extended = node.path.clone();
                extended.push(TransactionEdge {
                    counterparty: destination.clone(),
                    amount,
                    timestamp: tx.timestamp,
                    tx_hash: tx.hash,
                });

                if destination == *query.to() {
                    paths.push(build_flow_path(query.from(), &extended));
                    if paths.len() >= MAX_PATHS {
                        break;
                    }
                    continue;
                }

                if node.depth + 1 < max_hops && visited.insert(destination.clone()) {
                    queue.push_back(SearchNode {
                        address: destination,
                        path: extended,
                        depth: node.depth + 1,
                    });
                }
            }
        }

        Ok(paths)
    }
}
