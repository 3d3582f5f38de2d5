//! Flow tracing data model.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::blockchain::types::{Chain, ChainId, ProviderError, WalletAddress};

/// Smallest hop budget a query can run with.
pub const MIN_HOPS: u32 = 1;
/// Largest hop budget a query can run with.
pub const MAX_HOPS: u32 = 5;
/// Hop budget when the caller does not supply one.
pub const DEFAULT_MAX_HOPS: u32 = 3;
/// A trace stops once this many paths have been found.
pub const MAX_PATHS: usize = 10;
/// Transactions considered per expanded address.
pub const FETCH_LIMIT: usize = 50;

/// Reasons a flow query is rejected before tracing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    #[error("Both 'from' and 'to' addresses are required")]
    MissingAddress,

    #[error("Source and destination cannot be the same")]
    SameAddress,
}

/// A validated trace request.
///
/// Construction normalizes both addresses, rejects `from == to` and clamps
/// the hop budget, so a tracer never sees an invalid query.
#[derive(Debug, Clone, PartialEq)]
pub struct FlowQuery {
    from: WalletAddress,
    to: WalletAddress,
    chain: Chain,
    chain_name: String,
    max_hops: u32,
}

impl FlowQuery {
    pub fn new(from: &str, to: &str, chain_name: &str, max_hops: i64) -> Result<Self, QueryError> {
        let from = WalletAddress::new(from);
        let to = WalletAddress::new(to);

        if from.is_empty() || to.is_empty() {
            return Err(QueryError::MissingAddress);
        }
        if from == to {
            return Err(QueryError::SameAddress);
        }

        Ok(Self {
            from,
            to,
            chain: Chain::from_name(chain_name),
            chain_name: chain_name.to_string(),
            max_hops: clamp_hops(max_hops),
        })
    }

    pub fn from(&self) -> &WalletAddress {
        &self.from
    }

    pub fn to(&self) -> &WalletAddress {
        &self.to
    }

    pub fn chain(&self) -> Chain {
        self.chain
    }

    /// The chain name as the caller spelled it.
    pub fn chain_name(&self) -> &str {
        &self.chain_name
    }

    pub fn max_hops(&self) -> u32 {
        self.max_hops
    }
}

/// Clamp a requested hop budget into `[MIN_HOPS, MAX_HOPS]`.
pub fn clamp_hops(requested: i64) -> u32 {
    requested.clamp(MIN_HOPS as i64, MAX_HOPS as i64) as u32
}

/// One observed transfer with a non-zero amount.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionEdge {
    pub counterparty: WalletAddress,
    /// Amount in native units (wei / 10^18).
    pub amount: f64,
    pub timestamp: u64,
    pub tx_hash: String,
}

/// One route from source to destination.
///
/// `wallets` has `hop_count + 1` entries starting with the source; the other
/// sequences have `hop_count` entries, one per hop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowPath {
    pub hop_count: usize,
    pub wallets: Vec<WalletAddress>,
    pub amounts: Vec<f64>,
    pub timestamps: Vec<u64>,
    pub transaction_hashes: Vec<String>,
}

/// Outcome of one trace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowResult {
    pub from: WalletAddress,
    pub to: WalletAddress,
    pub chain: String,
    pub chain_id: ChainId,
    pub paths: Vec<FlowPath>,
    pub total_amount: f64,
    pub found: bool,
    /// Hop budget actually used, after clamping.
    pub search_depth: u32,
    pub execution_time_ms: u64,
}

/// Failures that abort a whole trace.
#[derive(Debug, Error)]
pub enum TraceError {
    /// The source address could not be expanded.
    #[error("failed to fetch transactions for {address}: {source}")]
    Provider {
        address: WalletAddress,
        #[source]
        source: ProviderError,
    },

    /// The trace ran past its wall-clock budget.
    #[error("trace deadline exceeded after {elapsed_ms} ms")]
    DeadlineExceeded { elapsed_ms: u64 },
}
