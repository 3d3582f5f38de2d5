//! Path materialization and aggregation.

use crate::blockchain::types::WalletAddress;
use crate::tracer::types::{FlowPath, TransactionEdge};

/// Turn a chain of edges starting at `from` into a [`FlowPath`].
pub fn build_flow_path(from: &WalletAddress, edges: &[TransactionEdge]) -> FlowPath {
    let mut wallets = Vec::with_capacity(edges.len() + 1);
    wallets.push(from.clone());
    wallets.extend(edges.iter().map(|edge| edge.counterparty.clone()));

    FlowPath {
        hop_count: edges.len(),
        wallets,
        amounts: edges.iter().map(|edge| edge.amount).collect(),
        timestamps: edges.iter().map(|edge| edge.timestamp).collect(),
        transaction_hashes: edges.iter().map(|edge| edge.tx_hash.clone()).collect(),
    }
}

/// Sum of every amount on every path.
pub fn total_amount(paths: &[FlowPath]) -> f64 {
    paths
        .iter()
        .map(|path| path.amounts.iter().sum::<f64>())
        .sum()
}
