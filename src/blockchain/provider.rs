//! Transaction history provider abstraction.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::blockchain::types::{ChainId, ProviderResult, WalletAddress};

/// One transaction as reported by a history provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawTransaction {
    /// Recipient; `None` for contract creations.
    pub to: Option<String>,
    /// Value in the smallest on-chain unit, as a decimal string.
    pub value: String,
    /// Unix timestamp in seconds.
    pub timestamp: u64,
    pub hash: String,
}

impl RawTransaction {
    /// Recipient address, treating an empty string as absent.
    pub fn destination(&self) -> Option<WalletAddress> {
        self.to
            .as_deref()
            .map(WalletAddress::new)
            .filter(|addr| !addr.is_empty())
    }
}

/// Source of per-address transaction history.
///
/// Implementations return at most one page of transactions, most recent
/// first. Retrying transient failures is the implementation's job.
#[async_trait]
pub trait TransactionHistoryProvider: Send + Sync {
    async fn fetch_transactions(
        &self,
        address: &WalletAddress,
        chain: ChainId,
    ) -> ProviderResult<Vec<RawTransaction>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_destination_skips_empty() {
        let mut tx = RawTransaction {
            to: Some("0xABC".into()),
            value: "1".into(),
            timestamp: 1,
            hash: "0x1".into(),
        };
        assert_eq!(tx.destination(), Some(WalletAddress::new("0xabc")));

        tx.to = Some(String::new());
        assert_eq!(tx.destination(), None);

        tx.to = None;
        assert_eq!(tx.destination(), None);
    }
}
