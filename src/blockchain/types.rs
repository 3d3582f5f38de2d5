//! Chain-specific types and error definitions.

use alloy::primitives::utils::format_ether;
use alloy::primitives::{Address, U256};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Chain ID type for strong typing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChainId(pub u64);

impl From<u64> for ChainId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl From<ChainId> for u64 {
    fn from(id: ChainId) -> Self {
        id.0
    }
}

impl fmt::Display for ChainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// EVM networks the explorer API can route to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Chain {
    Ethereum,
    Arbitrum,
    Base,
    Optimism,
    Polygon,
    Bsc,
}

impl Chain {
    /// Map a chain name to a network. Unknown names fall back to Ethereum.
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "arbitrum" => Chain::Arbitrum,
            "base" => Chain::Base,
            "optimism" => Chain::Optimism,
            "polygon" => Chain::Polygon,
            "bsc" => Chain::Bsc,
            _ => Chain::Ethereum,
        }
    }

    pub fn chain_id(self) -> ChainId {
        match self {
            Chain::Ethereum => ChainId(1),
            Chain::Arbitrum => ChainId(42161),
            Chain::Base => ChainId(8453),
            Chain::Optimism => ChainId(10),
            Chain::Polygon => ChainId(137),
            Chain::Bsc => ChainId(56),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Chain::Ethereum => "ethereum",
            Chain::Arbitrum => "arbitrum",
            Chain::Base => "base",
            Chain::Optimism => "optimism",
            Chain::Polygon => "polygon",
            Chain::Bsc => "bsc",
        }
    }
}

/// A wallet or contract address in normalized (trimmed, lower-case) form.
///
/// All address comparisons go through this type so that checksummed and
/// lower-case spellings of the same address are equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WalletAddress(String);

impl WalletAddress {
    pub fn new(raw: &str) -> Self {
        Self(raw.trim().to_ascii_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// True if the address is a 20-byte hex string.
    pub fn is_well_formed(&self) -> bool {
        self.0.starts_with("0x") && Address::from_str(&self.0).is_ok()
    }
}

impl fmt::Display for WalletAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for WalletAddress {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

/// Convert a decimal wei amount to native units (divide by 10^18).
///
/// Empty or unparseable values convert to zero.
pub fn wei_to_native(value: &str) -> f64 {
    let Ok(wei) = U256::from_str_radix(value.trim(), 10) else {
        return 0.0;
    };
    if wei.is_zero() {
        return 0.0;
    }
    format_ether(wei).parse().unwrap_or(0.0)
}

/// Errors raised by transaction history providers.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Transport-level failure (connect, TLS, body read).
    #[error("HTTP error: {0}")]
    Http(String),

    /// Explorer answered with a non-success HTTP status.
    #[error("explorer returned HTTP {0}")]
    Status(u16),

    /// Request did not complete in time.
    #[error("explorer timeout after {0} seconds")]
    Timeout(u64),

    /// Response body did not match the expected shape.
    #[error("failed to decode explorer response: {0}")]
    Decode(String),

    /// Explorer reported an error in its payload (bad key, rate limit).
    #[error("explorer error: {0}")]
    Upstream(String),

    /// Client could not be built from configuration.
    #[error("explorer configuration error: {0}")]
    Config(String),
}

/// Result type for provider operations.
pub type ProviderResult<T> = Result<T, ProviderError>;
