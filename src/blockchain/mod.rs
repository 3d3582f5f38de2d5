//! Blockchain data subsystem.
//!
//! # Data Flow
//! ```text
//! ETHERSCAN_API_KEY + [explorer] config
//!     → explorer.rs (txlist over HTTP, timeouts, retries)
//!     → provider.rs (RawTransaction, TransactionHistoryProvider)
//!     → tracer
//! ```
//!
//! # Security Constraints
//! - API keys only from config or environment, never logged
//! - All explorer calls have configurable timeouts

pub mod explorer;
pub mod provider;
pub mod types;

pub use explorer::ExplorerClient;
pub use provider::{RawTransaction, TransactionHistoryProvider};
pub use types::{wei_to_native, Chain, ChainId, ProviderError, WalletAddress};
