//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML) + ETHERSCAN_API_KEY
//!     → loader.rs (parse, deserialize, env overrides)
//!     → validation.rs (semantic checks)
//!     → ServiceConfig (validated, immutable)
//!     → shared via ArcSwap with the HTTP state
//!
//! On file change:
//!     watcher.rs detects change
//!     → loader.rs loads new config
//!     → validation.rs validates
//!     → server swaps in a fresh state (config + explorer client)
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require full reload
//! - All fields have defaults to allow minimal configs
//! - Listener address and request timeout only apply at startup

pub mod loader;
pub mod schema;
pub mod validation;
pub mod watcher;

pub use schema::ServiceConfig;
pub use schema::{
    ExplorerConfig, HistoryConfig, ListenerConfig, ObservabilityConfig, RetryConfig,
    SecurityConfig, TimeoutConfig, TracerConfig,
};
