//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Explorer request:
//!     → per-request timeout (reqwest client)
//!     → On failure: retries.rs (classify) → backoff.rs (delay with jitter)
//!     → retry until max_attempts, then surface the last error
//! ```
//!
//! # Design Decisions
//! - Every external call has a deadline
//! - Retries belong to the provider; the tracer never retries

pub mod backoff;
pub mod retries;

pub use backoff::calculate_backoff;
pub use retries::is_retryable;
