//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Tracer, explorer client, HTTP layer produce:
//!     → logging.rs (structured log events)
//!     → metrics.rs (counters, histograms)
//!     → tower-http spans carrying x-request-id
//!
//! Consumers:
//!     → stdout (pretty or JSON)
//!     → Prometheus scrape endpoint
//! ```

pub mod logging;
pub mod metrics;
