//! Money-flow tracing subsystem.
//!
//! # Data Flow
//! ```text
//! FlowQuery (normalized, hops clamped)
//!     → engine.rs (bounded BFS over TransactionHistoryProvider)
//!     → path.rs (FlowPath materialization, totals)
//!     → FlowResult
//!     → history.rs (bounded summary log, read by /api/trace/recent)
//! ```
//!
//! # Design Decisions
//! - Sequential expansion: one provider call in flight per trace
//! - The tracer is stateless; every trace starts from scratch
//! - No retries here; the provider owns retry policy

pub mod engine;
pub mod history;
pub mod path;
pub mod types;

pub use engine::FlowTracer;
pub use history::{TraceHistory, TraceSummary};
pub use types::{FlowPath, FlowQuery, FlowResult, QueryError, TraceError, TransactionEdge};
