//! Money-flow tracing service.
//!
//! Breadth-first search over on-chain transaction history to find how funds
//! moved from one address to another within a bounded number of hops.

pub mod blockchain;
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod resilience;
pub mod tracer;

pub use config::schema::ServiceConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use tracer::{FlowQuery, FlowResult, FlowTracer};
