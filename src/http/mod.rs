//! HTTP boundary subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, request ID, trace span, timeout, body limit)
//!     → trace.rs (validate, build FlowQuery, run FlowTracer, record history)
//!     → error.rs (client / upstream failures as {success: false, error})
//!     → JSON response
//! ```
//!
//! # Routes
//! - `POST /api/trace/flow`
//! - `GET /api/trace/recent?limit=N`
//! - `GET /health`

pub mod error;
pub mod server;
pub mod trace;

pub use error::ApiError;
pub use server::{AppState, HttpServer, InnerState};
pub use trace::{FlowRequest, FlowResponse};
