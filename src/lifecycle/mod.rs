//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (main.rs):
//!     Load config → Init logging/metrics → Build state → Bind listener
//!
//! Shutdown:
//!     SIGINT/SIGTERM (signals.rs) → Shutdown::trigger (shutdown.rs)
//!     → server stops accepting → in-flight traces drain → exit
//! ```

pub mod shutdown;
pub mod signals;

pub use shutdown::Shutdown;
