//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured log events)
//!     → metrics.rs (counters, histograms)
//!
//! Proxy hooks (proxy::hooks) log through the same tracing subscriber,
//! tagged with the request ID.
//! ```

pub mod logging;
pub mod metrics;
