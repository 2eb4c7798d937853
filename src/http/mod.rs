//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware, dispatch)
//!     → request.rs (request ID)
//!     → proxy table match?
//!         yes → proxy::forward → response.rs (hop-by-hop strip, gateway errors)
//!         no  → origin.rs (route tree resolve → redirect / shell render / 404)
//!     → Send to client
//! ```

pub mod origin;
pub mod request;
pub mod response;
pub mod server;

pub use request::{UuidRequestId, X_REQUEST_ID};
pub use server::{AppState, HttpServer};
