//! Development reverse proxy.
//!
//! # Data Flow
//! ```text
//! request path
//!     → table.rs (first rule whose prefix matches, in declaration order)
//!     → rule.rs (resolve target: env override or fallback; strip prefix)
//!     → forward.rs (single attempt, change origin, stream both ways)
//!     → hooks.rs (error / request sent / response received)
//! ```
//!
//! # Design Decisions
//! - Rules are ordered; the first match wins
//! - Targets are re-resolved from the environment on every forward
//! - Hooks observe; they never change the request or response

pub mod env;
pub mod forward;
pub mod hooks;
pub mod rule;
pub mod table;

pub use env::{EnvSource, ProcessEnv};
pub use forward::{Forwarder, ProxyForwardError};
pub use hooks::{ForwardContext, HookEvents, NoHooks, ProxyHooks, TracingHooks};
pub use rule::{ForwardPlan, ProxyRule, TargetSpec};
pub use table::{ProxyTable, ProxyTableError};
