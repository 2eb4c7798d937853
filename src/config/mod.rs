//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize, defaults fill gaps)
//!     → validation.rs (semantic checks)
//!     → ConsoleConfig (validated, immutable)
//!     → lifecycle::startup builds the route tree and proxy table
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; there is no hot reload, since the
//!   route tree is built exactly once per process
//! - All fields have defaults; the defaults are the stock console
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, load_or_default, ConfigError};
pub use schema::ConsoleConfig;
pub use schema::NavigationConfig;
pub use schema::ObservabilityConfig;
pub use schema::ProxyConfig;
pub use schema::ProxyRuleConfig;
