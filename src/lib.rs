//! Layered operations console: navigation model and development server.

pub mod admin;
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod navigation;
pub mod observability;
pub mod proxy;

pub use config::ConsoleConfig;
pub use http::HttpServer;
pub use lifecycle::{prepare, Console, Shutdown};
pub use navigation::{RouteTree, RouteTreeBuilder};
pub use proxy::ProxyTable;
