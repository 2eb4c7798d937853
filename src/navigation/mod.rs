//! Hierarchical console navigation.
//!
//! # Data Flow
//! ```text
//! LayerDescriptor[] (catalog or config)
//!     → builder.rs (validate, compose, attach meta, inject redirects)
//!     → RouteTree (immutable, built once at startup)
//!
//! Per navigation:
//!     path → navigator.rs (sequence guard)
//!          → tree.rs resolve (match leaf, follow redirects)
//!          → nearest ancestor meta
//!          → shell.rs NavigationShell::render
//! ```
//!
//! # Design Decisions
//! - Layers are data; the builder has no per-layer branches
//! - Metadata is attached once per layer and looked up by ancestry
//! - Structural defects fail the build, never a navigation

pub mod builder;
pub mod catalog;
pub mod error;
pub mod layer;
pub mod navigator;
pub mod pages;
pub mod shell;
pub mod tree;

pub use builder::RouteTreeBuilder;
pub use error::ConfigurationError;
pub use layer::{LayerDescriptor, PageBinding, SidebarEntry};
pub use navigator::{NavigationOutcome, NavigationTicket, Navigator};
pub use pages::{PageKey, PageRegistry};
pub use shell::{HtmlShell, NavigationShell, Outlet, ShellView};
pub use tree::{Component, LayerMeta, Resolution, RouteNode, RouteTree};
