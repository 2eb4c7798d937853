//! The built route tree and path resolution.
//!
//! # Design Decisions
//! - Immutable once built; shared via `Arc` by the dev server
//! - Layer metadata lives only on the layer's subtree root; the rest of
//!   the subtree finds it by walking up the matched ancestry
//! - Containers (`Shell`, `LayerOutlet`) never match on their own; only
//!   leaves (pages and redirects) terminate a match

use serde::Serialize;

use crate::navigation::layer::SidebarEntry;
use crate::navigation::pages::PageKey;

/// Upper bound on redirect hops followed by [`RouteTree::resolve`].
pub const MAX_REDIRECTS: usize = 8;

/// What a route node renders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Component {
    /// The shared admin shell.
    Shell,
    /// Pass-through outlet for a layer's active child.
    LayerOutlet,
    /// A leaf view.
    Page(PageKey),
    /// Redirect-only node; the value is an absolute path.
    Redirect(String),
}

/// Per-layer metadata consumed by the navigation shell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LayerMeta {
    pub layer_key: String,
    pub layer_title: String,
    pub sidebar: Vec<SidebarEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteNode {
    /// Absolute path of this node.
    pub path: String,
    pub component: Component,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<LayerMeta>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<RouteNode>,
}

impl RouteNode {
    pub fn new(path: impl Into<String>, component: Component) -> Self {
        Self {
            path: path.into(),
            component,
            meta: None,
            children: Vec::new(),
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    pub fn redirect_target(&self) -> Option<&str> {
        match &self.component {
            Component::Redirect(to) => Some(to),
            _ => None,
        }
    }

    /// True when `path` is this node or lies beneath it.
    fn contains(&self, path: &str) -> bool {
        if self.path == "/" || self.path == path {
            return true;
        }
        path.strip_prefix(self.path.as_str())
            .is_some_and(|rest| rest.starts_with('/'))
    }
}

/// Result of resolving a path against the tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution<'a> {
    /// A page was found, possibly after following redirects.
    Page {
        /// Canonical path of the rendered page.
        path: String,
        page: &'a PageKey,
        meta: Option<&'a LayerMeta>,
        /// The requested path, when it differs from `path`.
        redirected_from: Option<String>,
    },
    /// Nothing in the tree answers this path.
    NavigationMiss { path: String },
}

impl Resolution<'_> {
    pub fn is_miss(&self) -> bool {
        matches!(self, Resolution::NavigationMiss { .. })
    }
}

/// Immutable route forest produced by the builder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteTree {
    pub(crate) routes: Vec<RouteNode>,
}

impl RouteTree {
    /// Top-level nodes, in match order.
    pub fn routes(&self) -> &[RouteNode] {
        &self.routes
    }

    /// Iterate the metadata-bearing layer roots, in declaration order.
    pub fn layers(&self) -> impl Iterator<Item = &LayerMeta> {
        self.routes
            .iter()
            .flat_map(|r| r.children.iter())
            .filter_map(|n| n.meta.as_ref())
    }

    /// Match `path` to a leaf and return the chain of nodes from the
    /// top-level route down to that leaf.
    pub fn match_path(&self, path: &str) -> Option<Vec<&RouteNode>> {
        let path = normalize(path);
        let mut chain = Vec::new();
        if match_in(&self.routes, &path, &mut chain) {
            Some(chain)
        } else {
            None
        }
    }

    /// Resolve a path to the page it renders, following redirects.
    pub fn resolve(&self, path: &str) -> Resolution<'_> {
        let requested = normalize(path);
        let mut current = requested.clone();

        for _ in 0..=MAX_REDIRECTS {
            let Some(chain) = self.match_path(&current) else {
                return Resolution::NavigationMiss { path: requested };
            };
            let Some(leaf) = chain.last() else {
                return Resolution::NavigationMiss { path: requested };
            };

            match &leaf.component {
                Component::Redirect(to) => {
                    current = normalize(to);
                }
                Component::Page(page) => {
                    let redirected_from = (current != requested).then(|| requested.clone());
                    return Resolution::Page {
                        path: current,
                        page,
                        meta: nearest_meta(&chain),
                        redirected_from,
                    };
                }
                Component::Shell | Component::LayerOutlet => break,
            }
        }

        tracing::warn!(path = %requested, "Navigation did not settle on a page");
        Resolution::NavigationMiss { path: requested }
    }
}

/// Closest metadata walking up from the leaf.
pub fn nearest_meta<'a>(chain: &[&'a RouteNode]) -> Option<&'a LayerMeta> {
    chain.iter().rev().find_map(|n| n.meta.as_ref())
}

fn match_in<'a>(nodes: &'a [RouteNode], path: &str, chain: &mut Vec<&'a RouteNode>) -> bool {
    for node in nodes {
        if node.is_leaf() {
            if node.path == path {
                chain.push(node);
                return true;
            }
        } else if node.contains(path) {
            chain.push(node);
            if match_in(&node.children, path, chain) {
                return true;
            }
            chain.pop();
        }
    }
    false
}

/// Trim trailing slashes, keeping the root as `/`.
fn normalize(path: &str) -> String {
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{}", trimmed)
    }
}
