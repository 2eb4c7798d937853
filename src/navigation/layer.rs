//! Layer descriptors.
//!
//! A layer is one top-level console section. It is pure data: the
//! builder turns a list of these into the route tree.

use serde::{Deserialize, Serialize};

use crate::navigation::pages::PageKey;

/// One sidebar link. Order within a layer is the on-screen order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SidebarEntry {
    pub label: String,
    /// Absolute target path, e.g. `/l2/draft`.
    pub to: String,
}

impl SidebarEntry {
    pub fn new(label: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            to: to.into(),
        }
    }
}

/// Binds a subpath inside a layer to a page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageBinding {
    /// Single path segment, relative to the layer.
    pub path: String,
    pub page: PageKey,
}

/// Declarative record for one section of the console.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerDescriptor {
    pub key: String,
    pub title: String,
    #[serde(default)]
    pub sidebar: Vec<SidebarEntry>,
    #[serde(default)]
    pub pages: Vec<PageBinding>,
    /// Subpath used when the layer is visited bare.
    pub default_page: String,
}

impl LayerDescriptor {
    pub fn new(key: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            title: title.into(),
            sidebar: Vec::new(),
            pages: Vec::new(),
            default_page: String::new(),
        }
    }

    /// Add a sidebar link.
    pub fn link(mut self, label: impl Into<String>, to: impl Into<String>) -> Self {
        self.sidebar.push(SidebarEntry::new(label, to));
        self
    }

    /// Bind a subpath to a page.
    pub fn page(mut self, path: impl Into<String>, page: impl Into<PageKey>) -> Self {
        self.pages.push(PageBinding {
            path: path.into(),
            page: page.into(),
        });
        self
    }

    pub fn default_page(mut self, path: impl Into<String>) -> Self {
        self.default_page = path.into();
        self
    }

    /// Absolute path of the layer's subtree root.
    pub fn root_path(&self) -> String {
        format!("/{}", self.key)
    }

    /// Absolute path of a page inside this layer.
    pub fn page_path(&self, subpath: &str) -> String {
        format!("/{}/{}", self.key, subpath)
    }

    pub fn binding(&self, subpath: &str) -> Option<&PageBinding> {
        self.pages.iter().find(|b| b.path == subpath)
    }
}
