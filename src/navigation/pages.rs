//! Page registry.
//!
//! Leaf views are identified by a stable [`PageKey`]. The registry only
//! records what exists and how to label it; rendering belongs to the shell.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Stable identifier of a leaf view (e.g. `"l2.draft"`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PageKey(String);

impl PageKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PageKey {
    fn from(key: &str) -> Self {
        Self::new(key)
    }
}

impl From<String> for PageKey {
    fn from(key: String) -> Self {
        Self(key)
    }
}

/// A registered page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageEntry {
    pub key: PageKey,
    pub title: String,
}

/// The set of known leaf views.
#[derive(Debug, Clone, Default)]
pub struct PageRegistry {
    pages: BTreeMap<PageKey, PageEntry>,
}

impl PageRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a page. Re-registering a key replaces its title.
    pub fn register(&mut self, key: impl Into<PageKey>, title: impl Into<String>) -> &mut Self {
        let key = key.into();
        self.pages.insert(
            key.clone(),
            PageEntry {
                key,
                title: title.into(),
            },
        );
        self
    }

    pub fn contains(&self, key: &PageKey) -> bool {
        self.pages.contains_key(key)
    }

    pub fn get(&self, key: &PageKey) -> Option<&PageEntry> {
        self.pages.get(key)
    }

    /// Title for a page, falling back to its key.
    pub fn title_of<'a>(&'a self, key: &'a PageKey) -> &'a str {
        self.get(key).map(|p| p.title.as_str()).unwrap_or(key.as_str())
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}
