//! Environment lookup for proxy target overrides.

use std::collections::HashMap;

/// Source of environment overrides, consulted every time a rule is
/// evaluated.
pub trait EnvSource: Send + Sync {
    /// Value of `name`, or `None` when unset or blank.
    fn var(&self, name: &str) -> Option<String>;
}

/// The process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn var(&self, name: &str) -> Option<String> {
        std::env::var(name).ok().filter(|v| !v.trim().is_empty())
    }
}

impl EnvSource for HashMap<String, String> {
    fn var(&self, name: &str) -> Option<String> {
        self.get(name).filter(|v| !v.trim().is_empty()).cloned()
    }
}
