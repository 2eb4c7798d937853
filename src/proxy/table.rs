//! Ordered proxy table.
//!
//! # Design Decisions
//! - Rules are kept in caller order; the first matching prefix wins
//! - No reordering: callers list the most specific prefix first
//! - A path no rule matches is not an error; it stays with the origin

use std::sync::Arc;
use url::Url;

use crate::config::schema::ProxyConfig;
use crate::proxy::env::EnvSource;
use crate::proxy::forward::ProxyForwardError;
use crate::proxy::hooks::TracingHooks;
use crate::proxy::rule::{ForwardPlan, ProxyRule, TargetSpec};

#[derive(Debug, Clone, Default)]
pub struct ProxyTable {
    rules: Vec<ProxyRule>,
}

impl ProxyTable {
    pub fn new(rules: Vec<ProxyRule>) -> Self {
        Self { rules }
    }

    /// Compile the configured rules, logging events per rule through
    /// [`TracingHooks`].
    pub fn from_config(config: &ProxyConfig) -> Result<Self, ProxyTableError> {
        let mut rules = Vec::with_capacity(config.rules.len());
        for rule in &config.rules {
            let fallback = Url::parse(&rule.target).map_err(|e| ProxyTableError {
                rule: rule.name.clone(),
                target: rule.target.clone(),
                source: e,
            })?;
            let target = match &rule.target_env {
                Some(var) => TargetSpec::with_env(var.clone(), fallback),
                None => TargetSpec::fixed(fallback),
            };
            rules.push(
                ProxyRule::new(rule.name.clone(), rule.prefix.clone(), target)
                    .change_origin(rule.change_origin)
                    .with_hooks(Arc::new(TracingHooks::new(rule.hooks))),
            );
        }
        Ok(Self::new(rules))
    }

    pub fn rules(&self) -> &[ProxyRule] {
        &self.rules
    }

    /// First rule whose prefix starts `path`.
    pub fn match_path(&self, path: &str) -> Option<&ProxyRule> {
        self.rules.iter().find(|r| r.matches(path))
    }

    /// Plan a forward for `path`. `None` means the request is not proxied.
    pub fn resolve(
        &self,
        path: &str,
        query: Option<&str>,
        env: &dyn EnvSource,
    ) -> Option<Result<ForwardPlan<'_>, ProxyForwardError>> {
        self.match_path(path).map(|rule| rule.plan(path, query, env))
    }
}

/// A configured fallback target is not a URL.
#[derive(Debug, thiserror::Error)]
#[error("proxy rule '{rule}': invalid target '{target}': {source}")]
pub struct ProxyTableError {
    pub rule: String,
    pub target: String,
    #[source]
    pub source: url::ParseError,
}
