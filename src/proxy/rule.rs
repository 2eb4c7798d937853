//! Prefix rules.

use std::sync::Arc;
use url::Url;

use crate::proxy::env::EnvSource;
use crate::proxy::forward::ProxyForwardError;
use crate::proxy::hooks::{NoHooks, ProxyHooks};

/// Where a rule forwards to: an optional environment override, else a
/// fixed fallback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetSpec {
    env: Option<String>,
    fallback: Url,
}

impl TargetSpec {
    pub fn fixed(fallback: Url) -> Self {
        Self {
            env: None,
            fallback,
        }
    }

    pub fn with_env(env: impl Into<String>, fallback: Url) -> Self {
        Self {
            env: Some(env.into()),
            fallback,
        }
    }

    pub fn env_var(&self) -> Option<&str> {
        self.env.as_deref()
    }

    pub fn fallback(&self) -> &Url {
        &self.fallback
    }

    /// Resolve the base URL now.
    pub fn resolve(&self, env: &dyn EnvSource) -> Result<Url, ProxyForwardError> {
        let Some(raw) = self.env.as_deref().and_then(|name| env.var(name)) else {
            return Ok(self.fallback.clone());
        };
        Url::parse(raw.trim()).map_err(|e| ProxyForwardError::InvalidTarget {
            target: raw.clone(),
            reason: e.to_string(),
        })
    }
}

/// One dev-proxy entry.
#[derive(Debug, Clone)]
pub struct ProxyRule {
    pub name: String,
    pub prefix: String,
    pub target: TargetSpec,
    /// Rewrite `Host`/`Origin` to the target.
    pub change_origin: bool,
    pub hooks: Arc<dyn ProxyHooks>,
}

impl ProxyRule {
    pub fn new(name: impl Into<String>, prefix: impl Into<String>, target: TargetSpec) -> Self {
        Self {
            name: name.into(),
            prefix: prefix.into(),
            target,
            change_origin: true,
            hooks: Arc::new(NoHooks),
        }
    }

    pub fn with_hooks(mut self, hooks: Arc<dyn ProxyHooks>) -> Self {
        self.hooks = hooks;
        self
    }

    pub fn change_origin(mut self, enabled: bool) -> Self {
        self.change_origin = enabled;
        self
    }

    pub fn matches(&self, path: &str) -> bool {
        path.starts_with(&self.prefix)
    }

    /// Strip the prefix. The result always starts with `/`.
    pub fn rewrite(&self, path: &str) -> String {
        let rest = path.strip_prefix(self.prefix.as_str()).unwrap_or(path);
        if rest.starts_with('/') {
            rest.to_string()
        } else {
            format!("/{}", rest)
        }
    }

    /// Work out the upstream URL for a matched request.
    pub fn plan(
        &self,
        path: &str,
        query: Option<&str>,
        env: &dyn EnvSource,
    ) -> Result<ForwardPlan<'_>, ProxyForwardError> {
        let target = self.target.resolve(env)?;
        let forwarded_path = self.rewrite(path);

        let mut upstream = target.clone();
        let base = target.path().trim_end_matches('/');
        upstream.set_path(&format!("{}{}", base, forwarded_path));
        upstream.set_query(query);

        Ok(ForwardPlan {
            rule: self,
            target,
            forwarded_path,
            upstream,
        })
    }
}

/// A matched rule with its target resolved.
#[derive(Debug, Clone)]
pub struct ForwardPlan<'a> {
    pub rule: &'a ProxyRule,
    /// Base target URL as resolved for this request.
    pub target: Url,
    /// Request path after the rewrite.
    pub forwarded_path: String,
    /// Full URL the request goes to.
    pub upstream: Url,
}
