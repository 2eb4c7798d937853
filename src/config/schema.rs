//! Configuration schema definitions.
//!
//! Everything has a default, so an empty file (or no file at all)
//! describes the stock console: six layers behind one shell, and the
//! `/api` and `/agent` dev-proxy rules.

use serde::{Deserialize, Serialize};

use crate::navigation::catalog;
use crate::navigation::layer::LayerDescriptor;
use crate::proxy::hooks::HookEvents;

/// Root configuration for the console dev server.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ConsoleConfig {
    /// Listener settings.
    pub server: ServerConfig,

    /// Upstream timeouts.
    pub timeouts: TimeoutConfig,

    /// Logging and metrics.
    pub observability: ObservabilityConfig,

    /// Layers and the root redirect.
    pub navigation: NavigationConfig,

    /// Dev-proxy rules, in match order.
    pub proxy: ProxyConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,

    /// Whole-request deadline in seconds.
    pub request_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            request_timeout_secs: 120,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Connection establishment timeout in seconds.
    pub connect_secs: u64,

    /// Time allowed for a target to start answering, in seconds.
    pub forward_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            connect_secs: 5,
            forward_secs: 60,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Default filter when `RUST_LOG` is unset.
    pub log_level: String,

    pub log_format: LogFormat,

    /// Enable the Prometheus endpoint.
    pub metrics_enabled: bool,

    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

/// Target of the `/` redirect.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct RootRedirectConfig {
    pub layer: String,
    pub page: String,
}

impl Default for RootRedirectConfig {
    fn default() -> Self {
        Self {
            layer: catalog::ROOT_LAYER.to_string(),
            page: catalog::ROOT_PAGE.to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct NavigationConfig {
    pub root: RootRedirectConfig,

    /// Reject sidebar links that point nowhere.
    pub strict_sidebar: bool,

    /// Layers in display order. Defaults to the built-in catalog.
    pub layers: Vec<LayerDescriptor>,
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            root: RootRedirectConfig::default(),
            strict_sidebar: true,
            layers: catalog::console_layers(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ProxyConfig {
    /// First match wins; list the most specific prefix first.
    pub rules: Vec<ProxyRuleConfig>,
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            rules: vec![
                ProxyRuleConfig {
                    name: "api".to_string(),
                    prefix: "/api".to_string(),
                    target: "http://api:8000".to_string(),
                    target_env: Some("VITE_PROXY_API_TARGET".to_string()),
                    change_origin: true,
                    hooks: HookEvents::all(),
                },
                ProxyRuleConfig {
                    name: "agent".to_string(),
                    prefix: "/agent".to_string(),
                    target: "http://agent:8001".to_string(),
                    target_env: Some("VITE_PROXY_AGENT_TARGET".to_string()),
                    change_origin: true,
                    hooks: HookEvents::default(),
                },
            ],
        }
    }
}

/// One dev-proxy rule.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProxyRuleConfig {
    /// Rule identifier for logging/metrics.
    pub name: String,

    /// Path prefix to match; stripped before forwarding.
    pub prefix: String,

    /// Fallback target when the override is unset.
    pub target: String,

    /// Environment variable that overrides `target`.
    #[serde(default)]
    pub target_env: Option<String>,

    #[serde(default = "default_change_origin")]
    pub change_origin: bool,

    /// Which lifecycle events are logged.
    #[serde(default)]
    pub hooks: HookEvents,
}

fn default_change_origin() -> bool {
    true
}
