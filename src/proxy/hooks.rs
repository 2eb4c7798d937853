//! Proxy lifecycle hooks.
//!
//! Hooks observe a forward; they receive shared references only and
//! return nothing, so they cannot alter the request, the response or the
//! control flow.

use axum::http::{Method, StatusCode};
use serde::{Deserialize, Serialize};

use crate::proxy::forward::ProxyForwardError;

/// Facts about one forward, handed to every hook.
#[derive(Debug, Clone, Copy)]
pub struct ForwardContext<'a> {
    pub rule: &'a str,
    pub request_id: &'a str,
    pub method: &'a Method,
    /// Path and query as received from the client.
    pub original: &'a str,
    /// Upstream URL, or the raw target text when it failed to resolve.
    pub upstream: &'a str,
}

pub trait ProxyHooks: Send + Sync + std::fmt::Debug {
    /// The forward failed; the client receives a gateway error.
    fn on_error(&self, _ctx: &ForwardContext<'_>, _error: &ProxyForwardError) {}

    /// The request is about to be written to the target.
    fn on_request_sent(&self, _ctx: &ForwardContext<'_>) {}

    /// The target answered.
    fn on_response_received(&self, _ctx: &ForwardContext<'_>, _status: StatusCode) {}
}

/// Hooks that do nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoHooks;

impl ProxyHooks for NoHooks {}

/// Which lifecycle events a rule logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct HookEvents {
    pub error: bool,
    pub request_sent: bool,
    pub response_received: bool,
}

impl Default for HookEvents {
    fn default() -> Self {
        Self {
            error: true,
            request_sent: false,
            response_received: false,
        }
    }
}

impl HookEvents {
    pub fn all() -> Self {
        Self {
            error: true,
            request_sent: true,
            response_received: true,
        }
    }
}

/// Logs the selected events through `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingHooks {
    events: HookEvents,
}

impl TracingHooks {
    pub fn new(events: HookEvents) -> Self {
        Self { events }
    }
}

impl ProxyHooks for TracingHooks {
    fn on_error(&self, ctx: &ForwardContext<'_>, error: &ProxyForwardError) {
        if self.events.error {
            tracing::error!(
                rule = ctx.rule,
                request_id = ctx.request_id,
                method = %ctx.method,
                path = ctx.original,
                upstream = ctx.upstream,
                error = %error,
                "Proxy error"
            );
        }
    }

    fn on_request_sent(&self, ctx: &ForwardContext<'_>) {
        if self.events.request_sent {
            tracing::info!(
                rule = ctx.rule,
                request_id = ctx.request_id,
                method = %ctx.method,
                path = ctx.original,
                upstream = ctx.upstream,
                "Sending request to target"
            );
        }
    }

    fn on_response_received(&self, ctx: &ForwardContext<'_>, status: StatusCode) {
        if self.events.response_received {
            tracing::info!(
                rule = ctx.rule,
                request_id = ctx.request_id,
                status = status.as_u16(),
                path = ctx.original,
                "Received response from target"
            );
        }
    }
}
