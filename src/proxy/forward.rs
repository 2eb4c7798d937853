//! Request forwarding to proxy targets.
//!
//! # Responsibilities
//! - Rebuild the inbound request against the planned upstream URL
//! - Apply "change origin" (`Host` and `Origin` follow the target)
//! - One attempt per inbound request, bounded by the forward timeout
//! - Report through the rule's hooks and map failures to gateway errors
//!
//! # Design Decisions
//! - No retries and no fallback target
//! - Bodies stream through in both directions; nothing is buffered

use std::error::Error as _;
use std::time::{Duration, Instant};

use axum::body::Body;
use axum::http::{header, HeaderValue, Request, Response, StatusCode, Uri};
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};
use thiserror::Error;
use url::{Position, Url};

use crate::http::response::{gateway_error, strip_hop_by_hop};
use crate::observability::metrics;
use crate::proxy::hooks::{ForwardContext, ProxyHooks};
use crate::proxy::rule::{ForwardPlan, ProxyRule};

/// A forward that did not produce an upstream response.
#[derive(Debug, Error)]
pub enum ProxyForwardError {
    /// The resolved target is not a usable URL.
    #[error("invalid target '{target}': {reason}")]
    InvalidTarget { target: String, reason: String },

    /// Connection refused, DNS failure and similar.
    #[error("connect failed: {0}")]
    Connect(String),

    #[error("no response within {0:?}")]
    Timeout(Duration),

    /// Protocol error after connecting.
    #[error("upstream failed: {0}")]
    Upstream(String),
}

impl ProxyForwardError {
    /// Status returned to the original client.
    pub fn status(&self) -> StatusCode {
        match self {
            ProxyForwardError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
            _ => StatusCode::BAD_GATEWAY,
        }
    }
}

/// Shared upstream client.
#[derive(Clone)]
pub struct Forwarder {
    client: Client<HttpConnector, Body>,
    timeout: Duration,
}

impl Forwarder {
    pub fn new(connect_timeout: Duration, timeout: Duration) -> Self {
        let mut connector = HttpConnector::new();
        connector.set_connect_timeout(Some(connect_timeout));
        let client = Client::builder(TokioExecutor::new()).build(connector);
        Self { client, timeout }
    }

    /// Forward `request` according to `plan` and return the client-facing
    /// response. Never fails: errors become 502/504.
    pub async fn forward(
        &self,
        plan: &ForwardPlan<'_>,
        request: Request<Body>,
        request_id: &str,
    ) -> Response<Body> {
        let start = Instant::now();
        let rule = plan.rule;
        let original = request
            .uri()
            .path_and_query()
            .map(|pq| pq.as_str().to_string())
            .unwrap_or_else(|| "/".to_string());
        let method = request.method().clone();

        let ctx = ForwardContext {
            rule: &rule.name,
            request_id,
            method: &method,
            original: &original,
            upstream: plan.upstream.as_str(),
        };

        let upstream_req = match build_upstream_request(plan, request) {
            Ok(req) => req,
            Err(e) => return self.fail(rule.hooks.as_ref(), &ctx, e, start),
        };

        rule.hooks.on_request_sent(&ctx);

        let result = tokio::time::timeout(self.timeout, self.client.request(upstream_req)).await;
        match result {
            Ok(Ok(response)) => {
                let status = response.status();
                rule.hooks.on_response_received(&ctx, status);
                metrics::record_forward(&rule.name, status.as_u16(), start);

                tracing::debug!(
                    rule = %rule.name,
                    request_id = %request_id,
                    status = %status,
                    upstream = %plan.upstream,
                    "Forwarded request"
                );

                let (mut parts, body) = response.into_parts();
                strip_hop_by_hop(&mut parts.headers);
                Response::from_parts(parts, Body::new(body))
            }
            Ok(Err(e)) => {
                let detail = match e.source() {
                    Some(source) => format!("{}: {}", e, source),
                    None => e.to_string(),
                };
                let err = if e.is_connect() {
                    ProxyForwardError::Connect(detail)
                } else {
                    ProxyForwardError::Upstream(detail)
                };
                self.fail(rule.hooks.as_ref(), &ctx, err, start)
            }
            Err(_) => self.fail(
                rule.hooks.as_ref(),
                &ctx,
                ProxyForwardError::Timeout(self.timeout),
                start,
            ),
        }
    }

    /// Fail a request whose target could not be resolved. Nothing is sent.
    pub fn reject(
        &self,
        rule: &ProxyRule,
        request: &Request<Body>,
        request_id: &str,
        error: ProxyForwardError,
    ) -> Response<Body> {
        let original = request
            .uri()
            .path_and_query()
            .map(|pq| pq.as_str())
            .unwrap_or("/");
        let upstream = match &error {
            ProxyForwardError::InvalidTarget { target, .. } => target.clone(),
            _ => rule.target.fallback().to_string(),
        };
        let ctx = ForwardContext {
            rule: &rule.name,
            request_id,
            method: request.method(),
            original,
            upstream: &upstream,
        };
        self.fail(rule.hooks.as_ref(), &ctx, error, Instant::now())
    }

    fn fail(
        &self,
        hooks: &dyn ProxyHooks,
        ctx: &ForwardContext<'_>,
        error: ProxyForwardError,
        start: Instant,
    ) -> Response<Body> {
        tracing::warn!(rule = %ctx.rule, request_id = %ctx.request_id, error = %error, "Upstream request failed");
        metrics::record_forward(ctx.rule, error.status().as_u16(), start);
        hooks.on_error(ctx, &error);
        gateway_error(&error)
    }
}

fn build_upstream_request(
    plan: &ForwardPlan<'_>,
    request: Request<Body>,
) -> Result<Request<Body>, ProxyForwardError> {
    let invalid = |reason: String| ProxyForwardError::InvalidTarget {
        target: plan.upstream.to_string(),
        reason,
    };

    if plan.upstream.scheme() != "http" {
        return Err(invalid(format!("unsupported scheme '{}'", plan.upstream.scheme())));
    }
    let uri: Uri = plan
        .upstream
        .as_str()
        .parse()
        .map_err(|e: axum::http::uri::InvalidUri| invalid(e.to_string()))?;

    let (mut parts, body) = request.into_parts();
    strip_hop_by_hop(&mut parts.headers);

    if plan.rule.change_origin {
        let host = HeaderValue::from_str(authority(&plan.upstream)).map_err(|e| invalid(e.to_string()))?;
        parts.headers.insert(header::HOST, host);
        if parts.headers.contains_key(header::ORIGIN) {
            let origin = HeaderValue::from_str(&plan.upstream.origin().ascii_serialization())
                .map_err(|e| invalid(e.to_string()))?;
            parts.headers.insert(header::ORIGIN, origin);
        }
    }

    let mut builder = Request::builder().method(parts.method).uri(uri);
    if let Some(headers) = builder.headers_mut() {
        *headers = parts.headers;
    }
    builder.body(body).map_err(|e| invalid(e.to_string()))
}

/// `host[:port]` of a URL.
fn authority(url: &Url) -> &str {
    &url[Position::BeforeHost..Position::AfterPort]
}
