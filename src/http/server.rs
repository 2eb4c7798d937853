//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the introspection API and a catch-all dispatch
//! - Wire up middleware (request ID, tracing, request timeout)
//! - Dispatch each request: proxy table first, origin otherwise
//! - Forward proxied requests to their targets
//! - Serve until the shutdown signal, then drain

use axum::{
    body::Body,
    extract::State,
    http::Request,
    response::Response,
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::admin;
use crate::http::origin;
use crate::http::request::{request_id_of, UuidRequestId};
use crate::lifecycle::{shutdown, Console};
use crate::proxy::env::{EnvSource, ProcessEnv};
use crate::proxy::forward::Forwarder;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub console: Arc<Console>,
    pub forwarder: Forwarder,
    /// Consulted on every forward for target overrides.
    pub env: Arc<dyn EnvSource>,
}

/// Console dev server.
pub struct HttpServer {
    router: Router,
    state: AppState,
}

impl HttpServer {
    /// Server reading target overrides from the process environment.
    pub fn new(console: Console) -> Self {
        Self::with_env(console, Arc::new(ProcessEnv))
    }

    pub fn with_env(console: Console, env: Arc<dyn EnvSource>) -> Self {
        let timeouts = &console.config.timeouts;
        let forwarder = Forwarder::new(
            Duration::from_secs(timeouts.connect_secs),
            Duration::from_secs(timeouts.forward_secs),
        );
        let state = AppState {
            console: Arc::new(console),
            forwarder,
            env,
        };
        let router = Self::build_router(state.clone());
        Self { router, state }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(state: AppState) -> Router {
        let request_timeout = Duration::from_secs(state.console.config.server.request_timeout_secs);
        Router::new()
            .merge(admin::router())
            .fallback(dispatch)
            .with_state(state)
            .layer(TimeoutLayer::new(request_timeout))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::x_request_id(UuidRequestId))
    }

    /// The fully layered router, for in-process use.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    pub fn console(&self) -> &Console {
        &self.state.console
    }

    /// Serve on `listener` until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown::wait(shutdown))
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Catch-all handler: first matching proxy rule, else the origin.
async fn dispatch(State(state): State<AppState>, request: Request<Body>) -> Response {
    let path = request.uri().path().to_string();
    let Some(rule) = state.console.proxy.match_path(&path) else {
        return origin::navigate(&state.console, &path, request.uri().query());
    };

    let request_id = request_id_of(&request);
    match rule.plan(&path, request.uri().query(), state.env.as_ref()) {
        Ok(plan) => {
            tracing::debug!(
                request_id = %request_id,
                rule = %rule.name,
                path = %path,
                upstream = %plan.upstream,
                "Proxying request"
            );
            state.forwarder.forward(&plan, request, &request_id).await
        }
        Err(e) => state.forwarder.reject(rule, &request, &request_id, e),
    }
}
