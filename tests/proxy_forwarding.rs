mod common;

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::http::StatusCode;
use url::Url;

use common::{
    client, default_console, spawn_console, start_echo_backend, start_stalled_backend, unused_addr,
};
use layer_console::proxy::{
    ForwardContext, ProxyForwardError, ProxyHooks, ProxyRule, ProxyTable, TargetSpec,
};

/// Records hook invocations as `event rule path`.
#[derive(Debug, Default)]
struct RecordingHooks {
    events: Mutex<Vec<String>>,
}

impl RecordingHooks {
    fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }
}

impl ProxyHooks for RecordingHooks {
    fn on_error(&self, ctx: &ForwardContext<'_>, _error: &ProxyForwardError) {
        self.events
            .lock()
            .unwrap()
            .push(format!("error {} {}", ctx.rule, ctx.original));
    }

    fn on_request_sent(&self, ctx: &ForwardContext<'_>) {
        self.events
            .lock()
            .unwrap()
            .push(format!("sent {} {}", ctx.rule, ctx.original));
    }

    fn on_response_received(&self, ctx: &ForwardContext<'_>, status: StatusCode) {
        self.events
            .lock()
            .unwrap()
            .push(format!("received {} {}", ctx.rule, status.as_u16()));
    }
}

fn target(addr: std::net::SocketAddr) -> String {
    format!("http://{}", addr)
}

#[tokio::test]
async fn test_env_override_forwards_with_prefix_stripped() {
    let backend = start_echo_backend().await;
    let env = HashMap::from([("VITE_PROXY_API_TARGET".to_string(), target(backend))]);
    let (addr, shutdown) = spawn_console(default_console(), env).await;

    let res = client()
        .get(format!("http://{}/api/foo/bar?x=1", addr))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);
    assert!(res.headers().contains_key("x-request-id"));

    let body = res.text().await.unwrap();
    let mut lines = body.lines();
    assert_eq!(lines.next(), Some("GET /foo/bar?x=1 HTTP/1.1"));
    // change_origin: Host follows the target
    assert_eq!(lines.next(), Some(backend.to_string().as_str()));

    shutdown.trigger();
}

#[tokio::test]
async fn test_bare_prefix_forwards_to_target_root() {
    let backend = start_echo_backend().await;
    let env = HashMap::from([("VITE_PROXY_AGENT_TARGET".to_string(), target(backend))]);
    let (addr, shutdown) = spawn_console(default_console(), env).await;

    let body = client()
        .get(format!("http://{}/agent", addr))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(body.starts_with("GET / HTTP/1.1"));

    shutdown.trigger();
}

#[tokio::test]
async fn test_host_kept_without_change_origin() {
    let backend = start_echo_backend().await;
    let mut console = default_console();
    console.proxy = ProxyTable::new(vec![ProxyRule::new(
        "api",
        "/api",
        TargetSpec::fixed(Url::parse(&target(backend)).unwrap()),
    )
    .change_origin(false)]);
    let (addr, shutdown) = spawn_console(console, HashMap::new()).await;

    let body = client()
        .get(format!("http://{}/api/v1", addr))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    let host = body.lines().nth(1).unwrap();
    assert_eq!(host, addr.to_string());

    shutdown.trigger();
}

#[tokio::test]
async fn test_hooks_observe_successful_forward() {
    let backend = start_echo_backend().await;
    let hooks = Arc::new(RecordingHooks::default());
    let mut console = default_console();
    console.proxy = ProxyTable::new(vec![ProxyRule::new(
        "api",
        "/api",
        TargetSpec::fixed(Url::parse(&target(backend)).unwrap()),
    )
    .with_hooks(hooks.clone())]);
    let (addr, shutdown) = spawn_console(console, HashMap::new()).await;

    let res = client()
        .get(format!("http://{}/api/ping", addr))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);
    assert_eq!(
        hooks.events(),
        vec!["sent api /api/ping".to_string(), "received api 200".to_string()]
    );

    shutdown.trigger();
}

#[tokio::test]
async fn test_unreachable_target_is_bad_gateway() {
    let dead = unused_addr().await;
    let hooks = Arc::new(RecordingHooks::default());
    let mut console = default_console();
    console.proxy = ProxyTable::new(vec![ProxyRule::new(
        "api",
        "/api",
        TargetSpec::fixed(Url::parse(&target(dead)).unwrap()),
    )
    .with_hooks(hooks.clone())]);
    let (addr, shutdown) = spawn_console(console, HashMap::new()).await;

    let res = client()
        .get(format!("http://{}/api/ping", addr))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 502);

    // Exactly one attempt, reported once
    let events = hooks.events();
    assert_eq!(events.last().map(String::as_str), Some("error api /api/ping"));
    assert_eq!(events.iter().filter(|e| e.starts_with("error")).count(), 1);

    shutdown.trigger();
}

#[tokio::test]
async fn test_origin_follows_target_with_change_origin() {
    let backend = start_echo_backend().await;
    let env = HashMap::from([("VITE_PROXY_API_TARGET".to_string(), target(backend))]);
    let (addr, shutdown) = spawn_console(default_console(), env).await;

    let body = client()
        .post(format!("http://{}/api/items", addr))
        .header("origin", "http://browser")
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    let lines: Vec<&str> = body.lines().collect();
    assert_eq!(lines[0], "POST /items HTTP/1.1");
    assert_eq!(lines[2], target(backend));

    shutdown.trigger();
}

#[tokio::test]
async fn test_origin_untouched_without_change_origin() {
    let backend = start_echo_backend().await;
    let mut console = default_console();
    console.proxy = ProxyTable::new(vec![ProxyRule::new(
        "api",
        "/api",
        TargetSpec::fixed(Url::parse(&target(backend)).unwrap()),
    )
    .change_origin(false)]);
    let (addr, shutdown) = spawn_console(console, HashMap::new()).await;

    let body = client()
        .get(format!("http://{}/api/items", addr))
        .header("origin", "http://browser")
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert_eq!(body.lines().nth(2), Some("http://browser"));

    shutdown.trigger();
}

#[tokio::test]
async fn test_stalled_target_is_gateway_timeout() {
    let stalled = start_stalled_backend().await;
    let hooks = Arc::new(RecordingHooks::default());
    let mut console = default_console();
    console.config.timeouts.forward_secs = 1;
    console.proxy = ProxyTable::new(vec![ProxyRule::new(
        "agent",
        "/agent",
        TargetSpec::fixed(Url::parse(&target(stalled)).unwrap()),
    )
    .with_hooks(hooks.clone())]);
    let (addr, shutdown) = spawn_console(console, HashMap::new()).await;

    let started = std::time::Instant::now();
    let res = client()
        .get(format!("http://{}/agent/slow?wait=1", addr))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 504);
    assert!(started.elapsed() < std::time::Duration::from_secs(10));

    let events = hooks.events();
    assert_eq!(
        events.iter().filter(|e| e.starts_with("error")).count(),
        1,
        "{events:?}"
    );
    assert_eq!(
        events.last().map(String::as_str),
        Some("error agent /agent/slow?wait=1")
    );
    assert!(!events.iter().any(|e| e.starts_with("received")));

    shutdown.trigger();
}

#[tokio::test]
async fn test_unmatched_path_falls_through_to_origin() {
    let (addr, shutdown) = spawn_console(default_console(), HashMap::new()).await;

    let res = client()
        .get(format!("http://{}/l3", addr))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 307);
    assert_eq!(res.headers()["location"], "/l3/overview");

    let res = client()
        .get(format!("http://{}/l3/risk-topn", addr))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);
    assert!(res.text().await.unwrap().contains("风险 TopN"));

    shutdown.trigger();
}
