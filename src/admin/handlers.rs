use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::http::server::AppState;
use crate::navigation::{Resolution, RouteTree};

#[derive(Serialize)]
pub struct SystemStatus {
    pub version: &'static str,
    pub status: &'static str,
    pub layers: usize,
    pub proxy_rules: usize,
}

#[derive(Serialize)]
pub struct ProxyRuleStatus {
    pub name: String,
    pub prefix: String,
    pub env: Option<String>,
    pub fallback: String,
    /// Target as it would resolve right now.
    pub target: Option<String>,
    pub error: Option<String>,
    pub change_origin: bool,
}

#[derive(Deserialize)]
pub struct ResolveParams {
    pub path: String,
}

#[derive(Serialize)]
pub struct ResolveReport {
    pub path: String,
    pub outcome: &'static str,
    pub canonical: Option<String>,
    pub page: Option<String>,
    pub layer: Option<String>,
    pub redirected_from: Option<String>,
    /// Set when a proxy rule claims the path before navigation does.
    pub proxied_by: Option<String>,
}

pub async fn get_status(State(state): State<AppState>) -> Json<SystemStatus> {
    Json(SystemStatus {
        version: env!("CARGO_PKG_VERSION"),
        status: "operational",
        layers: state.console.tree.layers().count(),
        proxy_rules: state.console.proxy.rules().len(),
    })
}

pub async fn get_routes(State(state): State<AppState>) -> Json<RouteTree> {
    Json(state.console.tree.clone())
}

pub async fn get_proxy(State(state): State<AppState>) -> Json<Vec<ProxyRuleStatus>> {
    let rules = state
        .console
        .proxy
        .rules()
        .iter()
        .map(|rule| {
            let resolved = rule.target.resolve(state.env.as_ref());
            ProxyRuleStatus {
                name: rule.name.clone(),
                prefix: rule.prefix.clone(),
                env: rule.target.env_var().map(str::to_string),
                fallback: rule.target.fallback().to_string(),
                target: resolved.as_ref().ok().map(ToString::to_string),
                error: resolved.err().map(|e| e.to_string()),
                change_origin: rule.change_origin,
            }
        })
        .collect();
    Json(rules)
}

pub async fn get_resolve(
    State(state): State<AppState>,
    Query(params): Query<ResolveParams>,
) -> Json<ResolveReport> {
    let proxied_by = state
        .console
        .proxy
        .match_path(&params.path)
        .map(|r| r.name.clone());

    let report = match state.console.tree.resolve(&params.path) {
        Resolution::Page {
            path,
            page,
            meta,
            redirected_from,
        } => ResolveReport {
            path: params.path.clone(),
            outcome: "page",
            canonical: Some(path),
            page: Some(page.to_string()),
            layer: meta.map(|m| m.layer_key.clone()),
            redirected_from,
            proxied_by,
        },
        Resolution::NavigationMiss { .. } => ResolveReport {
            path: params.path.clone(),
            outcome: "miss",
            canonical: None,
            page: None,
            layer: None,
            redirected_from: None,
            proxied_by,
        },
    };
    Json(report)
}
