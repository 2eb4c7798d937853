//! Read-only introspection API under `/__console/`.

pub mod handlers;

use axum::{routing::get, Router};

use self::handlers::*;
use crate::http::server::AppState;

pub const PREFIX: &str = "/__console";

pub fn router() -> Router<AppState> {
    Router::new()
        .route(&format!("{PREFIX}/status"), get(get_status))
        .route(&format!("{PREFIX}/routes"), get(get_routes))
        .route(&format!("{PREFIX}/proxy"), get(get_proxy))
        .route(&format!("{PREFIX}/resolve"), get(get_resolve))
}
