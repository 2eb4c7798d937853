//! Origin handler: serves the console's route surface.
//!
//! Requests no proxy rule claims end up here.
//! - `/` and `/{layer}` → 307 to the canonical page path, query kept
//! - `/{layer}/{page}` → shell render with the layer's metadata
//! - anything else → 404 not-found view (a NavigationMiss, never a crash)

use axum::body::Body;
use axum::http::{header, HeaderValue, Response, StatusCode};
use axum::response::{Html, IntoResponse, Redirect};

use crate::lifecycle::Console;
use crate::navigation::{HtmlShell, NavigationShell, Resolution, ShellView};
use crate::observability::metrics;

pub fn navigate(console: &Console, path: &str, query: Option<&str>) -> Response<Body> {
    let resolution = console.tree.resolve(path);

    match &resolution {
        Resolution::Page {
            path: canonical,
            redirected_from: Some(from),
            ..
        } => {
            tracing::debug!(from = %from, to = %canonical, "Navigation redirect");
            metrics::record_navigation("redirect");
            let location = match query {
                Some(query) if !query.is_empty() => format!("{}?{}", canonical, query),
                _ => canonical.clone(),
            };
            Redirect::temporary(&location).into_response()
        }
        Resolution::Page { page, meta, .. } => {
            metrics::record_navigation("page");
            let mut response = Html(render(console, &resolution)).into_response();
            if let Some(meta) = meta {
                if let Ok(value) = HeaderValue::from_str(&meta.layer_key) {
                    response.headers_mut().insert("x-console-layer", value);
                }
            }
            if let Ok(value) = HeaderValue::from_str(page.as_str()) {
                response.headers_mut().insert("x-console-page", value);
            }
            response
        }
        Resolution::NavigationMiss { path } => {
            tracing::info!(path = %path, "Navigation miss");
            metrics::record_navigation("miss");
            let mut response = (StatusCode::NOT_FOUND, Html(render(console, &resolution))).into_response();
            response
                .headers_mut()
                .insert(header::CACHE_CONTROL, HeaderValue::from_static("no-store"));
            response
        }
    }
}

fn render(console: &Console, resolution: &Resolution<'_>) -> String {
    let mut shell = HtmlShell::new(&console.pages);
    shell.render(&ShellView::from_resolution(resolution));
    shell.into_document()
}
