//! Response shaping for proxied traffic.
//!
//! # Design Decisions
//! - Hop-by-hop headers are stripped in both directions
//! - Forward failures surface as gateway errors (502, or 504 on timeout)

use axum::body::Body;
use axum::http::{header, HeaderMap, HeaderName, Response};
use axum::response::IntoResponse;

use crate::proxy::forward::ProxyForwardError;

const HOP_BY_HOP: [HeaderName; 7] = [
    header::CONNECTION,
    header::PROXY_AUTHENTICATE,
    header::PROXY_AUTHORIZATION,
    header::TE,
    header::TRAILER,
    header::TRANSFER_ENCODING,
    header::UPGRADE,
];

/// Remove hop-by-hop headers, including any named by `Connection`.
pub fn strip_hop_by_hop(headers: &mut HeaderMap) {
    let listed: Vec<HeaderName> = headers
        .get_all(header::CONNECTION)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(','))
        .filter_map(|name| HeaderName::from_bytes(name.trim().as_bytes()).ok())
        .collect();

    for name in listed.iter().chain(HOP_BY_HOP.iter()) {
        headers.remove(name);
    }
    headers.remove("keep-alive");
}

/// Client-facing response for a failed forward.
pub fn gateway_error(error: &ProxyForwardError) -> Response<Body> {
    let message = match error {
        ProxyForwardError::Timeout(_) => "Upstream timed out",
        _ => "Upstream request failed",
    };
    (error.status(), message).into_response()
}
