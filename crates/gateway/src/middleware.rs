// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Middleware module for HTTP request processing
//!
//! This module provides the API-key gate applied to every route except the
//! liveness root.

use axum::{
    body::Body,
    extract::State,
    http::{HeaderName, Request},
    middleware::Next,
    response::Response,
};
use tracing::warn;

use crate::{error::ServerError, state::ServerState};

/// Header clients present the API secret in
pub const API_KEY_HEADER: HeaderName = HeaderName::from_static("x-api-key");

/// Require the configured API key on every request passing through
///
/// The header value must exactly match the configured secret. Rejected
/// requests are answered with 403 before any handler runs, so no contract
/// call is ever issued for them and the rejection has no side effects.
pub async fn require_api_key(
    State(state): State<ServerState>,
    req: Request<Body>,
    next: Next,
) -> Result<Response, ServerError> {
    let presented = req
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|value| value.to_str().ok());

    if state.config().api_key.matches(presented) {
        Ok(next.run(req).await)
    } else {
        warn!(
            path = %req.uri().path(),
            "rejecting request with missing or invalid API key"
        );
        Err(ServerError::Unauthorized)
    }
}
