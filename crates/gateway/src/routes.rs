// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Routes module
//!
//! This module provides route configuration for the fractional NFT API
//! server. Every route except the liveness root sits behind the API-key
//! gate.

pub mod handlers;

use axum::{
    Router, middleware,
    routing::{get, post},
};
use handlers::{
    balance_handler, create_handler, liveness_handler, metadata_handler, token_id_handler,
    transfer_handler,
};

use crate::{
    docs::{openapi_spec, swagger_ui},
    metrics::metrics_handler,
    middleware::require_api_key,
    state::ServerState,
};

/// Create application routes with the API-key gate on everything but `/`
pub fn create_routes(state: ServerState) -> Router<ServerState> {
    // The liveness root is the only route reachable without the API key
    let public_routes = Router::new().route("/", get(liveness_handler));

    let protected_routes = Router::new()
        .route("/create", post(create_handler))
        .route("/transfer", post(transfer_handler))
        .route(
            "/balance/{tokenAddress}/{investorAddress}",
            get(balance_handler),
        )
        .route("/metadata/{tokenId}", get(metadata_handler))
        .route("/tokenid", get(token_id_handler))
        .route("/metrics", get(metrics_handler))
        .route("/api-doc/openapi.json", get(openapi_spec))
        .route("/swagger-ui", get(swagger_ui))
        .layer(middleware::from_fn_with_state(state, require_api_key));

    public_routes.merge(protected_routes)
}
