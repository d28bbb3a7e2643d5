// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Prometheus metrics
//!
//! Counters and histograms live in the default registry behind `LazyLock`
//! statics; `/metrics` renders the registry in text exposition format. Two
//! families cover the service: requests by endpoint, and contract call
//! durations by operation and outcome.

use std::{sync::LazyLock, time::Instant};

use axum::{
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use contract_client::ContractError;
use prometheus::{
    Encoder, HistogramVec, IntCounterVec, TextEncoder, register_histogram_vec,
    register_int_counter_vec,
};
use tracing::error;

/// Total number of API requests received, labeled by endpoint.
pub static REQUESTS_BY_ENDPOINT: LazyLock<IntCounterVec> = LazyLock::new(|| {
    register_int_counter_vec!(
        "fractional_nft_api_requests_total",
        "Total number of API requests, labeled by endpoint",
        &["endpoint"]
    )
    .expect("Failed to create fractional_nft_api_requests_total counter vec")
});

/// Histogram of contract read and send durations in seconds.
pub static CONTRACT_CALL_DURATION: LazyLock<HistogramVec> = LazyLock::new(|| {
    register_histogram_vec!(
        "fractional_nft_api_contract_call_duration",
        "Contract call durations in seconds, labeled by operation and result",
        &["operation", "result"],
        vec![0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0]
    )
    .expect("Failed to create contract call duration histogram")
});

/// Count one request against `endpoint`
pub fn inc_requests(endpoint: &str) {
    REQUESTS_BY_ENDPOINT.with_label_values(&[endpoint]).inc();
}

/// Await a contract call, recording its duration and outcome
///
/// # Errors
///
/// Propagates whatever error the call returned, after recording it.
pub async fn observe_contract_call<T>(
    operation: &str,
    call: impl Future<Output = Result<T, ContractError>>,
) -> Result<T, ContractError> {
    let started = Instant::now();
    let result = call.await;

    CONTRACT_CALL_DURATION
        .with_label_values(&[operation, if result.is_ok() { "ok" } else { "error" }])
        .observe(started.elapsed().as_secs_f64());

    result
}

/// Render the default registry in Prometheus text exposition format
pub async fn metrics_handler() -> Response {
    let encoder = TextEncoder::new();
    match encoder.encode_to_string(&prometheus::gather()) {
        Ok(body) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, encoder.format_type())],
            body,
        )
            .into_response(),
        Err(err) => {
            error!(error = %err, "metrics encoding failed");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
