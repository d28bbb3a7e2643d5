// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Caller-visible failure taxonomy
//!
//! Two failure classes reach API clients: authorization failures (403 with a
//! fixed message) and rejected contract calls (500 carrying the underlying
//! message verbatim). Malformed requests are answered with 400 before any
//! contract call is issued. All of them render as the same JSON envelope,
//! `{"error": <message>, "status": <code>}`. Nothing is retried.

use std::net::SocketAddr;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use contract_client::ContractError;
use serde::Serialize;
use thiserror::Error;
use tracing::error;
use utoipa::ToSchema;

/// Fixed message returned for missing or incorrect API keys
pub const UNAUTHORIZED_MESSAGE: &str = "Unauthorized: invalid or missing API key";

/// JSON body every failure response carries
///
/// This is the shape the `#[utoipa::path]` annotations document for 400,
/// 403, and 500 responses.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorEnvelope {
    /// Human-readable failure message
    #[schema(example = "Unauthorized: invalid or missing API key")]
    pub error: String,
    /// HTTP status code, repeated in the body
    #[schema(example = 403)]
    pub status: u16,
}

/// Failures surfaced by the gateway
#[derive(Debug, Error)]
pub enum ServerError {
    /// Configuration could not be loaded or failed validation
    #[error("configuration error: {message}")]
    Config {
        /// What was wrong with the configuration
        message: String,
    },

    /// The listen socket could not be bound
    #[error("failed to bind {address}: {source}")]
    Bind {
        /// Address the server tried to bind
        address: SocketAddr,
        /// Underlying IO error
        source: std::io::Error,
    },

    /// The listener was bound but could not start serving
    #[error("server startup failed: {source}")]
    Startup {
        /// Underlying IO error
        source: std::io::Error,
    },

    /// The accept loop ended with an error
    #[error("server terminated abnormally: {source}")]
    Shutdown {
        /// Underlying IO error
        source: std::io::Error,
    },

    /// The `x-api-key` header was absent or did not match the secret
    #[error("{}", UNAUTHORIZED_MESSAGE)]
    Unauthorized,

    /// The request body or a path parameter could not be parsed
    #[error("invalid request: {message}")]
    BadRequest {
        /// Parse diagnostic, naming the offending field where possible
        message: String,
    },

    /// A contract read or send was rejected
    ///
    /// The underlying message travels to the caller unmodified.
    #[error(transparent)]
    Contract(#[from] ContractError),
}

/// Result type for server operations
pub type ServerResult<T> = Result<T, ServerError>;

impl ServerError {
    /// HTTP status this error is reported with
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Unauthorized => StatusCode::FORBIDDEN,
            Self::BadRequest { .. } => StatusCode::BAD_REQUEST,
            Self::Config { .. }
            | Self::Bind { .. }
            | Self::Startup { .. }
            | Self::Shutdown { .. }
            | Self::Contract(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        // Contract failures are the only class worth a server-side record;
        // the rest are client mistakes or already logged at startup.
        if let Self::Contract(source) = &self {
            error!(error = %source, "contract call failed");
        }

        let status = self.status_code();
        let envelope = ErrorEnvelope {
            error: self.to_string(),
            status: status.as_u16(),
        };
        (status, Json(envelope)).into_response()
    }
}
