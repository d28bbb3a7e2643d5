// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Request parameter extraction
//!
//! [`ApiJson`] stands in for `axum::Json` on the two POST bodies so parse
//! failures come back through the [`ServerError`] envelope with a message
//! that names the offending field, not just the byte offset where parsing
//! stopped. Address-bearing fields get a dedicated diagnostic because a
//! mistyped hex string is by far the most common client mistake.
//! [`ApiPath`] does the same for path parameters, whose default rejection
//! would otherwise bypass the envelope entirely.

use alloy_primitives::Address;
use axum::{
    extract::{FromRequest, FromRequestParts, Path, Request},
    http::{header, request::Parts},
};
use serde::de::DeserializeOwned;

use crate::error::ServerError;

// Request bodies carry a handful of scalar fields; anything larger is a
// client bug, not a legitimate payload.
const BODY_LIMIT: usize = 64 * 1024;

// Body fields that must hold contract addresses.
const ADDRESS_FIELDS: [&str; 2] = ["tokenAddress", "to"];

/// JSON body extractor with field-aware parse diagnostics
#[derive(Debug)]
pub struct ApiJson<T>(pub T);

impl<T, S> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ServerError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        if let Some(mime) = req.headers().get(header::CONTENT_TYPE) {
            let mime = mime.to_str().unwrap_or_default();
            if !mime.starts_with("application/json") {
                return Err(bad_request(format!(
                    "unsupported content-type {mime:?}, expected application/json"
                )));
            }
        }

        let body = axum::body::Bytes::from_request(req, state)
            .await
            .map_err(|err| bad_request(format!("could not read request body: {err}")))?;

        if body.is_empty() {
            return Err(bad_request("empty request body, expected a JSON object"));
        }
        if body.len() > BODY_LIMIT {
            return Err(bad_request(format!(
                "request body of {} bytes exceeds the {BODY_LIMIT} byte limit",
                body.len()
            )));
        }

        serde_json::from_slice(&body)
            .map(ApiJson)
            .map_err(|err| bad_request(describe_parse_failure(&err, &body)))
    }
}

/// Path-parameter extractor that rejects through the error envelope
///
/// Wraps `axum::extract::Path` so a malformed address or token id in the
/// path produces the same JSON envelope as every other failure instead of
/// axum's plain-text rejection.
#[derive(Debug)]
pub struct ApiPath<T>(pub T);

impl<T, S> FromRequestParts<S> for ApiPath<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = ServerError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Path::<T>::from_request_parts(parts, state).await {
            Ok(Path(value)) => Ok(ApiPath(value)),
            Err(rejection) => Err(bad_request(format!(
                "invalid path parameter: {}",
                rejection.body_text()
            ))),
        }
    }
}

fn bad_request(message: impl Into<String>) -> ServerError {
    ServerError::BadRequest {
        message: message.into(),
    }
}

/// Turn a `serde_json` error into a message a client can act on
fn describe_parse_failure(err: &serde_json::Error, body: &[u8]) -> String {
    if err.is_eof() {
        return "request body ends mid-value, JSON appears truncated".to_string();
    }
    if err.is_syntax() {
        return format!(
            "malformed JSON at line {} column {}",
            err.line(),
            err.column()
        );
    }

    // The body is well-formed JSON that does not fit the target type.
    // Re-parse it loosely and name any address fields that fail, since
    // serde's own message only reports a line and column.
    let bad_addresses = misparsed_address_fields(body);
    if !bad_addresses.is_empty() {
        return format!(
            "invalid address format in {}: addresses are 0x-prefixed 20-byte hex strings",
            bad_addresses.join(", ")
        );
    }

    let detail = err.to_string();
    if detail.contains("missing field") {
        format!("incomplete request: {detail}")
    } else {
        format!("request does not match the expected shape: {detail}")
    }
}

/// Known address-carrying fields whose values do not parse as addresses
fn misparsed_address_fields(body: &[u8]) -> Vec<String> {
    let Ok(value) = serde_json::from_slice::<serde_json::Value>(body) else {
        return Vec::new();
    };

    ADDRESS_FIELDS
        .iter()
        .filter_map(|field| {
            let raw = value.get(*field)?.as_str()?;
            raw.parse::<Address>()
                .is_err()
                .then(|| format!("{field} ({raw:?})"))
        })
        .collect()
}
