// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! HTTP gateway for an NFT fractionalization contract
//!
//! Every endpoint forwards to one of two deployed contracts through the
//! `contract-client` traits; this crate's own job is routing, parameter
//! marshaling, and shaping contract results into JSON envelopes. The service
//! holds no state of its own between requests, so the interesting parts are
//! all ambient: a static API-key gate checked before any contract call, a
//! tower middleware stack with request ids and timeouts, and coordinated
//! graceful shutdown.
//!
//! # Modules
//!
//! - [`config`]: hierarchical configuration with validated newtypes and
//!   redacted secrets
//! - [`error`]: the caller-visible failure taxonomy and its response mapping
//! - [`state`]: per-request handle on the configuration and contract gateway
//! - [`server`]: lifecycle, middleware stack, and shutdown coordination
//! - [`routes`]: the six endpoints and their handlers
//! - [`middleware`]: the `x-api-key` gate
//! - [`extractors`]: JSON body extraction with field-aware diagnostics
//! - [`metrics`]: Prometheus families and the `/metrics` handler
//! - [`docs`]: `OpenAPI` document and Swagger UI

pub mod config;
pub mod docs;
pub mod error;
pub mod extractors;
pub mod metrics;
pub mod middleware;
pub mod routes;
pub mod server;
pub mod state;

pub use config::{ApiKey, ChainSettings, Environment, ServerConfig};
pub use error::{ServerError, ServerResult};
pub use server::{Server, ShutdownConfig};
pub use state::ServerState;
