// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Shared request state
//!
//! One [`ServerState`] is built at startup and cloned into every request. It
//! carries the configuration, the contract gateway bound to the fixed
//! operator account, and the shutdown token. Handlers reach the chain only
//! through the gateway handle here, which keeps the operator account out of
//! globals and lets tests swap in stub gateways.

use std::sync::Arc;

use alloy_primitives::Address;
use contract_client::ChainGateway;
use tokio_util::sync::CancellationToken;

use crate::config::ServerConfig;

/// State shared by every request handler
#[derive(Debug, Clone)]
pub struct ServerState {
    config: ServerConfig,
    gateway: Arc<dyn ChainGateway>,
    shutdown: CancellationToken,
}

impl ServerState {
    /// Bundle configuration, gateway, and shutdown token into request state
    pub fn new(
        config: ServerConfig,
        gateway: Arc<dyn ChainGateway>,
        shutdown: CancellationToken,
    ) -> Self {
        Self {
            config,
            gateway,
            shutdown,
        }
    }

    /// Server configuration
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// The contract gateway every handler issues calls through
    pub fn gateway(&self) -> &Arc<dyn ChainGateway> {
        &self.gateway
    }

    /// Token that is cancelled when the server begins shutting down
    pub fn shutdown_token(&self) -> &CancellationToken {
        &self.shutdown
    }

    /// The operator account every send is issued from
    ///
    /// Doubles as the "vault" address in balance responses.
    pub fn operator(&self) -> Address {
        self.gateway.operator()
    }
}
