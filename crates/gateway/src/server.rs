// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Server lifecycle
//!
//! Builds the router with its tower middleware stack, owns the listen
//! socket, and coordinates shutdown through a `CancellationToken` cancelled
//! by a SIGINT/SIGTERM listener or by [`Server::shutdown`]. The alloy-backed
//! contract registry is constructed here and injected into the shared state;
//! tests substitute stub gateways through [`Server::with_gateway`].

use std::{net::SocketAddr, sync::Arc, time::Duration};

use axum::{Router, http::HeaderName};
use contract_client::ChainGateway;
use hyper::Request;
use onchain::{ContractRegistry, RegistryConfig};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower::ServiceBuilder;
use tower_http::{
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::{info, info_span, warn};

use crate::{
    config::ServerConfig,
    error::{ServerError, ServerResult},
    routes::create_routes,
    state::ServerState,
};

const REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-request-id");

const DEFAULT_DRAIN_TIMEOUT: Duration = Duration::from_secs(30);

/// Shutdown behavior
#[derive(Debug, Clone)]
pub struct ShutdownConfig {
    /// How long in-flight requests may keep running once shutdown begins
    pub drain_timeout: Duration,
}

impl Default for ShutdownConfig {
    fn default() -> Self {
        Self {
            drain_timeout: DEFAULT_DRAIN_TIMEOUT,
        }
    }
}

/// HTTP server wired to a contract gateway
#[derive(Debug)]
pub struct Server {
    config: ServerConfig,
    state: ServerState,
    router: Router,
    shutdown: ShutdownConfig,
    cancellation: CancellationToken,
}

impl Server {
    /// Build a server whose gateway speaks to the configured node
    ///
    /// The operator key is parsed here so a bad key fails startup; the node
    /// itself is first contacted by whichever request arrives first.
    ///
    /// # Errors
    ///
    /// Returns `ServerError::Config` if the chain settings are invalid.
    pub fn new(config: ServerConfig, shutdown: ShutdownConfig) -> ServerResult<Self> {
        let registry = connect_registry(&config)?;
        Self::with_gateway(config, shutdown, Arc::new(registry))
    }

    /// Build a server around an externally constructed gateway
    ///
    /// Tests use this to substitute stubs; production goes through
    /// [`Server::new`].
    ///
    /// # Errors
    ///
    /// Returns `ServerError::Config` if the configuration is invalid.
    pub fn with_gateway(
        config: ServerConfig,
        shutdown: ShutdownConfig,
        gateway: Arc<dyn ChainGateway>,
    ) -> ServerResult<Self> {
        let cancellation = CancellationToken::new();
        let state = ServerState::new(config.clone(), gateway, cancellation.child_token());
        let router = build_router(&state);

        Ok(Self {
            config,
            state,
            router,
            shutdown,
            cancellation,
        })
    }

    /// Serve until a shutdown signal arrives or [`Server::shutdown`] is called
    ///
    /// After shutdown begins, open connections get [`ShutdownConfig`]'s drain
    /// window to finish before the server stops waiting for them.
    ///
    /// # Errors
    ///
    /// Returns `ServerError::Bind` if the listen address is taken,
    /// `ServerError::Startup` if the bound address cannot be read, and
    /// `ServerError::Shutdown` if the accept loop fails.
    pub async fn run(self) -> ServerResult<()> {
        let Self {
            config,
            state,
            router,
            shutdown,
            cancellation,
        } = self;

        let listener = bind(config.socket_addr()).await?;
        let local = listener
            .local_addr()
            .map_err(|source| ServerError::Startup { source })?;

        info!(
            address = %local,
            environment = %config.environment,
            operator = %state.operator(),
            "fractional NFT API listening"
        );

        tokio::spawn(cancel_on_signal(cancellation.clone()));

        let drained = cancellation.clone();
        let serve = axum::serve(listener, router)
            .with_graceful_shutdown(async move { drained.cancelled().await });

        tokio::select! {
            result = serve => {
                info!("fractional NFT API stopped");
                result.map_err(|source| ServerError::Shutdown { source })
            }
            () = async {
                cancellation.cancelled().await;
                tokio::time::sleep(shutdown.drain_timeout).await;
            } => {
                warn!(
                    timeout = ?shutdown.drain_timeout,
                    "drain window expired with connections still open"
                );
                Ok(())
            }
        }
    }

    /// Bind an ephemeral socket and serve from a background task
    ///
    /// Returns the bound address and a token that stops the task when
    /// cancelled. Integration tests drive the full middleware stack through
    /// this entry point.
    ///
    /// # Errors
    ///
    /// Returns `ServerError::Bind` if the listen address is taken.
    pub async fn run_for_testing(self) -> ServerResult<(SocketAddr, CancellationToken)> {
        let listener = bind(self.config.socket_addr()).await?;
        let local = listener
            .local_addr()
            .map_err(|source| ServerError::Startup { source })?;

        let handle = self.cancellation.child_token();
        let stop = handle.child_token();
        tokio::spawn(async move {
            let _ = axum::serve(listener, self.router)
                .with_graceful_shutdown(async move { stop.cancelled().await })
                .await;
        });

        Ok((local, handle))
    }

    /// A clone of the root cancellation token
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancellation.clone()
    }

    /// Begin a graceful shutdown programmatically
    pub fn shutdown(&self) {
        info!("programmatic shutdown requested");
        self.cancellation.cancel();
    }

    /// Server configuration
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Shared request state
    pub fn state(&self) -> &ServerState {
        &self.state
    }
}

/// Build the alloy-backed registry from the configured chain settings
fn connect_registry(config: &ServerConfig) -> ServerResult<ContractRegistry> {
    let chain = &config.chain;
    let mut registry = RegistryConfig::new(
        chain.rpc_url.clone(),
        chain.operator_key.value(),
        chain.nft_contract,
    )
    .map_err(|e| ServerError::Config {
        message: e.to_string(),
    })?;
    registry.mint_gas_limit = chain.mint_gas_limit;
    registry.transfer_gas_limit = chain.transfer_gas_limit;

    ContractRegistry::connect(&registry).map_err(|e| ServerError::Config {
        message: e.to_string(),
    })
}

/// Assemble the application router and its tower middleware stack
fn build_router(state: &ServerState) -> Router {
    let trace = TraceLayer::new_for_http().make_span_with(|req: &Request<_>| {
        let request_id = req
            .headers()
            .get(REQUEST_ID_HEADER)
            .and_then(|id| id.to_str().ok())
            .unwrap_or("unset");
        info_span!("request", id = %request_id)
    });

    let stack = ServiceBuilder::new()
        .layer(SetRequestIdLayer::new(REQUEST_ID_HEADER, MakeRequestUuid))
        .layer(trace)
        .layer(PropagateRequestIdLayer::new(REQUEST_ID_HEADER))
        .layer(CorsLayer::permissive())
        .layer(TimeoutLayer::new(state.config().timeout_seconds.value()));

    create_routes(state.clone())
        .layer(stack)
        .with_state(state.clone())
}

async fn bind(address: SocketAddr) -> ServerResult<TcpListener> {
    TcpListener::bind(&address)
        .await
        .map_err(|source| ServerError::Bind { address, source })
}

/// Cancel `token` once the process receives SIGINT or SIGTERM
async fn cancel_on_signal(token: CancellationToken) {
    #[cfg(unix)]
    #[allow(clippy::expect_used)]
    let signalled = async {
        use tokio::signal::unix::{SignalKind, signal};

        let mut interrupt =
            signal(SignalKind::interrupt()).expect("failed to register SIGINT handler");
        let mut terminate =
            signal(SignalKind::terminate()).expect("failed to register SIGTERM handler");

        tokio::select! {
            _ = interrupt.recv() => "SIGINT",
            _ = terminate.recv() => "SIGTERM",
        }
    };

    #[cfg(not(unix))]
    #[allow(clippy::expect_used)]
    let signalled = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to register ctrl-c handler");
        "ctrl-c"
    };

    tokio::select! {
        signal = signalled => {
            warn!(signal, "received shutdown signal");
            token.cancel();
        }
        // Programmatic shutdown already happened; nothing left to watch.
        () = token.cancelled() => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Environment;

    #[tokio::test]
    async fn builds_against_the_testing_config() -> ServerResult<()> {
        let server = Server::new(ServerConfig::for_testing(), ShutdownConfig::default())?;
        assert_eq!(server.config().environment, Environment::Testing);
        assert!(!server.cancellation_token().is_cancelled());
        Ok(())
    }

    #[tokio::test]
    async fn shutdown_cancels_the_root_token() -> ServerResult<()> {
        let server = Server::new(ServerConfig::for_testing(), ShutdownConfig::default())?;
        let token = server.cancellation_token();

        assert!(!token.is_cancelled());
        server.shutdown();
        assert!(token.is_cancelled());
        Ok(())
    }

    #[test]
    fn default_drain_window() {
        assert_eq!(
            ShutdownConfig::default().drain_timeout,
            DEFAULT_DRAIN_TIMEOUT
        );
    }
}
