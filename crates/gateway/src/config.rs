// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Server configuration
//!
//! Settings load hierarchically: built-in defaults, then `config.json`, then
//! `config.{environment}.json`, then `GATEWAY_`-prefixed environment
//! variables with `__` separating nesting levels (so `GATEWAY_CHAIN__RPC_URL`
//! addresses the `chain` table). Values that can be wrong in dangerous ways
//! get validated newtypes, and both secrets ([`ApiKey`], [`OperatorKey`])
//! redact themselves in `Debug` output.

use std::{
    fmt,
    net::{IpAddr, Ipv4Addr, SocketAddr},
    time::Duration,
};

use alloy_primitives::Address;
use anyhow::{Result, ensure};
use config::{Config, ConfigError, Environment as ConfigEnv, File};
use serde::{Deserialize, Deserializer, Serialize, de};
use url::Url;

use crate::error::{ServerError, ServerResult};

// Gas limits carried over from the deployed contract's reference client.
const DEFAULT_MINT_GAS_LIMIT: u64 = 3_000_000;
const DEFAULT_TRANSFER_GAS_LIMIT: u64 = 100_000;

const MAX_TIMEOUT_SECS: u64 = 300;

// Well-known Anvil development key, not a live account.
const TESTING_OPERATOR_KEY: &str =
    "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

/// Listen port, validated against the environment at load time
///
/// Port 0 asks the OS for an ephemeral port, which only makes sense under
/// test; development and production must name a real port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ServerPort(u16);

impl ServerPort {
    /// Validate `port` for `environment`
    ///
    /// # Errors
    ///
    /// Returns an error for port 0 outside the testing environment.
    pub fn new(port: u16, environment: Environment) -> Result<Self> {
        ensure!(
            port != 0 || environment == Environment::Testing,
            "port 0 is only valid in the testing environment"
        );
        Ok(Self(port))
    }

    /// OS-assigned ephemeral port for tests
    pub const fn testing() -> Self {
        Self(0)
    }

    /// The raw port number
    pub fn value(self) -> u16 {
        self.0
    }
}

/// Per-request timeout, bounded so a hung RPC call cannot pin a worker
/// indefinitely
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimeoutSeconds(Duration);

impl TimeoutSeconds {
    /// Validate a timeout given in whole seconds
    ///
    /// # Errors
    ///
    /// Returns an error when the value is 0 or above 300 seconds.
    pub fn new(seconds: u64) -> Result<Self> {
        ensure!(
            (1..=MAX_TIMEOUT_SECS).contains(&seconds),
            "timeout must be between 1 and {MAX_TIMEOUT_SECS} seconds"
        );
        Ok(Self(Duration::from_secs(seconds)))
    }

    /// Short timeout for tests
    pub const fn testing() -> Self {
        Self(Duration::from_secs(5))
    }

    /// The timeout as a [`Duration`]
    pub fn value(self) -> Duration {
        self.0
    }
}

impl<'de> Deserialize<'de> for TimeoutSeconds {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Self::new(u64::deserialize(deserializer)?).map_err(de::Error::custom)
    }
}

/// The static secret clients must present in the `x-api-key` header
///
/// Never logged and never serialized; `Debug` renders a placeholder.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    /// Wrap a configured secret, rejecting blank values
    ///
    /// # Errors
    ///
    /// Returns an error if the key is empty or whitespace-only.
    pub fn new(value: impl Into<String>) -> Result<Self> {
        let value = value.into();
        ensure!(!value.trim().is_empty(), "API key cannot be empty");
        Ok(Self(value))
    }

    /// Whether a header-supplied value matches this key exactly
    ///
    /// `None` (header absent or not valid UTF-8) never matches.
    pub fn matches(&self, presented: Option<&str>) -> bool {
        presented == Some(self.0.as_str())
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(***)")
    }
}

impl<'de> Deserialize<'de> for ApiKey {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Self::new(String::deserialize(deserializer)?).map_err(de::Error::custom)
    }
}

/// Hex-encoded operator private key, redacted in `Debug` output
///
/// Only emptiness is checked here; the signer constructed at startup is the
/// real validation.
#[derive(Clone, PartialEq, Eq)]
pub struct OperatorKey(String);

impl OperatorKey {
    /// Wrap the configured key material, rejecting blank values
    ///
    /// # Errors
    ///
    /// Returns an error if the key is empty or whitespace-only.
    pub fn new(value: impl Into<String>) -> Result<Self> {
        let value = value.into();
        ensure!(!value.trim().is_empty(), "operator key cannot be empty");
        Ok(Self(value))
    }

    /// The raw key material
    pub fn value(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for OperatorKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("OperatorKey(***)")
    }
}

impl<'de> Deserialize<'de> for OperatorKey {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Self::new(String::deserialize(deserializer)?).map_err(de::Error::custom)
    }
}

/// Deployment environment the server believes it runs in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Production deployment
    Production,
    /// Local development
    Development,
    /// Automated tests
    Testing,
}

impl Environment {
    /// Name used in config files and log lines
    pub const fn as_str(self) -> &'static str {
        match self {
            Environment::Production => "production",
            Environment::Development => "development",
            Environment::Testing => "testing",
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Chain-facing settings: node endpoint, operator account, and contracts
#[derive(Debug, Clone, Deserialize)]
pub struct ChainSettings {
    /// JSON-RPC endpoint of the blockchain node
    pub rpc_url: Url,
    /// Operator private key every send is signed with
    pub operator_key: OperatorKey,
    /// Address of the deployed `FractionalNFT` contract
    pub nft_contract: Address,
    /// Gas limit attached to `mintAndFractionalize` sends
    #[serde(default = "default_mint_gas_limit")]
    pub mint_gas_limit: u64,
    /// Gas limit attached to fractional token `transfer` sends
    #[serde(default = "default_transfer_gas_limit")]
    pub transfer_gas_limit: u64,
}

const fn default_mint_gas_limit() -> u64 {
    DEFAULT_MINT_GAS_LIMIT
}

const fn default_transfer_gas_limit() -> u64 {
    DEFAULT_TRANSFER_GAS_LIMIT
}

/// Complete server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Address the listener binds
    pub host: IpAddr,
    /// Port the listener binds
    pub port: ServerPort,
    /// Per-request timeout
    pub timeout_seconds: TimeoutSeconds,
    /// Deployment environment
    pub environment: Environment,
    /// Secret required in the `x-api-key` header on protected routes
    pub api_key: ApiKey,
    /// Chain-facing settings
    pub chain: ChainSettings,
}

impl ServerConfig {
    /// Load configuration, wrapping failures into the server error type
    ///
    /// # Errors
    ///
    /// Returns `ServerError::Config` when loading or validation fails.
    pub fn from_env() -> ServerResult<Self> {
        Self::load().map_err(|e| ServerError::Config {
            message: format!("failed to load configuration: {e}"),
        })
    }

    /// Load configuration from files and the process environment
    ///
    /// Later sources override earlier ones: defaults, `config.json`,
    /// `config.{environment}.json`, then `GATEWAY_*` variables. The API key,
    /// operator key, and NFT contract address have no defaults and must come
    /// from a file or the environment. An explicit `ENVIRONMENT` variable
    /// wins over anything the files say.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a source cannot be read or a value fails
    /// validation.
    pub fn load() -> Result<Self, ConfigError> {
        let env_name = std::env::var("ENVIRONMENT").map(|v| v.to_lowercase()).ok();

        let mut builder = Config::builder()
            .set_default("host", "127.0.0.1")?
            .set_default("port", 3000)?
            .set_default("timeout_seconds", 30)?
            .set_default("environment", "development")?
            .set_default("chain.rpc_url", "http://localhost:8545")?
            .add_source(File::with_name("config.json").required(false))
            .add_source(
                File::with_name(&format!(
                    "config.{}.json",
                    env_name.as_deref().unwrap_or("development")
                ))
                .required(false),
            )
            .add_source(
                ConfigEnv::with_prefix("GATEWAY")
                    .separator("__")
                    .try_parsing(true),
            );

        if let Some(env_name) = env_name {
            builder = builder.set_override("environment", env_name)?;
        }

        let loaded: Self = builder.build()?.try_deserialize()?;

        // The port deserializes unchecked because the environment is not
        // known until the whole config is assembled; validate it now.
        ServerPort::new(loaded.port.value(), loaded.environment)
            .map_err(|e| ConfigError::Message(e.to_string()))?;

        Ok(loaded)
    }

    /// Configuration for integration tests
    ///
    /// Binds an OS-assigned port and signs with the well-known Anvil
    /// development key; no node is contacted unless a test does so.
    pub fn for_testing() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: ServerPort::testing(),
            timeout_seconds: TimeoutSeconds::testing(),
            environment: Environment::Testing,
            api_key: ApiKey("test-api-key".to_string()),
            chain: ChainSettings {
                rpc_url: Url::parse("http://localhost:8545").expect("static url"),
                operator_key: OperatorKey(TESTING_OPERATOR_KEY.to_string()),
                nft_contract: Address::from([0x01; 20]),
                mint_gas_limit: DEFAULT_MINT_GAS_LIMIT,
                transfer_gas_limit: DEFAULT_TRANSFER_GAS_LIMIT,
            },
        }
    }

    /// Socket address the listener binds
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port.value())
    }
}
