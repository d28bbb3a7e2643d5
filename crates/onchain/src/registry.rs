// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Contract registry holding the operator connection and contract handles
//!
//! The registry is constructed once at startup and shared by every request.
//! It owns the wallet-backed provider and the NFT contract client, and mints
//! fractional token handles on demand for per-request token addresses.

use alloy_primitives::Address;
use contract_client::{ChainGateway, ContractError, FractionalToken, LoanVault};
use tracing::info;
use url::Url;

use crate::provider::OperatorConnection;
use crate::token::FractionalTokenContract;
use crate::vault::NftVaultContract;

// Gas limits carried over from the deployed contract's reference client.
const DEFAULT_MINT_GAS_LIMIT: u64 = 3_000_000;
const DEFAULT_TRANSFER_GAS_LIMIT: u64 = 100_000;

/// Configuration for the contract registry
#[derive(Debug, Clone)]
pub struct RegistryConfig {
    /// JSON-RPC endpoint of the blockchain node
    pub rpc_url: Url,
    /// Hex-encoded operator private key
    pub operator_key: String,
    /// Address of the deployed `FractionalNFT` contract
    pub nft_contract: Address,
    /// Gas limit for `mintAndFractionalize` sends
    pub mint_gas_limit: u64,
    /// Gas limit for fractional token `transfer` sends
    pub transfer_gas_limit: u64,
}

impl RegistryConfig {
    /// Create a configuration with the default gas limits
    ///
    /// # Errors
    ///
    /// Returns `ContractError::Configuration` if the operator key is empty
    /// or the NFT contract address is the zero address.
    pub fn new(
        rpc_url: Url,
        operator_key: impl Into<String>,
        nft_contract: Address,
    ) -> Result<Self, ContractError> {
        let operator_key = operator_key.into();
        if operator_key.trim().is_empty() {
            return Err(ContractError::Configuration {
                message: "operator key cannot be empty".to_string(),
            });
        }
        if nft_contract == Address::ZERO {
            return Err(ContractError::Configuration {
                message: "NFT contract address cannot be the zero address".to_string(),
            });
        }

        Ok(Self {
            rpc_url,
            operator_key,
            nft_contract,
            mint_gas_limit: DEFAULT_MINT_GAS_LIMIT,
            transfer_gas_limit: DEFAULT_TRANSFER_GAS_LIMIT,
        })
    }
}

/// Registry of contract clients bound to the operator account
#[derive(Debug)]
pub struct ContractRegistry {
    connection: OperatorConnection,
    vault: NftVaultContract,
    transfer_gas_limit: u64,
}

impl ContractRegistry {
    /// Connect to the node and build the contract clients
    ///
    /// # Errors
    ///
    /// Returns an error if the operator key cannot be parsed. The node
    /// itself is not contacted here; the first request does that.
    pub fn connect(config: &RegistryConfig) -> Result<Self, ContractError> {
        let connection = OperatorConnection::connect_http(&config.rpc_url, &config.operator_key)?;

        let vault = NftVaultContract::new(
            connection.provider().clone(),
            config.nft_contract,
            connection.operator(),
            config.mint_gas_limit,
        );

        info!(
            nft_contract = %config.nft_contract,
            rpc_url = %config.rpc_url,
            "contract registry ready"
        );

        Ok(Self {
            connection,
            vault,
            transfer_gas_limit: config.transfer_gas_limit,
        })
    }
}

impl ChainGateway for ContractRegistry {
    fn operator(&self) -> Address {
        self.connection.operator()
    }

    fn vault(&self) -> &dyn LoanVault {
        &self.vault
    }

    fn token(&self, address: Address) -> Box<dyn FractionalToken> {
        Box::new(FractionalTokenContract::new(
            self.connection.provider().clone(),
            address,
            self.transfer_gas_limit,
        ))
    }
}
