// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Operator wallet and RPC provider construction

use alloy::network::EthereumWallet;
use alloy::providers::{DynProvider, Provider, ProviderBuilder};
use alloy::signers::local::PrivateKeySigner;
use alloy_primitives::Address;
use contract_client::ContractError;
use tracing::info;
use url::Url;

/// An HTTP provider with the operator key attached as the signing wallet
///
/// All state-changing calls issued through the provider are signed locally
/// with the operator key and submitted as raw transactions; the key never
/// leaves the process.
#[derive(Debug, Clone)]
pub struct OperatorConnection {
    provider: DynProvider,
    operator: Address,
}

impl OperatorConnection {
    /// Connect to `rpc_url` with `operator_key` as the signing account
    ///
    /// # Errors
    ///
    /// Returns `ContractError::Signer` if the key is not a valid secp256k1
    /// private key.
    pub fn connect_http(rpc_url: &Url, operator_key: &str) -> Result<Self, ContractError> {
        let signer: PrivateKeySigner =
            operator_key
                .trim()
                .parse()
                .map_err(|e| ContractError::Signer {
                    message: format!("invalid operator private key: {e}"),
                })?;
        let operator = signer.address();

        let wallet = EthereumWallet::from(signer);
        let provider = ProviderBuilder::new()
            .wallet(wallet)
            .connect_http(rpc_url.clone())
            .erased();

        info!(account = %operator, "using operator account");

        Ok(Self { provider, operator })
    }

    /// The shared provider
    pub fn provider(&self) -> &DynProvider {
        &self.provider
    }

    /// Address derived from the operator key
    pub fn operator(&self) -> Address {
        self.operator
    }
}
