// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Client for a fractional token contract at a per-request address

use alloy::providers::DynProvider;
use alloy_primitives::{Address, TxHash, U256};
use async_trait::async_trait;
use contract_client::{ContractError, FractionalToken};
use tracing::debug;

use crate::bindings;
use crate::error;

/// `FractionalToken` implementation backed by a deployed ERC20-shaped contract
///
/// Token addresses arrive with each request, so instances are lightweight
/// handles over the shared provider rather than long-lived clients.
#[derive(Debug, Clone)]
pub struct FractionalTokenContract {
    provider: DynProvider,
    address: Address,
    transfer_gas_limit: u64,
}

impl FractionalTokenContract {
    /// Create a client for the token at `address`
    pub fn new(provider: DynProvider, address: Address, transfer_gas_limit: u64) -> Self {
        Self {
            provider,
            address,
            transfer_gas_limit,
        }
    }

    fn instance(&self) -> bindings::FractionalToken::FractionalTokenInstance<DynProvider> {
        bindings::FractionalToken::new(self.address, self.provider.clone())
    }
}

#[async_trait]
impl FractionalToken for FractionalTokenContract {
    async fn balance_of(&self, account: Address) -> Result<U256, ContractError> {
        self.instance()
            .balanceOf(account)
            .call()
            .await
            .map_err(error::call_error)
    }

    async fn total_supply(&self) -> Result<U256, ContractError> {
        self.instance()
            .totalSupply()
            .call()
            .await
            .map_err(error::call_error)
    }

    async fn transfer(&self, to: Address, amount: U256) -> Result<TxHash, ContractError> {
        debug!(token = %self.address, %to, %amount, "sending transfer");

        let pending = self
            .instance()
            .transfer(to, amount)
            .gas(self.transfer_gas_limit)
            .send()
            .await
            .map_err(error::call_error)?;

        let tx_hash = pending.watch().await.map_err(error::watch_error)?;
        debug!(tx_hash = %tx_hash, "transfer included");
        Ok(tx_hash)
    }
}
