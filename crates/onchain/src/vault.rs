// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Client for the deployed NFT fractionalization contract

use alloy::providers::DynProvider;
use alloy_primitives::{Address, TxHash, U256};
use async_trait::async_trait;
use contract_client::{ContractError, LoanVault};
use shared_types::{LoanTerms, RiskTier};
use tracing::debug;

use crate::bindings;
use crate::error;

/// `LoanVault` implementation backed by the deployed `FractionalNFT` contract
#[derive(Debug, Clone)]
pub struct NftVaultContract {
    provider: DynProvider,
    address: Address,
    operator: Address,
    mint_gas_limit: u64,
}

impl NftVaultContract {
    /// Create a client for the contract at `address`
    ///
    /// `mint_gas_limit` is attached to every `mintAndFractionalize` send;
    /// read calls carry no gas limit.
    pub fn new(
        provider: DynProvider,
        address: Address,
        operator: Address,
        mint_gas_limit: u64,
    ) -> Self {
        Self {
            provider,
            address,
            operator,
            mint_gas_limit,
        }
    }

    fn instance(&self) -> bindings::FractionalNFT::FractionalNFTInstance<DynProvider> {
        bindings::FractionalNFT::new(self.address, self.provider.clone())
    }
}

#[async_trait]
impl LoanVault for NftVaultContract {
    async fn mint_and_fractionalize(
        &self,
        uri: &str,
        total_fractions: U256,
        terms: &LoanTerms,
    ) -> Result<TxHash, ContractError> {
        debug!(
            contract = %self.address,
            %total_fractions,
            loan_number = %terms.loan_number,
            "sending mintAndFractionalize"
        );

        let pending = self
            .instance()
            .mintAndFractionalize(
                self.operator,
                uri.to_string(),
                total_fractions,
                terms.loan_number.clone(),
                terms.risk_tier.as_u8(),
                terms.principal,
                terms.interest,
                terms.term,
                terms.school.clone(),
            )
            .gas(self.mint_gas_limit)
            .send()
            .await
            .map_err(error::call_error)?;

        let tx_hash = pending.watch().await.map_err(error::watch_error)?;
        debug!(tx_hash = %tx_hash, "mintAndFractionalize included");
        Ok(tx_hash)
    }

    async fn fractional_token(&self) -> Result<Address, ContractError> {
        self.instance()
            .fractionalToken()
            .call()
            .await
            .map_err(error::call_error)
    }

    async fn loan_metadata(&self, token_id: U256) -> Result<LoanTerms, ContractError> {
        let metadata = self
            .instance()
            .getMetadata(token_id)
            .call()
            .await
            .map_err(error::call_error)?;

        let risk_tier =
            RiskTier::try_from(metadata.risk_tier).map_err(|e| ContractError::InvalidResponse {
                message: format!("token {token_id}: {e}"),
            })?;

        Ok(LoanTerms {
            loan_number: metadata.loan_number,
            risk_tier,
            principal: metadata.principal,
            interest: metadata.interest,
            term: metadata.term,
            school: metadata.school,
        })
    }

    async fn next_token_id(&self) -> Result<U256, ContractError> {
        self.instance()
            .tokenId()
            .call()
            .await
            .map_err(error::call_error)
    }
}
