// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Contract-call traits and utilities for the fractional NFT API
//!
//! This crate defines the seam between the HTTP layer and the blockchain:
//! traits describing the two deployed contracts the service talks to, a
//! common error taxonomy for failed calls, and small helpers for the call
//! patterns the handlers share.
//!
//! # Core Abstractions
//!
//! - **[`LoanVault`]**: operations of the NFT fractionalization contract
//! - **[`FractionalToken`]**: ERC20-shaped operations of a fractional token
//! - **[`ChainGateway`]**: hands out contract handles bound to the fixed
//!   operator account; the HTTP layer only ever sees this trait, so tests can
//!   substitute stub implementations and count calls
//! - **[`ContractError`]**: classification of transport, revert, signing and
//!   configuration failures
//!
//! The service performs no business logic of its own: every trait method is a
//! single read call or a single state-changing send against a deployed
//! contract, and results are surfaced to the caller unmodified.

use std::fmt;

use alloy_primitives::{Address, TxHash, U256};
use async_trait::async_trait;
use shared_types::LoanTerms;
use thiserror::Error;

pub mod types;

pub use types::{BalanceSnapshot, last_minted_token_id};

/// Operations of the NFT fractionalization contract
///
/// One implementation exists per deployed contract address; all sends are
/// issued from the operator account the implementation was constructed with.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LoanVault: Send + Sync {
    /// Mint an NFT carrying the given loan metadata and fractionalize it
    ///
    /// Returns the hash of the included transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if the send is rejected by the node, reverts on
    /// chain, or runs out of gas.
    async fn mint_and_fractionalize(
        &self,
        uri: &str,
        total_fractions: U256,
        terms: &LoanTerms,
    ) -> Result<TxHash, ContractError>;

    /// Address of the fractional token contract created by the vault
    async fn fractional_token(&self) -> Result<Address, ContractError>;

    /// Loan metadata stored for a minted token id
    async fn loan_metadata(&self, token_id: U256) -> Result<LoanTerms, ContractError>;

    /// The contract's next-token-id counter
    ///
    /// This is the id the *next* mint will receive, not the last minted one;
    /// see [`last_minted_token_id`] for the derivation.
    async fn next_token_id(&self) -> Result<U256, ContractError>;
}

/// ERC20-shaped operations of a fractional token contract
///
/// The token address is supplied per request, so implementations are cheap
/// handles created on demand rather than long-lived clients.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FractionalToken: Send + Sync {
    /// Balance of the given account
    async fn balance_of(&self, account: Address) -> Result<U256, ContractError>;

    /// Total token supply
    async fn total_supply(&self) -> Result<U256, ContractError>;

    /// Transfer `amount` from the operator account to `to`
    ///
    /// Returns the hash of the included transaction.
    async fn transfer(&self, to: Address, amount: U256) -> Result<TxHash, ContractError>;
}

/// Factory for contract handles bound to the fixed operator account
///
/// Constructed once at startup and shared by every request; implementations
/// must be safe for concurrent use.
pub trait ChainGateway: Send + Sync + fmt::Debug {
    /// The operator account every send is issued from
    ///
    /// Doubles as the "vault" address in balance queries.
    fn operator(&self) -> Address;

    /// Handle for the NFT fractionalization contract
    fn vault(&self) -> &dyn LoanVault;

    /// Handle for the fractional token deployed at `address`
    fn token(&self, address: Address) -> Box<dyn FractionalToken>;
}

/// Errors that can occur when calling a contract
#[derive(Debug, Error)]
#[allow(missing_docs)]
pub enum ContractError {
    /// RPC transport failed before the call reached the chain
    #[error("transport error: {message}")]
    Transport { message: String },

    /// The call or transaction reverted on chain
    #[error("contract call reverted: {message}")]
    Reverted { message: String },

    /// Signing the transaction with the operator key failed
    #[error("signer error: {message}")]
    Signer { message: String },

    /// The node returned data the binding could not decode
    #[error("invalid response: {message}")]
    InvalidResponse { message: String },

    /// Client-side configuration error
    #[error("configuration error: {message}")]
    Configuration { message: String },

    /// Client independent error
    #[error(transparent)]
    Custom { error: anyhow::Error },
}
