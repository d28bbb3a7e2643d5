// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Alloy-backed contract clients for the fractional NFT API
//!
//! This crate provides the production implementations of the
//! `contract-client` traits, speaking JSON-RPC to an Ethereum node through
//! [`alloy`] with all sends signed locally by the operator key.
//!
//! # Architecture
//!
//! - **[`bindings`]**: compiled `sol!` interface descriptors for the two
//!   deployed contracts
//! - **[`provider`]**: operator wallet and HTTP provider construction
//! - **[`vault`], [`token`]**: per-contract client implementations
//! - **[`registry::ContractRegistry`]**: owns the shared provider and hands
//!   out contract handles; this is what the HTTP layer holds as its
//!   `ChainGateway`
//!
//! Every operation is a single read call or a single send; no retries, no
//! caching, no fallback node. Failures are classified into the
//! `ContractError` taxonomy and carried to the HTTP layer unmodified.

pub mod bindings;
pub mod error;
pub mod provider;
pub mod registry;
pub mod token;
pub mod vault;

pub use provider::OperatorConnection;
pub use registry::{ContractRegistry, RegistryConfig};
pub use token::FractionalTokenContract;
pub use vault::NftVaultContract;
