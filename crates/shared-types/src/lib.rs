// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Shared types for the fractional NFT API service
//!
//! This crate provides common types that are shared across multiple crates
//! in the workspace, avoiding circular dependencies.

pub mod loan;
pub mod risk;

pub use loan::LoanTerms;
pub use risk::{InvalidRiskTier, RiskTier};
