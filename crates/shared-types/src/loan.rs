// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Loan metadata carried by fractionalized NFTs

use alloy_primitives::U256;
use serde::{Deserialize, Serialize};

use crate::risk::RiskTier;

/// Loan metadata attached to a fractionalized NFT
///
/// Field names match the contract's metadata struct (and therefore the JSON
/// bodies the API accepts and returns). Monetary amounts and the term are
/// `U256` because that is how the contract stores them; the API layer renders
/// them as decimal strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanTerms {
    /// Originator-assigned loan number
    pub loan_number: String,
    /// Risk tier enum index as stored on chain
    pub risk_tier: RiskTier,
    /// Loan principal
    pub principal: U256,
    /// Interest amount
    pub interest: U256,
    /// Loan term
    pub term: U256,
    /// School the loan was issued for
    pub school: String,
}
