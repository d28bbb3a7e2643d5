// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Loan risk tier types

use serde::{Deserialize, Deserializer, Serialize, Serializer, de};
use thiserror::Error;

/// Risk tier of a fractionalized loan
///
/// The on-chain contract stores the tier as a `uint8` enum index, and the
/// HTTP API carries the same integer verbatim. The numeric mapping is part
/// of the contract interface and must not change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RiskTier {
    /// Low-risk loan (index 0)
    Low,
    /// Medium-risk loan (index 1)
    Medium,
    /// High-risk loan (index 2)
    High,
}

/// Error returned when a numeric value does not map to a risk tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("invalid risk tier index: {0} (expected 0, 1 or 2)")]
pub struct InvalidRiskTier(pub u8);

impl RiskTier {
    /// Contract-side enum index of this tier
    pub const fn as_u8(self) -> u8 {
        match self {
            RiskTier::Low => 0,
            RiskTier::Medium => 1,
            RiskTier::High => 2,
        }
    }

    /// Human-readable tier name
    pub const fn name(self) -> &'static str {
        match self {
            RiskTier::Low => "low",
            RiskTier::Medium => "medium",
            RiskTier::High => "high",
        }
    }
}

impl TryFrom<u8> for RiskTier {
    type Error = InvalidRiskTier;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(RiskTier::Low),
            1 => Ok(RiskTier::Medium),
            2 => Ok(RiskTier::High),
            other => Err(InvalidRiskTier(other)),
        }
    }
}

impl std::fmt::Display for RiskTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

// Serialized as the bare contract index so JSON bodies and responses carry
// the same integer the chain does.
impl Serialize for RiskTier {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u8(self.as_u8())
    }
}

impl<'de> Deserialize<'de> for RiskTier {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let index = u8::deserialize(deserializer)?;
        RiskTier::try_from(index).map_err(de::Error::custom)
    }
}
