// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Shared call patterns for contract-backed handlers

use std::collections::HashMap;

use alloy_primitives::{Address, U256};

use crate::{ContractError, FractionalToken};

/// A point-in-time view of token balances for a set of accounts
///
/// Captured with one `balanceOf` read per account, issued sequentially.
/// The snapshot is best effort only: nothing stops unrelated transactions
/// from moving balances between the individual reads, or between a snapshot
/// and whatever call it brackets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BalanceSnapshot {
    balances: HashMap<Address, U256>,
}

impl BalanceSnapshot {
    /// Read the balance of every account in `accounts` from `token`
    ///
    /// Accounts are read in the given order; a repeated account is simply
    /// read again and the later value kept.
    ///
    /// # Errors
    ///
    /// Fails on the first read the contract layer rejects; balances read
    /// before the failure are discarded.
    pub async fn capture(
        token: &dyn FractionalToken,
        accounts: &[Address],
    ) -> Result<Self, ContractError> {
        let mut balances = HashMap::with_capacity(accounts.len());
        for &account in accounts {
            let balance = token.balance_of(account).await?;
            balances.insert(account, balance);
        }
        Ok(Self { balances })
    }

    /// Balance recorded for `account`, if it was part of the snapshot
    pub fn get(&self, account: Address) -> Option<U256> {
        self.balances.get(&account).copied()
    }

    /// Number of accounts in the snapshot
    pub fn len(&self) -> usize {
        self.balances.len()
    }

    /// Whether the snapshot is empty
    pub fn is_empty(&self) -> bool {
        self.balances.is_empty()
    }

    /// Render the snapshot as address-keyed decimal strings for JSON output
    pub fn to_decimal_map(&self) -> HashMap<Address, String> {
        self.balances
            .iter()
            .map(|(account, balance)| (*account, balance.to_string()))
            .collect()
    }
}

/// Derive the last minted token id from the contract's next-id counter
///
/// The counter holds the id the next mint will receive, so the last minted
/// id is `counter - 1`, or `None` when nothing has been minted yet. `U256`
/// is wide enough for any on-chain counter, so the subtraction cannot wrap.
pub fn last_minted_token_id(next_token_id: U256) -> Option<U256> {
    if next_token_id.is_zero() {
        None
    } else {
        Some(next_token_id - U256::from(1u64))
    }
}
