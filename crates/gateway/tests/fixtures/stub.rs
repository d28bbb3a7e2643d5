// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Stub contract gateway with call counting
//!
//! The stub stands in for the alloy-backed registry: reads report fixed
//! values, sends report fixed transaction hashes, and every trait call is
//! recorded so tests can assert that rejected requests issue none.

use std::{
    collections::HashMap,
    net::SocketAddr,
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
};

use alloy_primitives::{Address, TxHash, U256};
use async_trait::async_trait;
use contract_client::{ChainGateway, ContractError, FractionalToken, LoanVault};
use gateway::{Server, ServerConfig, ShutdownConfig};
use shared_types::{LoanTerms, RiskTier};
use tokio_util::sync::CancellationToken;

/// The key `ServerConfig::for_testing` expects in the `x-api-key` header
pub const API_KEY: &str = "test-api-key";

/// Transaction hash every stubbed mint reports
pub const MINT_TX_HASH: [u8; 32] = [0xab; 32];

/// Transaction hash every stubbed transfer reports
pub const TRANSFER_TX_HASH: [u8; 32] = [0xcd; 32];

/// Operator account the stub gateway signs with
pub fn operator() -> Address {
    Address::from([0x0f; 20])
}

/// Fractional token address the stub vault reports
pub fn fractional_token_address() -> Address {
    Address::from([0x42; 20])
}

/// Loan terms used by fixtures unless a test overrides them
pub fn sample_terms() -> LoanTerms {
    LoanTerms {
        loan_number: "LN-2024-0042".to_string(),
        risk_tier: RiskTier::Medium,
        principal: U256::from(25_000u64),
        interest: U256::from(1_250u64),
        term: U256::from(120u64),
        school: "Example University".to_string(),
    }
}

/// Shared counter over every contract trait call the stub receives
#[derive(Debug, Clone, Default)]
pub struct CallCounter(Arc<AtomicUsize>);

impl CallCounter {
    fn record(&self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }

    /// Total number of contract calls issued so far
    pub fn total(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }
}

#[derive(Debug, Clone)]
struct StubVault {
    calls: CallCounter,
    next_token_id: U256,
    metadata: LoanTerms,
    fractional_token: Address,
    mint_error: Option<String>,
}

#[async_trait]
impl LoanVault for StubVault {
    async fn mint_and_fractionalize(
        &self,
        _uri: &str,
        _total_fractions: U256,
        _terms: &LoanTerms,
    ) -> Result<TxHash, ContractError> {
        self.calls.record();
        match &self.mint_error {
            Some(message) => Err(ContractError::Reverted {
                message: message.clone(),
            }),
            None => Ok(TxHash::from(MINT_TX_HASH)),
        }
    }

    async fn fractional_token(&self) -> Result<Address, ContractError> {
        self.calls.record();
        Ok(self.fractional_token)
    }

    async fn loan_metadata(&self, _token_id: U256) -> Result<LoanTerms, ContractError> {
        self.calls.record();
        Ok(self.metadata.clone())
    }

    async fn next_token_id(&self) -> Result<U256, ContractError> {
        self.calls.record();
        Ok(self.next_token_id)
    }
}

#[derive(Debug, Clone)]
struct StubToken {
    calls: CallCounter,
    balances: HashMap<Address, U256>,
    total_supply: U256,
}

#[async_trait]
impl FractionalToken for StubToken {
    async fn balance_of(&self, account: Address) -> Result<U256, ContractError> {
        self.calls.record();
        Ok(self.balances.get(&account).copied().unwrap_or(U256::ZERO))
    }

    async fn total_supply(&self) -> Result<U256, ContractError> {
        self.calls.record();
        Ok(self.total_supply)
    }

    async fn transfer(&self, _to: Address, _amount: U256) -> Result<TxHash, ContractError> {
        self.calls.record();
        Ok(TxHash::from(TRANSFER_TX_HASH))
    }
}

/// Configurable stub implementation of the contract gateway
#[derive(Debug)]
pub struct StubGateway {
    /// Counter shared by the vault and every token handle
    pub calls: CallCounter,
    operator: Address,
    vault: StubVault,
    token: StubToken,
}

impl StubGateway {
    pub fn new() -> Self {
        let calls = CallCounter::default();
        Self {
            operator: operator(),
            vault: StubVault {
                calls: calls.clone(),
                next_token_id: U256::ZERO,
                metadata: sample_terms(),
                fractional_token: fractional_token_address(),
                mint_error: None,
            },
            token: StubToken {
                calls: calls.clone(),
                balances: HashMap::new(),
                total_supply: U256::ZERO,
            },
            calls,
        }
    }

    /// Set the next-token-id counter the stub vault reports
    pub fn with_next_token_id(mut self, id: U256) -> Self {
        self.vault.next_token_id = id;
        self
    }

    /// Set the loan metadata the stub vault reports
    pub fn with_metadata(mut self, terms: LoanTerms) -> Self {
        self.vault.metadata = terms;
        self
    }

    /// Make every mint send fail with the given revert message
    pub fn with_mint_error(mut self, message: &str) -> Self {
        self.vault.mint_error = Some(message.to_string());
        self
    }

    /// Fix the balance the stub token reports for an account
    ///
    /// The same value is reported on every read, before and after transfers.
    pub fn with_balance(mut self, account: Address, balance: U256) -> Self {
        self.token.balances.insert(account, balance);
        self
    }

    /// Fix the total supply the stub token reports
    pub fn with_total_supply(mut self, supply: U256) -> Self {
        self.token.total_supply = supply;
        self
    }
}

impl Default for StubGateway {
    fn default() -> Self {
        Self::new()
    }
}

impl ChainGateway for StubGateway {
    fn operator(&self) -> Address {
        self.operator
    }

    fn vault(&self) -> &dyn LoanVault {
        &self.vault
    }

    fn token(&self, _address: Address) -> Box<dyn FractionalToken> {
        Box::new(self.token.clone())
    }
}

/// Spawn the server over a stub gateway and return its bound address
pub async fn spawn_server(stub: StubGateway) -> (SocketAddr, CancellationToken) {
    let server = Server::with_gateway(
        ServerConfig::for_testing(),
        ShutdownConfig::default(),
        Arc::new(stub),
    )
    .expect("Failed to create server");

    server
        .run_for_testing()
        .await
        .expect("Failed to start test server")
}
