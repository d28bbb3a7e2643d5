// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! HTTP request handlers module
//!
//! This module provides the six HTTP request handlers of the fractional NFT
//! API. Every handler is a pass-through: request fields are marshaled into
//! contract calls issued sequentially through the gateway, and the results
//! are shaped into the JSON envelopes the deployed clients expect. Numeric
//! chain values (`U256`) are rendered as decimal strings.

use std::collections::HashMap;

use alloy_primitives::{Address, TxHash, U256};
use axum::{Json, extract::State};
use contract_client::{BalanceSnapshot, last_minted_token_id};
use serde::{Deserialize, Serialize};
use shared_types::{LoanTerms, RiskTier};
use tracing::info;
use utoipa::ToSchema;

use crate::{
    error::{ErrorEnvelope, ServerError},
    extractors::{ApiJson, ApiPath},
    metrics,
    state::ServerState,
};

/// Static liveness message returned by the root endpoint
pub const LIVENESS_MESSAGE: &str = "Fractional NFT API is live";

/// Liveness endpoint handler
#[utoipa::path(
    get,
    path = "/",
    tag = "health",
    summary = "Liveness check",
    description = "Returns a static liveness message. The only endpoint that requires no API key and issues no contract call.",
    responses(
        (status = 200, description = "Service is live", body = String)
    )
)]
pub async fn liveness_handler() -> &'static str {
    LIVENESS_MESSAGE
}

/// Mint-and-fractionalize request body
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateRequest {
    /// Metadata URI for the minted NFT
    #[schema(example = "ipfs://QmLoanDocs")]
    pub uri: String,
    /// Number of fractional tokens to mint against the NFT
    #[serde(rename = "totalFractions")]
    #[schema(value_type = String, example = "1000")]
    pub total_fractions: U256,
    /// Originator-assigned loan number
    pub loan_number: String,
    /// Risk tier enum index (0 = Low, 1 = Medium, 2 = High)
    #[schema(value_type = u8, example = 1)]
    pub risk_tier: RiskTier,
    /// Loan principal
    #[schema(value_type = String, example = "25000")]
    pub principal: U256,
    /// Interest amount
    #[schema(value_type = String, example = "1250")]
    pub interest: U256,
    /// Loan term
    #[schema(value_type = String, example = "120")]
    pub term: U256,
    /// School the loan was issued for
    pub school: String,
}

impl CreateRequest {
    fn loan_terms(&self) -> LoanTerms {
        LoanTerms {
            loan_number: self.loan_number.clone(),
            risk_tier: self.risk_tier,
            principal: self.principal,
            interest: self.interest,
            term: self.term,
            school: self.school.clone(),
        }
    }
}

/// Response from the create endpoint
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateResponse {
    /// Always `true`; failures are reported through the error envelope
    pub success: bool,
    /// Hash of the included mint transaction
    #[serde(rename = "txHash")]
    #[schema(value_type = String)]
    pub tx_hash: TxHash,
    /// Address of the fractional token contract, read back after the mint
    #[serde(rename = "fractionalToken")]
    #[schema(value_type = String)]
    pub fractional_token: Address,
}

/// Mint an NFT carrying loan metadata and fractionalize it
///
/// Issues `mintAndFractionalize` as a send from the operator account with the
/// configured gas limit, then reads the fractional token address back from
/// the NFT contract. If the second call fails after the send was included
/// there is no compensating action; the chain keeps the mint.
///
/// # Errors
///
/// Returns `ServerError::Contract` if either contract call is rejected; the
/// response envelope carries the underlying message and no transaction hash.
#[utoipa::path(
    post,
    path = "/create",
    tag = "contract",
    summary = "Mint and fractionalize an NFT",
    description = "Mints an NFT carrying the supplied loan metadata and fractionalizes it into the requested number of fractional tokens. Returns the transaction hash and the fractional token contract address.",
    request_body = CreateRequest,
    responses(
        (status = 200, description = "NFT minted and fractionalized", body = CreateResponse),
        (status = 400, description = "Malformed request body", body = ErrorEnvelope),
        (status = 403, description = "Missing or invalid API key", body = ErrorEnvelope),
        (status = 500, description = "Contract call rejected", body = ErrorEnvelope)
    ),
    security(("api_key" = []))
)]
pub async fn create_handler(
    State(state): State<ServerState>,
    ApiJson(request): ApiJson<CreateRequest>,
) -> Result<Json<CreateResponse>, ServerError> {
    metrics::inc_requests("create");

    let vault = state.gateway().vault();
    let terms = request.loan_terms();

    let tx_hash = metrics::observe_contract_call(
        "mint_and_fractionalize",
        vault.mint_and_fractionalize(&request.uri, request.total_fractions, &terms),
    )
    .await?;

    let fractional_token =
        metrics::observe_contract_call("fractional_token", vault.fractional_token()).await?;

    info!(
        %tx_hash,
        %fractional_token,
        loan_number = %request.loan_number,
        "minted and fractionalized NFT"
    );

    Ok(Json(CreateResponse {
        success: true,
        tx_hash,
        fractional_token,
    }))
}

/// Fractional token transfer request body
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TransferRequest {
    /// Address of the fractional token contract
    #[serde(rename = "tokenAddress")]
    #[schema(value_type = String, example = "0x5FbDB2315678afecb367f032d93F642f64180aa3")]
    pub token_address: Address,
    /// Recipient account
    #[schema(value_type = String, example = "0x70997970C51812dc3A010C7d01b50e0d17dc79C8")]
    pub to: Address,
    /// Amount of fractional tokens to transfer
    #[schema(value_type = String, example = "100")]
    pub amount: U256,
}

/// Balance snapshots taken around the transfer, keyed by account address
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TransferBalances {
    /// Balances read before the transfer was sent
    #[schema(value_type = Object)]
    pub before: HashMap<Address, String>,
    /// Balances read after the transfer was included
    #[schema(value_type = Object)]
    pub after: HashMap<Address, String>,
}

/// Response from the transfer endpoint
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TransferResponse {
    /// Always `true`; failures are reported through the error envelope
    pub success: bool,
    /// Hash of the included transfer transaction
    #[serde(rename = "txHash")]
    #[schema(value_type = String)]
    pub tx_hash: TxHash,
    /// Sending account (the operator)
    #[schema(value_type = String)]
    pub from: Address,
    /// Recipient account
    #[schema(value_type = String)]
    pub to: Address,
    /// Transferred amount as a decimal string
    pub amount: String,
    /// Operator and recipient balances before and after the transfer
    pub balances: TransferBalances,
}

/// Transfer fractional tokens from the operator to a recipient
///
/// Reads operator and recipient balances, sends the transfer, then reads both
/// balances again. The two snapshots are best effort only: they bracket the
/// send in call order, but unrelated transactions may move balances between
/// any of the five calls and no locking is attempted.
///
/// # Errors
///
/// Returns `ServerError::Contract` on the first rejected call; if the send
/// itself succeeded and a later read fails, the transfer stays on chain.
#[utoipa::path(
    post,
    path = "/transfer",
    tag = "contract",
    summary = "Transfer fractional tokens",
    description = "Transfers fractional tokens from the operator account to a recipient, reporting operator and recipient balances read immediately before and after the transfer.",
    request_body = TransferRequest,
    responses(
        (status = 200, description = "Transfer included", body = TransferResponse),
        (status = 400, description = "Malformed request body", body = ErrorEnvelope),
        (status = 403, description = "Missing or invalid API key", body = ErrorEnvelope),
        (status = 500, description = "Contract call rejected", body = ErrorEnvelope)
    ),
    security(("api_key" = []))
)]
pub async fn transfer_handler(
    State(state): State<ServerState>,
    ApiJson(request): ApiJson<TransferRequest>,
) -> Result<Json<TransferResponse>, ServerError> {
    metrics::inc_requests("transfer");

    let operator = state.operator();
    let token = state.gateway().token(request.token_address);
    let accounts = [operator, request.to];

    let before = metrics::observe_contract_call(
        "balance_snapshot",
        BalanceSnapshot::capture(token.as_ref(), &accounts),
    )
    .await?;

    let tx_hash =
        metrics::observe_contract_call("transfer", token.transfer(request.to, request.amount))
            .await?;

    let after = metrics::observe_contract_call(
        "balance_snapshot",
        BalanceSnapshot::capture(token.as_ref(), &accounts),
    )
    .await?;

    info!(
        %tx_hash,
        token = %request.token_address,
        to = %request.to,
        amount = %request.amount,
        "transferred fractional tokens"
    );

    Ok(Json(TransferResponse {
        success: true,
        tx_hash,
        from: operator,
        to: request.to,
        amount: request.amount.to_string(),
        balances: TransferBalances {
            before: before.to_decimal_map(),
            after: after.to_decimal_map(),
        },
    }))
}

/// Balance figures for a fractional token
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct BalanceFigures {
    /// Operator ("vault") balance as a decimal string
    pub vault: String,
    /// Investor balance as a decimal string
    pub investor: String,
    /// Total token supply as a decimal string
    #[serde(rename = "totalSupply")]
    pub total_supply: String,
}

/// Response from the balance endpoint
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct BalanceResponse {
    /// Address of the queried token contract
    #[schema(value_type = String)]
    pub token: Address,
    /// Operator account holding the unsold fractions
    #[schema(value_type = String)]
    pub vault: Address,
    /// Queried investor account
    #[schema(value_type = String)]
    pub investor: Address,
    /// Balance figures
    pub balances: BalanceFigures,
}

/// Query investor and vault balances for a fractional token
///
/// # Errors
///
/// Returns `ServerError::Contract` if any of the three reads is rejected.
#[utoipa::path(
    get,
    path = "/balance/{tokenAddress}/{investorAddress}",
    tag = "contract",
    summary = "Query fractional token balances",
    description = "Reads the investor balance, the operator (vault) balance, and the total supply of the fractional token at the given address.",
    params(
        ("tokenAddress" = String, Path, description = "Fractional token contract address"),
        ("investorAddress" = String, Path, description = "Investor account address")
    ),
    responses(
        (status = 200, description = "Balances read", body = BalanceResponse),
        (status = 400, description = "Invalid address in path", body = ErrorEnvelope),
        (status = 403, description = "Missing or invalid API key", body = ErrorEnvelope),
        (status = 500, description = "Contract call rejected", body = ErrorEnvelope)
    ),
    security(("api_key" = []))
)]
pub async fn balance_handler(
    State(state): State<ServerState>,
    ApiPath((token_address, investor_address)): ApiPath<(Address, Address)>,
) -> Result<Json<BalanceResponse>, ServerError> {
    metrics::inc_requests("balance");

    let vault_address = state.operator();
    let token = state.gateway().token(token_address);

    let investor_balance =
        metrics::observe_contract_call("balance_of", token.balance_of(investor_address)).await?;
    let vault_balance =
        metrics::observe_contract_call("balance_of", token.balance_of(vault_address)).await?;
    let total_supply =
        metrics::observe_contract_call("total_supply", token.total_supply()).await?;

    Ok(Json(BalanceResponse {
        token: token_address,
        vault: vault_address,
        investor: investor_address,
        balances: BalanceFigures {
            vault: vault_balance.to_string(),
            investor: investor_balance.to_string(),
            total_supply: total_supply.to_string(),
        },
    }))
}

/// Response from the metadata endpoint
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MetadataResponse {
    /// Queried token id as a decimal string
    #[serde(rename = "tokenId")]
    pub token_id: String,
    /// Originator-assigned loan number
    pub loan_number: String,
    /// Risk tier enum index (0 = Low, 1 = Medium, 2 = High)
    #[schema(value_type = u8)]
    pub risk_tier: RiskTier,
    /// Loan principal as a decimal string
    pub principal: String,
    /// Interest amount as a decimal string
    pub interest: String,
    /// Loan term as a decimal string
    pub term: String,
    /// School the loan was issued for
    pub school: String,
}

/// Read the loan metadata stored for a minted token id
///
/// # Errors
///
/// Returns `ServerError::Contract` if the read is rejected, including when
/// the token id has not been minted.
#[utoipa::path(
    get,
    path = "/metadata/{tokenId}",
    tag = "contract",
    summary = "Query loan metadata",
    description = "Reads the loan metadata stored on the NFT contract for a minted token id. The risk tier is rendered as its integer enum index.",
    params(
        ("tokenId" = String, Path, description = "Minted token id")
    ),
    responses(
        (status = 200, description = "Metadata read", body = MetadataResponse),
        (status = 400, description = "Invalid token id in path", body = ErrorEnvelope),
        (status = 403, description = "Missing or invalid API key", body = ErrorEnvelope),
        (status = 500, description = "Contract call rejected", body = ErrorEnvelope)
    ),
    security(("api_key" = []))
)]
pub async fn metadata_handler(
    State(state): State<ServerState>,
    ApiPath(token_id): ApiPath<U256>,
) -> Result<Json<MetadataResponse>, ServerError> {
    metrics::inc_requests("metadata");

    let terms = metrics::observe_contract_call(
        "loan_metadata",
        state.gateway().vault().loan_metadata(token_id),
    )
    .await?;

    Ok(Json(MetadataResponse {
        token_id: token_id.to_string(),
        loan_number: terms.loan_number,
        risk_tier: terms.risk_tier,
        principal: terms.principal.to_string(),
        interest: terms.interest.to_string(),
        term: terms.term.to_string(),
        school: terms.school,
    }))
}

/// Response from the token id endpoint
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TokenIdResponse {
    /// Id the next mint will receive, as a decimal string
    #[serde(rename = "nextTokenId")]
    pub next_token_id: String,
    /// Id of the most recently minted token, `null` before the first mint
    #[serde(rename = "lastMintedTokenId")]
    pub last_minted_token_id: Option<String>,
}

/// Read the NFT contract's token id counter
///
/// The last minted id is derived as counter − 1; it is `null` while the
/// counter is zero. Ids are carried as 256-bit integers end to end, so the
/// derivation holds for any on-chain counter value.
///
/// # Errors
///
/// Returns `ServerError::Contract` if the read is rejected.
#[utoipa::path(
    get,
    path = "/tokenid",
    tag = "contract",
    summary = "Query the token id counter",
    description = "Reads the NFT contract's next-token-id counter and derives the id of the most recently minted token.",
    responses(
        (status = 200, description = "Counter read", body = TokenIdResponse),
        (status = 403, description = "Missing or invalid API key", body = ErrorEnvelope),
        (status = 500, description = "Contract call rejected", body = ErrorEnvelope)
    ),
    security(("api_key" = []))
)]
pub async fn token_id_handler(
    State(state): State<ServerState>,
) -> Result<Json<TokenIdResponse>, ServerError> {
    metrics::inc_requests("tokenid");

    let next_token_id = metrics::observe_contract_call(
        "next_token_id",
        state.gateway().vault().next_token_id(),
    )
    .await?;

    Ok(Json(TokenIdResponse {
        next_token_id: next_token_id.to_string(),
        last_minted_token_id: last_minted_token_id(next_token_id).map(|id| id.to_string()),
    }))
}
