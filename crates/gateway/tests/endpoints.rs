// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Integration tests for the six API endpoints
//!
//! The server runs over a real socket against a stub contract gateway that
//! reports fixed values and counts every trait call.

mod fixtures;

use alloy_primitives::{Address, TxHash, U256};
use axum::http::StatusCode;
use fixtures::{
    API_KEY, MINT_TX_HASH, StubGateway, TRANSFER_TX_HASH, fractional_token_address, operator,
    sample_terms, spawn_server,
};
use serde_json::json;
use shared_types::{LoanTerms, RiskTier};

fn recipient() -> Address {
    Address::from([0x77; 20])
}

fn token_address() -> Address {
    Address::from([0x55; 20])
}

/// Look up an address-keyed balance entry regardless of key casing
fn balance_entry(map: &serde_json::Value, account: Address) -> Option<String> {
    map.as_object()?.iter().find_map(|(key, value)| {
        let parsed: Address = key.parse().ok()?;
        (parsed == account).then(|| value.as_str().unwrap_or_default().to_string())
    })
}

#[tokio::test]
async fn liveness_requires_no_api_key_and_no_contract_call() {
    let stub = StubGateway::new();
    let calls = stub.calls.clone();
    let (addr, _token) = spawn_server(stub).await;

    let response = reqwest::get(format!("http://{addr}/"))
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::OK);
    let body = response.text().await.expect("Failed to read response");
    assert_eq!(body, "Fractional NFT API is live");
    assert_eq!(calls.total(), 0);
}

#[tokio::test]
async fn missing_api_key_is_rejected_without_contract_calls() {
    let stub = StubGateway::new().with_next_token_id(U256::from(5u64));
    let calls = stub.calls.clone();
    let (addr, _token) = spawn_server(stub).await;

    let client = reqwest::Client::new();

    let response = client
        .get(format!("http://{addr}/tokenid"))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let body: serde_json::Value = response.json().await.expect("Failed to read response");
    assert_eq!(body["error"], "Unauthorized: invalid or missing API key");
    assert_eq!(body["status"], 403);

    let response = client
        .post(format!("http://{addr}/create"))
        .json(&json!({"uri": "ipfs://x", "totalFractions": "10"}))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    assert_eq!(calls.total(), 0);
}

#[tokio::test]
async fn wrong_api_key_is_rejected_without_contract_calls() {
    let stub = StubGateway::new();
    let calls = stub.calls.clone();
    let (addr, _token) = spawn_server(stub).await;

    let response = reqwest::Client::new()
        .get(format!("http://{addr}/tokenid"))
        .header("x-api-key", "not-the-key")
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(calls.total(), 0);
}

#[tokio::test]
async fn create_returns_tx_hash_and_fractional_token_address() {
    let (addr, _token) = spawn_server(StubGateway::new()).await;

    let request = json!({
        "uri": "ipfs://QmLoanDocs",
        "totalFractions": "1000",
        "loan_number": "LN-2024-0042",
        "risk_tier": 1,
        "principal": "25000",
        "interest": "1250",
        "term": "120",
        "school": "Example University"
    });

    let response = reqwest::Client::new()
        .post(format!("http://{addr}/create"))
        .header("x-api-key", API_KEY)
        .json(&request)
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = response.json().await.expect("Failed to read response");

    assert_eq!(body["success"], json!(true));
    let tx_hash = body["txHash"].as_str().expect("txHash field");
    assert_eq!(tx_hash, TxHash::from(MINT_TX_HASH).to_string());

    let reported: Address = body["fractionalToken"]
        .as_str()
        .expect("fractionalToken field")
        .parse()
        .expect("valid address");
    assert_eq!(reported, fractional_token_address());
}

#[tokio::test]
async fn create_failure_surfaces_revert_message_with_no_tx_hash() {
    let stub = StubGateway::new().with_mint_error("execution reverted: URI must not be empty");
    let calls = stub.calls.clone();
    let (addr, _token) = spawn_server(stub).await;

    let request = json!({
        "uri": "",
        "totalFractions": "1000",
        "loan_number": "LN-1",
        "risk_tier": 0,
        "principal": "1",
        "interest": "1",
        "term": "1",
        "school": "s"
    });

    let response = reqwest::Client::new()
        .post(format!("http://{addr}/create"))
        .header("x-api-key", API_KEY)
        .json(&request)
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: serde_json::Value = response.json().await.expect("Failed to read response");

    assert!(
        body["error"]
            .as_str()
            .expect("error field")
            .contains("execution reverted: URI must not be empty")
    );
    assert_eq!(body["status"], 500);
    assert!(body.get("txHash").is_none());

    // The token address is never read after a failed mint
    assert_eq!(calls.total(), 1);
}

#[tokio::test]
async fn transfer_reports_stub_balances_before_and_after() {
    let stub = StubGateway::new()
        .with_balance(operator(), U256::from(900u64))
        .with_balance(recipient(), U256::from(100u64))
        .with_total_supply(U256::from(1_000u64));
    let (addr, _token) = spawn_server(stub).await;

    let request = json!({
        "tokenAddress": token_address().to_string(),
        "to": recipient().to_string(),
        "amount": "250"
    });

    let response = reqwest::Client::new()
        .post(format!("http://{addr}/transfer"))
        .header("x-api-key", API_KEY)
        .json(&request)
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = response.json().await.expect("Failed to read response");

    assert_eq!(body["success"], json!(true));
    assert_eq!(
        body["txHash"].as_str().expect("txHash field"),
        TxHash::from(TRANSFER_TX_HASH).to_string()
    );
    assert_eq!(body["amount"], json!("250"));

    let from: Address = body["from"].as_str().expect("from").parse().expect("address");
    assert_eq!(from, operator());

    // The stub reports the same balances on both reads; the response must
    // reflect exactly what was read, not what the transfer implies.
    for snapshot in ["before", "after"] {
        let snapshot = &body["balances"][snapshot];
        assert_eq!(
            balance_entry(snapshot, operator()).expect("operator entry"),
            "900"
        );
        assert_eq!(
            balance_entry(snapshot, recipient()).expect("recipient entry"),
            "100"
        );
    }
}

#[tokio::test]
async fn balance_reports_investor_vault_and_total_supply() {
    let investor = Address::from([0x99; 20]);
    let stub = StubGateway::new()
        .with_balance(operator(), U256::from(750u64))
        .with_balance(investor, U256::from(250u64))
        .with_total_supply(U256::from(1_000u64));
    let (addr, _token) = spawn_server(stub).await;

    let response = reqwest::Client::new()
        .get(format!(
            "http://{addr}/balance/{}/{investor}",
            token_address()
        ))
        .header("x-api-key", API_KEY)
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = response.json().await.expect("Failed to read response");

    let token: Address = body["token"].as_str().expect("token").parse().expect("address");
    assert_eq!(token, token_address());
    let vault: Address = body["vault"].as_str().expect("vault").parse().expect("address");
    assert_eq!(vault, operator());

    assert_eq!(body["balances"]["vault"], json!("750"));
    assert_eq!(body["balances"]["investor"], json!("250"));
    assert_eq!(body["balances"]["totalSupply"], json!("1000"));
}

#[tokio::test]
async fn token_id_zero_counter_yields_null_last_minted_id() {
    let (addr, _token) = spawn_server(StubGateway::new()).await;

    let response = reqwest::Client::new()
        .get(format!("http://{addr}/tokenid"))
        .header("x-api-key", API_KEY)
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = response.json().await.expect("Failed to read response");

    assert_eq!(body["nextTokenId"], json!("0"));
    assert_eq!(body["lastMintedTokenId"], serde_json::Value::Null);
}

#[tokio::test]
async fn token_id_nonzero_counter_yields_counter_minus_one() {
    let cases = [
        (U256::from(1u64), U256::ZERO),
        (U256::from(42u64), U256::from(41u64)),
        (U256::MAX, U256::MAX - U256::from(1u64)),
    ];

    for (counter, expected_last) in cases {
        let (addr, _token) =
            spawn_server(StubGateway::new().with_next_token_id(counter)).await;

        let response = reqwest::Client::new()
            .get(format!("http://{addr}/tokenid"))
            .header("x-api-key", API_KEY)
            .send()
            .await
            .expect("Failed to send request");

        let body: serde_json::Value = response.json().await.expect("Failed to read response");
        assert_eq!(body["nextTokenId"], json!(counter.to_string()));
        assert_eq!(body["lastMintedTokenId"], json!(expected_last.to_string()));
    }
}

#[tokio::test]
async fn metadata_renders_each_risk_tier_verbatim() {
    for tier in [RiskTier::Low, RiskTier::Medium, RiskTier::High] {
        let terms = LoanTerms {
            risk_tier: tier,
            ..sample_terms()
        };
        let (addr, _token) = spawn_server(StubGateway::new().with_metadata(terms)).await;

        let response = reqwest::Client::new()
            .get(format!("http://{addr}/metadata/7"))
            .header("x-api-key", API_KEY)
            .send()
            .await
            .expect("Failed to send request");

        assert_eq!(response.status(), StatusCode::OK);
        let body: serde_json::Value = response.json().await.expect("Failed to read response");

        assert_eq!(body["tokenId"], json!("7"));
        assert_eq!(body["risk_tier"], json!(tier.as_u8()));
        assert_eq!(body["loan_number"], json!("LN-2024-0042"));
        assert_eq!(body["principal"], json!("25000"));
        assert_eq!(body["interest"], json!("1250"));
        assert_eq!(body["term"], json!("120"));
        assert_eq!(body["school"], json!("Example University"));
    }
}

#[tokio::test]
async fn malformed_path_parameters_are_rejected_without_contract_calls() {
    let stub = StubGateway::new();
    let calls = stub.calls.clone();
    let (addr, _token) = spawn_server(stub).await;

    let client = reqwest::Client::new();

    // Bad token contract address in the balance path.
    let response = client
        .get(format!("http://{addr}/balance/0x123/{}", recipient()))
        .header("x-api-key", API_KEY)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body: serde_json::Value = response.json().await.expect("Failed to read response");
    assert!(
        body["error"]
            .as_str()
            .expect("error field")
            .contains("invalid path parameter")
    );
    assert_eq!(body["status"], 400);

    // Non-numeric token id in the metadata path.
    let response = client
        .get(format!("http://{addr}/metadata/not-a-number"))
        .header("x-api-key", API_KEY)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body: serde_json::Value = response.json().await.expect("Failed to read response");
    assert_eq!(body["status"], 400);

    assert_eq!(calls.total(), 0);
}

#[tokio::test]
async fn malformed_body_is_rejected_without_contract_calls() {
    let stub = StubGateway::new();
    let calls = stub.calls.clone();
    let (addr, _token) = spawn_server(stub).await;

    let client = reqwest::Client::new();

    let response = client
        .post(format!("http://{addr}/create"))
        .header("x-api-key", API_KEY)
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = client
        .post(format!("http://{addr}/transfer"))
        .header("x-api-key", API_KEY)
        .json(&json!({
            "tokenAddress": "0x123",
            "to": recipient().to_string(),
            "amount": "1"
        }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body: serde_json::Value = response.json().await.expect("Failed to read response");
    assert!(
        body["error"]
            .as_str()
            .expect("error field")
            .contains("invalid address format")
    );

    assert_eq!(calls.total(), 0);
}
