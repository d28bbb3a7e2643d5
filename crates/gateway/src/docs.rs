// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! API documentation
//!
//! Aggregates the annotated handlers and schemas into an `OpenAPI` document,
//! served as JSON at `/api-doc/openapi.json` and rendered by a minimal
//! Swagger UI page at `/swagger-ui`.

use axum::{Json, response::Html};
use utoipa::{
    Modify, OpenApi,
    openapi::security::{ApiKey, ApiKeyValue, SecurityScheme},
};

use crate::error::ErrorEnvelope;
use crate::routes::handlers::{
    BalanceFigures, BalanceResponse, CreateRequest, CreateResponse, MetadataResponse,
    TokenIdResponse, TransferBalances, TransferRequest, TransferResponse,
};

/// `OpenAPI` documentation for the fractional NFT API
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Fractional NFT API",
        description = "HTTP gateway forwarding requests to an NFT fractionalization contract and its fractional token contract"
    ),
    paths(
        crate::routes::handlers::liveness_handler,
        crate::routes::handlers::create_handler,
        crate::routes::handlers::transfer_handler,
        crate::routes::handlers::balance_handler,
        crate::routes::handlers::metadata_handler,
        crate::routes::handlers::token_id_handler,
    ),
    components(schemas(
        CreateRequest,
        CreateResponse,
        TransferRequest,
        TransferBalances,
        TransferResponse,
        BalanceFigures,
        BalanceResponse,
        MetadataResponse,
        TokenIdResponse,
        ErrorEnvelope,
    )),
    modifiers(&ApiKeySecurity),
    tags(
        (name = "contract", description = "Pass-through operations against the deployed contracts"),
        (name = "health", description = "Liveness endpoint")
    )
)]
pub struct ApiDoc;

/// Registers the `x-api-key` header scheme referenced by the protected paths
struct ApiKeySecurity;

impl Modify for ApiKeySecurity {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "api_key",
                SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::new("x-api-key"))),
            );
        }
    }
}

/// Serve the generated specification as JSON
pub async fn openapi_spec() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// Serve a Swagger UI page driven by the JSON specification
pub async fn swagger_ui() -> Html<&'static str> {
    Html(SWAGGER_PAGE)
}

const SWAGGER_PAGE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>Fractional NFT API</title>
  <link rel="stylesheet" href="https://unpkg.com/swagger-ui-dist@5/swagger-ui.css">
</head>
<body>
  <div id="docs"></div>
  <script src="https://unpkg.com/swagger-ui-dist@5/swagger-ui-bundle.js"></script>
  <script>
    window.onload = () => {
      SwaggerUIBundle({
        url: "/api-doc/openapi.json",
        dom_id: "#docs",
        deepLinking: true,
      });
    };
  </script>
</body>
</html>
"#;
