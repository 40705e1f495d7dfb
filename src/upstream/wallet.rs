// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Moralis-compatible wallet balance client.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::{
    header::{HeaderMap, HeaderValue},
    Client,
};
use serde_json::Value;
use url::Url;

use super::{UpstreamError, WalletBalanceApi, CLIENT_TIMEOUT_GRACE};
use crate::config::AppConfig;

const PROVIDER: &str = "wallet";
const API_KEY_HEADER: &str = "x-api-key";

#[derive(Debug, Clone)]
pub struct WalletClient {
    base_url: Url,
    http: Client,
}

impl WalletClient {
    pub fn new(base_url: Url, api_key: Option<&str>, timeout: Duration) -> Result<Self, UpstreamError> {
        let mut headers = HeaderMap::new();
        if let Some(key) = api_key {
            let mut value = HeaderValue::from_str(key).map_err(|e| UpstreamError::Transport {
                provider: PROVIDER,
                message: format!("invalid API key header: {e}"),
            })?;
            value.set_sensitive(true);
            headers.insert(API_KEY_HEADER, value);
        }

        let http = Client::builder()
            .default_headers(headers)
            .timeout(timeout + CLIENT_TIMEOUT_GRACE)
            .build()
            .map_err(|e| UpstreamError::Transport {
                provider: PROVIDER,
                message: format!("failed to build HTTP client: {e}"),
            })?;

        Ok(Self { base_url, http })
    }

    pub fn from_config(config: &AppConfig) -> Result<Self, UpstreamError> {
        Self::new(
            config.wallet_api_url.clone(),
            config.wallet_api_key.as_deref(),
            config.upstream_timeout,
        )
    }

    /// `{base}/wallets/{address}/tokens?chain=..&to_block=..`
    fn tokens_url(&self, address: &str, chain: &str, to_block: u64) -> Result<Url, UpstreamError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| UpstreamError::Transport {
                provider: PROVIDER,
                message: format!("base URL `{}` cannot carry a path", self.base_url),
            })?
            .pop_if_empty()
            .extend(["wallets", address, "tokens"]);
        url.query_pairs_mut()
            .append_pair("chain", chain)
            .append_pair("to_block", &to_block.to_string());
        Ok(url)
    }
}

#[async_trait]
impl WalletBalanceApi for WalletClient {
    async fn token_balances(
        &self,
        address: &str,
        chain: &str,
        to_block: u64,
    ) -> Result<Vec<Value>, UpstreamError> {
        let url = self.tokens_url(address, chain, to_block)?;
        let started = Instant::now();

        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| transport_error(&e))?;

        let status = response.status();
        let text = response.text().await.map_err(|e| transport_error(&e))?;

        if !status.is_success() {
            return Err(UpstreamError::Status {
                provider: PROVIDER,
                status: status.as_u16(),
                body: serde_json::from_str(&text).unwrap_or(Value::String(text)),
            });
        }

        let body: Value = serde_json::from_str(&text).map_err(|e| UpstreamError::InvalidResponse {
            provider: PROVIDER,
            reason: e.to_string(),
        })?;
        let balances = balance_list(body)?;

        tracing::debug!(
            address,
            chain,
            to_block,
            tokens = balances.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Wallet token balances fetched"
        );

        Ok(balances)
    }
}

fn transport_error(e: &reqwest::Error) -> UpstreamError {
    UpstreamError::Transport {
        provider: PROVIDER,
        message: e.to_string(),
    }
}

/// Extract the balance list from the paged `{result: [...], cursor, ..}` body.
fn balance_list(body: Value) -> Result<Vec<Value>, UpstreamError> {
    match body {
        Value::Object(mut map) => match map.remove("result") {
            Some(Value::Array(balances)) => Ok(balances),
            _ => Err(UpstreamError::InvalidResponse {
                provider: PROVIDER,
                reason: "missing `result` array in response".to_string(),
            }),
        },
        Value::Array(balances) => Ok(balances),
        _ => Err(UpstreamError::InvalidResponse {
            provider: PROVIDER,
            reason: "unexpected response shape".to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::upstream::mock::spawn_upstream;
    use axum::{http::StatusCode, routing::get, Json, Router};
    use serde_json::json;

    #[test]
    fn tokens_url_appends_path_and_query() {
        let client = WalletClient::new(
            Url::parse("https://deep-index.moralis.io/api/v2.2").unwrap(),
            None,
            Duration::from_secs(1),
        )
        .unwrap();
        let url = client.tokens_url("0xAbC", "0x1", 18_908_894).unwrap();
        assert_eq!(
            url.as_str(),
            "https://deep-index.moralis.io/api/v2.2/wallets/0xAbC/tokens?chain=0x1&to_block=18908894"
        );

        let trailing = WalletClient::new(
            Url::parse("https://deep-index.moralis.io/api/v2.2/").unwrap(),
            None,
            Duration::from_secs(1),
        )
        .unwrap();
        assert_eq!(
            trailing.tokens_url("0xAbC", "0x1", 1).unwrap().path(),
            "/api/v2.2/wallets/0xAbC/tokens"
        );
    }

    #[test]
    fn balance_list_shapes() {
        let balances = balance_list(json!({
            "cursor": null,
            "page": 0,
            "result": [{"symbol": "USDC"}]
        }))
        .unwrap();
        assert_eq!(balances.len(), 1);

        assert_eq!(balance_list(json!([{"symbol": "DAI"}])).unwrap().len(), 1);
        assert!(balance_list(json!({"message": "oops"})).is_err());
        assert!(balance_list(json!("oops")).is_err());
    }

    #[tokio::test]
    async fn fetches_balances_with_key_header() {
        let (base, requests) = spawn_upstream(Router::new().route(
            "/api/v2.2/wallets/{address}/tokens",
            get(|| async {
                Json(json!({
                    "cursor": null,
                    "page": 0,
                    "page_size": 100,
                    "block_number": 18908894,
                    "result": [
                        {"token_address": "0xa0b8", "symbol": "USDC", "name": "USD Coin", "balance": "2500000", "decimals": 6}
                    ]
                }))
            }),
        ))
        .await;

        let client = WalletClient::new(
            base.join("api/v2.2").unwrap(),
            Some("wallet-secret"),
            Duration::from_secs(5),
        )
        .unwrap();

        let balances = client.token_balances("0xAbC", "0x1", 18_908_894).await.unwrap();
        assert_eq!(balances[0]["symbol"], "USDC");

        let recorded = requests.lock().unwrap().clone();
        assert_eq!(recorded.len(), 1);
        assert_eq!(recorded[0].path, "/api/v2.2/wallets/0xAbC/tokens");
        assert_eq!(recorded[0].query["chain"], "0x1");
        assert_eq!(recorded[0].query["to_block"], "18908894");
        assert_eq!(recorded[0].headers["x-api-key"], "wallet-secret");
    }

    #[tokio::test]
    async fn unauthorized_response_keeps_body() {
        let (base, _) = spawn_upstream(Router::new().route(
            "/wallets/{address}/tokens",
            get(|| async {
                (
                    StatusCode::UNAUTHORIZED,
                    Json(json!({"message": "Token is invalid format"})),
                )
            }),
        ))
        .await;

        let client = WalletClient::new(base, None, Duration::from_secs(5)).unwrap();
        let err = client.token_balances("0xabc", "0x1", 1).await.unwrap_err();
        match err {
            UpstreamError::Status { status, body, .. } => {
                assert_eq!(status, 401);
                assert_eq!(body["message"], "Token is invalid format");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
