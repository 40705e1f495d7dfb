// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Etherscan-compatible block explorer client.
//!
//! Every response is wrapped in a `{status, message, result}` envelope. A
//! successful listing carries an array in `result` (empty when the address has
//! no matching transfers); errors carry a text `result` such as
//! `"Invalid API Key"` with `status` `"0"`.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use url::Url;

use super::{ExplorerApi, TransferKind, UpstreamError, CLIENT_TIMEOUT_GRACE};
use crate::config::AppConfig;

const PROVIDER: &str = "explorer";

/// Envelope messages that mean "nothing matched" rather than failure.
const EMPTY_RESULT_MESSAGES: [&str; 2] = ["No transactions found", "No records found"];

#[derive(Debug, Clone)]
pub struct ExplorerClient {
    base_url: Url,
    api_key: Option<String>,
    http: Client,
}

impl ExplorerClient {
    pub fn new(base_url: Url, api_key: Option<String>, timeout: Duration) -> Result<Self, UpstreamError> {
        let http = Client::builder()
            .timeout(timeout + CLIENT_TIMEOUT_GRACE)
            .build()
            .map_err(|e| UpstreamError::Transport {
                provider: PROVIDER,
                message: format!("failed to build HTTP client: {e}"),
            })?;

        Ok(Self {
            base_url,
            api_key,
            http,
        })
    }

    pub fn from_config(config: &AppConfig) -> Result<Self, UpstreamError> {
        Self::new(
            config.explorer_api_url.clone(),
            config.explorer_api_key.clone(),
            config.upstream_timeout,
        )
    }

    /// Build the request URL for the given query pairs, adding the API key.
    fn url(&self, params: &[(&str, String)]) -> Url {
        let mut url = self.base_url.clone();
        {
            let mut query = url.query_pairs_mut();
            for (key, value) in params {
                query.append_pair(key, value);
            }
            if let Some(key) = &self.api_key {
                query.append_pair("apikey", key);
            }
        }
        url
    }

    /// Issue a GET and return the decoded envelope.
    async fn get_envelope(&self, url: Url) -> Result<Value, UpstreamError> {
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

        serde_json::from_str(&text).map_err(|e| UpstreamError::InvalidResponse {
            provider: PROVIDER,
            reason: e.to_string(),
        })
    }
}

#[async_trait]
impl ExplorerApi for ExplorerClient {
    async fn list_transfers(
        &self,
        kind: TransferKind,
        address: &str,
        start_block: u64,
    ) -> Result<Vec<Value>, UpstreamError> {
        let url = self.url(&[
            ("module", "account".to_string()),
            ("action", kind.action().to_string()),
            ("address", address.to_string()),
            ("startblock", start_block.to_string()),
            ("sort", "asc".to_string()),
        ]);

        let started = Instant::now();
        let envelope = self.get_envelope(url).await?;
        let records = transfer_list(envelope)?;

        tracing::debug!(
            action = kind.action(),
            address,
            start_block,
            records = records.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Explorer transfer listing fetched"
        );

        Ok(records)
    }

    async fn block_at_or_before(&self, timestamp: i64) -> Result<u64, UpstreamError> {
        let url = self.url(&[
            ("module", "block".to_string()),
            ("action", "getblocknobytime".to_string()),
            ("timestamp", timestamp.to_string()),
            ("closest", "before".to_string()),
        ]);

        let envelope = self.get_envelope(url).await?;
        let block = block_number(envelope)?;

        tracing::debug!(timestamp, block, "Resolved block by timestamp");
        Ok(block)
    }
}

fn transport_error(e: &reqwest::Error) -> UpstreamError {
    UpstreamError::Transport {
        provider: PROVIDER,
        message: e.to_string(),
    }
}

fn envelope_message(envelope: &Value) -> String {
    envelope
        .get("message")
        .and_then(Value::as_str)
        .unwrap_or("unknown error")
        .to_string()
}

/// Extract the record list from a listing envelope.
fn transfer_list(envelope: Value) -> Result<Vec<Value>, UpstreamError> {
    let message = envelope_message(&envelope);
    match envelope.get("result") {
        Some(Value::Array(records)) => Ok(records.clone()),
        _ if EMPTY_RESULT_MESSAGES
            .iter()
            .any(|m| message.starts_with(m)) =>
        {
            Ok(Vec::new())
        }
        Some(result) => Err(UpstreamError::Provider {
            provider: PROVIDER,
            message,
            result: result.clone(),
        }),
        None => Err(UpstreamError::InvalidResponse {
            provider: PROVIDER,
            reason: "missing `result` in response".to_string(),
        }),
    }
}

/// Extract the block number from a `getblocknobytime` envelope.
fn block_number(envelope: Value) -> Result<u64, UpstreamError> {
    let result = envelope.get("result").cloned().unwrap_or(Value::Null);
    let parsed = match &result {
        Value::String(s) => s.trim().parse::<u64>().ok(),
        Value::Number(n) => n.as_u64(),
        _ => None,
    };

    parsed.ok_or_else(|| UpstreamError::Provider {
        provider: PROVIDER,
        message: envelope_message(&envelope),
        result,
    })
}
