// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Test doubles for the upstream providers.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
    time::Duration,
};

use async_trait::async_trait;
use axum::{extract::Request, middleware::Next, Router};
use serde_json::{json, Value};
use url::Url;

use super::{ExplorerApi, TransferKind, UpstreamError, WalletBalanceApi};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExplorerCall {
    List {
        kind: TransferKind,
        address: String,
        start_block: u64,
    },
    Block {
        timestamp: i64,
    },
}

/// In-memory explorer that records every call.
#[derive(Default)]
pub struct MockExplorer {
    calls: Mutex<Vec<ExplorerCall>>,
    records: HashMap<TransferKind, Vec<Value>>,
    failing: Option<TransferKind>,
    block: Option<u64>,
    delay: Option<Duration>,
}

impl MockExplorer {
    pub fn new() -> Self {
        Self {
            block: Some(18_908_894),
            ..Self::default()
        }
    }

    pub fn with_records(mut self, kind: TransferKind, records: Vec<Value>) -> Self {
        self.records.insert(kind, records);
        self
    }

    /// Make listings of `kind` fail with a provider error.
    pub fn failing(mut self, kind: TransferKind) -> Self {
        self.failing = Some(kind);
        self
    }

    pub fn with_block(mut self, block: u64) -> Self {
        self.block = Some(block);
        self
    }

    /// Make block resolution fail.
    pub fn without_block(mut self) -> Self {
        self.block = None;
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> Vec<ExplorerCall> {
        self.calls.lock().unwrap().clone()
    }

    async fn pause(&self) {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
    }
}

#[async_trait]
impl ExplorerApi for MockExplorer {
    async fn list_transfers(
        &self,
        kind: TransferKind,
        address: &str,
        start_block: u64,
    ) -> Result<Vec<Value>, UpstreamError> {
        self.calls.lock().unwrap().push(ExplorerCall::List {
            kind,
            address: address.to_string(),
            start_block,
        });
        self.pause().await;

        if self.failing == Some(kind) {
            return Err(UpstreamError::Provider {
                provider: "explorer",
                message: "NOTOK".to_string(),
                result: json!("Max rate limit reached"),
            });
        }
        Ok(self.records.get(&kind).cloned().unwrap_or_default())
    }

    async fn block_at_or_before(&self, timestamp: i64) -> Result<u64, UpstreamError> {
        self.calls
            .lock()
            .unwrap()
            .push(ExplorerCall::Block { timestamp });
        self.pause().await;

        self.block.ok_or_else(|| UpstreamError::Provider {
            provider: "explorer",
            message: "NOTOK".to_string(),
            result: json!("Error! No closest block found"),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalletCall {
    pub address: String,
    pub chain: String,
    pub to_block: u64,
}

/// In-memory wallet balance provider that records every call.
#[derive(Default)]
pub struct MockWallet {
    calls: Mutex<Vec<WalletCall>>,
    balances: Vec<Value>,
    failing: bool,
}

impl MockWallet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_balances(mut self, balances: Vec<Value>) -> Self {
        self.balances = balances;
        self
    }

    pub fn failing(mut self) -> Self {
        self.failing = true;
        self
    }

    pub fn calls(&self) -> Vec<WalletCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl WalletBalanceApi for MockWallet {
    async fn token_balances(
        &self,
        address: &str,
        chain: &str,
        to_block: u64,
    ) -> Result<Vec<Value>, UpstreamError> {
        self.calls.lock().unwrap().push(WalletCall {
            address: address.to_string(),
            chain: chain.to_string(),
            to_block,
        });

        if self.failing {
            return Err(UpstreamError::Status {
                provider: "wallet",
                status: 401,
                body: json!({"message": "Token is invalid"}),
            });
        }
        Ok(self.balances.clone())
    }
}

/// A request observed by [`spawn_upstream`].
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub path: String,
    pub query: HashMap<String, String>,
    pub headers: HashMap<String, String>,
}

pub type RecordedRequests = Arc<Mutex<Vec<RecordedRequest>>>;

/// Serve `router` on an ephemeral local port, recording each request.
///
/// Returns the server's base URL (with a trailing slash).
pub async fn spawn_upstream(router: Router) -> (Url, RecordedRequests) {
    let requests: RecordedRequests = Arc::new(Mutex::new(Vec::new()));
    let recorder = requests.clone();

    let app = router.layer(axum::middleware::from_fn(
        move |request: Request, next: Next| {
            let recorder = recorder.clone();
            async move {
                let query = request
                    .uri()
                    .query()
                    .map(|q| {
                        url::form_urlencoded::parse(q.as_bytes())
                            .into_owned()
                            .collect()
                    })
                    .unwrap_or_default();
                let headers = request
                    .headers()
                    .iter()
                    .filter_map(|(name, value)| {
                        value
                            .to_str()
                            .ok()
                            .map(|v| (name.as_str().to_string(), v.to_string()))
                    })
                    .collect();
                recorder.lock().unwrap().push(RecordedRequest {
                    path: request.uri().path().to_string(),
                    query,
                    headers,
                });
                next.run(request).await
            }
        },
    ));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (Url::parse(&format!("http://{addr}/")).unwrap(), requests)
}
