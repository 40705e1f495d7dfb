// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Upstream data providers.
//!
//! This module provides:
//! - [`ExplorerApi`]: transfer listings and timestamp → block resolution
//!   (Etherscan-compatible, see [`ExplorerClient`])
//! - [`WalletBalanceApi`]: historical token balances (Moralis-compatible,
//!   see [`WalletClient`])
//! - [`Gateway`]: the two endpoint operations composed on top of them

pub mod explorer;
pub mod gateway;
pub mod wallet;

#[cfg(test)]
pub(crate) mod mock;

use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};

pub use explorer::ExplorerClient;
pub use gateway::Gateway;
pub use wallet::WalletClient;

/// Slack the HTTP clients allow beyond the gateway's per-call bound, so an
/// expired call is always reported as [`UpstreamError::Timeout`].
pub(crate) const CLIENT_TIMEOUT_GRACE: Duration = Duration::from_secs(1);

/// Transfer categories listed by the block explorer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransferKind {
    Native,
    Internal,
    Token,
}

impl TransferKind {
    pub const ALL: [TransferKind; 3] = [Self::Native, Self::Internal, Self::Token];

    /// Explorer `action` parameter for this category.
    pub fn action(self) -> &'static str {
        match self {
            TransferKind::Native => "txlist",
            TransferKind::Internal => "txlistinternal",
            TransferKind::Token => "tokentx",
        }
    }
}

/// Block explorer operations used by the gateway.
#[async_trait]
pub trait ExplorerApi: Send + Sync {
    /// List transfers of `kind` touching `address` from `start_block`, oldest first.
    async fn list_transfers(
        &self,
        kind: TransferKind,
        address: &str,
        start_block: u64,
    ) -> Result<Vec<Value>, UpstreamError>;

    /// Latest block mined at or before the Unix `timestamp`.
    async fn block_at_or_before(&self, timestamp: i64) -> Result<u64, UpstreamError>;
}

/// Wallet balance operations used by the gateway.
#[async_trait]
pub trait WalletBalanceApi: Send + Sync {
    /// Priced token balances of `address` on `chain` as of `to_block`.
    async fn token_balances(
        &self,
        address: &str,
        chain: &str,
        to_block: u64,
    ) -> Result<Vec<Value>, UpstreamError>;
}

/// Errors that can occur while talking to an upstream provider.
#[derive(Debug, thiserror::Error)]
pub enum UpstreamError {
    #[error("request to {provider} failed: {message}")]
    Transport {
        provider: &'static str,
        message: String,
    },

    #[error("{provider} did not respond within {timeout:?}")]
    Timeout {
        provider: &'static str,
        timeout: Duration,
    },

    #[error("{provider} returned HTTP {status}")]
    Status {
        provider: &'static str,
        status: u16,
        body: Value,
    },

    #[error("{provider} reported an error: {message}")]
    Provider {
        provider: &'static str,
        message: String,
        result: Value,
    },

    #[error("{provider} response was invalid: {reason}")]
    InvalidResponse {
        provider: &'static str,
        reason: String,
    },
}

impl UpstreamError {
    /// Upstream diagnostics suitable for an error response.
    pub fn details(&self) -> Value {
        match self {
            UpstreamError::Status { status, body, .. } => json!({
                "status": status,
                "body": body,
            }),
            UpstreamError::Provider {
                message, result, ..
            } => json!({
                "message": message,
                "result": result,
            }),
            other => Value::String(other.to_string()),
        }
    }
}
