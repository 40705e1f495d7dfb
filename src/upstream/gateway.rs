// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Endpoint operations composed from the upstream providers.
//!
//! Both operations are all-or-nothing: any failing upstream call fails the
//! whole operation, and every call is bounded by the configured timeout.

use std::{future::Future, sync::Arc, time::Duration};

use serde_json::Value;

use super::{
    ExplorerApi, ExplorerClient, TransferKind, UpstreamError, WalletBalanceApi, WalletClient,
};
use crate::{
    config::AppConfig,
    models::{AddressQuery, BalanceQuery, TransactionsResponse},
};

#[derive(Clone)]
pub struct Gateway {
    explorer: Arc<dyn ExplorerApi>,
    wallet: Arc<dyn WalletBalanceApi>,
    chain: String,
    timeout: Duration,
}

impl Gateway {
    pub fn new(
        explorer: Arc<dyn ExplorerApi>,
        wallet: Arc<dyn WalletBalanceApi>,
        chain: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            explorer,
            wallet,
            chain: chain.into(),
            timeout,
        }
    }

    /// Build the HTTP-backed gateway described by `config`.
    pub fn from_config(config: &AppConfig) -> Result<Self, UpstreamError> {
        Ok(Self::new(
            Arc::new(ExplorerClient::from_config(config)?),
            Arc::new(WalletClient::from_config(config)?),
            config.balance_chain.clone(),
            config.upstream_timeout,
        ))
    }

    /// Native, internal and token transfers of an address from a start block.
    ///
    /// The three listings are issued concurrently; the first failure aborts
    /// the others.
    pub async fn fetch_transactions(
        &self,
        query: &AddressQuery,
    ) -> Result<TransactionsResponse, UpstreamError> {
        let list = |kind: TransferKind| {
            self.bounded(
                "explorer",
                self.explorer
                    .list_transfers(kind, &query.address, query.start_block),
            )
        };

        let (eth_txs, internal_txs, token_txs) = tokio::try_join!(
            list(TransferKind::Native),
            list(TransferKind::Internal),
            list(TransferKind::Token)
        )?;

        tracing::info!(
            address = %query.address,
            start_block = query.start_block,
            eth_txs = eth_txs.len(),
            internal_txs = internal_txs.len(),
            token_txs = token_txs.len(),
            "Fetched transactions"
        );

        Ok(TransactionsResponse {
            eth_txs,
            internal_txs,
            token_txs,
        })
    }

    /// Token balances of an address as of midnight UTC on the query date.
    pub async fn fetch_balances(&self, query: &BalanceQuery) -> Result<Vec<Value>, UpstreamError> {
        let timestamp = query.midnight_timestamp();
        let block = self
            .bounded("explorer", self.explorer.block_at_or_before(timestamp))
            .await?;

        let balances = self
            .bounded(
                "wallet",
                self.wallet.token_balances(&query.address, &self.chain, block),
            )
            .await?;

        tracing::info!(
            address = %query.address,
            date = %query.date,
            block,
            chain = %self.chain,
            tokens = balances.len(),
            "Fetched token balances"
        );

        Ok(balances)
    }

    async fn bounded<T, F>(&self, provider: &'static str, call: F) -> Result<T, UpstreamError>
    where
        F: Future<Output = Result<T, UpstreamError>>,
    {
        tokio::time::timeout(self.timeout, call)
            .await
            .map_err(|_| UpstreamError::Timeout {
                provider,
                timeout: self.timeout,
            })?
    }
}
