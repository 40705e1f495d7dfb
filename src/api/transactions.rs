// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Transaction listing endpoints.

use axum::{extract::State, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    api::extract::ApiQuery,
    display::{transaction_sections, TransactionSection},
    error::ApiError,
    models::{AddressQuery, TransactionsParams, TransactionsResponse},
    state::AppState,
    upstream::UpstreamError,
};

/// Transactions rendered as table sections.
#[derive(Debug, Serialize, ToSchema)]
pub struct TransactionsDisplay {
    pub sections: Vec<TransactionSection>,
}

/// List native, internal and ERC-20 transfers of an address.
///
/// The three explorer listings are forwarded verbatim. If any of them fails,
/// the whole request fails.
#[utoipa::path(
    get,
    path = "/api/transactions",
    tag = "Transactions",
    params(TransactionsParams),
    responses(
        (status = 200, description = "Transfers retrieved successfully", body = TransactionsResponse),
        (status = 400, description = "Missing or malformed address/startBlock"),
        (status = 500, description = "Upstream explorer failure")
    )
)]
pub async fn get_transactions(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<TransactionsParams>,
) -> Result<Json<TransactionsResponse>, ApiError> {
    let query = AddressQuery::try_from(params)?;
    let response = fetch(&state, &query).await?;
    Ok(Json(response))
}

/// List transfers of an address as formatted table rows.
#[utoipa::path(
    get,
    path = "/api/transactions/display",
    tag = "Transactions",
    params(TransactionsParams),
    responses(
        (status = 200, description = "Transfers rendered successfully", body = TransactionsDisplay),
        (status = 400, description = "Missing or malformed address/startBlock"),
        (status = 500, description = "Upstream explorer failure")
    )
)]
pub async fn get_transactions_display(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<TransactionsParams>,
) -> Result<Json<TransactionsDisplay>, ApiError> {
    let query = AddressQuery::try_from(params)?;
    let response = fetch(&state, &query).await?;
    Ok(Json(TransactionsDisplay {
        sections: transaction_sections(&response),
    }))
}

async fn fetch(state: &AppState, query: &AddressQuery) -> Result<TransactionsResponse, ApiError> {
    state
        .gateway
        .fetch_transactions(query)
        .await
        .map_err(|e| fetch_failed(query, e))
}

fn fetch_failed(query: &AddressQuery, err: UpstreamError) -> ApiError {
    tracing::error!(
        address = %query.address,
        start_block = query.start_block,
        error = %err,
        details = %err.details(),
        "Error fetching transactions"
    );
    ApiError::internal("Failed to fetch transactions")
}
