// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Historical token balance endpoints.

use axum::{extract::State, Json};
use serde::Serialize;
use serde_json::Value;
use utoipa::ToSchema;

use crate::{
    api::extract::ApiQuery,
    display::{balance_rows, BalanceRow},
    error::ApiError,
    models::{BalanceParams, BalanceQuery, TokenBalanceRecord, DATE_FORMAT},
    state::AppState,
    upstream::UpstreamError,
};

/// Token balances rendered as table rows.
#[derive(Debug, Serialize, ToSchema)]
pub struct BalanceDisplay {
    /// Snapshot date (`YYYY-MM-DD`)
    pub date: String,
    pub tokens: Vec<BalanceRow>,
}

/// Get the token balances of an address as of a calendar date.
///
/// The date is resolved to the last block mined before 00:00 UTC, and the
/// wallet balance provider is queried at that block. The provider's balance
/// list is returned unmodified.
#[utoipa::path(
    get,
    path = "/api/balance",
    tag = "Balances",
    params(BalanceParams),
    responses(
        (status = 200, description = "Balances retrieved successfully", body = [TokenBalanceRecord]),
        (status = 400, description = "Missing address or malformed date"),
        (status = 500, description = "Block resolution or balance provider failure")
    )
)]
pub async fn get_balance(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<BalanceParams>,
) -> Result<Json<Vec<Value>>, ApiError> {
    let query = BalanceQuery::try_from(params)?;
    tracing::info!(address = %query.address, date = %query.date, "Balance requested");

    let balances = fetch(&state, &query).await?;
    Ok(Json(balances))
}

/// Get the token balances of an address as formatted table rows.
#[utoipa::path(
    get,
    path = "/api/balance/display",
    tag = "Balances",
    params(BalanceParams),
    responses(
        (status = 200, description = "Balances rendered successfully", body = BalanceDisplay),
        (status = 400, description = "Missing address or malformed date"),
        (status = 500, description = "Block resolution or balance provider failure")
    )
)]
pub async fn get_balance_display(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<BalanceParams>,
) -> Result<Json<BalanceDisplay>, ApiError> {
    let query = BalanceQuery::try_from(params)?;
    let balances = fetch(&state, &query).await?;

    Ok(Json(BalanceDisplay {
        date: query.date.format(DATE_FORMAT).to_string(),
        tokens: balance_rows(&balances),
    }))
}

async fn fetch(state: &AppState, query: &BalanceQuery) -> Result<Vec<Value>, ApiError> {
    state
        .gateway
        .fetch_balances(query)
        .await
        .map_err(|e| fetch_failed(query, e))
}

fn fetch_failed(query: &BalanceQuery, err: UpstreamError) -> ApiError {
    let details = err.details();
    tracing::error!(
        address = %query.address,
        date = %query.date,
        error = %err,
        details = %details,
        "Error fetching token balances"
    );
    ApiError::internal("Failed to fetch token balances").with_details(details)
}
