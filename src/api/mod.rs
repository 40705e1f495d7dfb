// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{routing::get, Router};
use tower_http::{
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    display::{BalanceRow, TransactionRow, TransactionSection},
    models::{TokenBalanceRecord, TransactionsResponse},
    state::AppState,
};

pub mod balance;
pub mod extract;
pub mod health;
pub mod transactions;

pub fn router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/transactions", get(transactions::get_transactions))
        .route(
            "/transactions/display",
            get(transactions::get_transactions_display),
        )
        .route("/balance", get(balance::get_balance))
        .route("/balance/display", get(balance::get_balance_display));

    Router::new()
        .nest("/api", api_routes)
        .route("/health", get(health::health))
        .route("/health/live", get(health::liveness))
        .route("/health/ready", get(health::readiness))
        .with_state(state)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(CorsLayer::permissive())
}

#[derive(OpenApi)]
#[openapi(
    paths(
        transactions::get_transactions,
        transactions::get_transactions_display,
        balance::get_balance,
        balance::get_balance_display,
        health::health,
        health::liveness,
        health::readiness
    ),
    components(
        schemas(
            TransactionsResponse,
            TokenBalanceRecord,
            TransactionSection,
            TransactionRow,
            BalanceRow,
            transactions::TransactionsDisplay,
            balance::BalanceDisplay,
            health::ReadyResponse,
            health::HealthChecks,
            health::HealthResponse
        )
    ),
    tags(
        (name = "Transactions", description = "Transfer listings from the block explorer"),
        (name = "Balances", description = "Historical token balances"),
        (name = "Health", description = "Liveness and readiness probes")
    )
)]
struct ApiDoc;
