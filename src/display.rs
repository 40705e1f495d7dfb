// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Table rows for the browser UI.
//!
//! Turns raw upstream payloads into the rows the UI renders: one section per
//! transfer category and one row per token balance, with amounts formatted
//! by [`format_amount`].

use serde::Serialize;
use serde_json::Value;
use utoipa::ToSchema;

use crate::{
    formatting::{format_amount, PLACEHOLDER},
    models::{parse_decimals, TokenBalanceRecord, TransactionRecord, TransactionsResponse},
};

/// One transfer category of a transactions payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct TransactionSection {
    /// Payload key (`ethTxs`, `internalTxs`, `tokenTxs`)
    pub key: String,
    /// Human-readable heading
    pub label: String,
    pub count: usize,
    pub rows: Vec<TransactionRow>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct TransactionRow {
    pub hash: String,
    pub block: String,
    pub from: String,
    pub to: String,
    /// Formatted amount, with the token symbol for token transfers
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct BalanceRow {
    pub name: String,
    pub symbol: String,
    /// Formatted balance
    pub balance: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Category {
    Native,
    Internal,
    Token,
}

impl Category {
    fn key(self) -> &'static str {
        match self {
            Category::Native => "ethTxs",
            Category::Internal => "internalTxs",
            Category::Token => "tokenTxs",
        }
    }

    fn label(self) -> &'static str {
        match self {
            Category::Native => "Ethereum Transactions",
            Category::Internal => "Internal Ethereum Transactions",
            Category::Token => "ERC20 Token Transfers",
        }
    }
}

/// Render the three transfer lists as labelled sections, in payload order.
pub fn transaction_sections(payload: &TransactionsResponse) -> Vec<TransactionSection> {
    [
        (Category::Native, &payload.eth_txs),
        (Category::Internal, &payload.internal_txs),
        (Category::Token, &payload.token_txs),
    ]
    .into_iter()
    .map(|(category, records)| {
        let rows: Vec<TransactionRow> = records
            .iter()
            .map(|raw| transaction_row(category, &TransactionRecord::from_raw(raw)))
            .collect();
        TransactionSection {
            key: category.key().to_string(),
            label: category.label().to_string(),
            count: rows.len(),
            rows,
        }
    })
    .collect()
}

fn transaction_row(category: Category, record: &TransactionRecord) -> TransactionRow {
    let value = match category {
        Category::Token => format_amount(
            record.value.as_deref(),
            parse_decimals(record.token_decimal.as_deref()),
            record.token_symbol.as_deref(),
        ),
        Category::Native | Category::Internal => {
            format_amount(record.value.as_deref(), None, None)
        }
    };

    TransactionRow {
        hash: or_placeholder(&record.hash),
        block: or_placeholder(&record.block_number),
        from: or_placeholder(&record.from),
        to: or_placeholder(&record.to),
        value,
    }
}

/// Render token balance records; absent balances show as `0`.
pub fn balance_rows(records: &[Value]) -> Vec<BalanceRow> {
    records
        .iter()
        .map(|raw| {
            let record = TokenBalanceRecord::from_raw(raw);
            let balance = match record.balance.as_deref().map(str::trim) {
                Some(balance) if !balance.is_empty() => format_amount(
                    Some(balance),
                    parse_decimals(record.decimals.as_deref()),
                    None,
                ),
                _ => "0".to_string(),
            };
            BalanceRow {
                name: or_placeholder(&record.name),
                symbol: or_placeholder(&record.symbol),
                balance,
            }
        })
        .collect()
}

/// Missing and empty fields render as the placeholder.
fn or_placeholder(field: &Option<String>) -> String {
    match field.as_deref() {
        Some(value) if !value.is_empty() => value.to_string(),
        _ => PLACEHOLDER.to_string(),
    }
}
