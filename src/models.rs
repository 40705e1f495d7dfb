// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # API Data Models
//!
//! Request parameters, their validation, and the response shapes of the
//! REST API.
//!
//! ## Query Validation
//!
//! Query strings are extracted with every field optional and validated here,
//! so a missing or malformed parameter produces a readable 400 instead of an
//! extractor rejection, and never reaches an upstream API.
//!
//! ## Records
//!
//! Upstream records are forwarded as raw JSON. [`TransactionRecord`] and
//! [`TokenBalanceRecord`] are lenient typed views used only for display
//! rendering; numeric fields are accepted as JSON strings or numbers.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use utoipa::{IntoParams, ToSchema};

/// Strict calendar date format accepted by the balance endpoints.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

// =============================================================================
// Query Validation
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QueryError {
    #[error("address and startBlock are required")]
    MissingTransactionParams,

    #[error("startBlock must be a non-negative integer")]
    InvalidStartBlock,

    #[error("Provide address and date in YYYY-MM-DD format")]
    InvalidBalanceParams,
}

/// Raw query string of the transaction endpoints.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct TransactionsParams {
    /// Wallet address to list transfers for
    pub address: Option<String>,
    /// First block to include (inclusive)
    #[param(value_type = Option<u64>)]
    pub start_block: Option<String>,
}

/// Raw query string of the balance endpoints.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct BalanceParams {
    /// Wallet address to look up
    pub address: Option<String>,
    /// Snapshot date, `YYYY-MM-DD`, taken at 00:00 UTC
    pub date: Option<String>,
}

/// Validated scope of a transaction lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressQuery {
    pub address: String,
    pub start_block: u64,
}

/// Validated point-in-time balance lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BalanceQuery {
    pub address: String,
    pub date: NaiveDate,
}

impl BalanceQuery {
    /// Unix timestamp of midnight UTC on the query date.
    pub fn midnight_timestamp(&self) -> i64 {
        self.date.and_time(NaiveTime::MIN).and_utc().timestamp()
    }
}

impl TryFrom<TransactionsParams> for AddressQuery {
    type Error = QueryError;

    fn try_from(params: TransactionsParams) -> Result<Self, Self::Error> {
        let address = non_empty(params.address).ok_or(QueryError::MissingTransactionParams)?;
        let start_block = non_empty(params.start_block).ok_or(QueryError::MissingTransactionParams)?;
        let start_block = parse_start_block(&start_block)?;

        Ok(Self {
            address,
            start_block,
        })
    }
}

impl TryFrom<BalanceParams> for BalanceQuery {
    type Error = QueryError;

    fn try_from(params: BalanceParams) -> Result<Self, Self::Error> {
        let address = non_empty(params.address).ok_or(QueryError::InvalidBalanceParams)?;
        let date = params
            .date
            .as_deref()
            .and_then(parse_date)
            .ok_or(QueryError::InvalidBalanceParams)?;

        Ok(Self { address, date })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Parse a block number: ASCII digits only, no sign, no exponent.
pub fn parse_start_block(raw: &str) -> Result<u64, QueryError> {
    let raw = raw.trim();
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(QueryError::InvalidStartBlock);
    }
    raw.parse::<u64>().map_err(|_| QueryError::InvalidStartBlock)
}

/// Parse a strict `YYYY-MM-DD` calendar date.
///
/// Both the shape (four-digit year, two-digit month and day) and the date
/// itself must be valid, so `2024-13-01` and `2023-02-29` are rejected.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let bytes = raw.as_bytes();
    let shaped = bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        });
    if !shaped {
        return None;
    }
    NaiveDate::parse_from_str(raw, DATE_FORMAT).ok()
}

// =============================================================================
// Responses
// =============================================================================

/// The three transfer lists for an address, forwarded verbatim.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TransactionsResponse {
    /// Native ETH transfers (`txlist`)
    #[schema(value_type = Vec<Object>)]
    pub eth_txs: Vec<Value>,
    /// Internal transfers (`txlistinternal`)
    #[schema(value_type = Vec<Object>)]
    pub internal_txs: Vec<Value>,
    /// ERC-20 token transfers (`tokentx`)
    #[schema(value_type = Vec<Object>)]
    pub token_txs: Vec<Value>,
}

// =============================================================================
// Records
// =============================================================================

/// Display view of a native, internal or token transfer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRecord {
    #[serde(default, deserialize_with = "lenient_string")]
    pub hash: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub block_number: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub from: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub to: Option<String>,
    /// Integer amount in base units
    #[serde(default, deserialize_with = "lenient_string")]
    pub value: Option<String>,
    /// Token transfers only
    #[serde(default, deserialize_with = "lenient_string")]
    pub token_decimal: Option<String>,
    /// Token transfers only
    #[serde(default, deserialize_with = "lenient_string")]
    pub token_symbol: Option<String>,
}

/// Display view of a token balance entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, ToSchema)]
pub struct TokenBalanceRecord {
    #[serde(default, deserialize_with = "lenient_string")]
    pub token_address: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub symbol: Option<String>,
    /// Integer amount in base units
    #[serde(default, deserialize_with = "lenient_string")]
    pub balance: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub decimals: Option<String>,
}

impl TransactionRecord {
    /// Read a raw upstream record; unusable shapes yield an empty record.
    pub fn from_raw(raw: &Value) -> Self {
        Self::deserialize(raw).unwrap_or_default()
    }
}

impl TokenBalanceRecord {
    /// Read a raw upstream record; unusable shapes yield an empty record.
    pub fn from_raw(raw: &Value) -> Self {
        Self::deserialize(raw).unwrap_or_default()
    }
}

/// Accept a string, number or boolean as `Some(String)`; `null` and nested
/// values become `None`.
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    })
}

/// Parse a decimals field as reported upstream (`"6"`, `6`, `"6.0"`).
///
/// Blank or unreadable values yield `None`, which formats with the default.
pub fn parse_decimals(raw: Option<&str>) -> Option<i64> {
    let raw = raw?.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(decimals) = raw.parse::<i64>() {
        return Some(decimals);
    }
    raw.parse::<f64>()
        .ok()
        .filter(|d| d.is_finite() && d.fract() == 0.0)
        .map(|d| d as i64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn tx_params(address: Option<&str>, start_block: Option<&str>) -> TransactionsParams {
        TransactionsParams {
            address: address.map(str::to_string),
            start_block: start_block.map(str::to_string),
        }
    }

    fn balance_params(address: Option<&str>, date: Option<&str>) -> BalanceParams {
        BalanceParams {
            address: address.map(str::to_string),
            date: date.map(str::to_string),
        }
    }

    #[test]
    fn address_query_requires_both_fields() {
        assert_eq!(
            AddressQuery::try_from(tx_params(None, Some("1"))),
            Err(QueryError::MissingTransactionParams)
        );
        assert_eq!(
            AddressQuery::try_from(tx_params(Some("   "), Some("1"))),
            Err(QueryError::MissingTransactionParams)
        );
        assert_eq!(
            AddressQuery::try_from(tx_params(Some("0xabc"), None)),
            Err(QueryError::MissingTransactionParams)
        );
    }

    #[test]
    fn address_query_trims_and_parses() {
        let query = AddressQuery::try_from(tx_params(Some("  0xAbC  "), Some("1000000"))).unwrap();
        assert_eq!(query.address, "0xAbC");
        assert_eq!(query.start_block, 1_000_000);

        let zero = AddressQuery::try_from(tx_params(Some("0xAbC"), Some("0"))).unwrap();
        assert_eq!(zero.start_block, 0);
    }

    #[test]
    fn start_block_must_be_a_plain_integer() {
        for raw in ["-1", "+5", "1.5", "1e6", "abc", "99999999999999999999999"] {
            assert_eq!(parse_start_block(raw), Err(QueryError::InvalidStartBlock), "{raw}");
        }
    }

    #[test]
    fn date_parsing_is_strict() {
        assert!(parse_date("2024-13-01").is_none());
        assert!(parse_date("2024/01/01").is_none());
        assert!(parse_date("").is_none());
        assert!(parse_date("2024-1-01").is_none());
        assert!(parse_date("2024-01-01T00:00").is_none());
        assert!(parse_date("2024-04-31").is_none());

        assert!(parse_date("2024-02-29").is_some());
        assert!(parse_date("2023-02-29").is_none());
        assert!(parse_date("2000-02-29").is_some());
        assert!(parse_date("1900-02-29").is_none());
    }

    #[test]
    fn balance_query_validation() {
        assert_eq!(
            BalanceQuery::try_from(balance_params(None, Some("2024-01-01"))),
            Err(QueryError::InvalidBalanceParams)
        );
        assert_eq!(
            BalanceQuery::try_from(balance_params(Some("0xabc"), Some("2024-13-01"))),
            Err(QueryError::InvalidBalanceParams)
        );
        assert_eq!(
            BalanceQuery::try_from(balance_params(Some("0xabc"), None)),
            Err(QueryError::InvalidBalanceParams)
        );

        let query = BalanceQuery::try_from(balance_params(Some(" 0xabc "), Some("2024-02-29")))
            .unwrap();
        assert_eq!(query.address, "0xabc");
        assert_eq!(query.date, NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
    }

    #[test]
    fn midnight_timestamp_is_utc() {
        let query = BalanceQuery {
            address: "0xabc".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        };
        assert_eq!(query.midnight_timestamp(), 1_704_067_200);
    }

    #[test]
    fn transaction_record_accepts_strings_and_numbers() {
        let record = TransactionRecord::from_raw(&json!({
            "hash": "0x01",
            "blockNumber": 17000000,
            "from": "0xaaa",
            "to": "",
            "value": "1000",
            "tokenDecimal": "6",
            "tokenSymbol": "USDC",
            "gas": "21000"
        }));
        assert_eq!(record.hash.as_deref(), Some("0x01"));
        assert_eq!(record.block_number.as_deref(), Some("17000000"));
        assert_eq!(record.to.as_deref(), Some(""));
        assert_eq!(record.token_decimal.as_deref(), Some("6"));
    }

    #[test]
    fn unusable_records_become_empty() {
        assert_eq!(TransactionRecord::from_raw(&json!("oops")), TransactionRecord::default());
        let balance = TokenBalanceRecord::from_raw(&json!({"name": null, "decimals": 18}));
        assert!(balance.name.is_none());
        assert_eq!(balance.decimals.as_deref(), Some("18"));
    }

    #[test]
    fn decimals_parsing() {
        assert_eq!(parse_decimals(Some("6")), Some(6));
        assert_eq!(parse_decimals(Some("6.0")), Some(6));
        assert_eq!(parse_decimals(Some("-2")), Some(-2));
        assert_eq!(parse_decimals(Some("")), None);
        assert_eq!(parse_decimals(Some("six")), None);
        assert_eq!(parse_decimals(Some("6.5")), None);
        assert_eq!(parse_decimals(None), None);
    }
}
