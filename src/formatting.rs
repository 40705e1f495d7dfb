// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Base-unit amount formatting.
//!
//! Explorer and indexer APIs report amounts as integer strings in the
//! token's smallest unit (wei for ETH). [`format_amount`] scales them down by
//! `10^decimals` for display.
//!
//! Values that fit a `U256` are formatted exactly, for any non-negative
//! decimals. Anything else (negative, fractional, non-decimal or wider than
//! 256 bits) and negative decimals go through an approximate `f64` division
//! instead, so malformed upstream data never fails a response.

use alloy::primitives::U256;

/// Decimals assumed when a record does not carry its own (native ETH).
pub const DEFAULT_DECIMALS: i64 = 18;

/// Rendered in place of an absent or unreadable amount.
pub const PLACEHOLDER: &str = "-";

/// Format a raw base-unit amount for display.
///
/// - `raw`: integer string as reported upstream; `None` renders [`PLACEHOLDER`]
/// - `decimals`: scale exponent, [`DEFAULT_DECIMALS`] when `None`
/// - `symbol`: appended after a space when non-empty
pub fn format_amount(raw: Option<&str>, decimals: Option<i64>, symbol: Option<&str>) -> String {
    let raw = match raw.map(str::trim) {
        Some(raw) if !raw.is_empty() => raw,
        _ => return PLACEHOLDER.to_string(),
    };
    let decimals = decimals.unwrap_or(DEFAULT_DECIMALS);

    let exact = match (raw.parse::<U256>(), u32::try_from(decimals)) {
        (Ok(amount), Ok(decimals)) => Some(format_units(amount, decimals)),
        _ => None,
    };

    let formatted = match exact.or_else(|| approximate(raw, decimals)) {
        Some(formatted) => formatted,
        None => return PLACEHOLDER.to_string(),
    };

    match symbol.map(str::trim) {
        Some(symbol) if !symbol.is_empty() => format!("{formatted} {symbol}"),
        _ => formatted,
    }
}

/// Format a base-unit amount with full precision.
///
/// Trailing fractional zeros are dropped; whole amounts have no decimal point.
pub fn format_units(amount: U256, decimals: u32) -> String {
    if amount.is_zero() {
        return "0".to_string();
    }

    // 10^d overflows U256 for d > 77, in which case every amount is below it.
    let (whole, remainder) = match U256::from(10u64).checked_pow(U256::from(decimals)) {
        Some(divisor) => (amount / divisor, amount % divisor),
        None => (U256::ZERO, amount),
    };

    if remainder.is_zero() {
        return whole.to_string();
    }

    let decimal_str = format!("{:0>width$}", remainder.to_string(), width = decimals as usize);
    let trimmed = decimal_str.trim_end_matches('0');
    if trimmed.is_empty() {
        whole.to_string()
    } else {
        format!("{}.{}", whole, trimmed)
    }
}

/// Lossy fallback: `raw / 10^decimals` in floating point.
fn approximate(raw: &str, decimals: i64) -> Option<String> {
    let value = raw.parse::<f64>().ok().filter(|v| v.is_finite())?;
    let exponent = i32::try_from(decimals).unwrap_or(if decimals < 0 { i32::MIN } else { i32::MAX });
    let scaled = value / 10f64.powi(exponent);

    if !scaled.is_finite() {
        return None;
    }
    if scaled == 0.0 {
        return Some("0".to_string());
    }
    Some(scaled.to_string())
}
