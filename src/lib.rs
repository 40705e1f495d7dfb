// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Wallet Lens - Explorer & Balance Proxy
//!
//! Stateless HTTP service that lists the transfers of an Ethereum address
//! through a block explorer and reports its historical token balances through
//! a wallet indexer, with exact formatting of base-unit amounts.
//!
//! ## Modules
//!
//! - `api` - HTTP API handlers (Axum)
//! - `upstream` - Explorer and wallet balance clients
//! - `formatting` - Base-unit amount formatting
//! - `display` - Table rendering of upstream records

pub mod api;
pub mod config;
pub mod display;
pub mod error;
pub mod formatting;
pub mod logging;
pub mod models;
pub mod state;
pub mod upstream;
