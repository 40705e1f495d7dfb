// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! This module defines environment variable names, default values, and the
//! [`AppConfig`] object built once at startup. Upstream credentials and
//! endpoints are carried by the config and handed to the gateway clients;
//! nothing reads the environment after startup.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `5001` |
//! | `ETHERSCAN_API_KEY` | Block explorer API key | Unset (warning) |
//! | `MORALIS_API_KEY` | Wallet balance API key | Unset (warning) |
//! | `EXPLORER_API_URL` | Block explorer base URL | `https://api.etherscan.io/api` |
//! | `WALLET_API_URL` | Wallet balance API base URL | `https://deep-index.moralis.io/api/v2.2` |
//! | `BALANCE_CHAIN` | Chain identifier for balance lookups | `0x1` |
//! | `UPSTREAM_TIMEOUT_SECS` | Timeout applied to every upstream call | `15` |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use std::{str::FromStr, time::Duration};

use url::Url;

pub const HOST_ENV: &str = "HOST";
pub const PORT_ENV: &str = "PORT";
pub const EXPLORER_API_KEY_ENV: &str = "ETHERSCAN_API_KEY";
pub const WALLET_API_KEY_ENV: &str = "MORALIS_API_KEY";
pub const EXPLORER_API_URL_ENV: &str = "EXPLORER_API_URL";
pub const WALLET_API_URL_ENV: &str = "WALLET_API_URL";
pub const BALANCE_CHAIN_ENV: &str = "BALANCE_CHAIN";
pub const UPSTREAM_TIMEOUT_ENV: &str = "UPSTREAM_TIMEOUT_SECS";
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 5001;
pub const DEFAULT_EXPLORER_API_URL: &str = "https://api.etherscan.io/api";
pub const DEFAULT_WALLET_API_URL: &str = "https://deep-index.moralis.io/api/v2.2";

/// Ethereum mainnet, in the hex form the wallet balance API expects.
pub const DEFAULT_BALANCE_CHAIN: &str = "0x1";

pub const DEFAULT_UPSTREAM_TIMEOUT: Duration = Duration::from_secs(15);

/// Default `RUST_LOG` filter when none is set.
pub const DEFAULT_LOG_FILTER: &str = "info,tower_http=debug";

/// Output format for the tracing subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "pretty" | "" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            other => Err(ConfigError::Invalid {
                name: LOG_FORMAT_ENV,
                reason: format!("expected `json` or `pretty`, got `{other}`"),
            }),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value for {name}: {reason}")]
    Invalid { name: &'static str, reason: String },
}

/// Process-wide configuration, constructed once in `main`.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub explorer_api_key: Option<String>,
    pub wallet_api_key: Option<String>,
    pub explorer_api_url: Url,
    pub wallet_api_url: Url,
    pub balance_chain: String,
    pub upstream_timeout: Duration,
    pub log_format: LogFormat,
}

impl AppConfig {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let host = get(HOST_ENV).unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port = match get(PORT_ENV) {
            Some(raw) => raw.parse::<u16>().map_err(|e| ConfigError::Invalid {
                name: PORT_ENV,
                reason: e.to_string(),
            })?,
            None => DEFAULT_PORT,
        };

        let explorer_api_url = parse_url(
            EXPLORER_API_URL_ENV,
            get(EXPLORER_API_URL_ENV).as_deref().unwrap_or(DEFAULT_EXPLORER_API_URL),
        )?;
        let wallet_api_url = parse_url(
            WALLET_API_URL_ENV,
            get(WALLET_API_URL_ENV).as_deref().unwrap_or(DEFAULT_WALLET_API_URL),
        )?;

        let upstream_timeout = match get(UPSTREAM_TIMEOUT_ENV) {
            Some(raw) => {
                let secs = raw.parse::<u64>().map_err(|e| ConfigError::Invalid {
                    name: UPSTREAM_TIMEOUT_ENV,
                    reason: e.to_string(),
                })?;
                if secs == 0 {
                    return Err(ConfigError::Invalid {
                        name: UPSTREAM_TIMEOUT_ENV,
                        reason: "timeout must be at least one second".to_string(),
                    });
                }
                Duration::from_secs(secs)
            }
            None => DEFAULT_UPSTREAM_TIMEOUT,
        };

        let log_format = match get(LOG_FORMAT_ENV) {
            Some(raw) => raw.parse()?,
            None => LogFormat::default(),
        };

        Ok(Self {
            host,
            port,
            explorer_api_key: get(EXPLORER_API_KEY_ENV),
            wallet_api_key: get(WALLET_API_KEY_ENV),
            explorer_api_url,
            wallet_api_url,
            balance_chain: get(BALANCE_CHAIN_ENV)
                .unwrap_or_else(|| DEFAULT_BALANCE_CHAIN.to_string()),
            upstream_timeout,
            log_format,
        })
    }

    /// Host and port the HTTP server binds to.
    ///
    /// The host may be a name (`localhost`) or an IPv4/IPv6 literal, with or
    /// without brackets (`::`, `[::]`); it is resolved when binding.
    pub fn bind_addr(&self) -> (&str, u16) {
        let host = self
            .host
            .strip_prefix('[')
            .and_then(|h| h.strip_suffix(']'))
            .unwrap_or(&self.host);
        (host, self.port)
    }

    /// Names of credential variables that are not set.
    pub fn missing_credentials(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.explorer_api_key.is_none() {
            missing.push(EXPLORER_API_KEY_ENV);
        }
        if self.wallet_api_key.is_none() {
            missing.push(WALLET_API_KEY_ENV);
        }
        missing
    }
}

fn parse_url(name: &'static str, raw: &str) -> Result<Url, ConfigError> {
    Url::parse(raw).map_err(|e| ConfigError::Invalid {
        name,
        reason: e.to_string(),
    })
}
