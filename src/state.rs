// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use crate::{config::AppConfig, upstream::Gateway};

#[derive(Clone)]
pub struct AppState {
    pub gateway: Arc<Gateway>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(gateway: Gateway, config: AppConfig) -> Self {
        Self {
            gateway: Arc::new(gateway),
            config: Arc::new(config),
        }
    }

    /// Build the state with HTTP-backed upstream clients.
    pub fn from_config(config: AppConfig) -> Result<Self, crate::upstream::UpstreamError> {
        let gateway = Gateway::from_config(&config)?;
        Ok(Self::new(gateway, config))
    }
}
