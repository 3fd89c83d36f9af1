// This file is part of the product Campaign Launcher.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use actix_web::HttpRequest;
use std::sync::Arc;
use std::time::Duration;

use crate::ai::SmsOptimizer;
use crate::campaign::{BatchPolicy, BatchTagger};
use crate::config::{Credentials, ValidatedConfig};
use crate::crm::{ContactSource, CrmClient};
use crate::error::ApiError;
use crate::offers::OfferFeed;
use crate::tenant::{TenantHints, resolve_tenant_id};

pub struct AppState {
    pub config: Arc<ValidatedConfig>,
    pub tagger: BatchTagger,
    contact_source: Option<Arc<dyn ContactSource>>,
    optimizer: Option<SmsOptimizer>,
    offer_feed: Option<OfferFeed>,
}

impl AppState {
    pub fn new(config: Arc<ValidatedConfig>, credentials: &Credentials) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("campaign-launcher/", env!("CARGO_PKG_VERSION")))
            .connect_timeout(Duration::from_secs(10))
            .build()?;

        let contact_source = credentials.crm_api_key.clone().map(|key| {
            Arc::new(CrmClient::new(http.clone(), &config.crm, key)) as Arc<dyn ContactSource>
        });
        let optimizer = credentials
            .ai_api_key
            .clone()
            .map(|key| SmsOptimizer::new(http.clone(), &config.ai, key));
        let offer_feed = config.offers.webhook_url.clone().map(|url| {
            OfferFeed::new(
                http.clone(),
                url,
                Duration::from_secs(config.crm.timeout_seconds),
            )
        });

        Ok(Self {
            tagger: BatchTagger::new(BatchPolicy::from_config(&config.campaign)),
            config,
            contact_source,
            optimizer,
            offer_feed,
        })
    }

    /// Swaps the CRM backend, e.g. for a source that is not HTTP based.
    pub fn with_contact_source(mut self, source: Arc<dyn ContactSource>) -> Self {
        self.contact_source = Some(source);
        self
    }

    pub fn contact_source(&self) -> Result<&dyn ContactSource, ApiError> {
        self.contact_source
            .as_deref()
            .ok_or(ApiError::MissingCredential("CRM API key"))
    }

    pub fn optimizer(&self) -> Result<&SmsOptimizer, ApiError> {
        self.optimizer
            .as_ref()
            .ok_or(ApiError::MissingCredential("AI API key"))
    }

    pub fn offer_feed(&self) -> Result<&OfferFeed, ApiError> {
        self.offer_feed
            .as_ref()
            .ok_or(ApiError::MissingCredential("offer web-hook URL"))
    }

    /// An explicit id from the request body outranks every other hint.
    pub fn location_for(&self, req: &HttpRequest, explicit: Option<&str>) -> Option<String> {
        let mut hints =
            TenantHints::from_request(req, self.config.crm.default_location_id.as_deref());
        if let Some(explicit) = explicit.filter(|value| !value.trim().is_empty()) {
            hints.query = Some(explicit.to_string());
        }
        resolve_tenant_id(&hints)
    }
}
