// This file is part of the product Campaign Launcher.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

#![allow(dead_code)]

use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, web};
use campaign_launcher::api;
use campaign_launcher::app_state::AppState;
use campaign_launcher::config::{
    AiConfig, AppConfig, CampaignConfig, CrmConfig, Credentials, LoggingConfig, OffersConfig,
    ServerConfig, ValidatedConfig,
};
use std::sync::Arc;
use wiremock::MockServer;

pub const CRM_KEY: &str = "test-crm-key";
pub const AI_KEY: &str = "test-ai-key";
pub const OFFERS_PATH: &str = "/hooks/offers";

/// Knobs for the harness. Defaults give a fully credentialed app with no
/// pause between chunks.
#[derive(Debug, Clone)]
pub struct HarnessOptions {
    pub crm_key: bool,
    pub ai_key: bool,
    pub offers_hook: bool,
    pub default_location_id: Option<String>,
    pub batch_size: usize,
    pub batch_interval_ms: u64,
}

impl Default for HarnessOptions {
    fn default() -> Self {
        Self {
            crm_key: true,
            ai_key: true,
            offers_hook: true,
            default_location_id: None,
            batch_size: 2,
            batch_interval_ms: 0,
        }
    }
}

/// One mock server stands in for the CRM, the AI endpoint and the offer web-hook.
pub struct TestHarness {
    pub upstream: MockServer,
    pub config: Arc<ValidatedConfig>,
    pub app_state: Arc<AppState>,
}

impl TestHarness {
    pub async fn new() -> Self {
        Self::with_options(HarnessOptions::default()).await
    }

    pub async fn with_options(options: HarnessOptions) -> Self {
        let upstream = MockServer::start().await;
        let config = Arc::new(build_config(&upstream.uri(), &options));
        let credentials = Credentials {
            crm_api_key: options.crm_key.then(|| CRM_KEY.to_string()),
            ai_api_key: options.ai_key.then(|| AI_KEY.to_string()),
        };
        let app_state =
            Arc::new(AppState::new(config.clone(), &credentials).expect("build app state"));
        Self {
            upstream,
            config,
            app_state,
        }
    }
}

pub fn build_test_app(
    app_state: Arc<AppState>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(web::Data::from(app_state))
        .configure(api::configure)
        .default_service(web::route().to(api::not_found))
}

fn build_config(upstream_uri: &str, options: &HarnessOptions) -> ValidatedConfig {
    ValidatedConfig {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 8081,
            workers: 1,
        },
        logging: LoggingConfig {
            level: "debug".to_string(),
        },
        app: AppConfig {
            name: "Campaign Launcher".to_string(),
            description: "Test instance".to_string(),
        },
        crm: CrmConfig {
            base_url: upstream_uri.to_string(),
            api_version: "2021-07-28".to_string(),
            default_location_id: options.default_location_id.clone(),
            page_size: 20,
            timeout_seconds: 5,
            custom_value_name: "Booster Shot Message".to_string(),
        },
        campaign: CampaignConfig {
            batch_size: options.batch_size,
            batch_interval_ms: options.batch_interval_ms,
            call_timeout_seconds: 5,
        },
        ai: AiConfig {
            base_url: upstream_uri.to_string(),
            model: "gpt-4o-mini".to_string(),
            timeout_seconds: 5,
        },
        offers: OffersConfig {
            webhook_url: options
                .offers_hook
                .then(|| format!("{}{}", upstream_uri, OFFERS_PATH)),
        },
    }
}
