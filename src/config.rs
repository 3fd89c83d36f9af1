// This file is part of the product Campaign Launcher.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use log::warn;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug)]
pub enum ConfigError {
    LoadError(String),
    ValidationError(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::LoadError(msg) => write!(f, "Configuration load error: {}", msg),
            ConfigError::ValidationError(msg) => {
                write!(f, "Configuration validation error: {}", msg)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    #[serde(default = "default_workers")]
    pub workers: usize,
}

fn default_workers() -> usize {
    4
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LoggingConfig {
    pub level: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    pub name: String,
    pub description: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct CrmConfig {
    #[serde(default = "default_crm_base_url")]
    pub base_url: String,
    #[serde(default = "default_crm_api_version")]
    pub api_version: String,
    #[serde(default)]
    pub default_location_id: Option<String>,
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
    #[serde(default = "default_custom_value_name")]
    pub custom_value_name: String,
}

impl Default for CrmConfig {
    fn default() -> Self {
        Self {
            base_url: default_crm_base_url(),
            api_version: default_crm_api_version(),
            default_location_id: None,
            page_size: default_page_size(),
            timeout_seconds: default_timeout_seconds(),
            custom_value_name: default_custom_value_name(),
        }
    }
}

fn default_crm_base_url() -> String {
    "https://services.leadconnectorhq.com".to_string()
}

fn default_crm_api_version() -> String {
    "2021-07-28".to_string()
}

fn default_page_size() -> usize {
    20
}

fn default_timeout_seconds() -> u64 {
    30
}

fn default_custom_value_name() -> String {
    "Booster Shot Message".to_string()
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct CampaignConfig {
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    #[serde(default = "default_batch_interval_ms")]
    pub batch_interval_ms: u64,
    #[serde(default = "default_call_timeout_seconds")]
    pub call_timeout_seconds: u64,
}

impl Default for CampaignConfig {
    fn default() -> Self {
        Self {
            batch_size: default_batch_size(),
            batch_interval_ms: default_batch_interval_ms(),
            call_timeout_seconds: default_call_timeout_seconds(),
        }
    }
}

fn default_batch_size() -> usize {
    100
}

fn default_batch_interval_ms() -> u64 {
    10_000 // stays under the CRM burst quota of 100 requests per 10 seconds
}

fn default_call_timeout_seconds() -> u64 {
    15
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AiConfig {
    #[serde(default = "default_ai_base_url")]
    pub base_url: String,
    #[serde(default = "default_ai_model")]
    pub model: String,
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            base_url: default_ai_base_url(),
            model: default_ai_model(),
            timeout_seconds: default_timeout_seconds(),
        }
    }
}

fn default_ai_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_ai_model() -> String {
    "gpt-4o-mini".to_string()
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct OffersConfig {
    #[serde(default)]
    pub webhook_url: Option<String>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub app: AppConfig,
    #[serde(default)]
    pub crm: CrmConfig,
    #[serde(default)]
    pub campaign: CampaignConfig,
    #[serde(default)]
    pub ai: AiConfig,
    #[serde(default)]
    pub offers: OffersConfig,
}

#[derive(Debug, Clone)]
pub struct ValidatedConfig {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub app: AppConfig,
    pub crm: CrmConfig,
    pub campaign: CampaignConfig,
    pub ai: AiConfig,
    pub offers: OffersConfig,
}

const CRM_KEY_VARS: [&str; 3] = ["CRM_API_KEY", "CRM_API_TOKEN", "CRM_ACCESS_TOKEN"];
const AI_KEY_VARS: [&str; 2] = ["OPENAI_API_KEY", "AI_API_KEY"];

/// Secrets read from the environment. Missing values are allowed at startup;
/// the routes that need them answer 500 instead.
#[derive(Clone, Default)]
pub struct Credentials {
    pub crm_api_key: Option<String>,
    pub ai_api_key: Option<String>,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("crm_api_key", &self.crm_api_key.as_ref().map(|_| "<set>"))
            .field("ai_api_key", &self.ai_api_key.as_ref().map(|_| "<set>"))
            .finish()
    }
}

impl Credentials {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// First non-blank variable wins, in the order of the name lists.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let first = |names: &[&str]| {
            names
                .iter()
                .filter_map(|name| lookup(name))
                .map(|value| value.trim().to_string())
                .find(|value| !value.is_empty())
        };
        Self {
            crm_api_key: first(&CRM_KEY_VARS),
            ai_api_key: first(&AI_KEY_VARS),
        }
    }
}

impl Config {
    pub fn load(root: &Path) -> Result<Self, ConfigError> {
        let config_path = root.join("config.yaml");
        let config_content = fs::read_to_string(&config_path).map_err(|e| {
            ConfigError::LoadError(format!(
                "Failed to read config file '{}': {}",
                config_path.display(),
                e
            ))
        })?;
        let config: Config = serde_yaml::from_str(&config_content).map_err(|e| {
            ConfigError::LoadError(format!(
                "Failed to parse config file '{}': {}",
                config_path.display(),
                e
            ))
        })?;
        Ok(config)
    }

    /// Loads and validates configuration at startup. If validation fails, the application should not start.
    pub fn load_and_validate(root: &Path) -> Result<ValidatedConfig, ConfigError> {
        Self::load(root)?.validate()
    }

    pub fn validate(self) -> Result<ValidatedConfig, ConfigError> {
        Self::validate_server(&self.server)?;
        Self::validate_crm(&self.crm)?;
        Self::validate_campaign(&self.campaign)?;
        validate_url("ai.base_url", &self.ai.base_url)?;
        if let Some(url) = &self.offers.webhook_url {
            validate_url("offers.webhook_url", url)?;
        }

        if self.crm.default_location_id.is_none() {
            warn!("crm.default_location_id is not set; requests must supply a locationId");
        }

        Ok(ValidatedConfig {
            server: self.server,
            logging: self.logging,
            app: self.app,
            crm: self.crm,
            campaign: self.campaign,
            ai: self.ai,
            offers: self.offers,
        })
    }

    fn validate_server(server: &ServerConfig) -> Result<(), ConfigError> {
        if server.host.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "server.host cannot be empty".to_string(),
            ));
        }
        if server.port == 0 {
            return Err(ConfigError::ValidationError(
                "server.port must be greater than 0".to_string(),
            ));
        }
        if server.workers == 0 {
            return Err(ConfigError::ValidationError(
                "server.workers must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    fn validate_crm(crm: &CrmConfig) -> Result<(), ConfigError> {
        validate_url("crm.base_url", &crm.base_url)?;
        if !(1..=100).contains(&crm.page_size) {
            return Err(ConfigError::ValidationError(format!(
                "crm.page_size must be between 1 and 100, got: {}",
                crm.page_size
            )));
        }
        if crm.timeout_seconds == 0 {
            return Err(ConfigError::ValidationError(
                "crm.timeout_seconds must be greater than 0".to_string(),
            ));
        }
        if crm.custom_value_name.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "crm.custom_value_name cannot be empty".to_string(),
            ));
        }
        Ok(())
    }

    fn validate_campaign(campaign: &CampaignConfig) -> Result<(), ConfigError> {
        if campaign.batch_size == 0 {
            return Err(ConfigError::ValidationError(
                "campaign.batch_size must be greater than 0".to_string(),
            ));
        }
        if campaign.call_timeout_seconds == 0 {
            return Err(ConfigError::ValidationError(
                "campaign.call_timeout_seconds must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}

fn validate_url(label: &str, url: &str) -> Result<(), ConfigError> {
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(ConfigError::ValidationError(format!(
            "{} must be a fully qualified URL starting with http:// or https://, got: {}",
            label, url
        )));
    }
    Ok(())
}
