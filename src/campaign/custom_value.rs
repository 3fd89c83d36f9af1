// This file is part of the product Campaign Launcher.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use log::{info, warn};
use serde::Serialize;
use std::error::Error;
use std::fmt;

use crate::crm::{ContactSource, CrmError, CustomValue};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CampaignValueError {
    NotFound(String),
    Upstream(CrmError),
}

impl CampaignValueError {
    pub fn code(&self) -> &'static str {
        match self {
            CampaignValueError::NotFound(_) => "not_found",
            CampaignValueError::Upstream(_) => "upstream_error",
        }
    }
}

impl fmt::Display for CampaignValueError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CampaignValueError::NotFound(name) => {
                write!(f, "Custom value '{}' was not found", name)
            }
            CampaignValueError::Upstream(err) => write!(f, "{}", err),
        }
    }
}

impl Error for CampaignValueError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            CampaignValueError::NotFound(_) => None,
            CampaignValueError::Upstream(err) => Some(err),
        }
    }
}

impl From<CrmError> for CampaignValueError {
    fn from(err: CrmError) -> Self {
        CampaignValueError::Upstream(err)
    }
}

/// Inline summary of the custom value update, reported next to tagging results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomValueResult {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<&'static str>,
}

impl From<&Result<CustomValue, CampaignValueError>> for CustomValueResult {
    fn from(result: &Result<CustomValue, CampaignValueError>) -> Self {
        match result {
            Ok(value) => CustomValueResult {
                success: true,
                id: Some(value.id.clone()),
                error: None,
                code: None,
            },
            Err(err) => CustomValueResult {
                success: false,
                id: None,
                error: Some(err.to_string()),
                code: Some(err.code()),
            },
        }
    }
}

fn names_match(candidate: &str, wanted: &str) -> bool {
    candidate.trim().to_lowercase() == wanted.trim().to_lowercase()
}

/// Overwrites the location's custom value called `name` with `new_value`.
pub async fn update_campaign_value<S>(
    source: &S,
    name: &str,
    new_value: &str,
    location_id: &str,
) -> Result<CustomValue, CampaignValueError>
where
    S: ContactSource + ?Sized,
{
    let values = source.list_custom_values(location_id).await?;
    let Some(target) = values.iter().find(|value| names_match(&value.name, name)) else {
        warn!(
            "Custom value '{}' not found among {} values for {}",
            name,
            values.len(),
            location_id
        );
        return Err(CampaignValueError::NotFound(name.trim().to_string()));
    };

    let updated = source
        .update_custom_value(location_id, target, new_value)
        .await?;
    info!(
        "Updated custom value '{}' ({}) for {}",
        target.name, target.id, location_id
    );
    Ok(updated)
}
