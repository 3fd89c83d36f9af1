// This file is part of the product Campaign Launcher.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

pub mod custom_value;
pub mod tagger;
pub mod test_send;

pub use custom_value::{CampaignValueError, CustomValueResult, update_campaign_value};
pub use tagger::{BatchPolicy, BatchReport, BatchTagger, ContactOutcome, JobStatus};
pub use test_send::send_test_sms;

use log::info;
use std::error::Error;
use std::fmt;

use crate::contacts::fetch_all;
use crate::crm::{ContactSource, CrmError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContactSelection {
    All,
    Ids(Vec<String>),
}

#[derive(Debug, Clone)]
pub struct CampaignJob {
    pub selection: ContactSelection,
    pub tag: String,
    pub message: Option<String>,
    pub location_id: Option<String>,
    pub campaign_id: Option<String>,
}

#[derive(Debug, Clone)]
pub struct CampaignOutcome {
    pub report: BatchReport,
    pub custom_value: Option<CustomValueResult>,
}

#[derive(Debug, Clone)]
pub struct LaunchSettings<'a> {
    pub custom_value_name: &'a str,
    pub page_size: usize,
}

/// Why a launch could not start tagging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LaunchError {
    /// `All` was selected but no location scopes the contact listing.
    MissingLocation,
    Crm(CrmError),
}

impl fmt::Display for LaunchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LaunchError::MissingLocation => {
                write!(f, "A location is required to select all contacts")
            }
            LaunchError::Crm(err) => write!(f, "{}", err),
        }
    }
}

impl Error for LaunchError {}

impl From<CrmError> for LaunchError {
    fn from(err: CrmError) -> Self {
        LaunchError::Crm(err)
    }
}

/// Publishes the campaign message (when given) and tags the selected contacts.
///
/// The contact selection is resolved first, so a failed listing leaves the
/// custom value untouched. After that the custom value update is independent
/// of tagging: its failure is reported in the outcome and tagging still runs.
pub async fn launch<S>(
    source: &S,
    tagger: &BatchTagger,
    job: &CampaignJob,
    settings: LaunchSettings<'_>,
) -> Result<CampaignOutcome, LaunchError>
where
    S: ContactSource + ?Sized,
{
    let contact_ids = match (&job.selection, &job.location_id) {
        (ContactSelection::Ids(ids), _) => ids.clone(),
        (ContactSelection::All, Some(location_id)) => {
            fetch_all(source, location_id, settings.page_size)
                .await?
                .into_iter()
                .map(|contact| contact.id)
                .collect()
        }
        (ContactSelection::All, None) => return Err(LaunchError::MissingLocation),
    };

    let custom_value = match (&job.message, &job.location_id) {
        (Some(message), Some(location_id)) => {
            let result =
                update_campaign_value(source, settings.custom_value_name, message, location_id)
                    .await;
            Some(CustomValueResult::from(&result))
        }
        _ => None,
    };

    info!(
        "Launching campaign {} with tag '{}' for {} contacts",
        job.campaign_id.as_deref().unwrap_or("-"),
        job.tag,
        contact_ids.len()
    );
    let report = tagger.run(source, &contact_ids, &job.tag).await;

    Ok(CampaignOutcome {
        report,
        custom_value,
    })
}
