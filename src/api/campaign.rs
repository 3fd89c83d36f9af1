// This file is part of the product Campaign Launcher.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use actix_web::{HttpRequest, HttpResponse, web};
use log::warn;
use serde::{Deserialize, Serialize};

use super::non_blank;
use crate::app_state::AppState;
use crate::campaign::{
    CampaignJob, ContactOutcome, ContactSelection, CustomValueResult, JobStatus, LaunchSettings,
    launch,
};
use crate::contacts::MAX_PAGE_SIZE;
use crate::error::ApiError;

const ALL_CONTACTS: &str = "ALL";

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ContactIdsField {
    Ids(Vec<String>),
    Keyword(String),
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddTagRequest {
    contact_ids: Option<ContactIdsField>,
    tag: Option<String>,
    booster_shot_message: Option<String>,
    location_id: Option<String>,
    campaign_id: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AddTagResponse<'a> {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    status: JobStatus,
    results: &'a [ContactOutcome],
    chunks: usize,
    succeeded: usize,
    failed: usize,
    remaining: &'a [String],
    #[serde(skip_serializing_if = "Option::is_none")]
    reset_time: Option<u64>,
    custom_value_result: Option<&'a CustomValueResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    campaign_id: Option<&'a str>,
}

fn parse_selection(field: Option<ContactIdsField>) -> Result<ContactSelection, ApiError> {
    match field {
        Some(ContactIdsField::Keyword(keyword))
            if keyword.trim().eq_ignore_ascii_case(ALL_CONTACTS) =>
        {
            Ok(ContactSelection::All)
        }
        Some(ContactIdsField::Keyword(_)) => Err(ApiError::Validation(
            "contactIds must be an array of ids or \"ALL\"".to_string(),
        )),
        Some(ContactIdsField::Ids(ids)) => {
            let ids: Vec<String> = ids
                .into_iter()
                .map(|id| id.trim().to_string())
                .filter(|id| !id.is_empty())
                .collect();
            if ids.is_empty() {
                return Err(ApiError::Validation(
                    "contactIds must not be empty".to_string(),
                ));
            }
            Ok(ContactSelection::Ids(ids))
        }
        None => Err(ApiError::Validation("contactIds is required".to_string())),
    }
}

pub async fn add_tag(
    req: HttpRequest,
    state: web::Data<AppState>,
    body: web::Json<AddTagRequest>,
) -> Result<HttpResponse, ApiError> {
    let body = body.into_inner();
    let selection = parse_selection(body.contact_ids)?;
    let tag = non_blank(body.tag)
        .ok_or_else(|| ApiError::Validation("tag is required".to_string()))?;
    let source = state.contact_source()?;

    let location_id = state.location_for(&req, body.location_id.as_deref());

    let job = CampaignJob {
        selection,
        tag,
        message: non_blank(body.booster_shot_message),
        location_id,
        campaign_id: non_blank(body.campaign_id),
    };
    let settings = LaunchSettings {
        custom_value_name: &state.config.crm.custom_value_name,
        page_size: MAX_PAGE_SIZE,
    };
    let outcome = launch(source, &state.tagger, &job, settings).await?;
    let report = &outcome.report;

    let mut response = AddTagResponse {
        success: !report.rate_limited,
        error: None,
        status: report.status,
        results: &report.results,
        chunks: report.chunks,
        succeeded: report.succeeded(),
        failed: report.failed(),
        remaining: &report.remaining,
        reset_time: None,
        custom_value_result: outcome.custom_value.as_ref(),
        campaign_id: job.campaign_id.as_deref(),
    };

    if report.rate_limited {
        warn!(
            "Tagging aborted by CRM rate limit after {} contacts, {} left",
            report.results.len(),
            report.remaining.len()
        );
        response.error = Some("Rate limit reached, try again later".to_string());
        response.reset_time = report.reset_after_secs;
        return Ok(HttpResponse::TooManyRequests()
            .insert_header(("Cache-Control", "no-store"))
            .json(response));
    }

    Ok(HttpResponse::Ok()
        .insert_header(("Cache-Control", "no-store"))
        .json(response))
}
