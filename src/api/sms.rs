// This file is part of the product Campaign Launcher.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use actix_web::{HttpRequest, HttpResponse, web};
use log::error;
use serde::Deserialize;
use serde_json::json;

use super::non_blank;
use crate::app_state::AppState;
use crate::campaign::send_test_sms;
use crate::error::ApiError;

const MIN_PHONE_DIGITS: usize = 7;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestSmsRequest {
    phone: Option<String>,
    message: Option<String>,
    location_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct OptimizeSmsRequest {
    message: Option<String>,
}

fn validate_phone(phone: Option<String>) -> Result<String, ApiError> {
    let phone = non_blank(phone)
        .ok_or_else(|| ApiError::Validation("phone is required".to_string()))?;
    let digits = phone.chars().filter(char::is_ascii_digit).count();
    let allowed = phone
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '+' | ' ' | '-' | '(' | ')' | '.'));
    if digits < MIN_PHONE_DIGITS || !allowed {
        return Err(ApiError::Validation(format!(
            "'{}' is not a valid phone number",
            phone
        )));
    }
    Ok(phone)
}

pub async fn test_sms(
    req: HttpRequest,
    state: web::Data<AppState>,
    body: web::Json<TestSmsRequest>,
) -> Result<HttpResponse, ApiError> {
    let body = body.into_inner();
    let phone = validate_phone(body.phone)?;
    let message = non_blank(body.message)
        .ok_or_else(|| ApiError::Validation("message is required".to_string()))?;
    let source = state.contact_source()?;
    let location_id = state
        .location_for(&req, body.location_id.as_deref())
        .ok_or_else(|| ApiError::Validation("locationId is required".to_string()))?;

    let sent = send_test_sms(source, &phone, &message, &location_id)
        .await
        .map_err(|err| {
            error!("Test SMS to {} failed: {}", phone, err);
            ApiError::Internal(format!("Failed to send test SMS: {}", err))
        })?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "contactId": sent.contact_id,
        "messageId": sent.message_id,
        "conversationId": sent.conversation_id,
    })))
}

pub async fn optimize_sms(
    state: web::Data<AppState>,
    body: web::Json<OptimizeSmsRequest>,
) -> Result<HttpResponse, ApiError> {
    let message = non_blank(body.into_inner().message)
        .ok_or_else(|| ApiError::Validation("message is required".to_string()))?;
    let optimized = state.optimizer()?.optimize(&message).await?;
    Ok(HttpResponse::Ok().json(json!({ "optimized": optimized })))
}
