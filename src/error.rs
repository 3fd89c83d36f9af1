// This file is part of the product Campaign Launcher.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde_json::json;
use std::fmt;

use crate::ai::AiError;
use crate::campaign::LaunchError;
use crate::crm::CrmError;
use crate::offers::OfferError;

/// Errors that end a request. Rendered as `{"error": ..., "code": ...}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    Validation(String),
    Upstream { status: u16, body: String },
    RateLimited { reset_after_secs: Option<u64> },
    NotFound(String),
    MethodNotAllowed,
    MissingCredential(&'static str),
    Internal(String),
}

impl ApiError {
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::Validation(_) => "validation_error",
            ApiError::Upstream { .. } => "upstream_error",
            ApiError::RateLimited { .. } => "rate_limited",
            ApiError::NotFound(_) => "not_found",
            ApiError::MethodNotAllowed => "method_not_allowed",
            ApiError::MissingCredential(_) => "missing_credentials",
            ApiError::Internal(_) => "internal_error",
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Validation(msg) => write!(f, "{}", msg),
            ApiError::Upstream { status, .. } => {
                write!(f, "Upstream service responded with status {}", status)
            }
            ApiError::RateLimited { .. } => write!(f, "Rate limit reached, try again later"),
            ApiError::NotFound(what) => write!(f, "{} not found", what),
            ApiError::MethodNotAllowed => write!(f, "Method not allowed"),
            ApiError::MissingCredential(name) => {
                write!(f, "Server is missing the {} credential", name)
            }
            ApiError::Internal(msg) => write!(f, "{}", msg),
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Upstream { status, .. } => StatusCode::from_u16(*status)
                .ok()
                .filter(|code| code.is_client_error() || code.is_server_error())
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            ApiError::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::MissingCredential(_) | ApiError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        let mut body = json!({
            "error": self.to_string(),
            "code": self.code(),
        });
        match self {
            ApiError::Upstream { body: details, .. } if !details.is_empty() => {
                body["details"] = json!(details);
            }
            ApiError::RateLimited { reset_after_secs } => {
                body["resetTime"] = json!(reset_after_secs);
            }
            _ => {}
        }
        HttpResponse::build(self.status_code())
            .insert_header(("Cache-Control", "no-store"))
            .json(body)
    }
}

impl From<CrmError> for ApiError {
    fn from(err: CrmError) -> Self {
        match err {
            CrmError::Upstream { status, body } => ApiError::Upstream { status, body },
            CrmError::RateLimited { reset_after_secs } => ApiError::RateLimited { reset_after_secs },
            CrmError::Timeout => ApiError::Upstream {
                status: StatusCode::GATEWAY_TIMEOUT.as_u16(),
                body: String::new(),
            },
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl From<LaunchError> for ApiError {
    fn from(err: LaunchError) -> Self {
        match err {
            LaunchError::MissingLocation => ApiError::Validation(
                "locationId is required when contactIds is \"ALL\"".to_string(),
            ),
            LaunchError::Crm(err) => err.into(),
        }
    }
}

impl From<AiError> for ApiError {
    fn from(err: AiError) -> Self {
        match err {
            AiError::Upstream { status, body } => ApiError::Upstream { status, body },
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl From<OfferError> for ApiError {
    fn from(err: OfferError) -> Self {
        match err {
            OfferError::Upstream { status, body } => ApiError::Upstream { status, body },
            other => ApiError::Internal(other.to_string()),
        }
    }
}
