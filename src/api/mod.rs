// This file is part of the product Campaign Launcher.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use actix_web::{HttpRequest, HttpResponse, Resource, Route, web};

use crate::error::ApiError;

mod campaign;
mod contacts;
mod offers;
mod sms;
mod system;

const MAX_JSON_BODY_BYTES: usize = 4 * 1024 * 1024;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(resource("/healthz", web::get().to(system::healthz)))
        .service(
            web::scope("/api")
                .app_data(json_config())
                .app_data(query_config())
                .service(resource("/contacts", web::get().to(contacts::get_contacts)))
                .service(resource("/add-tag", web::post().to(campaign::add_tag)))
                .service(resource("/test-sms", web::post().to(sms::test_sms)))
                .service(resource("/optimize-sms", web::post().to(sms::optimize_sms)))
                .service(resource("/offers", web::get().to(offers::get_offers)))
                .service(resource("/tenant", web::get().to(system::get_tenant))),
        );
}

// A known path hit with the wrong verb answers 405 in the same JSON shape as other errors.
fn resource(path: &str, route: Route) -> Resource {
    web::resource(path)
        .route(route)
        .default_service(web::route().to(method_not_allowed))
}

pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(MAX_JSON_BODY_BYTES)
        .error_handler(|err, _req| ApiError::Validation(format!("Invalid JSON body: {}", err)).into())
}

pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err, _req| {
        ApiError::Validation(format!("Invalid query parameters: {}", err)).into()
    })
}

pub async fn method_not_allowed() -> Result<HttpResponse, ApiError> {
    Err(ApiError::MethodNotAllowed)
}

pub async fn not_found(req: HttpRequest) -> Result<HttpResponse, ApiError> {
    Err(ApiError::NotFound(format!("Route {}", req.path())))
}

/// Treats absent and whitespace-only strings alike.
pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
