// This file is part of the product Campaign Launcher.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

//! Works out which CRM location a request belongs to.

use actix_web::HttpRequest;
use actix_web::http::header::REFERER;
use actix_web::web::Query;
use std::collections::HashMap;

pub const LOCATION_QUERY_PARAM: &str = "locationId";
pub const LOCATION_HEADER: &str = "X-Location-Id";
pub const LOCATION_COOKIE: &str = "location_id";

/// Every place a location id may come from, in precedence order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TenantHints {
    pub query: Option<String>,
    pub header: Option<String>,
    pub referer: Option<String>,
    pub cookie: Option<String>,
    pub fallback: Option<String>,
}

impl TenantHints {
    pub fn from_request(req: &HttpRequest, fallback: Option<&str>) -> Self {
        let query = Query::<HashMap<String, String>>::from_query(req.query_string())
            .ok()
            .and_then(|params| params.get(LOCATION_QUERY_PARAM).cloned());
        Self {
            query,
            header: req
                .headers()
                .get(LOCATION_HEADER)
                .and_then(|value| value.to_str().ok())
                .map(str::to_string),
            referer: req
                .headers()
                .get(REFERER)
                .and_then(|value| value.to_str().ok())
                .and_then(location_from_path),
            cookie: req
                .cookie(LOCATION_COOKIE)
                .map(|cookie| cookie.value().to_string()),
            fallback: fallback.map(str::to_string),
        }
    }
}

/// First non-blank hint wins: query, header, referer path, cookie, configured default.
pub fn resolve_tenant_id(hints: &TenantHints) -> Option<String> {
    [
        &hints.query,
        &hints.header,
        &hints.referer,
        &hints.cookie,
        &hints.fallback,
    ]
    .into_iter()
    .filter_map(|hint| hint.as_deref())
    .map(str::trim)
    .find(|hint| !hint.is_empty())
    .map(str::to_string)
}

/// Extracts `{id}` from a `.../location/{id}/...` URL or path.
pub fn location_from_path(url: &str) -> Option<String> {
    let path = url.split(['?', '#']).next().unwrap_or_default();
    path.split('/')
        .skip_while(|segment| *segment != "location")
        .nth(1)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
}
