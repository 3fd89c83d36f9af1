// This file is part of the product Campaign Launcher.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use actix_web::{HttpResponse, web};
use serde_json::json;

use crate::app_state::AppState;
use crate::error::ApiError;

pub async fn get_offers(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let offers = state.offer_feed()?.fetch().await?;
    Ok(HttpResponse::Ok().json(json!({ "offers": offers })))
}
