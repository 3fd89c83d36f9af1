// This file is part of the product Campaign Launcher.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

//! Offer copy maintained in a spreadsheet and published through a web-hook.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OfferError {
    Upstream { status: u16, body: String },
    Transport(String),
    Decode(String),
}

impl fmt::Display for OfferError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OfferError::Upstream { status, body } => {
                write!(f, "Offer feed failed with status {}: {}", status, body)
            }
            OfferError::Transport(msg) => write!(f, "Offer feed transport error: {}", msg),
            OfferError::Decode(msg) => write!(f, "Offer feed could not be decoded: {}", msg),
        }
    }
}

impl Error for OfferError {}

impl From<reqwest::Error> for OfferError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            OfferError::Decode(err.to_string())
        } else {
            OfferError::Transport(err.to_string())
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Offer {
    pub name: String,
    pub message: String,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

// The sheet script has shipped both shapes.
#[derive(Deserialize)]
#[serde(untagged)]
enum OfferPayload {
    List(Vec<Offer>),
    Wrapped { offers: Vec<Offer> },
}

impl OfferPayload {
    fn into_active(self) -> Vec<Offer> {
        let offers = match self {
            OfferPayload::List(offers) => offers,
            OfferPayload::Wrapped { offers } => offers,
        };
        offers.into_iter().filter(|offer| offer.active).collect()
    }
}

#[derive(Clone)]
pub struct OfferFeed {
    http: Client,
    url: String,
    timeout: Duration,
}

impl OfferFeed {
    pub fn new(http: Client, url: String, timeout: Duration) -> Self {
        Self { http, url, timeout }
    }

    pub async fn fetch(&self) -> Result<Vec<Offer>, OfferError> {
        let response = self.http.get(&self.url).timeout(self.timeout).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(OfferError::Upstream {
                status: status.as_u16(),
                body: response.text().await.unwrap_or_default(),
            });
        }
        let bytes = response.bytes().await?;
        let payload: OfferPayload =
            serde_json::from_slice(&bytes).map_err(|err| OfferError::Decode(err.to_string()))?;
        Ok(payload.into_active())
    }
}
