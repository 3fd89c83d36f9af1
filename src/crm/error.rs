// This file is part of the product Campaign Launcher.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use std::error::Error;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CrmError {
    /// The CRM answered with a non-success status other than 429.
    Upstream { status: u16, body: String },
    /// The CRM answered 429; `reset_after_secs` comes from the response headers when present.
    RateLimited { reset_after_secs: Option<u64> },
    Timeout,
    Transport(String),
    Decode(String),
}

impl CrmError {
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, CrmError::RateLimited { .. })
    }
}

impl fmt::Display for CrmError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CrmError::Upstream { status, body } => {
                write!(f, "CRM request failed with status {}: {}", status, body)
            }
            CrmError::RateLimited {
                reset_after_secs: Some(seconds),
            } => write!(f, "CRM rate limit reached; resets in {}s", seconds),
            CrmError::RateLimited {
                reset_after_secs: None,
            } => write!(f, "CRM rate limit reached"),
            CrmError::Timeout => write!(f, "CRM request timed out"),
            CrmError::Transport(msg) => write!(f, "CRM transport error: {}", msg),
            CrmError::Decode(msg) => write!(f, "CRM response could not be decoded: {}", msg),
        }
    }
}

impl Error for CrmError {}

impl From<reqwest::Error> for CrmError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            CrmError::Timeout
        } else if err.is_decode() {
            CrmError::Decode(err.to_string())
        } else {
            CrmError::Transport(err.to_string())
        }
    }
}
