// This file is part of the product Campaign Launcher.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

//! SMS copy rewriting through an OpenAI-compatible chat completions endpoint.

use log::debug;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use std::error::Error;
use std::fmt;
use std::time::Duration;

use crate::config::AiConfig;

const SYSTEM_PROMPT: &str = "You rewrite SMS marketing messages for a medical aesthetics clinic. \
Keep the meaning, make it concise, warm and professional, and stay within 160 characters when possible. \
Keep every placeholder such as {{contact.first_name}} exactly as written. \
Do not add emojis, links or prices that are not already present. \
Reply with the rewritten message only.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AiError {
    Upstream { status: u16, body: String },
    Transport(String),
    EmptyResponse,
}

impl fmt::Display for AiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AiError::Upstream { status, body } => {
                write!(f, "AI request failed with status {}: {}", status, body)
            }
            AiError::Transport(msg) => write!(f, "AI transport error: {}", msg),
            AiError::EmptyResponse => write!(f, "AI returned no text"),
        }
    }
}

impl Error for AiError {}

impl From<reqwest::Error> for AiError {
    fn from(err: reqwest::Error) -> Self {
        AiError::Transport(err.to_string())
    }
}

#[derive(Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<CompletionChoice>,
}

#[derive(Deserialize)]
struct CompletionChoice {
    message: CompletionMessage,
}

#[derive(Deserialize)]
struct CompletionMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Clone)]
pub struct SmsOptimizer {
    http: Client,
    base_url: String,
    model: String,
    api_key: String,
    timeout: Duration,
}

impl SmsOptimizer {
    pub fn new(http: Client, config: &AiConfig, api_key: String) -> Self {
        Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key,
            timeout: Duration::from_secs(config.timeout_seconds),
        }
    }

    pub async fn optimize(&self, message: &str) -> Result<String, AiError> {
        let response = self
            .http
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .timeout(self.timeout)
            .json(&json!({
                "model": self.model,
                "temperature": 0.4,
                "messages": [
                    { "role": "system", "content": SYSTEM_PROMPT },
                    { "role": "user", "content": message },
                ],
            }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AiError::Upstream {
                status: status.as_u16(),
                body: response.text().await.unwrap_or_default(),
            });
        }

        let completion: CompletionResponse = response.json().await?;
        let text = completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|content| content.trim().to_string())
            .filter(|content| !content.is_empty())
            .ok_or(AiError::EmptyResponse)?;

        debug!(
            "Optimized SMS from {} to {} characters",
            message.chars().count(),
            text.chars().count()
        );
        Ok(text)
    }
}
