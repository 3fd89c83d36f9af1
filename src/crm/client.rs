// This file is part of the product Campaign Launcher.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use async_trait::async_trait;
use log::{debug, warn};
use reqwest::header::{ACCEPT, HeaderMap, RETRY_AFTER};
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::json;
use std::time::Duration;

use super::types::{
    ContactListEnvelope, CustomValueEnvelope, CustomValueListEnvelope, SendMessageEnvelope,
    UpsertContactEnvelope,
};
use super::{ContactPage, ContactSource, CrmError, Cursor, CustomValue, SentMessage};
use crate::config::CrmConfig;

const RATE_LIMIT_RESET_HEADER: &str = "x-ratelimit-reset";

#[derive(Clone)]
pub struct CrmClient {
    http: Client,
    base_url: String,
    api_key: String,
    api_version: String,
    timeout: Duration,
}

impl CrmClient {
    pub fn new(http: Client, config: &CrmConfig, api_key: String) -> Self {
        Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key,
            api_version: config.api_version.clone(),
            timeout: Duration::from_secs(config.timeout_seconds),
        }
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.http
            .request(method, format!("{}{}", self.base_url, path))
            .bearer_auth(&self.api_key)
            .header("Version", &self.api_version)
            .header(ACCEPT, "application/json")
            .timeout(self.timeout)
    }

    async fn send_json<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T, CrmError> {
        let response = check_status(builder.send().await?).await?;
        Ok(response.json::<T>().await?)
    }
}

async fn check_status(response: Response) -> Result<Response, CrmError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    if status == StatusCode::TOO_MANY_REQUESTS {
        let reset_after_secs = reset_after_secs(response.headers());
        warn!(
            "CRM rate limit hit on {} (reset after {:?}s)",
            response.url().path(),
            reset_after_secs
        );
        return Err(CrmError::RateLimited { reset_after_secs });
    }

    let body = response.text().await.unwrap_or_default();
    debug!("CRM responded {}: {}", status.as_u16(), body);
    Err(CrmError::Upstream {
        status: status.as_u16(),
        body,
    })
}

fn reset_after_secs(headers: &HeaderMap) -> Option<u64> {
    [RETRY_AFTER.as_str(), RATE_LIMIT_RESET_HEADER]
        .iter()
        .filter_map(|name| headers.get(*name))
        .filter_map(|value| value.to_str().ok())
        .find_map(|value| value.trim().parse::<u64>().ok())
}

#[async_trait]
impl ContactSource for CrmClient {
    async fn list_contacts(
        &self,
        location_id: &str,
        limit: usize,
        cursor: Option<&Cursor>,
    ) -> Result<ContactPage, CrmError> {
        let mut query = vec![
            ("locationId", location_id.to_string()),
            ("limit", limit.to_string()),
        ];
        if let Some(cursor) = cursor
            && let (Some(start_after), Some(start_after_id)) =
                (&cursor.start_after, &cursor.start_after_id)
        {
            query.push(("startAfter", start_after.clone()));
            query.push(("startAfterId", start_after_id.clone()));
        }

        let envelope: ContactListEnvelope = self
            .send_json(self.request(Method::GET, "/contacts/").query(&query))
            .await?;

        let (total, next_cursor) = match envelope.meta {
            Some(meta) => {
                let cursor = Cursor {
                    start_after: meta.start_after,
                    start_after_id: meta.start_after_id,
                };
                (meta.total, Some(cursor).filter(Cursor::is_complete))
            }
            None => (None, None),
        };

        Ok(ContactPage {
            contacts: envelope.contacts,
            next_cursor,
            total,
        })
    }

    async fn add_tags(&self, contact_id: &str, tags: &[String]) -> Result<(), CrmError> {
        let path = format!("/contacts/{}/tags", urlencoding::encode(contact_id));
        let response = self
            .request(Method::POST, &path)
            .json(&json!({ "tags": tags }))
            .send()
            .await?;
        check_status(response).await?;
        Ok(())
    }

    async fn list_custom_values(&self, location_id: &str) -> Result<Vec<CustomValue>, CrmError> {
        let path = format!(
            "/locations/{}/customValues",
            urlencoding::encode(location_id)
        );
        let envelope: CustomValueListEnvelope =
            self.send_json(self.request(Method::GET, &path)).await?;
        Ok(envelope.custom_values)
    }

    async fn update_custom_value(
        &self,
        location_id: &str,
        custom_value: &CustomValue,
        new_value: &str,
    ) -> Result<CustomValue, CrmError> {
        let path = format!(
            "/locations/{}/customValues/{}",
            urlencoding::encode(location_id),
            urlencoding::encode(&custom_value.id)
        );
        let envelope: CustomValueEnvelope = self
            .send_json(
                self.request(Method::PUT, &path)
                    .json(&json!({ "name": custom_value.name, "value": new_value })),
            )
            .await?;
        Ok(envelope.custom_value)
    }

    async fn upsert_contact_by_phone(
        &self,
        location_id: &str,
        phone: &str,
    ) -> Result<String, CrmError> {
        let envelope: UpsertContactEnvelope = self
            .send_json(
                self.request(Method::POST, "/contacts/upsert")
                    .json(&json!({ "locationId": location_id, "phone": phone })),
            )
            .await?;
        Ok(envelope.contact.id)
    }

    async fn send_sms(&self, contact_id: &str, message: &str) -> Result<SentMessage, CrmError> {
        let envelope: SendMessageEnvelope = self
            .send_json(
                self.request(Method::POST, "/conversations/messages")
                    .json(&json!({ "type": "SMS", "contactId": contact_id, "message": message })),
            )
            .await?;
        Ok(SentMessage {
            contact_id: contact_id.to_string(),
            message_id: envelope.message_id,
            conversation_id: envelope.conversation_id,
        })
    }
}
