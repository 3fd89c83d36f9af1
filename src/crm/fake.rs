// This file is part of the product Campaign Launcher.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

//! In-memory `ContactSource` used by unit tests.

use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::Mutex;
use tokio::time::Instant;

use super::{ContactPage, ContactSource, CrmError, Cursor, CustomValue, SentMessage};
use crate::crm::Contact;

#[derive(Default)]
pub struct FakeSource {
    contacts: Vec<Contact>,
    custom_values: Mutex<Vec<CustomValue>>,
    rate_limited: HashSet<String>,
    failing: HashSet<String>,
    slow: HashSet<String>,
    stuck_cursor: bool,
    reject_custom_value_update: bool,
    listing_unavailable: bool,
    endless_empty_pages: bool,
    list_calls: Mutex<Vec<Option<Cursor>>>,
    tag_calls: Mutex<Vec<(String, Instant)>>,
    custom_value_updates: Mutex<Vec<(String, String, String)>>,
}

impl FakeSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_contacts(mut self, contacts: Vec<Contact>) -> Self {
        self.contacts = contacts;
        self
    }

    pub fn with_custom_values(self, values: Vec<CustomValue>) -> Self {
        *self.custom_values.lock().expect("custom values lock") = values;
        self
    }

    pub fn rate_limit(mut self, contact_id: &str) -> Self {
        self.rate_limited.insert(contact_id.to_string());
        self
    }

    pub fn fail(mut self, contact_id: &str) -> Self {
        self.failing.insert(contact_id.to_string());
        self
    }

    /// Tag calls for this contact never complete on their own.
    pub fn hang(mut self, contact_id: &str) -> Self {
        self.slow.insert(contact_id.to_string());
        self
    }

    /// Every page after the first reports the first page's cursor again.
    pub fn with_stuck_cursor(mut self) -> Self {
        self.stuck_cursor = true;
        self
    }

    pub fn reject_custom_value_updates(mut self) -> Self {
        self.reject_custom_value_update = true;
        self
    }

    /// Every listing call answers 503.
    pub fn listing_unavailable(mut self) -> Self {
        self.listing_unavailable = true;
        self
    }

    /// Every listing call returns no contacts but a fresh, complete cursor.
    pub fn with_endless_empty_pages(mut self) -> Self {
        self.endless_empty_pages = true;
        self
    }

    pub fn list_calls(&self) -> Vec<Option<Cursor>> {
        self.list_calls.lock().expect("list calls lock").clone()
    }

    pub fn tag_calls(&self) -> Vec<(String, Instant)> {
        self.tag_calls.lock().expect("tag calls lock").clone()
    }

    pub fn custom_value_updates(&self) -> Vec<(String, String, String)> {
        self.custom_value_updates
            .lock()
            .expect("custom value updates lock")
            .clone()
    }
}

pub fn contact(id: &str, first: &str, last: &str, email: &str, phone: &str) -> Contact {
    Contact {
        id: id.to_string(),
        first_name: Some(first.to_string()),
        last_name: Some(last.to_string()),
        email: Some(email.to_string()),
        phone: Some(phone.to_string()),
        ..Contact::default()
    }
}

pub fn numbered_contacts(count: usize) -> Vec<Contact> {
    (0..count)
        .map(|index| {
            contact(
                &format!("c{}", index),
                "First",
                &format!("Last{}", index),
                &format!("c{}@example.com", index),
                &format!("+1555000{:04}", index),
            )
        })
        .collect()
}

#[async_trait]
impl ContactSource for FakeSource {
    async fn list_contacts(
        &self,
        _location_id: &str,
        limit: usize,
        cursor: Option<&Cursor>,
    ) -> Result<ContactPage, CrmError> {
        self.list_calls
            .lock()
            .expect("list calls lock")
            .push(cursor.cloned());

        if self.listing_unavailable {
            return Err(CrmError::Upstream {
                status: 503,
                body: "down".to_string(),
            });
        }
        if self.endless_empty_pages {
            let calls = self.list_calls.lock().expect("list calls lock").len();
            return Ok(ContactPage {
                contacts: Vec::new(),
                next_cursor: Some(Cursor::new(calls.to_string(), format!("ghost{}", calls))),
                total: None,
            });
        }

        let start = match cursor.and_then(|c| c.start_after.as_deref()) {
            Some(offset) => offset
                .parse::<usize>()
                .map_err(|err| CrmError::Decode(err.to_string()))?,
            None => 0,
        };
        let end = (start + limit).min(self.contacts.len());
        let contacts = self.contacts.get(start..end).unwrap_or_default().to_vec();

        let next_cursor = if end < self.contacts.len() {
            let offset = if self.stuck_cursor && start > 0 {
                start
            } else {
                end
            };
            Some(Cursor::new(
                offset.to_string(),
                self.contacts[offset - 1].id.clone(),
            ))
        } else {
            None
        };

        Ok(ContactPage {
            contacts,
            next_cursor,
            total: Some(self.contacts.len() as u64),
        })
    }

    async fn add_tags(&self, contact_id: &str, _tags: &[String]) -> Result<(), CrmError> {
        self.tag_calls
            .lock()
            .expect("tag calls lock")
            .push((contact_id.to_string(), Instant::now()));

        if self.slow.contains(contact_id) {
            std::future::pending::<()>().await;
        }
        if self.rate_limited.contains(contact_id) {
            return Err(CrmError::RateLimited {
                reset_after_secs: Some(60),
            });
        }
        if self.failing.contains(contact_id) {
            return Err(CrmError::Upstream {
                status: 422,
                body: "invalid contact".to_string(),
            });
        }
        Ok(())
    }

    async fn list_custom_values(&self, _location_id: &str) -> Result<Vec<CustomValue>, CrmError> {
        Ok(self.custom_values.lock().expect("custom values lock").clone())
    }

    async fn update_custom_value(
        &self,
        location_id: &str,
        custom_value: &CustomValue,
        new_value: &str,
    ) -> Result<CustomValue, CrmError> {
        if self.reject_custom_value_update {
            return Err(CrmError::Upstream {
                status: 400,
                body: "rejected".to_string(),
            });
        }
        self.custom_value_updates
            .lock()
            .expect("custom value updates lock")
            .push((
                location_id.to_string(),
                custom_value.id.clone(),
                new_value.to_string(),
            ));
        Ok(CustomValue {
            value: Some(new_value.to_string()),
            ..custom_value.clone()
        })
    }

    async fn upsert_contact_by_phone(
        &self,
        _location_id: &str,
        phone: &str,
    ) -> Result<String, CrmError> {
        if self.failing.contains(phone) {
            return Err(CrmError::Upstream {
                status: 422,
                body: "invalid phone".to_string(),
            });
        }
        Ok(format!("contact-{}", phone))
    }

    async fn send_sms(&self, contact_id: &str, _message: &str) -> Result<SentMessage, CrmError> {
        Ok(SentMessage {
            contact_id: contact_id.to_string(),
            message_id: Some("m1".to_string()),
            conversation_id: Some("conv1".to_string()),
        })
    }
}
