// This file is part of the product Campaign Launcher.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use async_trait::async_trait;

mod client;
mod error;
#[cfg(test)]
pub(crate) mod fake;
pub mod types;

pub use client::CrmClient;
pub use error::CrmError;
pub use types::{Contact, ContactPage, Cursor, CustomFieldEntry, CustomValue, SentMessage};

/// Everything the launcher needs from the remote CRM.
///
/// `CrmClient` is the production implementation; the core modules only see
/// this trait so they can run against an in-memory source in tests.
#[async_trait]
pub trait ContactSource: Send + Sync {
    /// Lists one page of contacts. `cursor` is only passed when both tokens are set.
    async fn list_contacts(
        &self,
        location_id: &str,
        limit: usize,
        cursor: Option<&Cursor>,
    ) -> Result<ContactPage, CrmError>;

    async fn add_tags(&self, contact_id: &str, tags: &[String]) -> Result<(), CrmError>;

    async fn list_custom_values(&self, location_id: &str) -> Result<Vec<CustomValue>, CrmError>;

    async fn update_custom_value(
        &self,
        location_id: &str,
        custom_value: &CustomValue,
        new_value: &str,
    ) -> Result<CustomValue, CrmError>;

    /// Finds or creates the contact owning `phone` and returns its id.
    async fn upsert_contact_by_phone(
        &self,
        location_id: &str,
        phone: &str,
    ) -> Result<String, CrmError>;

    async fn send_sms(&self, contact_id: &str, message: &str) -> Result<SentMessage, CrmError>;
}
