// This file is part of the product Campaign Launcher.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use log::info;

use crate::crm::{ContactSource, CrmError, SentMessage};

/// Sends a one-off preview of the campaign SMS to `phone`.
///
/// The CRM only messages known contacts, so the phone is upserted first.
pub async fn send_test_sms<S>(
    source: &S,
    phone: &str,
    message: &str,
    location_id: &str,
) -> Result<SentMessage, CrmError>
where
    S: ContactSource + ?Sized,
{
    let contact_id = source.upsert_contact_by_phone(location_id, phone).await?;
    let sent = source.send_sms(&contact_id, message).await?;
    info!(
        "Test SMS sent to contact {} (message {})",
        sent.contact_id,
        sent.message_id.as_deref().unwrap_or("-")
    );
    Ok(sent)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crm::fake::FakeSource;

    #[tokio::test]
    async fn upserts_then_sends() {
        let source = FakeSource::new();
        let sent = send_test_sms(&source, "+15550001", "Hello", "loc1")
            .await
            .expect("send");
        assert_eq!(sent.contact_id, "contact-+15550001");
        assert_eq!(sent.message_id.as_deref(), Some("m1"));
        assert_eq!(sent.conversation_id.as_deref(), Some("conv1"));
    }

    #[tokio::test]
    async fn upsert_failure_stops_before_sending() {
        let source = FakeSource::new().fail("+15550002");
        let err = send_test_sms(&source, "+15550002", "Hello", "loc1")
            .await
            .expect_err("upsert rejected");
        assert_eq!(
            err,
            CrmError::Upstream {
                status: 422,
                body: "invalid phone".to_string()
            }
        );
    }
}
