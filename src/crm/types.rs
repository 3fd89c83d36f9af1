// This file is part of the product Campaign Launcher.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    pub id: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "nullable_vec")]
    pub tags: Vec<String>,
    #[serde(default, deserialize_with = "nullable_vec")]
    pub custom_fields: Vec<CustomFieldEntry>,
}

impl Contact {
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|existing| existing == tag)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct CustomFieldEntry {
    pub id: String,
    // The CRM stores strings, numbers and option lists in the same slot.
    #[serde(default)]
    pub value: Value,
}

/// Opaque continuation token pair issued by the CRM contact listing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Cursor {
    #[serde(default, deserialize_with = "token")]
    pub start_after: Option<String>,
    #[serde(default, deserialize_with = "token")]
    pub start_after_id: Option<String>,
}

impl Cursor {
    pub fn new(start_after: impl Into<String>, start_after_id: impl Into<String>) -> Self {
        Self {
            start_after: Some(start_after.into()),
            start_after_id: Some(start_after_id.into()),
        }
    }

    /// Both tokens must be non-empty for the cursor to address a next page.
    pub fn is_complete(&self) -> bool {
        let filled = |value: &Option<String>| value.as_deref().is_some_and(|v| !v.is_empty());
        filled(&self.start_after) && filled(&self.start_after_id)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContactPage {
    pub contacts: Vec<Contact>,
    pub next_cursor: Option<Cursor>,
    pub total: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct CustomValue {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub value: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SentMessage {
    pub contact_id: String,
    pub message_id: Option<String>,
    pub conversation_id: Option<String>,
}

// Wire envelopes returned by the CRM.

#[derive(Debug, Deserialize)]
pub(crate) struct ContactListEnvelope {
    #[serde(default, deserialize_with = "nullable_vec")]
    pub contacts: Vec<Contact>,
    #[serde(default)]
    pub meta: Option<ContactListMeta>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ContactListMeta {
    #[serde(default)]
    pub total: Option<u64>,
    #[serde(default, deserialize_with = "token")]
    pub start_after: Option<String>,
    #[serde(default, deserialize_with = "token")]
    pub start_after_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CustomValueListEnvelope {
    #[serde(default, deserialize_with = "nullable_vec")]
    pub custom_values: Vec<CustomValue>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CustomValueEnvelope {
    pub custom_value: CustomValue,
}

#[derive(Debug, Deserialize)]
pub(crate) struct UpsertContactEnvelope {
    pub contact: UpsertedContact,
}

#[derive(Debug, Deserialize)]
pub(crate) struct UpsertedContact {
    pub id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SendMessageEnvelope {
    #[serde(default)]
    pub message_id: Option<String>,
    #[serde(default)]
    pub conversation_id: Option<String>,
}

fn nullable_vec<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

// startAfter arrives as a millisecond timestamp, startAfterId as a string.
fn token<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    struct TokenVisitor;

    impl<'de> Visitor<'de> for TokenVisitor {
        type Value = Option<String>;

        fn expecting(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            formatter.write_str("a string or number token")
        }

        fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Some(value.to_string()))
        }

        fn visit_string<E>(self, value: String) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Some(value))
        }

        fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Some(value.to_string()))
        }

        fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Some(value.to_string()))
        }

        fn visit_f64<E>(self, value: f64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Some(format!("{}", value as i64)))
        }

        fn visit_none<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(None)
        }

        fn visit_unit<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(None)
        }

        fn visit_some<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
        where
            D: Deserializer<'de>,
        {
            deserializer.deserialize_any(TokenVisitor)
        }
    }

    deserializer.deserialize_option(TokenVisitor)
}
