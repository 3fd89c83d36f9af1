// This file is part of the product Campaign Launcher.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use log::{debug, warn};

use crate::crm::{Contact, ContactPage, ContactSource, CrmError, Cursor};

/// Fetches a single page. A half-filled cursor is treated as absent and the
/// first page is requested instead.
pub async fn fetch_page<S>(
    source: &S,
    location_id: &str,
    page_size: usize,
    cursor: Option<&Cursor>,
) -> Result<ContactPage, CrmError>
where
    S: ContactSource + ?Sized,
{
    let cursor = cursor.filter(|cursor| cursor.is_complete());
    let mut page = source.list_contacts(location_id, page_size, cursor).await?;
    page.next_cursor = page.next_cursor.filter(Cursor::is_complete);
    Ok(page)
}

/// Walks the listing until the CRM stops handing out cursors.
pub async fn fetch_all<S>(
    source: &S,
    location_id: &str,
    page_size: usize,
) -> Result<Vec<Contact>, CrmError>
where
    S: ContactSource + ?Sized,
{
    let mut contacts = Vec::new();
    let mut cursor: Option<Cursor> = None;
    let mut pages = 0usize;

    loop {
        let page = fetch_page(source, location_id, page_size, cursor.as_ref()).await?;
        pages += 1;
        if page.contacts.is_empty() {
            break;
        }
        contacts.extend(page.contacts);

        match page.next_cursor {
            Some(next) if cursor.as_ref() == Some(&next) => {
                warn!(
                    "Contact listing for {} returned an unchanged cursor after {} pages; stopping",
                    location_id, pages
                );
                break;
            }
            Some(next) => cursor = Some(next),
            None => break,
        }
    }

    debug!(
        "Fetched {} contacts for {} in {} pages",
        contacts.len(),
        location_id,
        pages
    );
    Ok(contacts)
}
