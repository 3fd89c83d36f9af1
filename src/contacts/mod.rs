// This file is part of the product Campaign Launcher.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

pub mod filter;
pub mod pager;

pub use filter::{PageSlice, filter_contacts, paginate};
pub use pager::{fetch_all, fetch_page};

use crate::crm::{Contact, ContactSource, CrmError, Cursor};

/// Largest page the CRM hands out in one listing call.
pub const MAX_PAGE_SIZE: usize = 100;

/// A contact listing request after validation.
#[derive(Debug, Clone, Default)]
pub struct ContactQuery {
    pub location_id: String,
    pub page_size: usize,
    pub cursor: Option<Cursor>,
    pub search: Option<String>,
    pub tag: Option<String>,
    pub page: usize,
}

impl ContactQuery {
    /// The CRM has no text search, so a term or tag forces a full scan.
    pub fn is_full_scan(&self) -> bool {
        let present = |value: &Option<String>| value.as_deref().is_some_and(|v| !v.trim().is_empty());
        present(&self.search) || present(&self.tag)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ContactListing {
    Cursor {
        contacts: Vec<Contact>,
        next_cursor: Option<Cursor>,
        total: Option<u64>,
    },
    Search(PageSlice<Contact>),
}

pub async fn list_contacts<S>(source: &S, query: &ContactQuery) -> Result<ContactListing, CrmError>
where
    S: ContactSource + ?Sized,
{
    if query.is_full_scan() {
        // `page_size` only shapes the returned slice; the scan always uses full pages.
        let all = fetch_all(source, &query.location_id, MAX_PAGE_SIZE).await?;
        let matching = filter_contacts(&all, query.search.as_deref(), query.tag.as_deref());
        log::debug!(
            "Search {:?} tag {:?} matched {} of {} contacts",
            query.search,
            query.tag,
            matching.len(),
            all.len()
        );
        return Ok(ContactListing::Search(paginate(
            &matching,
            query.page,
            query.page_size,
        )));
    }

    let page = fetch_page(
        source,
        &query.location_id,
        query.page_size,
        query.cursor.as_ref(),
    )
    .await?;
    Ok(ContactListing::Cursor {
        contacts: page.contacts,
        next_cursor: page.next_cursor,
        total: page.total,
    })
}
