// This file is part of the product Campaign Launcher.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use crate::crm::Contact;

#[derive(Debug, Clone, PartialEq)]
pub struct PageSlice<T> {
    pub items: Vec<T>,
    pub total: usize,
    pub has_more: bool,
    pub page: usize,
}

/// Keeps contacts matching `term` (case-insensitive substring of first name,
/// last name, email or phone) and carrying `tag` exactly. Blank arguments are ignored.
pub fn filter_contacts(contacts: &[Contact], term: Option<&str>, tag: Option<&str>) -> Vec<Contact> {
    let term = term
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_lowercase);
    let tag = tag.map(str::trim).filter(|value| !value.is_empty());

    contacts
        .iter()
        .filter(|contact| term.as_deref().is_none_or(|term| matches_term(contact, term)))
        .filter(|contact| tag.is_none_or(|tag| contact.has_tag(tag)))
        .cloned()
        .collect()
}

fn matches_term(contact: &Contact, term: &str) -> bool {
    [
        &contact.first_name,
        &contact.last_name,
        &contact.email,
        &contact.phone,
    ]
    .into_iter()
    .filter_map(|field| field.as_deref())
    .any(|field| field.to_lowercase().contains(term))
}

/// One-based offset pagination; pages below 1 are clamped.
pub fn paginate<T: Clone>(items: &[T], page: usize, page_size: usize) -> PageSlice<T> {
    let page = page.max(1);
    let total = items.len();
    let offset = (page - 1).saturating_mul(page_size);
    let end = offset.saturating_add(page_size).min(total);
    let slice = if offset < total {
        items[offset..end].to_vec()
    } else {
        Vec::new()
    };

    PageSlice {
        items: slice,
        total,
        has_more: offset.saturating_add(page_size) < total,
        page,
    }
}
