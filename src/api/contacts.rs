// This file is part of the product Campaign Launcher.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use actix_web::{HttpRequest, HttpResponse, web};
use serde::{Deserialize, Serialize};

use super::non_blank;
use crate::app_state::AppState;
use crate::contacts::{ContactListing, ContactQuery, MAX_PAGE_SIZE, list_contacts};
use crate::crm::{Contact, Cursor};
use crate::error::ApiError;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactsParams {
    limit: Option<usize>,
    start_after: Option<String>,
    start_after_id: Option<String>,
    search: Option<String>,
    tag: Option<String>,
    page: Option<usize>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Pagination {
    next_page_url: Option<String>,
    total: u64,
    has_more: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    start_after: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    start_after_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    page: Option<usize>,
}

#[derive(Debug, Serialize)]
struct ContactsResponse {
    contacts: Vec<Contact>,
    pagination: Pagination,
}

pub async fn get_contacts(
    req: HttpRequest,
    state: web::Data<AppState>,
    params: web::Query<ContactsParams>,
) -> Result<HttpResponse, ApiError> {
    let params = params.into_inner();
    let source = state.contact_source()?;
    let location_id = state
        .location_for(&req, None)
        .ok_or_else(|| ApiError::Validation("locationId is required".to_string()))?;

    let page_size = match params.limit {
        Some(0) => {
            return Err(ApiError::Validation(
                "limit must be a positive integer".to_string(),
            ));
        }
        Some(limit) => limit.min(MAX_PAGE_SIZE),
        None => state.config.crm.page_size,
    };

    let query = ContactQuery {
        location_id,
        page_size,
        cursor: Some(Cursor {
            start_after: non_blank(params.start_after),
            start_after_id: non_blank(params.start_after_id),
        }),
        search: non_blank(params.search),
        tag: non_blank(params.tag),
        page: params.page.unwrap_or(1).max(1),
    };

    let listing = list_contacts(source, &query).await?;
    Ok(HttpResponse::Ok()
        .insert_header(("Cache-Control", "no-store"))
        .json(build_response(listing, &query)))
}

fn build_response(listing: ContactListing, query: &ContactQuery) -> ContactsResponse {
    match listing {
        ContactListing::Cursor {
            contacts,
            next_cursor,
            total,
        } => {
            let total = total.unwrap_or(contacts.len() as u64);
            let next_page_url = next_cursor.as_ref().map(|cursor| {
                format!(
                    "{}&startAfter={}&startAfterId={}",
                    base_url(query),
                    encode(cursor.start_after.as_deref()),
                    encode(cursor.start_after_id.as_deref())
                )
            });
            let (start_after, start_after_id) = next_cursor
                .map(|cursor| (cursor.start_after, cursor.start_after_id))
                .unwrap_or_default();
            ContactsResponse {
                contacts,
                pagination: Pagination {
                    next_page_url,
                    total,
                    has_more: start_after.is_some(),
                    start_after,
                    start_after_id,
                    page: None,
                },
            }
        }
        ContactListing::Search(slice) => {
            let mut next_page_url = None;
            if slice.has_more {
                let mut url = base_url(query);
                if let Some(search) = &query.search {
                    url.push_str(&format!("&search={}", urlencoding::encode(search)));
                }
                if let Some(tag) = &query.tag {
                    url.push_str(&format!("&tag={}", urlencoding::encode(tag)));
                }
                url.push_str(&format!("&page={}", slice.page + 1));
                next_page_url = Some(url);
            }
            ContactsResponse {
                contacts: slice.items,
                pagination: Pagination {
                    next_page_url,
                    total: slice.total as u64,
                    has_more: slice.has_more,
                    start_after: None,
                    start_after_id: None,
                    page: Some(slice.page),
                },
            }
        }
    }
}

fn base_url(query: &ContactQuery) -> String {
    format!(
        "/api/contacts?locationId={}&limit={}",
        urlencoding::encode(&query.location_id),
        query.page_size
    )
}

fn encode(value: Option<&str>) -> String {
    urlencoding::encode(value.unwrap_or_default()).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contacts::PageSlice;

    fn query() -> ContactQuery {
        ContactQuery {
            location_id: "loc 1".to_string(),
            page_size: 2,
            page: 1,
            ..ContactQuery::default()
        }
    }

    #[test]
    fn cursor_listing_links_to_next_page() {
        let response = build_response(
            ContactListing::Cursor {
                contacts: Vec::new(),
                next_cursor: Some(Cursor::new("1700", "c2")),
                total: Some(9),
            },
            &query(),
        );
        assert_eq!(
            response.pagination.next_page_url.as_deref(),
            Some("/api/contacts?locationId=loc%201&limit=2&startAfter=1700&startAfterId=c2")
        );
        assert!(response.pagination.has_more);
        assert_eq!(response.pagination.total, 9);
    }

    #[test]
    fn search_listing_links_by_page_number() {
        let mut query = query();
        query.search = Some("ana b".to_string());
        let response = build_response(
            ContactListing::Search(PageSlice {
                items: Vec::new(),
                total: 5,
                has_more: true,
                page: 1,
            }),
            &query,
        );
        assert_eq!(
            response.pagination.next_page_url.as_deref(),
            Some("/api/contacts?locationId=loc%201&limit=2&search=ana%20b&page=2")
        );
        assert_eq!(response.pagination.page, Some(1));
    }

    #[test]
    fn last_cursor_page_has_no_link() {
        let response = build_response(
            ContactListing::Cursor {
                contacts: Vec::new(),
                next_cursor: None,
                total: None,
            },
            &query(),
        );
        assert!(response.pagination.next_page_url.is_none());
        assert!(!response.pagination.has_more);
        assert_eq!(response.pagination.total, 0);
    }
}
