// This file is part of the product Campaign Launcher.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

mod common;

use actix_web::{http::StatusCode, test};
use serde_json::{Value, json};
use wiremock::matchers::{header, method, path, query_param, query_param_is_missing};
use wiremock::{Mock, ResponseTemplate};

fn contact(id: &str, first: &str, last: &str) -> Value {
    json!({
        "id": id,
        "firstName": first,
        "lastName": last,
        "email": format!("{}@example.com", id),
        "phone": null,
        "tags": null,
    })
}

#[actix_web::test]
async fn cursor_page_is_forwarded_with_next_link() {
    let harness = common::TestHarness::new().await;
    Mock::given(method("GET"))
        .and(path("/contacts/"))
        .and(query_param("locationId", "loc1"))
        .and(query_param("limit", "2"))
        .and(header("Authorization", "Bearer test-crm-key"))
        .and(header("Version", "2021-07-28"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "contacts": [contact("c1", "Ana", "Lee"), contact("c2", "Bo", "Kim")],
            "meta": {"total": 5, "startAfter": 1700000000000u64, "startAfterId": "c2"},
        })))
        .expect(1)
        .mount(&harness.upstream)
        .await;

    let app = test::init_service(common::build_test_app(harness.app_state.clone())).await;
    let req = test::TestRequest::get()
        .uri("/api/contacts?locationId=loc1&limit=2")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["contacts"].as_array().map(Vec::len), Some(2));
    assert_eq!(body["contacts"][0]["tags"], json!([]));
    assert_eq!(body["pagination"]["total"], json!(5));
    assert_eq!(body["pagination"]["hasMore"], json!(true));
    assert_eq!(body["pagination"]["startAfter"], json!("1700000000000"));
    assert_eq!(
        body["pagination"]["nextPageUrl"],
        json!("/api/contacts?locationId=loc1&limit=2&startAfter=1700000000000&startAfterId=c2")
    );
}

#[actix_web::test]
async fn incoming_cursor_is_passed_through_and_last_page_has_no_link() {
    let harness = common::TestHarness::new().await;
    Mock::given(method("GET"))
        .and(path("/contacts/"))
        .and(query_param("startAfter", "1700"))
        .and(query_param("startAfterId", "c2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "contacts": [contact("c3", "Cy", "Day")],
            "meta": {"total": 3},
        })))
        .expect(1)
        .mount(&harness.upstream)
        .await;

    let app = test::init_service(common::build_test_app(harness.app_state.clone())).await;
    let req = test::TestRequest::get()
        .uri("/api/contacts?locationId=loc1&startAfter=1700&startAfterId=c2")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["contacts"][0]["id"], json!("c3"));
    assert_eq!(body["pagination"]["nextPageUrl"], Value::Null);
    assert_eq!(body["pagination"]["hasMore"], json!(false));
}

#[actix_web::test]
async fn half_cursor_requests_first_page() {
    let harness = common::TestHarness::new().await;
    Mock::given(method("GET"))
        .and(path("/contacts/"))
        .and(query_param_is_missing("startAfter"))
        .and(query_param_is_missing("startAfterId"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "contacts": [contact("c1", "Ana", "Lee")],
        })))
        .expect(1)
        .mount(&harness.upstream)
        .await;

    let app = test::init_service(common::build_test_app(harness.app_state.clone())).await;
    let req = test::TestRequest::get()
        .uri("/api/contacts?locationId=loc1&startAfter=1700")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_web::test]
async fn search_scans_every_page_and_slices_locally() {
    let harness = common::TestHarness::new().await;
    Mock::given(method("GET"))
        .and(path("/contacts/"))
        .and(query_param_is_missing("startAfterId"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "contacts": [contact("c1", "Ana", "Lee"), contact("c2", "Bo", "Kim")],
            "meta": {"total": 3, "startAfter": 2, "startAfterId": "c2"},
        })))
        .expect(1)
        .mount(&harness.upstream)
        .await;
    Mock::given(method("GET"))
        .and(path("/contacts/"))
        .and(query_param("startAfterId", "c2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "contacts": [contact("c3", "Hannah", "Ng")],
            "meta": {"total": 3},
        })))
        .expect(1)
        .mount(&harness.upstream)
        .await;

    let app = test::init_service(common::build_test_app(harness.app_state.clone())).await;
    let req = test::TestRequest::get()
        .uri("/api/contacts?locationId=loc1&limit=1&search=ANN")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    let ids: Vec<&str> = body["contacts"]
        .as_array()
        .expect("contacts array")
        .iter()
        .filter_map(|contact| contact["id"].as_str())
        .collect();
    assert_eq!(ids, vec!["c3"]);
    assert_eq!(body["pagination"]["page"], json!(1));
    assert_eq!(body["pagination"]["total"], json!(1));
    assert_eq!(body["pagination"]["hasMore"], json!(false));
}

#[actix_web::test]
async fn location_falls_back_to_header() {
    let harness = common::TestHarness::new().await;
    Mock::given(method("GET"))
        .and(path("/contacts/"))
        .and(query_param("locationId", "hdr-loc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "contacts": [] })))
        .expect(1)
        .mount(&harness.upstream)
        .await;

    let app = test::init_service(common::build_test_app(harness.app_state.clone())).await;
    let req = test::TestRequest::get()
        .uri("/api/contacts")
        .insert_header(("X-Location-Id", "hdr-loc"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_web::test]
async fn missing_location_is_rejected() {
    let harness = common::TestHarness::new().await;
    let app = test::init_service(common::build_test_app(harness.app_state.clone())).await;

    let req = test::TestRequest::get().uri("/api/contacts").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], json!("validation_error"));
}

#[actix_web::test]
async fn zero_limit_is_rejected() {
    let harness = common::TestHarness::new().await;
    let app = test::init_service(common::build_test_app(harness.app_state.clone())).await;

    let req = test::TestRequest::get()
        .uri("/api/contacts?locationId=loc1&limit=0")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn missing_crm_credential_is_server_error() {
    let harness = common::TestHarness::with_options(common::HarnessOptions {
        crm_key: false,
        ..common::HarnessOptions::default()
    })
    .await;
    let app = test::init_service(common::build_test_app(harness.app_state.clone())).await;

    let req = test::TestRequest::get()
        .uri("/api/contacts?locationId=loc1")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], json!("missing_credentials"));
}

#[actix_web::test]
async fn upstream_error_status_is_propagated() {
    let harness = common::TestHarness::new().await;
    Mock::given(method("GET"))
        .and(path("/contacts/"))
        .respond_with(ResponseTemplate::new(401).set_body_string("token expired"))
        .mount(&harness.upstream)
        .await;

    let app = test::init_service(common::build_test_app(harness.app_state.clone())).await;
    let req = test::TestRequest::get()
        .uri("/api/contacts?locationId=loc1")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], json!("upstream_error"));
    assert_eq!(body["details"], json!("token expired"));
}
