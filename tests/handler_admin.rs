mod common;

use axum_test::TestServer;
use common::{HARPETH_PWSID, InMemoryStore, NOLENSVILLE_PWSID, NOLENSVILLE_ZIP};
use serde_json::json;
use std::sync::Arc;

async fn authorized_server(store: &Arc<InMemoryStore>) -> (TestServer, String) {
    let state = common::create_test_state(store);
    let token = common::issue_token(&state, "test-admin").await;
    let server = TestServer::new(common::create_test_app(state)).unwrap();
    (server, token)
}

#[tokio::test]
async fn test_admin_requires_token() {
    let server = common::create_test_server(&InMemoryStore::seeded());

    let response = server.get("/api/admin/audit").await;

    response.assert_status_unauthorized();

    let json = response.json::<serde_json::Value>();
    assert_eq!(json["error"]["code"], "unauthorized");
}

#[tokio::test]
async fn test_admin_rejects_unknown_token() {
    let (server, _token) = authorized_server(&InMemoryStore::seeded()).await;

    let response = server
        .get("/api/admin/audit")
        .authorization_bearer("not-a-real-token")
        .await;

    response.assert_status_unauthorized();
}

#[tokio::test]
async fn test_admin_rejects_revoked_token() {
    let store = InMemoryStore::seeded();
    let state = common::create_test_state(&store);
    let token = common::issue_token(&state, "revoked").await;
    state.auth_service.revoke("revoked").await.unwrap();
    let server = TestServer::new(common::create_test_app(state)).unwrap();

    let response = server.get("/api/admin/audit").authorization_bearer(&token).await;

    response.assert_status_unauthorized();
}

#[tokio::test]
async fn test_audit_report() {
    let (server, token) = authorized_server(&InMemoryStore::seeded()).await;

    let response = server.get("/api/admin/audit").authorization_bearer(&token).await;

    response.assert_status_ok();

    let json = response.json::<serde_json::Value>();
    assert_eq!(json["stale_after_days"], 180);
    assert_eq!(json["summary"]["total_utilities"], 2);
    assert_eq!(json["summary"]["recent"], 1);
    assert_eq!(json["summary"]["missing"], 1);

    let statuses: Vec<_> = json["utilities"]
        .as_array()
        .unwrap()
        .iter()
        .map(|u| (u["pwsid"].as_str().unwrap(), u["status"].as_str().unwrap()))
        .collect();
    assert!(statuses.contains(&(NOLENSVILLE_PWSID, "recent")));
    assert!(statuses.contains(&(HARPETH_PWSID, "missing")));
}

#[tokio::test]
async fn test_audit_custom_window_marks_data_outdated() {
    let (server, token) = authorized_server(&InMemoryStore::seeded()).await;

    let response = server
        .get("/api/admin/audit")
        .add_query_param("stale_after_days", 7)
        .authorization_bearer(&token)
        .await;

    response.assert_status_ok();

    let json = response.json::<serde_json::Value>();
    assert_eq!(json["summary"]["outdated"], 1);
    assert_eq!(json["summary"]["recent"], 0);
}

#[tokio::test]
async fn test_upsert_keeps_higher_confidence_data() {
    let store = InMemoryStore::seeded();
    let (server, token) = authorized_server(&store).await;

    let response = server
        .put("/api/admin/records")
        .authorization_bearer(&token)
        .json(&json!({
            "table": "chlorine_data",
            "pwsid": NOLENSVILLE_PWSID,
            "average_chlorine_ppm": 0.8,
            "last_updated": "2025-06-30",
            "data_source": "Automated extraction"
        }))
        .await;

    response.assert_status(axum::http::StatusCode::CONFLICT);

    let json = response.json::<serde_json::Value>();
    assert_eq!(json["error"]["code"], "conflict");
    assert_eq!(store.chlorine(NOLENSVILLE_PWSID).unwrap().average_chlorine_ppm, 1.63);
}

#[tokio::test]
async fn test_upsert_force_overwrites() {
    let store = InMemoryStore::seeded();
    let (server, token) = authorized_server(&store).await;

    let response = server
        .put("/api/admin/records")
        .add_query_param("force", true)
        .authorization_bearer(&token)
        .json(&json!({
            "table": "chlorine_data",
            "pwsid": NOLENSVILLE_PWSID,
            "average_chlorine_ppm": 0.8,
            "sample_count": 12,
            "last_updated": "2025-06-30",
            "data_source": "2025 Consumer Confidence Report"
        }))
        .await;

    response.assert_status_ok();

    let json = response.json::<serde_json::Value>();
    assert_eq!(json["record"]["table"], "chlorine_data");
    assert_eq!(json["record"]["average_chlorine_ppm"], 0.8);
    assert_eq!(json["quality"]["confidence"], 100);
    assert_eq!(json["replacement"]["should_replace"], false);

    let stored = store.chlorine(NOLENSVILLE_PWSID).unwrap();
    assert_eq!(stored.average_chlorine_ppm, 0.8);
    assert_eq!(stored.confidence, Some(100));
}

#[tokio::test]
async fn test_upsert_new_chlorine_record() {
    let store = InMemoryStore::seeded();
    let (server, token) = authorized_server(&store).await;

    let response = server
        .put("/api/admin/records")
        .authorization_bearer(&token)
        .json(&json!({
            "table": "chlorine_data",
            "pwsid": HARPETH_PWSID,
            "average_chlorine_ppm": 0.9,
            "last_updated": "2025-06-30",
            "data_source": "2025 Consumer Confidence Report"
        }))
        .await;

    response.assert_status_ok();

    let json = response.json::<serde_json::Value>();
    assert!(json.get("replacement").is_none());
    assert!(store.chlorine(HARPETH_PWSID).is_some());
}

#[tokio::test]
async fn test_upsert_rejects_invalid_chlorine() {
    let (server, token) = authorized_server(&InMemoryStore::seeded()).await;

    let response = server
        .put("/api/admin/records")
        .authorization_bearer(&token)
        .json(&json!({
            "table": "chlorine_data",
            "pwsid": HARPETH_PWSID,
            "average_chlorine_ppm": 1.0,
            "min_chlorine_ppm": 1.5,
            "last_updated": "2025-06-30",
            "data_source": "2025 Consumer Confidence Report"
        }))
        .await;

    response.assert_status_bad_request();
}

#[tokio::test]
async fn test_upsert_utility_and_zip_mapping() {
    let store = InMemoryStore::seeded();
    let (server, token) = authorized_server(&store).await;

    let response = server
        .put("/api/admin/records")
        .authorization_bearer(&token)
        .json(&json!({
            "table": "water_utilities",
            "pwsid": "TN0000246",
            "utility_name": "FRANKLIN WATER DEPT",
            "city": "Franklin",
            "state": "tn",
            "population_served": 60000
        }))
        .await;

    response.assert_status_ok();
    let json = response.json::<serde_json::Value>();
    assert_eq!(json["record"]["table"], "water_utilities");
    assert_eq!(json["record"]["state"], "TN");
    assert_eq!(json["record"]["utility_type"], "Community water system");

    let response = server
        .put("/api/admin/records")
        .authorization_bearer(&token)
        .json(&json!({
            "table": "zip_code_mapping",
            "zip_code": "37064",
            "pwsid": "TN0000246",
            "is_primary": true
        }))
        .await;

    response.assert_status_ok();

    let response = server.get("/api/utilities").add_query_param("zip", "37064").await;
    response.assert_status_ok();
    let json = response.json::<serde_json::Value>();
    assert_eq!(json["utilities"][0]["pwsid"], "TN0000246");
}

#[tokio::test]
async fn test_upsert_rejects_malformed_zip_mapping() {
    let (server, token) = authorized_server(&InMemoryStore::seeded()).await;

    let response = server
        .put("/api/admin/records")
        .authorization_bearer(&token)
        .json(&json!({
            "table": "zip_code_mapping",
            "zip_code": "ABCDE",
            "pwsid": NOLENSVILLE_PWSID
        }))
        .await;

    response.assert_status_bad_request();
}

#[tokio::test]
async fn test_delete_zip_mapping() {
    let store = InMemoryStore::seeded();
    let (server, token) = authorized_server(&store).await;

    let response = server
        .delete("/api/admin/records")
        .authorization_bearer(&token)
        .json(&json!({
            "table": "zip_code_mapping",
            "zip_code": NOLENSVILLE_ZIP,
            "pwsid": HARPETH_PWSID
        }))
        .await;

    response.assert_status_ok();

    let json = response.json::<serde_json::Value>();
    assert_eq!(json["deleted"], 1);
    assert_eq!(json["key"], "zip_code_mapping[37135 -> TN0000700]");

    let response = server
        .get("/api/utilities")
        .add_query_param("zip", NOLENSVILLE_ZIP)
        .await;
    let json = response.json::<serde_json::Value>();
    assert_eq!(json["utilities"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_delete_missing_record() {
    let (server, token) = authorized_server(&InMemoryStore::seeded()).await;

    let response = server
        .delete("/api/admin/records")
        .authorization_bearer(&token)
        .json(&json!({ "table": "chlorine_data", "pwsid": HARPETH_PWSID }))
        .await;

    response.assert_status_not_found();
}

#[tokio::test]
async fn test_cleanup_estimated_chlorine() {
    let store = InMemoryStore::seeded();
    let mut estimated = common::nolensville_chlorine();
    estimated.pwsid = HARPETH_PWSID.to_string();
    estimated.data_source = "Estimated from regional average".to_string();
    store.insert_chlorine(estimated);

    let (server, token) = authorized_server(&store).await;

    let response = server
        .delete("/api/admin/chlorine/estimated")
        .authorization_bearer(&token)
        .await;

    response.assert_status_ok();

    let json = response.json::<serde_json::Value>();
    assert_eq!(json["deleted"], 1);
    assert_eq!(json["pwsids"], json!([HARPETH_PWSID]));
    assert!(store.chlorine(HARPETH_PWSID).is_none());
    assert!(store.chlorine(NOLENSVILLE_PWSID).is_some());
}

#[tokio::test]
async fn test_validate_chlorine_does_not_store() {
    let store = InMemoryStore::seeded();
    let (server, token) = authorized_server(&store).await;

    let response = server
        .post("/api/admin/chlorine/validate")
        .authorization_bearer(&token)
        .json(&json!({
            "pwsid": HARPETH_PWSID,
            "average_chlorine_ppm": 0.8,
            "sample_count": 2,
            "last_updated": "2025-06-30",
            "data_source": "2025 Consumer Confidence Report",
            "source_url": "https://www.michigan.gov/ccr.pdf"
        }))
        .await;

    response.assert_status_ok();

    let json = response.json::<serde_json::Value>();
    assert_eq!(json["is_valid"], true);
    assert!(json["confidence"].as_i64().unwrap() < 100);
    assert!(!json["warnings"].as_array().unwrap().is_empty());
    assert!(store.chlorine(HARPETH_PWSID).is_none());
}
