mod common;

use common::{HARPETH_PWSID, InMemoryStore, NOLENSVILLE_PWSID, NOLENSVILLE_ZIP};

#[tokio::test]
async fn test_utilities_by_zip_lists_primary_first() {
    let server = common::create_test_server(&InMemoryStore::seeded());

    let response = server
        .get("/api/utilities")
        .add_query_param("zip", NOLENSVILLE_ZIP)
        .await;

    response.assert_status_ok();

    let json = response.json::<serde_json::Value>();
    assert_eq!(json["zip_code"], NOLENSVILLE_ZIP);

    let utilities = json["utilities"].as_array().unwrap();
    assert_eq!(utilities.len(), 2);
    assert_eq!(utilities[0]["pwsid"], NOLENSVILLE_PWSID);
    assert_eq!(utilities[0]["is_primary"], true);
    assert_eq!(utilities[1]["pwsid"], HARPETH_PWSID);
    assert_eq!(utilities[1]["is_primary"], false);
}

#[tokio::test]
async fn test_utilities_by_zip_unknown() {
    let server = common::create_test_server(&InMemoryStore::seeded());

    let response = server.get("/api/utilities").add_query_param("zip", "90210").await;

    response.assert_status_not_found();

    let json = response.json::<serde_json::Value>();
    assert_eq!(json["error"]["code"], "not_found");
    assert_eq!(json["error"]["details"]["zip_code"], "90210");
}

#[tokio::test]
async fn test_utilities_by_zip_invalid_format() {
    let server = common::create_test_server(&InMemoryStore::seeded());

    let response = server.get("/api/utilities").add_query_param("zip", "3713a").await;

    response.assert_status_bad_request();
}

#[tokio::test]
async fn test_utilities_by_zip_missing_param() {
    let server = common::create_test_server(&InMemoryStore::seeded());

    let response = server.get("/api/utilities").await;

    response.assert_status_bad_request();
}

#[tokio::test]
async fn test_get_utility() {
    let server = common::create_test_server(&InMemoryStore::seeded());

    let response = server.get(&format!("/api/utilities/{NOLENSVILLE_PWSID}")).await;

    response.assert_status_ok();

    let json = response.json::<serde_json::Value>();
    assert_eq!(json["utility_name"], "NOLENSVILLE-COLLEGE GROVE U.D.");
    assert_eq!(json["state"], "TN");
    assert!(json.get("is_primary").is_none());
}

#[tokio::test]
async fn test_get_utility_not_found() {
    let server = common::create_test_server(&InMemoryStore::seeded());

    let response = server.get("/api/utilities/TN0009999").await;

    response.assert_status_not_found();
}

#[tokio::test]
async fn test_get_utility_chlorine() {
    let server = common::create_test_server(&InMemoryStore::seeded());

    let response = server
        .get(&format!("/api/utilities/{NOLENSVILLE_PWSID}/chlorine"))
        .await;

    response.assert_status_ok();

    let json = response.json::<serde_json::Value>();
    assert_eq!(json["average_chlorine_ppm"], 1.63);
    assert_eq!(json["sample_count"], 12);
    assert_eq!(json["is_estimated"], false);
    assert_eq!(json["confidence"], 90);
}

#[tokio::test]
async fn test_get_utility_chlorine_missing() {
    let server = common::create_test_server(&InMemoryStore::seeded());

    let response = server
        .get(&format!("/api/utilities/{HARPETH_PWSID}/chlorine"))
        .await;

    response.assert_status_not_found();

    let json = response.json::<serde_json::Value>();
    assert_eq!(
        json["error"]["message"],
        "No chlorine data available for this utility"
    );
}
