//! API integration tests
//!
//! These run against a live server with a clean database.

use reqwest::Client;
use serde_json::{json, Value};

const BASE_URL: &str = "http://localhost:8080/api/v1";

/// Create a tool and return its ID
async fn create_tool(client: &Client, name: &str, stock: i32) -> i64 {
    let response = client
        .post(format!("{}/tools", BASE_URL))
        .json(&json!({
            "name": name,
            "category": 0,
            "stock": stock
        }))
        .send()
        .await
        .expect("Failed to send create tool request");

    assert_eq!(response.status(), 201);

    let body: Value = response.json().await.expect("Failed to parse response");
    body["id"].as_i64().expect("No tool ID")
}

#[tokio::test]
#[ignore] // Run with: cargo test -- --ignored
async fn test_health_check() {
    let client = Client::new();

    let response = client
        .get(format!("{}/health", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
#[ignore]
async fn test_list_tools() {
    let client = Client::new();

    let response = client
        .get(format!("{}/tools", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["items"].is_array());
    assert!(body["total"].is_number());
}

#[tokio::test]
#[ignore]
async fn test_create_and_delete_tool() {
    let client = Client::new();
    let tool_id = create_tool(&client, "Test drill", 2).await;

    let response = client
        .delete(format!("{}/tools/{}", BASE_URL, tool_id))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 204);
}

#[tokio::test]
#[ignore]
async fn test_reservation_admission_and_rejection() {
    let client = Client::new();
    let tool_id = create_tool(&client, "Test circular saw", 1).await;

    // First booking takes the only unit
    let response = client
        .post(format!("{}/reservations", BASE_URL))
        .json(&json!({
            "tool_id": tool_id,
            "start_date": "2030-06-01",
            "end_date": "2030-06-05",
            "quantity": 1
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 201);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["admitted"], true);
    assert!(body["reservation"]["id"].is_number());

    // Overlapping booking must be rejected with a typed report, not an error
    let response = client
        .post(format!("{}/reservations", BASE_URL))
        .json(&json!({
            "tool_id": tool_id,
            "start_date": "2030-06-03",
            "end_date": "2030-06-08",
            "quantity": 1
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 422);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["admitted"], false);
    assert_eq!(body["availability"]["available_units"], 0);
    assert_eq!(
        body["availability"]["reason"],
        "Only 0 available for these dates"
    );

    // Disjoint dates go through
    let response = client
        .post(format!("{}/reservations", BASE_URL))
        .json(&json!({
            "tool_id": tool_id,
            "start_date": "2030-06-06",
            "end_date": "2030-06-08",
            "quantity": 1
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 201);
}

#[tokio::test]
#[ignore]
async fn test_availability_check_endpoint() {
    let client = Client::new();
    let tool_id = create_tool(&client, "Test sander", 3).await;

    let response = client
        .get(format!(
            "{}/tools/{}/availability?start_date=2030-07-01&end_date=2030-07-05&quantity=2",
            BASE_URL, tool_id
        ))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["available"], true);
    assert_eq!(body["available_units"], 3);
    assert_eq!(body["total_stock"], 3);
    assert_eq!(body["reserved_units"], 0);
}

#[tokio::test]
#[ignore]
async fn test_inverted_date_range_rejected() {
    let client = Client::new();
    let tool_id = create_tool(&client, "Test jigsaw", 1).await;

    let response = client
        .get(format!(
            "{}/tools/{}/availability?start_date=2030-07-05&end_date=2030-07-01",
            BASE_URL, tool_id
        ))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 400);
}

#[tokio::test]
#[ignore]
async fn test_batch_is_all_or_nothing() {
    let client = Client::new();
    let tool_id = create_tool(&client, "Test generator", 1).await;

    // Second line overlaps the first for the same single-unit tool
    let response = client
        .post(format!("{}/reservations/batch", BASE_URL))
        .json(&json!({
            "reservations": [
                {
                    "tool_id": tool_id,
                    "start_date": "2030-08-01",
                    "end_date": "2030-08-05"
                },
                {
                    "tool_id": tool_id,
                    "start_date": "2030-08-03",
                    "end_date": "2030-08-07"
                }
            ]
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 422);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["admitted"], false);
    assert_eq!(body["reservations"].as_array().unwrap().len(), 0);
    assert_eq!(body["lines"].as_array().unwrap().len(), 2);

    // Nothing was written
    let response = client
        .get(format!("{}/reservations?tool_id={}", BASE_URL, tool_id))
        .send()
        .await
        .expect("Failed to send request");
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["total"], 0);
}

#[tokio::test]
#[ignore]
async fn test_lifecycle_transitions() {
    let client = Client::new();
    let tool_id = create_tool(&client, "Test pressure washer", 1).await;

    let response = client
        .post(format!("{}/reservations", BASE_URL))
        .json(&json!({
            "tool_id": tool_id,
            "start_date": "2030-09-01",
            "end_date": "2030-09-03"
        }))
        .send()
        .await
        .expect("Failed to send request");
    let body: Value = response.json().await.expect("Failed to parse response");
    let reservation_id = body["reservation"]["id"].as_i64().expect("No reservation ID");

    // active -> delivered -> returned
    let response = client
        .post(format!("{}/reservations/{}/deliver", BASE_URL, reservation_id))
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());

    let response = client
        .post(format!("{}/reservations/{}/return", BASE_URL, reservation_id))
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], 3);

    // Returned reservations cannot be delivered again
    let response = client
        .post(format!("{}/reservations/{}/deliver", BASE_URL, reservation_id))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 422);
}

#[tokio::test]
#[ignore]
async fn test_archive_and_restore() {
    let client = Client::new();
    let tool_id = create_tool(&client, "Test tile cutter", 1).await;

    let response = client
        .post(format!("{}/reservations", BASE_URL))
        .json(&json!({
            "tool_id": tool_id,
            "start_date": "2030-10-01",
            "end_date": "2030-10-03"
        }))
        .send()
        .await
        .expect("Failed to send request");
    let body: Value = response.json().await.expect("Failed to parse response");
    let reservation_id = body["reservation"]["id"].as_i64().expect("No reservation ID");

    // Archiving frees the unit for the same dates
    let response = client
        .post(format!("{}/reservations/{}/archive", BASE_URL, reservation_id))
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());

    let response = client
        .get(format!(
            "{}/tools/{}/availability?start_date=2030-10-01&end_date=2030-10-03",
            BASE_URL, tool_id
        ))
        .send()
        .await
        .expect("Failed to send request");
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["available_units"], 1);

    // Restore brings back the prior status and the block
    let response = client
        .post(format!("{}/reservations/{}/restore", BASE_URL, reservation_id))
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], 0);

    let response = client
        .get(format!(
            "{}/tools/{}/availability?start_date=2030-10-01&end_date=2030-10-03",
            BASE_URL, tool_id
        ))
        .send()
        .await
        .expect("Failed to send request");
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["available_units"], 0);
}

#[tokio::test]
#[ignore]
async fn test_date_grid() {
    let client = Client::new();
    create_tool(&client, "Test scaffold", 4).await;

    let response = client
        .get(format!("{}/availability/date/2030-11-01", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    let grid = body.as_array().expect("Grid is not an array");
    assert!(!grid.is_empty());
    for entry in grid {
        assert!(entry["tool_id"].is_number());
        assert!(entry["units_available"].is_number());
        assert!(entry["any_unit_blocked"].is_boolean());
    }
}

#[tokio::test]
#[ignore]
async fn test_stats() {
    let client = Client::new();

    let response = client
        .get(format!("{}/stats", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["tools"]["total"].is_number());
    assert!(body["reservations"]["active"].is_number());
    assert!(body["reservations"]["overdue"].is_number());
}
