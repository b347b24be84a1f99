//! API integration tests
//!
//! These run against a provisioned server (`cargo run` with a database that
//! has the Alcove tables and seeded users: id 1 is an admin, id 2 a member).

use chrono::Utc;
use reqwest::Client;
use serde_json::{json, Value};

use alcove_server::models::{enums::Role, user::UserClaims};

const BASE_URL: &str = "http://localhost:8080/api/v1";

const ADMIN_USER_ID: i32 = 1;
const MEMBER_USER_ID: i32 = 2;

/// Mint a bearer token the way the auth gateway would
fn make_token(user_id: i32, role: Role) -> String {
    let secret = std::env::var("JWT_SECRET")
        .unwrap_or_else(|_| "change-this-secret-in-production".to_string());
    let now = Utc::now().timestamp();
    UserClaims {
        sub: format!("user-{}", user_id),
        user_id,
        role,
        exp: now + 3600,
        iat: now,
    }
    .create_token(&secret)
    .expect("Failed to create token")
}

fn admin_token() -> String {
    make_token(ADMIN_USER_ID, Role::Admin)
}

fn member_token() -> String {
    make_token(MEMBER_USER_ID, Role::Member)
}

/// Create a room and return its ID
async fn create_room(client: &Client, token: &str, name: &str) -> i64 {
    let response = client
        .post(format!("{}/rooms", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({ "name": name, "capacity": 8 }))
        .send()
        .await
        .expect("Failed to send create room request");

    assert_eq!(response.status(), 201);
    let body: Value = response.json().await.expect("Failed to parse room response");
    body["id"].as_i64().expect("No room ID")
}

/// Submit a booking request for a room
async fn create_booking(
    client: &Client,
    token: &str,
    room_id: i64,
    date: &str,
    start: &str,
    end: &str,
) -> reqwest::Response {
    client
        .post(format!("{}/bookings", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({
            "resource_kind": "room",
            "resource_id": room_id,
            "booking_date": date,
            "start_time": start,
            "end_time": end
        }))
        .send()
        .await
        .expect("Failed to send create booking request")
}

async fn approve_booking(client: &Client, token: &str, booking_id: i64) -> reqwest::Response {
    client
        .post(format!("{}/bookings/{}/approve", BASE_URL, booking_id))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send approve request")
}

async fn booking_status(client: &Client, token: &str, booking_id: i64) -> String {
    let response = client
        .get(format!("{}/bookings/{}", BASE_URL, booking_id))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send get booking request");
    assert!(response.status().is_success());
    let body: Value = response.json().await.expect("Failed to parse booking response");
    body["status"].as_str().expect("No status").to_string()
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
async fn test_unauthorized_access() {
    let client = Client::new();

    let response = client
        .get(format!("{}/rooms", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 401);
}

#[tokio::test]
#[ignore]
async fn test_member_cannot_create_room() {
    let client = Client::new();

    let response = client
        .post(format!("{}/rooms", BASE_URL))
        .header("Authorization", format!("Bearer {}", member_token()))
        .json(&json!({ "name": "Forbidden Room" }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 403);
}

#[tokio::test]
#[ignore]
async fn test_create_and_delete_room() {
    let client = Client::new();
    let token = admin_token();

    let room_id = create_room(&client, &token, "Test Room (create/delete)").await;

    let response = client
        .delete(format!("{}/rooms/{}", BASE_URL, room_id))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 204);
}

#[tokio::test]
#[ignore]
async fn test_invalid_interval_rejected() {
    let client = Client::new();
    let admin = admin_token();
    let room_id = create_room(&client, &admin, "Test Room (intervals)").await;

    // end before start
    let response =
        create_booking(&client, &member_token(), room_id, "2024-06-01", "11:00", "10:00").await;
    assert_eq!(response.status(), 400);

    // empty interval
    let response =
        create_booking(&client, &member_token(), room_id, "2024-06-01", "10:00", "10:00").await;
    assert_eq!(response.status(), 400);
}

/// Creation fails closed against approved bookings
#[tokio::test]
#[ignore]
async fn test_create_conflicts_with_approved() {
    let client = Client::new();
    let admin = admin_token();
    let member = member_token();
    let room_id = create_room(&client, &admin, "Test Room (create conflict)").await;

    let response = create_booking(&client, &member, room_id, "2024-06-01", "10:00", "11:00").await;
    assert_eq!(response.status(), 201);
    let body: Value = response.json().await.expect("Failed to parse response");
    let a_id = body["id"].as_i64().expect("No booking ID");

    let response = approve_booking(&client, &admin, a_id).await;
    assert!(response.status().is_success());

    // Fully contained in A -> rejected at creation, nothing persisted
    let response = create_booking(&client, &member, room_id, "2024-06-01", "10:30", "10:45").await;
    assert_eq!(response.status(), 409);

    // Touching boundary -> no overlap, accepted
    let response = create_booking(&client, &member, room_id, "2024-06-01", "11:00", "12:00").await;
    assert_eq!(response.status(), 201);
}

/// Approval re-checks: two overlapping pending requests cannot both be
/// approved.
#[tokio::test]
#[ignore]
async fn test_approval_recheck_detects_conflict() {
    let client = Client::new();
    let admin = admin_token();
    let member = member_token();
    let room_id = create_room(&client, &admin, "Test Room (approval recheck)").await;

    // Both created while nothing is approved yet
    let response = create_booking(&client, &member, room_id, "2024-06-01", "10:00", "11:00").await;
    assert_eq!(response.status(), 201);
    let body: Value = response.json().await.expect("Failed to parse response");
    let a_id = body["id"].as_i64().expect("No booking ID");

    let response = create_booking(&client, &member, room_id, "2024-06-01", "10:30", "11:30").await;
    assert_eq!(response.status(), 201);
    let body: Value = response.json().await.expect("Failed to parse response");
    let b_id = body["id"].as_i64().expect("No booking ID");

    // First approval wins
    let response = approve_booking(&client, &admin, a_id).await;
    assert!(response.status().is_success());

    // Second approval is rejected and the request stays pending
    let response = approve_booking(&client, &admin, b_id).await;
    assert_eq!(response.status(), 409);
    assert_eq!(booking_status(&client, &admin, b_id).await, "pending");
}

/// Concurrency: at most one of two racing approvals succeeds
#[tokio::test]
#[ignore]
async fn test_concurrent_approvals_one_winner() {
    let client = Client::new();
    let admin = admin_token();
    let member = member_token();
    let room_id = create_room(&client, &admin, "Test Room (races)").await;

    let response = create_booking(&client, &member, room_id, "2024-06-01", "14:00", "15:00").await;
    assert_eq!(response.status(), 201);
    let body: Value = response.json().await.expect("Failed to parse response");
    let a_id = body["id"].as_i64().expect("No booking ID");

    let response = create_booking(&client, &member, room_id, "2024-06-01", "14:30", "15:30").await;
    assert_eq!(response.status(), 201);
    let body: Value = response.json().await.expect("Failed to parse response");
    let b_id = body["id"].as_i64().expect("No booking ID");

    let (ra, rb) = tokio::join!(
        approve_booking(&client, &admin, a_id),
        approve_booking(&client, &admin, b_id)
    );

    let successes = [ra.status(), rb.status()]
        .iter()
        .filter(|s| s.is_success())
        .count();
    assert_eq!(successes, 1, "exactly one approval should win the race");

    let a_status = booking_status(&client, &admin, a_id).await;
    let b_status = booking_status(&client, &admin, b_id).await;
    let approved = [a_status.as_str(), b_status.as_str()]
        .iter()
        .filter(|s| **s == "approved")
        .count();
    assert_eq!(approved, 1);
    assert!(a_status == "pending" || b_status == "pending");
}

#[tokio::test]
#[ignore]
async fn test_cancel_requires_owner() {
    let client = Client::new();
    let admin = admin_token();
    let member = member_token();
    let room_id = create_room(&client, &admin, "Test Room (cancel)").await;

    let response = create_booking(&client, &member, room_id, "2024-06-01", "16:00", "17:00").await;
    assert_eq!(response.status(), 201);
    let body: Value = response.json().await.expect("Failed to parse response");
    let booking_id = body["id"].as_i64().expect("No booking ID");

    // Another user (even an admin) cannot cancel on the requester's behalf
    let response = client
        .post(format!("{}/bookings/{}/cancel", BASE_URL, booking_id))
        .header("Authorization", format!("Bearer {}", admin))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 403);

    // The requester can
    let response = client
        .post(format!("{}/bookings/{}/cancel", BASE_URL, booking_id))
        .header("Authorization", format!("Bearer {}", member))
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());
    assert_eq!(booking_status(&client, &member, booking_id).await, "cancelled");

    // Cancelled requests cannot be approved
    let response = approve_booking(&client, &admin, booking_id).await;
    assert_eq!(response.status(), 422);
}

#[tokio::test]
#[ignore]
async fn test_unavailable_game_cannot_be_requested() {
    let client = Client::new();
    let admin = admin_token();

    let response = client
        .post(format!("{}/games", BASE_URL))
        .header("Authorization", format!("Bearer {}", admin))
        .json(&json!({ "name": "Test Game (unavailable)", "is_available": false }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 201);
    let body: Value = response.json().await.expect("Failed to parse response");
    let game_id = body["id"].as_i64().expect("No game ID");

    let response = client
        .post(format!("{}/bookings", BASE_URL))
        .header("Authorization", format!("Bearer {}", member_token()))
        .json(&json!({
            "resource_kind": "game",
            "resource_id": game_id,
            "booking_date": "2024-06-01",
            "start_time": "10:00",
            "end_time": "11:00"
        }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 422);
}

#[tokio::test]
#[ignore]
async fn test_member_only_sees_own_bookings() {
    let client = Client::new();
    let member = member_token();

    let response = client
        .get(format!("{}/bookings", BASE_URL))
        .header("Authorization", format!("Bearer {}", member))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());
    let body: Value = response.json().await.expect("Failed to parse response");
    for item in body["items"].as_array().expect("items should be an array") {
        assert_eq!(item["user"]["id"].as_i64(), Some(MEMBER_USER_ID as i64));
    }
}

#[tokio::test]
#[ignore]
async fn test_get_stats() {
    let client = Client::new();

    let response = client
        .get(format!("{}/stats", BASE_URL))
        .header("Authorization", format!("Bearer {}", admin_token()))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["bookings"]["pending"].is_number());
    assert!(body["resources"]["rooms"].is_number());
    assert!(body["users"].is_number());
}
