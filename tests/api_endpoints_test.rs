mod common;

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
};
use pretty_assertions::assert_eq;
use serde_json::json;

use common::{send, TestApp};

fn session_body(trainer_id: i64, member_id: i64, start: &str, end: &str) -> serde_json::Value {
    json!({
        "trainer_id": trainer_id,
        "member_id": member_id,
        "session_date": "2024-01-15",
        "start_time": start,
        "end_time": end,
    })
}

#[tokio::test]
async fn test_health_check() {
    let app = TestApp::new();

    let (status, body) = app.get("/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["service"], "gym-booking");
}

#[tokio::test]
async fn test_back_to_back_sessions_are_accepted() {
    let app = TestApp::new();
    let trainer = app.add_trainer(8).await;
    let member = app.add_member("a@example.com", "555-0001").await;

    let (status, body) = app
        .post_json("/session", session_body(trainer, member, "09:00:00", "12:00:00"))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "Training session added successfully");
    assert!(body["session_id"].as_i64().is_some());

    let (status, _) = app
        .post_json("/session", session_body(trainer, member, "12:00:00", "15:00:00"))
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, day) = app
        .get(&format!("/trainer/{}/sessions?date=2024-01-15", trainer))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(day["sessions"].as_array().unwrap().len(), 2);
    assert_eq!(day["booked_minutes"], 360);
    assert_eq!(day["remaining_minutes"], 120);
}

#[tokio::test]
async fn test_overlapping_session_is_rejected() {
    let app = TestApp::new();
    let trainer = app.add_trainer(8).await;
    let member = app.add_member("b@example.com", "555-0002").await;

    let (status, _) = app
        .post_json("/session", session_body(trainer, member, "09:00:00", "11:00:00"))
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = app
        .post_json("/session", session_body(trainer, member, "10:00:00", "12:00:00"))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Trainer has an overlapping session");

    let stored = app
        .get(&format!("/trainer/{}/sessions?date=2024-01-15", trainer))
        .await
        .1;
    assert_eq!(stored["sessions"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_session_over_daily_capacity_is_rejected() {
    let app = TestApp::new();
    let trainer = app.add_trainer(1).await;
    let member = app.add_member("c@example.com", "555-0003").await;

    let (status, body) = app
        .post_json("/session", session_body(trainer, member, "09:00:00", "10:30:00"))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Trainer exceeds daily working hours");
    let stored = app
        .get(&format!("/trainer/{}/sessions?date=2024-01-15", trainer))
        .await
        .1;
    assert_eq!(stored["booked_minutes"], 0);
}

#[tokio::test]
async fn test_unknown_trainer_is_a_bad_request_when_scheduling() {
    let app = TestApp::new();
    let member = app.add_member("d@example.com", "555-0004").await;

    let (status, body) = app
        .post_json("/session", session_body(42, member, "09:00:00", "10:00:00"))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Trainer not found");
}

#[tokio::test]
async fn test_unknown_member_is_a_bad_request_when_scheduling() {
    let app = TestApp::new();
    let trainer = app.add_trainer(8).await;

    let (status, body) = app
        .post_json("/session", session_body(trainer, 77, "09:00:00", "10:00:00"))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Member not found");
}

#[tokio::test]
async fn test_session_validation_errors() {
    let app = TestApp::new();
    let trainer = app.add_trainer(8).await;
    let member = app.add_member("e@example.com", "555-0005").await;

    let (status, body) = app
        .post_json(
            "/session",
            json!({ "trainer_id": trainer, "member_id": member, "session_date": "2024-01-15" }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "All fields are required");

    let (status, body) = app
        .post_json("/session", session_body(trainer, member, "10:00:00", "09:00:00"))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "End time must be after start time");

    let (status, _) = app
        .post_json("/session", session_body(trainer, member, "9am", "10:00:00"))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Identical invalid input fails the same way every time
    for _ in 0..2 {
        let (status, body) = app
            .post_json("/session", session_body(trainer, member, "10:00:00", "10:00:00"))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "End time must be after start time");
    }
}

#[tokio::test]
async fn test_malformed_json_is_a_bad_request() {
    let app = TestApp::new();

    let request = Request::builder()
        .method(Method::POST)
        .uri("/session")
        .header("Content-Type", "application/json")
        .body(Body::from("{\"trainer_id\": "))
        .unwrap();
    let (status, body) = send(app.router.clone(), request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_register_member() {
    let app = TestApp::new();

    let (status, body) = app
        .post_json(
            "/member",
            json!({
                "name": "John Doe",
                "email": "john.doe@example.com",
                "phone": "555-1000",
                "age": 34,
                "gender": "Male"
            }),
        )
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "Member registered successfully");
    assert_eq!(app.store.members().unwrap().len(), 1);
}

#[tokio::test]
async fn test_duplicate_email_is_rejected() {
    let app = TestApp::new();
    app.add_member("taken@example.com", "555-2000").await;

    let (status, body) = app
        .post_json(
            "/member",
            json!({
                "name": "Second Person",
                "email": "Taken@Example.com",
                "phone": "555-2001",
                "age": 40,
                "gender": "Female"
            }),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Member with this email or phone already exists");
    assert_eq!(app.store.members().unwrap().len(), 1);
}

#[tokio::test]
async fn test_duplicate_phone_is_rejected() {
    let app = TestApp::new();
    app.add_member("first@example.com", "555-3000").await;

    let (status, _) = app
        .post_json(
            "/member",
            json!({
                "name": "Other Person",
                "email": "other@example.com",
                "phone": "555-3000",
                "age": 22,
                "gender": "Other"
            }),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(app.store.members().unwrap().len(), 1);
}

#[tokio::test]
async fn test_member_validation_errors() {
    let app = TestApp::new();

    let (status, body) = app
        .post_json("/member", json!({ "name": "No Contact", "age": 20, "gender": "Male" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "All fields are required");

    let (status, body) = app
        .post_json(
            "/member",
            json!({
                "name": "Bad Gender",
                "email": "g@example.com",
                "phone": "555-4000",
                "age": 20,
                "gender": "Unknown"
            }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid gender. Choose Male, Female, or Other.");
    assert!(app.store.members().unwrap().is_empty());
}

#[tokio::test]
async fn test_get_trainer() {
    let app = TestApp::new();
    let trainer = app.add_trainer(6).await;

    let (status, body) = app.get(&format!("/trainer/{}", trainer)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], trainer);
    assert_eq!(body["working_hours"], 6);
    assert_eq!(body["name"], "Trainer 6h");
}

#[tokio::test]
async fn test_missing_trainer_is_not_found() {
    let app = TestApp::new();

    let (status, body) = app.get("/trainer/999").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Trainer not found");

    let (status, body) = app.get("/trainer/999/sessions?date=2024-01-15").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Trainer not found");
}

#[tokio::test]
async fn test_non_numeric_trainer_id_is_not_found() {
    let app = TestApp::new();

    for uri in ["/trainer/abc", "/trainer/abc/sessions?date=2024-01-15", "/trainer/1.5"] {
        let request = Request::builder()
            .method(Method::GET)
            .uri(uri)
            .body(Body::empty())
            .unwrap();
        let response = tower::ServiceExt::oneshot(app.router.clone(), request)
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND, "{}", uri);
        assert_eq!(
            response.headers()["content-type"],
            "application/json",
            "{}",
            uri
        );

        let (_, body) = app.get(uri).await;
        assert_eq!(body["message"], "Trainer not found");
    }
}

#[tokio::test]
async fn test_trainer_day_requires_a_valid_date() {
    let app = TestApp::new();
    let trainer = app.add_trainer(8).await;

    let (status, _) = app.get(&format!("/trainer/{}/sessions", trainer)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .get(&format!("/trainer/{}/sessions?date=15-01-2024", trainer))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
