// Shared helpers for the integration tests
#![allow(dead_code)]

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    Router,
};
use serde_json::Value;
use std::sync::{Arc, Once};
use tower::ServiceExt;

use gym_booking::api::routes::create_routes;
use gym_booking::database::{BookingStore, MemoryStore};
use gym_booking::models::{Gender, NewMember, NewTrainer};
use gym_booking::services::MemberService;

static INIT: Once = Once::new();

/// Initialize test logging
pub fn init_test_logging() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter("gym_booking=debug")
            .with_test_writer()
            .try_init();
    });
}

/// Router wired to a fresh in-memory store
pub struct TestApp {
    pub store: MemoryStore,
    pub router: Router,
}

impl TestApp {
    pub fn new() -> Self {
        init_test_logging();
        let store = MemoryStore::new();
        let router = create_routes(Arc::new(store.clone()));
        Self { store, router }
    }

    pub fn shared_store(&self) -> Arc<dyn BookingStore> {
        Arc::new(self.store.clone())
    }

    pub async fn add_trainer(&self, working_hours: i32) -> i64 {
        self.store
            .insert_trainer(&NewTrainer {
                name: format!("Trainer {}h", working_hours),
                specialization: Some("strength".to_string()),
                working_hours,
            })
            .await
            .expect("insert trainer")
            .id
    }

    pub async fn add_member(&self, email: &str, phone: &str) -> i64 {
        MemberService::new(self.shared_store())
            .register_member(test_member(email, phone))
            .await
            .expect("register member")
    }

    pub async fn request(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder()
            .method(method)
            .uri(uri)
            .header("Content-Type", "application/json");

        let request = match body {
            Some(body_data) => builder.body(Body::from(body_data.to_string())).unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        send(self.router.clone(), request).await
    }

    pub async fn post_json(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.request(Method::POST, uri, Some(body)).await
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.request(Method::GET, uri, None).await
    }
}

pub async fn send(router: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

pub fn test_member(email: &str, phone: &str) -> NewMember {
    NewMember {
        name: "Test Member".to_string(),
        email: email.to_string(),
        phone: phone.to_string(),
        age: 30,
        gender: Gender::Other,
    }
}
