use axum::Router;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use super::health::health_routes;
use super::members::member_routes;
use super::sessions::session_routes;
use super::trainers::trainer_routes;
use crate::database::BookingStore;
use crate::services::{MemberService, SchedulingService, TrainerService};

pub fn create_routes(store: Arc<dyn BookingStore>) -> Router {
    Router::new()
        .merge(health_routes(store.clone()))
        .merge(session_routes(SchedulingService::new(store.clone())))
        .merge(member_routes(MemberService::new(store.clone())))
        .merge(trainer_routes(TrainerService::new(store)))
        .layer(TraceLayer::new_for_http())
}
