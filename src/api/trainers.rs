use axum::{
    extract::{rejection::PathRejection, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use serde::Deserialize;
use serde_json::json;

use crate::errors::BookingError;
use crate::models::{parse_session_date, require_text};
use crate::services::scheduling_service::TRAINER_NOT_FOUND_MESSAGE;
use crate::services::TrainerService;

#[derive(Debug, Deserialize)]
pub struct TrainerDayQuery {
    /// `YYYY-MM-DD`
    pub date: Option<String>,
}

pub fn trainer_routes(service: TrainerService) -> Router {
    Router::new()
        .route("/trainer/:trainer_id", get(get_trainer))
        .route("/trainer/:trainer_id/sessions", get(get_trainer_day))
        .with_state(service)
}

/// Lookups answer a missing trainer with 404 and a `message` body.
fn lookup_error(err: BookingError) -> Response {
    match err {
        BookingError::NotFound(message) => {
            (StatusCode::NOT_FOUND, Json(json!({ "message": message }))).into_response()
        }
        other => other.into_response(),
    }
}

/// A trainer id that is not an integer names no trainer.
fn trainer_id_from_path(path: Result<Path<i64>, PathRejection>) -> Result<i64, Response> {
    path.map(|Path(trainer_id)| trainer_id).map_err(|rejection| {
        tracing::debug!(%rejection, "Unparseable trainer id");
        lookup_error(BookingError::NotFound(TRAINER_NOT_FOUND_MESSAGE.to_string()))
    })
}

/// Fetch a trainer record
#[tracing::instrument(skip(service, path))]
async fn get_trainer(
    State(service): State<TrainerService>,
    path: Result<Path<i64>, PathRejection>,
) -> Response {
    let trainer_id = match trainer_id_from_path(path) {
        Ok(id) => id,
        Err(response) => return response,
    };

    match service.get_trainer(trainer_id).await {
        Ok(trainer) => Json(trainer).into_response(),
        Err(err) => lookup_error(err),
    }
}

/// Sessions booked for a trainer on one date, with remaining capacity
#[tracing::instrument(skip(service, path))]
async fn get_trainer_day(
    State(service): State<TrainerService>,
    path: Result<Path<i64>, PathRejection>,
    Query(query): Query<TrainerDayQuery>,
) -> Response {
    let trainer_id = match trainer_id_from_path(path) {
        Ok(id) => id,
        Err(response) => return response,
    };
    let session_date = match require_text(query.date).and_then(|d| parse_session_date(&d)) {
        Ok(date) => date,
        Err(err) => return err.into_response(),
    };

    match service.day_summary(trainer_id, session_date).await {
        Ok(summary) => Json(summary).into_response(),
        Err(err) => lookup_error(err),
    }
}
