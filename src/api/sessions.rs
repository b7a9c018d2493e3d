use axum::{extract::State, http::StatusCode, response::Json, routing::post, Router};
use axum_extra::extract::WithRejection;
use serde::{Deserialize, Serialize};

use crate::errors::BookingError;
use crate::models::{
    parse_session_date, parse_time_range, require, require_text, validate_id, NewSession,
};
use crate::services::SchedulingService;

/// Body of `POST /session`. Every field is optional here so that a missing
/// field is reported as a validation error rather than a decode failure.
#[derive(Debug, Default, Deserialize)]
pub struct CreateSessionRequest {
    pub trainer_id: Option<i64>,
    pub member_id: Option<i64>,
    /// `YYYY-MM-DD`
    pub session_date: Option<String>,
    /// `HH:MM:SS`
    pub start_time: Option<String>,
    /// `HH:MM:SS`
    pub end_time: Option<String>,
}

impl CreateSessionRequest {
    pub fn validate(self) -> Result<NewSession, BookingError> {
        let trainer_id = require(self.trainer_id)?;
        let member_id = require(self.member_id)?;
        let session_date = require_text(self.session_date)?;
        let start_time = require_text(self.start_time)?;
        let end_time = require_text(self.end_time)?;

        Ok(NewSession {
            trainer_id: validate_id(trainer_id, "trainer_id")?,
            member_id: validate_id(member_id, "member_id")?,
            session_date: parse_session_date(&session_date)?,
            slot: parse_time_range(&start_time, &end_time)?,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct SessionCreatedResponse {
    pub message: String,
    pub session_id: i64,
}

pub fn session_routes(service: SchedulingService) -> Router {
    Router::new()
        .route("/session", post(create_session))
        .with_state(service)
}

/// Schedule a training session
#[tracing::instrument(skip(service, request))]
async fn create_session(
    State(service): State<SchedulingService>,
    WithRejection(Json(request), _): WithRejection<Json<CreateSessionRequest>, BookingError>,
) -> Result<(StatusCode, Json<SessionCreatedResponse>), BookingError> {
    let session = request.validate()?;
    let session_id = service.schedule_session(session).await?;

    Ok((
        StatusCode::CREATED,
        Json(SessionCreatedResponse {
            message: "Training session added successfully".to_string(),
            session_id,
        }),
    ))
}
