use axum::{extract::State, http::StatusCode, response::Json, routing::post, Router};
use axum_extra::extract::WithRejection;
use serde::{Deserialize, Serialize};

use crate::errors::BookingError;
use crate::models::{
    normalize_email, parse_gender, require, require_text, validate_age, validate_email, NewMember,
};
use crate::services::MemberService;

/// Body of `POST /member`
#[derive(Debug, Default, Deserialize)]
pub struct RegisterMemberRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub age: Option<i32>,
    /// One of `Male`, `Female`, `Other`
    pub gender: Option<String>,
}

impl RegisterMemberRequest {
    pub fn validate(self) -> Result<NewMember, BookingError> {
        let name = require_text(self.name)?;
        let email = normalize_email(&require_text(self.email)?);
        let phone = require_text(self.phone)?;
        let age = require(self.age)?;
        let gender = require_text(self.gender)?;

        let gender = parse_gender(&gender)?;
        validate_email(&email)?;

        Ok(NewMember {
            name,
            email,
            phone,
            age: validate_age(age)?,
            gender,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct MemberCreatedResponse {
    pub message: String,
    pub member_id: i64,
}

pub fn member_routes(service: MemberService) -> Router {
    Router::new()
        .route("/member", post(register_member))
        .with_state(service)
}

/// Register a new member
#[tracing::instrument(skip(service, request))]
async fn register_member(
    State(service): State<MemberService>,
    WithRejection(Json(request), _): WithRejection<Json<RegisterMemberRequest>, BookingError>,
) -> Result<(StatusCode, Json<MemberCreatedResponse>), BookingError> {
    let member = request.validate()?;
    let member_id = service.register_member(member).await?;

    Ok((
        StatusCode::CREATED,
        Json(MemberCreatedResponse {
            message: "Member registered successfully".to_string(),
            member_id,
        }),
    ))
}
