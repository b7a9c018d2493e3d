use chrono::{NaiveDate, NaiveTime};

use crate::errors::BookingError;
use crate::models::{Gender, TimeRange};

pub const TIME_FORMAT: &str = "%H:%M:%S";
pub const DATE_FORMAT: &str = "%Y-%m-%d";

const MISSING_FIELDS: &str = "All fields are required";

/// Unwrap a required request field
pub fn require<T>(value: Option<T>) -> Result<T, BookingError> {
    value.ok_or_else(|| BookingError::Validation(MISSING_FIELDS.to_string()))
}

/// Required text field; blank strings count as missing. Returns the trimmed value.
pub fn require_text(value: Option<String>) -> Result<String, BookingError> {
    let value = require(value)?;
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(BookingError::Validation(MISSING_FIELDS.to_string()));
    }
    Ok(trimmed.to_string())
}

/// Record identifiers are positive
pub fn validate_id(id: i64, field_name: &str) -> Result<i64, BookingError> {
    if id <= 0 {
        return Err(BookingError::Validation(format!(
            "{} must be a positive integer",
            field_name
        )));
    }
    Ok(id)
}

pub fn parse_session_date(value: &str) -> Result<NaiveDate, BookingError> {
    NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(|_| {
        BookingError::Validation(format!(
            "Invalid session_date '{}'. Expected YYYY-MM-DD",
            value
        ))
    })
}

pub fn parse_time_of_day(value: &str, field_name: &str) -> Result<NaiveTime, BookingError> {
    NaiveTime::parse_from_str(value, TIME_FORMAT).map_err(|_| {
        BookingError::Validation(format!(
            "Invalid {} '{}'. Expected HH:MM:SS",
            field_name, value
        ))
    })
}

pub fn parse_time_range(start: &str, end: &str) -> Result<TimeRange, BookingError> {
    let start = parse_time_of_day(start, "start_time")?;
    let end = parse_time_of_day(end, "end_time")?;

    TimeRange::new(start, end)
        .ok_or_else(|| BookingError::Validation("End time must be after start time".to_string()))
}

/// Email validation; expects an already trimmed value
pub fn validate_email(email: &str) -> Result<(), BookingError> {
    if email.len() > 255 {
        return Err(BookingError::Validation(
            "Email cannot be longer than 255 characters".to_string(),
        ));
    }

    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain
                    .split_once('.')
                    .map_or(false, |(host, tld)| !host.is_empty() && !tld.is_empty())
        }
        None => false,
    };

    if !valid {
        return Err(BookingError::Validation("Invalid email format".to_string()));
    }
    Ok(())
}

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

pub fn validate_age(age: i32) -> Result<i32, BookingError> {
    if !(1..=120).contains(&age) {
        return Err(BookingError::Validation(
            "Age must be between 1 and 120".to_string(),
        ));
    }
    Ok(age)
}

pub fn parse_gender(value: &str) -> Result<Gender, BookingError> {
    value.parse().map_err(|_| {
        BookingError::Validation("Invalid gender. Choose Male, Female, or Other.".to_string())
    })
}
