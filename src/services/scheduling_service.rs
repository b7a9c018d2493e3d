use std::sync::Arc;

use crate::database::{BookingStore, StoreError};
use crate::errors::BookingError;
use crate::models::{max_daily_minutes, NewSession, Session, TimeRange};

pub const OVERLAP_MESSAGE: &str = "Trainer has an overlapping session";
pub const TRAINER_NOT_FOUND_MESSAGE: &str = "Trainer not found";
pub const CAPACITY_MESSAGE: &str = "Trainer exceeds daily working hours";
pub const MEMBER_NOT_FOUND_MESSAGE: &str = "Member not found";

/// First existing session whose interval overlaps `slot`
pub fn find_overlap<'a>(existing: &'a [Session], slot: &TimeRange) -> Option<&'a Session> {
    existing.iter().find(|s| s.time_range().overlaps(slot))
}

pub fn booked_minutes(existing: &[Session]) -> i64 {
    existing.iter().map(Session::duration_minutes).sum()
}

/// Fails when adding `slot` would push the day's total past the trainer's cap.
pub fn check_capacity(
    existing: &[Session],
    slot: &TimeRange,
    working_hours: i32,
) -> Result<(), BookingError> {
    let total = booked_minutes(existing) + slot.duration_minutes();
    if total > max_daily_minutes(working_hours) {
        return Err(BookingError::Capacity(CAPACITY_MESSAGE.to_string()));
    }
    Ok(())
}

#[derive(Clone)]
pub struct SchedulingService {
    store: Arc<dyn BookingStore>,
}

impl SchedulingService {
    pub fn new(store: Arc<dyn BookingStore>) -> Self {
        Self { store }
    }

    /// Validate a booking against the trainer's day and commit it.
    ///
    /// The overlap check, capacity check and insert all run under one
    /// trainer-day transaction; any early return drops the handle, which
    /// rolls back and releases the lock.
    #[tracing::instrument(skip(self), fields(trainer_id = session.trainer_id, date = %session.session_date))]
    pub async fn schedule_session(&self, session: NewSession) -> Result<i64, BookingError> {
        let mut day = self
            .store
            .begin_trainer_day(session.trainer_id, session.session_date)
            .await?;

        let existing = day.sessions().await?;

        if let Some(clash) = find_overlap(&existing, &session.slot) {
            tracing::warn!(
                existing_session = clash.id,
                start = %session.slot.start(),
                end = %session.slot.end(),
                "Rejected overlapping session"
            );
            return Err(BookingError::Conflict(OVERLAP_MESSAGE.to_string()));
        }

        let working_hours = day
            .working_hours()
            .await?
            .ok_or_else(|| BookingError::NotFound(TRAINER_NOT_FOUND_MESSAGE.to_string()))?;

        if let Err(err) = check_capacity(&existing, &session.slot, working_hours) {
            tracing::warn!(
                booked_minutes = booked_minutes(&existing),
                requested_minutes = session.slot.duration_minutes(),
                working_hours,
                "Rejected session over daily capacity"
            );
            return Err(err);
        }

        let session_id = match day.insert_session(&session).await {
            Ok(id) => id,
            Err(StoreError::ForeignKeyViolation(detail)) => {
                tracing::warn!(%detail, "Rejected session for unknown member");
                return Err(BookingError::NotFound(MEMBER_NOT_FOUND_MESSAGE.to_string()));
            }
            Err(err) => return Err(err.into()),
        };
        day.commit().await?;

        tracing::info!(session_id, member_id = session.member_id, "Training session scheduled");
        Ok(session_id)
    }
}
