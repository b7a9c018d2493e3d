use chrono::NaiveDate;
use std::sync::Arc;

use crate::database::BookingStore;
use crate::errors::BookingError;
use crate::models::{Trainer, TrainerDaySummary};
use crate::services::scheduling_service::{booked_minutes, TRAINER_NOT_FOUND_MESSAGE};

#[derive(Clone)]
pub struct TrainerService {
    store: Arc<dyn BookingStore>,
}

impl TrainerService {
    pub fn new(store: Arc<dyn BookingStore>) -> Self {
        Self { store }
    }

    pub async fn get_trainer(&self, trainer_id: i64) -> Result<Trainer, BookingError> {
        self.store
            .find_trainer(trainer_id)
            .await?
            .ok_or_else(|| BookingError::NotFound(TRAINER_NOT_FOUND_MESSAGE.to_string()))
    }

    /// Committed bookings for a trainer on one date with remaining capacity
    pub async fn day_summary(
        &self,
        trainer_id: i64,
        session_date: NaiveDate,
    ) -> Result<TrainerDaySummary, BookingError> {
        let trainer = self.get_trainer(trainer_id).await?;
        let sessions = self.store.sessions_for_day(trainer_id, session_date).await?;
        let booked = booked_minutes(&sessions);

        Ok(TrainerDaySummary {
            trainer_id,
            session_date,
            sessions,
            booked_minutes: booked,
            remaining_minutes: (trainer.max_daily_minutes() - booked).max(0),
        })
    }
}
