use async_trait::async_trait;
use chrono::{Datelike, NaiveDate};
use sqlx::{PgPool, Postgres, Transaction};

use super::{BookingStore, MemberRegistrationTx, StoreError, TrainerDayTx};
use crate::models::{NewMember, NewSession, NewTrainer, Session, Trainer};

/// PostgreSQL-backed store. Each transaction handle owns one pooled connection.
#[derive(Debug, Clone)]
pub struct PgBookingStore {
    pool: PgPool,
}

impl PgBookingStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Advisory lock key for a trainer day, using the two-int4 form of
/// `pg_advisory_xact_lock`.
fn trainer_day_lock_key(
    trainer_id: i64,
    session_date: NaiveDate,
) -> Result<(i32, i32), StoreError> {
    let trainer_key = i32::try_from(trainer_id)
        .map_err(|_| StoreError::IdOutOfRange("trainer_id is out of range".to_string()))?;
    Ok((trainer_key, session_date.num_days_from_ce()))
}

fn map_insert_error(err: sqlx::Error) -> StoreError {
    match err.as_database_error() {
        Some(db_err) if db_err.is_unique_violation() => {
            StoreError::UniqueViolation(db_err.message().to_string())
        }
        Some(db_err) if db_err.is_foreign_key_violation() => {
            StoreError::ForeignKeyViolation(db_err.message().to_string())
        }
        _ => StoreError::Database(err),
    }
}

#[async_trait]
impl BookingStore for PgBookingStore {
    async fn begin_trainer_day(
        &self,
        trainer_id: i64,
        session_date: NaiveDate,
    ) -> Result<Box<dyn TrainerDayTx>, StoreError> {
        let (trainer_key, day_key) = trainer_day_lock_key(trainer_id, session_date)?;
        let mut tx = self.pool.begin().await?;

        sqlx::query("SELECT pg_advisory_xact_lock($1, $2)")
            .bind(trainer_key)
            .bind(day_key)
            .execute(&mut *tx)
            .await?;

        Ok(Box::new(PgTrainerDay {
            tx,
            trainer_id,
            session_date,
        }))
    }

    async fn begin_member_registration(&self) -> Result<Box<dyn MemberRegistrationTx>, StoreError> {
        let mut tx = self.pool.begin().await?;

        // Blocks concurrent registrations, still allows reads
        sqlx::query("LOCK TABLE members IN SHARE ROW EXCLUSIVE MODE")
            .execute(&mut *tx)
            .await?;

        Ok(Box::new(PgMemberRegistration { tx }))
    }

    async fn find_trainer(&self, trainer_id: i64) -> Result<Option<Trainer>, StoreError> {
        let trainer = sqlx::query_as::<_, Trainer>(
            "SELECT id, name, specialization, working_hours FROM trainers WHERE id = $1",
        )
        .bind(trainer_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(trainer)
    }

    async fn insert_trainer(&self, trainer: &NewTrainer) -> Result<Trainer, StoreError> {
        let trainer = sqlx::query_as::<_, Trainer>(
            r#"
            INSERT INTO trainers (name, specialization, working_hours)
            VALUES ($1, $2, $3)
            RETURNING id, name, specialization, working_hours
            "#,
        )
        .bind(&trainer.name)
        .bind(&trainer.specialization)
        .bind(trainer.working_hours)
        .fetch_one(&self.pool)
        .await
        .map_err(map_insert_error)?;

        Ok(trainer)
    }

    async fn count_trainers(&self) -> Result<i64, StoreError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM trainers")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    async fn sessions_for_day(
        &self,
        trainer_id: i64,
        session_date: NaiveDate,
    ) -> Result<Vec<Session>, StoreError> {
        let sessions = sqlx::query_as::<_, Session>(
            r#"
            SELECT id, trainer_id, member_id, session_date, start_time, end_time
            FROM sessions
            WHERE trainer_id = $1 AND session_date = $2
            ORDER BY start_time ASC
            "#,
        )
        .bind(trainer_id)
        .bind(session_date)
        .fetch_all(&self.pool)
        .await?;

        Ok(sessions)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

struct PgTrainerDay {
    tx: Transaction<'static, Postgres>,
    trainer_id: i64,
    session_date: NaiveDate,
}

#[async_trait]
impl TrainerDayTx for PgTrainerDay {
    async fn sessions(&mut self) -> Result<Vec<Session>, StoreError> {
        let sessions = sqlx::query_as::<_, Session>(
            r#"
            SELECT id, trainer_id, member_id, session_date, start_time, end_time
            FROM sessions
            WHERE trainer_id = $1 AND session_date = $2
            ORDER BY start_time ASC
            "#,
        )
        .bind(self.trainer_id)
        .bind(self.session_date)
        .fetch_all(&mut *self.tx)
        .await?;

        Ok(sessions)
    }

    async fn working_hours(&mut self) -> Result<Option<i32>, StoreError> {
        let hours = sqlx::query_scalar::<_, i32>("SELECT working_hours FROM trainers WHERE id = $1")
            .bind(self.trainer_id)
            .fetch_optional(&mut *self.tx)
            .await?;

        Ok(hours)
    }

    async fn insert_session(&mut self, session: &NewSession) -> Result<i64, StoreError> {
        let id = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO sessions (trainer_id, member_id, session_date, start_time, end_time)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            "#,
        )
        .bind(session.trainer_id)
        .bind(session.member_id)
        .bind(session.session_date)
        .bind(session.slot.start())
        .bind(session.slot.end())
        .fetch_one(&mut *self.tx)
        .await
        .map_err(map_insert_error)?;

        Ok(id)
    }

    async fn commit(self: Box<Self>) -> Result<(), StoreError> {
        self.tx.commit().await?;
        Ok(())
    }
}

struct PgMemberRegistration {
    tx: Transaction<'static, Postgres>,
}

#[async_trait]
impl MemberRegistrationTx for PgMemberRegistration {
    async fn find_by_email_or_phone(
        &mut self,
        email: &str,
        phone: &str,
    ) -> Result<Option<i64>, StoreError> {
        let id = sqlx::query_scalar::<_, i64>(
            "SELECT id FROM members WHERE email = $1 OR phone = $2 LIMIT 1",
        )
        .bind(email)
        .bind(phone)
        .fetch_optional(&mut *self.tx)
        .await?;

        Ok(id)
    }

    async fn insert_member(&mut self, member: &NewMember) -> Result<i64, StoreError> {
        let id = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO members (name, email, phone, age, gender)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            "#,
        )
        .bind(&member.name)
        .bind(&member.email)
        .bind(&member.phone)
        .bind(member.age)
        .bind(member.gender.as_str())
        .fetch_one(&mut *self.tx)
        .await
        .map_err(map_insert_error)?;

        Ok(id)
    }

    async fn commit(self: Box<Self>) -> Result<(), StoreError> {
        self.tx.commit().await?;
        Ok(())
    }
}
