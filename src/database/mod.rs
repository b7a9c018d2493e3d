//! Data store seam.
//!
//! Services talk to storage through [`BookingStore`]. Every mutation runs
//! inside a scoped transaction handle: dropping a handle without calling
//! `commit` rolls back whatever it staged.

use async_trait::async_trait;
use chrono::NaiveDate;
use thiserror::Error;

use crate::models::{NewMember, NewSession, NewTrainer, Session, Trainer};

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgBookingStore;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Unique constraint violated: {0}")]
    UniqueViolation(String),
    #[error("Referenced record missing: {0}")]
    ForeignKeyViolation(String),
    #[error("Data store unavailable: {0}")]
    Unavailable(String),
    /// An identifier the store cannot represent
    #[error("{0}")]
    IdOutOfRange(String),
}

#[async_trait]
pub trait BookingStore: Send + Sync {
    /// Open a transaction that holds exclusive scheduling rights for one
    /// trainer on one date until it is committed or dropped.
    async fn begin_trainer_day(
        &self,
        trainer_id: i64,
        session_date: NaiveDate,
    ) -> Result<Box<dyn TrainerDayTx>, StoreError>;

    /// Open a transaction that serializes member registrations.
    async fn begin_member_registration(&self) -> Result<Box<dyn MemberRegistrationTx>, StoreError>;

    async fn find_trainer(&self, trainer_id: i64) -> Result<Option<Trainer>, StoreError>;

    async fn insert_trainer(&self, trainer: &NewTrainer) -> Result<Trainer, StoreError>;

    async fn count_trainers(&self) -> Result<i64, StoreError>;

    /// Committed sessions for a trainer on a date, ordered by start time
    async fn sessions_for_day(
        &self,
        trainer_id: i64,
        session_date: NaiveDate,
    ) -> Result<Vec<Session>, StoreError>;

    async fn ping(&self) -> Result<(), StoreError>;
}

#[async_trait]
pub trait TrainerDayTx: Send {
    /// Sessions already booked for the locked trainer day, including any
    /// staged by this transaction.
    async fn sessions(&mut self) -> Result<Vec<Session>, StoreError>;

    /// `None` when the trainer does not exist
    async fn working_hours(&mut self) -> Result<Option<i32>, StoreError>;

    async fn insert_session(&mut self, session: &NewSession) -> Result<i64, StoreError>;

    async fn commit(self: Box<Self>) -> Result<(), StoreError>;
}

#[async_trait]
pub trait MemberRegistrationTx: Send {
    /// Id of a member already using either contact detail
    async fn find_by_email_or_phone(
        &mut self,
        email: &str,
        phone: &str,
    ) -> Result<Option<i64>, StoreError>;

    async fn insert_member(&mut self, member: &NewMember) -> Result<i64, StoreError>;

    async fn commit(self: Box<Self>) -> Result<(), StoreError>;
}
