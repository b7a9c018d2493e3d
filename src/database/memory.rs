use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

use super::{BookingStore, MemberRegistrationTx, StoreError, TrainerDayTx};
use crate::models::{Member, NewMember, NewSession, NewTrainer, Session, Trainer};

#[derive(Debug, Default)]
struct Tables {
    members: Vec<Member>,
    trainers: BTreeMap<i64, Trainer>,
    sessions: Vec<Session>,
    next_member_id: i64,
    next_trainer_id: i64,
    next_session_id: i64,
}

impl Tables {
    fn allocate(counter: &mut i64) -> i64 {
        *counter += 1;
        *counter
    }
}

type TrainerDayKey = (i64, NaiveDate);

/// In-process store with the same locking discipline as the PostgreSQL one:
/// an async mutex per trainer day, a single mutex for registrations, and
/// writes staged inside the handle until commit.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    tables: Arc<Mutex<Tables>>,
    day_locks: Arc<Mutex<HashMap<TrainerDayKey, Arc<AsyncMutex<()>>>>>,
    registration_lock: Arc<AsyncMutex<()>>,
}

fn lock_tables(tables: &Mutex<Tables>) -> Result<MutexGuard<'_, Tables>, StoreError> {
    tables
        .lock()
        .map_err(|_| StoreError::Unavailable("in-memory tables poisoned".to_string()))
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every registered member
    pub fn members(&self) -> Result<Vec<Member>, StoreError> {
        Ok(lock_tables(&self.tables)?.members.clone())
    }

    /// Lock for one trainer day. Entries whose only reference is the map
    /// itself are neither held nor awaited, so they are dropped here.
    fn day_lock(&self, key: TrainerDayKey) -> Result<Arc<AsyncMutex<()>>, StoreError> {
        let mut locks = self
            .day_locks
            .lock()
            .map_err(|_| StoreError::Unavailable("trainer day locks poisoned".to_string()))?;

        locks.retain(|_, lock| Arc::strong_count(lock) > 1);
        Ok(locks.entry(key).or_default().clone())
    }

    #[cfg(test)]
    fn tracked_day_locks(&self) -> usize {
        self.day_locks.lock().map_or(0, |locks| locks.len())
    }
}

#[async_trait]
impl BookingStore for MemoryStore {
    async fn begin_trainer_day(
        &self,
        trainer_id: i64,
        session_date: NaiveDate,
    ) -> Result<Box<dyn TrainerDayTx>, StoreError> {
        let guard = self.day_lock((trainer_id, session_date))?.lock_owned().await;

        Ok(Box::new(MemoryTrainerDay {
            _guard: guard,
            tables: Arc::clone(&self.tables),
            trainer_id,
            session_date,
            staged: Vec::new(),
        }))
    }

    async fn begin_member_registration(&self) -> Result<Box<dyn MemberRegistrationTx>, StoreError> {
        let guard = Arc::clone(&self.registration_lock).lock_owned().await;

        Ok(Box::new(MemoryMemberRegistration {
            _guard: guard,
            tables: Arc::clone(&self.tables),
            staged: Vec::new(),
        }))
    }

    async fn find_trainer(&self, trainer_id: i64) -> Result<Option<Trainer>, StoreError> {
        Ok(lock_tables(&self.tables)?.trainers.get(&trainer_id).cloned())
    }

    async fn insert_trainer(&self, trainer: &NewTrainer) -> Result<Trainer, StoreError> {
        let mut tables = lock_tables(&self.tables)?;
        let id = Tables::allocate(&mut tables.next_trainer_id);
        let trainer = Trainer {
            id,
            name: trainer.name.clone(),
            specialization: trainer.specialization.clone(),
            working_hours: trainer.working_hours,
        };
        tables.trainers.insert(id, trainer.clone());
        Ok(trainer)
    }

    async fn count_trainers(&self) -> Result<i64, StoreError> {
        Ok(lock_tables(&self.tables)?.trainers.len() as i64)
    }

    async fn sessions_for_day(
        &self,
        trainer_id: i64,
        session_date: NaiveDate,
    ) -> Result<Vec<Session>, StoreError> {
        let tables = lock_tables(&self.tables)?;
        let mut sessions: Vec<Session> = tables
            .sessions
            .iter()
            .filter(|s| s.trainer_id == trainer_id && s.session_date == session_date)
            .cloned()
            .collect();
        sessions.sort_by_key(|s| s.start_time);
        Ok(sessions)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        lock_tables(&self.tables).map(|_| ())
    }
}

struct MemoryTrainerDay {
    _guard: OwnedMutexGuard<()>,
    tables: Arc<Mutex<Tables>>,
    trainer_id: i64,
    session_date: NaiveDate,
    staged: Vec<Session>,
}

#[async_trait]
impl TrainerDayTx for MemoryTrainerDay {
    async fn sessions(&mut self) -> Result<Vec<Session>, StoreError> {
        let tables = lock_tables(&self.tables)?;
        let mut sessions: Vec<Session> = tables
            .sessions
            .iter()
            .filter(|s| s.trainer_id == self.trainer_id && s.session_date == self.session_date)
            .chain(self.staged.iter())
            .cloned()
            .collect();
        sessions.sort_by_key(|s| s.start_time);
        Ok(sessions)
    }

    async fn working_hours(&mut self) -> Result<Option<i32>, StoreError> {
        let tables = lock_tables(&self.tables)?;
        Ok(tables.trainers.get(&self.trainer_id).map(|t| t.working_hours))
    }

    async fn insert_session(&mut self, session: &NewSession) -> Result<i64, StoreError> {
        if session.trainer_id != self.trainer_id || session.session_date != self.session_date {
            return Err(StoreError::Unavailable(
                "session does not belong to the locked trainer day".to_string(),
            ));
        }

        let id = {
            let mut tables = lock_tables(&self.tables)?;
            if !tables.members.iter().any(|m| m.id == session.member_id) {
                return Err(StoreError::ForeignKeyViolation(format!(
                    "member {} does not exist",
                    session.member_id
                )));
            }
            Tables::allocate(&mut tables.next_session_id)
        };
        self.staged.push(session.clone().into_session(id));
        Ok(id)
    }

    async fn commit(self: Box<Self>) -> Result<(), StoreError> {
        let MemoryTrainerDay { _guard, tables, staged, .. } = *self;
        lock_tables(&tables)?.sessions.extend(staged);
        Ok(())
    }
}

struct MemoryMemberRegistration {
    _guard: OwnedMutexGuard<()>,
    tables: Arc<Mutex<Tables>>,
    staged: Vec<Member>,
}

#[async_trait]
impl MemberRegistrationTx for MemoryMemberRegistration {
    async fn find_by_email_or_phone(
        &mut self,
        email: &str,
        phone: &str,
    ) -> Result<Option<i64>, StoreError> {
        let tables = lock_tables(&self.tables)?;
        Ok(tables
            .members
            .iter()
            .chain(self.staged.iter())
            .find(|m| m.email == email || m.phone == phone)
            .map(|m| m.id))
    }

    async fn insert_member(&mut self, member: &NewMember) -> Result<i64, StoreError> {
        let mut tables = lock_tables(&self.tables)?;

        let duplicate = tables
            .members
            .iter()
            .chain(self.staged.iter())
            .any(|m| m.email == member.email || m.phone == member.phone);
        if duplicate {
            return Err(StoreError::UniqueViolation(
                "members email/phone must be unique".to_string(),
            ));
        }

        let id = Tables::allocate(&mut tables.next_member_id);
        self.staged.push(member.clone().into_member(id));
        Ok(id)
    }

    async fn commit(self: Box<Self>) -> Result<(), StoreError> {
        let MemoryMemberRegistration { _guard, tables, staged } = *self;
        lock_tables(&tables)?.members.extend(staged);
        Ok(())
    }
}
