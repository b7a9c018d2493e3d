use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A half-open time-of-day interval `[start, end)` with `end` strictly after `start`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct TimeRange {
    start: NaiveTime,
    end: NaiveTime,
}

impl TimeRange {
    /// Returns `None` unless `end` is strictly after `start`.
    pub fn new(start: NaiveTime, end: NaiveTime) -> Option<Self> {
        (end > start).then_some(Self { start, end })
    }

    pub fn start(&self) -> NaiveTime {
        self.start
    }

    pub fn end(&self) -> NaiveTime {
        self.end
    }

    /// Touching endpoints do not overlap.
    pub fn overlaps(&self, other: &TimeRange) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Whole minutes, truncated.
    pub fn duration_minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Session {
    pub id: i64,
    pub trainer_id: i64,
    pub member_id: i64,
    pub session_date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

impl Session {
    /// Stored rows satisfy `end_time > start_time`; a row that does not is
    /// treated as an empty range starting at `start_time`.
    pub fn time_range(&self) -> TimeRange {
        TimeRange::new(self.start_time, self.end_time).unwrap_or(TimeRange {
            start: self.start_time,
            end: self.start_time,
        })
    }

    pub fn duration_minutes(&self) -> i64 {
        self.time_range().duration_minutes()
    }
}

/// A booking that has already passed boundary validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSession {
    pub trainer_id: i64,
    pub member_id: i64,
    pub session_date: NaiveDate,
    pub slot: TimeRange,
}

impl NewSession {
    pub fn into_session(self, id: i64) -> Session {
        Session {
            id,
            trainer_id: self.trainer_id,
            member_id: self.member_id,
            session_date: self.session_date,
            start_time: self.slot.start(),
            end_time: self.slot.end(),
        }
    }
}

/// Per-day booking totals for a trainer.
#[derive(Debug, Clone, Serialize)]
pub struct TrainerDaySummary {
    pub trainer_id: i64,
    pub session_date: NaiveDate,
    pub sessions: Vec<Session>,
    pub booked_minutes: i64,
    pub remaining_minutes: i64,
}
