//! Crate error taxonomy.
//!
//! Validation failures are detected before any mutation is applied, so a
//! rejected operation never leaves partial state. Storage failures are
//! propagated rather than swallowed: the rollover withholds its marker on
//! failure and the next app activation retries.

use thiserror::Error;

use crate::dates::Day;
use crate::store::StorageError;

#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("section '{0}' already exists")]
    DuplicateTitle(String),

    #[error("title cannot be empty")]
    EmptyTitle,

    #[error("goal score {0} is outside 1..=5")]
    ScoreOutOfRange(u8),

    #[error("cannot edit {date}: the open day is {today}")]
    HistoricalEdit { date: Day, today: Day },

    #[error("section '{0}' not found")]
    SectionNotFound(String),

    #[error("goal '{0}' not found")]
    GoalNotFound(String),

    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}

impl TrackerError {
    /// True for rejections detected before any mutation was applied.
    /// These surface inline to the user; storage failures are retried on
    /// the next activation instead.
    pub fn is_validation(&self) -> bool {
        !matches!(self, TrackerError::Storage(_))
    }
}
