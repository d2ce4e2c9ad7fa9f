//! Daily goal tracking core: per-day sections of weighted goals, carry-over
//! reconciliation, end-of-day rollover, and weekly completion statistics.
//!
//! Three durable JSON documents back the crate (the daily record
//! collection, the bounded completion-history log, and the last-rollover
//! marker), and a single facade, [`GoalTracker`], serves UI code: reads
//! such as day records, history, weekly stats, and the feedback summary;
//! section and goal CRUD against the open day; and the app-foreground
//! lifecycle hook that rolls the previous day over and repairs gaps.

pub mod dates;
pub mod editor;
pub mod error;
pub mod reconciler;
pub mod report;
pub mod rollover;
pub mod score;
pub mod stats;
pub mod store;
pub mod tracker;
pub mod types;

pub use dates::Day;
pub use error::TrackerError;
pub use reconciler::ReconcileReport;
pub use report::{DaySummary, SectionSummary};
pub use store::{RecordStore, StorageError, RETENTION_DAYS};
pub use tracker::GoalTracker;
pub use types::{DailyCompletion, DailyRecord, Goal, GoalRef, SectionData, WeeklyStats};
