//! `GoalTracker`: the single entry point UI code talks to.
//!
//! Owns the record store and threads "today" explicitly through the
//! rollover / reconcile / editor call chain; there is no module-level
//! cached snapshot of the data. Clockless methods resolve today from the
//! local clock; the `*_at` variants take an explicit day for tests and for
//! date-selector views.

use std::path::PathBuf;

use crate::dates::Day;
use crate::editor;
use crate::error::TrackerError;
use crate::reconciler::{self, ReconcileReport};
use crate::report::{self, DaySummary};
use crate::rollover;
use crate::stats;
use crate::store::{RecordStore, StorageError};
use crate::types::{DailyCompletion, DailyRecord, SectionData, WeeklyStats};

pub struct GoalTracker {
    store: RecordStore,
}

impl GoalTracker {
    /// Open against the default store directory (`~/.goaldeck/`).
    pub async fn open() -> Result<Self, StorageError> {
        Ok(GoalTracker {
            store: RecordStore::open().await?,
        })
    }

    /// Open against an explicit directory. Useful for testing.
    pub async fn open_at(dir: impl Into<PathBuf>) -> Result<Self, StorageError> {
        Ok(GoalTracker {
            store: RecordStore::open_at(dir).await?,
        })
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    // --- lifecycle ---

    /// App-foreground hook: archive the previous day if the date changed,
    /// then fill gaps and prune.
    pub async fn activate(&self) -> Result<ReconcileReport, TrackerError> {
        self.activate_at(Day::today()).await
    }

    pub async fn activate_at(&self, today: Day) -> Result<ReconcileReport, TrackerError> {
        rollover::rollover(&self.store, today).await?;
        reconciler::reconcile(&self.store, today).await
    }

    pub async fn reconcile(&self) -> Result<ReconcileReport, TrackerError> {
        reconciler::reconcile(&self.store, Day::today()).await
    }

    pub async fn rollover(&self) -> Result<bool, TrackerError> {
        rollover::rollover(&self.store, Day::today()).await
    }

    // --- reads ---

    pub async fn daily_record(&self, date: Day) -> Result<Option<DailyRecord>, TrackerError> {
        Ok(self.store.record(date).await?)
    }

    /// Sections for one day; empty when the day has no record.
    pub async fn sections(&self, date: Day) -> Result<Vec<SectionData>, TrackerError> {
        Ok(self
            .store
            .record(date)
            .await?
            .map(|r| r.sections)
            .unwrap_or_default())
    }

    pub async fn history(&self) -> Result<Vec<DailyCompletion>, TrackerError> {
        Ok(self.store.history().await?)
    }

    pub async fn weekly_stats(&self) -> Result<WeeklyStats, TrackerError> {
        stats::weekly_stats(&self.store).await
    }

    pub async fn weekly_summary(&self) -> Result<Vec<DaySummary>, TrackerError> {
        report::weekly_summary(&self.store, Day::today()).await
    }

    pub async fn weekly_summary_at(&self, today: Day) -> Result<Vec<DaySummary>, TrackerError> {
        report::weekly_summary(&self.store, today).await
    }

    // --- writes, all against the open day ---

    pub async fn add_section(
        &self,
        date: Day,
        title: &str,
        color: &str,
    ) -> Result<(), TrackerError> {
        editor::add_section(&self.store, Day::today(), date, title, color).await
    }

    pub async fn update_section(
        &self,
        date: Day,
        old_title: &str,
        new_title: &str,
        new_color: &str,
    ) -> Result<(), TrackerError> {
        editor::update_section(&self.store, Day::today(), date, old_title, new_title, new_color)
            .await
    }

    pub async fn delete_section(&self, date: Day, title: &str) -> Result<(), TrackerError> {
        editor::delete_section(&self.store, Day::today(), date, title).await
    }

    /// Returns the fresh goal's id.
    pub async fn add_goal(
        &self,
        date: Day,
        section_title: &str,
        title: &str,
        score: u8,
    ) -> Result<String, TrackerError> {
        editor::add_goal(&self.store, Day::today(), date, section_title, title, score).await
    }

    pub async fn update_goal(
        &self,
        date: Day,
        goal_id: &str,
        new_title: &str,
        new_score: u8,
    ) -> Result<(), TrackerError> {
        editor::update_goal(&self.store, Day::today(), date, goal_id, new_title, new_score).await
    }

    pub async fn delete_goal(&self, date: Day, goal_id: &str) -> Result<(), TrackerError> {
        editor::delete_goal(&self.store, Day::today(), date, goal_id).await
    }

    /// Returns the goal's new completed state.
    pub async fn toggle_goal(&self, date: Day, goal_id: &str) -> Result<bool, TrackerError> {
        editor::toggle_goal(&self.store, Day::today(), date, goal_id).await
    }
}
