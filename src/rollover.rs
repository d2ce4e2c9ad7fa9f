//! End-of-day transition: archive the closing day's completion state into
//! the bounded history log, then reset completion flags so the structure
//! carries forward incomplete.

use crate::dates::Day;
use crate::error::TrackerError;
use crate::store::RecordStore;
use crate::types::DailyCompletion;

/// Run the rollover for a date change. Returns `true` when a day was
/// archived.
///
/// Guarded by the last-processed marker so repeated lifecycle triggers on
/// the same date no-op. The marker advances only after both the archive
/// and the completion reset have landed: a storage failure leaves it
/// untouched and the next activation retries. The history append upserts
/// by date, so a retry cannot duplicate an entry.
pub async fn rollover(store: &RecordStore, today: Day) -> Result<bool, TrackerError> {
    if store.last_rollover().await? == Some(today) {
        return Ok(false);
    }

    let mut records = store.records().await?;
    let Some(live) = records.last_mut() else {
        // Fresh install: nothing to close yet.
        store.set_last_rollover(today).await?;
        return Ok(false);
    };

    if live.date >= today {
        // The live record was opened today (or later, under clock skew);
        // there is no finished day to archive.
        store.set_last_rollover(today).await?;
        return Ok(false);
    }

    let completed_goals: Vec<String> = live
        .sections
        .iter()
        .flat_map(|s| s.goals.iter())
        .filter(|g| g.completed)
        .map(|g| g.id.clone())
        .collect();

    let entry = DailyCompletion {
        date: live.date,
        completed_goals,
        section_data: live.sections.clone(),
    };
    log::info!(
        "archiving {} with {} completed goal(s)",
        entry.date,
        entry.completed_goals.len()
    );
    store.append_history(entry).await?;

    for section in &mut live.sections {
        for goal in &mut section.goals {
            goal.completed = false;
        }
        section.recompute_scores();
    }
    store.save_records(records).await?;

    store.set_last_rollover(today).await?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;
    use crate::editor;

    fn day(s: &str) -> Day {
        s.parse().unwrap()
    }

    async fn open_store(dir: &tempfile::TempDir) -> RecordStore {
        RecordStore::open_at(dir.path()).await.unwrap()
    }

    /// Build a day's record with one completed goal, returning its id.
    async fn seed_day(store: &RecordStore, date: Day) -> String {
        editor::add_section(store, date, date, "Reading", "#112233")
            .await
            .unwrap();
        let id = editor::add_goal(store, date, date, "Reading", "Read", 4)
            .await
            .unwrap();
        editor::toggle_goal(store, date, date, &id).await.unwrap();
        id
    }

    #[tokio::test]
    async fn test_rollover_archives_then_resets() {
        let dir = tempdir().unwrap();
        let store = open_store(&dir).await;
        let yesterday = day("2025-03-10");
        let today = day("2025-03-11");

        let read = seed_day(&store, yesterday).await;

        assert!(rollover(&store, today).await.unwrap());

        let history = store.history().await.unwrap();
        let newest = history.last().unwrap();
        assert_eq!(newest.date, yesterday);
        assert!(newest.completed_goals.contains(&read));
        assert_eq!(newest.section_data[0].completed_score, 4);

        let live = store.record(yesterday).await.unwrap().unwrap();
        assert!(!live.goal(&read).unwrap().completed);
        assert_eq!(live.sections[0].completed_score, 0);
        assert_eq!(live.sections[0].total_score, 4);

        assert_eq!(store.last_rollover().await.unwrap(), Some(today));
    }

    #[tokio::test]
    async fn test_rollover_runs_once_per_day() {
        let dir = tempdir().unwrap();
        let store = open_store(&dir).await;
        let yesterday = day("2025-03-10");
        let today = day("2025-03-11");

        seed_day(&store, yesterday).await;

        assert!(rollover(&store, today).await.unwrap());
        assert!(!rollover(&store, today).await.unwrap());
        assert_eq!(store.history().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_fresh_install_only_sets_marker() {
        let dir = tempdir().unwrap();
        let store = open_store(&dir).await;
        let today = day("2025-03-11");

        assert!(!rollover(&store, today).await.unwrap());
        assert_eq!(store.last_rollover().await.unwrap(), Some(today));
        assert!(store.history().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_nothing_to_close_when_live_day_is_today() {
        let dir = tempdir().unwrap();
        let store = open_store(&dir).await;
        let today = day("2025-03-11");

        seed_day(&store, today).await;

        assert!(!rollover(&store, today).await.unwrap());
        assert!(store.history().await.unwrap().is_empty());
        // today's completion state is untouched
        let live = store.record(today).await.unwrap().unwrap();
        assert_eq!(live.sections[0].completed_score, 4);
    }

    #[tokio::test]
    async fn test_overnight_gap_archives_the_closed_day_not_today() {
        let dir = tempdir().unwrap();
        let store = open_store(&dir).await;
        let last_used = day("2025-03-08");
        let today = day("2025-03-11");

        seed_day(&store, last_used).await;

        assert!(rollover(&store, today).await.unwrap());
        let history = store.history().await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].date, last_used);
    }
}
