//! Gap fill and pruning over the daily record collection.
//!
//! Dashboard and history views assume one record per day with no holes
//! between the earliest retained day and today. This module repairs holes
//! by carrying section structure forward (completion never carries over)
//! and bounds how far back the collection reaches. Both passes are
//! idempotent: a second run with no elapsed time changes nothing.

use std::collections::BTreeMap;

use crate::dates::Day;
use crate::error::TrackerError;
use crate::store::{RecordStore, RETENTION_DAYS};
use crate::types::DailyRecord;

/// Counts from one reconcile pass, for callers to log or surface.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ReconcileReport {
    pub synthesized: usize,
    pub pruned_records: usize,
    pub pruned_history: usize,
}

/// Fill missing days through `today`, then prune beyond the retention
/// window.
pub async fn reconcile(store: &RecordStore, today: Day) -> Result<ReconcileReport, TrackerError> {
    let synthesized = fill_missing(store, today).await?;
    let (pruned_records, pruned_history) = prune(store, today).await?;
    Ok(ReconcileReport {
        synthesized,
        pruned_records,
        pruned_history,
    })
}

/// Synthesize a record for every missing day between the earliest record
/// and `today`, cloning the most recent prior record's section/goal
/// structure with every goal reset to incomplete.
///
/// All gap days are created eagerly, interior holes included. With no
/// records at all there is nothing to fill: the first record is created on
/// demand by the editor. Returns the number of days synthesized.
pub async fn fill_missing(store: &RecordStore, today: Day) -> Result<usize, TrackerError> {
    let records = store.records().await?;
    let Some(start) = records.first().map(|r| r.date) else {
        return Ok(0);
    };

    let mut by_date: BTreeMap<Day, DailyRecord> =
        records.into_iter().map(|r| (r.date, r)).collect();

    let mut synthesized = 0;
    let mut filled: Vec<DailyRecord> = Vec::new();
    let mut day = start;
    while day <= today {
        match by_date.remove(&day) {
            Some(record) => filled.push(record),
            None => {
                // The walk starts at an existing record, so there is always
                // a prior day to clone from.
                let Some(template) = filled.last() else { break };
                log::info!("synthesizing record for missing day {day}");
                let sections = template.sections.iter().map(|s| s.reset_clone()).collect();
                filled.push(DailyRecord { date: day, sections });
                synthesized += 1;
            }
        }
        day = day.next();
    }
    // Records dated past today (clock skew) are kept untouched.
    filled.extend(by_date.into_values());

    if synthesized > 0 {
        store.save_records(filled).await?;
    }
    Ok(synthesized)
}

/// Drop records and history entries older than the retention window.
/// Returns `(pruned_records, pruned_history)`.
pub async fn prune(store: &RecordStore, today: Day) -> Result<(usize, usize), TrackerError> {
    let cutoff = today.minus_days(RETENTION_DAYS as u32);

    let mut records = store.records().await?;
    let before = records.len();
    records.retain(|r| r.date >= cutoff);
    let pruned_records = before - records.len();
    if pruned_records > 0 {
        store.save_records(records).await?;
    }

    let mut history = store.history().await?;
    let before = history.len();
    history.retain(|e| e.date >= cutoff);
    let pruned_history = before - history.len();
    if pruned_history > 0 {
        store.save_history(history).await?;
    }

    if pruned_records > 0 || pruned_history > 0 {
        log::info!(
            "pruned {pruned_records} record(s) and {pruned_history} history entry(ies) older than {cutoff}"
        );
    }
    Ok((pruned_records, pruned_history))
}
