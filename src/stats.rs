//! Weekly statistics over the bounded completion-history log.

use std::collections::{BTreeMap, HashMap};

use crate::error::TrackerError;
use crate::store::RecordStore;
use crate::types::{GoalRef, WeeklyStats};

/// Display name for a goal that no longer exists in the live record.
const UNKNOWN_GOAL: &str = "Unknown Goal";

/// Most/least completed goals by frequency across the history window, plus
/// per-day section snapshots for calendar and trend rendering.
///
/// Ties are not broken: every goal at the maximum frequency is reported,
/// and every goal at the minimum frequency among goals completed at least
/// once. Goals never completed in the window have no entry and are
/// excluded rather than reported as "least". Display names resolve against
/// the latest daily record; a goal deleted since gets a placeholder name.
pub async fn weekly_stats(store: &RecordStore) -> Result<WeeklyStats, TrackerError> {
    let history = store.history().await?;
    if history.is_empty() {
        return Ok(WeeklyStats::default());
    }

    let mut frequency: HashMap<&str, usize> = HashMap::new();
    let mut daily_completions = BTreeMap::new();
    for entry in &history {
        for goal_id in &entry.completed_goals {
            *frequency.entry(goal_id.as_str()).or_insert(0) += 1;
        }
        daily_completions.insert(entry.date, entry.section_data.clone());
    }

    if frequency.is_empty() {
        return Ok(WeeklyStats {
            daily_completions,
            ..WeeklyStats::default()
        });
    }

    let live = store.records().await?.into_iter().next_back();
    let resolve = |id: &str| GoalRef {
        id: id.to_string(),
        title: live
            .as_ref()
            .and_then(|r| r.goal(id))
            .map(|g| g.title.clone())
            .unwrap_or_else(|| UNKNOWN_GOAL.to_string()),
    };

    let max = frequency.values().copied().max().unwrap_or(0);
    let min = frequency.values().copied().min().unwrap_or(0);

    let mut most_completed_goals: Vec<GoalRef> = frequency
        .iter()
        .filter(|(_, &count)| count == max)
        .map(|(id, _)| resolve(id))
        .collect();
    let mut least_completed_goals: Vec<GoalRef> = frequency
        .iter()
        .filter(|(_, &count)| count == min)
        .map(|(id, _)| resolve(id))
        .collect();
    // map iteration order is arbitrary; keep the output stable
    most_completed_goals.sort_by(|a, b| a.id.cmp(&b.id));
    least_completed_goals.sort_by(|a, b| a.id.cmp(&b.id));

    Ok(WeeklyStats {
        most_completed_goals,
        least_completed_goals,
        daily_completions,
    })
}
