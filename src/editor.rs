//! Section and goal mutations against the open day's record.
//!
//! Every operation validates its inputs before touching storage, then reads
//! the full record collection, applies the change in memory, and writes the
//! whole collection back in one atomic replace. A crash mid-operation
//! leaves either the old or the new state, never a record whose derived
//! scores disagree with its goal list.
//!
//! Past days are immutable history: mutations against any date other than
//! the open day are rejected up front.

use chrono::Utc;
use uuid::Uuid;

use crate::dates::Day;
use crate::error::TrackerError;
use crate::store::RecordStore;
use crate::types::{DailyRecord, Goal, SectionData, MAX_SCORE, MIN_SCORE};

fn ensure_open_day(date: Day, today: Day) -> Result<(), TrackerError> {
    if date != today {
        return Err(TrackerError::HistoricalEdit { date, today });
    }
    Ok(())
}

fn validate_title(title: &str) -> Result<(), TrackerError> {
    if title.trim().is_empty() {
        return Err(TrackerError::EmptyTitle);
    }
    Ok(())
}

fn validate_score(score: u8) -> Result<(), TrackerError> {
    if !(MIN_SCORE..=MAX_SCORE).contains(&score) {
        return Err(TrackerError::ScoreOutOfRange(score));
    }
    Ok(())
}

/// Load the collection plus the index of `date`'s record, or `missing`
/// when the day has no record yet.
async fn load_day(
    store: &RecordStore,
    date: Day,
    missing: impl FnOnce() -> TrackerError,
) -> Result<(Vec<DailyRecord>, usize), TrackerError> {
    let records = store.records().await?;
    match records.iter().position(|r| r.date == date) {
        Some(idx) => Ok((records, idx)),
        None => Err(missing()),
    }
}

/// The section owning a goal, located by goal id.
fn section_of_goal<'a>(
    record: &'a mut DailyRecord,
    goal_id: &str,
) -> Option<&'a mut SectionData> {
    record
        .sections
        .iter_mut()
        .find(|s| s.goals.iter().any(|g| g.id == goal_id))
}

/// Add an empty section to the open day, creating the day's record on
/// demand (the only implicit record creation besides gap fill).
pub async fn add_section(
    store: &RecordStore,
    today: Day,
    date: Day,
    title: &str,
    color: &str,
) -> Result<(), TrackerError> {
    ensure_open_day(date, today)?;
    validate_title(title)?;
    let title = title.trim();

    let mut records = store.records().await?;
    let idx = match records.iter().position(|r| r.date == date) {
        Some(idx) => idx,
        None => {
            records.push(DailyRecord::new(date));
            records.len() - 1
        }
    };
    let record = &mut records[idx];
    if record.section(title).is_some() {
        return Err(TrackerError::DuplicateTitle(title.to_string()));
    }
    record.sections.push(SectionData::new(title, color));

    store.save_records(records).await?;
    Ok(())
}

/// Rename and recolor a section, preserving its goals. Owned goals'
/// back-references follow the new title.
pub async fn update_section(
    store: &RecordStore,
    today: Day,
    date: Day,
    old_title: &str,
    new_title: &str,
    new_color: &str,
) -> Result<(), TrackerError> {
    ensure_open_day(date, today)?;
    validate_title(new_title)?;
    let new_title = new_title.trim();

    let (mut records, idx) = load_day(store, date, || {
        TrackerError::SectionNotFound(old_title.to_string())
    })
    .await?;
    let record = &mut records[idx];

    let Some(pos) = record.sections.iter().position(|s| s.title == old_title) else {
        return Err(TrackerError::SectionNotFound(old_title.to_string()));
    };
    let collision = record
        .sections
        .iter()
        .enumerate()
        .any(|(i, s)| i != pos && s.title == new_title);
    if collision {
        return Err(TrackerError::DuplicateTitle(new_title.to_string()));
    }

    let section = &mut record.sections[pos];
    section.title = new_title.to_string();
    section.color = new_color.to_string();
    for goal in &mut section.goals {
        goal.section_title = new_title.to_string();
    }

    store.save_records(records).await?;
    Ok(())
}

/// Remove a section and all its goals for the open day only; prior days'
/// history is untouched.
pub async fn delete_section(
    store: &RecordStore,
    today: Day,
    date: Day,
    title: &str,
) -> Result<(), TrackerError> {
    ensure_open_day(date, today)?;

    let (mut records, idx) = load_day(store, date, || {
        TrackerError::SectionNotFound(title.to_string())
    })
    .await?;
    let record = &mut records[idx];

    let before = record.sections.len();
    record.sections.retain(|s| s.title != title);
    if record.sections.len() == before {
        return Err(TrackerError::SectionNotFound(title.to_string()));
    }

    store.save_records(records).await?;
    Ok(())
}

/// Add a goal to a section of the open day. Returns the assigned goal id.
pub async fn add_goal(
    store: &RecordStore,
    today: Day,
    date: Day,
    section_title: &str,
    title: &str,
    score: u8,
) -> Result<String, TrackerError> {
    ensure_open_day(date, today)?;
    validate_title(title)?;
    validate_score(score)?;

    let (mut records, idx) = load_day(store, date, || {
        TrackerError::SectionNotFound(section_title.to_string())
    })
    .await?;
    let Some(section) = records[idx].section_mut(section_title) else {
        return Err(TrackerError::SectionNotFound(section_title.to_string()));
    };

    let goal = Goal {
        id: Uuid::new_v4().to_string(),
        title: title.trim().to_string(),
        score,
        completed: false,
        section_title: section.title.clone(),
        creation_date: Utc::now(),
    };
    let id = goal.id.clone();
    section.goals.push(goal);
    section.recompute_scores();

    store.save_records(records).await?;
    Ok(id)
}

/// Retitle and reweight a goal, keeping its id, completion flag, and
/// creation date.
pub async fn update_goal(
    store: &RecordStore,
    today: Day,
    date: Day,
    goal_id: &str,
    new_title: &str,
    new_score: u8,
) -> Result<(), TrackerError> {
    ensure_open_day(date, today)?;
    validate_title(new_title)?;
    validate_score(new_score)?;

    let (mut records, idx) = load_day(store, date, || {
        TrackerError::GoalNotFound(goal_id.to_string())
    })
    .await?;
    let Some(section) = section_of_goal(&mut records[idx], goal_id) else {
        return Err(TrackerError::GoalNotFound(goal_id.to_string()));
    };

    if let Some(goal) = section.goals.iter_mut().find(|g| g.id == goal_id) {
        goal.title = new_title.trim().to_string();
        goal.score = new_score;
    }
    section.recompute_scores();

    store.save_records(records).await?;
    Ok(())
}

/// Remove a goal from the open day.
pub async fn delete_goal(
    store: &RecordStore,
    today: Day,
    date: Day,
    goal_id: &str,
) -> Result<(), TrackerError> {
    ensure_open_day(date, today)?;

    let (mut records, idx) = load_day(store, date, || {
        TrackerError::GoalNotFound(goal_id.to_string())
    })
    .await?;
    let Some(section) = section_of_goal(&mut records[idx], goal_id) else {
        return Err(TrackerError::GoalNotFound(goal_id.to_string()));
    };

    section.goals.retain(|g| g.id != goal_id);
    section.recompute_scores();

    store.save_records(records).await?;
    Ok(())
}

/// Flip a goal's completion flag. Returns the new completed state.
pub async fn toggle_goal(
    store: &RecordStore,
    today: Day,
    date: Day,
    goal_id: &str,
) -> Result<bool, TrackerError> {
    ensure_open_day(date, today)?;

    let (mut records, idx) = load_day(store, date, || {
        TrackerError::GoalNotFound(goal_id.to_string())
    })
    .await?;
    let Some(section) = section_of_goal(&mut records[idx], goal_id) else {
        return Err(TrackerError::GoalNotFound(goal_id.to_string()));
    };

    let mut now_completed = false;
    if let Some(goal) = section.goals.iter_mut().find(|g| g.id == goal_id) {
        goal.completed = !goal.completed;
        now_completed = goal.completed;
    }
    section.recompute_scores();

    store.save_records(records).await?;
    Ok(now_completed)
}
