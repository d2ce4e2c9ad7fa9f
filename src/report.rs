//! Serializable weekly summary handed to the external feedback service.
//!
//! The narrative generation happens outside the core; the obligation here
//! is a stable summary shape covering the past week's records.

use serde::{Deserialize, Serialize};

use crate::dates::Day;
use crate::error::TrackerError;
use crate::store::RecordStore;
use crate::types::SectionData;

/// Week window for the summary, today inclusive.
const SUMMARY_WINDOW_DAYS: u32 = 7;

/// One day's worth of section summaries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DaySummary {
    pub date: Day,
    pub sections: Vec<SectionSummary>,
}

/// Compact per-section completion figures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionSummary {
    pub title: String,
    pub color: String,
    pub total_score: u32,
    pub completed_score: u32,
    pub goals_completed: usize,
    pub total_goals: usize,
}

impl SectionSummary {
    fn from_section(section: &SectionData) -> Self {
        SectionSummary {
            title: section.title.clone(),
            color: section.color.clone(),
            total_score: section.total_score,
            completed_score: section.completed_score,
            goals_completed: section.goals.iter().filter(|g| g.completed).count(),
            total_goals: section.goals.len(),
        }
    }
}

/// Summaries for the records of the past week, oldest first.
pub async fn weekly_summary(
    store: &RecordStore,
    today: Day,
) -> Result<Vec<DaySummary>, TrackerError> {
    let records = store.records().await?;
    Ok(records
        .iter()
        .filter(|r| r.date.within_last(today, SUMMARY_WINDOW_DAYS))
        .map(|r| DaySummary {
            date: r.date,
            sections: r.sections.iter().map(SectionSummary::from_section).collect(),
        })
        .collect())
}
