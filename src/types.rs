//! Core data model: goals, sections, daily records, completion history.
//!
//! Field names serialize in camelCase to match the JSON documents the
//! mobile app persists (`totalScore`, `completedGoals`, `sectionData`,
//! `creationDate`).
//!
//! Sections always carry a goals list, possibly empty. There is no
//! goals-optional variant, and a goal's membership is determined solely by
//! which day's record contains it.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::dates::Day;
use crate::score;

/// Lowest allowed necessity weight.
pub const MIN_SCORE: u8 = 1;
/// Highest allowed necessity weight.
pub const MAX_SCORE: u8 = 5;

/// A single trackable task, scoped to one section on one day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    /// Stable across days: records regenerated by carry-over keep the same
    /// id, so completion-frequency stats remain meaningful over the week.
    pub id: String,
    pub title: String,
    /// Necessity weight, `MIN_SCORE..=MAX_SCORE`.
    pub score: u8,
    pub completed: bool,
    /// Same-day lookup key into the owning record's sections, not a durable
    /// relation across days.
    pub section_title: String,
    pub creation_date: DateTime<Utc>,
}

/// A user-defined category with its derived scores and owned goals for one
/// day. `total_score` and `completed_score` are derived from the goal list
/// and recomputed after every mutation, never set directly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionData {
    pub title: String,
    /// Display hint, opaque to the core.
    pub color: String,
    pub total_score: u32,
    pub completed_score: u32,
    #[serde(default)]
    pub goals: Vec<Goal>,
}

impl SectionData {
    /// A fresh section with no goals and zero scores.
    pub fn new(title: impl Into<String>, color: impl Into<String>) -> Self {
        SectionData {
            title: title.into(),
            color: color.into(),
            total_score: 0,
            completed_score: 0,
            goals: Vec::new(),
        }
    }

    /// Re-derive both scores from the goal list. Runs after every goal-list
    /// mutation, before persisting.
    pub fn recompute_scores(&mut self) {
        self.total_score = score::total_score(&self.goals);
        self.completed_score = score::completed_score(&self.goals);
    }

    /// Same structure (titles, colors, weights, goal ids) with every goal
    /// reset to incomplete. Used for carry-over into a new day.
    pub fn reset_clone(&self) -> SectionData {
        let mut clone = self.clone();
        for goal in &mut clone.goals {
            goal.completed = false;
        }
        clone.recompute_scores();
        clone
    }
}

/// The full snapshot of all sections and goals for one calendar date.
/// At most one record exists per date; section titles are unique within it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyRecord {
    pub date: Day,
    #[serde(default)]
    pub sections: Vec<SectionData>,
}

impl DailyRecord {
    pub fn new(date: Day) -> Self {
        DailyRecord {
            date,
            sections: Vec::new(),
        }
    }

    pub fn section(&self, title: &str) -> Option<&SectionData> {
        self.sections.iter().find(|s| s.title == title)
    }

    pub fn section_mut(&mut self, title: &str) -> Option<&mut SectionData> {
        self.sections.iter_mut().find(|s| s.title == title)
    }

    /// Locate a goal by id across all sections.
    pub fn goal(&self, goal_id: &str) -> Option<&Goal> {
        self.sections
            .iter()
            .flat_map(|s| s.goals.iter())
            .find(|g| g.id == goal_id)
    }
}

/// Archived end-of-day summary, the unit of the bounded history log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyCompletion {
    /// The day this entry closes, not the day the archive ran.
    pub date: Day,
    /// Ids of goals completed by end of day, across all sections.
    pub completed_goals: Vec<String>,
    /// Deep copy of the sections as they stood at end of day.
    #[serde(default)]
    pub section_data: Vec<SectionData>,
}

/// Goal identity with a display name resolved at aggregation time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalRef {
    pub id: String,
    pub title: String,
}

/// Weekly dashboard aggregate derived from the history log.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyStats {
    pub most_completed_goals: Vec<GoalRef>,
    pub least_completed_goals: Vec<GoalRef>,
    pub daily_completions: BTreeMap<Day, Vec<SectionData>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn goal(id: &str, score: u8, completed: bool) -> Goal {
        Goal {
            id: id.to_string(),
            title: id.to_uppercase(),
            score,
            completed,
            section_title: "Health".to_string(),
            creation_date: Utc::now(),
        }
    }

    #[test]
    fn test_recompute_scores_follows_goal_list() {
        let mut section = SectionData::new("Health", "#00FF00");
        assert_eq!(section.total_score, 0);

        section.goals.push(goal("walk", 3, true));
        section.goals.push(goal("gym", 2, false));
        section.recompute_scores();
        assert_eq!(section.total_score, 5);
        assert_eq!(section.completed_score, 3);

        section.goals.retain(|g| g.id != "walk");
        section.recompute_scores();
        assert_eq!(section.total_score, 2);
        assert_eq!(section.completed_score, 0);
    }

    #[test]
    fn test_reset_clone_keeps_structure_drops_completion() {
        let mut section = SectionData::new("Health", "#00FF00");
        section.goals.push(goal("walk", 3, true));
        section.recompute_scores();

        let reset = section.reset_clone();
        assert_eq!(reset.title, "Health");
        assert_eq!(reset.goals[0].id, "walk");
        assert_eq!(reset.goals[0].score, 3);
        assert!(!reset.goals[0].completed);
        assert_eq!(reset.total_score, 3);
        assert_eq!(reset.completed_score, 0);
        // the source is untouched
        assert!(section.goals[0].completed);
    }

    #[test]
    fn test_camel_case_wire_format() {
        let mut section = SectionData::new("Health", "#00FF00");
        section.goals.push(goal("walk", 3, false));
        section.recompute_scores();

        let json = serde_json::to_value(&section).unwrap();
        assert!(json.get("totalScore").is_some());
        assert!(json.get("completedScore").is_some());
        assert!(json["goals"][0].get("sectionTitle").is_some());
        assert!(json["goals"][0].get("creationDate").is_some());
    }

    #[test]
    fn test_goals_default_to_empty_on_deserialize() {
        let record: DailyRecord = serde_json::from_str(
            r##"{"date":"2025-03-01","sections":[{"title":"Health","color":"#00FF00","totalScore":0,"completedScore":0}]}"##,
        )
        .unwrap();
        assert!(record.sections[0].goals.is_empty());
    }
}
