//! Pure weighted-score calculator. No I/O, no side effects.

use crate::types::Goal;

/// Sum of necessity weights over all goals, completed or not.
pub fn total_score(goals: &[Goal]) -> u32 {
    goals.iter().map(|g| u32::from(g.score)).sum()
}

/// Sum of necessity weights over completed goals only.
pub fn completed_score(goals: &[Goal]) -> u32 {
    goals
        .iter()
        .filter(|g| g.completed)
        .map(|g| u32::from(g.score))
        .sum()
}

#[cfg(test)]
mod tests {
    use rand::RngExt;

    use super::*;
    use crate::types::Goal;

    fn goal(id: &str, score: u8, completed: bool) -> Goal {
        Goal {
            id: id.to_string(),
            title: id.to_uppercase(),
            score,
            completed,
            section_title: "Health".to_string(),
            creation_date: chrono::Utc::now(),
        }
    }

    #[test]
    fn test_empty_list_scores_zero() {
        assert_eq!(total_score(&[]), 0);
        assert_eq!(completed_score(&[]), 0);
    }

    #[test]
    fn test_scores_on_generated_goal_lists() {
        let mut rng = rand::rng();
        for _ in 0..250 {
            let goals: Vec<Goal> = (0..rng.random_range(0..20))
                .map(|i| goal(&format!("g{i}"), rng.random_range(1..=5), rng.random()))
                .collect();

            let total = total_score(&goals);
            let completed = completed_score(&goals);

            // completed and remaining weights partition the total
            let remaining: u32 = goals
                .iter()
                .filter(|g| !g.completed)
                .map(|g| u32::from(g.score))
                .sum();
            assert_eq!(completed + remaining, total);
            assert!(completed <= total);
        }
    }

    #[test]
    fn test_toggling_moves_completed_score_by_the_weight() {
        let mut goals = vec![goal("walk", 3, false), goal("gym", 2, true)];
        let before = completed_score(&goals);
        goals[0].completed = true;
        assert_eq!(completed_score(&goals), before + 3);
        goals[0].completed = false;
        assert_eq!(completed_score(&goals), before);
    }
}
