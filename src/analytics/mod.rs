/// Goal progress projection
///
/// Read-side computation over the book list and the yearly goal. Nothing
/// here is stored; it is recomputed every time it is asked for.

use serde::Serialize;

use crate::domain::{Book, BookStatus};

/// Progress towards the yearly goal
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GoalProgress {
    /// Books with status `completed`
    pub completed_count: u32,
    /// All books on the list, whatever their status
    pub total_count: u32,
    /// The goal used for the calculation (0 when none is set)
    pub goal: u32,
    /// round(completed / max(1, goal) * 100), clamped to 0..=100
    pub percent: u8,
    /// Empty "add a book" slots needed to fill the list up to the goal
    pub placeholder_slots: u32,
}

impl GoalProgress {
    /// Project progress from the current list and goal
    pub fn compute(books: &[Book], goal: u32) -> Self {
        let completed_count = books
            .iter()
            .filter(|b| b.status == BookStatus::Completed)
            .count() as u32;
        let total_count = books.len() as u32;

        let ratio = f64::from(completed_count) / f64::from(goal.max(1));
        let percent = (ratio * 100.0).round().clamp(0.0, 100.0) as u8;

        Self {
            completed_count,
            total_count,
            goal,
            percent,
            placeholder_slots: goal.saturating_sub(total_count),
        }
    }

    /// Books still to complete before the goal is met
    pub fn remaining(&self) -> u32 {
        self.goal.saturating_sub(self.completed_count)
    }

    pub fn goal_met(&self) -> bool {
        self.goal > 0 && self.completed_count >= self.goal
    }

    /// Get an encouraging message based on progress
    pub fn message(&self) -> String {
        if self.goal == 0 {
            return "No reading goal set yet. Save a yearly goal to start tracking!".to_string();
        }
        match self.percent {
            0 => format!("Ready to start: {} books to go this year.", self.remaining()),
            1..=49 => format!("Good start! {} of {} books completed.", self.completed_count, self.goal),
            50..=99 => format!(
                "Over halfway there! Only {} more to reach your goal.",
                self.remaining()
            ),
            _ => format!(
                "Goal reached! {} books completed against a goal of {}.",
                self.completed_count, self.goal
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn books(completed: usize, other: usize) -> Vec<Book> {
        let mut out = Vec::new();
        for i in 0..completed {
            let mut b = Book::new(format!("done {}", i), out.len() as i64 + 1);
            b.transition_to(BookStatus::Completed, Utc::now());
            out.push(b);
        }
        for i in 0..other {
            out.push(Book::new(format!("todo {}", i), out.len() as i64 + 1));
        }
        out
    }

    #[test]
    fn test_zero_goal_no_division_by_zero() {
        let p = GoalProgress::compute(&[], 0);
        assert_eq!(p.percent, 0);
        assert_eq!(p.placeholder_slots, 0);
        assert!(!p.goal_met());
    }

    #[test]
    fn test_overshoot_is_clamped() {
        let p = GoalProgress::compute(&books(7, 0), 5);
        assert_eq!(p.completed_count, 7);
        assert_eq!(p.percent, 100);
        assert_eq!(p.placeholder_slots, 0);
        assert!(p.goal_met());
    }

    #[test]
    fn test_zero_goal_with_completions() {
        // max(1, goal) makes one completion count as the whole goal
        let p = GoalProgress::compute(&books(1, 0), 0);
        assert_eq!(p.percent, 100);
    }

    #[test]
    fn test_rounding_and_placeholders() {
        let p = GoalProgress::compute(&books(1, 1), 3);
        assert_eq!(p.percent, 33);
        assert_eq!(p.placeholder_slots, 1);

        let p = GoalProgress::compute(&books(2, 0), 3);
        assert_eq!(p.percent, 67);

        // 1/8 = 12.5% rounds half up
        let p = GoalProgress::compute(&books(1, 0), 8);
        assert_eq!(p.percent, 13);
        assert_eq!(p.placeholder_slots, 7);
    }

    #[test]
    fn test_placeholders_count_all_books() {
        let p = GoalProgress::compute(&books(0, 4), 10);
        assert_eq!(p.percent, 0);
        assert_eq!(p.placeholder_slots, 6);
        assert_eq!(p.remaining(), 10);
    }
}
