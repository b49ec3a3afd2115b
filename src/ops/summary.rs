use crate::model::day::Day;

use super::store::TaskStore;

/// Derived counts for one day. Built fresh from the store on every read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DaySummary {
    pub day: Day,
    pub total: usize,
    pub completed: usize,
}

impl DaySummary {
    pub fn for_day(store: &TaskStore, day: Day) -> Self {
        DaySummary {
            day,
            total: store.total_count(day),
            completed: store.completed_count(day),
        }
    }

    pub fn remaining(&self) -> usize {
        self.total.saturating_sub(self.completed)
    }

    /// `completed / total * 100`, or 0 for an empty day
    pub fn progress_percent(&self) -> f64 {
        progress_percent(self.completed, self.total)
    }

    /// Rounded percentage for display
    pub fn progress_display(&self) -> u32 {
        self.progress_percent().round() as u32
    }

    /// At least one task and all of them done
    pub fn is_complete(&self) -> bool {
        self.total > 0 && self.completed == self.total
    }
}

pub fn progress_percent(completed: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        completed as f64 / total as f64 * 100.0
    }
}

/// Summaries for all seven days in week order
pub fn week_summary(store: &TaskStore) -> Vec<DaySummary> {
    Day::ALL
        .iter()
        .map(|&day| DaySummary::for_day(store, day))
        .collect()
}

/// "task" / "tasks"
pub fn task_noun(count: usize) -> &'static str {
    if count == 1 { "task" } else { "tasks" }
}

/// Text progress bar of `width` cells, filled proportionally to `percent`.
pub fn progress_bar(percent: f64, width: usize) -> String {
    let filled = ((percent.clamp(0.0, 100.0) / 100.0) * width as f64).round() as usize;
    let filled = filled.min(width);
    format!(
        "{}{}",
        "\u{2588}".repeat(filled),
        "\u{2591}".repeat(width - filled)
    )
}
