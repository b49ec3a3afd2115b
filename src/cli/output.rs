use serde::Serialize;

use crate::model::{Day, Task};
use crate::ops::summary::{DaySummary, progress_bar, task_noun};

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct DayListJson<'a> {
    pub day: Day,
    pub total: usize,
    pub completed: usize,
    pub progress: u32,
    pub tasks: Vec<&'a Task>,
}

#[derive(Serialize)]
pub struct DaySummaryJson {
    pub day: Day,
    pub total: usize,
    pub completed: usize,
    pub remaining: usize,
    pub progress: u32,
}

impl From<&DaySummary> for DaySummaryJson {
    fn from(s: &DaySummary) -> Self {
        DaySummaryJson {
            day: s.day,
            total: s.total,
            completed: s.completed,
            remaining: s.remaining(),
            progress: s.progress_display(),
        }
    }
}

// ---------------------------------------------------------------------------
// Text formatting
// ---------------------------------------------------------------------------

/// `[x] 1a2b3c4d  high    Buy milk`
pub fn format_task_line(task: &Task) -> String {
    format!(
        "{} {}  {} {:<6}  {}",
        if task.completed { "[x]" } else { "[ ]" },
        task.short_id(),
        task.priority.marker(),
        task.priority.key(),
        task.text
    )
}

/// Heading for `wk list`
pub fn format_day_heading(summary: &DaySummary) -> String {
    if summary.total == 0 {
        return format!("{}: no tasks", summary.day.label());
    }
    format!(
        "{}: {} of {} {} completed ({}%)",
        summary.day.label(),
        summary.completed,
        summary.total,
        task_noun(summary.total),
        summary.progress_display()
    )
}

/// One row of `wk week`
pub fn format_week_row(summary: &DaySummary) -> String {
    format!(
        "{}  {:>3}/{:<3} {:>3}%  {}",
        summary.day.short(),
        summary.completed,
        summary.total,
        summary.progress_display(),
        progress_bar(summary.progress_percent(), 10)
    )
}
