use std::cmp::Ordering;

use crate::model::task::Task;

/// Display precedence: incomplete before completed, then high → medium → low,
/// then newest first.
pub fn compare_for_display(a: &Task, b: &Task) -> Ordering {
    a.completed
        .cmp(&b.completed)
        .then_with(|| a.priority.cmp(&b.priority))
        .then_with(|| b.created_at.cmp(&a.created_at))
}

/// Sorted view of a day's tasks. Stable: full ties keep stored order.
/// The stored collection is not touched.
pub fn display_order(tasks: &[Task]) -> Vec<&Task> {
    let mut sorted: Vec<&Task> = tasks.iter().collect();
    sorted.sort_by(|a, b| compare_for_display(a, b));
    sorted
}
