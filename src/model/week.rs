use std::collections::HashSet;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::day::Day;
use super::task::Task;

/// The complete task collection: every day mapped to its tasks in stored order.
///
/// Always holds all seven days in week order, so lookups never miss.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "IndexMap<Day, Vec<Task>>", into = "IndexMap<Day, Vec<Task>>")]
pub struct Week {
    days: IndexMap<Day, Vec<Task>>,
}

impl Default for Week {
    fn default() -> Self {
        Week::new()
    }
}

impl Week {
    /// An empty week
    pub fn new() -> Self {
        Week {
            days: Day::ALL.into_iter().map(|d| (d, Vec::new())).collect(),
        }
    }

    pub fn tasks(&self, day: Day) -> &[Task] {
        self.days.get(&day).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn tasks_mut(&mut self, day: Day) -> &mut Vec<Task> {
        self.days.entry(day).or_default()
    }

    /// Iterate days in week order with their tasks
    pub fn iter(&self) -> impl Iterator<Item = (Day, &[Task])> {
        self.days.iter().map(|(d, tasks)| (*d, tasks.as_slice()))
    }

    /// Total number of tasks across all days
    pub fn len(&self) -> usize {
        self.days.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Parse a persisted document.
    pub fn from_json(blob: &str) -> Result<Week, serde_json::Error> {
        serde_json::from_str(blob)
    }

    /// Serialize the whole collection as a pretty-printed document.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

impl From<IndexMap<Day, Vec<Task>>> for Week {
    fn from(mut loaded: IndexMap<Day, Vec<Task>>) -> Self {
        // Rebuild in week order; days missing from the document start empty.
        // Blank texts cannot come from the store, so they are dropped here.
        let days = Day::ALL
            .into_iter()
            .map(|d| {
                let mut tasks = loaded.shift_remove(&d).unwrap_or_default();
                tasks.retain(|t| !t.text.trim().is_empty());
                dedupe_ids(&mut tasks);
                (d, tasks)
            })
            .collect();
        Week { days }
    }
}

/// Ids are unique within a day. A repeated id keeps its first task; later
/// copies get a fresh id so each row can be addressed on its own.
fn dedupe_ids(tasks: &mut [Task]) {
    let mut seen = HashSet::with_capacity(tasks.len());
    for task in tasks.iter_mut() {
        while !seen.insert(task.id) {
            task.id = Uuid::new_v4();
        }
    }
}

impl From<Week> for IndexMap<Day, Vec<Task>> {
    fn from(week: Week) -> Self {
        week.days
    }
}
