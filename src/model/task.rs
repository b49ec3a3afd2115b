use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Task priority. Ordering is sort precedence: `High < Medium < Low`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    #[default]
    Medium,
    Low,
}

impl Priority {
    pub const ALL: [Priority; 3] = [Priority::High, Priority::Medium, Priority::Low];

    pub fn key(self) -> &'static str {
        match self {
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
        }
    }

    /// Badge text shown next to a task
    pub fn label(self) -> &'static str {
        match self {
            Priority::High => "high priority",
            Priority::Medium => "medium priority",
            Priority::Low => "low priority",
        }
    }

    /// Marker glyph used in badges and the priority selector
    pub fn marker(self) -> &'static str {
        match self {
            Priority::High => "\u{25B2}",
            Priority::Medium => "\u{25C6}",
            Priority::Low => "\u{25BC}",
        }
    }

    /// Cycle high → medium → low → high (priority selector)
    pub fn cycle(self) -> Priority {
        match self {
            Priority::High => Priority::Medium,
            Priority::Medium => Priority::Low,
            Priority::Low => Priority::High,
        }
    }

    pub fn parse(s: &str) -> Option<Priority> {
        match s.trim().to_ascii_lowercase().as_str() {
            "high" | "h" => Some(Priority::High),
            "medium" | "med" | "m" => Some(Priority::Medium),
            "low" | "l" => Some(Priority::Low),
            _ => None,
        }
    }
}

/// A single planner task
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Immutable for the task's lifetime
    pub id: Uuid,
    /// Never empty or whitespace-only once stored
    pub text: String,
    pub completed: bool,
    pub priority: Priority,
    /// Immutable for the task's lifetime
    pub created_at: DateTime<Utc>,
}

impl Task {
    /// Create a new incomplete task. Returns `None` when `text` trims to empty.
    pub fn new(text: &str, priority: Priority, created_at: DateTime<Utc>) -> Option<Self> {
        let text = normalize_text(text)?;
        Some(Task {
            id: Uuid::new_v4(),
            text,
            completed: false,
            priority,
            created_at,
        })
    }

    /// First eight hex digits of the id, as shown in lists and accepted by the CLI
    pub fn short_id(&self) -> String {
        self.id.simple().to_string()[..8].to_string()
    }
}

/// Partial update for a task. `None` fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskPatch {
    pub text: Option<String>,
    pub priority: Option<Priority>,
    pub completed: Option<bool>,
}

impl TaskPatch {
    pub fn text(text: impl Into<String>) -> Self {
        TaskPatch {
            text: Some(text.into()),
            ..Default::default()
        }
    }

    pub fn priority(priority: Priority) -> Self {
        TaskPatch {
            priority: Some(priority),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_none() && self.priority.is_none() && self.completed.is_none()
    }
}

/// Trim task text; `None` if nothing is left.
pub fn normalize_text(text: &str) -> Option<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
