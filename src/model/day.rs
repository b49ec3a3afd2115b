use std::fmt;

use chrono::{Datelike, Weekday};
use serde::{Deserialize, Serialize};

/// One of the seven fixed weekdays that partition the planner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Day {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Day {
    /// All days in week order (Monday first)
    pub const ALL: [Day; 7] = [
        Day::Monday,
        Day::Tuesday,
        Day::Wednesday,
        Day::Thursday,
        Day::Friday,
        Day::Saturday,
        Day::Sunday,
    ];

    /// Storage key, also the serialized form (`"monday"`)
    pub fn key(self) -> &'static str {
        match self {
            Day::Monday => "monday",
            Day::Tuesday => "tuesday",
            Day::Wednesday => "wednesday",
            Day::Thursday => "thursday",
            Day::Friday => "friday",
            Day::Saturday => "saturday",
            Day::Sunday => "sunday",
        }
    }

    /// Full display label (`"Monday"`)
    pub fn label(self) -> &'static str {
        match self {
            Day::Monday => "Monday",
            Day::Tuesday => "Tuesday",
            Day::Wednesday => "Wednesday",
            Day::Thursday => "Thursday",
            Day::Friday => "Friday",
            Day::Saturday => "Saturday",
            Day::Sunday => "Sunday",
        }
    }

    /// Three-letter abbreviation (`"Mon"`)
    pub fn short(self) -> &'static str {
        &self.label()[..3]
    }

    /// Position in the week, Monday = 0
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn next(self) -> Day {
        Day::ALL[(self.index() + 1) % 7]
    }

    pub fn prev(self) -> Day {
        Day::ALL[(self.index() + 6) % 7]
    }

    pub fn from_weekday(weekday: Weekday) -> Day {
        match weekday {
            Weekday::Mon => Day::Monday,
            Weekday::Tue => Day::Tuesday,
            Weekday::Wed => Day::Wednesday,
            Weekday::Thu => Day::Thursday,
            Weekday::Fri => Day::Friday,
            Weekday::Sat => Day::Saturday,
            Weekday::Sun => Day::Sunday,
        }
    }

    /// The weekday of the host's local clock
    pub fn today() -> Day {
        Day::from_weekday(chrono::Local::now().weekday())
    }

    /// Parse a key, label or abbreviation, case-insensitively.
    pub fn parse(s: &str) -> Option<Day> {
        let needle = s.trim().to_ascii_lowercase();
        if needle.is_empty() {
            return None;
        }
        Day::ALL.into_iter().find(|day| {
            needle == day.key() || needle == day.short().to_ascii_lowercase()
        })
    }
}

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
