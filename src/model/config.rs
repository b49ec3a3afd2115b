use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::day::Day;

/// Configuration from planner.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlannerConfig {
    #[serde(default)]
    pub ui: UiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// `"today"` or a day name. Default: `"monday"`.
    #[serde(default = "default_start_day")]
    pub start_day: String,
    #[serde(default = "default_true")]
    pub show_key_hints: bool,
    /// Theme color overrides, keyed by theme field name (`"#RRGGBB"` values)
    #[serde(default)]
    pub colors: HashMap<String, String>,
}

impl Default for UiConfig {
    fn default() -> Self {
        UiConfig {
            start_day: default_start_day(),
            show_key_hints: true,
            colors: HashMap::new(),
        }
    }
}

impl UiConfig {
    /// Resolve `start_day` against the given "today". Unknown values fall back to Monday.
    pub fn resolve_start_day(&self, today: Day) -> Day {
        if self.start_day.trim().eq_ignore_ascii_case("today") {
            today
        } else {
            Day::parse(&self.start_day).unwrap_or(Day::Monday)
        }
    }
}

fn default_start_day() -> String {
    "monday".to_string()
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_uses_defaults() {
        let config: PlannerConfig = toml::from_str("").unwrap();
        assert_eq!(config.ui.start_day, "monday");
        assert!(config.ui.show_key_hints);
        assert!(config.ui.colors.is_empty());
    }

    #[test]
    fn parses_ui_section() {
        let config: PlannerConfig = toml::from_str(
            r##"
[ui]
start_day = "today"
show_key_hints = false

[ui.colors]
background = "#000000"
"##,
        )
        .unwrap();
        assert_eq!(config.ui.start_day, "today");
        assert!(!config.ui.show_key_hints);
        assert_eq!(config.ui.colors.get("background").unwrap(), "#000000");
    }

    #[test]
    fn resolve_start_day() {
        let mut ui = UiConfig::default();
        assert_eq!(ui.resolve_start_day(Day::Thursday), Day::Monday);
        ui.start_day = "Today".into();
        assert_eq!(ui.resolve_start_day(Day::Thursday), Day::Thursday);
        ui.start_day = "fri".into();
        assert_eq!(ui.resolve_start_day(Day::Thursday), Day::Friday);
        ui.start_day = "someday".into();
        assert_eq!(ui.resolve_start_day(Day::Thursday), Day::Monday);
    }
}
