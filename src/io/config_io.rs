use std::fs;
use std::path::{Path, PathBuf};

use crate::model::config::PlannerConfig;

/// Error type for configuration I/O
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not read {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse planner.toml: {0}")]
    ParseError(#[from] toml::de::Error),
}

pub const CONFIG_FILE: &str = "planner.toml";

/// Environment variable overriding the data directory
pub const DATA_DIR_ENV: &str = "WEEKPLAN_DIR";

/// Resolve the data directory: explicit flag, then `$WEEKPLAN_DIR`, then the
/// platform data directory (`~/.local/share/weekplan` on Linux).
pub fn resolve_data_dir(explicit: Option<&Path>) -> PathBuf {
    if let Some(dir) = explicit {
        return dir.to_path_buf();
    }
    if let Some(dir) = std::env::var_os(DATA_DIR_ENV).filter(|v| !v.is_empty()) {
        return PathBuf::from(dir);
    }
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("weekplan")
}

/// Read `planner.toml` from the data directory. A missing file yields defaults.
pub fn read_config(data_dir: &Path) -> Result<PlannerConfig, ConfigError> {
    let path = data_dir.join(CONFIG_FILE);
    let text = match fs::read_to_string(&path) {
        Ok(text) => text,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Ok(PlannerConfig::default());
        }
        Err(e) => return Err(ConfigError::ReadError { path, source: e }),
    };
    Ok(toml::from_str(&text)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_config_is_default() {
        let tmp = TempDir::new().unwrap();
        let config = read_config(tmp.path()).unwrap();
        assert_eq!(config.ui.start_day, "monday");
    }

    #[test]
    fn reads_config_file() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join(CONFIG_FILE),
            "[ui]\nstart_day = \"sunday\"\n",
        )
        .unwrap();
        let config = read_config(tmp.path()).unwrap();
        assert_eq!(config.ui.start_day, "sunday");
    }

    #[test]
    fn invalid_config_is_parse_error() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(CONFIG_FILE), "[ui\nstart_day = ").unwrap();
        assert!(matches!(
            read_config(tmp.path()),
            Err(ConfigError::ParseError(_))
        ));
    }

    #[test]
    fn explicit_data_dir_wins() {
        let dir = resolve_data_dir(Some(Path::new("/tmp/planner")));
        assert_eq!(dir, PathBuf::from("/tmp/planner"));
    }
}
