//! Crate configuration.
//!
//! One TOML file holds the tunables a deployment might reasonably change:
//! the bus name peers rendezvous on, channel capacity, the history and
//! announcement bounds, and a default author for unattributed updates.
//!
//! Resolution order for the file path:
//! 1. `TM_CONFIG` environment variable (tests point this at a temp file)
//! 2. `~/.config/taskmesh/config.toml`
//!
//! A missing file yields the defaults; a malformed file is a real error.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::announce::ANNOUNCEMENT_CAPACITY;
use crate::history::HISTORY_CAPACITY;
use crate::realtime::DEFAULT_BUS_CAPACITY;

/// Environment variable overriding the config file location.
pub const CONFIG_ENV: &str = "TM_CONFIG";

/// Tunables for one peer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Name of the broadcast bus peers rendezvous on
    pub channel: String,

    /// Broadcast capacity before slow subscribers start losing messages
    pub bus_capacity: usize,

    /// Audit log bound
    pub history_capacity: usize,

    /// Notification queue bound
    pub announcement_capacity: usize,

    /// Author recorded for updates that carry none
    pub default_author: Option<String>,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            channel: "workflow".to_string(),
            bus_capacity: DEFAULT_BUS_CAPACITY,
            history_capacity: HISTORY_CAPACITY,
            announcement_capacity: ANNOUNCEMENT_CAPACITY,
            default_author: None,
        }
    }
}

impl SyncConfig {
    /// Load from the resolved config path; defaults when no file exists.
    pub fn load() -> crate::Result<Self> {
        match config_path() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    /// Load from an explicit path; defaults when the file does not exist.
    pub fn load_from(path: &Path) -> crate::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(path)?;
        let config = toml::from_str(&raw)?;
        tracing::debug!(path = %path.display(), "loaded config");
        Ok(config)
    }
}

/// Resolve the config file path: `TM_CONFIG` wins, then the XDG config dir.
fn config_path() -> Option<PathBuf> {
    if let Ok(path) = std::env::var(CONFIG_ENV) {
        return Some(PathBuf::from(path));
    }
    dirs::config_dir().map(|dir| dir.join("taskmesh").join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = SyncConfig::default();
        assert_eq!(config.channel, "workflow");
        assert_eq!(config.history_capacity, 30);
        assert_eq!(config.announcement_capacity, 5);
        assert!(config.default_author.is_none());
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = SyncConfig::load_from(&dir.path().join("nope.toml")).unwrap();
        assert_eq!(config, SyncConfig::default());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, r#"channel = "workflow-staging""#).unwrap();
        writeln!(file, r#"default_author = "ops-bot""#).unwrap();

        let config = SyncConfig::load_from(&path).unwrap();
        assert_eq!(config.channel, "workflow-staging");
        assert_eq!(config.default_author.as_deref(), Some("ops-bot"));
        assert_eq!(config.history_capacity, 30);
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "channel = [not toml").unwrap();
        assert!(matches!(
            SyncConfig::load_from(&path),
            Err(crate::Error::Config(_))
        ));
    }
}
