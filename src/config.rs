//! Configuration loading: an optional `.paneherder.yaml` in the current
//! directory, merged under defaults, with CLI flags applied on top by the
//! caller.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

const CONFIG_FILE_YAML: &str = ".paneherder.yaml";
const CONFIG_FILE_YML: &str = ".paneherder.yml";

fn default_interval_secs() -> u64 {
    30
}
fn default_long_cycle_delay_secs() -> u64 {
    30
}
fn default_short_cycle_delay_secs() -> u64 {
    5
}
fn default_short_cycle_count() -> u32 {
    5
}
fn default_max_cycles() -> u64 {
    1000
}
fn default_communication_delay_ms() -> u64 {
    200
}
fn default_history_capacity() -> usize {
    10
}
fn default_name_sequence() -> Vec<String> {
    vec!["manager1".to_string(), "manager2".to_string(), "secretary".to_string()]
}

/// The engine's cadence and timeout tunables, loadable from YAML.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct PaneherderConfig {
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,

    #[serde(default = "default_long_cycle_delay_secs")]
    pub long_cycle_delay_secs: u64,

    #[serde(default = "default_short_cycle_delay_secs")]
    pub short_cycle_delay_secs: u64,

    #[serde(default = "default_short_cycle_count")]
    pub short_cycle_count: u32,

    #[serde(default = "default_max_cycles")]
    pub max_cycles: u64,

    #[serde(default = "default_communication_delay_ms")]
    pub communication_delay_ms: u64,

    #[serde(default = "default_history_capacity")]
    pub history_capacity: usize,

    #[serde(default = "default_name_sequence")]
    pub name_sequence: Vec<String>,
}

impl Default for PaneherderConfig {
    fn default() -> Self {
        PaneherderConfig {
            interval_secs: default_interval_secs(),
            long_cycle_delay_secs: default_long_cycle_delay_secs(),
            short_cycle_delay_secs: default_short_cycle_delay_secs(),
            short_cycle_count: default_short_cycle_count(),
            max_cycles: default_max_cycles(),
            communication_delay_ms: default_communication_delay_ms(),
            history_capacity: default_history_capacity(),
            name_sequence: default_name_sequence(),
        }
    }
}

impl PaneherderConfig {
    /// Loads `.paneherder.yaml`/`.paneherder.yml` from the current directory
    /// if present, else returns the built-in defaults.
    pub fn load() -> anyhow::Result<Self> {
        if let Some(config) = Self::load_from_path(Path::new(CONFIG_FILE_YAML))? {
            return Ok(config);
        }
        if let Some(config) = Self::load_from_path(Path::new(CONFIG_FILE_YML))? {
            return Ok(config);
        }
        Ok(PaneherderConfig::default())
    }

    fn load_from_path(path: &Path) -> anyhow::Result<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }
        let contents = fs::read_to_string(path)?;
        let config: PaneherderConfig = serde_yaml::from_str(&contents)
            .map_err(|e| anyhow::anyhow!("failed to parse config at {}: {}", path.display(), e))?;
        Ok(Some(config))
    }

    /// Applies CLI overrides (each `Some` wins over the loaded/default
    /// value), the same precedence the teacher applies for CLI-over-file
    /// settings.
    pub fn apply_overrides(mut self, interval_secs: Option<u64>, max_cycles: Option<u64>) -> Self {
        if let Some(v) = interval_secs {
            self.interval_secs = v;
        }
        if let Some(v) = max_cycles {
            self.max_cycles = v;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_matches_spec_values() {
        let config = PaneherderConfig::default();
        assert_eq!(config.interval_secs, 30);
        assert_eq!(config.long_cycle_delay_secs, 30);
        assert_eq!(config.short_cycle_delay_secs, 5);
        assert_eq!(config.short_cycle_count, 5);
        assert_eq!(config.max_cycles, 1000);
        assert_eq!(config.communication_delay_ms, 200);
        assert_eq!(config.history_capacity, 10);
        assert_eq!(config.name_sequence, vec!["manager1", "manager2", "secretary"]);
    }

    #[test]
    fn load_from_path_returns_none_when_file_absent() {
        let result = PaneherderConfig::load_from_path(Path::new("/nonexistent/.paneherder.yaml")).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn load_from_path_parses_partial_yaml_with_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".paneherder.yaml");
        fs::write(&path, "interval_secs: 10\n").unwrap();
        let config = PaneherderConfig::load_from_path(&path).unwrap().unwrap();
        assert_eq!(config.interval_secs, 10);
        assert_eq!(config.max_cycles, 1000);
    }

    #[test]
    fn apply_overrides_prefers_cli_values() {
        let config = PaneherderConfig::default().apply_overrides(Some(5), None);
        assert_eq!(config.interval_secs, 5);
        assert_eq!(config.max_cycles, 1000);
    }
}
