use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use crate::{
    model::{KindSelector, OutputMode},
    provider::aviationweather::DEFAULT_BASE_URL,
};

pub const DEFAULT_STATION: &str = "KJFK";
pub const DEFAULT_DEADLINE_SECS: u64 = 12;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 8;

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// default_station = "KBOS"
/// default_kind = "metar"
/// deadline_secs = 10
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Config {
    /// Station used when none is given on the command line.
    pub default_station: Option<String>,

    /// "metar", "taf" or "both".
    pub default_kind: Option<String>,

    /// "human", "raw" or "json".
    pub default_output: Option<String>,

    /// Shared wall-clock budget for all fetches of a run.
    pub deadline_secs: Option<u64>,

    pub request_timeout_secs: Option<u64>,

    pub base_url: Option<String>,
}

impl Config {
    pub fn default_station(&self) -> String {
        self.default_station
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(DEFAULT_STATION)
            .to_uppercase()
    }

    pub fn default_kind(&self) -> Result<KindSelector> {
        match &self.default_kind {
            Some(s) => KindSelector::try_from(s.as_str()),
            None => Ok(KindSelector::default()),
        }
    }

    pub fn default_output(&self) -> Result<OutputMode> {
        match &self.default_output {
            Some(s) => OutputMode::try_from(s.as_str()),
            None => Ok(OutputMode::default()),
        }
    }

    pub fn deadline(&self) -> Duration {
        Duration::from_secs(self.deadline_secs.unwrap_or(DEFAULT_DEADLINE_SECS))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS))
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL)
    }

    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            // First run: no config file, return empty.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        cfg.default_kind()
            .and(cfg.default_output())
            .with_context(|| format!("Invalid value in config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::config_file_path()?;
        self.save_to(&path)?;
        Ok(path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "clweather", "clweather")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_uses_builtin_defaults() {
        let cfg = Config::default();

        assert_eq!(cfg.default_station(), "KJFK");
        assert_eq!(cfg.default_kind().unwrap(), KindSelector::Both);
        assert_eq!(cfg.default_output().unwrap(), OutputMode::Human);
        assert_eq!(cfg.deadline(), Duration::from_secs(12));
        assert_eq!(cfg.request_timeout(), Duration::from_secs(8));
        assert_eq!(cfg.base_url(), DEFAULT_BASE_URL);
    }

    #[test]
    fn default_station_is_normalized() {
        let cfg = Config { default_station: Some(" kbos ".into()), ..Config::default() };
        assert_eq!(cfg.default_station(), "KBOS");

        let blank = Config { default_station: Some("  ".into()), ..Config::default() };
        assert_eq!(blank.default_station(), "KJFK");
    }

    #[test]
    fn missing_file_loads_default() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = Config::load_from(&dir.path().join("nope.toml")).unwrap();
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn save_then_load_keeps_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let cfg = Config {
            default_station: Some("EGLL".into()),
            default_kind: Some("taf".into()),
            default_output: Some("json".into()),
            deadline_secs: Some(5),
            request_timeout_secs: None,
            base_url: Some("http://localhost:8080".into()),
        };
        cfg.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded, cfg);
        assert_eq!(loaded.default_kind().unwrap(), KindSelector::Taf);
        assert_eq!(loaded.deadline(), Duration::from_secs(5));
    }

    #[test]
    fn invalid_kind_in_file_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "default_kind = \"pirep\"\n").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(format!("{err:#}").contains("Unknown data type"));
    }
}
