use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::streak::DayClock;

fn default_user_id() -> String {
    "local".to_string()
}
fn default_display_name() -> String {
    "Membro".to_string()
}
fn default_timezone_offset() -> i32 {
    -180
}
fn default_report_window() -> u32 {
    7
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemberConfig {
    #[serde(default = "default_user_id")]
    pub user_id: String,
    #[serde(default = "default_display_name")]
    pub display_name: String,
}

impl Default for MemberConfig {
    fn default() -> Self {
        Self {
            user_id: default_user_id(),
            display_name: default_display_name(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClockConfig {
    /// Minutes from UTC used for every calendar-day decision
    #[serde(default = "default_timezone_offset")]
    pub timezone_offset: i32,
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            timezone_offset: default_timezone_offset(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyticsConfig {
    /// Days counted as "recent" in the members report
    #[serde(default = "default_report_window")]
    pub window_days: u32,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            window_days: default_report_window(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub member: MemberConfig,
    #[serde(default)]
    pub clock: ClockConfig,
    #[serde(default)]
    pub analytics: AnalyticsConfig,
}

impl AppConfig {
    fn project_dirs() -> Result<ProjectDirs> {
        ProjectDirs::from("app", "geracaolife", "geracao")
            .context("Could not determine project directories")
    }

    pub fn config_path() -> Result<PathBuf> {
        let dirs = Self::project_dirs()?;
        Ok(dirs.config_dir().join("config.toml"))
    }

    pub fn data_dir() -> Result<PathBuf> {
        let dirs = Self::project_dirs()?;
        Ok(dirs.data_dir().to_path_buf())
    }

    pub fn db_path() -> Result<PathBuf> {
        Ok(Self::data_dir()?.join("geracao.db"))
    }

    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content =
            std::fs::read_to_string(path).with_context(|| format!("Reading {:?}", path))?;
        let config: AppConfig = toml::from_str(&content).context("Parsing config.toml")?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self).context("Serializing config")?;
        std::fs::write(path, content).with_context(|| format!("Writing {:?}", path))?;
        Ok(())
    }

    pub fn ensure_data_dir() -> Result<PathBuf> {
        let dir = Self::data_dir()?;
        std::fs::create_dir_all(&dir)?;
        Ok(dir)
    }

    pub fn day_clock(&self) -> Result<DayClock> {
        DayClock::from_offset_minutes(self.clock.timezone_offset)
            .context("Invalid [clock] timezone_offset in config.toml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::load_from(&dir.path().join("config.toml")).unwrap();
        assert_eq!(config.member.user_id, "local");
        assert_eq!(config.clock.timezone_offset, -180);
        assert_eq!(config.analytics.window_days, 7);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let mut config = AppConfig::default();
        config.member.display_name = "Joana".to_string();
        config.clock.timezone_offset = 60;
        config.save_to(&path).unwrap();

        let loaded = AppConfig::load_from(&path).unwrap();
        assert_eq!(loaded.member.display_name, "Joana");
        assert_eq!(loaded.day_clock().unwrap().offset_minutes(), 60);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[member]\nuser_id = \"u-42\"\n").unwrap();
        let config = AppConfig::load_from(&path).unwrap();
        assert_eq!(config.member.user_id, "u-42");
        assert_eq!(config.member.display_name, "Membro");
        assert_eq!(config.clock.timezone_offset, -180);
    }

    #[test]
    fn test_bad_offset_is_an_error() {
        let mut config = AppConfig::default();
        config.clock.timezone_offset = 5000;
        assert!(config.day_clock().is_err());
    }
}
