use anyhow::{bail, Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::models::StatField;

fn default_month() -> u32 {
    10
}
fn default_lag_hours() -> i64 {
    22
}
fn default_period_days() -> usize {
    31
}
fn default_lower_hours() -> f64 {
    8.0
}
fn default_upper_hours() -> f64 {
    9.0
}
fn default_top_n() -> usize {
    10
}
fn default_radius() -> usize {
    3
}
fn default_min_days() -> usize {
    1
}
fn default_true() -> bool {
    true
}
fn default_user_name() -> String {
    std::env::var("USER")
        .or_else(|_| std::env::var("USERNAME"))
        .unwrap_or_else(|_| "me".to_string())
}

/// What the statistics window should be when "now" falls before the period
/// has started in the current year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PrePeriodPolicy {
    /// Show the full period, same as after the period has ended.
    #[default]
    Saturate,
    /// Report that there is nothing to show yet.
    NoData,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PeriodConfig {
    /// Calendar month (1-12) the period runs in.
    #[serde(default = "default_month")]
    pub month: u32,
    /// Hours subtracted from "now" so early-morning logs count for the previous night.
    #[serde(default = "default_lag_hours")]
    pub lag_hours: i64,
    #[serde(default = "default_period_days")]
    pub days: usize,
    #[serde(default)]
    pub pre_period: PrePeriodPolicy,
}

impl Default for PeriodConfig {
    fn default() -> Self {
        Self {
            month: default_month(),
            lag_hours: default_lag_hours(),
            days: default_period_days(),
            pre_period: PrePeriodPolicy::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringConfig {
    /// Lower edge of the healthy band; nights below it add to the deficit.
    #[serde(default = "default_lower_hours")]
    pub lower_hours: f64,
    /// Upper edge of the healthy band; nights above it add to the surplus.
    #[serde(default = "default_upper_hours")]
    pub upper_hours: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            lower_hours: default_lower_hours(),
            upper_hours: default_upper_hours(),
        }
    }
}

impl ScoringConfig {
    /// The band must sit inside a day with room above it for surplus.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..24.0).contains(&self.upper_hours) {
            bail!(
                "scoring.upper_hours must be in [0, 24), got {}",
                self.upper_hours
            );
        }
        if !(0.0..=self.upper_hours).contains(&self.lower_hours) {
            bail!(
                "scoring.lower_hours must be in [0, upper_hours = {}], got {}",
                self.upper_hours,
                self.lower_hours
            );
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaderboardConfig {
    #[serde(default = "default_top_n")]
    pub top_n: usize,
    #[serde(default = "default_radius")]
    pub radius: usize,
    #[serde(default = "default_min_days")]
    pub min_days: usize,
    #[serde(default)]
    pub sort_field: StatField,
    #[serde(default = "default_true")]
    pub descending: bool,
}

impl Default for LeaderboardConfig {
    fn default() -> Self {
        Self {
            top_n: default_top_n(),
            radius: default_radius(),
            min_days: default_min_days(),
            sort_field: StatField::default(),
            descending: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AdminConfig {
    #[serde(default)]
    pub admin_ids: Vec<String>,
}

impl AdminConfig {
    pub fn is_admin(&self, user_id: &str) -> bool {
        self.admin_ids.iter().any(|id| id == user_id)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserConfig {
    /// Identity used for logging and leaderboard lookups when `--user` is not given.
    #[serde(default = "default_user_name")]
    pub name: String,
}

impl Default for UserConfig {
    fn default() -> Self {
        Self {
            name: default_user_name(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub period: PeriodConfig,
    #[serde(default)]
    pub scoring: ScoringConfig,
    #[serde(default)]
    pub leaderboard: LeaderboardConfig,
    #[serde(default)]
    pub admin: AdminConfig,
    #[serde(default)]
    pub user: UserConfig,
}

impl AppConfig {
    fn project_dirs() -> Result<ProjectDirs> {
        ProjectDirs::from("", "", "sleeptober")
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
        Ok(Self::data_dir()?.join("sleeptober.db"))
    }

    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        if !path.exists() {
            log::debug!("No config at {:?}, using defaults", path);
            return Ok(Self::default());
        }
        let content =
            std::fs::read_to_string(&path).with_context(|| format!("Reading {:?}", path))?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: AppConfig = toml::from_str(content).context("Parsing config.toml")?;
        config.scoring.validate()?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self).context("Serializing config")?;
        std::fs::write(&path, content).with_context(|| format!("Writing {:?}", path))?;
        Ok(())
    }

    pub fn ensure_data_dir() -> Result<PathBuf> {
        let dir = Self::data_dir()?;
        std::fs::create_dir_all(&dir)?;
        Ok(dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let config = AppConfig::from_toml("").unwrap();
        assert_eq!(config.period.month, 10);
        assert_eq!(config.period.lag_hours, 22);
        assert_eq!(config.period.pre_period, PrePeriodPolicy::Saturate);
        assert_eq!(config.scoring.lower_hours, 8.0);
        assert_eq!(config.scoring.upper_hours, 9.0);
        assert_eq!(config.leaderboard.top_n, 10);
        assert_eq!(config.leaderboard.radius, 3);
        assert_eq!(config.leaderboard.sort_field, StatField::Score);
        assert!(config.leaderboard.descending);
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config = AppConfig::from_toml(
            r#"
            [period]
            pre_period = "no-data"

            [leaderboard]
            sort_field = "legacy_score"
            radius = 2

            [admin]
            admin_ids = ["4242"]
            "#,
        )
        .unwrap();
        assert_eq!(config.period.pre_period, PrePeriodPolicy::NoData);
        assert_eq!(config.period.month, 10);
        assert_eq!(config.leaderboard.sort_field, StatField::LegacyScore);
        assert_eq!(config.leaderboard.radius, 2);
        assert_eq!(config.leaderboard.top_n, 10);
        assert!(config.admin.is_admin("4242"));
        assert!(!config.admin.is_admin("1"));
    }

    #[test]
    fn saved_form_parses_back() {
        let mut config = AppConfig::default();
        config.user.name = "ada".to_string();
        let text = toml::to_string_pretty(&config).unwrap();
        let back = AppConfig::from_toml(&text).unwrap();
        assert_eq!(back.user.name, "ada");
    }

    #[test]
    fn band_reaching_end_of_day_is_rejected() {
        let err = AppConfig::from_toml("[scoring]\nupper_hours = 24.0\n").unwrap_err();
        assert!(err.to_string().contains("upper_hours"));
    }

    #[test]
    fn inverted_band_is_rejected() {
        let err =
            AppConfig::from_toml("[scoring]\nlower_hours = 10.0\nupper_hours = 9.0\n").unwrap_err();
        assert!(err.to_string().contains("lower_hours"));
        assert!(AppConfig::from_toml("[scoring]\nlower_hours = -1.0\n").is_err());
    }

    #[test]
    fn default_band_is_valid() {
        assert!(ScoringConfig::default().validate().is_ok());
        assert!(
            ScoringConfig {
                lower_hours: 9.0,
                upper_hours: 9.0
            }
            .validate()
            .is_ok()
        );
    }
}
