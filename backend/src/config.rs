//! Dashboard configuration.
//!
//! Read from a YAML file such as:
//!
//! ```yaml
//! window_days: 7
//! recent_limit: 5
//! timezone: local   # or "utc", or a fixed offset like "+03:00"
//! ```
//!
//! Every key is optional and falls back to its default.

use chrono::{DateTime, FixedOffset, Local, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::domain::models::sale_date;
use crate::domain::sales_trend::DEFAULT_TREND_WINDOW_DAYS;

/// Number of most recent purchases shown in the dashboard list
pub const DEFAULT_RECENT_LIMIT: usize = 5;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse dashboard config: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("Invalid dashboard config: {0}")]
    Invalid(String),
}

/// Timezone that defines "calendar day" for trend buckets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum TimezoneSetting {
    /// The machine's local timezone
    #[default]
    Local,
    Utc,
    Fixed(FixedOffset),
}

impl TimezoneSetting {
    /// Calendar date of a raw sale timestamp in this timezone
    pub fn date_of(&self, raw: &str) -> Option<NaiveDate> {
        match self {
            TimezoneSetting::Local => sale_date(Some(raw), &Local),
            TimezoneSetting::Utc => sale_date(Some(raw), &Utc),
            TimezoneSetting::Fixed(offset) => sale_date(Some(raw), offset),
        }
    }

    /// Calendar date of an instant in this timezone
    pub fn date_at(&self, instant: DateTime<Utc>) -> NaiveDate {
        match self {
            TimezoneSetting::Local => instant.with_timezone(&Local).date_naive(),
            TimezoneSetting::Utc => instant.date_naive(),
            TimezoneSetting::Fixed(offset) => instant.with_timezone(offset).date_naive(),
        }
    }

    fn parse_offset(text: &str) -> Option<FixedOffset> {
        let (sign, rest) = match text.as_bytes().first()? {
            b'+' => (1, &text[1..]),
            b'-' => (-1, &text[1..]),
            _ => return None,
        };
        let (hours, minutes) = rest.split_once(':').unwrap_or((rest, "0"));
        let hours: i32 = hours.parse().ok()?;
        let minutes: i32 = minutes.parse().ok()?;
        if !(0..24).contains(&hours) || !(0..60).contains(&minutes) {
            return None;
        }
        FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
    }
}

impl TryFrom<String> for TimezoneSetting {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        let trimmed = value.trim();
        match trimmed.to_ascii_lowercase().as_str() {
            "local" => Ok(TimezoneSetting::Local),
            "utc" | "z" => Ok(TimezoneSetting::Utc),
            _ => Self::parse_offset(trimmed)
                .map(TimezoneSetting::Fixed)
                .ok_or_else(|| format!("unknown timezone '{}', expected local, utc or +HH:MM", value)),
        }
    }
}

impl From<TimezoneSetting> for String {
    fn from(value: TimezoneSetting) -> Self {
        match value {
            TimezoneSetting::Local => "local".to_string(),
            TimezoneSetting::Utc => "utc".to_string(),
            TimezoneSetting::Fixed(offset) => offset.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Maximum number of dated trend buckets
    pub window_days: usize,
    /// Number of recent purchases in the dashboard list
    pub recent_limit: usize,
    pub timezone: TimezoneSetting,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            window_days: DEFAULT_TREND_WINDOW_DAYS,
            recent_limit: DEFAULT_RECENT_LIMIT,
            timezone: TimezoneSetting::Local,
        }
    }
}

impl DashboardConfig {
    /// Parse and validate a YAML document
    pub fn from_yaml_str(yaml_content: &str) -> Result<Self, ConfigError> {
        let config: DashboardConfig = if yaml_content.trim().is_empty() {
            DashboardConfig::default()
        } else {
            serde_yaml::from_str(yaml_content)?
        };
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let yaml_content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_yaml_str(&yaml_content)?;
        info!("Loaded dashboard config from {}", path.display());
        Ok(config)
    }

    /// `<config dir>/lottery-pos/dashboard.yaml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("lottery-pos").join("dashboard.yaml"))
    }

    /// Load an explicit file, else the default location if it exists, else defaults.
    ///
    /// An explicitly given path that cannot be read is an error.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = path {
            return Self::load(path);
        }
        match Self::default_path() {
            Some(default_path) if default_path.is_file() => Self::load(&default_path),
            _ => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.window_days == 0 {
            return Err(ConfigError::Invalid("window_days must be at least 1".to_string()));
        }
        if self.recent_limit == 0 {
            return Err(ConfigError::Invalid("recent_limit must be at least 1".to_string()));
        }
        Ok(())
    }
}
