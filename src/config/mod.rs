// Configuration management for encore
// Handles loading/saving settings, with sensible defaults when config is missing

use crate::error::{Result, StatsError};
use crate::history::loader::DEFAULT_FILE_PREFIX;
use crate::metrics::completion::DEFAULT_COMPLETION_THRESHOLD_MS;
use crate::metrics::sessions::DEFAULT_SESSION_GAP_MINUTES;
use crate::scoring::ScoreWeights;
use chrono::NaiveDate;
use dirs::config_dir;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub data_directory: PathBuf,
    pub file_prefix: String,
    pub analysis: AnalysisConfig,
    pub report: ReportConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub session_gap_minutes: i64,
    pub completion_threshold_ms: i64,
    pub cohort_min_plays: u64,
    /// Events before this date are ignored; `None` keeps the whole history
    /// and is written as `cutoff_date = "none"`.
    #[serde(with = "cutoff_date")]
    pub cutoff_date: Option<NaiveDate>,
    pub weights: ScoreWeights,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    pub top_n: usize,
    pub track_width: usize,
    pub artist_width: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub directory: PathBuf,
    pub filter: String,
}

// toml has no null, so a disabled cutoff needs its own spelling
mod cutoff_date {
    use chrono::NaiveDate;
    use serde::{de, Deserialize, Deserializer, Serializer};

    const NO_CUTOFF: &str = "none";

    pub fn serialize<S: Serializer>(date: &Option<NaiveDate>, serializer: S) -> Result<S::Ok, S::Error> {
        match date {
            Some(date) => serializer.collect_str(&date.format("%Y-%m-%d")),
            None => serializer.serialize_str(NO_CUTOFF),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<NaiveDate>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        if raw.trim().eq_ignore_ascii_case(NO_CUTOFF) {
            return Ok(None);
        }
        NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
            .map(Some)
            .map_err(|e| de::Error::custom(format!("cutoff_date {:?}: {}", raw, e)))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_directory: PathBuf::from("./spotify_data"),
            file_prefix: DEFAULT_FILE_PREFIX.to_string(),
            analysis: AnalysisConfig::default(),
            report: ReportConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            session_gap_minutes: DEFAULT_SESSION_GAP_MINUTES,
            completion_threshold_ms: DEFAULT_COMPLETION_THRESHOLD_MS,
            cohort_min_plays: 3,
            cutoff_date: NaiveDate::from_ymd_opt(2024, 12, 1),
            weights: ScoreWeights::default(),
        }
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            top_n: 10,
            track_width: 40,
            artist_width: 25,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("logs"),
            filter: "info,encore=debug".to_string(),
        }
    }
}

impl AnalysisConfig {
    /// Rejects anything that would make a run meaningless, before any data is read.
    pub fn validate(&self) -> Result<()> {
        if self.session_gap_minutes < 0 {
            return Err(StatsError::config(format!(
                "session_gap_minutes must not be negative (got {})",
                self.session_gap_minutes
            )));
        }
        if self.completion_threshold_ms < 0 {
            return Err(StatsError::config(format!(
                "completion_threshold_ms must not be negative (got {})",
                self.completion_threshold_ms
            )));
        }
        if self.cohort_min_plays == 0 {
            return Err(StatsError::config("cohort_min_plays must be at least 1"));
        }
        self.weights.validate()
    }
}

impl ReportConfig {
    pub fn validate(&self) -> Result<()> {
        if self.top_n == 0 {
            return Err(StatsError::config("top_n must be at least 1"));
        }
        if self.track_width == 0 || self.artist_width == 0 {
            return Err(StatsError::config("display widths must be at least 1"));
        }
        Ok(())
    }
}

impl Config {
    /// Loads `path`, or the default location when `None`. A missing file means defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config_path = match path {
            Some(p) => p.to_path_buf(),
            None => Self::config_path()?,
        };

        if config_path.exists() {
            let content = fs::read_to_string(&config_path)?;
            let config: Config = toml::from_str(&content).map_err(|source| StatsError::Toml {
                path: config_path.clone(),
                source,
            })?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    /// Writes the config to `path`, or the default location when `None`.
    /// An invalid config is never written.
    pub fn save(&self, path: Option<&Path>) -> Result<PathBuf> {
        self.validate()?;

        let config_path = match path {
            Some(p) => p.to_path_buf(),
            None => Self::config_path()?,
        };

        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| StatsError::config(format!("could not serialize config: {}", e)))?;
        fs::write(&config_path, content)?;

        Ok(config_path)
    }

    pub fn validate(&self) -> Result<()> {
        self.analysis.validate()?;
        self.report.validate()
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = config_dir()
            .ok_or_else(|| StatsError::config("could not find config directory"))?
            .join("encore");

        Ok(config_dir.join("config.toml"))
    }
}
