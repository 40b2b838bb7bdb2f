use crate::error::Result;
use crate::models::IntervalTable;
use log::LevelFilter;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const PROJECT_NAME: &str = "study-review";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub log_level: Option<String>,
    pub database_path: PathBuf,
    pub user_id: String,
    /// Days until the next review for each interval level
    pub intervals_days: IntervalTable,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: None,
            database_path: dirs::data_local_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(PROJECT_NAME)
                .join(format!("{}.sqlite3", PROJECT_NAME)),
            user_id: "local".to_string(),
            intervals_days: IntervalTable::default(),
        }
    }
}

impl Config {
    /// Load configuration with fallback chain
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        // An explicit path must load
        if let Some(path) = config_path {
            return Self::load_from_file(path);
        }

        // Try primary location: ~/.config/study-review/study-review.yml
        if let Some(config_dir) = dirs::config_dir() {
            let primary_config = config_dir
                .join(PROJECT_NAME)
                .join(format!("{}.yml", PROJECT_NAME));
            if primary_config.exists() {
                match Self::load_from_file(&primary_config) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        log::warn!("Failed to load config from {}: {}", primary_config.display(), e);
                    }
                }
            }
        }

        // Try fallback location: ./study-review.yml
        let fallback_config = PathBuf::from(format!("{}.yml", PROJECT_NAME));
        if fallback_config.exists() {
            match Self::load_from_file(&fallback_config) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    log::warn!("Failed to load config from {}: {}", fallback_config.display(), e);
                }
            }
        }

        log::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path)?;
        let config: Self = serde_yaml::from_str(&content)?;

        log::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }

    pub fn interval_table(&self) -> &IntervalTable {
        &self.intervals_days
    }

    /// The configured log level, if it names one (`off`, `error` ... `trace`).
    pub fn log_filter(&self) -> Option<LevelFilter> {
        self.log_level.as_deref()?.trim().parse().ok()
    }
}
