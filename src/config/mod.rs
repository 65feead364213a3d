//! Session plan configuration.
//!
//! `FocusConfig` is read-only input to the session engine. It can be
//! persisted as JSON next to the flow metrics; missing fields fall back to
//! their defaults so older files keep loading.

mod error;

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

pub use error::ConfigError;

/// File name of the configuration inside the data directory.
pub const CONFIG_FILE_NAME: &str = "config.json";

/// Directory name used under the platform data directory.
const APP_DIR_NAME: &str = "flowfocus";

fn default_work_duration_minutes() -> u32 {
    25
}

fn default_break_duration_minutes() -> u32 {
    5
}

fn default_total_cycles() -> u32 {
    4
}

fn default_notifications_enabled() -> bool {
    true
}

/// Configuration for a focus session plan.
///
/// # Example
///
/// ```
/// use flowfocus::config::FocusConfig;
///
/// let config = FocusConfig::default().with_work_minutes(50);
/// assert_eq!(config.work_duration_minutes, 50);
/// assert_eq!(config.total_cycles, 4);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FocusConfig {
    /// Focus duration in minutes (1-120)
    #[serde(default = "default_work_duration_minutes")]
    pub work_duration_minutes: u32,
    /// Break duration in minutes (1-60)
    #[serde(default = "default_break_duration_minutes")]
    pub break_duration_minutes: u32,
    /// Focus/break pairs per plan (1-12)
    #[serde(default = "default_total_cycles")]
    pub total_cycles: u32,
    /// Start the next focus interval as soon as a break ends
    #[serde(default)]
    pub auto_break_enabled: bool,
    /// Request notifications on phase completion
    #[serde(default = "default_notifications_enabled")]
    pub notifications_enabled: bool,
    /// Size focus intervals from flow intensity instead of the fixed duration
    #[serde(default)]
    pub adaptive_durations: bool,
}

impl Default for FocusConfig {
    fn default() -> Self {
        Self {
            work_duration_minutes: default_work_duration_minutes(),
            break_duration_minutes: default_break_duration_minutes(),
            total_cycles: default_total_cycles(),
            auto_break_enabled: false,
            notifications_enabled: default_notifications_enabled(),
            adaptive_durations: false,
        }
    }
}

impl FocusConfig {
    /// Sets the focus duration.
    #[must_use]
    pub fn with_work_minutes(mut self, minutes: u32) -> Self {
        self.work_duration_minutes = minutes;
        self
    }

    /// Sets the break duration.
    #[must_use]
    pub fn with_break_minutes(mut self, minutes: u32) -> Self {
        self.break_duration_minutes = minutes;
        self
    }

    /// Sets the number of cycles per plan.
    #[must_use]
    pub fn with_total_cycles(mut self, cycles: u32) -> Self {
        self.total_cycles = cycles;
        self
    }

    /// Focus duration in seconds, saturating at `u32::MAX`.
    pub fn work_seconds(&self) -> u32 {
        self.work_duration_minutes.saturating_mul(60)
    }

    /// Break duration in seconds, saturating at `u32::MAX`.
    pub fn break_seconds(&self) -> u32 {
        self.break_duration_minutes.saturating_mul(60)
    }

    /// Validates value ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=120).contains(&self.work_duration_minutes) {
            return Err(ConfigError::Invalid(
                "work duration must be 1-120 minutes".to_string(),
            ));
        }
        if !(1..=60).contains(&self.break_duration_minutes) {
            return Err(ConfigError::Invalid(
                "break duration must be 1-60 minutes".to_string(),
            ));
        }
        if !(1..=12).contains(&self.total_cycles) {
            return Err(ConfigError::Invalid(
                "total cycles must be 1-12".to_string(),
            ));
        }
        Ok(())
    }
}

/// Returns the default data directory (`<data dir>/flowfocus`).
///
/// Falls back to `~/.flowfocus`, then to a relative `.flowfocus`.
pub fn default_data_dir() -> PathBuf {
    if let Some(dir) = dirs::data_dir() {
        return dir.join(APP_DIR_NAME);
    }
    dirs::home_dir()
        .map(|home| home.join(format!(".{APP_DIR_NAME}")))
        .unwrap_or_else(|| PathBuf::from(format!(".{APP_DIR_NAME}")))
}

/// Loads the configuration from `path`.
///
/// A missing file yields the defaults. Unreadable, malformed or out-of-range
/// files are errors.
pub fn load_config(path: &Path) -> Result<FocusConfig, ConfigError> {
    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("no configuration at {:?}, using defaults", path);
            return Ok(FocusConfig::default());
        }
        Err(source) => {
            return Err(ConfigError::Io {
                path: path.display().to_string(),
                source,
            })
        }
    };

    let config: FocusConfig = serde_json::from_str(&contents)?;
    config.validate()?;
    Ok(config)
}

/// Writes the configuration to `path`, creating the parent directory.
pub fn save_config(path: &Path, config: &FocusConfig) -> Result<(), ConfigError> {
    config.validate()?;

    let io_err = |source| ConfigError::Io {
        path: path.display().to_string(),
        source,
    };

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(io_err)?;
    }
    let json = serde_json::to_string_pretty(config)?;
    std::fs::write(path, json).map_err(io_err)
}
