//! Configuration system using TOML files.
//!
//! Config is stored in the OS-standard config directory:
//! - Windows: %APPDATA%\syncify\config.toml
//! - macOS: ~/Library/Application Support/syncify/config.toml
//! - Linux: ~/.config/syncify/config.toml
//!
//! The config file is human-readable and editable. Every section is
//! optional; missing keys take their defaults.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::matcher::policy::{
    DURATION_WEIGHT, DURATION_WINDOW_SECS, EXACT_DURATION_TOLERANCE_SECS, FUZZY_THRESHOLD,
    FallbackPolicy, TITLE_WEIGHT,
};
use crate::matcher::query::DEFAULT_QUERY_SUFFIX;

/// Largest `maxResults` the YouTube search endpoint accepts
pub const MAX_SEARCH_LIMIT: u32 = 50;

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// API credentials (keep separate for potential future encryption)
    pub credentials: Credentials,

    /// Scoring and selection settings
    pub matching: MatchingConfig,

    /// YouTube Data API endpoint settings
    pub youtube: YouTubeConfig,

    /// Batch run settings
    pub batch: BatchConfig,
}

/// API credentials
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Credentials {
    /// OAuth access token for the YouTube Data API
    pub youtube_access_token: Option<String>,
}

/// Matching settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchingConfig {
    /// Number of search results scored per track
    pub search_limit: u32,

    /// Max |duration difference| in seconds for an exact match
    pub exact_duration_tolerance_secs: f64,

    /// Duration difference at which the duration score hits zero
    pub duration_window_secs: f64,

    pub title_weight: f64,
    pub duration_weight: f64,

    /// Fuzzy matches must score strictly above this
    pub fuzzy_threshold: f64,

    /// "no_match" or "first_candidate"
    pub fallback: FallbackPolicy,

    /// Appended to every search query (empty = nothing)
    pub query_suffix: String,

    /// Deadline for one candidate fetch (0 = no deadline)
    pub fetch_timeout_secs: u64,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            search_limit: 5,
            exact_duration_tolerance_secs: EXACT_DURATION_TOLERANCE_SECS,
            duration_window_secs: DURATION_WINDOW_SECS,
            title_weight: TITLE_WEIGHT,
            duration_weight: DURATION_WEIGHT,
            fuzzy_threshold: FUZZY_THRESHOLD,
            fallback: FallbackPolicy::NoMatch,
            query_suffix: DEFAULT_QUERY_SUFFIX.to_string(),
            fetch_timeout_secs: 15,
        }
    }
}

impl MatchingConfig {
    /// Check that the scoring parameters describe a usable policy
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |msg: String| -> Result<(), ConfigError> { Err(ConfigError::Invalid(msg)) };

        if !(1..=MAX_SEARCH_LIMIT).contains(&self.search_limit) {
            return invalid(format!(
                "matching.search_limit must be within [1, {}] (got {})",
                MAX_SEARCH_LIMIT, self.search_limit
            ));
        }
        if !(self.exact_duration_tolerance_secs >= 0.0) {
            return invalid(format!(
                "matching.exact_duration_tolerance_secs must be >= 0 (got {})",
                self.exact_duration_tolerance_secs
            ));
        }
        if !(self.duration_window_secs > 0.0) {
            return invalid(format!(
                "matching.duration_window_secs must be > 0 (got {})",
                self.duration_window_secs
            ));
        }
        for (name, value) in [
            ("title_weight", self.title_weight),
            ("duration_weight", self.duration_weight),
            ("fuzzy_threshold", self.fuzzy_threshold),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return invalid(format!("matching.{} must be within [0, 1] (got {})", name, value));
            }
        }
        if (self.title_weight + self.duration_weight - 1.0).abs() > 1e-9 {
            return invalid(format!(
                "matching weights must sum to 1 (got {} + {})",
                self.title_weight, self.duration_weight
            ));
        }
        Ok(())
    }
}

/// YouTube Data API settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct YouTubeConfig {
    pub base_url: String,

    /// Search category filter, "10" is Music (empty = no filter)
    pub video_category_id: String,

    /// Per-request HTTP timeout
    pub request_timeout_secs: u64,
}

impl Default for YouTubeConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.googleapis.com/youtube/v3".to_string(),
            video_category_id: "10".to_string(),
            request_timeout_secs: 10,
        }
    }
}

/// Batch run settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    /// Tracks matched concurrently (1 = sequential)
    pub concurrency: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self { concurrency: 1 }
    }
}

// ============================================================================
// Config File Operations
// ============================================================================

/// Get the config directory path
pub fn config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("syncify"))
}

/// Get the full path to the config file
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|d| d.join("config.toml"))
}

/// Load configuration from the default location
///
/// Returns default config if file doesn't exist or can't be parsed.
/// Logs warnings but doesn't fail - we always return a usable config.
pub fn load() -> Config {
    let Some(path) = config_path() else {
        tracing::warn!("Could not determine config directory, using defaults");
        return Config::default();
    };

    if !path.exists() {
        tracing::info!("No config file found at {:?}, using defaults", path);
        return Config::default();
    }

    match load_from(&path) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("{}", e);
            tracing::warn!("Using default configuration");
            Config::default()
        }
    }
}

/// Load configuration from an explicit path
pub fn load_from(path: &Path) -> Result<Config, ConfigError> {
    let contents =
        std::fs::read_to_string(path).map_err(|e| ConfigError::Read(path.to_path_buf(), e))?;
    let config: Config =
        toml::from_str(&contents).map_err(|e| ConfigError::Parse(path.to_path_buf(), e))?;
    tracing::info!("Loaded config from {:?}", path);
    Ok(config)
}

/// Save configuration to the default location
pub fn save(config: &Config) -> Result<(), ConfigError> {
    let path = config_path().ok_or(ConfigError::NoConfigDir)?;
    save_to(config, &path)
}

/// Save configuration to `path`
///
/// Creates the parent directory if it doesn't exist.
pub fn save_to(config: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir).map_err(|e| ConfigError::CreateDir(dir.to_path_buf(), e))?;
    }

    let contents = toml::to_string_pretty(config).map_err(ConfigError::Serialize)?;

    // Write atomically (write to temp, then rename)
    let temp_path = path.with_extension("toml.tmp");
    std::fs::write(&temp_path, &contents).map_err(|e| ConfigError::Write(temp_path.clone(), e))?;
    std::fs::rename(&temp_path, path)
        .map_err(|e| ConfigError::Rename(temp_path, path.to_path_buf(), e))?;

    tracing::info!("Saved config to {:?}", path);
    Ok(())
}

// ============================================================================
// Error Types
// ============================================================================

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("Failed to read config file {0}: {1}")]
    Read(PathBuf, std::io::Error),

    #[error("Failed to parse config file {0}: {1}")]
    Parse(PathBuf, toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Failed to create config directory {0}: {1}")]
    CreateDir(PathBuf, std::io::Error),

    #[error("Failed to serialize config: {0}")]
    Serialize(toml::ser::Error),

    #[error("Failed to write config to {0}: {1}")]
    Write(PathBuf, std::io::Error),

    #[error("Failed to rename temp file {0} to {1}: {2}")]
    Rename(PathBuf, PathBuf, std::io::Error),
}

// ============================================================================
// Tests
// ============================================================================
