// Configuration loading and parsing (config/league.toml).

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

use luckbook_core::types::LuckOptions;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },

    #[error("failed to initialize config from defaults: {message}")]
    DefaultsCopyError { message: String },
}

// ---------------------------------------------------------------------------
// league.toml structs
// ---------------------------------------------------------------------------

/// Raw deserialization target for the entire league.toml file.
#[derive(Debug, Clone, Deserialize)]
struct LeagueFile {
    league: LeagueConfig,
    #[serde(default)]
    luck: LuckConfig,
    data_paths: DataPaths,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub league: LeagueConfig,
    pub luck: LuckConfig,
    pub data_paths: DataPaths,
}

impl Config {
    pub fn luck_options(&self) -> LuckOptions {
        LuckOptions::with_playoffs(self.luck.include_playoffs)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LeagueConfig {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LuckConfig {
    #[serde(default)]
    pub include_playoffs: bool,
    /// Luck within `+/- neutral_band` wins is reported as neutral.
    #[serde(default = "default_neutral_band")]
    pub neutral_band: f64,
}

impl Default for LuckConfig {
    fn default() -> Self {
        Self {
            include_playoffs: false,
            neutral_band: default_neutral_band(),
        }
    }
}

fn default_neutral_band() -> f64 {
    0.5
}

#[derive(Debug, Clone, Deserialize)]
pub struct DataPaths {
    pub matchups: String,
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Load and validate configuration from `config/league.toml` relative to
/// `base_dir`.
///
/// This is the lower-level loading primitive that does not auto-copy
/// defaults. Prefer `load_config()` which handles default initialization.
pub fn load_config_from(base_dir: &Path) -> Result<Config, ConfigError> {
    let league_path = base_dir.join("config").join("league.toml");
    let league_text = read_file(&league_path)?;
    let file: LeagueFile = toml::from_str(&league_text).map_err(|e| ConfigError::ParseError {
        path: league_path.clone(),
        source: e,
    })?;

    let config = Config {
        league: file.league,
        luck: file.luck,
        data_paths: file.data_paths,
    };

    validate(&config)?;

    Ok(config)
}

/// Files shipped in `defaults/` that a project needs under `config/`.
const DEFAULT_FILES: &[&str] = &["league.toml"];

/// Copy any missing shipped config files from `defaults/` into `config/`.
/// Existing files are left alone. Returns the paths that were written.
pub fn ensure_config_files(base_dir: &Path) -> Result<Vec<PathBuf>, ConfigError> {
    let defaults_dir = base_dir.join("defaults");
    let config_dir = base_dir.join("config");

    if !defaults_dir.is_dir() {
        if config_dir.is_dir() {
            return Ok(vec![]);
        }
        return Err(ConfigError::DefaultsCopyError {
            message: format!(
                "no defaults/ or config/ directory under {}",
                base_dir.display()
            ),
        });
    }

    let mut copied = Vec::new();
    for name in DEFAULT_FILES {
        let source = defaults_dir.join(name);
        let target = config_dir.join(name);
        if target.exists() || !source.is_file() {
            continue;
        }
        std::fs::create_dir_all(&config_dir).map_err(|e| ConfigError::DefaultsCopyError {
            message: format!("failed to create {}: {e}", config_dir.display()),
        })?;
        std::fs::copy(&source, &target).map_err(|e| ConfigError::DefaultsCopyError {
            message: format!("failed to copy {} to {}: {e}", source.display(), target.display()),
        })?;
        info!("Initialized {} from defaults", target.display());
        copied.push(target);
    }

    Ok(copied)
}

/// Load config relative to `base_dir`, copying defaults in first.
pub fn load_config(base_dir: &Path) -> Result<Config, ConfigError> {
    ensure_config_files(base_dir)?;
    load_config_from(base_dir)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn read_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
        path: path.to_path_buf(),
    })
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate(config: &Config) -> Result<(), ConfigError> {
    if config.league.name.trim().is_empty() {
        return Err(ConfigError::ValidationError {
            field: "league.name".into(),
            message: "must not be empty".into(),
        });
    }

    if config.data_paths.matchups.trim().is_empty() {
        return Err(ConfigError::ValidationError {
            field: "data_paths.matchups".into(),
            message: "must not be empty".into(),
        });
    }

    let band = config.luck.neutral_band;
    if !band.is_finite() || band < 0.0 {
        return Err(ConfigError::ValidationError {
            field: "luck.neutral_band".into(),
            message: format!("must be a finite number >= 0, got {band}"),
        });
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
