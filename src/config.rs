//! Configuration management
//!
//! Persistent settings with schema versioning and migrations. Configuration
//! is stored in `~/.vocamap/config.json` (the directory is overridable via
//! `VOCAMAP_CONFIG_DIR`) and cached in memory after first access.

use std::fs;
use std::path::PathBuf;
use std::sync::OnceLock;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

/// Current config schema version
const CURRENT_VERSION: u32 = 1;

/// Environment variable overriding the config directory
const CONFIG_DIR_ENV: &str = "VOCAMAP_CONFIG_DIR";

/// Global config instance for caching
static CONFIG: OnceLock<RwLock<Config>> = OnceLock::new();

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Schema version for migrations
    pub version: u32,
    /// Map view settings
    pub map: MapConfig,
    /// Geocoding service settings
    pub geocoder: GeocoderConfig,
    /// Speech recognition settings
    pub recognition: RecognitionConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: CURRENT_VERSION,
            map: MapConfig::default(),
            geocoder: GeocoderConfig::default(),
            recognition: RecognitionConfig::default(),
        }
    }
}

/// Map view configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    /// Initial view center latitude
    pub initial_lat: f64,
    /// Initial view center longitude
    pub initial_lon: f64,
    /// Initial zoom level
    pub initial_zoom: u8,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            initial_lat: 51.505,
            initial_lon: -0.09,
            initial_zoom: 13,
        }
    }
}

/// Geocoding service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeocoderConfig {
    /// Base URL of the Nominatim-compatible search endpoint
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// User-Agent header (required by the Nominatim usage policy)
    pub user_agent: String,
}

impl Default for GeocoderConfig {
    fn default() -> Self {
        Self {
            base_url: "https://nominatim.openstreetmap.org".to_string(),
            timeout_secs: 30,
            user_agent: concat!("vocamap/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// Speech recognition configuration
///
/// The recognition engine itself is external; these settings are handed to
/// it at startup.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RecognitionConfig {
    /// Recognition language code (e.g. "en-US")
    pub language: String,
}

impl Default for RecognitionConfig {
    fn default() -> Self {
        Self {
            language: "en-US".to_string(),
        }
    }
}

/// Get the path to the config file (~/.vocamap/config.json)
pub fn get_config_path() -> PathBuf {
    get_config_dir().join("config.json")
}

/// Get the path to the config directory
///
/// Defaults to `~/.vocamap`; `VOCAMAP_CONFIG_DIR` overrides it (portable
/// installs, tests).
fn get_config_dir() -> PathBuf {
    match std::env::var(CONFIG_DIR_ENV) {
        Ok(dir) if !dir.is_empty() => PathBuf::from(dir),
        _ => home_dir_or_fallback().join(".vocamap"),
    }
}

/// Get the home directory, falling back to /tmp if unavailable
fn home_dir_or_fallback() -> PathBuf {
    dirs::home_dir().unwrap_or_else(|| {
        tracing::error!("Could not determine home directory, using /tmp");
        PathBuf::from("/tmp")
    })
}

/// Ensure the config directory exists
fn ensure_config_dir() -> Result<(), String> {
    let dir = get_config_dir();
    if !dir.exists() {
        fs::create_dir_all(&dir)
            .map_err(|e| format!("Failed to create config directory: {}", e))?;
    }
    Ok(())
}

/// Load configuration from disk, applying migrations if needed
pub fn load_from_disk() -> Result<Config, String> {
    let path = get_config_path();

    if !path.exists() {
        tracing::info!("Config file not found, using defaults");
        return Ok(Config::default());
    }

    let contents =
        fs::read_to_string(&path).map_err(|e| format!("Failed to read config file: {}", e))?;

    let config: Config =
        serde_json::from_str(&contents).map_err(|e| format!("Failed to parse config: {}", e))?;

    // Run migrations if needed
    let migrated = migrate_config(config)?;

    Ok(migrated)
}

/// Save configuration to disk, creating the config directory if needed
pub fn save_to_disk(config: &Config) -> Result<(), String> {
    ensure_config_dir()?;

    let path = get_config_path();
    let contents = serde_json::to_string_pretty(config)
        .map_err(|e| format!("Failed to serialise config: {}", e))?;

    fs::write(&path, contents).map_err(|e| format!("Failed to write config file: {}", e))?;

    tracing::info!("Config saved to disk: geocoder={}", config.geocoder.base_url);
    Ok(())
}

/// Migrate configuration from older schema versions
fn migrate_config(mut config: Config) -> Result<Config, String> {
    let original_version = config.version;

    // Apply migrations sequentially
    while config.version < CURRENT_VERSION {
        config = apply_migration(config)?;
    }

    if config.version != original_version {
        tracing::info!(
            "Migrated config from version {} to {}",
            original_version,
            config.version
        );
        // Save the migrated config
        save_to_disk(&config)?;
    }

    Ok(config)
}

/// Apply a single migration step
fn apply_migration(config: Config) -> Result<Config, String> {
    match config.version {
        // Version 0 -> 1: Initial migration (add any new fields)
        0 => {
            let mut migrated = config;
            migrated.version = 1;
            Ok(migrated)
        }
        v => Err(format!("Unknown config version: {}", v)),
    }
}

/// Get the global config instance
fn get_config_instance() -> &'static RwLock<Config> {
    CONFIG.get_or_init(|| {
        let config = load_from_disk().unwrap_or_else(|e| {
            tracing::error!("Failed to load config, using defaults: {}", e);
            Config::default()
        });
        RwLock::new(config)
    })
}

/// Get the current configuration
///
/// The config is cached in memory and loaded from disk on first access.
pub fn get_config() -> Config {
    get_config_instance().read().clone()
}

/// Update the configuration
///
/// Replaces the current configuration and persists it to disk. The version
/// field is forced to the current schema.
pub fn set_config(mut config: Config) -> Result<(), String> {
    config.version = CURRENT_VERSION;

    save_to_disk(&config)?;
    *get_config_instance().write() = config;

    Ok(())
}

/// Reset the configuration to defaults and persist
pub fn reset_config() -> Result<Config, String> {
    let config = Config::default();
    save_to_disk(&config)?;
    *get_config_instance().write() = config.clone();
    Ok(config)
}
