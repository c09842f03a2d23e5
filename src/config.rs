//! Application configuration
//!
//! Loaded from TOML (`~/.config/jetski-booking/config.toml` by default, or the
//! path in `JETSKI_BOOKING_CONFIG`). Every section and key is optional; a
//! missing file yields the defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::application::BookingSettings;
use crate::infrastructure::database::DEFAULT_DATABASE_URL;
use crate::support::errors::InfraError;

pub const CONFIG_ENV_VAR: &str = "JETSKI_BOOKING_CONFIG";

/// Default config location: `<config_dir>/jetski-booking/config.toml`.
pub fn default_config_path() -> PathBuf {
    dirs_next::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("jetski-booking")
        .join("config.toml")
}

/// Config path from `JETSKI_BOOKING_CONFIG`, falling back to the default.
pub fn config_path_from_env() -> PathBuf {
    std::env::var(CONFIG_ENV_VAR)
        .map(PathBuf::from)
        .unwrap_or_else(|_| default_config_path())
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct AppConfig {
    #[validate(nested)]
    pub database: DatabaseSection,
    #[validate(nested)]
    pub logging: LoggingConfig,
    #[validate(nested)]
    pub booking: BookingConfig,
    pub metrics: MetricsConfig,
    #[validate(nested)]
    pub server: ServerConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct DatabaseSection {
    #[validate(length(min = 1, message = "database url must not be empty"))]
    pub url: String,
    /// Keep everything in memory; nothing survives a restart.
    pub in_memory: bool,
}

impl Default for DatabaseSection {
    fn default() -> Self {
        Self {
            url: DEFAULT_DATABASE_URL.to_string(),
            in_memory: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct LoggingConfig {
    #[validate(length(min = 1))]
    pub level: String,
    /// `text` or `json`
    #[validate(custom(function = "validate_log_format"))]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "text".to_string(),
        }
    }
}

fn validate_log_format(format: &str) -> Result<(), validator::ValidationError> {
    match format.to_lowercase().as_str() {
        "text" | "json" => Ok(()),
        _ => Err(validator::ValidationError::new("log_format")),
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct BookingConfig {
    #[validate(range(min = 1, message = "sweep interval must be at least one second"))]
    pub sweep_interval_secs: u64,
    pub enforce_overbooking_cap_on_create: bool,
}

impl Default for BookingConfig {
    fn default() -> Self {
        Self {
            sweep_interval_secs: 120,
            enforce_overbooking_cap_on_create: true,
        }
    }
}

impl From<&BookingConfig> for BookingSettings {
    fn from(cfg: &BookingConfig) -> Self {
        Self {
            enforce_overbooking_cap_on_create: cfg.enforce_overbooking_cap_on_create,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricsConfig {
    /// Prometheus scrape port; no listener when absent.
    pub port: Option<u16>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct ServerConfig {
    /// Seconds to wait for background tasks on shutdown
    #[validate(range(min = 1, max = 600))]
    pub shutdown_timeout: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            shutdown_timeout: 30,
        }
    }
}

impl AppConfig {
    /// Load from `path`. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, InfraError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(path)
            .map_err(|e| InfraError::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&raw)
    }

    pub fn from_toml_str(raw: &str) -> Result<Self, InfraError> {
        let cfg: Self = toml::from_str(raw).map_err(|e| InfraError::Config(e.to_string()))?;
        cfg.validate()
            .map_err(|e| InfraError::Config(e.to_string()))?;
        Ok(cfg)
    }

    /// `DATABASE_URL` overrides the configured url.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var("DATABASE_URL") {
            self.database.url = url;
        }
    }

    pub fn booking_settings(&self) -> BookingSettings {
        BookingSettings::from(&self.booking)
    }

    pub fn to_toml_string(&self) -> Result<String, InfraError> {
        toml::to_string_pretty(self).map_err(|e| InfraError::Config(e.to_string()))
    }
}
