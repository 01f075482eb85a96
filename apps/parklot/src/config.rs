//! # Application Configuration
//!
//! Configuration shared by the API server and the CLI menu.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     PARKLOT_DB_PATH=/var/lib/parklot/parklot.db                        │
//! │     PARKLOT_PORT=9090                                                  │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     --config <PATH>, or                                                │
//! │     ~/.config/parklot/parklot.toml (Linux)                             │
//! │     ~/Library/Application Support/com.parklot.parklot/parklot.toml     │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! [database]
//! path = "./parklot.db"
//! max_connections = 5
//!
//! [lot]
//! car_slots = 20   # provisioned only into an empty database
//! bike_slots = 20
//!
//! [server]
//! bind_addr = "0.0.0.0"
//! port = 8080
//! web_root = "web"
//! history_limit = 10
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;
use tracing::{debug, info, warn};

use parklot_core::validation::MAX_HISTORY_LIMIT;
use parklot_core::{VehicleType, DEFAULT_HISTORY_LIMIT};
use parklot_db::DbConfig;

// =============================================================================
// Errors
// =============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

// =============================================================================
// Database Settings
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseSettings {
    /// SQLite file, created on first start.
    #[serde(default = "default_db_path")]
    pub path: PathBuf,

    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_db_path() -> PathBuf {
    PathBuf::from("./parklot.db")
}

fn default_max_connections() -> u32 {
    5
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        DatabaseSettings {
            path: default_db_path(),
            max_connections: default_max_connections(),
        }
    }
}

// =============================================================================
// Lot Layout
// =============================================================================

/// Slot layout provisioned into an empty database.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LotSettings {
    #[serde(default = "default_slots")]
    pub car_slots: i64,

    #[serde(default = "default_slots")]
    pub bike_slots: i64,
}

fn default_slots() -> i64 {
    20
}

impl Default for LotSettings {
    fn default() -> Self {
        LotSettings {
            car_slots: default_slots(),
            bike_slots: default_slots(),
        }
    }
}

impl LotSettings {
    pub fn layout(&self) -> [(VehicleType, i64); 2] {
        [
            (VehicleType::Car, self.car_slots),
            (VehicleType::Bike, self.bike_slots),
        ]
    }
}

// =============================================================================
// Server Settings
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Directory served for every non-API path.
    #[serde(default = "default_web_root")]
    pub web_root: PathBuf,

    /// Tickets returned by `GET /api/history` and the CLI history view.
    #[serde(default = "default_history_limit")]
    pub history_limit: i64,
}

fn default_bind_addr() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_web_root() -> PathBuf {
    PathBuf::from("web")
}

fn default_history_limit() -> i64 {
    DEFAULT_HISTORY_LIMIT
}

impl Default for ServerSettings {
    fn default() -> Self {
        ServerSettings {
            bind_addr: default_bind_addr(),
            port: default_port(),
            web_root: default_web_root(),
            history_limit: default_history_limit(),
        }
    }
}

impl ServerSettings {
    /// Returns the full bind address (addr:port).
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }
}

// =============================================================================
// App Configuration
// =============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub database: DatabaseSettings,

    #[serde(default)]
    pub lot: LotSettings,

    #[serde(default)]
    pub server: ServerSettings,
}

impl AppConfig {
    /// Loads configuration: defaults, then file, then environment.
    ///
    /// An explicit `config_path` that does not exist is an error; a missing
    /// default file just means defaults.
    pub fn load(config_path: Option<PathBuf>) -> ConfigResult<Self> {
        let mut config = Self::default();

        let explicit = config_path.is_some();
        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else if explicit {
                return Err(ConfigError::Invalid(format!(
                    "config file not found: {}",
                    path.display()
                )));
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.server.port == 0 {
            return Err(ConfigError::Invalid("server.port must be non-zero".into()));
        }

        if !(1..=MAX_HISTORY_LIMIT).contains(&self.server.history_limit) {
            return Err(ConfigError::Invalid(format!(
                "server.history_limit must be between 1 and {}",
                MAX_HISTORY_LIMIT
            )));
        }

        if self.database.max_connections == 0 {
            return Err(ConfigError::Invalid(
                "database.max_connections must be greater than 0".into(),
            ));
        }

        if self.lot.car_slots < 0 || self.lot.bike_slots < 0 {
            return Err(ConfigError::Invalid("lot slot counts must not be negative".into()));
        }

        Ok(())
    }

    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Applies `PARKLOT_*` overrides from `lookup`.
    ///
    /// Unparseable numbers are ignored with a warning.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(path) = lookup("PARKLOT_DB_PATH") {
            debug!(path = %path, "Overriding database path from environment");
            self.database.path = PathBuf::from(path);
        }

        if let Some(addr) = lookup("PARKLOT_BIND_ADDR") {
            self.server.bind_addr = addr;
        }

        if let Some(dir) = lookup("PARKLOT_WEB_ROOT") {
            self.server.web_root = PathBuf::from(dir);
        }

        override_parsed(&lookup, "PARKLOT_PORT", &mut self.server.port);
        override_parsed(&lookup, "PARKLOT_HISTORY_LIMIT", &mut self.server.history_limit);
        override_parsed(&lookup, "PARKLOT_CAR_SLOTS", &mut self.lot.car_slots);
        override_parsed(&lookup, "PARKLOT_BIKE_SLOTS", &mut self.lot.bike_slots);
    }

    /// Returns the default config file path.
    pub fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "parklot", "parklot")
            .map(|dirs| dirs.config_dir().join("parklot.toml"))
    }

    /// Pool settings for the configured database.
    pub fn db_config(&self) -> DbConfig {
        DbConfig::new(&self.database.path).max_connections(self.database.max_connections)
    }
}

fn override_parsed<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    target: &mut T,
) {
    if let Some(raw) = lookup(key) {
        match raw.trim().parse::<T>() {
            Ok(value) => {
                debug!(key, "Overriding from environment");
                *target = value;
            }
            Err(_) => warn!(key, value = %raw, "Ignoring unparseable environment override"),
        }
    }
}

/// Finds `--config <PATH>` (or `--config=<PATH>`) among command-line args.
pub fn config_path_from_args<I>(args: I) -> Option<PathBuf>
where
    I: IntoIterator<Item = String>,
{
    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        if arg == "--config" || arg == "-c" {
            return args.next().map(PathBuf::from);
        }
        if let Some(path) = arg.strip_prefix("--config=") {
            return Some(PathBuf::from(path));
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.history_limit, 10);
        assert_eq!(config.lot.car_slots, 20);
        assert_eq!(config.server.bind_address(), "0.0.0.0:8080");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
            [server]
            port = 9090

            [lot]
            bike_slots = 5
            "#,
        )
        .unwrap();

        assert_eq!(config.server.port, 9090);
        assert_eq!(config.server.web_root, PathBuf::from("web"));
        assert_eq!(config.lot.bike_slots, 5);
        assert_eq!(config.lot.car_slots, 20);
        assert_eq!(config.database.path, PathBuf::from("./parklot.db"));
    }

    #[test]
    fn test_overrides() {
        let env: HashMap<&str, &str> = [
            ("PARKLOT_DB_PATH", "/tmp/lot.db"),
            ("PARKLOT_PORT", "9000"),
            ("PARKLOT_CAR_SLOTS", "not-a-number"),
        ]
        .into_iter()
        .collect();

        let mut config = AppConfig::default();
        config.apply_overrides(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.database.path, PathBuf::from("/tmp/lot.db"));
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.lot.car_slots, 20);
    }

    #[test]
    fn test_config_validation() {
        let mut config = AppConfig::default();

        config.server.port = 0;
        assert!(config.validate().is_err());

        config.server.port = 8080;
        config.server.history_limit = 0;
        assert!(config.validate().is_err());

        config.server.history_limit = 10;
        config.database.max_connections = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_missing_explicit_file_is_error() {
        let result = AppConfig::load(Some(PathBuf::from("/nonexistent/parklot.toml")));
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_config_path_from_args() {
        let args = |v: &[&str]| v.iter().map(|s| s.to_string()).collect::<Vec<_>>();

        assert_eq!(
            config_path_from_args(args(&["--config", "lot.toml"])),
            Some(PathBuf::from("lot.toml"))
        );
        assert_eq!(
            config_path_from_args(args(&["--config=/etc/parklot.toml"])),
            Some(PathBuf::from("/etc/parklot.toml"))
        );
        assert_eq!(config_path_from_args(args(&["--verbose"])), None);
    }

    #[test]
    fn test_toml_serialization() {
        let toml_str = toml::to_string_pretty(&AppConfig::default()).unwrap();
        assert!(toml_str.contains("[database]"));
        assert!(toml_str.contains("[lot]"));
        assert!(toml_str.contains("[server]"));
    }
}
