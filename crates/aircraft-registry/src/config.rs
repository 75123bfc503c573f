//! Configuration management for the aircraft registry.
//!
//! This module provides configuration loading and validation using figment,
//! supporting TOML config files, environment variables, and defaults.

use std::net::SocketAddr;
use std::path::PathBuf;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Default data directory name.
const DATA_DIR_NAME: &str = "aircraft-registry";

/// Default database file name.
const DATABASE_FILE_NAME: &str = "registry.db";

/// Default uploads directory name.
const UPLOADS_DIR_NAME: &str = "uploads";

/// Environment variable prefix.
const ENV_PREFIX: &str = "ACREG_";

/// Path roots served by the application itself; the uploads URL prefix may
/// neither equal nor sit below any of them.
const RESERVED_PATHS: &[&str] = &["/api", "/aircraft", "/assets", "/health"];

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. Environment variables (prefixed with `ACREG_`, sections split by `__`)
/// 2. TOML config file at `~/.config/aircraft-registry/config.toml`
/// 3. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTTP server configuration.
    pub server: ServerConfig,
    /// Document store configuration.
    pub storage: StorageConfig,
    /// Uploaded image configuration.
    pub uploads: UploadsConfig,
}

/// HTTP server configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to listen on.
    pub listen: String,
    /// Maximum accepted request body size in bytes.
    pub max_body_bytes: usize,
}

/// Document store configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Path to the database file.
    /// Defaults to `~/.local/share/aircraft-registry/registry.db`
    pub database_path: Option<PathBuf>,
    /// Name of the collection holding aircraft records.
    pub collection: String,
}

/// Uploaded image configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadsConfig {
    /// Directory receiving uploaded images.
    /// Defaults to `~/.local/share/aircraft-registry/uploads`
    pub dir: Option<PathBuf>,
    /// URL prefix under which uploaded images are served.
    pub url_prefix: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: "127.0.0.1:3000".to_string(),
            max_body_bytes: 20 * 1024 * 1024,
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: None, // Will be resolved to default at runtime
            collection: "aircrafts".to_string(),
        }
    }
}

impl Default for UploadsConfig {
    fn default() -> Self {
        Self {
            dir: None,
            url_prefix: "/uploads".to_string(),
        }
    }
}

impl Config {
    /// Load configuration with an optional custom config path.
    ///
    /// Configuration is loaded in this order (later sources override earlier):
    /// 1. Default values
    /// 2. TOML config file (if exists)
    /// 3. Environment variables (prefixed with `ACREG_`)
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        Self::extract(Self::figment(config_path))
    }

    /// Load configuration with the listen address taken from the command line.
    ///
    /// The override replaces every other source before validation, so an
    /// invalid `server.listen` in the file does not stop a corrected one from
    /// being used.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load_with_listen(config_path: Option<PathBuf>, listen: Option<&str>) -> Result<Self> {
        let mut figment = Self::figment(config_path);
        if let Some(listen) = listen {
            figment = figment.merge(Serialized::default("server.listen", listen));
        }
        Self::extract(figment)
    }

    fn figment(config_path: Option<PathBuf>) -> Figment {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);

        Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_file))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    fn extract(figment: Figment) -> Result<Self> {
        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(DATA_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Get the default data directory path.
    #[must_use]
    pub fn default_data_dir() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from(".local/share"))
            .join(DATA_DIR_NAME)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<()> {
        if self.server.listen.parse::<SocketAddr>().is_err() {
            return Err(Error::ConfigValidation {
                message: format!("invalid listen address: {}", self.server.listen),
            });
        }

        if self.server.max_body_bytes == 0 {
            return Err(Error::ConfigValidation {
                message: "max_body_bytes must be greater than 0".to_string(),
            });
        }

        if self.storage.collection.trim().is_empty() {
            return Err(Error::ConfigValidation {
                message: "collection must not be empty".to_string(),
            });
        }

        validate_url_prefix(&self.uploads.url_prefix)
    }

    /// Get the database path, resolving defaults if not set.
    #[must_use]
    pub fn database_path(&self) -> PathBuf {
        self.storage
            .database_path
            .clone()
            .unwrap_or_else(|| Self::default_data_dir().join(DATABASE_FILE_NAME))
    }

    /// Get the uploads directory, resolving defaults if not set.
    #[must_use]
    pub fn uploads_dir(&self) -> PathBuf {
        self.uploads
            .dir
            .clone()
            .unwrap_or_else(|| Self::default_data_dir().join(UPLOADS_DIR_NAME))
    }

    /// Get the listen address.
    ///
    /// # Errors
    ///
    /// Returns an error if the address cannot be parsed.
    pub fn listen_addr(&self) -> Result<SocketAddr> {
        self.server
            .listen
            .parse()
            .map_err(|_| Error::ConfigValidation {
                message: format!("invalid listen address: {}", self.server.listen),
            })
    }
}

fn validate_url_prefix(prefix: &str) -> Result<()> {
    let invalid = |reason: &str| {
        Err(Error::ConfigValidation {
            message: format!("url_prefix {reason}: {prefix}"),
        })
    };

    let Some(rest) = prefix.strip_prefix('/') else {
        return invalid("must start with '/'");
    };
    if rest.split('/').any(|segment| segment.is_empty() || segment == "." || segment == "..") {
        return invalid("must name one or more non-empty path segments");
    }
    let plain = |c: char| c.is_ascii_alphanumeric() || matches!(c, '/' | '_' | '.' | '-');
    if !prefix.chars().all(plain) {
        return invalid("may only contain letters, digits, '/', '_', '.' and '-'");
    }
    let reserved = RESERVED_PATHS.iter().any(|path| {
        prefix == *path || prefix.strip_prefix(path).is_some_and(|rest| rest.starts_with('/'))
    });
    if reserved {
        return invalid("collides with a path served by the application");
    }
    Ok(())
}
