//! Application configuration management.
//!
//! This module handles loading and saving the console configuration, which
//! includes the API base URL, request timeout, contacts path, credential
//! storage backend and last used email.
//!
//! Configuration is stored at `~/.config/backoffice/config.json`. The
//! deployment environment comes from `BACKOFFICE_ENV` and `BACKOFFICE_API_URL`.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::api::{ApiClient, ApiError, DEFAULT_CONTACTS_PATH, DEFAULT_TIMEOUT_SECS};
use crate::auth::{CredentialStorage, FileStorage, KeyringStorage};

/// Application name used for config/cache directory paths
pub const APP_NAME: &str = "backoffice";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// API server used during development
pub const DEVELOPMENT_API_URL: &str = "http://localhost:5000";

pub const ENV_VAR: &str = "BACKOFFICE_ENV";
pub const API_URL_VAR: &str = "BACKOFFICE_API_URL";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Could not find {0} directory")]
    NoDirectory(&'static str),

    #[error("Failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Unknown environment '{0}' (expected development or production)")]
    UnknownEnvironment(String),

    #[error("No API URL configured for production; set BACKOFFICE_API_URL or api_base_url in config.json")]
    MissingApiUrl,

    #[error("Invalid API URL '{0}'")]
    InvalidApiUrl(String),

    #[error("Failed to build HTTP client: {0}")]
    Client(#[from] ApiError),
}

// ============================================================================
// Deployment environment
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    Development,
    #[default]
    Production,
}

impl Environment {
    pub fn parse(value: &str) -> Result<Self, ConfigError> {
        match value.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Environment::Development),
            "production" | "prod" | "" => Ok(Environment::Production),
            other => Err(ConfigError::UnknownEnvironment(other.to_string())),
        }
    }
}

/// Settings taken from the process environment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvSettings {
    pub environment: Environment,
    pub api_url: Option<String>,
}

impl EnvSettings {
    /// Read `BACKOFFICE_ENV` and `BACKOFFICE_API_URL`
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(std::env::var(ENV_VAR).ok(), std::env::var(API_URL_VAR).ok())
    }

    pub fn from_vars(environment: Option<String>, api_url: Option<String>) -> Result<Self, ConfigError> {
        let environment = match environment {
            Some(value) => Environment::parse(&value)?,
            None => Environment::default(),
        };
        Ok(Self {
            environment,
            api_url: api_url.filter(|u| !u.trim().is_empty()),
        })
    }
}

// ============================================================================
// Config file
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StorageKind {
    #[default]
    File,
    Keyring,
}

fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_contacts_path() -> String {
    DEFAULT_CONTACTS_PATH.to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api_base_url: Option<String>,
    #[serde(default = "default_timeout")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_contacts_path")]
    pub contacts_path: String,
    #[serde(default)]
    pub storage: StorageKind,
    #[serde(default)]
    pub last_email: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: None,
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
            contacts_path: default_contacts_path(),
            storage: StorageKind::default(),
            last_email: None,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let io_err = |source: std::io::Error| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }
        let contents = serde_json::to_string_pretty(self).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        std::fs::write(path, contents).map_err(io_err)?;
        Ok(())
    }

    pub fn config_dir() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir().ok_or(ConfigError::NoDirectory("config"))?;
        Ok(config_dir.join(APP_NAME))
    }

    pub fn config_path() -> Result<PathBuf, ConfigError> {
        Ok(Self::config_dir()?.join(CONFIG_FILE))
    }

    /// Where log files go
    pub fn cache_dir() -> Result<PathBuf, ConfigError> {
        let cache_dir = dirs::cache_dir().ok_or(ConfigError::NoDirectory("cache"))?;
        Ok(cache_dir.join(APP_NAME))
    }

    /// Base URL for the API: the environment variable wins, then the config
    /// file, then the development default.
    pub fn resolve_base_url(&self, env: &EnvSettings) -> Result<String, ConfigError> {
        let configured = env
            .api_url
            .as_deref()
            .or(self.api_base_url.as_deref())
            .map(str::trim)
            .filter(|u| !u.is_empty());

        let url = match (configured, env.environment) {
            (Some(url), _) => url,
            (None, Environment::Development) => DEVELOPMENT_API_URL,
            (None, Environment::Production) => return Err(ConfigError::MissingApiUrl),
        };

        match reqwest::Url::parse(url) {
            Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => {
                Ok(url.trim_end_matches('/').to_string())
            }
            _ => Err(ConfigError::InvalidApiUrl(url.to_string())),
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }

    /// Build the shared API client for this configuration
    pub fn api_client(&self, env: &EnvSettings) -> Result<ApiClient, ConfigError> {
        let base_url = self.resolve_base_url(env)?;
        Ok(ApiClient::new(&base_url, self.request_timeout())?.with_contacts_path(&self.contacts_path))
    }

    /// Open the configured credential storage backend
    pub fn open_storage(&self) -> Result<Arc<dyn CredentialStorage>, ConfigError> {
        match self.storage {
            StorageKind::File => Ok(Arc::new(FileStorage::new(&Self::config_dir()?))),
            StorageKind::Keyring => Ok(Arc::new(KeyringStorage::new())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env(environment: Option<&str>, url: Option<&str>) -> EnvSettings {
        EnvSettings::from_vars(environment.map(String::from), url.map(String::from)).unwrap()
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.request_timeout_secs, 5);
        assert_eq!(config.contacts_path, "/api/contacts");
        assert_eq!(config.storage, StorageKind::File);
    }

    #[test]
    fn test_partial_config_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"api_base_url":"https://api.example.com","storage":"keyring"}"#).unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.api_base_url.as_deref(), Some("https://api.example.com"));
        assert_eq!(config.storage, StorageKind::Keyring);
        assert_eq!(config.request_timeout_secs, 5);
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");
        let config = Config {
            last_email: Some("admin@example.com".to_string()),
            contacts_path: "/api/contact".to_string(),
            ..Config::default()
        };
        config.save_to(&path).unwrap();
        assert_eq!(Config::load_from(&path).unwrap(), config);
    }

    #[test]
    fn test_missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("absent.json")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_environment_parse() {
        assert_eq!(Environment::parse("Development").unwrap(), Environment::Development);
        assert_eq!(Environment::parse("production").unwrap(), Environment::Production);
        assert!(matches!(
            Environment::parse("staging"),
            Err(ConfigError::UnknownEnvironment(_))
        ));
    }

    #[test]
    fn test_resolve_base_url() {
        let config = Config::default();
        assert_eq!(
            config.resolve_base_url(&env(Some("development"), None)).unwrap(),
            "http://localhost:5000"
        );
        assert!(matches!(
            config.resolve_base_url(&env(None, None)),
            Err(ConfigError::MissingApiUrl)
        ));
        assert_eq!(
            config
                .resolve_base_url(&env(None, Some("https://api.example.com/")))
                .unwrap(),
            "https://api.example.com"
        );
    }

    #[test]
    fn test_env_url_overrides_config_file() {
        let config = Config {
            api_base_url: Some("https://file.example.com".to_string()),
            ..Config::default()
        };
        assert_eq!(
            config.resolve_base_url(&env(None, None)).unwrap(),
            "https://file.example.com"
        );
        assert_eq!(
            config
                .resolve_base_url(&env(None, Some("https://env.example.com")))
                .unwrap(),
            "https://env.example.com"
        );
    }

    #[test]
    fn test_invalid_url_rejected() {
        let config = Config::default();
        assert!(matches!(
            config.resolve_base_url(&env(None, Some("ftp://files.example.com"))),
            Err(ConfigError::InvalidApiUrl(_))
        ));
        assert!(matches!(
            config.resolve_base_url(&env(None, Some("not a url"))),
            Err(ConfigError::InvalidApiUrl(_))
        ));
    }
}
