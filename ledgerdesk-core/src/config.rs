//! Configuration management

use crate::error::{ErrorContext, LedgerError, LedgerResult};
use crate::logging::LoggingConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsoleConfig {
    pub api: ApiConfig,
    pub storage: StorageConfig,
    pub dashboard: DashboardConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Root of the backend API, e.g. `http://localhost:8000/api`
    pub base_url: String,
    /// Per-request timeout. Unset means requests wait indefinitely.
    pub timeout_seconds: Option<u64>,
    pub user_agent: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000/api".to_string(),
            timeout_seconds: None,
            user_agent: format!("ledgerdesk/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// File holding the `token` and `adminInfo` entries
    pub session_file: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            session_file: "~/.ledgerdesk/session.json".to_string(),
        }
    }
}

impl StorageConfig {
    /// Session file path with a leading `~` expanded to the home directory.
    pub fn resolved_session_file(&self) -> PathBuf {
        expand_home(&self.session_file)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub refresh_interval_secs: u64,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            refresh_interval_secs: 30,
        }
    }
}

impl ConsoleConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> LedgerResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| LedgerError::Config {
            message: format!("Failed to read config file: {}", e),
            source: Some(Box::new(e)),
            context: ErrorContext::new("config")
                .with_operation("read_file")
                .with_suggestion("Check if the config file exists and is readable"),
        })?;

        let config: ConsoleConfig = toml::from_str(&content).map_err(|e| LedgerError::Config {
            message: format!("Failed to parse config: {}", e),
            source: Some(Box::new(e)),
            context: ErrorContext::new("config")
                .with_operation("parse_toml")
                .with_suggestion("Check TOML syntax in config file"),
        })?;

        Ok(config)
    }

    /// Save configuration to a TOML file, creating parent directories
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> LedgerResult<()> {
        let path = path.as_ref();
        let content = toml::to_string_pretty(self).map_err(|e| LedgerError::Config {
            message: format!("Failed to serialize config: {}", e),
            source: Some(Box::new(e)),
            context: ErrorContext::new("config").with_operation("serialize_toml"),
        })?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, content).map_err(|e| LedgerError::Config {
            message: format!("Failed to write config file: {}", e),
            source: Some(Box::new(e)),
            context: ErrorContext::new("config")
                .with_operation("write_file")
                .with_suggestion("Check if the directory exists and is writable"),
        })?;

        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> LedgerResult<()> {
        let url = url::Url::parse(&self.api.base_url).map_err(|e| LedgerError::Config {
            message: format!("Invalid api.base_url '{}': {}", self.api.base_url, e),
            source: Some(Box::new(e)),
            context: ErrorContext::new("config")
                .with_operation("validate")
                .with_suggestion("Use a full URL such as http://localhost:8000/api"),
        })?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(LedgerError::Config {
                message: format!("Unsupported api.base_url scheme: {}", url.scheme()),
                source: None,
                context: ErrorContext::new("config")
                    .with_operation("validate")
                    .with_suggestion("Use an http or https URL"),
            });
        }

        if self.api.timeout_seconds == Some(0) {
            return Err(LedgerError::Config {
                message: "api.timeout_seconds must be greater than 0 when set".to_string(),
                source: None,
                context: ErrorContext::new("config")
                    .with_operation("validate")
                    .with_suggestion("Remove api.timeout_seconds to disable the timeout"),
            });
        }

        if self.storage.session_file.trim().is_empty() {
            return Err(LedgerError::Config {
                message: "storage.session_file must not be empty".to_string(),
                source: None,
                context: ErrorContext::new("config").with_operation("validate"),
            });
        }

        if self.dashboard.refresh_interval_secs == 0 {
            return Err(LedgerError::Config {
                message: "dashboard.refresh_interval_secs must be greater than 0".to_string(),
                source: None,
                context: ErrorContext::new("config")
                    .with_operation("validate")
                    .with_suggestion("Set dashboard.refresh_interval_secs to a positive value"),
            });
        }

        Ok(())
    }

    /// Candidate config locations, most specific first
    pub fn default_locations() -> Vec<PathBuf> {
        [
            dirs::config_dir().map(|d| d.join("ledgerdesk").join("config.toml")),
            dirs::home_dir().map(|d| d.join(".ledgerdesk").join("config.toml")),
            Some(PathBuf::from("ledgerdesk.toml")),
        ]
        .into_iter()
        .flatten()
        .collect()
    }
}

fn expand_home(path: &str) -> PathBuf {
    match (path.strip_prefix("~/"), dirs::home_dir()) {
        (Some(rest), Some(home)) => home.join(rest),
        _ if path == "~" => dirs::home_dir().unwrap_or_else(|| PathBuf::from(path)),
        _ => PathBuf::from(path),
    }
}
