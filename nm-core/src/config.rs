//! Application configuration management.
//!
//! Handles loading, saving, and accessing the configuration: Notion
//! credentials, mailbox behaviour, and logging. Configuration is persisted as
//! TOML on disk; credentials may also come from the environment.

use std::path::{Path, PathBuf};
use serde::{Deserialize, Serialize};

use crate::constants;
use crate::error::{NmError, NmResult};
use crate::platform::Platform;

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Notion connection settings.
    #[serde(default)]
    pub notion: NotionConfig,

    /// Mailbox query and display settings.
    #[serde(default)]
    pub mailbox: MailboxConfig,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Notion connection configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotionConfig {
    /// Internal integration token (`secret_...` / `ntn_...`).
    #[serde(default)]
    pub token: String,

    /// Id of the database acting as the mailbox.
    #[serde(default)]
    pub database_id: String,

    /// REST API root.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Value of the `Notion-Version` header.
    #[serde(default = "default_notion_version")]
    pub notion_version: String,

    /// API request timeout in milliseconds.
    #[serde(default = "default_api_timeout")]
    pub api_timeout_ms: u64,
}

/// How a name is compared against the Sender / Recipient properties.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchMode {
    /// Substring match (`bob` also matches `bobby`).
    #[default]
    Contains,
    /// Exact match.
    Equals,
}

impl std::str::FromStr for MatchMode {
    type Err = NmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "contains" => Ok(MatchMode::Contains),
            "equals" | "exact" => Ok(MatchMode::Equals),
            other => Err(NmError::Config(format!(
                "unknown match mode '{other}', expected contains or equals"
            ))),
        }
    }
}

impl std::fmt::Display for MatchMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MatchMode::Contains => write!(f, "contains"),
            MatchMode::Equals => write!(f, "equals"),
        }
    }
}

/// Mailbox behaviour settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MailboxConfig {
    /// Match mode for recipient and participant filters.
    #[serde(default)]
    pub match_mode: MatchMode,

    /// IANA timezone used to display timestamps.
    #[serde(default = "default_timezone")]
    pub timezone: String,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Directory for log files. If empty, uses default location.
    #[serde(default)]
    pub directory: String,

    /// Enable JSON structured logging output.
    #[serde(default)]
    pub json_output: bool,
}

// Default value functions for serde

fn default_base_url() -> String {
    constants::DEFAULT_API_BASE_URL.to_string()
}

fn default_notion_version() -> String {
    constants::DEFAULT_NOTION_VERSION.to_string()
}

fn default_api_timeout() -> u64 {
    constants::DEFAULT_API_TIMEOUT_MS
}

fn default_timezone() -> String {
    constants::DEFAULT_DISPLAY_TIMEZONE.to_string()
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for NotionConfig {
    fn default() -> Self {
        Self {
            token: String::new(),
            database_id: String::new(),
            base_url: default_base_url(),
            notion_version: default_notion_version(),
            api_timeout_ms: default_api_timeout(),
        }
    }
}

impl Default for MailboxConfig {
    fn default() -> Self {
        Self {
            match_mode: MatchMode::default(),
            timezone: default_timezone(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            directory: String::new(),
            json_output: false,
        }
    }
}

impl AppConfig {
    /// Load configuration from a specific file path.
    pub fn load_from_file(path: &Path) -> NmResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        let mut config: AppConfig = toml::from_str(&contents)?;
        config.notion.database_id = Self::normalize_database_id(&config.notion.database_id);
        Ok(config)
    }

    /// Save configuration to a specific file path.
    pub fn save_to_file(&self, path: &Path) -> NmResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = toml::to_string_pretty(self)
            .map_err(|e| NmError::Config(format!("failed to serialize config: {e}")))?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Get the default configuration file path.
    pub fn default_config_path() -> NmResult<PathBuf> {
        Ok(Platform::config_dir()?.join("config.toml"))
    }

    /// Get the effective log directory, using the configured path or the default.
    pub fn effective_log_dir(&self) -> NmResult<PathBuf> {
        if self.logging.directory.is_empty() {
            Ok(Platform::data_dir()?.join("logs"))
        } else {
            Ok(PathBuf::from(&self.logging.directory))
        }
    }

    /// Apply credentials from the process environment.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|key| std::env::var(key).ok());
    }

    /// Apply credentials from an arbitrary key lookup. Empty values are ignored.
    pub fn apply_overrides_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(token) = non_empty(constants::ENV_TOKEN) {
            self.notion.token = token.trim().to_string();
        }
        if let Some(id) = non_empty(constants::ENV_DATABASE_ID)
            .or_else(|| non_empty(constants::ENV_DATABASE_ID_LEGACY))
        {
            self.notion.database_id = Self::normalize_database_id(&id);
        }
    }

    /// Return an error naming the first missing credential.
    pub fn require_credentials(&self) -> NmResult<()> {
        if self.notion.token.is_empty() {
            return Err(NmError::MissingConfig(format!(
                "notion.token (or {})",
                constants::ENV_TOKEN
            )));
        }
        if self.notion.database_id.is_empty() {
            return Err(NmError::MissingConfig(format!(
                "notion.database_id (or {})",
                constants::ENV_DATABASE_ID
            )));
        }
        Ok(())
    }

    /// Normalize a database id.
    ///
    /// Accepts a bare id (dashed or not) or a full share URL such as
    /// `https://www.notion.so/team/Mail-0123...cdef?v=...`, and returns the
    /// 32-character hex id. Values that contain no such id are returned
    /// trimmed but otherwise untouched.
    pub fn normalize_database_id(raw: &str) -> String {
        let trimmed = raw.trim().trim_matches('"').trim();
        let without_query = trimmed.split(['?', '#']).next().unwrap_or(trimmed);
        let last_segment = without_query
            .trim_end_matches('/')
            .rsplit('/')
            .next()
            .unwrap_or(without_query);

        let hex: String = last_segment
            .chars()
            .filter(|c| *c != '-')
            .collect::<String>();

        if hex.len() >= 32 {
            let tail = &hex[hex.len() - 32..];
            if tail.chars().all(|c| c.is_ascii_hexdigit()) {
                return tail.to_lowercase();
            }
        }

        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    const ID: &str = "0123456789abcdef0123456789abcdef";

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.notion.api_timeout_ms, 30_000);
        assert_eq!(config.notion.base_url, "https://api.notion.com/v1");
        assert_eq!(config.mailbox.timezone, "America/Los_Angeles");
        assert_eq!(config.mailbox.match_mode, MatchMode::Contains);
        assert!(config.require_credentials().is_err());
    }

    #[test]
    fn test_normalize_database_id() {
        assert_eq!(AppConfig::normalize_database_id(ID), ID);
        assert_eq!(
            AppConfig::normalize_database_id("01234567-89ab-cdef-0123-456789abcdef"),
            ID
        );
        assert_eq!(
            AppConfig::normalize_database_id(&format!(
                "https://www.notion.so/team/Mailbox-{ID}?v=ffff"
            )),
            ID
        );
        assert_eq!(
            AppConfig::normalize_database_id(&format!("  \"{}\"  ", ID.to_uppercase())),
            ID
        );
        assert_eq!(AppConfig::normalize_database_id(" not-an-id "), "not-an-id");
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [("NOTION_TOKEN", " secret_abc "), ("PAGE_ID", ID)]
            .into_iter()
            .collect();
        let mut config = AppConfig::default();
        config.apply_overrides_from(|k| env.get(k).map(|v| v.to_string()));
        assert_eq!(config.notion.token, "secret_abc");
        assert_eq!(config.notion.database_id, ID);
        assert!(config.require_credentials().is_ok());
    }

    #[test]
    fn test_new_env_name_wins_over_legacy() {
        let other = "ffffffffffffffffffffffffffffffff";
        let env: HashMap<&str, &str> = [("NOTION_DATABASE_ID", other), ("PAGE_ID", ID)]
            .into_iter()
            .collect();
        let mut config = AppConfig::default();
        config.apply_overrides_from(|k| env.get(k).map(|v| v.to_string()));
        assert_eq!(config.notion.database_id, other);
    }

    #[test]
    fn test_empty_env_value_ignored() {
        let mut config = AppConfig::default();
        config.notion.token = "from-file".into();
        config.apply_overrides_from(|k| (k == "NOTION_TOKEN").then(|| "  ".to_string()));
        assert_eq!(config.notion.token, "from-file");
    }

    #[test]
    fn test_require_credentials_names_missing_key() {
        let mut config = AppConfig::default();
        let err = config.require_credentials().unwrap_err();
        assert!(err.to_string().contains("notion.token"));

        config.notion.token = "secret".into();
        let err = config.require_credentials().unwrap_err();
        assert!(err.to_string().contains("notion.database_id"));
    }

    #[test]
    fn test_match_mode_parse() {
        assert_eq!("contains".parse::<MatchMode>().unwrap(), MatchMode::Contains);
        assert_eq!(" Exact ".parse::<MatchMode>().unwrap(), MatchMode::Equals);
        assert!("fuzzy".parse::<MatchMode>().is_err());
    }

    #[test]
    fn test_roundtrip_toml() {
        let mut config = AppConfig::default();
        config.mailbox.match_mode = MatchMode::Equals;
        let serialized = toml::to_string_pretty(&config).unwrap();
        assert!(serialized.contains("match_mode = \"equals\""));
        let deserialized: AppConfig = toml::from_str(&serialized).unwrap();
        assert_eq!(deserialized.mailbox.match_mode, MatchMode::Equals);
        assert_eq!(deserialized.notion.api_timeout_ms, config.notion.api_timeout_ms);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: AppConfig = toml::from_str("[notion]\ntoken = \"t\"\n").unwrap();
        assert_eq!(config.notion.token, "t");
        assert_eq!(config.notion.notion_version, "2022-06-28");
        assert_eq!(config.logging.level, "warn");
    }
}
