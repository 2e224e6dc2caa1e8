//! Configuration for the search engine.
//!
//! Layered as defaults, then an optional config file, then environment
//! variables prefixed `CONTENT_SEARCH` (nesting separator `__`, e.g.
//! `CONTENT_SEARCH__FULL_TEXT__SEARCH_THRESHOLD_VALUE=50`).

use crate::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchConfig {
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub full_text: FullTextSearchConfig,
    #[serde(default)]
    pub search: QueryDefaults,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl SearchConfig {
    /// Load configuration from an optional file plus the environment.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = config::Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path).required(true));
        } else {
            builder = builder.add_source(config::File::with_name("content-search").required(false));
        }
        builder = builder.add_source(
            config::Environment::with_prefix("CONTENT_SEARCH")
                .prefix_separator("__")
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("full_text.commands")
                .with_list_parse_key("full_text.rule_files")
                .try_parsing(true),
        );

        let settings = builder.build()?;
        let config: SearchConfig = settings.try_deserialize()?;
        Ok(config)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_database_url")]
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_acquire_timeout_seconds")]
    pub acquire_timeout_seconds: u64,
}

impl DatabaseConfig {
    pub fn acquire_timeout(&self) -> Duration {
        Duration::from_secs(self.acquire_timeout_seconds)
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: default_database_url(),
            max_connections: default_max_connections(),
            acquire_timeout_seconds: default_acquire_timeout_seconds(),
        }
    }
}

fn default_database_url() -> String {
    "sqlite://content.db".to_string()
}

fn default_max_connections() -> u32 {
    5
}

fn default_acquire_timeout_seconds() -> u64 {
    10
}

/// Full-text search settings, shared read-only by every search issued through
/// one handler.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FullTextSearchConfig {
    #[serde(default = "default_true")]
    pub enable_wildcards: bool,
    /// Tokens whose corpus frequency exceeds this value are treated as
    /// stopwords. `u64::MAX` disables the filter.
    #[serde(default = "default_search_threshold_value")]
    pub search_threshold_value: u64,
    /// Transformation commands applied to every token, in order.
    #[serde(default = "default_commands")]
    pub commands: Vec<String>,
    /// Extra rule files loaded after the bundled rules.
    #[serde(default)]
    pub rule_files: Vec<PathBuf>,
}

impl FullTextSearchConfig {
    pub fn without_threshold(mut self) -> Self {
        self.search_threshold_value = u64::MAX;
        self
    }

    pub fn with_wildcards(mut self, enabled: bool) -> Self {
        self.enable_wildcards = enabled;
        self
    }

    pub fn has_threshold(&self) -> bool {
        self.search_threshold_value != u64::MAX
    }
}

impl Default for FullTextSearchConfig {
    fn default() -> Self {
        Self {
            enable_wildcards: true,
            search_threshold_value: default_search_threshold_value(),
            commands: default_commands(),
            rule_files: Vec::new(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_search_threshold_value() -> u64 {
    20
}

fn default_commands() -> Vec<String> {
    [
        "lowercase",
        "ascii_lowercase",
        "latin1_lowercase",
        "latin1_noaccent",
        "strip_diacritics",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryDefaults {
    #[serde(default = "default_limit")]
    pub default_limit: u64,
}

impl Default for QueryDefaults {
    fn default() -> Self {
        Self {
            default_limit: default_limit(),
        }
    }
}

fn default_limit() -> u64 {
    25
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}
