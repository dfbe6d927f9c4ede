use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

use crate::models::MatchingRules;

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub database: DatabaseSettings,
    #[serde(default)]
    pub cache: CacheSettings,
    #[serde(default)]
    pub matching: MatchingSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    pub url: String,
    pub max_connections: Option<u32>,
    pub min_connections: Option<u32>,
    pub acquire_timeout_secs: Option<u64>,
    pub idle_timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CacheSettings {
    pub redis_url: Option<String>,
    #[serde(default)]
    pub enabled: bool,
    pub ttl_secs: Option<u64>,
    pub l1_cache_size: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MatchingSettings {
    pub min_height_to_match: Option<i16>,
    pub max_height_to_match: Option<i16>,
    pub min_age_to_match_allowed: Option<u16>,
    pub max_age_to_match_allowed: Option<u16>,
    pub max_ranked_matches: Option<usize>,
    pub default_page_size: Option<usize>,
    pub max_page_size: Option<usize>,
}

impl MatchingSettings {
    /// Build the engine rules, falling back to the built-in bounds
    pub fn to_rules(&self) -> Result<MatchingRules, ConfigError> {
        let defaults = MatchingRules::default();
        let rules = MatchingRules {
            min_height_to_match: self.min_height_to_match.unwrap_or(defaults.min_height_to_match),
            max_height_to_match: self.max_height_to_match.unwrap_or(defaults.max_height_to_match),
            min_age_to_match_allowed: self
                .min_age_to_match_allowed
                .unwrap_or(defaults.min_age_to_match_allowed),
            max_age_to_match_allowed: self
                .max_age_to_match_allowed
                .unwrap_or(defaults.max_age_to_match_allowed),
            max_ranked_matches: self.max_ranked_matches.unwrap_or(defaults.max_ranked_matches),
        };

        if rules.min_height_to_match > rules.max_height_to_match {
            return Err(ConfigError::Message(format!(
                "matching.min_height_to_match {} exceeds matching.max_height_to_match {}",
                rules.min_height_to_match, rules.max_height_to_match
            )));
        }
        if rules.min_age_to_match_allowed > rules.max_age_to_match_allowed {
            return Err(ConfigError::Message(format!(
                "matching.min_age_to_match_allowed {} exceeds matching.max_age_to_match_allowed {}",
                rules.min_age_to_match_allowed, rules.max_age_to_match_allowed
            )));
        }

        Ok(rules)
    }

    /// Page size to use for a request, capped at the configured maximum
    pub fn page_size(&self, requested: Option<usize>) -> usize {
        let max = self.max_page_size.unwrap_or(100);
        requested
            .unwrap_or_else(|| self.default_page_size.unwrap_or(24))
            .min(max)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl LoggingSettings {
    /// `LOG_LEVEL` and `LOG_FORMAT` take precedence over the file
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(level) = std::env::var("LOG_LEVEL") {
            self.level = level;
        }
        if let Ok(format) = std::env::var("LOG_FORMAT") {
            self.format = format;
        }
        self
    }

    pub fn is_pretty(&self) -> bool {
        self.format.eq_ignore_ascii_case("pretty")
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "json".to_string()
}

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Configuration file (config/default.toml)
    /// 2. Local overrides (config/local.toml)
    /// 3. Environment variables (prefixed with SPEEDY_MATCH__)
    /// 4. DATABASE_URL, if set
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., SPEEDY_MATCH__SERVER__PORT -> server.port
            .add_source(environment())
            .build()?;

        apply_database_url(settings)?.try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(environment())
            .build()?;

        apply_database_url(settings)?.try_deserialize()
    }
}

fn environment() -> Environment {
    Environment::with_prefix("SPEEDY_MATCH")
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
}

/// DATABASE_URL takes precedence over `database.url`
fn apply_database_url(settings: Config) -> Result<Config, ConfigError> {
    match std::env::var("DATABASE_URL") {
        Ok(url) => Config::builder()
            .add_source(settings)
            .set_override("database.url", url)?
            .build(),
        Err(_) => Ok(settings),
    }
}
