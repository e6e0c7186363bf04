//! Shared configuration for mealdeck.
//!
//! TOML file + environment loading, persistence, and translation to
//! `mealdeck_core::StorefrontConfig`. The CLI layers its flags on top.

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
    value::Uncased,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use mealdeck_core::{CachePolicy, RetryPolicy, StorefrontConfig};

/// Alternate variable for the API base URL, checked before `MEALDECK_*`.
pub const FOOD_API_BASE_URL_ENV: &str = "FOOD_API_BASE_URL";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("unknown config key '{0}'")]
    UnknownKey(String),

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiSettings,

    #[serde(default)]
    pub cache: CacheSettings,

    #[serde(default)]
    pub defaults: Defaults,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ApiSettings {
    /// Food API base URL (e.g. "https://api.example.com"). Empty when unset.
    #[serde(default)]
    pub base_url: String,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            timeout: default_timeout(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct CacheSettings {
    #[serde(default = "default_list_stale")]
    pub list_stale_secs: u64,
    #[serde(default = "default_search_stale")]
    pub search_stale_secs: u64,
    #[serde(default = "default_list_stale")]
    pub detail_stale_secs: u64,
    #[serde(default = "default_gc")]
    pub gc_secs: u64,
    #[serde(default = "default_query_retries")]
    pub query_retries: u32,
    #[serde(default = "default_mutation_retries")]
    pub mutation_retries: u32,
    /// First retry delay in milliseconds; doubles per attempt.
    #[serde(default = "default_retry_base")]
    pub retry_base_ms: u64,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            list_stale_secs: default_list_stale(),
            search_stale_secs: default_search_stale(),
            detail_stale_secs: default_list_stale(),
            gc_secs: default_gc(),
            query_retries: default_query_retries(),
            mutation_retries: default_mutation_retries(),
            retry_base_ms: default_retry_base(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
        }
    }
}

fn default_timeout() -> u64 {
    30
}
fn default_list_stale() -> u64 {
    5 * 60
}
fn default_search_stale() -> u64 {
    2 * 60
}
fn default_gc() -> u64 {
    10 * 60
}
fn default_query_retries() -> u32 {
    3
}
fn default_mutation_retries() -> u32 {
    1
}
fn default_retry_base() -> u64 {
    1000
}
fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "mealdeck", "mealdeck").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("mealdeck");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_from_path(&config_path())
}

/// Load config layered as defaults → TOML at `path` → `FOOD_API_BASE_URL`
/// → `MEALDECK_<SECTION>_<KEY>` variables. A missing file is not an error.
pub fn load_from_path(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(
            Env::raw()
                .only(&[FOOD_API_BASE_URL_ENV])
                .map(|_| "api.base_url".into()),
        )
        .merge(Env::prefixed("MEALDECK_").map(|key| {
            Uncased::from(key.as_str().to_ascii_lowercase().replacen('_', ".", 1))
        }));

    let config: Config = figment.extract()?;
    config.validate()?;
    Ok(config)
}

/// Load only defaults and the TOML file at `path`, ignoring the environment.
///
/// Used when the result is written back, so environment overrides never
/// leak into the saved file.
pub fn load_file_only(path: &Path) -> Result<Config, ConfigError> {
    let config: Config = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .extract()?;
    config.validate()?;
    Ok(config)
}

/// Load config, returning a default if it can't be read.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<PathBuf, ConfigError> {
    let path = config_path();
    save_to_path(cfg, &path)?;
    Ok(path)
}

pub fn save_to_path(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Validation and updates ──────────────────────────────────────────

impl Config {
    /// Reject values that would only fail later at request time.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.api.base_url.is_empty() {
            validate_base_url(&self.api.base_url)?;
        }
        if !matches!(
            self.defaults.output.as_str(),
            "table" | "json" | "json-compact" | "yaml" | "plain"
        ) {
            return Err(ConfigError::Validation {
                field: "defaults.output".into(),
                reason: format!(
                    "expected 'table', 'json', 'json-compact', 'yaml', or 'plain', got '{}'",
                    self.defaults.output
                ),
            });
        }
        if !matches!(self.defaults.color.as_str(), "auto" | "always" | "never") {
            return Err(ConfigError::Validation {
                field: "defaults.color".into(),
                reason: format!(
                    "expected 'auto', 'always', or 'never', got '{}'",
                    self.defaults.color
                ),
            });
        }
        Ok(())
    }

    /// Set one value by dotted key (`api.base_url`, `cache.gc_secs`, ...).
    /// Leaves `self` unchanged when the result would not validate.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut next = self.clone();
        match key {
            "api.base_url" => next.api.base_url = value.to_owned(),
            "api.timeout" => next.api.timeout = parse_number(key, value)?,
            "cache.list_stale_secs" => next.cache.list_stale_secs = parse_number(key, value)?,
            "cache.search_stale_secs" => next.cache.search_stale_secs = parse_number(key, value)?,
            "cache.detail_stale_secs" => next.cache.detail_stale_secs = parse_number(key, value)?,
            "cache.gc_secs" => next.cache.gc_secs = parse_number(key, value)?,
            "cache.query_retries" => next.cache.query_retries = parse_number(key, value)?,
            "cache.mutation_retries" => next.cache.mutation_retries = parse_number(key, value)?,
            "cache.retry_base_ms" => next.cache.retry_base_ms = parse_number(key, value)?,
            "defaults.output" => next.defaults.output = value.to_owned(),
            "defaults.color" => next.defaults.color = value.to_owned(),
            other => return Err(ConfigError::UnknownKey(other.to_owned())),
        }
        next.validate()?;
        *self = next;
        Ok(())
    }

    /// Translate into the core's runtime configuration.
    pub fn to_storefront_config(&self) -> StorefrontConfig {
        let base_delay = Duration::from_millis(self.cache.retry_base_ms);
        StorefrontConfig {
            base_url: self.api.base_url.clone(),
            timeout: Duration::from_secs(self.api.timeout),
            cache: CachePolicy {
                list_stale_time: Duration::from_secs(self.cache.list_stale_secs),
                search_stale_time: Duration::from_secs(self.cache.search_stale_secs),
                detail_stale_time: Duration::from_secs(self.cache.detail_stale_secs),
                gc_time: Duration::from_secs(self.cache.gc_secs),
                query_retry: RetryPolicy::with_retries(self.cache.query_retries)
                    .with_base_delay(base_delay),
                mutation_retry: RetryPolicy::with_retries(self.cache.mutation_retries)
                    .with_base_delay(base_delay),
            },
        }
    }
}

/// An absolute `http(s)` URL.
pub fn validate_base_url(raw: &str) -> Result<(), ConfigError> {
    let url: url::Url = raw.parse().map_err(|_| ConfigError::Validation {
        field: "api.base_url".into(),
        reason: format!("invalid URL: {raw}"),
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::Validation {
            field: "api.base_url".into(),
            reason: format!("unsupported scheme '{}'", url.scheme()),
        });
    }
    Ok(())
}

fn parse_number<T: std::str::FromStr>(field: &str, value: &str) -> Result<T, ConfigError> {
    value.parse().map_err(|_| ConfigError::Validation {
        field: field.into(),
        reason: format!("expected a non-negative integer, got '{value}'"),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use figment::Jail;
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn defaults_match_cache_policy() {
        let runtime = Config::default().to_storefront_config();
        assert_eq!(runtime.cache, CachePolicy::default());
        assert_eq!(runtime.timeout, Duration::from_secs(30));
        assert!(runtime.base_url.is_empty());
    }

    #[test]
    fn file_values_are_loaded() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "config.toml",
                r#"
                [api]
                base_url = "https://food.example.com"

                [cache]
                search_stale_secs = 10
                "#,
            )?;

            let config = load_from_path(Path::new("config.toml")).unwrap();
            assert_eq!(config.api.base_url, "https://food.example.com");
            assert_eq!(config.cache.search_stale_secs, 10);
            assert_eq!(config.cache.list_stale_secs, 300);
            Ok(())
        });
    }

    #[test]
    fn environment_overrides_file() {
        Jail::expect_with(|jail| {
            jail.create_file("config.toml", "[api]\nbase_url = \"https://file.example.com\"\n")?;
            jail.set_env("MEALDECK_API_BASE_URL", "https://env.example.com");
            jail.set_env("MEALDECK_CACHE_GC_SECS", "5");

            let config = load_from_path(Path::new("config.toml")).unwrap();
            assert_eq!(config.api.base_url, "https://env.example.com");
            assert_eq!(config.cache.gc_secs, 5);
            Ok(())
        });
    }

    #[test]
    fn food_api_variable_is_accepted() {
        Jail::expect_with(|jail| {
            jail.set_env(FOOD_API_BASE_URL_ENV, "https://legacy.example.com");
            let config = load_from_path(Path::new("missing.toml")).unwrap();
            assert_eq!(config.api.base_url, "https://legacy.example.com");
            Ok(())
        });
    }

    #[test]
    fn file_only_load_ignores_environment() {
        Jail::expect_with(|jail| {
            jail.create_file("config.toml", "[cache]\ngc_secs = 42\n")?;
            jail.set_env("MEALDECK_API_BASE_URL", "https://env.example.com");

            let config = load_file_only(Path::new("config.toml")).unwrap();
            assert_eq!(config.cache.gc_secs, 42);
            assert!(config.api.base_url.is_empty());
            Ok(())
        });
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.set("api.base_url", "http://localhost:3000").unwrap();
        config.set("cache.query_retries", "0").unwrap();
        save_to_path(&config, &path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let loaded: Config = toml::from_str(&text).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn set_rejects_bad_values() {
        let mut config = Config::default();
        assert!(matches!(
            config.set("api.color", "x"),
            Err(ConfigError::UnknownKey(_))
        ));
        assert!(matches!(
            config.set("api.timeout", "soon"),
            Err(ConfigError::Validation { .. })
        ));
        assert!(config.set("api.base_url", "ftp://files").is_err());
        assert!(config.set("defaults.output", "xml").is_err());
        assert_eq!(config, Config::default());
    }
}
