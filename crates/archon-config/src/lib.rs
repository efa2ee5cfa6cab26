//! ABOUTME: Environment-driven configuration for the orchestration service
//! ABOUTME: Layers defaults, an optional TOML file, and process environment, in that order

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

pub use crate::env::{EnvCategory, EnvRegistry, EnvVarDef};

pub mod env;
pub mod merge;
pub mod validation;

/// Files searched, in order, when no explicit path is given to
/// [`OrchestratorConfig::load`].
const CONFIG_SEARCH_PATHS: &[&str] = &["archon.toml", ".archon.toml", "config/archon.toml"];

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingRequired(String),
    #[error("invalid value for {name}: {reason}")]
    Invalid { name: String, reason: String },
    #[error("failed to read config file {path}: {source}")]
    Io { path: String, source: std::io::Error },
    #[error("failed to parse config file {path}: {source}")]
    Parse { path: String, source: Box<toml::de::Error> },
    #[error("{0}")]
    EnvValidation(String),
}

/// Credentials and endpoints for the AI providers the dispatcher (C5)
/// talks to. `archon-providers` reads this at startup to build its
/// `ProviderConfig` table; it never reads the environment directly.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProvidersConfig {
    pub vertex_ai_project_id: Option<String>,
    pub vertex_ai_location: String,
    pub github_models_token: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    pub access_token_expire_minutes: u32,
    pub api_key_expire_days: u32,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self { access_token_expire_minutes: 30, api_key_expire_days: 365 }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RateLimitConfig {
    pub requests: u32,
    pub window_seconds: u32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self { requests: 100, window_seconds: 60 }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadsConfig {
    pub max_file_size: u64,
    pub upload_dir: String,
}

impl Default for UploadsConfig {
    fn default() -> Self {
        Self { max_file_size: 10 * 1024 * 1024, upload_dir: "/tmp/archon-uploads".to_string() }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub cors_allowed_origins: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegionalDefaultsConfig {
    pub default_region: String,
    pub default_locale: String,
}

impl Default for RegionalDefaultsConfig {
    fn default() -> Self {
        Self { default_region: "US".to_string(), default_locale: "en-US".to_string() }
    }
}

/// Central configuration for the orchestration service. Every field here
/// corresponds to one of the environment variables spec.md §6 enumerates,
/// or a provider/rate-limit/regional setting recognized alongside them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrchestratorConfig {
    pub secret_key: String,
    pub database_url: String,
    pub redis_url: String,
    pub stripe_secret_key: Option<String>,
    pub log_level: String,
    pub providers: ProvidersConfig,
    pub auth: AuthConfig,
    pub rate_limit: RateLimitConfig,
    pub uploads: UploadsConfig,
    pub http: HttpConfig,
    pub regional: RegionalDefaultsConfig,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self::defaults()
    }
}

impl OrchestratorConfig {
    /// Built-in defaults, independent of any file or environment variable.
    /// `secret_key` is intentionally empty — [`validation::validate`]
    /// rejects an empty key, forcing every deployment to set one.
    #[must_use]
    pub fn defaults() -> Self {
        Self {
            secret_key: String::new(),
            database_url: "postgres://localhost/archon".to_string(),
            redis_url: "redis://localhost:6379".to_string(),
            stripe_secret_key: None,
            log_level: "info".to_string(),
            providers: ProvidersConfig { vertex_ai_project_id: None, vertex_ai_location: "us-central1".to_string(), github_models_token: None },
            auth: AuthConfig::default(),
            rate_limit: RateLimitConfig::default(),
            uploads: UploadsConfig::default(),
            http: HttpConfig::default(),
            regional: RegionalDefaultsConfig::default(),
        }
    }

    /// Parse a TOML document into a config layer (still subject to
    /// merging and environment overrides; not validated here).
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|source| ConfigError::Parse { path: "<inline>".to_string(), source: Box::new(source) })
    }

    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io { path: path.display().to_string(), source })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse { path: path.display().to_string(), source: Box::new(source) })
    }

    fn discover_file() -> Option<PathBuf> {
        CONFIG_SEARCH_PATHS.iter().map(PathBuf::from).find(|p| p.is_file())
    }

    /// Layer defaults, an optional TOML file (explicit `path`, or the
    /// first of [`CONFIG_SEARCH_PATHS`] that exists), and the process
    /// environment (via [`EnvRegistry`]), in that priority order, then
    /// validate the result.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        Self::load_with_registry(path, &EnvRegistry::with_standard_vars())
    }

    /// Same as [`Self::load`] but takes an explicit registry, so tests can
    /// inject overrides instead of mutating the process environment.
    pub fn load_with_registry(path: Option<&Path>, registry: &EnvRegistry) -> Result<Self, ConfigError> {
        let mut config = Self::defaults();

        let file_path = path.map(Path::to_path_buf).or_else(Self::discover_file);
        if let Some(file_path) = &file_path {
            debug!(path = %file_path.display(), "loading configuration file");
            let file_config = Self::load_from_file(file_path)?;
            merge::merge_config(&mut config, file_config);
        }

        apply_env_layer(&mut config, registry).map_err(ConfigError::EnvValidation)?;
        validation::validate(&config)?;
        Ok(config)
    }
}

/// Apply every environment key that was actually set (override or process
/// env, not merely defaulted) on top of `config`. This runs after the file
/// layer so the environment always wins, matching spec.md §6's precedence.
fn apply_env_layer(config: &mut OrchestratorConfig, registry: &EnvRegistry) -> Result<(), String> {
    macro_rules! set_if_present {
        ($key:expr, $target:expr, $parse:expr) => {
            if registry.resolve_set($key).is_some() {
                let validated = registry.resolve($key)?.expect("checked by resolve_set above");
                $target = $parse(validated);
            }
        };
    }

    set_if_present!("SECRET_KEY", config.secret_key, |v: String| v);
    set_if_present!("DATABASE_URL", config.database_url, |v: String| v);
    set_if_present!("REDIS_URL", config.redis_url, |v: String| v);
    set_if_present!("STRIPE_SECRET_KEY", config.stripe_secret_key, Some);
    set_if_present!("LOG_LEVEL", config.log_level, |v: String| v);
    set_if_present!("VERTEX_AI_PROJECT_ID", config.providers.vertex_ai_project_id, Some);
    set_if_present!("VERTEX_AI_LOCATION", config.providers.vertex_ai_location, |v: String| v);
    set_if_present!("GITHUB_MODELS_TOKEN", config.providers.github_models_token, Some);
    set_if_present!("ACCESS_TOKEN_EXPIRE_MINUTES", config.auth.access_token_expire_minutes, |v: String| v.parse().unwrap_or_default());
    set_if_present!("API_KEY_EXPIRE_DAYS", config.auth.api_key_expire_days, |v: String| v.parse().unwrap_or_default());
    set_if_present!("RATE_LIMIT_REQUESTS", config.rate_limit.requests, |v: String| v.parse().unwrap_or_default());
    set_if_present!("RATE_LIMIT_WINDOW", config.rate_limit.window_seconds, |v: String| v.parse().unwrap_or_default());
    set_if_present!("MAX_FILE_SIZE", config.uploads.max_file_size, |v: String| v.parse().unwrap_or_default());
    set_if_present!("UPLOAD_DIR", config.uploads.upload_dir, |v: String| v);
    set_if_present!("DEFAULT_REGION", config.regional.default_region, |v: String| v);
    set_if_present!("DEFAULT_LOCALE", config.regional.default_locale, |v: String| v);

    if let Some(origins) = registry.resolve_set("BACKEND_CORS_ORIGINS") {
        registry.resolve("BACKEND_CORS_ORIGINS")?;
        config.http.cors_allowed_origins = origins.split(',').map(str::trim).filter(|s| !s.is_empty()).map(str::to_string).collect();
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_fail_validation_without_a_secret_key() {
        let registry = EnvRegistry::new();
        let err = OrchestratorConfig::load_with_registry(None, &registry).unwrap_err();
        assert!(matches!(err, ConfigError::MissingRequired(_)));
    }

    #[test]
    fn env_override_wins_over_defaults() {
        let registry = EnvRegistry::new();
        registry.set_override("SECRET_KEY", "0123456789abcdef");
        registry.set_override("DEFAULT_REGION", "TR");
        let config = OrchestratorConfig::load_with_registry(None, &registry).unwrap();
        assert_eq!(config.regional.default_region, "TR");
        assert_eq!(config.secret_key, "0123456789abcdef");
    }

    #[test]
    fn file_layer_applies_before_env_and_env_still_wins() {
        let registry = EnvRegistry::new();
        registry.set_override("SECRET_KEY", "0123456789abcdef");
        registry.set_override("DEFAULT_REGION", "TR");
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("archon.toml");
        std::fs::write(&path, "database_url = \"postgres://file/archon\"\n[regional]\ndefault_region = \"DE\"\n").unwrap();

        let config = OrchestratorConfig::load_with_registry(Some(&path), &registry).unwrap();
        assert_eq!(config.database_url, "postgres://file/archon");
        assert_eq!(config.regional.default_region, "TR");
    }

    #[test]
    fn cors_origins_are_split_on_comma() {
        let registry = EnvRegistry::new();
        registry.set_override("SECRET_KEY", "0123456789abcdef");
        registry.set_override("BACKEND_CORS_ORIGINS", "https://a.example, https://b.example");
        let config = OrchestratorConfig::load_with_registry(None, &registry).unwrap();
        assert_eq!(config.http.cors_allowed_origins, vec!["https://a.example".to_string(), "https://b.example".to_string()]);
    }
}
