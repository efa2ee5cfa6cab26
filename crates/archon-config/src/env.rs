//! ABOUTME: Centralized environment variable registry for orchestrator configuration
//! ABOUTME: Single source of truth for every recognized key and its validation rule

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// Category of environment variable, used only to group them in `describe()` output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvCategory {
    Secrets,
    Storage,
    Providers,
    Auth,
    RateLimit,
    Uploads,
    Http,
    Regional,
}

type ValidatorFn = Box<dyn Fn(&str) -> Result<(), String> + Send + Sync>;

/// Definition of a single recognized environment variable.
pub struct EnvVarDef {
    pub name: &'static str,
    pub category: EnvCategory,
    pub default: Option<&'static str>,
    pub sensitive: bool,
    pub validator: ValidatorFn,
}

impl EnvVarDef {
    #[must_use]
    pub fn new(name: &'static str, category: EnvCategory, default: Option<&'static str>, sensitive: bool) -> Self {
        Self { name, category, default, sensitive, validator: Box::new(|_| Ok(())) }
    }

    #[must_use]
    pub fn with_validator(mut self, validator: impl Fn(&str) -> Result<(), String> + Send + Sync + 'static) -> Self {
        self.validator = Box::new(validator);
        self
    }
}

fn parses_as<T: std::str::FromStr>(label: &'static str) -> impl Fn(&str) -> Result<(), String> {
    move |value| value.parse::<T>().map(|_| ()).map_err(|_| format!("{value} is not a valid {label}"))
}

/// Every key spec.md §6 enumerates, plus the provider credentials the
/// orchestrator needs to dispatch to Vertex AI / GitHub Models, each with
/// its default and a light validator. `lib.rs::OrchestratorConfig::load`
/// consults this table; nothing reads `std::env::var` directly outside it.
pub struct EnvRegistry {
    definitions: Arc<RwLock<HashMap<&'static str, EnvVarDef>>>,
    overrides: Arc<RwLock<HashMap<String, String>>>,
}

impl Default for EnvRegistry {
    fn default() -> Self {
        Self::with_standard_vars()
    }
}

impl EnvRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self { definitions: Arc::new(RwLock::new(HashMap::new())), overrides: Arc::new(RwLock::new(HashMap::new())) }
    }

    /// Build the registry pre-populated with every key this service recognizes.
    #[must_use]
    pub fn with_standard_vars() -> Self {
        let registry = Self::new();
        registry.register(EnvVarDef::new("SECRET_KEY", EnvCategory::Secrets, None, true));
        registry.register(EnvVarDef::new("DATABASE_URL", EnvCategory::Storage, Some("postgres://localhost/archon"), false));
        registry.register(EnvVarDef::new("REDIS_URL", EnvCategory::Storage, Some("redis://localhost:6379"), false));
        registry.register(EnvVarDef::new("VERTEX_AI_PROJECT_ID", EnvCategory::Providers, None, false));
        registry.register(EnvVarDef::new("VERTEX_AI_LOCATION", EnvCategory::Providers, Some("us-central1"), false));
        registry.register(EnvVarDef::new("GITHUB_MODELS_TOKEN", EnvCategory::Providers, None, true));
        registry.register(EnvVarDef::new("STRIPE_SECRET_KEY", EnvCategory::Secrets, None, true));
        registry.register(EnvVarDef::new("LOG_LEVEL", EnvCategory::Auth, Some("info"), false));
        registry.register(EnvVarDef::new("ACCESS_TOKEN_EXPIRE_MINUTES", EnvCategory::Auth, Some("30"), false).with_validator(parses_as::<u32>("u32")));
        registry.register(EnvVarDef::new("API_KEY_EXPIRE_DAYS", EnvCategory::Auth, Some("365"), false).with_validator(parses_as::<u32>("u32")));
        registry.register(EnvVarDef::new("RATE_LIMIT_REQUESTS", EnvCategory::RateLimit, Some("100"), false).with_validator(parses_as::<u32>("u32")));
        registry.register(EnvVarDef::new("RATE_LIMIT_WINDOW", EnvCategory::RateLimit, Some("60"), false).with_validator(parses_as::<u32>("u32")));
        registry.register(EnvVarDef::new("MAX_FILE_SIZE", EnvCategory::Uploads, Some("10485760"), false).with_validator(parses_as::<u64>("u64")));
        registry.register(EnvVarDef::new("UPLOAD_DIR", EnvCategory::Uploads, Some("/tmp/archon-uploads"), false));
        registry.register(EnvVarDef::new("BACKEND_CORS_ORIGINS", EnvCategory::Http, Some(""), false));
        registry.register(EnvVarDef::new("DEFAULT_REGION", EnvCategory::Regional, Some("US"), false));
        registry.register(EnvVarDef::new("DEFAULT_LOCALE", EnvCategory::Regional, Some("en-US"), false));
        registry
    }

    pub fn register(&self, def: EnvVarDef) {
        self.definitions.write().expect("registry lock poisoned").insert(def.name, def);
    }

    /// Set a programmatic override, taking precedence over the process
    /// environment. Tests use this instead of mutating `std::env` so they
    /// can run concurrently without interfering with one another.
    pub fn set_override(&self, name: &str, value: impl Into<String>) {
        self.overrides.write().expect("registry lock poisoned").insert(name.to_string(), value.into());
    }

    /// Resolve a key: override, then process environment, then the
    /// registered default. Returns `Err` if a validator rejects the value.
    pub fn resolve(&self, name: &str) -> Result<Option<String>, String> {
        let raw = self.resolve_set(name).or_else(|| self.definitions.read().expect("registry lock poisoned").get(name).and_then(|d| d.default).map(str::to_string));
        self.validate(name, raw.as_deref())?;
        Ok(raw)
    }

    /// Resolve a key from an override or the process environment only,
    /// ignoring the registered default. Used to tell "explicitly set" apart
    /// from "fell back to default" when layering config sources.
    pub fn resolve_set(&self, name: &str) -> Option<String> {
        self.overrides.read().expect("registry lock poisoned").get(name).cloned().or_else(|| std::env::var(name).ok())
    }

    fn validate(&self, name: &str, value: Option<&str>) -> Result<(), String> {
        if let (Some(value), Some(def)) = (value, self.definitions.read().expect("registry lock poisoned").get(name)) {
            (def.validator)(value)?;
        }
        Ok(())
    }

    #[must_use]
    pub fn is_sensitive(&self, name: &str) -> bool {
        self.definitions.read().expect("registry lock poisoned").get(name).is_some_and(|d| d.sensitive)
    }
}
