//! ABOUTME: Post-load sanity checks: one function per config section
//! ABOUTME: Called once by `OrchestratorConfig::load`; never run implicitly on every access

use crate::{ConfigError, OrchestratorConfig};

/// Validate a fully-composed configuration. Returns the first violation
/// found; callers that want every violation should call the per-section
/// functions directly.
pub fn validate(config: &OrchestratorConfig) -> Result<(), ConfigError> {
    validate_secrets(config)?;
    validate_rate_limit(config)?;
    validate_uploads(config)?;
    validate_regional(config)?;
    Ok(())
}

fn validate_secrets(config: &OrchestratorConfig) -> Result<(), ConfigError> {
    if config.secret_key.is_empty() {
        return Err(ConfigError::MissingRequired("SECRET_KEY".to_string()));
    }
    if config.secret_key.len() < 16 {
        return Err(ConfigError::Invalid { name: "SECRET_KEY".to_string(), reason: "must be at least 16 characters".to_string() });
    }
    Ok(())
}

fn validate_rate_limit(config: &OrchestratorConfig) -> Result<(), ConfigError> {
    if config.rate_limit.requests == 0 {
        return Err(ConfigError::Invalid { name: "RATE_LIMIT_REQUESTS".to_string(), reason: "must be greater than zero".to_string() });
    }
    if config.rate_limit.window_seconds == 0 {
        return Err(ConfigError::Invalid { name: "RATE_LIMIT_WINDOW".to_string(), reason: "must be greater than zero".to_string() });
    }
    Ok(())
}

fn validate_uploads(config: &OrchestratorConfig) -> Result<(), ConfigError> {
    if config.uploads.max_file_size == 0 {
        return Err(ConfigError::Invalid { name: "MAX_FILE_SIZE".to_string(), reason: "must be greater than zero".to_string() });
    }
    if config.uploads.upload_dir.trim().is_empty() {
        return Err(ConfigError::Invalid { name: "UPLOAD_DIR".to_string(), reason: "must not be empty".to_string() });
    }
    Ok(())
}

fn validate_regional(config: &OrchestratorConfig) -> Result<(), ConfigError> {
    if config.regional.default_locale.split('-').next().unwrap_or_default().is_empty() {
        return Err(ConfigError::Invalid { name: "DEFAULT_LOCALE".to_string(), reason: "must be a BCP-47 tag with a language subtag".to_string() });
    }
    Ok(())
}
