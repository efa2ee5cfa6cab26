//! ABOUTME: Configuration layer composition: later layers override earlier ones
//! ABOUTME: Primitive fields override if non-default in `source`; nested structs recurse

use crate::{AuthConfig, HttpConfig, OrchestratorConfig, ProvidersConfig, RateLimitConfig, RegionalDefaultsConfig, UploadsConfig};

/// Apply `source` on top of `base`, with `source` values taking precedence
/// whenever they differ from [`OrchestratorConfig::default`]. This is the
/// main entry point for composing the file layer onto the built-in
/// defaults; the environment layer is applied afterward field-by-field by
/// [`crate::OrchestratorConfig::load`] since only `EnvRegistry` knows which
/// keys were actually set versus defaulted.
pub fn merge_config(base: &mut OrchestratorConfig, source: OrchestratorConfig) {
    let defaults = OrchestratorConfig::defaults();

    if source.database_url != defaults.database_url {
        base.database_url = source.database_url;
    }
    if source.redis_url != defaults.redis_url {
        base.redis_url = source.redis_url;
    }
    if source.log_level != defaults.log_level {
        base.log_level = source.log_level;
    }
    if source.stripe_secret_key.is_some() {
        base.stripe_secret_key = source.stripe_secret_key;
    }
    if !source.secret_key.is_empty() {
        base.secret_key = source.secret_key;
    }

    merge_providers(&mut base.providers, source.providers, &defaults.providers);
    merge_auth(&mut base.auth, source.auth, &defaults.auth);
    merge_rate_limit(&mut base.rate_limit, source.rate_limit, &defaults.rate_limit);
    merge_uploads(&mut base.uploads, source.uploads, &defaults.uploads);
    merge_http(&mut base.http, source.http, &defaults.http);
    merge_regional(&mut base.regional, source.regional, &defaults.regional);
}

fn merge_providers(base: &mut ProvidersConfig, source: ProvidersConfig, defaults: &ProvidersConfig) {
    if source.vertex_ai_project_id.is_some() {
        base.vertex_ai_project_id = source.vertex_ai_project_id;
    }
    if source.vertex_ai_location != defaults.vertex_ai_location {
        base.vertex_ai_location = source.vertex_ai_location;
    }
    if source.github_models_token.is_some() {
        base.github_models_token = source.github_models_token;
    }
}

fn merge_auth(base: &mut AuthConfig, source: AuthConfig, defaults: &AuthConfig) {
    if source.access_token_expire_minutes != defaults.access_token_expire_minutes {
        base.access_token_expire_minutes = source.access_token_expire_minutes;
    }
    if source.api_key_expire_days != defaults.api_key_expire_days {
        base.api_key_expire_days = source.api_key_expire_days;
    }
}

fn merge_rate_limit(base: &mut RateLimitConfig, source: RateLimitConfig, defaults: &RateLimitConfig) {
    if source.requests != defaults.requests {
        base.requests = source.requests;
    }
    if source.window_seconds != defaults.window_seconds {
        base.window_seconds = source.window_seconds;
    }
}

fn merge_uploads(base: &mut UploadsConfig, source: UploadsConfig, defaults: &UploadsConfig) {
    if source.max_file_size != defaults.max_file_size {
        base.max_file_size = source.max_file_size;
    }
    if source.upload_dir != defaults.upload_dir {
        base.upload_dir = source.upload_dir;
    }
}

fn merge_http(base: &mut HttpConfig, source: HttpConfig, defaults: &HttpConfig) {
    if source.cors_allowed_origins != defaults.cors_allowed_origins {
        base.cors_allowed_origins = source.cors_allowed_origins;
    }
}

fn merge_regional(base: &mut RegionalDefaultsConfig, source: RegionalDefaultsConfig, defaults: &RegionalDefaultsConfig) {
    if source.default_region != defaults.default_region {
        base.default_region = source.default_region;
    }
    if source.default_locale != defaults.default_locale {
        base.default_locale = source.default_locale;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_default_source_field_overrides_base() {
        let mut base = OrchestratorConfig::defaults();
        let mut source = OrchestratorConfig::defaults();
        source.regional.default_region = "EU".to_string();
        merge_config(&mut base, source);
        assert_eq!(base.regional.default_region, "EU");
    }

    #[test]
    fn default_valued_source_field_does_not_clobber_base() {
        let mut base = OrchestratorConfig::defaults();
        base.rate_limit.requests = 250;
        let source = OrchestratorConfig::defaults();
        merge_config(&mut base, source);
        assert_eq!(base.rate_limit.requests, 250);
    }
}
