//! ABOUTME: Error taxonomy for the orchestration service
//! ABOUTME: Maps internal failures onto the stable error codes the HTTP boundary exposes

use thiserror::Error;

/// Comprehensive error enum for all orchestration operations.
///
/// Each variant carries enough context to build the `{code, message}` pair of
/// the external error envelope without the HTTP boundary needing to inspect
/// internals. Components raise these directly; only the coordinator and the
/// (out-of-scope) HTTP boundary translate them into user-visible responses.
#[derive(Debug, Error)]
pub enum OrchestratorError {
    /// Malformed request or out-of-range value. Never retried, never triggers fallback.
    #[error("validation error: {message}")]
    Validation { message: String },

    /// Configuration is missing, malformed, or refers to an unknown resource.
    #[error("configuration error: {message}")]
    Configuration { message: String },

    /// A provider call failed transiently (timeout, 5xx, 429) or permanently (4xx, auth).
    #[error("provider error: {message}")]
    Provider { message: String, retryable: bool },

    /// The circuit for a (provider, model) pair is open.
    #[error("provider unavailable: {provider}/{model}")]
    ProviderUnavailable { provider: String, model: String },

    /// AI output failed structural or schema validation.
    #[error("output validation failed: {message}")]
    OutputValidation { message: String },

    /// Tenant has exhausted its quota for a usage category.
    #[error("quota exceeded for {category}: {remaining}/{limit} remaining")]
    QuotaExceeded {
        category: String,
        remaining: u64,
        limit: u64,
    },

    /// Tenant has exceeded its per-tier rate limit.
    #[error("rate limited, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    /// Requested resource does not exist.
    #[error("not found: {message}")]
    NotFound { message: String },

    /// Caller is not authorized for the requested operation.
    #[error("unauthorized: {message}")]
    Unauthorized { message: String },

    /// Workflow step or project state machine violation.
    #[error("workflow error: {message}")]
    Workflow { message: String },

    /// Cache/storage backend failure.
    #[error("storage error: {message}")]
    Storage { message: String },

    /// Unexpected internal failure; surfaced as `SYS_001`.
    #[error("internal error: {message}")]
    Internal { message: String },
}

impl OrchestratorError {
    /// Stable error code used in the external error envelope (spec §6).
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Validation { .. } => "VAL_001",
            Self::Configuration { .. } => "VAL_002",
            Self::Provider { .. } => "AI_001",
            Self::ProviderUnavailable { .. } => "AI_001",
            Self::OutputValidation { .. } => "AI_002",
            Self::QuotaExceeded { .. } => "QUOTA_EXCEEDED",
            Self::RateLimited { .. } => "RATE_LIMITED",
            Self::NotFound { .. } => "NOT_FOUND",
            Self::Unauthorized { .. } => "UNAUTHORIZED",
            Self::Workflow { .. } => "NET_001",
            Self::Storage { .. } => "NET_002",
            Self::Internal { .. } => "SYS_001",
        }
    }

    /// Whether the coordinator should attempt the fallback generator for this error.
    ///
    /// Input and quota/rate errors never trigger fallback (spec §7).
    #[must_use]
    pub const fn triggers_fallback(&self) -> bool {
        matches!(
            self,
            Self::Provider { .. } | Self::ProviderUnavailable { .. } | Self::OutputValidation { .. }
        )
    }

    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

/// Convenience Result type alias used across the workspace.
pub type Result<T> = std::result::Result<T, OrchestratorError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_errors_trigger_fallback() {
        let err = OrchestratorError::Provider {
            message: "503".into(),
            retryable: true,
        };
        assert!(err.triggers_fallback());
        assert_eq!(err.code(), "AI_001");
    }

    #[test]
    fn validation_errors_never_trigger_fallback() {
        let err = OrchestratorError::validation("bad area");
        assert!(!err.triggers_fallback());
        assert_eq!(err.code(), "VAL_001");
    }

    #[test]
    fn quota_exceeded_carries_remaining() {
        let err = OrchestratorError::QuotaExceeded {
            category: "ai_requests".into(),
            remaining: 0,
            limit: 100,
        };
        assert_eq!(err.code(), "QUOTA_EXCEEDED");
        assert!(!err.triggers_fallback());
    }
}
