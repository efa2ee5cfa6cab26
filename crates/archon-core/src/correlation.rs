//! ABOUTME: Correlation id generation and validation
//! ABOUTME: Propagated through every log record, outbound call, and usage record

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Default prefix used when the caller does not supply one.
pub const DEFAULT_PREFIX: &str = "req";

/// Unique identifier for a single request, threaded through the whole
/// orchestration pipeline and into every `UsageRecord` and log line.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CorrelationId(String);

impl CorrelationId {
    /// Generate a new id: `"{prefix}_{yyyymmddhhmmss}_{8hex}"`.
    #[must_use]
    pub fn generate(prefix: &str, now: chrono::DateTime<chrono::Utc>) -> Self {
        let timestamp = now.format("%Y%m%d%H%M%S");
        let suffix: u32 = rand::thread_rng().gen();
        Self(format!("{prefix}_{timestamp}_{suffix:08x}"))
    }

    /// Accept a caller-supplied id if it is syntactically valid, otherwise `None`.
    ///
    /// Valid ids are non-empty, at most 128 bytes, and contain only ASCII
    /// alphanumerics, `_`, `-`, and `.` — permissive enough to accept
    /// upstream-generated ids while rejecting header-injection attempts.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.len() > 128 {
            return None;
        }
        if !trimmed
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'_' | b'-' | b'.'))
        {
            return None;
        }
        Some(Self(trimmed.to_string()))
    }

    /// Read `X-Correlation-ID` semantics: accept if valid, else generate fresh.
    #[must_use]
    pub fn from_header_or_generate(
        header_value: Option<&str>,
        now: chrono::DateTime<chrono::Utc>,
    ) -> Self {
        header_value
            .and_then(Self::parse)
            .unwrap_or_else(|| Self::generate(DEFAULT_PREFIX, now))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CorrelationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
