//! ABOUTME: Tenant identity and subscription tier types
//! ABOUTME: The core only ever sees an opaque tenant id plus its tier

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque tenant identifier. The orchestration core never resolves this to
/// billing/auth records; that lives entirely outside the core.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TenantId(String);

impl TenantId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TenantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for TenantId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for TenantId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Subscription tier; determines usage quotas and model accessibility.
///
/// Ordering matters for `>=` comparisons used by model-gating rules
/// (e.g. a model restricted to `PROFESSIONAL` and above).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SubscriptionTier {
    Free,
    Starter,
    Professional,
    Enterprise,
}

impl SubscriptionTier {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Free => "FREE",
            Self::Starter => "STARTER",
            Self::Professional => "PROFESSIONAL",
            Self::Enterprise => "ENTERPRISE",
        }
    }
}

impl fmt::Display for SubscriptionTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tiers_order_low_to_high() {
        assert!(SubscriptionTier::Free < SubscriptionTier::Starter);
        assert!(SubscriptionTier::Starter < SubscriptionTier::Professional);
        assert!(SubscriptionTier::Professional < SubscriptionTier::Enterprise);
    }
}
