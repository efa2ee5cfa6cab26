//! ABOUTME: Monthly/hourly usage quotas per subscription tier
//! ABOUTME: Magnitudes are ported from the billing service's tier limit table

use archon_core::types::tenant::SubscriptionTier;
use serde::{Deserialize, Serialize};

/// The countable categories the accountant tracks (spec §4.9). Distinct
/// from the billing service's original `UsageType` strings: only the
/// categories the orchestrator itself meters are kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UsageCategory {
    AiRequests,
    LayoutGenerations,
    DocumentUploads,
    ProjectCreations,
    ApiCallsHourly,
}

impl UsageCategory {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AiRequests => "ai_requests",
            Self::LayoutGenerations => "layout_generations",
            Self::DocumentUploads => "document_uploads",
            Self::ProjectCreations => "project_creations",
            Self::ApiCallsHourly => "api_calls_hourly",
        }
    }

    /// Whether this category resets hourly rather than monthly.
    #[must_use]
    pub const fn is_hourly(self) -> bool {
        matches!(self, Self::ApiCallsHourly)
    }
}

/// Per-tier quota for every tracked category.
#[derive(Debug, Clone, Copy)]
pub struct TierLimits {
    pub ai_requests: u32,
    pub layout_generations: u32,
    pub document_uploads: u32,
    pub project_creations: u32,
    pub api_calls_hourly: u32,
}

impl TierLimits {
    #[must_use]
    pub const fn limit_for(self, category: UsageCategory) -> u32 {
        match category {
            UsageCategory::AiRequests => self.ai_requests,
            UsageCategory::LayoutGenerations => self.layout_generations,
            UsageCategory::DocumentUploads => self.document_uploads,
            UsageCategory::ProjectCreations => self.project_creations,
            UsageCategory::ApiCallsHourly => self.api_calls_hourly,
        }
    }
}

/// Quota table for `tier`, ported from `SubscriptionTierLimits.LIMITS`.
/// `ai_requests` folds the original's separate layout/room AI counters into
/// one combined request quota; `layout_generations` keeps the
/// layout-specific figure for the stricter per-artifact limit.
#[must_use]
pub const fn limits_for_tier(tier: SubscriptionTier) -> TierLimits {
    match tier {
        SubscriptionTier::Free => TierLimits {
            ai_requests: 13,
            layout_generations: 3,
            document_uploads: 5,
            project_creations: 1,
            api_calls_hourly: 100,
        },
        SubscriptionTier::Starter => TierLimits {
            ai_requests: 125,
            layout_generations: 25,
            document_uploads: 50,
            project_creations: 10,
            api_calls_hourly: 1000,
        },
        SubscriptionTier::Professional => TierLimits {
            ai_requests: 600,
            layout_generations: 100,
            document_uploads: 200,
            project_creations: 50,
            api_calls_hourly: 5000,
        },
        SubscriptionTier::Enterprise => TierLimits {
            ai_requests: 6000,
            layout_generations: 1000,
            document_uploads: 2000,
            project_creations: 500,
            api_calls_hourly: 50000,
        },
    }
}
