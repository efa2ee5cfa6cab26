//! ABOUTME: Static model catalog: languages, token limits, and specialties per model
//! ABOUTME: Ported from `AIModelSelector.model_config`, unchanged in meaning

/// Identifies one (provider, model) pair the dispatcher can route to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ModelId {
    pub provider: &'static str,
    pub model: &'static str,
}

impl ModelId {
    pub const VERTEX_GEMINI_FLASH_LITE: Self = Self { provider: "vertex_ai", model: "gemini-2.5-flash-lite" };
    pub const GITHUB_GPT_4_1: Self = Self { provider: "github_models", model: "gpt-4.1" };

    #[must_use]
    pub fn key(&self) -> String {
        format!("{}/{}", self.provider, self.model)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ModelProfile {
    pub id: ModelId,
    pub max_tokens: u32,
    pub languages: &'static [&'static str],
    pub cost_tier: CostTier,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CostTier {
    Low,
    Medium,
}

/// Full catalog: every model the orchestrator is allowed to dispatch to.
#[must_use]
pub const fn catalog() -> &'static [ModelProfile] {
    &[
        ModelProfile {
            id: ModelId::VERTEX_GEMINI_FLASH_LITE,
            max_tokens: 32_768,
            languages: &["en", "tr", "de", "fr", "es"],
            cost_tier: CostTier::Low,
        },
        ModelProfile {
            id: ModelId::GITHUB_GPT_4_1,
            max_tokens: 128_000,
            languages: &["en", "tr", "de", "fr", "es"],
            cost_tier: CostTier::Medium,
        },
    ]
}

#[must_use]
pub fn profile_for(id: ModelId) -> Option<ModelProfile> {
    catalog().iter().copied().find(|profile| profile.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_has_both_models() {
        assert!(profile_for(ModelId::VERTEX_GEMINI_FLASH_LITE).is_some());
        assert!(profile_for(ModelId::GITHUB_GPT_4_1).is_some());
    }

    #[test]
    fn model_key_is_provider_slash_model() {
        assert_eq!(ModelId::GITHUB_GPT_4_1.key(), "github_models/gpt-4.1");
    }
}
