//! ABOUTME: Resolves a BCP-47 locale into region/measurement/cultural settings
//! ABOUTME: used to fill the prompt assembler's locale-derived template slots

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MeasurementSystem {
    Metric,
    Imperial,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CulturalPreferences {
    pub privacy_level: String,
    pub family_structure: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolvedLocale {
    pub language: String,
    pub region: String,
    pub measurement_system: MeasurementSystem,
    pub cultural_preferences: CulturalPreferences,
}

/// Resolves a locale tag (or a detected language) into the fields the
/// prompt templates expect. Only a handful of regions are seeded; unknown
/// regions fall back to metric/neutral defaults rather than failing, since
/// an unrecognized locale should degrade gracefully, not block the request.
#[must_use]
pub fn resolve(language: &str, region_hint: Option<&str>) -> ResolvedLocale {
    let region = region_hint.map(str::to_uppercase).unwrap_or_else(|| default_region(language));
    let measurement_system = match region.as_str() {
        "US" => MeasurementSystem::Imperial,
        _ => MeasurementSystem::Metric,
    };
    let cultural_preferences = match language {
        "tr" => CulturalPreferences {
            privacy_level: "high".to_string(),
            family_structure: "extended".to_string(),
        },
        _ => CulturalPreferences {
            privacy_level: "standard".to_string(),
            family_structure: "nuclear".to_string(),
        },
    };

    ResolvedLocale {
        language: language.to_string(),
        region,
        measurement_system,
        cultural_preferences,
    }
}

fn default_region(language: &str) -> String {
    match language {
        "tr" => "TR",
        "de" => "DE",
        "fr" => "FR",
        "es" => "ES",
        _ => "US",
    }
    .to_string()
}
