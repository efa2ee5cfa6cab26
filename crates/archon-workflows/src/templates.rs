//! ABOUTME: Project complexity classification and the per-complexity step template
//! ABOUTME: Simple/standard/complex produce 9/~13/~19 steps per spec §4.11

use crate::step::WorkflowStep;
use crate::project::ProjectComplexity;
use crate::step::StepKind;
use serde_json::Value;
use std::collections::HashMap;

fn field_u32(fields: &HashMap<String, Value>, key: &str, default: u32) -> u32 {
    fields.get(key).and_then(Value::as_u64).map_or(default, |v| v as u32)
}

fn field_f64(fields: &HashMap<String, Value>, key: &str, default: f64) -> f64 {
    fields.get(key).and_then(Value::as_f64).unwrap_or(default)
}

fn field_len(fields: &HashMap<String, Value>, key: &str) -> usize {
    fields.get(key).and_then(Value::as_array).map_or(0, Vec::len)
}

/// Classify a project's template bucket from its request features: building
/// type, area, floor count, document count, special requirements (spec
/// §4.11). Any one feature crossing its threshold bumps the bucket.
#[must_use]
pub fn classify_complexity(fields: &HashMap<String, Value>) -> ProjectComplexity {
    let floors = field_u32(fields, "floors", 1);
    let area_m2 = field_f64(fields, "total_area_m2", 80.0);
    let documents = field_len(fields, "document_ids");
    let special_requirements = field_len(fields, "special_requirements");

    if floors >= 4 || area_m2 > 500.0 || documents > 5 || special_requirements > 3 {
        ProjectComplexity::Complex
    } else if floors >= 2 || area_m2 > 150.0 || documents > 1 || special_requirements > 0 {
        ProjectComplexity::Standard
    } else {
        ProjectComplexity::Simple
    }
}

struct StepSpec {
    kind: StepKind,
    deps: &'static [StepKind],
    estimated_minutes: u32,
}

/// Build the ordered step list for `complexity`, given `fields` for sizing
/// the per-floor/per-document repetition standard and complex templates
/// add. Step ids are `"{project_id}_step_{index}"`.
#[must_use]
pub fn build_steps(project_id: &str, complexity: ProjectComplexity, fields: &HashMap<String, Value>) -> Vec<WorkflowStep> {
    let floors = field_u32(fields, "floors", 1).max(1);
    let documents = field_len(fields, "document_ids").max(1) as u32;

    let specs: Vec<StepSpec> = match complexity {
        // The base kind set, once each: 9 steps.
        ProjectComplexity::Simple => vec![
            StepSpec { kind: StepKind::ParseDocs, deps: &[], estimated_minutes: 2 },
            StepSpec { kind: StepKind::IndexRag, deps: &[StepKind::ParseDocs], estimated_minutes: 2 },
            StepSpec { kind: StepKind::AnalyzeReqs, deps: &[StepKind::ParseDocs], estimated_minutes: 3 },
            StepSpec { kind: StepKind::AnalyzeSite, deps: &[StepKind::ParseDocs], estimated_minutes: 3 },
            StepSpec { kind: StepKind::GenerateLayout, deps: &[StepKind::AnalyzeReqs, StepKind::AnalyzeSite], estimated_minutes: 5 },
            StepSpec { kind: StepKind::Validate, deps: &[StepKind::GenerateLayout], estimated_minutes: 2 },
            StepSpec { kind: StepKind::Optimize, deps: &[StepKind::Validate], estimated_minutes: 3 },
            StepSpec { kind: StepKind::PrepareRevit, deps: &[StepKind::Optimize], estimated_minutes: 2 },
            StepSpec { kind: StepKind::FinalReview, deps: &[StepKind::PrepareRevit], estimated_minutes: 1 },
        ],
        // One generate_layout/validate pair per floor, single shared
        // optimize/prepare/review pass. ~13 steps at floors=3.
        ProjectComplexity::Standard => {
            let mut specs = vec![
                StepSpec { kind: StepKind::ParseDocs, deps: &[], estimated_minutes: 2 },
                StepSpec { kind: StepKind::IndexRag, deps: &[StepKind::ParseDocs], estimated_minutes: 2 },
                StepSpec { kind: StepKind::AnalyzeReqs, deps: &[StepKind::ParseDocs], estimated_minutes: 3 },
                StepSpec { kind: StepKind::AnalyzeSite, deps: &[StepKind::ParseDocs], estimated_minutes: 3 },
            ];
            for _ in 0..floors {
                specs.push(StepSpec { kind: StepKind::GenerateLayout, deps: &[StepKind::AnalyzeReqs, StepKind::AnalyzeSite], estimated_minutes: 5 });
                specs.push(StepSpec { kind: StepKind::Validate, deps: &[StepKind::GenerateLayout], estimated_minutes: 2 });
            }
            specs.push(StepSpec { kind: StepKind::Optimize, deps: &[StepKind::Validate], estimated_minutes: 4 });
            specs.push(StepSpec { kind: StepKind::PrepareRevit, deps: &[StepKind::Optimize], estimated_minutes: 2 });
            specs.push(StepSpec { kind: StepKind::FinalReview, deps: &[StepKind::PrepareRevit], estimated_minutes: 1 });
            specs
        }
        // One parse_docs per uploaded document, one generate/validate/optimize
        // triple per floor. ~19 steps at floors=4, documents=3.
        ProjectComplexity::Complex => {
            let mut specs = Vec::new();
            for _ in 0..documents {
                specs.push(StepSpec { kind: StepKind::ParseDocs, deps: &[], estimated_minutes: 2 });
            }
            specs.push(StepSpec { kind: StepKind::IndexRag, deps: &[StepKind::ParseDocs], estimated_minutes: 3 });
            specs.push(StepSpec { kind: StepKind::AnalyzeReqs, deps: &[StepKind::ParseDocs, StepKind::IndexRag], estimated_minutes: 4 });
            specs.push(StepSpec { kind: StepKind::AnalyzeSite, deps: &[StepKind::ParseDocs], estimated_minutes: 4 });
            for _ in 0..floors {
                specs.push(StepSpec { kind: StepKind::GenerateLayout, deps: &[StepKind::AnalyzeReqs, StepKind::AnalyzeSite], estimated_minutes: 6 });
                specs.push(StepSpec { kind: StepKind::Validate, deps: &[StepKind::GenerateLayout], estimated_minutes: 3 });
                specs.push(StepSpec { kind: StepKind::Optimize, deps: &[StepKind::Validate], estimated_minutes: 4 });
            }
            specs.push(StepSpec { kind: StepKind::PrepareRevit, deps: &[StepKind::Optimize], estimated_minutes: 3 });
            specs.push(StepSpec { kind: StepKind::FinalReview, deps: &[StepKind::PrepareRevit], estimated_minutes: 2 });
            specs
        }
    };

    specs
        .into_iter()
        .enumerate()
        .map(|(index, spec)| WorkflowStep::new(format!("{project_id}_step_{index}"), index, spec.kind, spec.deps.to_vec(), spec.estimated_minutes))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_fields_classify_as_simple() {
        assert_eq!(classify_complexity(&HashMap::new()), ProjectComplexity::Simple);
    }

    #[test]
    fn large_area_classifies_as_complex() {
        let mut fields = HashMap::new();
        fields.insert("total_area_m2".to_string(), json!(600.0));
        assert_eq!(classify_complexity(&fields), ProjectComplexity::Complex);
    }

    #[test]
    fn two_floors_classifies_as_standard() {
        let mut fields = HashMap::new();
        fields.insert("floors".to_string(), json!(2));
        assert_eq!(classify_complexity(&fields), ProjectComplexity::Standard);
    }

    #[test]
    fn simple_template_has_nine_steps_in_kind_order() {
        let steps = build_steps("p1", ProjectComplexity::Simple, &HashMap::new());
        assert_eq!(steps.len(), 9);
        assert_eq!(steps[0].kind, StepKind::ParseDocs);
        assert_eq!(steps.last().unwrap().kind, StepKind::FinalReview);
    }

    #[test]
    fn standard_template_scales_with_floor_count() {
        let mut fields = HashMap::new();
        fields.insert("floors".to_string(), json!(3));
        let steps = build_steps("p1", ProjectComplexity::Standard, &fields);
        assert_eq!(steps.len(), 13);
    }

    #[test]
    fn complex_template_scales_with_floors_and_documents() {
        let mut fields = HashMap::new();
        fields.insert("floors".to_string(), json!(4));
        fields.insert("document_ids".to_string(), json!(["a", "b", "c"]));
        let steps = build_steps("p1", ProjectComplexity::Complex, &fields);
        assert_eq!(steps.len(), 19);
    }

    #[test]
    fn step_ids_are_unique_and_indexed() {
        let steps = build_steps("proj_42", ProjectComplexity::Simple, &HashMap::new());
        for (i, step) in steps.iter().enumerate() {
            assert_eq!(step.index, i);
            assert_eq!(step.step_id, format!("proj_42_step_{i}"));
        }
    }
}
