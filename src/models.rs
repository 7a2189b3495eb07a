//! Request/response models for the prompt-analysis service.
//!
//! The service speaks Portuguese field names on the wire; the serde renames
//! keep the Rust side idiomatic while matching the contract exactly.

use serde::{Deserialize, Serialize};

// === Request Types ===

/// Request payload for submitting a prompt for analysis.
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct AnalysisRequest {
    #[serde(rename = "texto")]
    pub text: String,
}

impl AnalysisRequest {
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

// === Response Types ===

/// Water and energy figures for one measurement point.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct ConsumptionDetail {
    #[serde(rename = "agua_ml")]
    pub water_ml: f64,
    #[serde(rename = "energia_wh")]
    pub energy_wh: f64,
}

/// Consumption before and after optimization, plus the delta.
///
/// The service guarantees `saved = before - after` component-wise; the
/// client does not re-verify it outside of tests.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct ConsumptionMetrics {
    #[serde(rename = "antes")]
    pub before: ConsumptionDetail,
    #[serde(rename = "depois")]
    pub after: ConsumptionDetail,
    #[serde(rename = "economia")]
    pub saved: ConsumptionDetail,
}

/// A successfully parsed analysis response.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct AnalysisResult {
    #[serde(rename = "prompt_original")]
    pub original_prompt: String,
    #[serde(rename = "prompt_otimizado")]
    pub optimized_prompt: String,
    #[serde(rename = "partes_desnecessarias")]
    pub removed_parts: Vec<String>,
    #[serde(rename = "consumo")]
    pub consumption: ConsumptionMetrics,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample_response_json() -> &'static str {
        r#"{
            "prompt_original": "Ola, tudo bem? Me explique o que e um atomo, por favor.",
            "prompt_otimizado": "Explique o que e um atomo.",
            "partes_desnecessarias": ["Ola, tudo bem?", "por favor"],
            "consumo": {
                "antes":    { "agua_ml": 500.0, "energia_wh": 1.5 },
                "depois":   { "agua_ml": 100.0, "energia_wh": 0.3 },
                "economia": { "agua_ml": 400.0, "energia_wh": 1.2 }
            }
        }"#
    }

    #[test]
    fn request_serializes_with_wire_field_name() {
        let request = AnalysisRequest::new("explain atoms");
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json, serde_json::json!({ "texto": "explain atoms" }));
    }

    #[test]
    fn response_deserializes_from_wire_format() {
        let result: AnalysisResult = serde_json::from_str(sample_response_json()).unwrap();
        assert_eq!(result.optimized_prompt, "Explique o que e um atomo.");
        assert_eq!(result.removed_parts.len(), 2);
        assert_eq!(result.consumption.before.water_ml, 500.0);
        assert_eq!(result.consumption.saved.energy_wh, 1.2);
    }

    #[test]
    fn saved_matches_before_minus_after_in_fixture() {
        let result: AnalysisResult = serde_json::from_str(sample_response_json()).unwrap();
        let consumption = result.consumption;
        assert_eq!(
            consumption.saved.water_ml,
            consumption.before.water_ml - consumption.after.water_ml
        );
        assert_eq!(
            consumption.saved.energy_wh,
            consumption.before.energy_wh - consumption.after.energy_wh
        );
    }

    #[test]
    fn response_with_missing_consumption_is_rejected() {
        let json = r#"{
            "prompt_original": "a",
            "prompt_otimizado": "a",
            "partes_desnecessarias": []
        }"#;
        assert!(serde_json::from_str::<AnalysisResult>(json).is_err());
    }
}
