//! Pure transforms from a parsed analysis result to renderable values.

use crate::models::{AnalysisResult, ConsumptionDetail, ConsumptionMetrics};

// === Types ===

/// Renderable view of an analysis result.
///
/// Derived on every Success transition and carried alongside the result; it
/// decides whether the "has removed text" visual variant applies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresentationModel {
    /// Removed parts with surrounding whitespace trimmed, original order kept.
    pub removed_segments: Vec<String>,
    pub has_redundant_parts: bool,
}

// === Transform ===

/// Derive the presentation model for a result. Pure; same input, same output.
#[must_use]
pub fn transform(result: &AnalysisResult) -> PresentationModel {
    let removed_segments: Vec<String> = result
        .removed_parts
        .iter()
        .map(|part| part.trim().to_string())
        .collect();
    let has_redundant_parts = !removed_segments.is_empty();

    PresentationModel {
        removed_segments,
        has_redundant_parts,
    }
}

// === Display Helpers ===

/// Format one measurement point as `"<water> | <energy>"`.
///
/// Water switches to liters at 1000 ml, matching the service UI's strings.
#[must_use]
pub fn format_consumption(detail: &ConsumptionDetail) -> String {
    let water = if detail.water_ml >= 1000.0 {
        format!("{:.1} L", detail.water_ml / 1000.0)
    } else {
        format!("{:.1} ml", detail.water_ml)
    };
    format!("{water} | {:.1} Wh", detail.energy_wh)
}

/// Share of the before-consumption saved by the optimization, averaged over
/// water and energy. `None` when both before figures are zero.
#[must_use]
pub fn savings_percent(metrics: &ConsumptionMetrics) -> Option<u8> {
    let ratios: Vec<f64> = [
        (metrics.saved.water_ml, metrics.before.water_ml),
        (metrics.saved.energy_wh, metrics.before.energy_wh),
    ]
    .into_iter()
    .filter(|(_, before)| *before > 0.0)
    .map(|(saved, before)| (saved / before).clamp(0.0, 1.0))
    .collect();

    if ratios.is_empty() {
        return None;
    }

    let mean = ratios.iter().sum::<f64>() / ratios.len() as f64;
    Some((mean * 100.0).round() as u8)
}
