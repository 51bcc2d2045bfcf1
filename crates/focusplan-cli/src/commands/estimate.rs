use focusplan_core::{estimate_duration, ConfidenceBadge, EnergyType, EstimationSource};
use serde::Serialize;

#[derive(Serialize)]
struct EstimateOutput {
    min_minutes: u32,
    max_minutes: u32,
    confidence: f64,
    source: EstimationSource,
    energy_type: Option<EnergyType>,
    badge: ConfidenceBadge,
    requires_question: bool,
}

pub fn run(title: &str) -> Result<(), Box<dyn std::error::Error>> {
    let est = estimate_duration(title);
    let output = EstimateOutput {
        min_minutes: est.min_minutes,
        max_minutes: est.max_minutes,
        confidence: est.confidence,
        source: est.source,
        energy_type: est.energy_type,
        badge: est.badge(),
        requires_question: est.requires_question(),
    };
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
