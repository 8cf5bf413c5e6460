// Confidence Scorer
// Weighted linear model over three sub-signals, each clamped to [0,1]
// before weighting. The weights are policy, not algorithm: they come in
// from EnginePolicy and are never hardcoded here.

use common::{MarketStructureSnapshot, VolumePressure};

use crate::policy::ScoringWeights;

/// Compute the bounded confidence score, rounded to two decimal places.
pub fn score(
    snapshot: &MarketStructureSnapshot,
    volume: &VolumePressure,
    dealer_aligned: bool,
    weights: &ScoringWeights,
) -> f64 {
    let oi_strength = oi_strength(snapshot);
    let volume_strength = clamp_unit(volume.strength());
    let dealer_strength = if dealer_aligned { 1.0 } else { 0.0 };

    let raw = weights.oi * oi_strength
        + weights.volume * volume_strength
        + weights.dealer * dealer_strength;

    round2(clamp_unit(raw))
}

/// Open-interest imbalance strength: |calls - puts| / (calls + puts),
/// zero when there is no open interest at all.
pub fn oi_strength(snapshot: &MarketStructureSnapshot) -> f64 {
    let calls = snapshot.total_call_oi as f64;
    let puts = snapshot.total_put_oi as f64;
    let denominator = calls + puts;

    if denominator > 0.0 {
        clamp_unit((calls - puts).abs() / denominator)
    } else {
        0.0
    }
}

fn clamp_unit(value: f64) -> f64 {
    value.clamp(0.0, 1.0)
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
