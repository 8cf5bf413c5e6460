//! Engine policy configuration
//!
//! All tunable constants live here: scoring weights, the confidence
//! floor, and the short-pressure regime thresholds. The scoring and
//! classification code never hardcodes these values, so policy variants
//! can be swapped without touching the algorithms.

use serde::{Deserialize, Serialize};

/// Complete policy for one engine instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnginePolicy {
    /// Hard no-trade floor on the [0,1] confidence scale. Below it no
    /// direction may be authorized regardless of classification.
    #[serde(default = "default_confidence_floor")]
    pub confidence_floor: f64,

    /// Weights applied to the clamped sub-signal terms.
    #[serde(default)]
    pub weights: ScoringWeights,

    /// Thresholds for the short-pressure regime path.
    #[serde(default)]
    pub thresholds: RegimeThresholds,
}

impl Default for EnginePolicy {
    fn default() -> Self {
        Self {
            confidence_floor: 0.60,
            weights: ScoringWeights::default(),
            thresholds: RegimeThresholds::default(),
        }
    }
}

fn default_confidence_floor() -> f64 {
    0.60
}

/// Weighted linear model coefficients for the confidence scorer.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ScoringWeights {
    #[serde(default = "default_oi_weight")]
    pub oi: f64,
    #[serde(default = "default_volume_weight")]
    pub volume: f64,
    #[serde(default = "default_dealer_weight")]
    pub dealer: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            oi: 0.4,
            volume: 0.3,
            dealer: 0.3,
        }
    }
}

fn default_oi_weight() -> f64 {
    0.4
}

fn default_volume_weight() -> f64 {
    0.3
}

fn default_dealer_weight() -> f64 {
    0.3
}

/// Short-pressure regime thresholds.
///
/// Raw OI dominance alone is unreliable when puts are commonly used as
/// hedges; these thresholds encode the structural confirmation the
/// controlled-regime path requires before granting a direction.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RegimeThresholds {
    /// PC ratio at or above which bears structurally control the symbol.
    #[serde(default = "default_bear_pc_ratio")]
    pub bear_pc_ratio: f64,

    /// PC ratio at or below which bulls structurally control the symbol.
    #[serde(default = "default_bull_pc_ratio")]
    pub bull_pc_ratio: f64,

    /// Minimum short volume ratio required to authorize SHORT_ONLY in a
    /// bear-controlled regime; below it the puts read as hedges.
    #[serde(default = "default_bear_short_volume_min")]
    pub bear_short_volume_min: f64,

    /// Maximum short volume ratio allowed to authorize LONG_ONLY in a
    /// bull-controlled regime; above it shorts are not exhausted.
    #[serde(default = "default_bull_short_volume_max")]
    pub bull_short_volume_max: f64,
}

impl Default for RegimeThresholds {
    fn default() -> Self {
        Self {
            bear_pc_ratio: 1.6,
            bull_pc_ratio: 0.65,
            bear_short_volume_min: 0.45,
            bull_short_volume_max: 0.30,
        }
    }
}

fn default_bear_pc_ratio() -> f64 {
    1.6
}

fn default_bull_pc_ratio() -> f64 {
    0.65
}

fn default_bear_short_volume_min() -> f64 {
    0.45
}

fn default_bull_short_volume_max() -> f64 {
    0.30
}

/// Load an engine policy from a TOML file.
pub fn load_policy(path: &str) -> anyhow::Result<EnginePolicy> {
    let content = std::fs::read_to_string(path)?;
    let policy: EnginePolicy = toml::from_str(&content)?;
    Ok(policy)
}
