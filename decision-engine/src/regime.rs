// Regime Classifier
// Derives a candidate direction and regime label from OI dominance, or
// from short-sale pressure when that signal set is supplied. Dealer
// alignment is evaluated independently and only ever appended as a
// driver, never used as a direction source.

use common::{Direction, Driver, MarketStructureSnapshot, Regime, ShortPressure};

use crate::policy::RegimeThresholds;

/// Classifier output, consumed by the scorer and the permission gate.
#[derive(Debug, Clone, PartialEq)]
pub struct RegimeAssessment {
    pub regime: Regime,
    pub direction: Direction,
    pub drivers: Vec<Driver>,
    pub dealer_aligned: bool,
}

/// Classify the market regime. First matching rule wins; rules do not
/// overlap. The short-pressure path takes precedence when a
/// `ShortPressure` record is supplied, because raw OI dominance alone is
/// an unreliable directional read when puts are commonly held as hedges.
pub fn classify(
    snapshot: &MarketStructureSnapshot,
    short_pressure: Option<&ShortPressure>,
    thresholds: &RegimeThresholds,
) -> RegimeAssessment {
    let mut assessment = match short_pressure {
        Some(short) => classify_short_pressure(snapshot, short, thresholds),
        None => classify_oi_dominance(snapshot),
    };

    let dealer_aligned = match assessment.direction {
        Direction::LongOnly => snapshot.dealer_gamma > 0.0,
        Direction::ShortOnly => snapshot.dealer_gamma < 0.0,
        Direction::Neutral => false,
    };

    if dealer_aligned {
        assessment.drivers.push(Driver::DealerAlignment);
    }
    assessment.dealer_aligned = dealer_aligned;

    assessment
}

fn classify_oi_dominance(snapshot: &MarketStructureSnapshot) -> RegimeAssessment {
    if snapshot.total_call_oi > snapshot.total_put_oi && snapshot.call_oi_delta > 0 {
        return RegimeAssessment {
            regime: Regime::Directional,
            direction: Direction::LongOnly,
            drivers: vec![Driver::CallOiDominance],
            dealer_aligned: false,
        };
    }

    if snapshot.total_put_oi > snapshot.total_call_oi && snapshot.put_oi_delta > 0 {
        return RegimeAssessment {
            regime: Regime::Directional,
            direction: Direction::ShortOnly,
            drivers: vec![Driver::PutOiDominance],
            dealer_aligned: false,
        };
    }

    RegimeAssessment {
        regime: Regime::Transition,
        direction: Direction::Neutral,
        drivers: Vec::new(),
        dealer_aligned: false,
    }
}

fn classify_short_pressure(
    snapshot: &MarketStructureSnapshot,
    short: &ShortPressure,
    thresholds: &RegimeThresholds,
) -> RegimeAssessment {
    let pc_ratio = snapshot.pc_ratio();
    // A derived ratio of 0 from zero call OI is a degenerate snapshot,
    // not a bullish one; it only qualifies for the mixed bucket.
    let has_ratio_basis = snapshot.put_call_ratio.is_some() || snapshot.total_call_oi > 0;

    if pc_ratio >= thresholds.bear_pc_ratio {
        // Heavy put positioning only authorizes shorts when actual short
        // selling confirms it; otherwise the puts read as hedges.
        if short.short_volume_ratio >= thresholds.bear_short_volume_min {
            return RegimeAssessment {
                regime: Regime::BearControlled,
                direction: Direction::ShortOnly,
                drivers: vec![Driver::PutOiDominance],
                dealer_aligned: false,
            };
        }
        tracing::debug!(
            pc_ratio,
            short_volume_ratio = short.short_volume_ratio,
            "bear regime without short-sale confirmation, no direction granted"
        );
        return RegimeAssessment {
            regime: Regime::BearControlled,
            direction: Direction::Neutral,
            drivers: vec![Driver::PutsLikelyHedges],
            dealer_aligned: false,
        };
    }

    if has_ratio_basis && pc_ratio <= thresholds.bull_pc_ratio {
        if short.short_volume_ratio <= thresholds.bull_short_volume_max {
            return RegimeAssessment {
                regime: Regime::BullControlled,
                direction: Direction::LongOnly,
                drivers: vec![Driver::CallOiDominance],
                dealer_aligned: false,
            };
        }
        tracing::debug!(
            pc_ratio,
            short_volume_ratio = short.short_volume_ratio,
            "bull regime with shorts not exhausted, no direction granted"
        );
        return RegimeAssessment {
            regime: Regime::BullControlled,
            direction: Direction::Neutral,
            drivers: vec![Driver::ShortsNotExhausted],
            dealer_aligned: false,
        };
    }

    RegimeAssessment {
        regime: Regime::Mixed,
        direction: Direction::Neutral,
        drivers: Vec::new(),
        dealer_aligned: false,
    }
}
