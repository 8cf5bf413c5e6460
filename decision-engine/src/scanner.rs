// Swing Scanner
// Ranks a universe of pre-fetched structure rows into bullish/bearish
// multi-day swing candidates. Additive 0-100 scoring over short-sale
// pressure, borrow economics and options gravity; separate from the
// intraday permission gate, with its own HIGH/MEDIUM/LOW label scale.

use serde::{Deserialize, Serialize};

/// Accumulation-cycle regime label attached to a scan row by upstream
/// analysis. Distinct from the intraday `Regime` of a decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ScanRegime {
    Accumulation,
    Expansion,
    Distribution,
    Exhaustion,
    Transition,
}

/// Optional options-structure inputs for a scan row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ScanOptions {
    pub max_pain_distance_pct: Option<f64>,
    pub itm_call_put_ratio: Option<f64>,
}

/// One symbol's structure row, as submitted by the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanRow {
    pub symbol: String,
    #[serde(default)]
    pub short_volume_ratio: f64,
    #[serde(default)]
    pub short_interest_change: f64,
    #[serde(default)]
    pub borrow_rate: f64,
    #[serde(default)]
    pub regime: Option<ScanRegime>,
    #[serde(default)]
    pub options: Option<ScanOptions>,
}

/// Scanner confidence label. Ordered so constraint filtering can compare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ScanConfidence {
    Low,
    Medium,
    High,
}

impl ScanConfidence {
    fn from_score(score: u8) -> Self {
        match score {
            s if s >= 80 => ScanConfidence::High,
            s if s >= 60 => ScanConfidence::Medium,
            _ => ScanConfidence::Low,
        }
    }
}

/// Dominant structural driver behind a swing candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ScanDriver {
    BorrowConstraint,
    ShortCovering,
    PositioningImbalance,
    ShortReload,
    OptionsGravity,
    LongUnwind,
}

/// Caps and minimum label applied to the ranked output.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ScanConstraints {
    #[serde(default = "default_side_cap")]
    pub max_bullish: usize,
    #[serde(default = "default_side_cap")]
    pub max_bearish: usize,
    #[serde(default = "default_min_confidence")]
    pub min_confidence: ScanConfidence,
}

impl Default for ScanConstraints {
    fn default() -> Self {
        Self {
            max_bullish: 5,
            max_bearish: 5,
            min_confidence: ScanConfidence::Medium,
        }
    }
}

fn default_side_cap() -> usize {
    5
}

fn default_min_confidence() -> ScanConfidence {
    ScanConfidence::Medium
}

/// One ranked swing candidate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwingCandidate {
    pub symbol: String,
    pub score: u8,
    pub confidence: ScanConfidence,
    pub time_horizon_days: String,
    pub driver: ScanDriver,
}

/// Ranked scanner output, capped per side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwingScanReport {
    pub bullish_swings: Vec<SwingCandidate>,
    pub bearish_swings: Vec<SwingCandidate>,
}

/// Scan a universe of structure rows into ranked swing candidates.
pub fn scan_universe(rows: &[ScanRow], constraints: &ScanConstraints) -> SwingScanReport {
    let bullish = rank_side(
        rows,
        constraints,
        constraints.max_bullish,
        is_bullish_eligible,
        bullish_score,
        bullish_driver,
    );
    let bearish = rank_side(
        rows,
        constraints,
        constraints.max_bearish,
        is_bearish_eligible,
        bearish_score,
        bearish_driver,
    );

    tracing::debug!(
        universe = rows.len(),
        bullish = bullish.len(),
        bearish = bearish.len(),
        "swing scan complete"
    );

    SwingScanReport {
        bullish_swings: bullish,
        bearish_swings: bearish,
    }
}

fn rank_side(
    rows: &[ScanRow],
    constraints: &ScanConstraints,
    cap: usize,
    eligible: fn(&ScanRow) -> bool,
    score_fn: fn(&ScanRow) -> u8,
    driver_fn: fn(&ScanRow) -> ScanDriver,
) -> Vec<SwingCandidate> {
    let mut candidates: Vec<SwingCandidate> = rows
        .iter()
        .filter(|row| eligible(row))
        .map(|row| {
            let score = score_fn(row);
            SwingCandidate {
                symbol: row.symbol.clone(),
                score,
                confidence: ScanConfidence::from_score(score),
                time_horizon_days: horizon_from_score(score),
                driver: driver_fn(row),
            }
        })
        .filter(|candidate| candidate.confidence >= constraints.min_confidence)
        .collect();

    candidates.sort_by(|a, b| b.score.cmp(&a.score));
    candidates.truncate(cap);
    candidates
}

fn is_bullish_eligible(row: &ScanRow) -> bool {
    row.short_volume_ratio < 0.45
        && row.short_interest_change < 0.0
        && row.regime != Some(ScanRegime::Transition)
}

fn is_bearish_eligible(row: &ScanRow) -> bool {
    row.short_volume_ratio > 0.55
        && row.short_interest_change > 0.0
        && row.regime != Some(ScanRegime::Transition)
}

fn bullish_score(row: &ScanRow) -> u8 {
    let mut score = 0.0;

    // Short covering pressure
    score += (row.short_interest_change.abs() * 300.0).clamp(0.0, 30.0);

    if row.short_volume_ratio < 0.45 {
        score += 20.0;
    }

    // Borrow pressure squeezes shorts out
    if row.borrow_rate >= 8.0 {
        score += 15.0;
    } else if row.borrow_rate >= 4.0 {
        score += 8.0;
    }

    score += options_gravity_points(row);

    if let Some(ratio) = row.options.and_then(|o| o.itm_call_put_ratio) {
        if ratio >= 1.2 {
            score += 10.0;
        } else if ratio >= 1.05 {
            score += 5.0;
        }
    }

    match row.regime {
        Some(ScanRegime::Accumulation) => score += 15.0,
        Some(ScanRegime::Expansion) => score += 8.0,
        _ => {}
    }

    score.round().clamp(0.0, 100.0) as u8
}

fn bearish_score(row: &ScanRow) -> u8 {
    let mut score = 0.0;

    // Short reload pressure
    score += (row.short_interest_change.abs() * 300.0).clamp(0.0, 30.0);

    if row.short_volume_ratio > 0.55 {
        score += 20.0;
    }

    // Cheap borrow keeps shorts pressing
    if row.borrow_rate <= 5.0 {
        score += 15.0;
    } else if row.borrow_rate <= 8.0 {
        score += 8.0;
    }

    score += options_gravity_points(row);

    if let Some(ratio) = row.options.and_then(|o| o.itm_call_put_ratio) {
        if ratio <= 0.85 {
            score += 10.0;
        } else if ratio <= 0.95 {
            score += 5.0;
        }
    }

    match row.regime {
        Some(ScanRegime::Distribution) => score += 15.0,
        Some(ScanRegime::Exhaustion) => score += 8.0,
        _ => {}
    }

    score.round().clamp(0.0, 100.0) as u8
}

fn options_gravity_points(row: &ScanRow) -> f64 {
    match row.options.and_then(|o| o.max_pain_distance_pct) {
        Some(distance) if distance <= 2.0 => 10.0,
        Some(distance) if distance <= 4.0 => 5.0,
        _ => 0.0,
    }
}

fn bullish_driver(row: &ScanRow) -> ScanDriver {
    if row.borrow_rate >= 8.0 {
        ScanDriver::BorrowConstraint
    } else if row.short_interest_change < 0.0 {
        ScanDriver::ShortCovering
    } else {
        ScanDriver::PositioningImbalance
    }
}

fn bearish_driver(row: &ScanRow) -> ScanDriver {
    let cheap_reload = row.short_interest_change > 0.0 && row.borrow_rate <= 5.0;
    let near_max_pain = row
        .options
        .and_then(|o| o.max_pain_distance_pct)
        .map(|d| d <= 2.0)
        .unwrap_or(false);

    if cheap_reload {
        ScanDriver::ShortReload
    } else if near_max_pain {
        ScanDriver::OptionsGravity
    } else {
        ScanDriver::LongUnwind
    }
}

fn horizon_from_score(score: u8) -> String {
    let band = match score {
        s if s >= 80 => "7-15",
        s if s >= 60 => "5-10",
        _ => "3-7",
    };
    band.to_string()
}
