use serde::{Deserialize, Serialize};

/// Authorized trade direction for the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Direction {
    LongOnly,
    ShortOnly,
    Neutral,
}

impl Direction {
    /// The set of sides forbidden under this direction: always the
    /// complement, both sides when neutral.
    pub fn disallowed(&self) -> Vec<Side> {
        match self {
            Direction::LongOnly => vec![Side::Short],
            Direction::ShortOnly => vec![Side::Long],
            Direction::Neutral => vec![Side::Long, Side::Short],
        }
    }
}

/// A single side of the market, used for the disallowed set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Side {
    Long,
    Short,
}

/// Coarse classification of which side structurally controls the symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Regime {
    Directional,
    Transition,
    BearControlled,
    BullControlled,
    Mixed,
}

/// Execution gate verdict, fully determined by the direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExecutionMode {
    Day,
    NoTrade,
}

/// Named contributing signal, recorded in evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Driver {
    CallOiDominance,
    PutOiDominance,
    DealerAlignment,
    #[serde(rename = "puts_likely_hedges")]
    PutsLikelyHedges,
    #[serde(rename = "shorts_not_exhausted")]
    ShortsNotExhausted,
}

/// Canonical options-market structure snapshot for one symbol at one
/// evaluation instant. All OI fields are non-negative; absent optional
/// provider fields default to zero at normalization time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketStructureSnapshot {
    #[serde(rename = "totalCallOI")]
    pub total_call_oi: u64,
    #[serde(rename = "totalPutOI")]
    pub total_put_oi: u64,
    #[serde(rename = "callOIDelta")]
    pub call_oi_delta: i64,
    #[serde(rename = "putOIDelta")]
    pub put_oi_delta: i64,
    /// Positive = dealers net long gamma.
    #[serde(rename = "dealerGamma")]
    pub dealer_gamma: f64,
    #[serde(rename = "putCallRatio")]
    pub put_call_ratio: Option<f64>,
    #[serde(rename = "maxPain")]
    pub max_pain: Option<f64>,
    #[serde(rename = "itmCalls")]
    pub itm_calls: Option<u64>,
    #[serde(rename = "itmPuts")]
    pub itm_puts: Option<u64>,
    /// Whether the minimum required fields (both OI totals) were present
    /// in the raw provider record.
    pub complete: bool,
}

impl MarketStructureSnapshot {
    /// Put/call ratio: the provider value when supplied, otherwise
    /// derived from open interest. Zero call OI yields 0.
    pub fn pc_ratio(&self) -> f64 {
        match self.put_call_ratio {
            Some(r) => r,
            None if self.total_call_oi == 0 => 0.0,
            None => self.total_put_oi as f64 / self.total_call_oi as f64,
        }
    }
}

/// Volume participation for one symbol.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VolumePressure {
    #[serde(rename = "todayVolume")]
    pub today_volume: f64,
    #[serde(rename = "avg20Volume")]
    pub avg20_volume: f64,
}

impl VolumePressure {
    /// Participation strength in [0,1]; 0 when there is no average to
    /// compare against.
    pub fn strength(&self) -> f64 {
        if self.avg20_volume > 0.0 {
            (self.today_volume / self.avg20_volume).min(1.0)
        } else {
            0.0
        }
    }
}

/// Short-sale pressure metrics, the alternate signal set used by the
/// controlled-regime path.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShortPressure {
    /// Fraction of traded volume attributable to short sales, in [0,1].
    pub short_volume_ratio: f64,
    /// Signed fractional change in short interest since the prior report.
    pub short_interest_change: f64,
    /// Cost to borrow shares, non-negative percent.
    pub borrow_rate: f64,
}

/// Directional bias block of a decision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bias {
    pub direction: Direction,
    /// In [0,1], rounded to two decimal places.
    pub confidence: f64,
    pub disallowed: Vec<Side>,
    pub drivers: Vec<Driver>,
}

/// Immutable trading-permission decision. Created fresh on every
/// evaluation; identical inputs always produce an identical decision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Decision {
    pub regime: Regime,
    pub bias: Bias,
    #[serde(rename = "executionMode")]
    pub execution_mode: ExecutionMode,
    pub invalidation: String,
}
