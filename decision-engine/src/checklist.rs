// Trade Checklist Builder
// Maps a finished Decision into human-readable execution notes through a
// static lookup. No scoring logic of its own.

use common::{Decision, Direction};
use serde::{Deserialize, Serialize};

const LONG_TRADES: &[&str] = &[
    "Buy pullbacks into VWAP / prior day low",
    "Favor call-side continuation after absorption",
    "Scale out into strength",
];

const SHORT_TRADES: &[&str] = &[
    "Short failed pops into VWAP / prior day high",
    "Sell call-side rips; avoid chasing breakdowns",
    "Favor downside momentum scalps after weak bounces",
    "Cover partials quickly at intraday supports",
];

const LONG_RISK: &str = "Fast liquidation drops from overhead supply";
const SHORT_RISK: &str = "Sharp bear-market rallies squeezing shorts";

/// Execution checklist derived from a decision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeChecklist {
    pub direction_gate: Direction,
    pub execution_note: String,
    pub allowed_trades: Vec<String>,
    pub primary_risk: String,
}

/// Build the checklist for a decision. A neutral decision yields an
/// empty trade list and the NO_TRADE instruction.
pub fn build_checklist(decision: &Decision) -> TradeChecklist {
    match decision.bias.direction {
        Direction::LongOnly => TradeChecklist {
            direction_gate: Direction::LongOnly,
            execution_note: "Long scalps favored".to_string(),
            allowed_trades: LONG_TRADES.iter().map(|s| s.to_string()).collect(),
            primary_risk: LONG_RISK.to_string(),
        },
        Direction::ShortOnly => TradeChecklist {
            direction_gate: Direction::ShortOnly,
            execution_note: "Short scalps favored".to_string(),
            allowed_trades: SHORT_TRADES.iter().map(|s| s.to_string()).collect(),
            primary_risk: SHORT_RISK.to_string(),
        },
        Direction::Neutral => TradeChecklist {
            direction_gate: Direction::Neutral,
            execution_note: "NO_TRADE".to_string(),
            allowed_trades: Vec::new(),
            primary_risk: "None".to_string(),
        },
    }
}
