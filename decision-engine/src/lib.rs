//! Structural Certainty Decision Engine
//!
//! Converts options-market structure (open interest, dealer positioning,
//! volume participation, short-sale pressure) into a deterministic
//! trading-permission decision: a direction or none, a bounded confidence
//! score, and a hard gate that authorizes or blocks directional risk.
//!
//! The engine is a pure, synchronous function of its inputs. No I/O, no
//! randomness, no shared state; identical inputs always produce an
//! identical `Decision`.

mod checklist;
mod confidence;
mod engine;
mod gate;
mod normalizer;
mod policy;
mod regime;
mod scanner;

pub use checklist::{build_checklist, TradeChecklist};
pub use engine::{StructuralCertaintyEngine, INVALIDATION_RULE};
pub use normalizer::{normalize_short_pressure, normalize_snapshot, normalize_volume};
pub use policy::{load_policy, EnginePolicy, RegimeThresholds, ScoringWeights};
pub use regime::{classify, RegimeAssessment};
pub use scanner::{
    scan_universe, ScanConfidence, ScanConstraints, ScanDriver, ScanOptions, ScanRegime, ScanRow,
    SwingCandidate, SwingScanReport,
};
