//! Shared domain model for the structural certainty system.
//!
//! Holds the normalized market-structure types consumed by the decision
//! engine, the `Decision` wire contract, and the signal error taxonomy.

mod error;
mod types;

pub use error::SignalError;
pub use types::{
    Bias, Decision, Direction, Driver, ExecutionMode, MarketStructureSnapshot, Regime,
    ShortPressure, Side, VolumePressure,
};
