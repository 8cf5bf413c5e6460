//! Market structure providers.
//!
//! The engine never depends on a specific upstream wire shape; it
//! consumes raw JSON records through the `MarketStructureProvider`
//! capability interface and normalizes them itself. Adapters here are
//! interchangeable: a ChartExchange HTTP adapter for live data and an
//! in-memory fixture adapter for tests and offline runs.

mod chartexchange;
mod fixture;
mod provider;

pub use chartexchange::{ChartExchangeConfig, ChartExchangeProvider};
pub use fixture::FixtureProvider;
pub use provider::MarketStructureProvider;
