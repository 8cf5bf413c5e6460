use async_trait::async_trait;
use common::SignalError;
use serde_json::Value;

/// Capability interface for resolving a symbol's current market
/// structure inputs.
///
/// Implementations fetch once per call and never retry; an unavailable
/// upstream surfaces as `MissingRequiredSignal` for the required feeds.
/// Short pressure is an optional signal set, so its absence is `None`
/// rather than an error.
#[async_trait]
pub trait MarketStructureProvider: Send + Sync {
    /// Raw option-chain structure record (open interest, deltas, dealer
    /// gamma where available).
    async fn chain_structure(&self, symbol: &str) -> Result<Value, SignalError>;

    /// Raw volume record (today's volume, 20-day average).
    async fn volume_pressure(&self, symbol: &str) -> Result<Value, SignalError>;

    /// Raw short-sale pressure record, when the upstream offers one.
    async fn short_pressure(&self, symbol: &str) -> Result<Option<Value>, SignalError>;
}
