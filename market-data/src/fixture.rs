// In-memory provider for tests and offline runs.

use std::collections::HashMap;

use async_trait::async_trait;
use common::SignalError;
use serde_json::Value;

use crate::provider::MarketStructureProvider;

/// Provider serving canned records per symbol. Unknown symbols surface
/// as missing signals, the same shape a dead upstream produces.
#[derive(Debug, Clone, Default)]
pub struct FixtureProvider {
    chains: HashMap<String, Value>,
    volumes: HashMap<String, Value>,
    shorts: HashMap<String, Value>,
}

impl FixtureProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_chain(mut self, symbol: &str, record: Value) -> Self {
        self.chains.insert(symbol.to_uppercase(), record);
        self
    }

    pub fn with_volume(mut self, symbol: &str, record: Value) -> Self {
        self.volumes.insert(symbol.to_uppercase(), record);
        self
    }

    pub fn with_short_pressure(mut self, symbol: &str, record: Value) -> Self {
        self.shorts.insert(symbol.to_uppercase(), record);
        self
    }
}

#[async_trait]
impl MarketStructureProvider for FixtureProvider {
    async fn chain_structure(&self, symbol: &str) -> Result<Value, SignalError> {
        self.chains
            .get(&symbol.to_uppercase())
            .cloned()
            .ok_or_else(|| SignalError::missing(format!("chain summary unavailable for {symbol}")))
    }

    async fn volume_pressure(&self, symbol: &str) -> Result<Value, SignalError> {
        self.volumes
            .get(&symbol.to_uppercase())
            .cloned()
            .ok_or_else(|| SignalError::missing(format!("exchange volume unavailable for {symbol}")))
    }

    async fn short_pressure(&self, symbol: &str) -> Result<Option<Value>, SignalError> {
        Ok(self.shorts.get(&symbol.to_uppercase()).cloned())
    }
}
