// ChartExchange adapter
// Request/response HTTP adapter for the ChartExchange market data API.
// One fetch per signal, no retries: upstream failure means the signal is
// missing for this evaluation and the caller decides what to do.

use async_trait::async_trait;
use common::SignalError;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use tracing::{debug, warn};

use crate::provider::MarketStructureProvider;

const CHAIN_SUMMARY_PATH: &str = "/data/options/chain-summary/";
const EXCHANGE_VOLUME_PATH: &str = "/data/exchange-volume/";
const SHORT_VOLUME_PATH: &str = "/data/short-volume/";
const SHORT_INTEREST_PATH: &str = "/data/short-interest-daily/";
const BORROW_FEE_PATH: &str = "/data/borrow-fee/";

/// Connection settings for the ChartExchange adapter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartExchangeConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    pub api_key: String,
}

fn default_base_url() -> String {
    "https://chartexchange.com/api/v1".to_string()
}

/// HTTP provider backed by ChartExchange.
pub struct ChartExchangeProvider {
    client: reqwest::Client,
    config: ChartExchangeConfig,
}

impl ChartExchangeProvider {
    pub fn new(config: ChartExchangeConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    async fn fetch_json(&self, path: &str, symbol: &str, signal: &str) -> Result<Value, SignalError> {
        let url = format!("{}{}", self.config.base_url.trim_end_matches('/'), path);
        debug!(symbol, url = %url, signal, "fetching market data");

        let response = self
            .client
            .get(&url)
            .query(&[
                ("symbol", market_symbol(symbol).as_str()),
                ("format", "json"),
                ("api_key", self.config.api_key.as_str()),
            ])
            .send()
            .await
            .map_err(|e| SignalError::missing(format!("{signal} unavailable for {symbol}: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            warn!(symbol, signal, %status, "upstream returned error status");
            return Err(SignalError::missing(format!(
                "{signal} unavailable for {symbol}: HTTP {status}"
            )));
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| SignalError::missing(format!("{signal} unreadable for {symbol}: {e}")))
    }

    /// Chain-summary responses arrive as an array with the front
    /// expiration in the first row.
    async fn fetch_first_row(
        &self,
        path: &str,
        symbol: &str,
        signal: &str,
    ) -> Result<Value, SignalError> {
        let body = self.fetch_json(path, symbol, signal).await?;
        match body {
            Value::Array(rows) => rows.into_iter().next().ok_or_else(|| {
                SignalError::missing(format!("{signal} empty for {symbol}"))
            }),
            other => Ok(other),
        }
    }
}

#[async_trait]
impl MarketStructureProvider for ChartExchangeProvider {
    async fn chain_structure(&self, symbol: &str) -> Result<Value, SignalError> {
        self.fetch_first_row(CHAIN_SUMMARY_PATH, symbol, "chain summary")
            .await
    }

    async fn volume_pressure(&self, symbol: &str) -> Result<Value, SignalError> {
        self.fetch_first_row(EXCHANGE_VOLUME_PATH, symbol, "exchange volume")
            .await
    }

    async fn short_pressure(&self, symbol: &str) -> Result<Option<Value>, SignalError> {
        // Optional signal set: any gap in the three feeds means the
        // evaluation proceeds on the OI path instead of failing.
        let short_volume = self
            .fetch_first_row(SHORT_VOLUME_PATH, symbol, "short volume")
            .await;
        let short_interest = self
            .fetch_first_row(SHORT_INTEREST_PATH, symbol, "short interest")
            .await;
        let borrow = self
            .fetch_first_row(BORROW_FEE_PATH, symbol, "borrow fee")
            .await;

        let (short_volume, short_interest, borrow) = match (short_volume, short_interest, borrow) {
            (Ok(a), Ok(b), Ok(c)) => (a, b, c),
            (a, b, c) => {
                let missing: Vec<&str> = [
                    ("short volume", a.is_err()),
                    ("short interest", b.is_err()),
                    ("borrow fee", c.is_err()),
                ]
                .iter()
                .filter(|(_, failed)| *failed)
                .map(|(name, _)| *name)
                .collect();
                warn!(symbol, ?missing, "short pressure incomplete, skipping");
                return Ok(None);
            }
        };

        Ok(Some(merge_short_pressure(
            &short_volume,
            &short_interest,
            &borrow,
        )))
    }
}

/// ChartExchange expects exchange-prefixed symbols.
fn market_symbol(symbol: &str) -> String {
    format!("US:{}", symbol.to_uppercase())
}

fn merge_short_pressure(short_volume: &Value, short_interest: &Value, borrow: &Value) -> Value {
    let mut merged = Map::new();

    if let Some(ratio) = first_present(short_volume, &["short_volume_ratio", "shortVolumeRatio"]) {
        merged.insert("short_volume_ratio".to_string(), ratio);
    }
    if let Some(change) = first_present(short_interest, &["change", "change_pct"]) {
        merged.insert("short_interest_change".to_string(), change);
    }
    if let Some(rate) = first_present(borrow, &["rate", "borrow_rate"]) {
        merged.insert("borrow_rate".to_string(), rate);
    }

    json!(merged)
}

fn first_present(record: &Value, keys: &[&str]) -> Option<Value> {
    let obj = record.as_object()?;
    keys.iter()
        .find_map(|key| obj.get(*key))
        .filter(|v| !v.is_null())
        .cloned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_market_symbol_is_exchange_prefixed() {
        assert_eq!(market_symbol("spy"), "US:SPY");
        assert_eq!(market_symbol("IWM"), "US:IWM");
    }

    #[test]
    fn test_merge_short_pressure_uses_fallback_names() {
        let merged = merge_short_pressure(
            &json!({ "shortVolumeRatio": 0.61 }),
            &json!({ "change_pct": 0.02 }),
            &json!({ "borrow_rate": 4.5 }),
        );
        assert_eq!(merged["short_volume_ratio"], json!(0.61));
        assert_eq!(merged["short_interest_change"], json!(0.02));
        assert_eq!(merged["borrow_rate"], json!(4.5));
    }

    #[test]
    fn test_merge_skips_absent_fields() {
        let merged = merge_short_pressure(&json!({}), &json!({ "change": -0.01 }), &json!(null));
        assert!(merged.get("short_volume_ratio").is_none());
        assert_eq!(merged["short_interest_change"], json!(-0.01));
    }

    #[test]
    fn test_config_default_base_url() {
        let config: ChartExchangeConfig =
            serde_json::from_value(json!({ "api_key": "k" })).unwrap();
        assert_eq!(config.base_url, "https://chartexchange.com/api/v1");
    }
}
