//! Gateway configuration
//!
//! Loaded from TOML with env overrides for secrets; every field has a
//! default so the service starts with no config file at all (the
//! provider then rejects requests until an API key is supplied).

use decision_engine::EnginePolicy;
use serde::{Deserialize, Serialize};
use tracing::info;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    #[serde(default = "default_provider_base_url")]
    pub provider_base_url: String,

    /// ChartExchange API key; the CHARTEXCHANGE_API_KEY env var takes
    /// precedence over the file value.
    #[serde(default)]
    pub api_key: String,

    /// Engine policy (weights, confidence floor, regime thresholds).
    #[serde(default)]
    pub policy: EnginePolicy,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            provider_base_url: default_provider_base_url(),
            api_key: String::new(),
            policy: EnginePolicy::default(),
        }
    }
}

fn default_bind_addr() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_provider_base_url() -> String {
    "https://chartexchange.com/api/v1".to_string()
}

/// Load configuration: GATEWAY_CONFIG path if set, else `gateway.toml`
/// in the working directory, else pure defaults.
pub fn load() -> anyhow::Result<GatewayConfig> {
    let path = std::env::var("GATEWAY_CONFIG").unwrap_or_else(|_| "gateway.toml".to_string());

    let mut config = match std::fs::read_to_string(&path) {
        Ok(content) => {
            info!(path = %path, "loading gateway config");
            toml::from_str(&content)?
        }
        Err(_) => GatewayConfig::default(),
    };

    if let Ok(key) = std::env::var("CHARTEXCHANGE_API_KEY") {
        config.api_key = key;
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = GatewayConfig::default();
        assert_eq!(config.bind_addr, "0.0.0.0:8080");
        assert!(config.api_key.is_empty());
        assert_eq!(config.policy.confidence_floor, 0.60);
    }

    #[test]
    fn test_partial_toml() {
        let config: GatewayConfig = toml::from_str(
            "bind_addr = \"127.0.0.1:9000\"\n\n[policy]\nconfidence_floor = 0.75\n",
        )
        .unwrap();
        assert_eq!(config.bind_addr, "127.0.0.1:9000");
        assert_eq!(config.policy.confidence_floor, 0.75);
        assert_eq!(config.policy.weights.oi, 0.4);
    }
}
