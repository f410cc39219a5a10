//! Engine configuration types

use incentive_core::{IncentiveError, Params, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Complete engine configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Price market settings for APY queries
    #[serde(default)]
    pub apy: ApyConfig,

    /// Initial incentive parameters
    #[serde(default)]
    pub params: Params,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            logging: LoggingConfig::default(),
            apy: ApyConfig::default(),
            params: Params::default(),
        }
    }
}

impl EngineConfig {
    /// Parse and validate a TOML document
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(content).map_err(|e| IncentiveError::Config(e.to_string()))?;
        config
            .params
            .validate()
            .map_err(|e| IncentiveError::Config(format!("invalid params: {}", e)))?;
        Ok(config)
    }

    /// Load and validate a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| IncentiveError::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_toml_str(&content)
    }
}

/// Logging configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level or filter directive, overridden by `RUST_LOG`
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format: "text" or "json"
    #[serde(default = "default_log_format")]
    pub format: String,

    /// Color output
    #[serde(default = "default_true")]
    pub color: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "text".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            color: true,
        }
    }
}

/// Price market settings for APY queries
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ApyConfig {
    /// Appended to a denom's market base to form the market id
    #[serde(default = "default_quote_suffix")]
    pub quote_suffix: String,

    /// Market base per denom where it differs from the denom
    #[serde(default = "default_market_overrides")]
    pub market_overrides: BTreeMap<String, String>,
}

fn default_quote_suffix() -> String {
    ":usd:30".to_string()
}

fn default_market_overrides() -> BTreeMap<String, String> {
    [
        ("ufury", "fury"),
        ("erc20/multichain/usdc", "usdc"),
        ("erc20/multichain/usdt", "usdt"),
        ("erc20/multichain/dai", "dai"),
    ]
    .into_iter()
    .map(|(denom, base)| (denom.to_string(), base.to_string()))
    .collect()
}

impl Default for ApyConfig {
    fn default() -> Self {
        Self {
            quote_suffix: default_quote_suffix(),
            market_overrides: default_market_overrides(),
        }
    }
}

impl ApyConfig {
    /// Price market id of a denom, e.g. `ufury` -> `fury:usd:30`
    pub fn market_id(&self, denom: &str) -> String {
        let base = self
            .market_overrides
            .get(denom)
            .map(String::as_str)
            .unwrap_or(denom);
        format!("{}{}", base, self.quote_suffix)
    }
}
