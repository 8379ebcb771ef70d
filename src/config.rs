use crate::constants::*;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use url::Url;

/// Runtime configuration
///
/// Loaded from an optional TOML file with environment-variable overrides for
/// secrets. Every field has a sensible public-endpoint default so the crate
/// works out of the box without a config file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_rpc_url")]
    pub rpc_url: String,
    #[serde(default = "default_scan_api_url")]
    pub scan_api_url: String,
    #[serde(default)]
    pub scan_api_key: String,
    #[serde(default = "default_coingecko_api_url")]
    pub coingecko_api_url: String,
    #[serde(default = "default_token_list_url")]
    pub token_list_url: String,
    #[serde(default = "default_bns_resolver_url")]
    pub bns_resolver_url: String,
    #[serde(default = "default_http_timeout_secs")]
    pub http_timeout_secs: u64,
    /// Minimum balance*price (USD) for a token to appear in a portfolio
    #[serde(default = "default_dust_threshold")]
    pub dust_threshold: f64,
}

fn default_rpc_url() -> String {
    DEFAULT_RPC_URL.to_string()
}
fn default_scan_api_url() -> String {
    DEFAULT_SCAN_API_URL.to_string()
}
fn default_coingecko_api_url() -> String {
    DEFAULT_COINGECKO_API_URL.to_string()
}
fn default_token_list_url() -> String {
    DEFAULT_TOKEN_LIST_URL.to_string()
}
fn default_bns_resolver_url() -> String {
    DEFAULT_BNS_RESOLVER_URL.to_string()
}
fn default_http_timeout_secs() -> u64 {
    DEFAULT_HTTP_TIMEOUT_SECS
}
fn default_dust_threshold() -> f64 {
    DEFAULT_DUST_THRESHOLD
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rpc_url: default_rpc_url(),
            scan_api_url: default_scan_api_url(),
            scan_api_key: String::new(),
            coingecko_api_url: default_coingecko_api_url(),
            token_list_url: default_token_list_url(),
            bns_resolver_url: default_bns_resolver_url(),
            http_timeout_secs: default_http_timeout_secs(),
            dust_threshold: default_dust_threshold(),
        }
    }
}

impl Config {
    /// Load configuration: defaults, then the TOML file if present, then
    /// environment overrides (BSC_RPC_URL, BSC_SCAN_API_KEY).
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(p) => {
                let raw = fs::read_to_string(p)
                    .with_context(|| format!("failed to read config file {}", p.display()))?;
                toml::from_str::<Config>(&raw)
                    .with_context(|| format!("failed to parse config file {}", p.display()))?
            }
            None => Config::default(),
        };

        if let Ok(url) = std::env::var("BSC_RPC_URL") {
            config.rpc_url = url;
        }
        if let Ok(key) = std::env::var("BSC_SCAN_API_KEY") {
            config.scan_api_key = key;
        }

        config.validate()?;
        Ok(config)
    }

    /// Reject unusable values before any client is built
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("rpc_url", &self.rpc_url),
            ("scan_api_url", &self.scan_api_url),
            ("coingecko_api_url", &self.coingecko_api_url),
            ("token_list_url", &self.token_list_url),
            ("bns_resolver_url", &self.bns_resolver_url),
        ] {
            Url::parse(value).with_context(|| format!("invalid {}: '{}'", name, value))?;
        }
        if self.http_timeout_secs == 0 {
            anyhow::bail!("http_timeout_secs must be greater than zero");
        }
        if self.dust_threshold < 0.0 {
            anyhow::bail!("dust_threshold must not be negative");
        }
        Ok(())
    }
}
