use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// `simple/price` and `simple/token_price/{platform}` share this shape:
/// an object keyed by coin id (or contract address) mapping to quotes
pub type PriceMap = HashMap<String, PriceQuote>;

/// One quote entry. The 24h stats only arrive when the request asks for
/// them and CoinGecko tracks the market, so every field stays optional.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceQuote {
    #[serde(default)]
    pub usd: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usd_market_cap: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usd_24h_vol: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usd_24h_change: Option<f64>,
}
