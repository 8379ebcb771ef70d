/// CoinGecko price client
///
/// Two read paths: the native coin quote via `simple/price` and per-contract
/// token quotes via `simple/token_price/binance-smart-chain`. Contract
/// lookups are batched into one request, ask for the 24h stats (market cap,
/// volume, change) alongside the spot price, and come back keyed by lowercase
/// address; unknown contracts are simply absent from the map.
pub mod types;

use self::types::{PriceMap, PriceQuote};
use crate::apis::client::{HttpClient, RateLimiter};
use crate::errors::FetchError;
use crate::logger::{self, LogTag};
use std::collections::HashMap;

/// Public (keyless) tier allows 30 calls/min
const RATE_LIMIT_PER_MINUTE: usize = 30;

const PROVIDER: &str = "coingecko";

/// CoinGecko id of the BSC native coin
const NATIVE_COIN_ID: &str = "binancecoin";

/// Asset-platform slug for BSC contract lookups
const PLATFORM: &str = "binance-smart-chain";

pub struct CoinGeckoClient {
    http: HttpClient,
    base_url: String,
    limiter: RateLimiter,
}

impl CoinGeckoClient {
    pub fn new(base_url: &str, timeout_secs: u64) -> Result<Self, FetchError> {
        Ok(Self {
            http: HttpClient::new(PROVIDER, timeout_secs)?,
            base_url: base_url.trim_end_matches('/').to_string(),
            limiter: RateLimiter::new(RATE_LIMIT_PER_MINUTE),
        })
    }

    /// USD quote for the native coin
    pub async fn native_price_usd(&self) -> Result<f64, FetchError> {
        self.limiter.acquire().await;
        logger::debug(LogTag::Api, "fetching native coin price");

        let url = format!("{}/simple/price", self.base_url);
        let builder = self
            .http
            .client()
            .get(&url)
            .query(&[("ids", NATIVE_COIN_ID), ("vs_currencies", "usd")]);

        let prices: PriceMap = self.http.send_json("simple/price", builder).await?;

        prices
            .get(NATIVE_COIN_ID)
            .and_then(|quote| quote.usd)
            .ok_or_else(|| FetchError::Parse {
                provider: PROVIDER.to_string(),
                message: format!("simple/price: no usd quote for {}", NATIVE_COIN_ID),
            })
    }

    /// Full quotes (spot price plus 24h stats) for a batch of token
    /// contracts, keyed by lowercase address. Contracts CoinGecko does not
    /// track are absent from the result.
    pub async fn token_quotes(
        &self,
        contracts: &[String],
    ) -> Result<HashMap<String, PriceQuote>, FetchError> {
        if contracts.is_empty() {
            return Ok(HashMap::new());
        }

        self.limiter.acquire().await;
        logger::debug(
            LogTag::Api,
            &format!("fetching quotes for {} contracts", contracts.len()),
        );

        let joined = contracts
            .iter()
            .map(|c| c.to_lowercase())
            .collect::<Vec<_>>()
            .join(",");

        let url = format!("{}/simple/token_price/{}", self.base_url, PLATFORM);
        let builder = self.http.client().get(&url).query(&[
            ("contract_addresses", joined.as_str()),
            ("vs_currencies", "usd"),
            ("include_market_cap", "true"),
            ("include_24hr_vol", "true"),
            ("include_24hr_change", "true"),
        ]);

        let prices: PriceMap = self.http.send_json("simple/token_price", builder).await?;

        Ok(prices
            .into_iter()
            .map(|(address, quote)| (address.to_lowercase(), quote))
            .collect())
    }

    /// USD spot prices only, for callers that just need a number per contract
    pub async fn token_prices_usd(
        &self,
        contracts: &[String],
    ) -> Result<HashMap<String, f64>, FetchError> {
        let quotes = self.token_quotes(contracts).await?;

        let mut result = HashMap::new();
        for (address, quote) in quotes {
            if let Some(usd) = quote.usd {
                result.insert(address, usd);
            }
        }
        Ok(result)
    }
}
