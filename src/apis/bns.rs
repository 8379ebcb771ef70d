/// BNB name service resolver
///
/// Resolves `.bnb` domains through the public name-service HTTP API
/// (`/v1/getAddress?tld=bnb&domain=...`). A domain that does not resolve
/// comes back as `Ok(None)`; the zero address counts as unresolved.
use crate::apis::client::{HttpClient, RateLimiter};
use crate::errors::FetchError;
use crate::logger::{self, LogTag};
use serde::Deserialize;

const RATE_LIMIT_PER_MINUTE: usize = 60;

const PROVIDER: &str = "bns";

const ZERO_ADDRESS: &str = "0x0000000000000000000000000000000000000000";

#[derive(Debug, Deserialize)]
struct ResolveResponse {
    #[serde(default)]
    code: i64,
    #[serde(default)]
    address: Option<String>,
}

pub struct BnsClient {
    http: HttpClient,
    base_url: String,
    limiter: RateLimiter,
}

impl BnsClient {
    pub fn new(base_url: &str, timeout_secs: u64) -> Result<Self, FetchError> {
        Ok(Self {
            http: HttpClient::new(PROVIDER, timeout_secs)?,
            base_url: base_url.trim_end_matches('/').to_string(),
            limiter: RateLimiter::new(RATE_LIMIT_PER_MINUTE),
        })
    }

    /// Resolve a `.bnb` domain to its wallet address
    pub async fn resolve(&self, domain: &str) -> Result<Option<String>, FetchError> {
        self.limiter.acquire().await;
        logger::debug(LogTag::Api, &format!("resolving domain {}", domain));

        let url = format!("{}/v1/getAddress", self.base_url);
        let builder = self
            .http
            .client()
            .get(&url)
            .query(&[("tld", "bnb"), ("domain", domain)]);

        let response: ResolveResponse = self.http.send_json("getAddress", builder).await?;

        if response.code != 0 {
            return Ok(None);
        }
        match response.address {
            Some(address) if !address.is_empty() && !address.eq_ignore_ascii_case(ZERO_ADDRESS) => {
                Ok(Some(address.to_lowercase()))
            }
            _ => Ok(None),
        }
    }
}
