/// Community token list client with a read-through cache
///
/// The list is a static JSON document republished every few minutes, so one
/// shared in-process cache with a 15 minute TTL fronts it. Cache state lives
/// inside the client (no globals); clones share it through an `Arc`. A failed
/// refresh serves the stale copy and only errors when nothing was ever
/// fetched.
use crate::apis::client::{HttpClient, RateLimiter};
use crate::constants::TOKEN_LIST_CACHE_TTL_SECS;
use crate::errors::FetchError;
use crate::logger::{self, LogTag};
use serde::Deserialize;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

const RATE_LIMIT_PER_MINUTE: usize = 30;

const PROVIDER: &str = "tokenlist";

#[derive(Debug, Clone, Deserialize)]
pub struct ListedToken {
    #[serde(alias = "chainId", default)]
    pub chain_id: u64,
    pub address: String,
    pub name: String,
    pub symbol: String,
    pub decimals: u32,
    #[serde(alias = "logoURI", default)]
    pub logo_uri: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TokenListDocument {
    #[serde(default)]
    tokens: Vec<ListedToken>,
}

struct CacheSlot {
    tokens: Arc<Vec<ListedToken>>,
    fetched_at: Instant,
}

#[derive(Clone)]
pub struct TokenListClient {
    http: HttpClient,
    url: String,
    limiter: Arc<RateLimiter>,
    cache: Arc<RwLock<Option<CacheSlot>>>,
    ttl: Duration,
}

impl TokenListClient {
    pub fn new(url: &str, timeout_secs: u64) -> Result<Self, FetchError> {
        Ok(Self {
            http: HttpClient::new(PROVIDER, timeout_secs)?,
            url: url.to_string(),
            limiter: Arc::new(RateLimiter::new(RATE_LIMIT_PER_MINUTE)),
            cache: Arc::new(RwLock::new(None)),
            ttl: Duration::from_secs(TOKEN_LIST_CACHE_TTL_SECS),
        })
    }

    #[cfg(test)]
    fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Current token list, served from cache while fresh
    pub async fn tokens(&self) -> Result<Arc<Vec<ListedToken>>, FetchError> {
        {
            let cache = self.cache.read().await;
            if let Some(slot) = cache.as_ref() {
                if slot.fetched_at.elapsed() < self.ttl {
                    return Ok(Arc::clone(&slot.tokens));
                }
            }
        }

        let mut cache = self.cache.write().await;
        // another task may have refreshed while we waited for the write lock
        if let Some(slot) = cache.as_ref() {
            if slot.fetched_at.elapsed() < self.ttl {
                return Ok(Arc::clone(&slot.tokens));
            }
        }

        match self.fetch().await {
            Ok(tokens) => {
                let tokens = Arc::new(tokens);
                *cache = Some(CacheSlot {
                    tokens: Arc::clone(&tokens),
                    fetched_at: Instant::now(),
                });
                Ok(tokens)
            }
            Err(e) => match cache.as_ref() {
                Some(slot) => {
                    logger::warning(
                        LogTag::Tokens,
                        &format!("token list refresh failed, serving stale copy: {}", e),
                    );
                    Ok(Arc::clone(&slot.tokens))
                }
                None => Err(e),
            },
        }
    }

    async fn fetch(&self) -> Result<Vec<ListedToken>, FetchError> {
        self.limiter.acquire().await;
        logger::debug(LogTag::Tokens, "fetching token list");

        let builder = self.http.client().get(&self.url);
        let document: TokenListDocument = self.http.send_json("tokenlist", builder).await?;
        Ok(document.tokens)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LIST_BODY: &str = r#"{"name":"Test List","tokens":[
        {"chainId":56,"address":"0x00000000000000000000000000000000000000aa","name":"Alpha","symbol":"ALU","decimals":18,"logoURI":"https://example.com/a.png"},
        {"chainId":56,"address":"0x00000000000000000000000000000000000000bb","name":"Beta","symbol":"BET","decimals":8}
    ]}"#;

    #[tokio::test]
    async fn second_read_hits_the_cache() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/list.json")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(LIST_BODY)
            .expect(1)
            .create_async()
            .await;

        let url = format!("{}/list.json", server.url());
        let client = TokenListClient::new(&url, 5).unwrap();

        let first = client.tokens().await.unwrap();
        let second = client.tokens().await.unwrap();
        assert_eq!(first.len(), 2);
        assert!(Arc::ptr_eq(&first, &second));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn stale_copy_survives_a_failed_refresh() {
        let mut server = mockito::Server::new_async().await;
        let _good = server
            .mock("GET", "/list.json")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(LIST_BODY)
            .expect(1)
            .create_async()
            .await;

        let url = format!("{}/list.json", server.url());
        let client = TokenListClient::new(&url, 5)
            .unwrap()
            .with_ttl(Duration::ZERO);

        let first = client.tokens().await.unwrap();
        assert_eq!(first.len(), 2);

        // swap the endpoint for a failure; the stale copy should still serve
        server.reset_async().await;
        let _bad = server
            .mock("GET", "/list.json")
            .with_status(500)
            .with_body("boom")
            .create_async()
            .await;

        let second = client.tokens().await.unwrap();
        assert_eq!(second.len(), 2);
    }

    #[tokio::test]
    async fn first_fetch_failure_is_an_error() {
        let mut server = mockito::Server::new_async().await;
        let _bad = server
            .mock("GET", "/list.json")
            .with_status(503)
            .with_body("unavailable")
            .create_async()
            .await;

        let url = format!("{}/list.json", server.url());
        let client = TokenListClient::new(&url, 5).unwrap();
        assert!(client.tokens().await.is_err());
    }
}
