/// Shared HTTP plumbing for upstream API clients
///
/// Wraps `reqwest` with a per-endpoint rate limiter and a uniform
/// response-to-error mapping: HTTP 429 becomes the distinguished
/// `FetchError::RateLimited`, any other non-success status keeps the body
/// verbatim, and decode failures become `FetchError::Parse`. No retries
/// happen here; backoff policy belongs to callers.
use crate::errors::FetchError;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

/// Minimum-interval rate limiter. Paces dispatch only: `acquire` returns once
/// the caller may issue its request, and requests already dispatched stay in
/// flight concurrently. Fan-out call sites (a classification chunk of
/// `eth_getCode` probes) overlap on the wire, spaced at the configured rate.
pub struct RateLimiter {
    last_request: Arc<Mutex<Option<Instant>>>,
    min_interval: Duration,
}

impl RateLimiter {
    pub fn new(max_per_minute: usize) -> Self {
        let min_interval = if max_per_minute > 0 {
            Duration::from_secs_f64(60.0 / max_per_minute as f64)
        } else {
            Duration::ZERO
        };

        Self {
            last_request: Arc::new(Mutex::new(None)),
            min_interval,
        }
    }

    /// Wait until a request may be issued
    pub async fn acquire(&self) {
        if self.min_interval.is_zero() {
            return;
        }

        // the lock is held across the sleep so waiters queue up for their
        // slot, and released before the caller's request goes out
        let mut last = self.last_request.lock().await;
        if let Some(last_time) = *last {
            let elapsed = last_time.elapsed();
            if elapsed < self.min_interval {
                tokio::time::sleep(self.min_interval - elapsed).await;
            }
        }
        *last = Some(Instant::now());
    }
}

/// HTTP client wrapper with a fixed request timeout
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    provider: &'static str,
}

impl HttpClient {
    pub fn new(provider: &'static str, timeout_secs: u64) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| FetchError::Transport {
                provider: provider.to_string(),
                message: format!("failed to build HTTP client: {}", e),
            })?;

        Ok(Self { client, provider })
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    pub fn provider(&self) -> &'static str {
        self.provider
    }

    /// Send a prepared request and decode the JSON body
    pub async fn send_json<T>(
        &self,
        endpoint: &str,
        builder: reqwest::RequestBuilder,
    ) -> Result<T, FetchError>
    where
        T: DeserializeOwned,
    {
        let response = builder.send().await.map_err(|e| FetchError::Transport {
            provider: self.provider.to_string(),
            message: e.to_string(),
        })?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(FetchError::RateLimited {
                provider: self.provider.to_string(),
                endpoint: endpoint.to_string(),
            });
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FetchError::HttpStatus {
                provider: self.provider.to_string(),
                endpoint: endpoint.to_string(),
                status: status.as_u16(),
                body,
            });
        }

        response.json::<T>().await.map_err(|e| FetchError::Parse {
            provider: self.provider.to_string(),
            message: format!("{}: {}", endpoint, e),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn rate_limiter_spaces_requests() {
        let limiter = RateLimiter::new(600); // 100ms interval
        let start = Instant::now();
        limiter.acquire().await;
        limiter.acquire().await;
        limiter.acquire().await;
        // two waits of ~100ms between three acquisitions
        assert!(start.elapsed() >= Duration::from_millis(180));
    }

    #[tokio::test]
    async fn rate_limiter_does_not_serialize_in_flight_work() {
        let limiter = Arc::new(RateLimiter::new(600)); // 100ms interval
        let start = Instant::now();

        // three "requests" that each take 300ms after dispatch; if the
        // limiter held its slot for the whole request this would take ~900ms
        let work = |limiter: Arc<RateLimiter>| async move {
            limiter.acquire().await;
            tokio::time::sleep(Duration::from_millis(300)).await;
        };
        tokio::join!(
            work(Arc::clone(&limiter)),
            work(Arc::clone(&limiter)),
            work(Arc::clone(&limiter)),
        );

        let elapsed = start.elapsed();
        // dispatches spaced by ~100ms, bodies overlap: ~500ms total
        assert!(elapsed >= Duration::from_millis(480));
        assert!(elapsed < Duration::from_millis(800));
    }

    #[tokio::test]
    async fn http_429_maps_to_rate_limited() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/limited")
            .with_status(429)
            .with_body("slow down")
            .create_async()
            .await;

        let http = HttpClient::new("test", 5).unwrap();
        let url = format!("{}/limited", server.url());
        let result: Result<serde_json::Value, FetchError> =
            http.send_json("limited", http.client().get(&url)).await;

        match result {
            Err(FetchError::RateLimited { provider, endpoint }) => {
                assert_eq!(provider, "test");
                assert_eq!(endpoint, "limited");
            }
            other => panic!("expected RateLimited, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn http_error_preserves_body() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/broken")
            .with_status(502)
            .with_body("upstream exploded")
            .create_async()
            .await;

        let http = HttpClient::new("test", 5).unwrap();
        let url = format!("{}/broken", server.url());
        let result: Result<serde_json::Value, FetchError> =
            http.send_json("broken", http.client().get(&url)).await;

        match result {
            Err(FetchError::HttpStatus { status, body, .. }) => {
                assert_eq!(status, 502);
                assert_eq!(body, "upstream exploded");
            }
            other => panic!("expected HttpStatus, got {:?}", other),
        }
    }
}
