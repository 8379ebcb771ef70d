/// BscScan explorer API client
///
/// Carries the shared envelope handling: every call unwraps
/// `{status, message, result}`, where `status != "1"` is a soft failure even
/// on HTTP 200. List endpoints treat the explorer's "No transactions found"
/// answer as an empty page instead of an error; everything else surfaces as
/// `FetchError::Upstream` with the explorer's own message.
pub mod types;

use self::types::{NftTransferRaw, ScanEnvelope, TokenInfoRaw, TopHolderRaw, TransferEventRaw};
use crate::apis::client::{HttpClient, RateLimiter};
use crate::errors::FetchError;
use crate::logger::{self, LogTag};
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Free-tier key limit is 5 req/s
const RATE_LIMIT_PER_MINUTE: usize = 300;

const PROVIDER: &str = "bscscan";

pub struct BscScanClient {
    http: HttpClient,
    base_url: String,
    api_key: String,
    limiter: RateLimiter,
}

impl BscScanClient {
    pub fn new(base_url: &str, api_key: &str, timeout_secs: u64) -> Result<Self, FetchError> {
        Ok(Self {
            http: HttpClient::new(PROVIDER, timeout_secs)?,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            limiter: RateLimiter::new(RATE_LIMIT_PER_MINUTE),
        })
    }

    /// Issue one explorer query and return the raw envelope
    async fn query(&self, endpoint: &str, params: &[(&str, &str)]) -> Result<ScanEnvelope, FetchError> {
        self.limiter.acquire().await;

        let builder = self
            .http
            .client()
            .get(&self.base_url)
            .query(params)
            .query(&[("apikey", self.api_key.as_str())]);

        self.http.send_json(endpoint, builder).await
    }

    /// Envelope check for single-record endpoints; `status != "1"` is fatal
    async fn query_result<T>(&self, endpoint: &str, params: &[(&str, &str)]) -> Result<T, FetchError>
    where
        T: DeserializeOwned,
    {
        let envelope = self.query(endpoint, params).await?;

        if envelope.status != "1" {
            return Err(FetchError::Upstream {
                provider: PROVIDER.to_string(),
                message: format!("{}: {}", endpoint, envelope_error_text(&envelope)),
            });
        }

        serde_json::from_value(envelope.result).map_err(|e| FetchError::Parse {
            provider: PROVIDER.to_string(),
            message: format!("{}: {}", endpoint, e),
        })
    }

    /// Envelope check for list endpoints; an empty result set is not an error
    async fn query_list<T>(&self, endpoint: &str, params: &[(&str, &str)]) -> Result<Vec<T>, FetchError>
    where
        T: DeserializeOwned,
    {
        let envelope = self.query(endpoint, params).await?;

        if envelope.status != "1" {
            if is_empty_result(&envelope) {
                return Ok(Vec::new());
            }
            return Err(FetchError::Upstream {
                provider: PROVIDER.to_string(),
                message: format!("{}: {}", endpoint, envelope_error_text(&envelope)),
            });
        }

        serde_json::from_value(envelope.result).map_err(|e| FetchError::Parse {
            provider: PROVIDER.to_string(),
            message: format!("{}: {}", endpoint, e),
        })
    }

    /// Token metadata record; `Ok(None)` when the explorer does not know the
    /// contract, so callers can map that to their own not-found error
    pub async fn token_info(&self, contract: &str) -> Result<Option<TokenInfoRaw>, FetchError> {
        logger::debug(LogTag::Api, &format!("tokeninfo {}", contract));

        let envelope = self
            .query(
                "tokeninfo",
                &[
                    ("module", "token"),
                    ("action", "tokeninfo"),
                    ("contractaddress", contract),
                ],
            )
            .await?;

        if envelope.status != "1" {
            return Ok(None);
        }

        let mut records: Vec<TokenInfoRaw> =
            serde_json::from_value(envelope.result).map_err(|e| FetchError::Parse {
                provider: PROVIDER.to_string(),
                message: format!("tokeninfo: {}", e),
            })?;

        if records.is_empty() {
            return Ok(None);
        }
        Ok(Some(records.remove(0)))
    }

    /// Largest holders of a token, best first. Not every explorer tier carries
    /// this action, so callers keep a replay fallback for the Upstream case.
    pub async fn top_holders(&self, contract: &str, count: usize) -> Result<Vec<TopHolderRaw>, FetchError> {
        logger::debug(LogTag::Api, &format!("topholders {} (top {})", contract, count));

        let count_str = count.to_string();
        self.query_result(
            "topholders",
            &[
                ("module", "token"),
                ("action", "topholders"),
                ("contractaddress", contract),
                ("offset", &count_str),
            ],
        )
        .await
    }

    /// One page of fungible transfer events for a token contract, ascending
    pub async fn token_transfers_page(
        &self,
        contract: &str,
        page: usize,
        page_size: usize,
    ) -> Result<Vec<TransferEventRaw>, FetchError> {
        let page_str = page.to_string();
        let offset_str = page_size.to_string();
        self.query_list(
            "tokentx",
            &[
                ("module", "account"),
                ("action", "tokentx"),
                ("contractaddress", contract),
                ("page", &page_str),
                ("offset", &offset_str),
                ("sort", "asc"),
            ],
        )
        .await
    }

    /// All fungible transfer events touching a wallet, ascending
    pub async fn wallet_token_transfers(&self, address: &str) -> Result<Vec<TransferEventRaw>, FetchError> {
        logger::debug(LogTag::Api, &format!("tokentx wallet {}", address));

        self.query_list(
            "tokentx",
            &[
                ("module", "account"),
                ("action", "tokentx"),
                ("address", address),
                ("sort", "asc"),
            ],
        )
        .await
    }

    /// All NFT transfer events touching a wallet, ascending
    pub async fn wallet_nft_transfers(&self, address: &str) -> Result<Vec<NftTransferRaw>, FetchError> {
        logger::debug(LogTag::Api, &format!("tokennfttx wallet {}", address));

        self.query_list(
            "tokennfttx",
            &[
                ("module", "account"),
                ("action", "tokennfttx"),
                ("address", address),
                ("sort", "asc"),
            ],
        )
        .await
    }

    /// Raw (un-scaled) token balance of a wallet as a decimal string
    pub async fn token_balance(&self, contract: &str, address: &str) -> Result<String, FetchError> {
        logger::debug(LogTag::Api, &format!("tokenbalance {} of {}", contract, address));

        self.query_result(
            "tokenbalance",
            &[
                ("module", "account"),
                ("action", "tokenbalance"),
                ("contractaddress", contract),
                ("address", address),
                ("tag", "latest"),
            ],
        )
        .await
    }
}

fn envelope_error_text(envelope: &ScanEnvelope) -> String {
    match &envelope.result {
        Value::String(s) if !s.is_empty() => format!("{} ({})", envelope.message, s),
        _ => envelope.message.clone(),
    }
}

fn is_empty_result(envelope: &ScanEnvelope) -> bool {
    match &envelope.result {
        Value::Array(items) => items.is_empty(),
        _ => envelope.message.starts_with("No "),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn mock_client(server: &mockito::Server) -> BscScanClient {
        BscScanClient::new(&server.url(), "test-key", 5).unwrap()
    }

    #[tokio::test]
    async fn token_info_decodes_first_record() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", mockito::Matcher::Any)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"status":"1","message":"OK","result":[{"contractAddress":"0x0000000000000000000000000000000000000010","tokenName":"Example","symbol":"EXM","divisor":"18","totalSupply":"1000000000000000000000"}]}"#,
            )
            .create_async()
            .await;

        let client = mock_client(&server).await;
        let info = client
            .token_info("0x0000000000000000000000000000000000000010")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(info.name, "Example");
        assert_eq!(info.symbol, "EXM");
        assert_eq!(info.decimals, "18");
    }

    #[tokio::test]
    async fn unknown_token_info_is_none() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", mockito::Matcher::Any)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"status":"0","message":"NOTOK","result":"Invalid contract address"}"#)
            .create_async()
            .await;

        let client = mock_client(&server).await;
        let info = client
            .token_info("0x0000000000000000000000000000000000000011")
            .await
            .unwrap();
        assert!(info.is_none());
    }

    #[tokio::test]
    async fn no_transactions_is_an_empty_page() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", mockito::Matcher::Any)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"status":"0","message":"No transactions found","result":[]}"#)
            .create_async()
            .await;

        let client = mock_client(&server).await;
        let transfers = client
            .wallet_token_transfers("0x0000000000000000000000000000000000000012")
            .await
            .unwrap();
        assert!(transfers.is_empty());
    }

    #[tokio::test]
    async fn soft_failure_surfaces_explorer_message() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", mockito::Matcher::Any)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"status":"0","message":"NOTOK","result":"Max rate limit reached"}"#)
            .create_async()
            .await;

        let client = mock_client(&server).await;
        let err = client
            .top_holders("0x0000000000000000000000000000000000000013", 10)
            .await
            .unwrap_err();
        match err {
            FetchError::Upstream { message, .. } => {
                assert!(message.contains("Max rate limit reached"))
            }
            other => panic!("expected Upstream, got {:?}", other),
        }
    }
}
