/// BSC JSON-RPC client
///
/// Thin wrapper over the chain node's JSON-RPC interface. Only the read
/// methods the aggregation core needs are exposed:
/// 1. eth_getBalance - native balance in wei
/// 2. eth_getCode    - deployed bytecode probe (Contract vs EOA)
///
/// A JSON-RPC error object inside a 200 response surfaces as
/// `FetchError::Upstream` with the node's message verbatim.
pub mod types;

use self::types::{JsonRpcRequest, JsonRpcResponse};
use crate::apis::client::{HttpClient, RateLimiter};
use crate::constants::WEI_PER_BNB;
use crate::errors::FetchError;
use crate::logger::{self, LogTag};
use serde_json::{json, Value};

/// Requests per minute against the public dataseed endpoint
const RATE_LIMIT_PER_MINUTE: usize = 300;

pub struct BscRpcClient {
    http: HttpClient,
    url: String,
    limiter: RateLimiter,
}

impl BscRpcClient {
    pub fn new(url: &str, timeout_secs: u64) -> Result<Self, FetchError> {
        Ok(Self {
            http: HttpClient::new("rpc", timeout_secs)?,
            url: url.to_string(),
            limiter: RateLimiter::new(RATE_LIMIT_PER_MINUTE),
        })
    }

    async fn call(&self, method: &str, params: Value) -> Result<Value, FetchError> {
        self.limiter.acquire().await;

        let request = JsonRpcRequest::new(method, params);
        let builder = self.http.client().post(&self.url).json(&request);
        let response: JsonRpcResponse = self.http.send_json(method, builder).await?;

        if let Some(err) = response.error {
            return Err(FetchError::Upstream {
                provider: "rpc".to_string(),
                message: format!("{} failed ({}): {}", method, err.code, err.message),
            });
        }

        response.result.ok_or_else(|| FetchError::Parse {
            provider: "rpc".to_string(),
            message: format!("{}: response carried neither result nor error", method),
        })
    }

    /// Native balance for a wallet, converted from wei to whole BNB
    pub async fn get_native_balance(&self, address: &str) -> Result<f64, FetchError> {
        logger::debug(LogTag::Rpc, &format!("eth_getBalance {}", address));

        let result = self
            .call("eth_getBalance", json!([address, "latest"]))
            .await?;
        let wei = parse_hex_quantity(&result)?;
        Ok(wei as f64 / WEI_PER_BNB)
    }

    /// Raw deployed bytecode at an address ("0x" when none)
    pub async fn get_code(&self, address: &str) -> Result<String, FetchError> {
        logger::debug(LogTag::Rpc, &format!("eth_getCode {}", address));

        let result = self.call("eth_getCode", json!([address, "latest"])).await?;
        result.as_str().map(str::to_string).ok_or_else(|| FetchError::Parse {
            provider: "rpc".to_string(),
            message: "eth_getCode: result is not a string".to_string(),
        })
    }

    /// True when the address carries deployed contract bytecode
    pub async fn has_contract_code(&self, address: &str) -> Result<bool, FetchError> {
        let code = self.get_code(address).await?;
        Ok(!matches!(code.as_str(), "" | "0x" | "0x0"))
    }
}

/// Decode a 0x-prefixed hex quantity into u128
fn parse_hex_quantity(value: &Value) -> Result<u128, FetchError> {
    let text = value.as_str().ok_or_else(|| FetchError::Parse {
        provider: "rpc".to_string(),
        message: "hex quantity is not a string".to_string(),
    })?;
    let digits = text.strip_prefix("0x").unwrap_or(text);
    u128::from_str_radix(digits, 16).map_err(|e| FetchError::Parse {
        provider: "rpc".to_string(),
        message: format!("bad hex quantity '{}': {}", text, e),
    })
}
