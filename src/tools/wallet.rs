use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

use super::{success_json, Tool, ToolCategory, ToolDefinition, ToolResult};
use crate::context::LensContext;
use crate::portfolio;
use crate::validation::{is_valid_address, is_valid_domain};

// ============================================================================
// ResolveDomainTool - .bnb name resolution
// ============================================================================

pub struct ResolveDomainTool {
    context: Arc<LensContext>,
}

impl ResolveDomainTool {
    pub fn new(context: Arc<LensContext>) -> Self {
        Self { context }
    }
}

#[derive(Deserialize)]
struct ResolveDomainParams {
    domain: String,
}

#[async_trait]
impl Tool for ResolveDomainTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: "resolve_domain".to_string(),
            description: "Resolve a .bnb domain name to a wallet address.".to_string(),
            category: ToolCategory::Wallet,
            parameters: json!({
                "type": "object",
                "properties": {
                    "domain": {
                        "type": "string",
                        "description": "A BNB domain name, e.g. example.bnb"
                    }
                },
                "required": ["domain"]
            }),
        }
    }

    async fn execute(&self, params: serde_json::Value) -> ToolResult {
        let params: ResolveDomainParams = match serde_json::from_value(params) {
            Ok(p) => p,
            Err(e) => return ToolResult::error(format!("invalid parameters: {}", e)),
        };
        if !is_valid_domain(&params.domain) {
            return ToolResult::error(format!("invalid domain: {}", params.domain));
        }

        match self.context.bns.resolve(&params.domain).await {
            Ok(Some(address)) => ToolResult::success(json!({
                "domain": params.domain,
                "address": address,
            })),
            Ok(None) => ToolResult::error(format!("domain does not resolve: {}", params.domain)),
            Err(e) => ToolResult::error(e.to_string()),
        }
    }
}

// ============================================================================
// GetWalletPortfolioTool - full portfolio aggregation
// ============================================================================

pub struct GetWalletPortfolioTool {
    context: Arc<LensContext>,
}

impl GetWalletPortfolioTool {
    pub fn new(context: Arc<LensContext>) -> Self {
        Self { context }
    }
}

#[derive(Deserialize)]
struct WalletParams {
    address: String,
}

#[async_trait]
impl Tool for GetWalletPortfolioTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: "get_wallet_portfolio".to_string(),
            description:
                "Get a wallet's full portfolio: fungible tokens with USD values plus held NFTs."
                    .to_string(),
            category: ToolCategory::Wallet,
            parameters: json!({
                "type": "object",
                "properties": {
                    "address": {
                        "type": "string",
                        "description": "A 0x-prefixed wallet address"
                    }
                },
                "required": ["address"]
            }),
        }
    }

    async fn execute(&self, params: serde_json::Value) -> ToolResult {
        let params: WalletParams = match serde_json::from_value(params) {
            Ok(p) => p,
            Err(e) => return ToolResult::error(format!("invalid parameters: {}", e)),
        };
        if !is_valid_address(&params.address) {
            return ToolResult::error(format!("invalid address: {}", params.address));
        }

        let ctx = &self.context;
        match portfolio::get_portfolio(
            &ctx.scan,
            &ctx.rpc,
            &ctx.prices,
            &ctx.token_list,
            &params.address,
            ctx.config.dust_threshold,
        )
        .await
        {
            Ok(portfolio) => success_json(&portfolio),
            Err(e) => ToolResult::error(e.to_string()),
        }
    }
}

// ============================================================================
// GetNativeBalanceTool - BNB balance only
// ============================================================================

pub struct GetNativeBalanceTool {
    context: Arc<LensContext>,
}

impl GetNativeBalanceTool {
    pub fn new(context: Arc<LensContext>) -> Self {
        Self { context }
    }
}

#[async_trait]
impl Tool for GetNativeBalanceTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: "get_native_balance".to_string(),
            description: "Get a wallet's native BNB balance.".to_string(),
            category: ToolCategory::Wallet,
            parameters: json!({
                "type": "object",
                "properties": {
                    "address": {
                        "type": "string",
                        "description": "A 0x-prefixed wallet address"
                    }
                },
                "required": ["address"]
            }),
        }
    }

    async fn execute(&self, params: serde_json::Value) -> ToolResult {
        let params: WalletParams = match serde_json::from_value(params) {
            Ok(p) => p,
            Err(e) => return ToolResult::error(format!("invalid parameters: {}", e)),
        };
        if !is_valid_address(&params.address) {
            return ToolResult::error(format!("invalid address: {}", params.address));
        }

        match self.context.rpc.get_native_balance(&params.address).await {
            Ok(balance) => ToolResult::success(json!({
                "address": params.address.to_lowercase(),
                "balance": balance,
            })),
            Err(e) => ToolResult::error(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    fn offline_context() -> Arc<LensContext> {
        // unroutable endpoints; these tests must never reach the network
        let config = Config {
            rpc_url: "http://127.0.0.1:9".to_string(),
            scan_api_url: "http://127.0.0.1:9".to_string(),
            scan_api_key: String::new(),
            coingecko_api_url: "http://127.0.0.1:9".to_string(),
            token_list_url: "http://127.0.0.1:9".to_string(),
            bns_resolver_url: "http://127.0.0.1:9".to_string(),
            http_timeout_secs: 1,
            dust_threshold: 0.0001,
        };
        Arc::new(LensContext::new(config).unwrap())
    }

    #[tokio::test]
    async fn malformed_address_is_rejected_before_any_network_call() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", mockito::Matcher::Any)
            .expect(0)
            .create_async()
            .await;

        let config = Config {
            rpc_url: server.url(),
            scan_api_url: server.url(),
            scan_api_key: String::new(),
            coingecko_api_url: server.url(),
            token_list_url: server.url(),
            bns_resolver_url: server.url(),
            http_timeout_secs: 1,
            dust_threshold: 0.0001,
        };
        let context = Arc::new(LensContext::new(config).unwrap());

        let tool = GetWalletPortfolioTool::new(context);
        let result = tool.execute(json!({"address": "0x123"})).await;

        assert!(!result.success);
        assert!(result.error.unwrap().contains("invalid address"));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn malformed_domain_is_rejected_locally() {
        let tool = ResolveDomainTool::new(offline_context());
        let result = tool.execute(json!({"domain": "not a domain"})).await;
        assert!(!result.success);
        assert!(result.error.unwrap().contains("invalid domain"));
    }

    #[tokio::test]
    async fn missing_parameters_are_rejected_locally() {
        let tool = GetNativeBalanceTool::new(offline_context());
        let result = tool.execute(json!({})).await;
        assert!(!result.success);
        assert!(result.error.unwrap().contains("invalid parameters"));
    }
}
