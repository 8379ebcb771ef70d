use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

use super::{success_json, Tool, ToolCategory, ToolDefinition, ToolResult};
use crate::context::LensContext;
use crate::holders;
use crate::tokens;
use crate::validation::is_valid_address;

fn default_holder_limit() -> usize {
    10
}

// ============================================================================
// GetTokenHoldersTool - holder classification
// ============================================================================

pub struct GetTokenHoldersTool {
    context: Arc<LensContext>,
}

impl GetTokenHoldersTool {
    pub fn new(context: Arc<LensContext>) -> Self {
        Self { context }
    }
}

#[derive(Deserialize)]
struct TokenHoldersParams {
    address: String,
    #[serde(default = "default_holder_limit")]
    limit: usize,
}

#[async_trait]
impl Tool for GetTokenHoldersTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: "get_token_holders".to_string(),
            description:
                "Get a token's top holders ranked by balance, each labeled as a known address, Contract, or EOA, plus the total holder count."
                    .to_string(),
            category: ToolCategory::Token,
            parameters: json!({
                "type": "object",
                "properties": {
                    "address": {
                        "type": "string",
                        "description": "The token's 0x-prefixed contract address"
                    },
                    "limit": {
                        "type": "integer",
                        "description": "How many top holders to return (default 10)"
                    }
                },
                "required": ["address"]
            }),
        }
    }

    async fn execute(&self, params: serde_json::Value) -> ToolResult {
        let params: TokenHoldersParams = match serde_json::from_value(params) {
            Ok(p) => p,
            Err(e) => return ToolResult::error(format!("invalid parameters: {}", e)),
        };
        if !is_valid_address(&params.address) {
            return ToolResult::error(format!("invalid address: {}", params.address));
        }
        if params.limit == 0 {
            return ToolResult::error("limit must be at least 1");
        }

        let ctx = &self.context;
        match holders::get_holders_classification(&ctx.scan, &ctx.rpc, &params.address, params.limit)
            .await
        {
            Ok(classification) => success_json(&classification),
            Err(e) => ToolResult::error(e.to_string()),
        }
    }
}

// ============================================================================
// SearchTokensTool - token list search
// ============================================================================

pub struct SearchTokensTool {
    context: Arc<LensContext>,
}

impl SearchTokensTool {
    pub fn new(context: Arc<LensContext>) -> Self {
        Self { context }
    }
}

#[derive(Deserialize)]
struct SearchParams {
    query: String,
}

#[async_trait]
impl Tool for SearchTokensTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: "search_tokens".to_string(),
            description:
                "Search listed BSC tokens by name, symbol, or contract address. Exact matches rank first."
                    .to_string(),
            category: ToolCategory::Token,
            parameters: json!({
                "type": "object",
                "properties": {
                    "query": {
                        "type": "string",
                        "description": "Name, symbol, or 0x address to search for"
                    }
                },
                "required": ["query"]
            }),
        }
    }

    async fn execute(&self, params: serde_json::Value) -> ToolResult {
        let params: SearchParams = match serde_json::from_value(params) {
            Ok(p) => p,
            Err(e) => return ToolResult::error(format!("invalid parameters: {}", e)),
        };
        if params.query.trim().is_empty() {
            return ToolResult::error("query must not be empty");
        }

        match tokens::search_tokens(&self.context.token_list, &params.query).await {
            Ok(matches) => success_json(&matches),
            Err(e) => ToolResult::error(e.to_string()),
        }
    }
}

// ============================================================================
// GetTokenPriceTool - spot price by contract
// ============================================================================

pub struct GetTokenPriceTool {
    context: Arc<LensContext>,
}

impl GetTokenPriceTool {
    pub fn new(context: Arc<LensContext>) -> Self {
        Self { context }
    }
}

#[derive(Deserialize)]
struct TokenPriceParams {
    address: String,
}

#[async_trait]
impl Tool for GetTokenPriceTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: "get_token_price".to_string(),
            description:
                "Get the current USD price of a BSC token by contract address, with 24h market cap, volume, and change when available."
                    .to_string(),
            category: ToolCategory::Token,
            parameters: json!({
                "type": "object",
                "properties": {
                    "address": {
                        "type": "string",
                        "description": "The token's 0x-prefixed contract address"
                    }
                },
                "required": ["address"]
            }),
        }
    }

    async fn execute(&self, params: serde_json::Value) -> ToolResult {
        let params: TokenPriceParams = match serde_json::from_value(params) {
            Ok(p) => p,
            Err(e) => return ToolResult::error(format!("invalid parameters: {}", e)),
        };
        if !is_valid_address(&params.address) {
            return ToolResult::error(format!("invalid address: {}", params.address));
        }

        let address = params.address.to_lowercase();
        match self.context.prices.token_quotes(&[address.clone()]).await {
            Ok(quotes) => match quotes.get(&address).and_then(|q| q.usd.map(|usd| (q, usd))) {
                Some((quote, usd)) => ToolResult::success(json!({
                    "address": address,
                    "priceUsd": usd,
                    "marketCap": quote.usd_market_cap,
                    "volume24h": quote.usd_24h_vol,
                    "priceChange24h": quote.usd_24h_change,
                })),
                None => ToolResult::error(format!("no price available for {}", address)),
            },
            Err(e) => ToolResult::error(e.to_string()),
        }
    }
}
