/// Agent-facing tool wrappers
///
/// Each tool binds a JSON parameter schema to one aggregation operation.
/// Parameters are validated before any network call, and `execute` always
/// returns a tagged `ToolResult` instead of propagating errors, so an
/// orchestrator never sees a panic or a raw error type.
mod token;
mod wallet;

pub use token::{GetTokenHoldersTool, GetTokenPriceTool, SearchTokensTool};
pub use wallet::{GetNativeBalanceTool, GetWalletPortfolioTool, ResolveDomainTool};

use crate::context::LensContext;
use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

// ============================================================================
// Tool framework
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolCategory {
    Wallet,
    Token,
}

#[derive(Debug, Clone, Serialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub category: ToolCategory,
    /// JSON schema for the tool's parameters
    pub parameters: Value,
}

#[derive(Debug, Clone, Serialize)]
pub struct ToolResult {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ToolResult {
    pub fn success(data: Value) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

#[async_trait]
pub trait Tool: Send + Sync {
    fn definition(&self) -> ToolDefinition;
    async fn execute(&self, params: Value) -> ToolResult;
}

/// Serialize a value into a success result without panicking on failure
pub(crate) fn success_json<T: Serialize>(value: &T) -> ToolResult {
    match serde_json::to_value(value) {
        Ok(v) => ToolResult::success(v),
        Err(e) => ToolResult::error(format!("serialization error: {}", e)),
    }
}

// ============================================================================
// Registry
// ============================================================================

pub struct ToolRegistry {
    tools: HashMap<String, Box<dyn Tool>>,
}

impl ToolRegistry {
    /// Registry with every built-in tool wired to the given context
    pub fn with_builtin_tools(context: Arc<LensContext>) -> Self {
        let mut registry = Self {
            tools: HashMap::new(),
        };
        registry.register(Box::new(ResolveDomainTool::new(Arc::clone(&context))));
        registry.register(Box::new(GetWalletPortfolioTool::new(Arc::clone(&context))));
        registry.register(Box::new(GetNativeBalanceTool::new(Arc::clone(&context))));
        registry.register(Box::new(GetTokenHoldersTool::new(Arc::clone(&context))));
        registry.register(Box::new(SearchTokensTool::new(Arc::clone(&context))));
        registry.register(Box::new(GetTokenPriceTool::new(context)));
        registry
    }

    pub fn register(&mut self, tool: Box<dyn Tool>) {
        self.tools.insert(tool.definition().name, tool);
    }

    pub fn definitions(&self) -> Vec<ToolDefinition> {
        let mut definitions: Vec<ToolDefinition> =
            self.tools.values().map(|tool| tool.definition()).collect();
        definitions.sort_by(|a, b| a.name.cmp(&b.name));
        definitions
    }

    /// Execute a tool by name; unknown names come back as an error result
    pub async fn execute(&self, name: &str, params: Value) -> ToolResult {
        match self.tools.get(name) {
            Some(tool) => tool.execute(params).await,
            None => ToolResult::error(format!("unknown tool: {}", name)),
        }
    }
}
