//! Tool trait, registry, and the domain tool set

pub mod catalog;
pub mod docs;
pub mod inventory;
pub mod sales;

pub use catalog::{ListProductsTool, ProductInfoTool};
pub use docs::DocsSearchTool;
pub use inventory::{InventoryLevelTool, LowStockTool, StockOutlookTool};
pub use sales::{SalesDataTool, TopSellersTool};

use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use stocksense_data::DataStore;
use stocksense_kb::DocumentIndex;
use stocksense_provider::Tool;
use tracing::debug;

use crate::{AgentError, Result};

/// Error type tools raise from `execute`
pub type ToolError = Box<dyn std::error::Error + Send + Sync>;

type BoxedTool = Box<dyn ToolTrait + Send + Sync>;

/// An invocable capability exposed to the model.
///
/// Tools validate and coerce their own arguments; a domain-level miss (say,
/// an unknown product id) is an `{"error": ...}` payload in the returned
/// value, while a genuinely malformed call raises a [`ToolError`]. Both end
/// up back in the conversation as tool results, never as loop failures.
#[async_trait]
pub trait ToolTrait: Send + Sync {
    fn name(&self) -> &str;
    fn description(&self) -> &str;
    fn parameters(&self) -> Value;
    async fn execute(&self, args: Value) -> std::result::Result<Value, ToolError>;
}

pub fn to_provider_tool(tool: &dyn ToolTrait) -> Tool {
    Tool::new(tool.name(), tool.description(), tool.parameters())
}

/// Ordered tool registry.
///
/// Registration order is preserved: `definitions()` output is rendered into
/// the system prompt verbatim, so it must be deterministic across runs.
/// Built once at startup and shared read-only afterwards.
#[derive(Default)]
pub struct ToolRegistry {
    tools: Vec<BoxedTool>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self { tools: Vec::new() }
    }

    /// Add a tool; a tool with the same name is replaced in place
    pub fn register<T: ToolTrait + 'static>(&mut self, tool: T) {
        if let Some(index) = self.tools.iter().position(|t| t.name() == tool.name()) {
            debug!(tool = tool.name(), "replacing registered tool");
            self.tools[index] = Box::new(tool);
        } else {
            self.tools.push(Box::new(tool));
        }
    }

    pub fn get(&self, name: &str) -> Option<&(dyn ToolTrait + Send + Sync)> {
        self.tools
            .iter()
            .find(|t| t.name() == name)
            .map(|t| t.as_ref())
    }

    pub fn has(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Tool names in registration order
    pub fn names(&self) -> Vec<String> {
        self.tools.iter().map(|t| t.name().to_string()).collect()
    }

    /// (name, description) pairs in registration order
    pub fn descriptions(&self) -> Vec<(String, String)> {
        self.tools
            .iter()
            .map(|t| (t.name().to_string(), t.description().to_string()))
            .collect()
    }

    /// Provider-shaped schemas in registration order
    pub fn definitions(&self) -> Vec<Tool> {
        self.tools
            .iter()
            .map(|t| to_provider_tool(t.as_ref()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Invoke a tool by name.
    ///
    /// Unknown names and tool-raised errors both come back as `Err`; the
    /// orchestrator converts either into an error tool result for the model.
    pub async fn execute(&self, name: &str, args: Value) -> Result<Value> {
        let tool = self
            .get(name)
            .ok_or_else(|| AgentError::ToolNotFound(name.to_string()))?;
        tool.execute(args)
            .await
            .map_err(|e| AgentError::ToolExecution(e.to_string()))
    }
}

/// Build the full startup registry: domain tools first, then the retrieval
/// tool appended last when a document index is available. After this returns
/// the registry is never mutated again.
pub fn build_registry(store: Arc<DataStore>, index: Option<Arc<DocumentIndex>>) -> ToolRegistry {
    let mut registry = ToolRegistry::new();

    registry.register(ProductInfoTool::new(Arc::clone(&store)));
    registry.register(ListProductsTool::new(Arc::clone(&store)));
    registry.register(InventoryLevelTool::new(Arc::clone(&store)));
    registry.register(LowStockTool::new(Arc::clone(&store)));
    registry.register(SalesDataTool::new(Arc::clone(&store)));
    registry.register(StockOutlookTool::new(Arc::clone(&store)));
    registry.register(TopSellersTool::new(store));

    if let Some(index) = index {
        registry.register(DocsSearchTool::new(index));
    }

    registry
}
