//! Tests for the tool registry

mod common;

use async_trait::async_trait;
use serde_json::json;
use std::sync::Arc;
use stocksense_agent::tools::{
    build_registry, InventoryLevelTool, ProductInfoTool, ToolError, ToolRegistry, ToolTrait,
};
use stocksense_agent::AgentError;
use stocksense_kb::DocumentIndex;

use common::fixture_store;

/// Minimal tool returning a canned value, for registry-level tests
struct EchoTool {
    name: &'static str,
    reply: &'static str,
}

#[async_trait]
impl ToolTrait for EchoTool {
    fn name(&self) -> &str {
        self.name
    }

    fn description(&self) -> &str {
        "Echoes a canned reply."
    }

    fn parameters(&self) -> serde_json::Value {
        json!({ "type": "object", "properties": {} })
    }

    async fn execute(&self, _args: serde_json::Value) -> Result<serde_json::Value, ToolError> {
        Ok(json!({ "reply": self.reply }))
    }
}

#[test]
fn registry_starts_empty() {
    let registry = ToolRegistry::new();
    assert!(registry.is_empty());
    assert!(registry.names().is_empty());
    assert!(registry.definitions().is_empty());
}

#[test]
fn register_preserves_order() {
    let store = fixture_store();
    let mut registry = ToolRegistry::new();
    registry.register(InventoryLevelTool::new(Arc::clone(&store)));
    registry.register(ProductInfoTool::new(store));
    registry.register(EchoTool {
        name: "echo",
        reply: "hi",
    });

    assert_eq!(
        registry.names(),
        vec!["get_inventory_level", "get_product_info", "echo"]
    );

    let definitions = registry.definitions();
    assert_eq!(definitions[0].function.name, "get_inventory_level");
    assert_eq!(definitions[2].function.name, "echo");
}

#[test]
fn register_same_name_replaces_in_place() {
    let mut registry = ToolRegistry::new();
    registry.register(EchoTool {
        name: "echo",
        reply: "old",
    });
    registry.register(EchoTool {
        name: "other",
        reply: "x",
    });
    registry.register(EchoTool {
        name: "echo",
        reply: "new",
    });

    // Still two tools, order unchanged.
    assert_eq!(registry.len(), 2);
    assert_eq!(registry.names(), vec!["echo", "other"]);
}

#[tokio::test]
async fn replaced_tool_serves_new_behavior() {
    let mut registry = ToolRegistry::new();
    registry.register(EchoTool {
        name: "echo",
        reply: "old",
    });
    registry.register(EchoTool {
        name: "echo",
        reply: "new",
    });

    let value = registry.execute("echo", json!({})).await.unwrap();
    assert_eq!(value["reply"], "new");
}

#[tokio::test]
async fn execute_unknown_tool_is_error() {
    let registry = ToolRegistry::new();

    let result = registry.execute("nonexistent", json!({})).await;

    match result {
        Err(AgentError::ToolNotFound(name)) => assert_eq!(name, "nonexistent"),
        other => panic!("expected ToolNotFound, got {:?}", other),
    }
}

#[tokio::test]
async fn execute_runs_domain_tool() {
    let registry = build_registry(fixture_store(), None);

    let value = registry
        .execute("get_inventory_level", json!({"product_id": "P100"}))
        .await
        .unwrap();

    assert_eq!(value["quantity"], 42);
}

#[test]
fn build_registry_has_stable_domain_order() {
    let registry = build_registry(fixture_store(), None);

    assert_eq!(
        registry.names(),
        vec![
            "get_product_info",
            "list_products",
            "get_inventory_level",
            "list_low_stock_products",
            "get_sales_data_for_product",
            "estimate_days_of_stock_remaining",
            "get_top_selling_products",
        ]
    );
}

#[test]
fn build_registry_appends_retrieval_tool_last() {
    let index = Arc::new(DocumentIndex::from_documents(vec![(
        "policy.md".to_string(),
        "Returns are accepted within 30 days of delivery for all items.".to_string(),
    )]));

    let registry = build_registry(fixture_store(), Some(index));

    assert_eq!(registry.len(), 8);
    assert_eq!(
        registry.names().last().map(String::as_str),
        Some("query_internal_documents")
    );
}

#[test]
fn definitions_carry_schemas() {
    let registry = build_registry(fixture_store(), None);

    let definitions = registry.definitions();
    let product_info = &definitions[0];

    assert_eq!(product_info.tool_type, "function");
    assert_eq!(product_info.function.parameters["type"], "object");
    assert_eq!(
        product_info.function.parameters["required"],
        json!(["product_id"])
    );
    assert!(!product_info.function.description.is_empty());
}
