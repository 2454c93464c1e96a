//! Catalog tools: product lookup and listing

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use stocksense_data::DataStore;

use super::{ToolError, ToolTrait};

/// Look up one product by id
pub struct ProductInfoTool {
    store: Arc<DataStore>,
}

impl ProductInfoTool {
    pub fn new(store: Arc<DataStore>) -> Self {
        Self { store }
    }
}

#[derive(Deserialize)]
struct ProductInfoArgs {
    product_id: String,
}

#[async_trait]
impl ToolTrait for ProductInfoTool {
    fn name(&self) -> &str {
        "get_product_info"
    }

    fn description(&self) -> &str {
        "Get information about a specific product by its product ID (e.g. 'P123')."
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "product_id": { "type": "string", "description": "The product ID to look up (e.g. 'P123')" }
            },
            "required": ["product_id"]
        })
    }

    async fn execute(&self, args: Value) -> Result<Value, ToolError> {
        let args: ProductInfoArgs = serde_json::from_value(args)?;

        match self.store.product(&args.product_id) {
            Some(product) => Ok(serde_json::to_value(product)?),
            None => Ok(json!({
                "error": format!("Product with ID {} not found", args.product_id)
            })),
        }
    }
}

/// List products, optionally filtered by category
pub struct ListProductsTool {
    store: Arc<DataStore>,
}

impl ListProductsTool {
    pub fn new(store: Arc<DataStore>) -> Self {
        Self { store }
    }
}

#[derive(Deserialize)]
struct ListProductsArgs {
    category: Option<String>,
    #[serde(default = "default_limit")]
    limit: usize,
}

fn default_limit() -> usize {
    10
}

#[async_trait]
impl ToolTrait for ListProductsTool {
    fn name(&self) -> &str {
        "list_products"
    }

    fn description(&self) -> &str {
        "List products, optionally filtered by category (e.g. 'Apparel', 'Electronics')."
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "category": { "type": "string", "description": "Optional category to filter by" },
                "limit": { "type": "integer", "description": "Maximum number of products to return (default 10)", "minimum": 1 }
            }
        })
    }

    async fn execute(&self, args: Value) -> Result<Value, ToolError> {
        let args: ListProductsArgs = serde_json::from_value(args)?;

        let products = self.store.products(args.category.as_deref(), args.limit);
        Ok(serde_json::to_value(products)?)
    }
}
