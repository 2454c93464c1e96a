//! Inventory tools: stock levels, low-stock listing, days-of-stock outlook

use async_trait::async_trait;
use chrono::{Local, NaiveDate};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use stocksense_data::DataStore;

use super::{ToolError, ToolTrait};

/// Current inventory level for one product
pub struct InventoryLevelTool {
    store: Arc<DataStore>,
}

impl InventoryLevelTool {
    pub fn new(store: Arc<DataStore>) -> Self {
        Self { store }
    }
}

#[derive(Deserialize)]
struct InventoryLevelArgs {
    product_id: String,
}

#[async_trait]
impl ToolTrait for InventoryLevelTool {
    fn name(&self) -> &str {
        "get_inventory_level"
    }

    fn description(&self) -> &str {
        "Get the current inventory level for a specific product."
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
        let args: InventoryLevelArgs = serde_json::from_value(args)?;

        match self.store.inventory(&args.product_id) {
            Some(record) => Ok(serde_json::to_value(record)?),
            None => Ok(json!({
                "error": format!("Inventory for product ID {} not found", args.product_id)
            })),
        }
    }
}

/// Products whose stock is below a threshold
pub struct LowStockTool {
    store: Arc<DataStore>,
}

impl LowStockTool {
    pub fn new(store: Arc<DataStore>) -> Self {
        Self { store }
    }
}

#[derive(Deserialize)]
struct LowStockArgs {
    #[serde(default = "default_threshold")]
    threshold: u32,
}

fn default_threshold() -> u32 {
    10
}

#[async_trait]
impl ToolTrait for LowStockTool {
    fn name(&self) -> &str {
        "list_low_stock_products"
    }

    fn description(&self) -> &str {
        "List all products with inventory levels below the given threshold."
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "threshold": { "type": "integer", "description": "Inventory quantity threshold (default 10)", "minimum": 0 }
            }
        })
    }

    async fn execute(&self, args: Value) -> Result<Value, ToolError> {
        let args: LowStockArgs = serde_json::from_value(args)?;

        let entries = self.store.low_stock(args.threshold);
        Ok(serde_json::to_value(entries)?)
    }
}

/// Days-of-stock estimate from current inventory and recent sales velocity
pub struct StockOutlookTool {
    store: Arc<DataStore>,
    reference_date: Option<NaiveDate>,
}

impl StockOutlookTool {
    pub fn new(store: Arc<DataStore>) -> Self {
        Self {
            store,
            reference_date: None,
        }
    }

    /// Pin the end of the sales window, for deterministic tests
    pub fn with_reference_date(store: Arc<DataStore>, reference_date: NaiveDate) -> Self {
        Self {
            store,
            reference_date: Some(reference_date),
        }
    }

    fn today(&self) -> NaiveDate {
        self.reference_date
            .unwrap_or_else(|| Local::now().date_naive())
    }
}

#[derive(Deserialize)]
struct StockOutlookArgs {
    product_id: String,
    #[serde(default = "default_days_to_analyze")]
    days_to_analyze: u32,
}

fn default_days_to_analyze() -> u32 {
    30
}

#[async_trait]
impl ToolTrait for StockOutlookTool {
    fn name(&self) -> &str {
        "estimate_days_of_stock_remaining"
    }

    fn description(&self) -> &str {
        "Estimate how many days of stock remain for a product based on recent sales velocity."
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "product_id": { "type": "string", "description": "The product ID to analyze (e.g. 'P123')" },
                "days_to_analyze": { "type": "integer", "description": "Days of sales history to average over (default 30)", "minimum": 1 }
            },
            "required": ["product_id"]
        })
    }

    async fn execute(&self, args: Value) -> Result<Value, ToolError> {
        let args: StockOutlookArgs = serde_json::from_value(args)?;

        let Some(inventory) = self.store.inventory(&args.product_id) else {
            return Ok(json!({
                "error": format!("Inventory for product ID {} not found", args.product_id)
            }));
        };
        let current_stock = inventory.quantity;

        let Some(sales) =
            self.store
                .sales_for_product(&args.product_id, args.days_to_analyze, self.today())
        else {
            return Ok(json!({
                "error": format!("No orders found in the last {} days", args.days_to_analyze)
            }));
        };

        if sales.total_units_sold == 0 {
            return Ok(json!({
                "product_id": args.product_id,
                "current_stock": current_stock,
                "avg_daily_units_sold": 0.0,
                "days_remaining": "Infinite (no recent sales)",
                "stock_status": "Overstocked"
            }));
        }

        let avg_daily_units = sales.avg_daily_units;
        let days_remaining = f64::from(current_stock) / avg_daily_units;
        let stock_status = if days_remaining < 7.0 {
            "Critical - Reorder immediately"
        } else if days_remaining < 14.0 {
            "Low - Reorder soon"
        } else if days_remaining < 30.0 {
            "Adequate"
        } else if days_remaining < 60.0 {
            "Healthy"
        } else {
            "Overstocked"
        };

        Ok(json!({
            "product_id": args.product_id,
            "current_stock": current_stock,
            "avg_daily_units_sold": avg_daily_units,
            "days_remaining": format!("{:.1} days", days_remaining),
            "stock_status": stock_status
        }))
    }
}
