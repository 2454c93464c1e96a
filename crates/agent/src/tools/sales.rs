//! Sales tools: per-product sales window and top-sellers ranking

use async_trait::async_trait;
use chrono::{Local, NaiveDate};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use stocksense_data::DataStore;

use super::{ToolError, ToolTrait};

fn default_days() -> u32 {
    30
}

/// Sales aggregates for one product over a trailing window
pub struct SalesDataTool {
    store: Arc<DataStore>,
    reference_date: Option<NaiveDate>,
}

impl SalesDataTool {
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
struct SalesDataArgs {
    product_id: String,
    #[serde(default = "default_days")]
    days: u32,
}

#[async_trait]
impl ToolTrait for SalesDataTool {
    fn name(&self) -> &str {
        "get_sales_data_for_product"
    }

    fn description(&self) -> &str {
        "Get sales data for a specific product over the given number of days."
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "product_id": { "type": "string", "description": "The product ID to look up (e.g. 'P123')" },
                "days": { "type": "integer", "description": "Number of days to look back (default 30)", "minimum": 1 }
            },
            "required": ["product_id"]
        })
    }

    async fn execute(&self, args: Value) -> Result<Value, ToolError> {
        let args: SalesDataArgs = serde_json::from_value(args)?;

        let Some(summary) = self
            .store
            .sales_for_product(&args.product_id, args.days, self.today())
        else {
            return Ok(json!({
                "error": format!("No orders found in the last {} days", args.days)
            }));
        };

        if summary.total_units_sold == 0 {
            return Ok(json!({
                "total_units_sold": 0,
                "total_revenue": 0.0,
                "avg_daily_units": 0.0,
                "message": format!(
                    "No sales for product {} in the last {} days",
                    args.product_id, args.days
                )
            }));
        }

        Ok(serde_json::to_value(summary)?)
    }
}

/// Top products by units sold over a trailing window
pub struct TopSellersTool {
    store: Arc<DataStore>,
    reference_date: Option<NaiveDate>,
}

impl TopSellersTool {
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
struct TopSellersArgs {
    #[serde(default = "default_days")]
    days: u32,
    #[serde(default = "default_top_limit")]
    limit: usize,
}

fn default_top_limit() -> usize {
    5
}

#[async_trait]
impl ToolTrait for TopSellersTool {
    fn name(&self) -> &str {
        "get_top_selling_products"
    }

    fn description(&self) -> &str {
        "Get the top selling products by quantity over the given time period."
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "days": { "type": "integer", "description": "Number of days to look back (default 30)", "minimum": 1 },
                "limit": { "type": "integer", "description": "Number of top products to return (default 5)", "minimum": 1 }
            }
        })
    }

    async fn execute(&self, args: Value) -> Result<Value, ToolError> {
        let args: TopSellersArgs = serde_json::from_value(args)?;

        let ranked = self.store.top_sellers(args.days, args.limit, self.today());
        Ok(serde_json::to_value(ranked)?)
    }
}
