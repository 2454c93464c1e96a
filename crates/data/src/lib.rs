//! Tabular merchant datasets and the queries the agent tools run over them
//!
//! Four datasets (products, inventory, orders, order items) are loaded from
//! JSON files once at startup and held in memory. All queries are read-only,
//! so one store is shared across concurrent requests behind an `Arc`.

use chrono::{Duration, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// Errors loading or querying datasets
#[derive(Error, Debug)]
pub enum DataError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid dataset file: {0}")]
    Json(#[from] serde_json::Error),

    #[error("dataset not found: {0}")]
    MissingDataset(PathBuf),
}

pub type Result<T> = std::result::Result<T, DataError>;

/// One catalog product
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub product_id: String,
    pub name: String,
    pub category: String,
    pub price: f64,
    pub cost: f64,
    pub created_at: NaiveDate,
}

/// Current stock level for one product
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventoryRecord {
    pub product_id: String,
    pub quantity: u32,
    pub warehouse: String,
    pub last_updated: NaiveDateTime,
}

/// One customer order header
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub order_id: String,
    pub customer_id: String,
    pub order_date: NaiveDateTime,
    pub total_amount: f64,
    pub status: String,
    pub payment_method: String,
}

/// One line of an order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItem {
    pub order_id: String,
    pub product_id: String,
    pub quantity: u32,
    pub price_per_unit: f64,
    pub item_total: f64,
}

/// Inventory row joined with its product, for low-stock listings
#[derive(Debug, Clone, Serialize)]
pub struct LowStockEntry {
    pub product_id: String,
    pub name: String,
    pub category: String,
    pub quantity: u32,
    pub warehouse: String,
}

/// Sales aggregates for one product over a trailing window
#[derive(Debug, Clone, Serialize)]
pub struct SalesSummary {
    pub product_id: String,
    pub period_days: u32,
    pub total_units_sold: u64,
    pub total_revenue: f64,
    pub avg_daily_units: f64,
    pub order_count: usize,
}

/// One row of a top-sellers ranking
#[derive(Debug, Clone, Serialize)]
pub struct TopSeller {
    pub product_id: String,
    pub name: String,
    pub category: String,
    pub total_units_sold: u64,
    pub total_revenue: f64,
}

/// In-memory view over the four merchant datasets
#[derive(Debug, Default)]
pub struct DataStore {
    products: Vec<Product>,
    inventory: Vec<InventoryRecord>,
    orders: Vec<Order>,
    order_items: Vec<OrderItem>,
}

impl DataStore {
    /// Build a store from records already in memory (tests, fixtures)
    pub fn from_records(
        products: Vec<Product>,
        inventory: Vec<InventoryRecord>,
        orders: Vec<Order>,
        order_items: Vec<OrderItem>,
    ) -> Self {
        Self {
            products,
            inventory,
            orders,
            order_items,
        }
    }

    /// Load all four datasets from JSON files in `dir`
    pub async fn load(dir: &Path) -> Result<Self> {
        let products = read_dataset(&dir.join("products.json")).await?;
        let inventory = read_dataset(&dir.join("inventory.json")).await?;
        let orders = read_dataset(&dir.join("orders.json")).await?;
        let order_items = read_dataset(&dir.join("order_items.json")).await?;

        let store = Self {
            products,
            inventory,
            orders,
            order_items,
        };
        info!(
            products = store.products.len(),
            inventory = store.inventory.len(),
            orders = store.orders.len(),
            order_items = store.order_items.len(),
            "datasets loaded"
        );
        Ok(store)
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Look up one product by id
    pub fn product(&self, product_id: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.product_id == product_id)
    }

    /// List products, optionally filtered by category, up to `limit`
    pub fn products(&self, category: Option<&str>, limit: usize) -> Vec<&Product> {
        self.products
            .iter()
            .filter(|p| category.map(|c| p.category == c).unwrap_or(true))
            .take(limit)
            .collect()
    }

    /// Current inventory row for one product
    pub fn inventory(&self, product_id: &str) -> Option<&InventoryRecord> {
        self.inventory.iter().find(|i| i.product_id == product_id)
    }

    /// Inventory rows below `threshold`, joined with product info.
    ///
    /// Inventory rows whose product id is not in the catalog are dropped,
    /// matching an inner join.
    pub fn low_stock(&self, threshold: u32) -> Vec<LowStockEntry> {
        self.inventory
            .iter()
            .filter(|i| i.quantity < threshold)
            .filter_map(|i| {
                self.product(&i.product_id).map(|p| LowStockEntry {
                    product_id: p.product_id.clone(),
                    name: p.name.clone(),
                    category: p.category.clone(),
                    quantity: i.quantity,
                    warehouse: i.warehouse.clone(),
                })
            })
            .collect()
    }

    /// Sales aggregates for `product_id` over the `days` ending at `today`.
    ///
    /// Returns `None` when the window contains no orders at all; a product
    /// that simply sold nothing yields a zeroed summary instead.
    pub fn sales_for_product(
        &self,
        product_id: &str,
        days: u32,
        today: NaiveDate,
    ) -> Option<SalesSummary> {
        let recent = self.recent_order_ids(days, today);
        if recent.is_empty() {
            debug!(days, "no orders in window");
            return None;
        }

        let mut total_units: u64 = 0;
        let mut total_revenue = 0.0;
        let mut matched_orders = HashSet::new();

        for item in self
            .order_items
            .iter()
            .filter(|item| item.product_id == product_id && recent.contains(&item.order_id))
        {
            total_units += u64::from(item.quantity);
            total_revenue += item.item_total;
            matched_orders.insert(item.order_id.as_str());
        }

        Some(SalesSummary {
            product_id: product_id.to_string(),
            period_days: days,
            total_units_sold: total_units,
            total_revenue,
            avg_daily_units: if days == 0 {
                0.0
            } else {
                total_units as f64 / f64::from(days)
            },
            order_count: matched_orders.len(),
        })
    }

    /// Top products by units sold over the `days` ending at `today`.
    ///
    /// Items referencing unknown product ids are dropped (inner join with
    /// the catalog).
    pub fn top_sellers(&self, days: u32, limit: usize, today: NaiveDate) -> Vec<TopSeller> {
        let recent = self.recent_order_ids(days, today);
        if recent.is_empty() {
            return Vec::new();
        }

        let mut by_product: HashMap<&str, (u64, f64)> = HashMap::new();
        for item in self
            .order_items
            .iter()
            .filter(|item| recent.contains(&item.order_id))
        {
            let entry = by_product.entry(item.product_id.as_str()).or_default();
            entry.0 += u64::from(item.quantity);
            entry.1 += item.item_total;
        }

        let mut ranked: Vec<TopSeller> = by_product
            .into_iter()
            .filter_map(|(product_id, (units, revenue))| {
                self.product(product_id).map(|p| TopSeller {
                    product_id: p.product_id.clone(),
                    name: p.name.clone(),
                    category: p.category.clone(),
                    total_units_sold: units,
                    total_revenue: revenue,
                })
            })
            .collect();

        // Units descending, product id as a deterministic tie-break.
        ranked.sort_by(|a, b| {
            b.total_units_sold
                .cmp(&a.total_units_sold)
                .then_with(|| a.product_id.cmp(&b.product_id))
        });
        ranked.truncate(limit);
        ranked
    }

    fn recent_order_ids(&self, days: u32, today: NaiveDate) -> HashSet<String> {
        let threshold = today - Duration::days(i64::from(days));
        self.orders
            .iter()
            .filter(|o| o.order_date.date() >= threshold)
            .map(|o| o.order_id.clone())
            .collect()
    }
}

async fn read_dataset<T: serde::de::DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    if !path.exists() {
        return Err(DataError::MissingDataset(path.to_path_buf()));
    }
    let content = tokio::fs::read_to_string(path).await?;
    let records = serde_json::from_str(&content)?;
    Ok(records)
}
