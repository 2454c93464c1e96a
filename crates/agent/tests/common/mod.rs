//! Shared fixtures for agent integration tests
#![allow(dead_code)]

use chrono::{NaiveDate, NaiveDateTime};
use std::sync::Arc;
use stocksense_data::{DataStore, InventoryRecord, Order, OrderItem, Product};

/// Anchor for every sales window in the fixtures
pub fn reference_date() -> NaiveDate {
    "2026-08-01".parse().unwrap()
}

fn datetime(s: &str) -> NaiveDateTime {
    format!("{}T12:00:00", s).parse().unwrap()
}

fn product(id: &str, name: &str, category: &str, price: f64) -> Product {
    Product {
        product_id: id.to_string(),
        name: name.to_string(),
        category: category.to_string(),
        price,
        cost: price / 2.0,
        created_at: "2025-01-01".parse().unwrap(),
    }
}

fn inventory(id: &str, quantity: u32, warehouse: &str) -> InventoryRecord {
    InventoryRecord {
        product_id: id.to_string(),
        quantity,
        warehouse: warehouse.to_string(),
        last_updated: datetime("2026-08-01"),
    }
}

fn order(id: &str, date: &str) -> Order {
    Order {
        order_id: id.to_string(),
        customer_id: "C1000".to_string(),
        order_date: datetime(date),
        total_amount: 0.0,
        status: "completed".to_string(),
        payment_method: "credit_card".to_string(),
    }
}

fn item(order_id: &str, product_id: &str, quantity: u32, unit_price: f64) -> OrderItem {
    OrderItem {
        order_id: order_id.to_string(),
        product_id: product_id.to_string(),
        quantity,
        price_per_unit: unit_price,
        item_total: f64::from(quantity) * unit_price,
    }
}

/// A small but fully joined dataset.
///
/// Within the 30-day window ending at [`reference_date`]:
/// P100 sold 4 units, P200 sold 1, P400 sold 30, P300 sold nothing
/// (its only sale is months old).
pub fn fixture_store() -> Arc<DataStore> {
    let products = vec![
        product("P100", "Canvas Tote", "Accessories", 25.0),
        product("P200", "Wool Beanie", "Apparel", 18.0),
        product("P300", "Desk Lamp", "Home Goods", 40.0),
        product("P400", "Phone Case", "Accessories", 12.0),
    ];
    let inventory = vec![
        inventory("P100", 42, "Main"),
        inventory("P200", 3, "East"),
        inventory("P300", 120, "Main"),
        inventory("P400", 2, "West"),
    ];
    let orders = vec![
        order("A1", "2026-07-20"),
        order("A2", "2026-07-28"),
        order("A3", "2026-05-01"),
        order("A4", "2026-07-25"),
    ];
    let order_items = vec![
        item("A1", "P100", 2, 25.0),
        item("A1", "P200", 1, 18.0),
        item("A2", "P100", 2, 25.0),
        item("A4", "P400", 30, 12.0),
        item("A3", "P300", 5, 40.0),
    ];

    Arc::new(DataStore::from_records(
        products,
        inventory,
        orders,
        order_items,
    ))
}
