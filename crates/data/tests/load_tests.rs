//! Tests for loading datasets from disk

use stocksense_data::{DataError, DataStore};
use tempfile::TempDir;

fn temp_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

async fn write_file(dir: &TempDir, name: &str, content: &str) {
    tokio::fs::write(dir.path().join(name), content).await.unwrap();
}

async fn write_fixture(dir: &TempDir) {
    write_file(
        dir,
        "products.json",
        r#"[{
            "product_id": "P100",
            "name": "Canvas Tote",
            "category": "Accessories",
            "price": 25.0,
            "cost": 12.5,
            "created_at": "2025-06-01"
        }]"#,
    )
    .await;
    write_file(
        dir,
        "inventory.json",
        r#"[{
            "product_id": "P100",
            "quantity": 42,
            "warehouse": "Main",
            "last_updated": "2026-08-01T09:30:00"
        }]"#,
    )
    .await;
    write_file(
        dir,
        "orders.json",
        r#"[{
            "order_id": "A1",
            "customer_id": "C1000",
            "order_date": "2026-07-20T10:00:00",
            "total_amount": 50.0,
            "status": "completed",
            "payment_method": "credit_card"
        }]"#,
    )
    .await;
    write_file(
        dir,
        "order_items.json",
        r#"[{
            "order_id": "A1",
            "product_id": "P100",
            "quantity": 2,
            "price_per_unit": 25.0,
            "item_total": 50.0
        }]"#,
    )
    .await;
}

#[tokio::test]
async fn test_load_full_fixture() {
    let dir = temp_dir();
    write_fixture(&dir).await;

    let store = DataStore::load(dir.path()).await.unwrap();

    assert!(!store.is_empty());
    assert_eq!(store.product("P100").unwrap().price, 25.0);
    assert_eq!(store.inventory("P100").unwrap().quantity, 42);

    let summary = store
        .sales_for_product("P100", 30, "2026-08-01".parse().unwrap())
        .unwrap();
    assert_eq!(summary.total_units_sold, 2);
}

#[tokio::test]
async fn test_load_missing_dataset_is_error() {
    let dir = temp_dir();
    write_fixture(&dir).await;
    tokio::fs::remove_file(dir.path().join("orders.json"))
        .await
        .unwrap();

    let result = DataStore::load(dir.path()).await;
    assert!(matches!(result, Err(DataError::MissingDataset(_))));
}

#[tokio::test]
async fn test_load_malformed_dataset_is_error() {
    let dir = temp_dir();
    write_fixture(&dir).await;
    write_file(&dir, "products.json", "{ not a list }").await;

    let result = DataStore::load(dir.path()).await;
    assert!(matches!(result, Err(DataError::Json(_))));
}
