//! Shared helpers for integration tests
//!
//! Every test gets a private in-memory database with migrations applied, so
//! tests run in isolation and need no external services.

#![allow(dead_code)]

use std::str::FromStr;

use inventory_backend::config::DatabaseConfig;
use inventory_backend::db;
use inventory_backend::services::catalog::{CreateClientInput, CreateSupplierInput};
use inventory_backend::services::product::CreateProductInput;
use inventory_backend::services::{CatalogService, DocumentService, ProductService, UserService};
use rust_decimal::Decimal;
use sqlx::SqlitePool;

/// Helper to create Decimal from string
pub fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

/// Fresh in-memory database with the schema applied
pub async fn setup() -> SqlitePool {
    inventory_backend::init_tracing();

    db::connect(&DatabaseConfig::in_memory())
        .await
        .expect("failed to create test database")
}

// ============================================================================
// Seed helpers
// ============================================================================

pub async fn seed_user(pool: &SqlitePool, username: &str) -> i64 {
    UserService::new(pool.clone())
        .create_user(username)
        .await
        .expect("seed user")
        .id
}

pub async fn seed_category(pool: &SqlitePool, name: &str) -> i64 {
    CatalogService::new(pool.clone())
        .create_category(name)
        .await
        .expect("seed category")
        .id
}

pub async fn seed_product(
    pool: &SqlitePool,
    category_id: i64,
    name: &str,
    price: &str,
    stock: i64,
) -> i64 {
    ProductService::new(pool.clone())
        .create_product(CreateProductInput {
            name: name.to_string(),
            price: dec(price),
            category_id,
            stock,
        })
        .await
        .expect("seed product")
        .id
}

pub async fn seed_supplier(pool: &SqlitePool, name: &str) -> i64 {
    CatalogService::new(pool.clone())
        .create_supplier(CreateSupplierInput {
            name: name.to_string(),
            contact: format!("{}@example.com", name.to_lowercase().replace(' ', ".")),
        })
        .await
        .expect("seed supplier")
        .id
}

pub async fn seed_client(pool: &SqlitePool, name: &str) -> i64 {
    CatalogService::new(pool.clone())
        .create_client(CreateClientInput {
            name: name.to_string(),
            contact: format!("{}@example.com", name.to_lowercase().replace(' ', ".")),
        })
        .await
        .expect("seed client")
        .id
}

pub async fn seed_purchase(pool: &SqlitePool, supplier_id: i64) -> i64 {
    DocumentService::new(pool.clone())
        .create_purchase(supplier_id)
        .await
        .expect("seed purchase")
        .id
}

pub async fn seed_order(pool: &SqlitePool, client_id: i64) -> i64 {
    DocumentService::new(pool.clone())
        .create_order(client_id)
        .await
        .expect("seed order")
        .id
}

// ============================================================================
// State readbacks
// ============================================================================

pub async fn product_stock(pool: &SqlitePool, product_id: i64) -> i64 {
    ProductService::new(pool.clone())
        .get_product(product_id)
        .await
        .expect("read product stock")
        .stock
}

pub async fn purchase_total(pool: &SqlitePool, purchase_id: i64) -> Decimal {
    DocumentService::new(pool.clone())
        .get_purchase(purchase_id)
        .await
        .expect("read purchase total")
        .total
}

pub async fn order_total(pool: &SqlitePool, order_id: i64) -> Decimal {
    DocumentService::new(pool.clone())
        .get_order(order_id)
        .await
        .expect("read order total")
        .total
}
