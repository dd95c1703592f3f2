//! Catalog service tests
//!
//! Covers CRUD and search for categories, suppliers, and clients, plus the
//! product service with its guarded stock adjustment.

mod common;

use common::*;
use inventory_backend::error::AppError;
use inventory_backend::services::catalog::{UpdateClientInput, UpdateSupplierInput};
use inventory_backend::services::product::{CreateProductInput, UpdateProductInput};
use inventory_backend::services::{CatalogService, ProductService};

// ============================================================================
// Categories
// ============================================================================

#[tokio::test]
async fn test_category_crud() {
    let pool = setup().await;
    let svc = CatalogService::new(pool.clone());

    let created = svc.create_category("Beverages").await.unwrap();
    assert_eq!(created.name, "Beverages");

    let fetched = svc.get_category(created.id).await.unwrap();
    assert_eq!(fetched, created);

    let renamed = svc.update_category(created.id, "Drinks").await.unwrap();
    assert_eq!(renamed.name, "Drinks");
    assert_eq!(svc.get_category(created.id).await.unwrap().name, "Drinks");

    svc.delete_category(created.id).await.unwrap();
    let err = svc.get_category(created.id).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(ref entity) if entity == "Category"));
}

#[tokio::test]
async fn test_categories_listed_by_name() {
    let pool = setup().await;
    let svc = CatalogService::new(pool.clone());

    svc.create_category("Snacks").await.unwrap();
    svc.create_category("Beverages").await.unwrap();
    svc.create_category("Dairy").await.unwrap();

    let names: Vec<String> = svc
        .get_categories()
        .await
        .unwrap()
        .into_iter()
        .map(|c| c.name)
        .collect();
    assert_eq!(names, vec!["Beverages", "Dairy", "Snacks"]);
}

#[tokio::test]
async fn test_category_search_matches_substring() {
    let pool = setup().await;
    let svc = CatalogService::new(pool.clone());

    svc.create_category("Hot Beverages").await.unwrap();
    svc.create_category("Cold Beverages").await.unwrap();
    svc.create_category("Snacks").await.unwrap();

    let hits = svc.search_categories("Beverage").await.unwrap();
    assert_eq!(hits.len(), 2);

    let none = svc.search_categories("Frozen").await.unwrap();
    assert!(none.is_empty());
}

#[tokio::test]
async fn test_category_name_must_not_be_blank() {
    let pool = setup().await;
    let svc = CatalogService::new(pool.clone());

    let err = svc.create_category("   ").await.unwrap_err();
    assert!(matches!(err, AppError::Validation { ref field, .. } if field == "name"));
}

// ============================================================================
// Suppliers
// ============================================================================

#[tokio::test]
async fn test_supplier_partial_update_keeps_other_fields() {
    let pool = setup().await;
    let svc = CatalogService::new(pool.clone());
    let id = seed_supplier(&pool, "Acme Wholesale").await;

    let updated = svc
        .update_supplier(
            id,
            UpdateSupplierInput {
                name: Some("Acme Trading".to_string()),
                contact: None,
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.name, "Acme Trading");
    assert_eq!(updated.contact, "acme.wholesale@example.com");
}

#[tokio::test]
async fn test_supplier_delete_missing_is_not_found() {
    let pool = setup().await;
    let svc = CatalogService::new(pool.clone());

    let err = svc.delete_supplier(999).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(ref entity) if entity == "Supplier"));
}

#[tokio::test]
async fn test_supplier_search() {
    let pool = setup().await;
    let svc = CatalogService::new(pool.clone());

    seed_supplier(&pool, "Global Foods").await;
    seed_supplier(&pool, "Global Imports").await;
    seed_supplier(&pool, "Local Farm").await;

    let hits = svc.search_suppliers("Global").await.unwrap();
    assert_eq!(hits.len(), 2);
}

// ============================================================================
// Clients
// ============================================================================

#[tokio::test]
async fn test_client_crud() {
    let pool = setup().await;
    let svc = CatalogService::new(pool.clone());
    let id = seed_client(&pool, "Corner Shop").await;

    let fetched = svc.get_client(id).await.unwrap();
    assert_eq!(fetched.name, "Corner Shop");

    let updated = svc
        .update_client(
            id,
            UpdateClientInput {
                name: None,
                contact: Some("orders@cornershop.test".to_string()),
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.name, "Corner Shop");
    assert_eq!(updated.contact, "orders@cornershop.test");

    svc.delete_client(id).await.unwrap();
    let err = svc.get_client(id).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(ref entity) if entity == "Client"));
}

// ============================================================================
// Products
// ============================================================================

#[tokio::test]
async fn test_product_create_and_listing_resolves_category() {
    let pool = setup().await;
    let category_id = seed_category(&pool, "Beverages").await;
    let svc = ProductService::new(pool.clone());

    let product = svc
        .create_product(CreateProductInput {
            name: "Espresso Beans".to_string(),
            price: dec("12.50"),
            category_id,
            stock: 40,
        })
        .await
        .unwrap();
    assert_eq!(product.stock, 40);
    assert_eq!(product.price, dec("12.50"));

    let listing = svc.get_products().await.unwrap();
    assert_eq!(listing.len(), 1);
    assert_eq!(listing[0].category_name, "Beverages");
    assert_eq!(listing[0].price, dec("12.50"));
}

#[tokio::test]
async fn test_product_requires_existing_category() {
    let pool = setup().await;
    let svc = ProductService::new(pool.clone());

    let err = svc
        .create_product(CreateProductInput {
            name: "Orphan".to_string(),
            price: dec("1.00"),
            category_id: 42,
            stock: 0,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(ref entity) if entity == "Category"));
}

#[tokio::test]
async fn test_product_rejects_negative_price_and_stock() {
    let pool = setup().await;
    let category_id = seed_category(&pool, "Beverages").await;
    let svc = ProductService::new(pool.clone());

    let err = svc
        .create_product(CreateProductInput {
            name: "Bad Price".to_string(),
            price: dec("-1.00"),
            category_id,
            stock: 0,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation { ref field, .. } if field == "price"));

    let err = svc
        .create_product(CreateProductInput {
            name: "Bad Stock".to_string(),
            price: dec("1.00"),
            category_id,
            stock: -5,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation { ref field, .. } if field == "stock"));
}

#[tokio::test]
async fn test_product_update_does_not_touch_stock() {
    let pool = setup().await;
    let category_id = seed_category(&pool, "Beverages").await;
    let product_id = seed_product(&pool, category_id, "Espresso Beans", "12.50", 40).await;
    let svc = ProductService::new(pool.clone());

    let updated = svc
        .update_product(
            product_id,
            UpdateProductInput {
                name: None,
                price: Some(dec("13.75")),
                category_id: None,
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.name, "Espresso Beans");
    assert_eq!(updated.price, dec("13.75"));
    assert_eq!(updated.stock, 40);
    assert_eq!(product_stock(&pool, product_id).await, 40);
}

#[tokio::test]
async fn test_products_filter_by_category() {
    let pool = setup().await;
    let beverages = seed_category(&pool, "Beverages").await;
    let snacks = seed_category(&pool, "Snacks").await;
    seed_product(&pool, beverages, "Cola", "1.20", 10).await;
    seed_product(&pool, beverages, "Water", "0.80", 10).await;
    seed_product(&pool, snacks, "Chips", "2.00", 10).await;

    let svc = ProductService::new(pool.clone());

    let in_beverages = svc.get_products_by_category(beverages).await.unwrap();
    assert_eq!(in_beverages.len(), 2);
    assert!(in_beverages.iter().all(|p| p.category_id == beverages));

    let hits = svc.search_products("Col").await.unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].name, "Cola");
}

#[tokio::test]
async fn test_search_treats_like_wildcards_as_literals() {
    let pool = setup().await;
    let category_id = seed_category(&pool, "Beverages").await;
    seed_product(&pool, category_id, "Cola", "1.20", 10).await;
    seed_product(&pool, category_id, "Chips", "2.00", 10).await;

    let svc = ProductService::new(pool.clone());

    // Wildcard characters in the term match only themselves
    assert!(svc.search_products("%").await.unwrap().is_empty());
    assert!(svc.search_products("C_la").await.unwrap().is_empty());
    assert!(svc.search_products("\\").await.unwrap().is_empty());

    seed_product(&pool, category_id, "100% Juice", "3.00", 10).await;
    let hits = svc.search_products("100%").await.unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].name, "100% Juice");
}

// ============================================================================
// Stock adjustment
// ============================================================================

#[tokio::test]
async fn test_adjust_stock_applies_signed_delta() {
    let pool = setup().await;
    let category_id = seed_category(&pool, "Beverages").await;
    let product_id = seed_product(&pool, category_id, "Cola", "1.20", 10).await;
    let svc = ProductService::new(pool.clone());

    assert_eq!(svc.adjust_stock(product_id, 5).await.unwrap(), 15);
    assert_eq!(svc.adjust_stock(product_id, -7).await.unwrap(), 8);
    assert_eq!(product_stock(&pool, product_id).await, 8);
}

#[tokio::test]
async fn test_adjust_stock_down_to_exactly_zero() {
    let pool = setup().await;
    let category_id = seed_category(&pool, "Beverages").await;
    let product_id = seed_product(&pool, category_id, "Cola", "1.20", 10).await;
    let svc = ProductService::new(pool.clone());

    assert_eq!(svc.adjust_stock(product_id, -10).await.unwrap(), 0);
}

#[tokio::test]
async fn test_adjust_stock_overdraw_rejected_and_unchanged() {
    let pool = setup().await;
    let category_id = seed_category(&pool, "Beverages").await;
    let product_id = seed_product(&pool, category_id, "Cola", "1.20", 10).await;
    let svc = ProductService::new(pool.clone());

    let err = svc.adjust_stock(product_id, -11).await.unwrap_err();
    assert!(matches!(err, AppError::InsufficientStock(_)));
    assert_eq!(product_stock(&pool, product_id).await, 10);
}

#[tokio::test]
async fn test_adjust_stock_missing_product_is_not_found() {
    let pool = setup().await;
    let svc = ProductService::new(pool.clone());

    let err = svc.adjust_stock(999, 1).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(ref entity) if entity == "Product"));
}
