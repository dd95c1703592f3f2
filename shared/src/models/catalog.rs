//! Catalog entities: categories, suppliers, clients, products

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A product category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
}

/// A supplier that stock-in purchases are bought from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Supplier {
    pub id: i64,
    pub name: String,
    pub contact: String,
}

/// A client that stock-out orders are sold to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Client {
    pub id: i64,
    pub name: String,
    pub contact: String,
}

/// A stocked product
///
/// `stock` is never negative; the storage layer enforces the invariant and
/// every mutation goes through an atomic delta adjustment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub price: Decimal,
    pub category_id: i64,
    pub stock: i64,
}
