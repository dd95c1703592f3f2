//! Transaction documents: purchases (stock-in) and orders (stock-out)

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::MovementKind;

/// A stock-in document: goods bought from a supplier
///
/// `total` is a cache recomputed from the document's movements after every
/// reconciliation batch; it is never written by any other code path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Purchase {
    pub id: i64,
    pub date: NaiveDate,
    pub total: Decimal,
    pub supplier_id: i64,
}

/// A stock-out document: goods sold to a client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: i64,
    pub date: NaiveDate,
    pub total: Decimal,
    pub client_id: i64,
}

/// Reference to the single parent document of a movement
///
/// Exactly one parent per movement is a type-level guarantee here; the
/// storage layer mirrors it with a pair of nullable foreign keys under an
/// exactly-one-set CHECK constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "id")]
pub enum DocumentRef {
    Purchase(i64),
    Order(i64),
}

impl DocumentRef {
    /// Id of the referenced document row
    pub fn id(&self) -> i64 {
        match self {
            DocumentRef::Purchase(id) | DocumentRef::Order(id) => *id,
        }
    }

    /// The movement kind every line of this document carries
    pub fn movement_kind(&self) -> MovementKind {
        match self {
            DocumentRef::Purchase(_) => MovementKind::StockIn,
            DocumentRef::Order(_) => MovementKind::StockOut,
        }
    }
}
