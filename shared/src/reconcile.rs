//! Stock-delta arithmetic for reconciliation batches
//!
//! A batch of line-item operations against one document collapses into one
//! net stock delta per product. The sign convention is fixed throughout the
//! crate: an accumulated delta is the quantity *added to inventory*, so
//! stock-in contributions are positive, stock-out contributions are negative,
//! and applying a delta is always `stock + delta`.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::MovementKind;

/// One line-item operation submitted in a reconciliation batch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "op")]
pub enum LineOp {
    /// Add a new line for `quantity` units of a product
    New { product_id: i64, quantity: i64 },
    /// Change an existing line's quantity
    Edit { movement_id: i64, quantity: i64 },
    /// Remove an existing line
    Delete { movement_id: i64 },
}

/// A line operation with its pre-change state fetched from the ledger
///
/// Edits and deletes need the original quantity to compute their effect; the
/// engine resolves each [`LineOp`] into one of these before any mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolvedLine {
    New {
        product_id: i64,
        quantity: i64,
    },
    Edit {
        product_id: i64,
        original_quantity: i64,
        new_quantity: i64,
    },
    Delete {
        product_id: i64,
        original_quantity: i64,
    },
}

impl ResolvedLine {
    pub fn product_id(&self) -> i64 {
        match self {
            ResolvedLine::New { product_id, .. }
            | ResolvedLine::Edit { product_id, .. }
            | ResolvedLine::Delete { product_id, .. } => *product_id,
        }
    }

    /// Change to the quantity this document records for the product
    pub fn quantity_delta(&self) -> i64 {
        match self {
            ResolvedLine::New { quantity, .. } => *quantity,
            ResolvedLine::Edit {
                original_quantity,
                new_quantity,
                ..
            } => new_quantity - original_quantity,
            ResolvedLine::Delete {
                original_quantity, ..
            } => -original_quantity,
        }
    }

    /// Quantity this change adds to inventory, signed by the document kind
    pub fn inventory_delta(&self, kind: MovementKind) -> i64 {
        kind.direction() * self.quantity_delta()
    }
}

/// Collapse a batch of resolved lines into one net inventory delta per product
///
/// Products whose contributions cancel out are omitted; an empty batch yields
/// an empty map.
pub fn net_inventory_deltas(kind: MovementKind, lines: &[ResolvedLine]) -> BTreeMap<i64, i64> {
    let mut deltas: BTreeMap<i64, i64> = BTreeMap::new();
    for line in lines {
        *deltas.entry(line.product_id()).or_insert(0) += line.inventory_delta(kind);
    }
    deltas.retain(|_, delta| *delta != 0);
    deltas
}

/// Sum of quantity x unit price over a document's current lines
///
/// Returns `None` when a line value or the running sum exceeds the decimal
/// range, so callers report an error instead of panicking mid-transaction.
pub fn document_total<I>(lines: I) -> Option<Decimal>
where
    I: IntoIterator<Item = (i64, Decimal)>,
{
    lines
        .into_iter()
        .try_fold(Decimal::ZERO, |total, (quantity, price)| {
            Decimal::from(quantity)
                .checked_mul(price)
                .and_then(|line| total.checked_add(line))
        })
}

/// Result of a committed reconciliation batch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchOutcome {
    /// The document total recomputed from its post-batch lines
    pub new_total: Decimal,
    /// Net stock delta actually applied per product id (non-zero entries only)
    pub applied_deltas: BTreeMap<i64, i64>,
}
