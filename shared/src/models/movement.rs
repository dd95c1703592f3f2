//! Movement ledger entries

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::DocumentRef;

/// Direction of a stock movement
///
/// The kind is fixed by the parent document type (purchases carry stock-in
/// lines, orders carry stock-out lines) and is stamped at persist time, never
/// taken from the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MovementKind {
    StockIn,
    StockOut,
}

impl MovementKind {
    /// Integer code used in the movements table
    pub fn code(&self) -> i64 {
        match self {
            MovementKind::StockIn => 1,
            MovementKind::StockOut => 2,
        }
    }

    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            1 => Some(MovementKind::StockIn),
            2 => Some(MovementKind::StockOut),
            _ => None,
        }
    }

    /// Sign of this kind's effect on inventory: +1 adds stock, -1 removes it
    pub fn direction(&self) -> i64 {
        match self {
            MovementKind::StockIn => 1,
            MovementKind::StockOut => -1,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MovementKind::StockIn => "stock_in",
            MovementKind::StockOut => "stock_out",
        }
    }
}

/// One line item: a quantity of one product moved by one document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Movement {
    pub id: i64,
    pub kind: MovementKind,
    pub quantity: i64,
    pub date: NaiveDate,
    pub product_id: i64,
    pub user_id: i64,
    pub document: DocumentRef,
}
