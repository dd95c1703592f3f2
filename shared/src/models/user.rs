//! User accounts

use serde::{Deserialize, Serialize};

/// An account that movements are stamped with
///
/// Authentication lives in the excluded web layer; the core only needs a
/// stable identity to record who performed each movement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
}
