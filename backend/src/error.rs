//! Error handling for the inventory management backend

use thiserror::Error;

/// Name of the CHECK constraint guarding `products.stock >= 0`
///
/// The database surfaces constraint violations as textual errors; this name
/// is how a failed stock adjustment is told apart from any other failure.
pub const STOCK_CONSTRAINT: &str = "stock_non_negative";

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Validation errors
    #[error("Validation error: {message}")]
    Validation { field: String, message: String },

    #[error("Resource not found: {0}")]
    NotFound(String),

    // Business logic errors
    #[error("Insufficient stock: {0}")]
    InsufficientStock(String),

    // Database errors
    #[error("Database error: {0}")]
    DatabaseError(sqlx::Error),

    #[error("Migration error: {0}")]
    MigrationError(#[from] sqlx::migrate::MigrateError),

    // Internal errors
    #[error("Internal error: {0}")]
    InternalError(#[from] anyhow::Error),
}

impl From<sqlx::Error> for AppError {
    /// Classify database errors, recognizing stock-constraint violations
    ///
    /// A CHECK violation naming [`STOCK_CONSTRAINT`] means some product's
    /// stock would have gone negative; everything else stays a generic
    /// database error.
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.message().contains(STOCK_CONSTRAINT) {
                return AppError::InsufficientStock(
                    "insufficient stock for one or more products".to_string(),
                );
            }
        }
        AppError::DatabaseError(err)
    }
}

/// Result type alias for the service layer
pub type AppResult<T> = Result<T, AppError>;
