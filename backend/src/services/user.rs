//! User lookup service
//!
//! The core has no authentication; it only needs stable identities to stamp
//! movements with, so this stays a minimal username registry.

use shared::models::User;
use shared::validation::validate_username;
use sqlx::SqlitePool;

use crate::error::{AppError, AppResult};

/// User service backing movement attribution
#[derive(Clone)]
pub struct UserService {
    db: SqlitePool,
}

impl UserService {
    /// Create a new UserService instance
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// Get all users ordered by username
    pub async fn get_users(&self) -> AppResult<Vec<User>> {
        let rows = sqlx::query_as::<_, (i64, String)>(
            "SELECT id, username FROM users ORDER BY username",
        )
        .fetch_all(&self.db)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(id, username)| User { id, username })
            .collect())
    }

    /// Get a user by id
    pub async fn get_user(&self, user_id: i64) -> AppResult<User> {
        let row = sqlx::query_as::<_, (i64, String)>(
            "SELECT id, username FROM users WHERE id = ?1",
        )
        .bind(user_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("User".to_string()))?;

        Ok(User {
            id: row.0,
            username: row.1,
        })
    }

    /// Get a user by username
    pub async fn get_user_by_username(&self, username: &str) -> AppResult<User> {
        let row = sqlx::query_as::<_, (i64, String)>(
            "SELECT id, username FROM users WHERE username = ?1",
        )
        .bind(username)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("User".to_string()))?;

        Ok(User {
            id: row.0,
            username: row.1,
        })
    }

    /// Create a new user
    pub async fn create_user(&self, username: &str) -> AppResult<User> {
        validate_username(username).map_err(|msg| AppError::Validation {
            field: "username".to_string(),
            message: msg.to_string(),
        })?;

        let taken = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM users WHERE username = ?1",
        )
        .bind(username)
        .fetch_one(&self.db)
        .await?;

        if taken > 0 {
            return Err(AppError::Validation {
                field: "username".to_string(),
                message: "Username is already taken".to_string(),
            });
        }

        let id = sqlx::query_scalar::<_, i64>(
            "INSERT INTO users (username) VALUES (?1) RETURNING id",
        )
        .bind(username)
        .fetch_one(&self.db)
        .await?;

        Ok(User {
            id,
            username: username.to_string(),
        })
    }
}
