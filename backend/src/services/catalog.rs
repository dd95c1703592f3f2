//! Catalog service for categories, suppliers, and clients
//!
//! Plain reference data with simple CRUD and name search. Products live in
//! their own service because of the stock invariant.

use serde::Deserialize;
use shared::models::{Category, Client, Supplier};
use shared::validation::{validate_contact, validate_name};
use sqlx::SqlitePool;

use crate::error::{AppError, AppResult};
use crate::services::escape_like;

/// Catalog service for the reference entities documents point at
#[derive(Clone)]
pub struct CatalogService {
    db: SqlitePool,
}

/// Input for creating a supplier
#[derive(Debug, Deserialize)]
pub struct CreateSupplierInput {
    pub name: String,
    pub contact: String,
}

/// Input for updating a supplier
#[derive(Debug, Deserialize)]
pub struct UpdateSupplierInput {
    pub name: Option<String>,
    pub contact: Option<String>,
}

/// Input for creating a client
#[derive(Debug, Deserialize)]
pub struct CreateClientInput {
    pub name: String,
    pub contact: String,
}

/// Input for updating a client
#[derive(Debug, Deserialize)]
pub struct UpdateClientInput {
    pub name: Option<String>,
    pub contact: Option<String>,
}

impl CatalogService {
    /// Create a new CatalogService instance
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    // ========================================================================
    // Categories
    // ========================================================================

    /// Get all categories ordered by name
    pub async fn get_categories(&self) -> AppResult<Vec<Category>> {
        let rows = sqlx::query_as::<_, (i64, String)>(
            "SELECT id, name FROM categories ORDER BY name",
        )
        .fetch_all(&self.db)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(id, name)| Category { id, name })
            .collect())
    }

    /// Search categories by name substring
    pub async fn search_categories(&self, query: &str) -> AppResult<Vec<Category>> {
        let rows = sqlx::query_as::<_, (i64, String)>(
            "SELECT id, name FROM categories WHERE name LIKE '%' || ?1 || '%' ESCAPE '\\' ORDER BY name",
        )
        .bind(escape_like(query))
        .fetch_all(&self.db)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(id, name)| Category { id, name })
            .collect())
    }

    /// Get a category by id
    pub async fn get_category(&self, category_id: i64) -> AppResult<Category> {
        let row = sqlx::query_as::<_, (i64, String)>(
            "SELECT id, name FROM categories WHERE id = ?1",
        )
        .bind(category_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Category".to_string()))?;

        Ok(Category {
            id: row.0,
            name: row.1,
        })
    }

    /// Create a new category
    pub async fn create_category(&self, name: &str) -> AppResult<Category> {
        validate_name(name).map_err(|msg| AppError::Validation {
            field: "name".to_string(),
            message: msg.to_string(),
        })?;

        let id = sqlx::query_scalar::<_, i64>(
            "INSERT INTO categories (name) VALUES (?1) RETURNING id",
        )
        .bind(name)
        .fetch_one(&self.db)
        .await?;

        Ok(Category {
            id,
            name: name.to_string(),
        })
    }

    /// Rename a category
    pub async fn update_category(&self, category_id: i64, name: &str) -> AppResult<Category> {
        validate_name(name).map_err(|msg| AppError::Validation {
            field: "name".to_string(),
            message: msg.to_string(),
        })?;

        let result = sqlx::query("UPDATE categories SET name = ?1 WHERE id = ?2")
            .bind(name)
            .bind(category_id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Category".to_string()));
        }

        Ok(Category {
            id: category_id,
            name: name.to_string(),
        })
    }

    /// Delete a category (its products go with it)
    pub async fn delete_category(&self, category_id: i64) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM categories WHERE id = ?1")
            .bind(category_id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Category".to_string()));
        }

        Ok(())
    }

    // ========================================================================
    // Suppliers
    // ========================================================================

    /// Get all suppliers ordered by name
    pub async fn get_suppliers(&self) -> AppResult<Vec<Supplier>> {
        let rows = sqlx::query_as::<_, (i64, String, String)>(
            "SELECT id, name, contact FROM suppliers ORDER BY name",
        )
        .fetch_all(&self.db)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(id, name, contact)| Supplier { id, name, contact })
            .collect())
    }

    /// Search suppliers by name substring
    pub async fn search_suppliers(&self, query: &str) -> AppResult<Vec<Supplier>> {
        let rows = sqlx::query_as::<_, (i64, String, String)>(
            "SELECT id, name, contact FROM suppliers WHERE name LIKE '%' || ?1 || '%' ESCAPE '\\' ORDER BY name",
        )
        .bind(escape_like(query))
        .fetch_all(&self.db)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(id, name, contact)| Supplier { id, name, contact })
            .collect())
    }

    /// Get a supplier by id
    pub async fn get_supplier(&self, supplier_id: i64) -> AppResult<Supplier> {
        let row = sqlx::query_as::<_, (i64, String, String)>(
            "SELECT id, name, contact FROM suppliers WHERE id = ?1",
        )
        .bind(supplier_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Supplier".to_string()))?;

        Ok(Supplier {
            id: row.0,
            name: row.1,
            contact: row.2,
        })
    }

    /// Create a new supplier
    pub async fn create_supplier(&self, input: CreateSupplierInput) -> AppResult<Supplier> {
        validate_name(&input.name).map_err(|msg| AppError::Validation {
            field: "name".to_string(),
            message: msg.to_string(),
        })?;
        validate_contact(&input.contact).map_err(|msg| AppError::Validation {
            field: "contact".to_string(),
            message: msg.to_string(),
        })?;

        let id = sqlx::query_scalar::<_, i64>(
            "INSERT INTO suppliers (name, contact) VALUES (?1, ?2) RETURNING id",
        )
        .bind(&input.name)
        .bind(&input.contact)
        .fetch_one(&self.db)
        .await?;

        Ok(Supplier {
            id,
            name: input.name,
            contact: input.contact,
        })
    }

    /// Update a supplier
    pub async fn update_supplier(
        &self,
        supplier_id: i64,
        input: UpdateSupplierInput,
    ) -> AppResult<Supplier> {
        let existing = self.get_supplier(supplier_id).await?;

        let name = input.name.unwrap_or(existing.name);
        let contact = input.contact.unwrap_or(existing.contact);

        validate_name(&name).map_err(|msg| AppError::Validation {
            field: "name".to_string(),
            message: msg.to_string(),
        })?;
        validate_contact(&contact).map_err(|msg| AppError::Validation {
            field: "contact".to_string(),
            message: msg.to_string(),
        })?;

        sqlx::query("UPDATE suppliers SET name = ?1, contact = ?2 WHERE id = ?3")
            .bind(&name)
            .bind(&contact)
            .bind(supplier_id)
            .execute(&self.db)
            .await?;

        Ok(Supplier {
            id: supplier_id,
            name,
            contact,
        })
    }

    /// Delete a supplier (its purchases go with it)
    pub async fn delete_supplier(&self, supplier_id: i64) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM suppliers WHERE id = ?1")
            .bind(supplier_id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Supplier".to_string()));
        }

        Ok(())
    }

    // ========================================================================
    // Clients
    // ========================================================================

    /// Get all clients ordered by name
    pub async fn get_clients(&self) -> AppResult<Vec<Client>> {
        let rows = sqlx::query_as::<_, (i64, String, String)>(
            "SELECT id, name, contact FROM clients ORDER BY name",
        )
        .fetch_all(&self.db)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(id, name, contact)| Client { id, name, contact })
            .collect())
    }

    /// Search clients by name substring
    pub async fn search_clients(&self, query: &str) -> AppResult<Vec<Client>> {
        let rows = sqlx::query_as::<_, (i64, String, String)>(
            "SELECT id, name, contact FROM clients WHERE name LIKE '%' || ?1 || '%' ESCAPE '\\' ORDER BY name",
        )
        .bind(escape_like(query))
        .fetch_all(&self.db)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(id, name, contact)| Client { id, name, contact })
            .collect())
    }

    /// Get a client by id
    pub async fn get_client(&self, client_id: i64) -> AppResult<Client> {
        let row = sqlx::query_as::<_, (i64, String, String)>(
            "SELECT id, name, contact FROM clients WHERE id = ?1",
        )
        .bind(client_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Client".to_string()))?;

        Ok(Client {
            id: row.0,
            name: row.1,
            contact: row.2,
        })
    }

    /// Create a new client
    pub async fn create_client(&self, input: CreateClientInput) -> AppResult<Client> {
        validate_name(&input.name).map_err(|msg| AppError::Validation {
            field: "name".to_string(),
            message: msg.to_string(),
        })?;
        validate_contact(&input.contact).map_err(|msg| AppError::Validation {
            field: "contact".to_string(),
            message: msg.to_string(),
        })?;

        let id = sqlx::query_scalar::<_, i64>(
            "INSERT INTO clients (name, contact) VALUES (?1, ?2) RETURNING id",
        )
        .bind(&input.name)
        .bind(&input.contact)
        .fetch_one(&self.db)
        .await?;

        Ok(Client {
            id,
            name: input.name,
            contact: input.contact,
        })
    }

    /// Update a client
    pub async fn update_client(
        &self,
        client_id: i64,
        input: UpdateClientInput,
    ) -> AppResult<Client> {
        let existing = self.get_client(client_id).await?;

        let name = input.name.unwrap_or(existing.name);
        let contact = input.contact.unwrap_or(existing.contact);

        validate_name(&name).map_err(|msg| AppError::Validation {
            field: "name".to_string(),
            message: msg.to_string(),
        })?;
        validate_contact(&contact).map_err(|msg| AppError::Validation {
            field: "contact".to_string(),
            message: msg.to_string(),
        })?;

        sqlx::query("UPDATE clients SET name = ?1, contact = ?2 WHERE id = ?3")
            .bind(&name)
            .bind(&contact)
            .bind(client_id)
            .execute(&self.db)
            .await?;

        Ok(Client {
            id: client_id,
            name,
            contact,
        })
    }

    /// Delete a client (its orders go with it)
    pub async fn delete_client(&self, client_id: i64) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM clients WHERE id = ?1")
            .bind(client_id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Client".to_string()));
        }

        Ok(())
    }
}
