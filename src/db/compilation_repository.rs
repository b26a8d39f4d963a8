// src/db/compilation_repository.rs
// DOCUMENTATION: Database access layer for compilations and their items
// PURPOSE: Compilation CRUD plus ordered membership management

use crate::errors::AttractionsError;
use crate::models::{
    Attraction, Compilation, CompilationItem, CreateCompilationRequest, UpdateCompilationRequest,
};
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

/// Row shape for the item/attraction join
#[derive(Debug, FromRow)]
pub struct ItemWithAttractionRow {
    pub item_id: Uuid,
    pub order_index: i32,
    pub added_at: DateTime<Utc>,
    #[sqlx(flatten)]
    pub attraction: Attraction,
}

/// CompilationRepository: All database operations for compilations
pub struct CompilationRepository;

impl CompilationRepository {
    /// Create new compilation
    pub async fn create(
        pool: &PgPool,
        req: &CreateCompilationRequest,
    ) -> Result<Compilation, AttractionsError> {
        let compilation = sqlx::query_as::<_, Compilation>(
            r#"
            INSERT INTO compilations (name, profile, country, created_at, updated_at)
            VALUES ($1, $2, $3, NOW(), NOW())
            RETURNING *
            "#,
        )
        .bind(&req.name)
        .bind(&req.profile)
        .bind(&req.country)
        .fetch_one(pool)
        .await
        .map_err(|e| {
            log::error!("Failed to create compilation: {}", e);
            AttractionsError::DatabaseError(e.to_string())
        })?;

        log::info!("Created compilation with id: {}", compilation.id);
        Ok(compilation)
    }

    /// Retrieve compilation by ID
    pub async fn get_by_id(pool: &PgPool, id: Uuid) -> Result<Compilation, AttractionsError> {
        sqlx::query_as::<_, Compilation>("SELECT * FROM compilations WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(|e| {
                log::error!("Database error fetching compilation: {}", e);
                AttractionsError::DatabaseError(e.to_string())
            })?
            .ok_or_else(|| {
                log::warn!("Compilation not found: {}", id);
                AttractionsError::NotFound(format!("Compilation {}", id))
            })
    }

    /// List compilations, most recently updated first
    pub async fn list(pool: &PgPool) -> Result<Vec<Compilation>, AttractionsError> {
        sqlx::query_as::<_, Compilation>("SELECT * FROM compilations ORDER BY updated_at DESC")
            .fetch_all(pool)
            .await
            .map_err(|e| {
                log::error!("List compilations error: {}", e);
                AttractionsError::DatabaseError(e.to_string())
            })
    }

    /// Update existing compilation
    /// DOCUMENTATION: Partial update - only provided fields are modified
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        req: &UpdateCompilationRequest,
    ) -> Result<Compilation, AttractionsError> {
        let _ = Self::get_by_id(pool, id).await?;

        sqlx::query_as::<_, Compilation>(
            r#"
            UPDATE compilations
            SET name = COALESCE($1, name),
                profile = COALESCE($2, profile),
                country = COALESCE($3, country),
                updated_at = NOW()
            WHERE id = $4
            RETURNING *
            "#,
        )
        .bind(&req.name)
        .bind(&req.profile)
        .bind(&req.country)
        .bind(id)
        .fetch_one(pool)
        .await
        .map_err(|e| {
            log::error!("Update failed for compilation {}: {}", id, e);
            AttractionsError::DatabaseError(e.to_string())
        })
    }

    /// Delete compilation
    /// DOCUMENTATION: Hard delete; items are cascade-deleted by the foreign key
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<(), AttractionsError> {
        let rows = sqlx::query("DELETE FROM compilations WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await
            .map_err(|e| {
                log::error!("Delete failed for compilation {}: {}", id, e);
                AttractionsError::DatabaseError(e.to_string())
            })?
            .rows_affected();

        if rows == 0 {
            return Err(AttractionsError::NotFound(format!("Compilation {}", id)));
        }

        log::info!("Deleted compilation: {}", id);
        Ok(())
    }

    /// Fetch the members of a compilation with their attractions expanded
    /// DOCUMENTATION: Ordering is stable via order_index, not insertion time
    pub async fn items_with_attractions(
        pool: &PgPool,
        compilation_id: Uuid,
    ) -> Result<Vec<ItemWithAttractionRow>, AttractionsError> {
        sqlx::query_as::<_, ItemWithAttractionRow>(
            r#"
            SELECT
                ci.id AS item_id, ci.order_index, ci.added_at,
                a.*
            FROM compilation_items ci
            JOIN attractions a ON a.id = ci.attraction_id
            WHERE ci.compilation_id = $1
            ORDER BY ci.order_index ASC, ci.added_at ASC
            "#,
        )
        .bind(compilation_id)
        .fetch_all(pool)
        .await
        .map_err(|e| {
            log::error!(
                "Failed to fetch items for compilation {}: {}",
                compilation_id,
                e
            );
            AttractionsError::DatabaseError(e.to_string())
        })
    }

    /// Add an attraction to a compilation
    /// DOCUMENTATION: The pair must not already exist; the table's unique
    /// constraint is the final arbiter under concurrent inserts
    pub async fn add_item(
        pool: &PgPool,
        compilation_id: Uuid,
        attraction_id: Uuid,
        order_index: i32,
    ) -> Result<CompilationItem, AttractionsError> {
        let exists: (bool,) = sqlx::query_as(
            "SELECT EXISTS(SELECT 1 FROM compilation_items WHERE compilation_id = $1 AND attraction_id = $2)",
        )
        .bind(compilation_id)
        .bind(attraction_id)
        .fetch_one(pool)
        .await
        .map_err(|e| {
            log::error!("Membership check failed: {}", e);
            AttractionsError::DatabaseError(e.to_string())
        })?;

        if exists.0 {
            return Err(AttractionsError::AlreadyExists(
                "Attraction already in compilation".to_string(),
            ));
        }

        sqlx::query_as::<_, CompilationItem>(
            r#"
            INSERT INTO compilation_items (compilation_id, attraction_id, order_index, added_at)
            VALUES ($1, $2, $3, NOW())
            RETURNING *
            "#,
        )
        .bind(compilation_id)
        .bind(attraction_id)
        .bind(order_index)
        .fetch_one(pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e {
                // Lost a race against a concurrent add of the same pair
                if db_err.code().as_deref() == Some("23505") {
                    return AttractionsError::AlreadyExists(
                        "Attraction already in compilation".to_string(),
                    );
                }
            }
            log::error!(
                "Failed to add attraction {} to compilation {}: {}",
                attraction_id,
                compilation_id,
                e
            );
            AttractionsError::DatabaseError(e.to_string())
        })
    }

    /// Remove an attraction from a compilation
    /// DOCUMENTATION: Idempotent - removing an absent pair is a no-op
    pub async fn remove_item(
        pool: &PgPool,
        compilation_id: Uuid,
        attraction_id: Uuid,
    ) -> Result<u64, AttractionsError> {
        let rows = sqlx::query(
            "DELETE FROM compilation_items WHERE compilation_id = $1 AND attraction_id = $2",
        )
        .bind(compilation_id)
        .bind(attraction_id)
        .execute(pool)
        .await
        .map_err(|e| {
            log::error!(
                "Failed to remove attraction {} from compilation {}: {}",
                attraction_id,
                compilation_id,
                e
            );
            AttractionsError::DatabaseError(e.to_string())
        })?
        .rows_affected();

        Ok(rows)
    }
}
