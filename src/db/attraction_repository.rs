// src/db/attraction_repository.rs
// DOCUMENTATION: Database access layer for attractions - all SQL queries
// PURPOSE: Abstract database operations from business logic

use crate::errors::AttractionsError;
use crate::models::{Attraction, CreateAttractionRequest, SearchQuery, UpdateAttractionRequest};
use sqlx::PgPool;
use uuid::Uuid;

/// Default ranking applied whenever no explicit ordering is requested
const DEFAULT_ORDER: &str = "ORDER BY likes DESC, rating DESC, user_ratings_total DESC";

/// Map a sqlx error, translating unique violations on place_id
fn map_db_error(context: &str, e: sqlx::Error) -> AttractionsError {
    if let sqlx::Error::Database(ref db_err) = e {
        if db_err.code().as_deref() == Some("23505") {
            return AttractionsError::AlreadyExists(context.to_string());
        }
    }
    log::error!("{}: {}", context, e);
    AttractionsError::DatabaseError(e.to_string())
}

/// Build the WHERE/LIMIT portion of the search query from the filter set
/// DOCUMENTATION: All filters are optional and AND-combined; the free-text
/// filter is OR-combined over name, address and category. Absence of a
/// parameter means no constraint.
fn build_search_sql(query: &SearchQuery) -> String {
    let mut where_clauses: Vec<String> = Vec::new();

    if let Some(q) = query.q.as_deref().filter(|q| !q.is_empty()) {
        let escaped = q.replace('\'', "''");
        where_clauses.push(format!(
            "(name ILIKE '%{0}%' OR formatted_address ILIKE '%{0}%' OR category ILIKE '%{0}%')",
            escaped
        ));
    }

    if let Some(country) = query.country.as_deref().filter(|c| !c.is_empty()) {
        where_clauses.push(format!("country ILIKE '%{}%'", country.replace('\'', "''")));
    }

    if let Some(city) = query.city.as_deref().filter(|c| !c.is_empty()) {
        where_clauses.push(format!("city ILIKE '%{}%'", city.replace('\'', "''")));
    }

    if let Some(category) = query.category.as_deref().filter(|c| !c.is_empty()) {
        where_clauses.push(format!(
            "category ILIKE '%{}%'",
            category.replace('\'', "''")
        ));
    }

    if let Some(min_rating) = query.min_rating {
        where_clauses.push(format!("rating >= {}", min_rating));
    }

    if let Some(min_reviews) = query.min_reviews {
        where_clauses.push(format!("user_ratings_total >= {}", min_reviews));
    }

    if let Some(price_level) = query.price_level {
        where_clauses.push(format!("price_level = {}", price_level));
    }

    if let Some(type_) = query.type_.as_deref().filter(|t| !t.is_empty()) {
        where_clauses.push(format!("'{}' = ANY(types)", type_.replace('\'', "''")));
    }

    let where_clause = if where_clauses.is_empty() {
        String::new()
    } else {
        format!("WHERE {} ", where_clauses.join(" AND "))
    };

    let limit = query.limit.unwrap_or(50).max(1);

    format!(
        "SELECT * FROM attractions {}{} LIMIT {}",
        where_clause, DEFAULT_ORDER, limit
    )
}

/// AttractionRepository: All database operations for attractions
/// DOCUMENTATION: Uses query_as for type-safe SQL queries
pub struct AttractionRepository;

impl AttractionRepository {
    /// Create new attraction in database
    /// DOCUMENTATION: Inserts attraction and returns created record
    /// Used by POST /attractions endpoint
    pub async fn create(
        pool: &PgPool,
        req: &CreateAttractionRequest,
    ) -> Result<Attraction, AttractionsError> {
        let attraction = sqlx::query_as::<_, Attraction>(
            r#"
            INSERT INTO attractions (
                place_id, name, formatted_address, country, city,
                category, types, rating, user_ratings_total, price_level,
                latitude, longitude, description, website, phone_number,
                photo_reference, photos_count, opening_hours, reviews,
                likes, is_featured, raw_data,
                created_at, updated_at
            )
            VALUES (
                $1, $2, $3, $4, $5,
                $6, $7, $8, $9, $10,
                $11, $12, $13, $14, $15,
                $16, $17, $18, $19,
                $20, $21, $22,
                NOW(), NOW()
            )
            RETURNING *
            "#,
        )
        .bind(&req.place_id) // $1
        .bind(&req.name) // $2
        .bind(&req.formatted_address) // $3
        .bind(&req.country) // $4
        .bind(&req.city) // $5
        .bind(&req.category) // $6
        .bind(&req.types) // $7
        .bind(req.rating) // $8
        .bind(req.user_ratings_total) // $9
        .bind(req.price_level) // $10
        .bind(req.latitude) // $11
        .bind(req.longitude) // $12
        .bind(&req.description) // $13
        .bind(&req.website) // $14
        .bind(&req.phone_number) // $15
        .bind(&req.photo_reference) // $16
        .bind(req.photos_count) // $17
        .bind(&req.opening_hours) // $18
        .bind(&req.reviews) // $19
        .bind(req.likes) // $20
        .bind(req.is_featured.unwrap_or(false)) // $21
        .bind(&req.raw_data) // $22
        .fetch_one(pool)
        .await
        .map_err(|e| {
            map_db_error(
                &format!("attraction with place_id '{}'", req.place_id),
                e,
            )
        })?;

        log::info!("Created attraction with id: {}", attraction.id);
        Ok(attraction)
    }

    /// Upsert an attraction identified by Google Place ID
    /// DOCUMENTATION: Create-if-absent, else update only the volatile fields
    /// (name, rating, user_ratings_total, price_level, raw_data) so that
    /// manually edited fields survive re-sync
    /// Returns the record and whether it was created
    pub async fn upsert_from_sync(
        pool: &PgPool,
        req: &CreateAttractionRequest,
    ) -> Result<(Attraction, bool), AttractionsError> {
        // Try insert first - on conflict do nothing so we can detect creation
        let inserted = sqlx::query_as::<_, Attraction>(
            r#"
            INSERT INTO attractions (
                place_id, name, formatted_address, country, city,
                category, types, rating, user_ratings_total, price_level,
                latitude, longitude, description, website, phone_number,
                photo_reference, photos_count, opening_hours, reviews,
                likes, is_featured, raw_data,
                created_at, updated_at
            )
            VALUES (
                $1, $2, $3, $4, $5,
                $6, $7, $8, $9, $10,
                $11, $12, $13, $14, $15,
                $16, $17, $18, $19,
                $20, $21, $22,
                NOW(), NOW()
            )
            ON CONFLICT (place_id) DO NOTHING
            RETURNING *
            "#,
        )
        .bind(&req.place_id)
        .bind(&req.name)
        .bind(&req.formatted_address)
        .bind(&req.country)
        .bind(&req.city)
        .bind(&req.category)
        .bind(&req.types)
        .bind(req.rating)
        .bind(req.user_ratings_total)
        .bind(req.price_level)
        .bind(req.latitude)
        .bind(req.longitude)
        .bind(&req.description)
        .bind(&req.website)
        .bind(&req.phone_number)
        .bind(&req.photo_reference)
        .bind(req.photos_count)
        .bind(&req.opening_hours)
        .bind(&req.reviews)
        .bind(req.likes)
        .bind(req.is_featured.unwrap_or(false))
        .bind(&req.raw_data)
        .fetch_optional(pool)
        .await
        .map_err(|e| {
            log::error!("Failed to upsert attraction {}: {}", req.place_id, e);
            AttractionsError::DatabaseError(e.to_string())
        })?;

        if let Some(attraction) = inserted {
            return Ok((attraction, true));
        }

        // Update existing record - volatile fields only
        let updated = sqlx::query_as::<_, Attraction>(
            r#"
            UPDATE attractions
            SET name = $1,
                rating = $2,
                user_ratings_total = $3,
                price_level = $4,
                raw_data = $5,
                updated_at = NOW()
            WHERE place_id = $6
            RETURNING *
            "#,
        )
        .bind(&req.name)
        .bind(req.rating)
        .bind(req.user_ratings_total)
        .bind(req.price_level)
        .bind(&req.raw_data)
        .bind(&req.place_id)
        .fetch_one(pool)
        .await
        .map_err(|e| {
            log::error!("Failed to update attraction {}: {}", req.place_id, e);
            AttractionsError::DatabaseError(e.to_string())
        })?;

        Ok((updated, false))
    }

    /// Retrieve attraction by ID
    /// DOCUMENTATION: Used for GET /attractions/{id} endpoint
    pub async fn get_by_id(pool: &PgPool, id: Uuid) -> Result<Attraction, AttractionsError> {
        sqlx::query_as::<_, Attraction>("SELECT * FROM attractions WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(|e| {
                log::error!("Database error fetching attraction: {}", e);
                AttractionsError::DatabaseError(e.to_string())
            })?
            .ok_or_else(|| {
                log::warn!("Attraction not found: {}", id);
                AttractionsError::NotFound(format!("Attraction {}", id))
            })
    }

    /// Retrieve attraction by Google Place ID
    pub async fn get_by_place_id(
        pool: &PgPool,
        place_id: &str,
    ) -> Result<Option<Attraction>, AttractionsError> {
        sqlx::query_as::<_, Attraction>("SELECT * FROM attractions WHERE place_id = $1")
            .bind(place_id)
            .fetch_optional(pool)
            .await
            .map_err(|e| {
                log::error!("Failed to get attraction by place_id {}: {}", place_id, e);
                AttractionsError::DatabaseError(e.to_string())
            })
    }

    /// List attractions in default ranking order
    /// DOCUMENTATION: Used for GET /attractions endpoint
    pub async fn list(
        pool: &PgPool,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Attraction>, AttractionsError> {
        let sql = format!(
            "SELECT * FROM attractions {} LIMIT $1 OFFSET $2",
            DEFAULT_ORDER
        );

        sqlx::query_as::<_, Attraction>(&sql)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
            .map_err(|e| {
                log::error!("List query error: {}", e);
                AttractionsError::DatabaseError(e.to_string())
            })
    }

    /// Featured attractions for a country, best ranked first
    /// DOCUMENTATION: Used for GET /attractions/popular endpoint
    /// Country matching is a case-insensitive substring match
    pub async fn popular(
        pool: &PgPool,
        country: &str,
        limit: i64,
    ) -> Result<Vec<Attraction>, AttractionsError> {
        let sql = format!(
            "SELECT * FROM attractions WHERE is_featured = true AND country ILIKE '%' || $1 || '%' {} LIMIT $2",
            DEFAULT_ORDER
        );

        sqlx::query_as::<_, Attraction>(&sql)
            .bind(country)
            .bind(limit)
            .fetch_all(pool)
            .await
            .map_err(|e| {
                log::error!("Popular query error: {}", e);
                AttractionsError::DatabaseError(e.to_string())
            })
    }

    /// Search attractions with the composable filter set
    /// DOCUMENTATION: Used for GET /attractions/search endpoint
    pub async fn search(
        pool: &PgPool,
        query: &SearchQuery,
    ) -> Result<Vec<Attraction>, AttractionsError> {
        let sql = build_search_sql(query);

        log::debug!("Executing search query: {}", sql);

        let attractions = sqlx::query_as::<_, Attraction>(&sql)
            .fetch_all(pool)
            .await
            .map_err(|e| {
                log::error!("Search query error: {}", e);
                AttractionsError::DatabaseError(e.to_string())
            })?;

        log::info!("Search completed: {} results", attractions.len());
        Ok(attractions)
    }

    /// Update existing attraction
    /// DOCUMENTATION: Partial update - only provided fields are modified
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        req: &UpdateAttractionRequest,
    ) -> Result<Attraction, AttractionsError> {
        // Verify attraction exists
        let _ = Self::get_by_id(pool, id).await?;

        let attraction = sqlx::query_as::<_, Attraction>(
            r#"
            UPDATE attractions
            SET name = COALESCE($1, name),
                formatted_address = COALESCE($2, formatted_address),
                country = COALESCE($3, country),
                city = COALESCE($4, city),
                category = COALESCE($5, category),
                types = COALESCE($6, types),
                rating = COALESCE($7, rating),
                user_ratings_total = COALESCE($8, user_ratings_total),
                price_level = COALESCE($9, price_level),
                description = COALESCE($10, description),
                website = COALESCE($11, website),
                phone_number = COALESCE($12, phone_number),
                opening_hours = COALESCE($13, opening_hours),
                reviews = COALESCE($14, reviews),
                likes = COALESCE($15, likes),
                is_featured = COALESCE($16, is_featured),
                updated_at = NOW()
            WHERE id = $17
            RETURNING *
            "#,
        )
        .bind(&req.name)
        .bind(&req.formatted_address)
        .bind(&req.country)
        .bind(&req.city)
        .bind(&req.category)
        .bind(&req.types)
        .bind(req.rating)
        .bind(req.user_ratings_total)
        .bind(req.price_level)
        .bind(&req.description)
        .bind(&req.website)
        .bind(&req.phone_number)
        .bind(&req.opening_hours)
        .bind(&req.reviews)
        .bind(req.likes)
        .bind(req.is_featured)
        .bind(id)
        .fetch_one(pool)
        .await
        .map_err(|e| {
            log::error!("Update failed for attraction {}: {}", id, e);
            AttractionsError::DatabaseError(e.to_string())
        })?;

        log::info!("Updated attraction: {}", id);
        Ok(attraction)
    }

    /// Delete attraction
    /// DOCUMENTATION: Hard delete; compilation items referencing it are
    /// cascade-deleted by the foreign key
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<(), AttractionsError> {
        let rows = sqlx::query("DELETE FROM attractions WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await
            .map_err(|e| {
                log::error!("Delete failed for attraction {}: {}", id, e);
                AttractionsError::DatabaseError(e.to_string())
            })?
            .rows_affected();

        if rows == 0 {
            return Err(AttractionsError::NotFound(format!("Attraction {}", id)));
        }

        log::info!("Deleted attraction: {}", id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_search_sql_no_filters() {
        let sql = build_search_sql(&SearchQuery::default());

        assert!(!sql.contains("WHERE"));
        assert!(sql.contains("ORDER BY likes DESC, rating DESC, user_ratings_total DESC"));
        assert!(sql.ends_with("LIMIT 50"));
    }

    #[test]
    fn test_build_search_sql_text_filter_is_or_combined() {
        let query = SearchQuery {
            q: Some("louvre".to_string()),
            ..Default::default()
        };
        let sql = build_search_sql(&query);

        assert!(sql.contains(
            "(name ILIKE '%louvre%' OR formatted_address ILIKE '%louvre%' OR category ILIKE '%louvre%')"
        ));
    }

    #[test]
    fn test_build_search_sql_filters_are_and_combined() {
        let query = SearchQuery {
            q: Some("tower".to_string()),
            country: Some("France".to_string()),
            min_rating: Some(4.5),
            min_reviews: Some(1000),
            price_level: Some(2),
            type_: Some("museum".to_string()),
            limit: Some(10),
            ..Default::default()
        };
        let sql = build_search_sql(&query);

        assert!(sql.contains("country ILIKE '%France%'"));
        assert!(sql.contains("rating >= 4.5"));
        assert!(sql.contains("user_ratings_total >= 1000"));
        assert!(sql.contains("price_level = 2"));
        assert!(sql.contains("'museum' = ANY(types)"));
        assert!(sql.contains(" AND "));
        assert!(sql.ends_with("LIMIT 10"));
    }

    #[test]
    fn test_build_search_sql_escapes_quotes() {
        let query = SearchQuery {
            q: Some("l'aquarium".to_string()),
            ..Default::default()
        };
        let sql = build_search_sql(&query);

        assert!(sql.contains("l''aquarium"));
        assert!(!sql.contains("l'aquarium"));
    }

    #[test]
    fn test_build_search_sql_empty_strings_are_no_constraint() {
        let query = SearchQuery {
            q: Some(String::new()),
            country: Some(String::new()),
            ..Default::default()
        };
        let sql = build_search_sql(&query);

        assert!(!sql.contains("WHERE"));
    }

    #[test]
    fn test_build_search_sql_limit_floor() {
        let query = SearchQuery {
            limit: Some(0),
            ..Default::default()
        };
        let sql = build_search_sql(&query);

        assert!(sql.ends_with("LIMIT 1"));
    }
}
