// src/services/attraction_service.rs
// DOCUMENTATION: Business logic for attractions
// PURPOSE: Intermediary between handlers and repository, handles extra logic

use crate::db::AttractionRepository;
use crate::errors::AttractionsError;
use crate::models::{
    AttractionResponse, CreateAttractionRequest, ListQuery, PopularQuery, SearchQuery,
    UpdateAttractionRequest,
};
use sqlx::PgPool;
use uuid::Uuid;

/// Default country for the popular listing
const DEFAULT_POPULAR_COUNTRY: &str = "France";

/// Default result cap for the popular listing
const DEFAULT_POPULAR_LIMIT: i64 = 20;

pub struct AttractionService;

impl AttractionService {
    /// Create a new attraction
    pub async fn create(
        pool: &PgPool,
        req: CreateAttractionRequest,
    ) -> Result<AttractionResponse, AttractionsError> {
        let attraction = AttractionRepository::create(pool, &req).await?;
        Ok(attraction.to_response())
    }

    /// Get an attraction by ID (UUID or Google Place ID)
    pub async fn get_by_id_or_place_id(
        pool: &PgPool,
        identifier: &str,
    ) -> Result<AttractionResponse, AttractionsError> {
        // Try to parse as UUID first
        let attraction = if let Ok(uuid) = Uuid::parse_str(identifier) {
            AttractionRepository::get_by_id(pool, uuid).await?
        } else {
            // If not a UUID, treat as Google Place ID
            AttractionRepository::get_by_place_id(pool, identifier)
                .await?
                .ok_or_else(|| {
                    AttractionsError::NotFound(format!(
                        "Attraction with place_id '{}'",
                        identifier
                    ))
                })?
        };

        Ok(attraction.to_response())
    }

    /// List attractions in default ranking order
    pub async fn list(
        pool: &PgPool,
        query: ListQuery,
    ) -> Result<Vec<AttractionResponse>, AttractionsError> {
        let limit = query.limit.unwrap_or(100).max(1);
        let offset = query.offset.unwrap_or(0).max(0);

        let attractions = AttractionRepository::list(pool, limit, offset).await?;
        Ok(attractions.iter().map(|a| a.to_response()).collect())
    }

    /// Featured attractions for a country
    /// DOCUMENTATION: Country matching is a case-insensitive substring;
    /// results keep the default ranking
    pub async fn popular(
        pool: &PgPool,
        query: PopularQuery,
    ) -> Result<Vec<AttractionResponse>, AttractionsError> {
        let country = query
            .country
            .unwrap_or_else(|| DEFAULT_POPULAR_COUNTRY.to_string());
        let limit = query.limit.unwrap_or(DEFAULT_POPULAR_LIMIT).max(1);

        let attractions = AttractionRepository::popular(pool, &country, limit).await?;
        Ok(attractions.iter().map(|a| a.to_response()).collect())
    }

    /// Search attractions with the composable filter set
    pub async fn search(
        pool: &PgPool,
        query: SearchQuery,
    ) -> Result<Vec<AttractionResponse>, AttractionsError> {
        let attractions = AttractionRepository::search(pool, &query).await?;
        Ok(attractions.iter().map(|a| a.to_response()).collect())
    }

    /// Update an attraction
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        req: UpdateAttractionRequest,
    ) -> Result<AttractionResponse, AttractionsError> {
        let attraction = AttractionRepository::update(pool, id, &req).await?;
        Ok(attraction.to_response())
    }

    /// Delete an attraction
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<(), AttractionsError> {
        AttractionRepository::delete(pool, id).await
    }
}
