// src/handlers/attractions.rs
// DOCUMENTATION: HTTP handlers for attraction operations
// PURPOSE: Parse requests, call services, return responses

use crate::errors::AttractionsError;
use crate::models::{
    CreateAttractionRequest, ListQuery, PopularQuery, SearchQuery, UpdateAttractionRequest,
};
use crate::services::{AttractionService, GooglePlacesClient, SyncService};
use actix_web::{web, HttpResponse, Responder};
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

/// Request body for the sync endpoint
#[derive(Debug, Deserialize)]
pub struct SyncRequest {
    /// Country to search attractions for (default "France")
    pub country: Option<String>,
    /// Number of attractions to fetch (default 20)
    pub limit: Option<usize>,
    /// Place type to search for (default "tourist_attraction")
    #[serde(rename = "type")]
    pub type_: Option<String>,
}

/// GET /attractions
/// List attractions in default ranking order
pub async fn list_attractions(
    pool: web::Data<PgPool>,
    query: web::Query<ListQuery>,
) -> Result<impl Responder, AttractionsError> {
    let attractions = AttractionService::list(pool.get_ref(), query.into_inner()).await?;
    Ok(HttpResponse::Ok().json(attractions))
}

/// POST /attractions
/// Create a new attraction
pub async fn create_attraction(
    pool: web::Data<PgPool>,
    req: web::Json<CreateAttractionRequest>,
) -> Result<impl Responder, AttractionsError> {
    // Validate request
    if let Err(e) = req.validate() {
        return Err(AttractionsError::ValidationError(e.to_string()));
    }

    let attraction = AttractionService::create(pool.get_ref(), req.into_inner()).await?;
    Ok(HttpResponse::Created().json(attraction))
}

/// GET /attractions/popular
/// Featured attractions filtered by country
pub async fn popular_attractions(
    pool: web::Data<PgPool>,
    query: web::Query<PopularQuery>,
) -> Result<impl Responder, AttractionsError> {
    let attractions = AttractionService::popular(pool.get_ref(), query.into_inner()).await?;
    Ok(HttpResponse::Ok().json(attractions))
}

/// GET /attractions/search
/// Search attractions with the composable filter set
pub async fn search_attractions(
    pool: web::Data<PgPool>,
    query: web::Query<SearchQuery>,
) -> Result<impl Responder, AttractionsError> {
    let attractions = AttractionService::search(pool.get_ref(), query.into_inner()).await?;
    Ok(HttpResponse::Ok().json(attractions))
}

/// POST /attractions/sync_from_google
/// Bulk-import attractions from the places provider
pub async fn sync_from_google(
    pool: web::Data<PgPool>,
    provider: web::Data<GooglePlacesClient>,
    body: web::Json<SyncRequest>,
) -> Result<impl Responder, AttractionsError> {
    let country = body
        .country
        .clone()
        .unwrap_or_else(|| "France".to_string());
    let limit = body.limit.unwrap_or(20);
    let place_type = body
        .type_
        .clone()
        .unwrap_or_else(|| "tourist_attraction".to_string());

    log::info!("Sync requested: country={}, limit={}", country, limit);

    let stats = SyncService::sync_from_google(
        pool.get_ref(),
        provider.get_ref(),
        &country,
        limit,
        &place_type,
    )
    .await?;

    if stats.total_found == 0 {
        return Err(AttractionsError::InvalidInput(
            "No places found".to_string(),
        ));
    }

    Ok(HttpResponse::Ok().json(stats))
}

/// GET /attractions/{id}
/// Retrieve an attraction by ID (UUID or Google Place ID)
pub async fn get_attraction(
    pool: web::Data<PgPool>,
    path: web::Path<String>,
) -> Result<impl Responder, AttractionsError> {
    let identifier = path.into_inner();
    let attraction =
        AttractionService::get_by_id_or_place_id(pool.get_ref(), &identifier).await?;
    Ok(HttpResponse::Ok().json(attraction))
}

/// PUT /attractions/{id}
/// Update an attraction
pub async fn update_attraction(
    pool: web::Data<PgPool>,
    path: web::Path<Uuid>,
    req: web::Json<UpdateAttractionRequest>,
) -> Result<impl Responder, AttractionsError> {
    let attraction =
        AttractionService::update(pool.get_ref(), path.into_inner(), req.into_inner()).await?;
    Ok(HttpResponse::Ok().json(attraction))
}

/// DELETE /attractions/{id}
/// Delete an attraction
pub async fn delete_attraction(
    pool: web::Data<PgPool>,
    path: web::Path<Uuid>,
) -> Result<impl Responder, AttractionsError> {
    AttractionService::delete(pool.get_ref(), path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Configuration for attraction routes
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/attractions")
            .route("", web::get().to(list_attractions))
            .route("", web::post().to(create_attraction))
            .route("/popular", web::get().to(popular_attractions))
            .route("/search", web::get().to(search_attractions))
            .route("/sync_from_google", web::post().to(sync_from_google))
            .route("/{id}", web::get().to(get_attraction))
            .route("/{id}", web::put().to(update_attraction))
            .route("/{id}", web::delete().to(delete_attraction)),
    );
}
