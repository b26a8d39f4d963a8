// src/handlers/compilations.rs
// DOCUMENTATION: HTTP handlers for compilation operations
// PURPOSE: Parse requests, call services, return responses

use crate::errors::AttractionsError;
use crate::models::{
    AddItemRequest, CreateCompilationRequest, RemoveItemRequest, UpdateCompilationRequest,
};
use crate::services::CompilationService;
use actix_web::{web, HttpResponse, Responder};
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

/// GET /compilations
/// List compilations, most recently updated first
pub async fn list_compilations(
    pool: web::Data<PgPool>,
) -> Result<impl Responder, AttractionsError> {
    let compilations = CompilationService::list(pool.get_ref()).await?;
    Ok(HttpResponse::Ok().json(compilations))
}

/// POST /compilations
/// Create a new compilation
pub async fn create_compilation(
    pool: web::Data<PgPool>,
    req: web::Json<CreateCompilationRequest>,
) -> Result<impl Responder, AttractionsError> {
    // Validate request
    if let Err(e) = req.validate() {
        return Err(AttractionsError::ValidationError(e.to_string()));
    }

    let compilation = CompilationService::create(pool.get_ref(), req.into_inner()).await?;
    Ok(HttpResponse::Created().json(compilation))
}

/// GET /compilations/{id}
/// Retrieve a compilation with its ordered items
pub async fn get_compilation(
    pool: web::Data<PgPool>,
    path: web::Path<Uuid>,
) -> Result<impl Responder, AttractionsError> {
    let compilation = CompilationService::get(pool.get_ref(), path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(compilation))
}

/// PUT /compilations/{id}
/// Update a compilation
pub async fn update_compilation(
    pool: web::Data<PgPool>,
    path: web::Path<Uuid>,
    req: web::Json<UpdateCompilationRequest>,
) -> Result<impl Responder, AttractionsError> {
    let compilation =
        CompilationService::update(pool.get_ref(), path.into_inner(), req.into_inner()).await?;
    Ok(HttpResponse::Ok().json(compilation))
}

/// DELETE /compilations/{id}
/// Delete a compilation (items cascade)
pub async fn delete_compilation(
    pool: web::Data<PgPool>,
    path: web::Path<Uuid>,
) -> Result<impl Responder, AttractionsError> {
    CompilationService::delete(pool.get_ref(), path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// POST /compilations/{id}/add_item
/// Add an attraction to a compilation
pub async fn add_item(
    pool: web::Data<PgPool>,
    path: web::Path<Uuid>,
    req: web::Json<AddItemRequest>,
) -> Result<impl Responder, AttractionsError> {
    let compilation =
        CompilationService::add_item(pool.get_ref(), path.into_inner(), req.into_inner()).await?;
    Ok(HttpResponse::Ok().json(compilation))
}

/// POST /compilations/{id}/remove_item
/// Remove an attraction from a compilation (no-op if absent)
pub async fn remove_item(
    pool: web::Data<PgPool>,
    path: web::Path<Uuid>,
    req: web::Json<RemoveItemRequest>,
) -> Result<impl Responder, AttractionsError> {
    let compilation =
        CompilationService::remove_item(pool.get_ref(), path.into_inner(), req.into_inner())
            .await?;
    Ok(HttpResponse::Ok().json(compilation))
}

/// Configuration for compilation routes
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/compilations")
            .route("", web::get().to(list_compilations))
            .route("", web::post().to(create_compilation))
            .route("/{id}", web::get().to(get_compilation))
            .route("/{id}", web::put().to(update_compilation))
            .route("/{id}", web::delete().to(delete_compilation))
            .route("/{id}/add_item", web::post().to(add_item))
            .route("/{id}/remove_item", web::post().to(remove_item)),
    );
}
