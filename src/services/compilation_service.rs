// src/services/compilation_service.rs
// DOCUMENTATION: Business logic for compilations
// PURPOSE: Membership management and assembly of the nested compilation view

use crate::db::{AttractionRepository, CompilationRepository};
use crate::errors::AttractionsError;
use crate::models::{
    total_budget, AddItemRequest, Compilation, CompilationItemResponse, CompilationResponse,
    CreateCompilationRequest, RemoveItemRequest, UpdateCompilationRequest,
};
use sqlx::PgPool;
use uuid::Uuid;

pub struct CompilationService;

impl CompilationService {
    /// Create a new compilation
    pub async fn create(
        pool: &PgPool,
        req: CreateCompilationRequest,
    ) -> Result<CompilationResponse, AttractionsError> {
        let compilation = CompilationRepository::create(pool, &req).await?;
        Self::assemble_view(pool, compilation).await
    }

    /// Get a compilation with its ordered items
    pub async fn get(pool: &PgPool, id: Uuid) -> Result<CompilationResponse, AttractionsError> {
        let compilation = CompilationRepository::get_by_id(pool, id).await?;
        Self::assemble_view(pool, compilation).await
    }

    /// List compilations, most recently updated first
    pub async fn list(pool: &PgPool) -> Result<Vec<CompilationResponse>, AttractionsError> {
        let compilations = CompilationRepository::list(pool).await?;

        let mut responses = Vec::with_capacity(compilations.len());
        for compilation in compilations {
            responses.push(Self::assemble_view(pool, compilation).await?);
        }

        Ok(responses)
    }

    /// Update a compilation
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        req: UpdateCompilationRequest,
    ) -> Result<CompilationResponse, AttractionsError> {
        let compilation = CompilationRepository::update(pool, id, &req).await?;
        Self::assemble_view(pool, compilation).await
    }

    /// Delete a compilation (items cascade)
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<(), AttractionsError> {
        CompilationRepository::delete(pool, id).await
    }

    /// Add an attraction to a compilation
    /// DOCUMENTATION: Fails with NotFound if either entity is absent and
    /// with a conflict if the pair already exists
    pub async fn add_item(
        pool: &PgPool,
        compilation_id: Uuid,
        req: AddItemRequest,
    ) -> Result<CompilationResponse, AttractionsError> {
        let compilation = CompilationRepository::get_by_id(pool, compilation_id).await?;
        let attraction = AttractionRepository::get_by_id(pool, req.attraction_id).await?;

        CompilationRepository::add_item(pool, compilation.id, attraction.id, req.order_index)
            .await?;

        log::info!(
            "Added attraction {} to compilation {}",
            attraction.id,
            compilation.id
        );

        Self::assemble_view(pool, compilation).await
    }

    /// Remove an attraction from a compilation
    /// DOCUMENTATION: Idempotent - removing an absent pair is a no-op
    pub async fn remove_item(
        pool: &PgPool,
        compilation_id: Uuid,
        req: RemoveItemRequest,
    ) -> Result<CompilationResponse, AttractionsError> {
        let compilation = CompilationRepository::get_by_id(pool, compilation_id).await?;

        let removed =
            CompilationRepository::remove_item(pool, compilation.id, req.attraction_id).await?;

        if removed > 0 {
            log::info!(
                "Removed attraction {} from compilation {}",
                req.attraction_id,
                compilation.id
            );
        }

        Self::assemble_view(pool, compilation).await
    }

    /// Build the full compilation view: ordered items plus derived budget
    async fn assemble_view(
        pool: &PgPool,
        compilation: Compilation,
    ) -> Result<CompilationResponse, AttractionsError> {
        let rows = CompilationRepository::items_with_attractions(pool, compilation.id).await?;

        let budget = total_budget(rows.iter().map(|row| &row.attraction));

        let items = rows
            .into_iter()
            .map(|row| CompilationItemResponse {
                id: row.item_id,
                order_index: row.order_index,
                added_at: row.added_at,
                attraction: row.attraction.to_response(),
            })
            .collect();

        Ok(CompilationResponse {
            id: compilation.id,
            name: compilation.name,
            profile: compilation.profile,
            country: compilation.country,
            items,
            total_budget: budget,
            created_at: compilation.created_at,
            updated_at: compilation.updated_at,
        })
    }
}
