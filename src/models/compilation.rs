// src/models/compilation.rs
// DOCUMENTATION: Data structures for user-curated compilations
// PURPOSE: Compilation and join-entity models plus their API DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use super::{Attraction, AttractionResponse};

/// A named, user-owned ordered list of attractions
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Compilation {
    pub id: Uuid,

    /// Display name, defaults to "Ma compilation"
    pub name: String,

    /// Profile category: local, tourist or pro
    pub profile: String,

    /// Target country for the trip
    pub country: String,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Join entity linking one compilation to one attraction
/// Invariant: a (compilation, attraction) pair appears at most once
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CompilationItem {
    pub id: Uuid,
    pub compilation_id: Uuid,
    pub attraction_id: Uuid,

    /// Explicit position in the list; ordering is stable via this index,
    /// not insertion time
    pub order_index: i32,

    pub added_at: DateTime<Utc>,
}

fn default_compilation_name() -> String {
    "Ma compilation".to_string()
}

fn default_profile() -> String {
    "tourist".to_string()
}

/// Request DTO for creating a compilation
#[derive(Debug, Serialize, Deserialize, Validate, Clone)]
pub struct CreateCompilationRequest {
    #[serde(default = "default_compilation_name")]
    #[validate(length(min = 1, max = 120))]
    pub name: String,

    #[serde(default = "default_profile")]
    #[validate(length(min = 1, max = 20))]
    pub profile: String,

    #[validate(length(min = 1, max = 100))]
    pub country: String,
}

/// Request DTO for updating a compilation
#[derive(Debug, Serialize, Deserialize, Default)]
pub struct UpdateCompilationRequest {
    pub name: Option<String>,
    pub profile: Option<String>,
    pub country: Option<String>,
}

/// Body for POST /compilations/{id}/add_item
#[derive(Debug, Deserialize)]
pub struct AddItemRequest {
    pub attraction_id: Uuid,

    #[serde(default)]
    pub order_index: i32,
}

/// Body for POST /compilations/{id}/remove_item
#[derive(Debug, Deserialize)]
pub struct RemoveItemRequest {
    pub attraction_id: Uuid,
}

/// One member of a compilation with its attraction expanded
#[derive(Debug, Serialize)]
pub struct CompilationItemResponse {
    pub id: Uuid,
    pub order_index: i32,
    pub added_at: DateTime<Utc>,
    pub attraction: AttractionResponse,
}

/// Full compilation view returned by the API
/// DOCUMENTATION: Items are ordered by order_index; total_budget is derived
/// from the members' price levels
#[derive(Debug, Serialize)]
pub struct CompilationResponse {
    pub id: Uuid,
    pub name: String,
    pub profile: String,
    pub country: String,
    pub items: Vec<CompilationItemResponse>,
    pub total_budget: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Total budget = sum of (price level + 1) across members with a known level
pub fn total_budget<'a, I>(attractions: I) -> i32
where
    I: IntoIterator<Item = &'a Attraction>,
{
    attractions
        .into_iter()
        .filter_map(|a| a.price_level)
        .map(|level| level + 1)
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    fn attraction_with_price(price_level: Option<i32>) -> Attraction {
        Attraction {
            id: Uuid::new_v4(),
            place_id: Uuid::new_v4().to_string(),
            name: "Test".to_string(),
            formatted_address: String::new(),
            country: "France".to_string(),
            city: String::new(),
            category: String::new(),
            types: Vec::new(),
            rating: 0.0,
            user_ratings_total: 0,
            price_level,
            latitude: None,
            longitude: None,
            description: String::new(),
            website: String::new(),
            phone_number: String::new(),
            photo_reference: String::new(),
            photos_count: 0,
            opening_hours: Value::Object(serde_json::Map::new()),
            reviews: Value::Array(Vec::new()),
            likes: 0,
            is_featured: false,
            raw_data: Value::Object(serde_json::Map::new()),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_total_budget() {
        let members = vec![
            attraction_with_price(Some(0)),
            attraction_with_price(Some(3)),
            attraction_with_price(None),
        ];

        // (0 + 1) + (3 + 1); unknown price levels contribute nothing
        assert_eq!(total_budget(&members), 5);
    }

    #[test]
    fn test_total_budget_empty() {
        assert_eq!(total_budget(&[]), 0);
    }

    #[test]
    fn test_create_request_defaults() {
        let req: CreateCompilationRequest =
            serde_json::from_value(serde_json::json!({ "country": "France" })).unwrap();

        assert_eq!(req.name, "Ma compilation");
        assert_eq!(req.profile, "tourist");
    }
}
