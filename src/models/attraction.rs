// src/models/attraction.rs
// DOCUMENTATION: Core data structures for attractions
// PURPOSE: Defines all serialization/deserialization models for API and database

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

/// Represents a complete attraction record from the database
/// DOCUMENTATION: This struct maps directly to the attractions table in PostgreSQL
/// Used for internal operations and database queries
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Attraction {
    /// Unique identifier (UUID v4)
    pub id: Uuid,

    /// Google Places unique identifier (used for deduplication)
    pub place_id: String,

    /// Attraction name - required field
    pub name: String,

    /// Full formatted address from the provider
    pub formatted_address: String,

    /// Country name (required for filtering)
    pub country: String,

    /// City name
    pub city: String,

    /// Human-readable category label (e.g., "Tourist Attraction")
    pub category: String,

    /// Provider-assigned type tags (e.g., ["tourist_attraction", "museum"])
    pub types: Vec<String>,

    /// Rating from Google (0-5)
    pub rating: f32,

    /// Number of ratings on Google
    pub user_ratings_total: i32,

    /// Price level from Google (0-4: free to very expensive)
    pub price_level: Option<i32>,

    /// Geographic coordinates
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,

    /// Manually curated description - never touched by sync
    pub description: String,

    /// Website URL
    pub website: String,

    /// Phone number
    pub phone_number: String,

    /// Reference to the primary provider photo
    pub photo_reference: String,

    /// Number of photos reported by the provider
    pub photos_count: i32,

    /// Opening hours blob, stored verbatim from the provider
    pub opening_hours: Value,

    /// Provider reviews blob, stored verbatim
    pub reviews: Value,

    /// Free-form like counter
    pub likes: i32,

    /// Featured flag, derived from rating >= 4.0 at import time
    pub is_featured: bool,

    /// Full raw provider payload retained for forward-compatibility
    pub raw_data: Value,

    /// When record was created
    pub created_at: DateTime<Utc>,

    /// When record was last modified
    pub updated_at: DateTime<Utc>,
}

fn default_json_object() -> Value {
    Value::Object(serde_json::Map::new())
}

fn default_json_array() -> Value {
    Value::Array(Vec::new())
}

/// Request DTO for creating a new attraction
/// DOCUMENTATION: Data transfer object for POST /attractions endpoint
/// Also produced by the sync reconciler from provider payloads
#[derive(Debug, Serialize, Deserialize, Validate, Clone)]
pub struct CreateAttractionRequest {
    /// Google Place ID (required, unique)
    #[validate(length(min = 1, max = 255))]
    pub place_id: String,

    /// Attraction name (required)
    #[validate(length(min = 1, max = 255))]
    pub name: String,

    /// Formatted address
    #[serde(default)]
    pub formatted_address: String,

    /// Country name (required)
    #[validate(length(min = 1, max = 100))]
    pub country: String,

    /// City name
    #[serde(default)]
    pub city: String,

    /// Category label
    #[serde(default)]
    pub category: String,

    /// Provider type tags
    #[serde(default)]
    pub types: Vec<String>,

    /// Rating (0-5)
    #[serde(default)]
    pub rating: f32,

    /// Total number of ratings
    #[serde(default)]
    pub user_ratings_total: i32,

    /// Price level (0-4)
    #[serde(default)]
    pub price_level: Option<i32>,

    /// Geographic coordinates
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,

    /// Curated description
    #[serde(default)]
    pub description: String,

    /// Website URL
    #[serde(default)]
    pub website: String,

    /// Phone number
    #[serde(default)]
    pub phone_number: String,

    /// Primary photo reference
    #[serde(default)]
    pub photo_reference: String,

    /// Photo count
    #[serde(default)]
    pub photos_count: i32,

    /// Opening hours blob
    #[serde(default = "default_json_object")]
    pub opening_hours: Value,

    /// Reviews blob
    #[serde(default = "default_json_array")]
    pub reviews: Value,

    /// Like counter
    #[serde(default)]
    pub likes: i32,

    /// Featured flag; the sync path derives it from the rating
    #[serde(default)]
    pub is_featured: Option<bool>,

    /// Raw provider payload
    #[serde(default = "default_json_object")]
    pub raw_data: Value,
}

/// Request DTO for updating an existing attraction
/// DOCUMENTATION: Data transfer object for PUT /attractions/{id} endpoint
/// All fields are optional - only provided fields are updated
#[derive(Debug, Serialize, Deserialize, Default)]
pub struct UpdateAttractionRequest {
    pub name: Option<String>,
    pub formatted_address: Option<String>,
    pub country: Option<String>,
    pub city: Option<String>,
    pub category: Option<String>,
    pub types: Option<Vec<String>>,
    pub rating: Option<f32>,
    pub user_ratings_total: Option<i32>,
    pub price_level: Option<i32>,
    pub description: Option<String>,
    pub website: Option<String>,
    pub phone_number: Option<String>,
    pub opening_hours: Option<Value>,
    pub reviews: Option<Value>,
    pub likes: Option<i32>,
    pub is_featured: Option<bool>,
}

/// Search query parameters
/// DOCUMENTATION: DTO for parsing query string in /attractions/search endpoint
/// All parameters are optional and independently composable
#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    /// Free-text search over name, address and category
    pub q: Option<String>,

    /// Filter by country (case-insensitive substring)
    pub country: Option<String>,

    /// Filter by city (case-insensitive substring)
    pub city: Option<String>,

    /// Filter by category (case-insensitive substring)
    pub category: Option<String>,

    /// Minimum rating filter (inclusive)
    pub min_rating: Option<f32>,

    /// Minimum review count filter (inclusive)
    pub min_reviews: Option<i32>,

    /// Exact price level filter
    pub price_level: Option<i32>,

    /// Exact type-tag membership filter
    #[serde(rename = "type")]
    pub type_: Option<String>,

    /// Result cap (default 50)
    pub limit: Option<i64>,
}

/// Query parameters for the popular listing
#[derive(Debug, Deserialize)]
pub struct PopularQuery {
    /// Country filter (default "France")
    pub country: Option<String>,

    /// Result cap (default 20)
    pub limit: Option<i64>,
}

/// Query parameters for the plain listing
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Response DTO for API responses
/// DOCUMENTATION: Full field-for-field representation plus derived properties
#[derive(Debug, Serialize)]
pub struct AttractionResponse {
    pub id: Uuid,
    pub place_id: String,
    pub name: String,
    pub formatted_address: String,
    pub country: String,
    pub city: String,
    pub category: String,
    pub types: Vec<String>,
    pub rating: f32,
    pub user_ratings_total: i32,
    pub price_level: Option<i32>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub description: String,
    pub website: String,
    pub phone_number: String,
    pub photo_reference: String,
    pub photos_count: i32,
    pub opening_hours: Value,
    pub reviews: Value,
    pub likes: i32,
    pub is_featured: bool,
    pub raw_data: Value,

    /// Price level rendered as $ symbols
    pub price_level_display: String,

    /// Most relevant type tag for display
    pub primary_type: String,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Priority order when choosing the tag to display for an attraction
const PRIMARY_TYPE_PRIORITY: [&str; 8] = [
    "tourist_attraction",
    "museum",
    "park",
    "restaurant",
    "lodging",
    "shopping_mall",
    "amusement_park",
    "zoo",
];

/// Title-case a snake_case provider tag ("tourist_attraction" -> "Tourist Attraction")
pub fn title_case_tag(tag: &str) -> String {
    tag.split('_')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

impl Attraction {
    /// Convert numeric price level to $ symbols
    pub fn price_level_display(&self) -> String {
        match self.price_level {
            Some(level) => "$".repeat((level + 1).max(0) as usize),
            None => String::new(),
        }
    }

    /// Get the most relevant type tag for display
    /// Falls back to the category, then to a generic label
    pub fn primary_type(&self) -> String {
        if self.types.is_empty() {
            if self.category.is_empty() {
                return "attraction".to_string();
            }
            return self.category.clone();
        }

        for ptype in PRIMARY_TYPE_PRIORITY {
            if self.types.iter().any(|t| t == ptype) {
                return title_case_tag(ptype);
            }
        }

        title_case_tag(&self.types[0])
    }

    /// Convert Attraction to AttractionResponse for API
    /// DOCUMENTATION: Maps database model to API response DTO
    pub fn to_response(&self) -> AttractionResponse {
        AttractionResponse {
            id: self.id,
            place_id: self.place_id.clone(),
            name: self.name.clone(),
            formatted_address: self.formatted_address.clone(),
            country: self.country.clone(),
            city: self.city.clone(),
            category: self.category.clone(),
            types: self.types.clone(),
            rating: self.rating,
            user_ratings_total: self.user_ratings_total,
            price_level: self.price_level,
            latitude: self.latitude,
            longitude: self.longitude,
            description: self.description.clone(),
            website: self.website.clone(),
            phone_number: self.phone_number.clone(),
            photo_reference: self.photo_reference.clone(),
            photos_count: self.photos_count,
            opening_hours: self.opening_hours.clone(),
            reviews: self.reviews.clone(),
            likes: self.likes,
            is_featured: self.is_featured,
            raw_data: self.raw_data.clone(),
            price_level_display: self.price_level_display(),
            primary_type: self.primary_type(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_attraction() -> Attraction {
        Attraction {
            id: Uuid::new_v4(),
            place_id: "ChIJ123".to_string(),
            name: "Louvre Museum".to_string(),
            formatted_address: "Rue de Rivoli, 75001 Paris, France".to_string(),
            country: "France".to_string(),
            city: "Paris".to_string(),
            category: "Tourist Attraction".to_string(),
            types: vec![
                "museum".to_string(),
                "tourist_attraction".to_string(),
                "point_of_interest".to_string(),
            ],
            rating: 4.7,
            user_ratings_total: 250000,
            price_level: Some(2),
            latitude: Some(48.8606),
            longitude: Some(2.3376),
            description: String::new(),
            website: "https://www.louvre.fr".to_string(),
            phone_number: String::new(),
            photo_reference: String::new(),
            photos_count: 0,
            opening_hours: Value::Object(serde_json::Map::new()),
            reviews: Value::Array(Vec::new()),
            likes: 0,
            is_featured: true,
            raw_data: Value::Object(serde_json::Map::new()),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_price_level_display() {
        let mut attraction = sample_attraction();

        attraction.price_level = Some(0);
        assert_eq!(attraction.price_level_display(), "$");

        attraction.price_level = Some(3);
        assert_eq!(attraction.price_level_display(), "$$$$");

        attraction.price_level = None;
        assert_eq!(attraction.price_level_display(), "");
    }

    #[test]
    fn test_primary_type_priority() {
        let mut attraction = sample_attraction();
        // tourist_attraction outranks museum even though museum appears first
        assert_eq!(attraction.primary_type(), "Tourist Attraction");

        attraction.types = vec!["zoo".to_string(), "museum".to_string()];
        assert_eq!(attraction.primary_type(), "Museum");

        attraction.types = vec!["night_club".to_string()];
        assert_eq!(attraction.primary_type(), "Night Club");
    }

    #[test]
    fn test_primary_type_fallbacks() {
        let mut attraction = sample_attraction();

        attraction.types = Vec::new();
        assert_eq!(attraction.primary_type(), "Tourist Attraction");

        attraction.category = String::new();
        assert_eq!(attraction.primary_type(), "attraction");
    }

    #[test]
    fn test_create_request_defaults() {
        let req: CreateAttractionRequest = serde_json::from_value(serde_json::json!({
            "place_id": "ChIJ456",
            "name": "Eiffel Tower",
            "country": "France"
        }))
        .unwrap();

        assert_eq!(req.rating, 0.0);
        assert_eq!(req.user_ratings_total, 0);
        assert!(req.price_level.is_none());
        assert!(req.types.is_empty());
        assert!(req.opening_hours.is_object());
        assert!(req.reviews.is_array());
        assert!(req.is_featured.is_none());
    }
}
