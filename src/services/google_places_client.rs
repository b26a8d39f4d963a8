// src/services/google_places_client.rs
// DOCUMENTATION: Google Places API client
// PURPOSE: Handle communication with Google Places API for attraction data retrieval

use crate::errors::AttractionsError;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Default field list for Place Details requests
/// Address components are always requested so the reconciler can extract
/// a country/city pair
const DEFAULT_DETAILS_FIELDS: [&str; 14] = [
    "place_id",
    "name",
    "formatted_address",
    "address_components",
    "geometry",
    "rating",
    "user_ratings_total",
    "price_level",
    "types",
    "opening_hours",
    "photos",
    "reviews",
    "website",
    "formatted_phone_number",
];

/// Outbound places-search contract
/// DOCUMENTATION: The three operations the catalog consumes from the provider.
/// Implementations catch every provider failure and return an empty
/// collection or None - errors never propagate past this boundary.
#[async_trait]
pub trait PlacesProvider: Send + Sync {
    /// Text search for tourist attractions in a country, capped at `limit`
    async fn search_by_country(&self, country: &str, limit: usize) -> Vec<GooglePlace>;

    /// Nearby search around a coordinate
    async fn search_nearby(
        &self,
        latitude: f64,
        longitude: f64,
        radius_m: u32,
        place_type: Option<&str>,
    ) -> Vec<GooglePlace>;

    /// Full details for one place; None when the lookup fails
    async fn get_details(&self, place_id: &str, fields: Option<&[&str]>) -> Option<PlaceDetails>;
}

/// Google Places API client
/// DOCUMENTATION: Handles authentication and API calls to Google Places
pub struct GooglePlacesClient {
    /// HTTP client for making requests
    client: Client,
    /// Google Places API key
    api_key: String,
    /// Base URL for Google Places API
    base_url: String,
}

/// Response from Google Places search endpoints
#[derive(Debug, Deserialize, Serialize)]
pub struct GooglePlacesResponse {
    /// Results array from API
    #[serde(default)]
    pub results: Vec<GooglePlace>,
    /// Status of the API call
    pub status: String,
    /// Next page token (if more results available)
    pub next_page_token: Option<String>,
    /// Error message (if status is not OK)
    pub error_message: Option<String>,
}

/// Individual place from Google Places API
/// DOCUMENTATION: Only the attributes the catalog consumes are typed;
/// opening hours and reviews stay opaque and round-trip through raw_data
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GooglePlace {
    /// Google's unique place identifier; absent on malformed results,
    /// which the reconciler skips
    pub place_id: Option<String>,
    /// Place name
    pub name: Option<String>,
    /// Place types array (e.g., ["tourist_attraction", "museum"])
    #[serde(default)]
    pub types: Vec<String>,
    /// Geographic location
    pub geometry: Option<GoogleGeometry>,
    /// Formatted address
    pub formatted_address: Option<String>,
    /// Address components (country, locality, etc.)
    pub address_components: Option<Vec<GoogleAddressComponent>>,
    /// Rating (0-5)
    pub rating: Option<f32>,
    /// Number of user ratings
    pub user_ratings_total: Option<i32>,
    /// Price level (0-4: free to very expensive)
    pub price_level: Option<i32>,
    /// Opening hours blob, kept verbatim
    pub opening_hours: Option<Value>,
    /// User reviews blob, kept verbatim
    pub reviews: Option<Value>,
    /// Photos (only the reference is consumed)
    pub photos: Option<Vec<GooglePhoto>>,
    /// Website URL
    pub website: Option<String>,
    /// Phone number (formatted for local use)
    pub formatted_phone_number: Option<String>,
}

/// Geographic location from Google
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GoogleGeometry {
    /// Location coordinates
    pub location: Option<GoogleLocation>,
}

/// Coordinates from Google
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GoogleLocation {
    /// Latitude
    pub lat: f64,
    /// Longitude
    pub lng: f64,
}

/// Address component from Google Places
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GoogleAddressComponent {
    /// Long name (e.g., "France", "Paris")
    pub long_name: String,
    /// Short name (e.g., "FR", "Paris")
    pub short_name: String,
    /// Types of this component (e.g., ["locality", "political"])
    #[serde(default)]
    pub types: Vec<String>,
}

/// Photo from Google Places
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GooglePhoto {
    /// Photo reference (used to fetch actual photo)
    pub photo_reference: String,
    /// Photo width in pixels
    pub width: Option<i32>,
    /// Photo height in pixels
    pub height: Option<i32>,
}

/// Place Details result: parsed fields plus the verbatim payload
/// DOCUMENTATION: `raw` is stored as-is on the attraction for
/// forward-compatibility
#[derive(Debug, Clone)]
pub struct PlaceDetails {
    pub place: GooglePlace,
    pub raw: Value,
}

impl GooglePlacesClient {
    /// Create new Google Places API client
    /// DOCUMENTATION: Initializes client with API key; a missing key is
    /// tolerated and makes every lookup return empty
    pub fn new(api_key: String) -> Self {
        if api_key.is_empty() {
            log::warn!("Google Places API key not configured");
        }

        Self {
            client: Client::new(),
            api_key,
            base_url: "https://maps.googleapis.com/maps/api/place".to_string(),
        }
    }

    fn is_configured(&self) -> bool {
        !self.api_key.is_empty()
    }

    /// Perform text search for attractions in a country
    ///
    /// # Arguments
    /// * `country` - Country name to search in
    /// * `limit` - Maximum number of results to return
    async fn try_search_by_country(
        &self,
        country: &str,
        limit: usize,
    ) -> Result<Vec<GooglePlace>, AttractionsError> {
        let url = format!("{}/textsearch/json", self.base_url);

        let mut params = HashMap::new();
        params.insert("query", format!("tourist attractions in {}", country));
        params.insert("type", "tourist_attraction".to_string());
        params.insert("key", self.api_key.clone());

        log::debug!("Google Places text search: country={}", country);

        let response = self
            .client
            .get(&url)
            .query(&params)
            .send()
            .await
            .map_err(|e| {
                AttractionsError::ExternalApiError(format!("Request failed: {}", e))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AttractionsError::ExternalApiError(format!(
                "API error {}: {}",
                status, body
            )));
        }

        let api_response: GooglePlacesResponse = response.json().await.map_err(|e| {
            AttractionsError::ExternalApiError(format!("Parse error: {}", e))
        })?;

        match api_response.status.as_str() {
            "OK" | "ZERO_RESULTS" => {
                log::info!(
                    "Google Places country search returned {} results",
                    api_response.results.len()
                );
                let mut results = api_response.results;
                results.truncate(limit);
                Ok(results)
            }
            other => {
                let msg = api_response
                    .error_message
                    .unwrap_or_else(|| format!("Unexpected status: {}", other));
                Err(AttractionsError::ExternalApiError(msg))
            }
        }
    }

    /// Perform nearby search for places around a coordinate
    ///
    /// # Arguments
    /// * `latitude` - Center point latitude
    /// * `longitude` - Center point longitude
    /// * `radius_m` - Search radius in meters (max 50000)
    /// * `place_type` - Optional type filter (e.g., "restaurant", "lodging")
    async fn try_search_nearby(
        &self,
        latitude: f64,
        longitude: f64,
        radius_m: u32,
        place_type: Option<&str>,
    ) -> Result<Vec<GooglePlace>, AttractionsError> {
        let url = format!("{}/nearbysearch/json", self.base_url);

        let mut params = HashMap::new();
        params.insert("location", format!("{},{}", latitude, longitude));
        params.insert("radius", radius_m.to_string());
        params.insert("key", self.api_key.clone());

        if let Some(pt) = place_type {
            params.insert("type", pt.to_string());
        }

        log::debug!(
            "Google Places nearby search: lat={}, lng={}, radius={}",
            latitude,
            longitude,
            radius_m
        );

        let response = self
            .client
            .get(&url)
            .query(&params)
            .send()
            .await
            .map_err(|e| {
                AttractionsError::ExternalApiError(format!("Request failed: {}", e))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AttractionsError::ExternalApiError(format!(
                "API error {}: {}",
                status, body
            )));
        }

        let api_response: GooglePlacesResponse = response.json().await.map_err(|e| {
            AttractionsError::ExternalApiError(format!("Parse error: {}", e))
        })?;

        match api_response.status.as_str() {
            "OK" | "ZERO_RESULTS" => Ok(api_response.results),
            other => {
                let msg = api_response
                    .error_message
                    .unwrap_or_else(|| format!("Unexpected status: {}", other));
                Err(AttractionsError::ExternalApiError(msg))
            }
        }
    }

    /// Get detailed information about a specific place
    ///
    /// # Arguments
    /// * `place_id` - Google Place ID
    /// * `fields` - Fields to request; defaults to DEFAULT_DETAILS_FIELDS
    ///
    /// # Returns
    /// Parsed details plus the verbatim result payload
    async fn try_get_details(
        &self,
        place_id: &str,
        fields: Option<&[&str]>,
    ) -> Result<PlaceDetails, AttractionsError> {
        let url = format!("{}/details/json", self.base_url);

        let fields_param = fields
            .unwrap_or(&DEFAULT_DETAILS_FIELDS)
            .join(",");

        let params = [
            ("place_id", place_id),
            ("fields", fields_param.as_str()),
            ("key", &self.api_key),
        ];

        log::debug!("Google Places details lookup: place_id={}", place_id);

        let response = self
            .client
            .get(&url)
            .query(&params)
            .send()
            .await
            .map_err(|e| {
                AttractionsError::ExternalApiError(format!("Request failed: {}", e))
            })?;

        if !response.status().is_success() {
            return Err(AttractionsError::ExternalApiError(
                "Details request failed".to_string(),
            ));
        }

        #[derive(Deserialize)]
        struct DetailsResponse {
            result: Option<Value>,
            status: String,
            error_message: Option<String>,
        }

        let api_response: DetailsResponse = response
            .json()
            .await
            .map_err(|e| AttractionsError::ExternalApiError(format!("Parse error: {}", e)))?;

        if api_response.status != "OK" {
            let msg = api_response
                .error_message
                .unwrap_or_else(|| format!("Details status: {}", api_response.status));
            return Err(AttractionsError::ExternalApiError(msg));
        }

        let raw = api_response.result.ok_or_else(|| {
            AttractionsError::ExternalApiError("Details response missing result".to_string())
        })?;

        let place: GooglePlace = serde_json::from_value(raw.clone())
            .map_err(|e| AttractionsError::ExternalApiError(format!("Parse error: {}", e)))?;

        Ok(PlaceDetails { place, raw })
    }
}

/// DOCUMENTATION: Provider failures never cross this boundary - each call
/// logs and degrades to an empty result, matching the behavior when the API
/// key is not configured at all
#[async_trait]
impl PlacesProvider for GooglePlacesClient {
    async fn search_by_country(&self, country: &str, limit: usize) -> Vec<GooglePlace> {
        if !self.is_configured() {
            return Vec::new();
        }

        match self.try_search_by_country(country, limit).await {
            Ok(places) => places,
            Err(e) => {
                log::error!("Google Places country search error: {}", e);
                Vec::new()
            }
        }
    }

    async fn search_nearby(
        &self,
        latitude: f64,
        longitude: f64,
        radius_m: u32,
        place_type: Option<&str>,
    ) -> Vec<GooglePlace> {
        if !self.is_configured() {
            return Vec::new();
        }

        match self
            .try_search_nearby(latitude, longitude, radius_m, place_type)
            .await
        {
            Ok(places) => places,
            Err(e) => {
                log::error!("Google Places nearby search error: {}", e);
                Vec::new()
            }
        }
    }

    async fn get_details(&self, place_id: &str, fields: Option<&[&str]>) -> Option<PlaceDetails> {
        if !self.is_configured() {
            return None;
        }

        match self.try_get_details(place_id, fields).await {
            Ok(details) => Some(details),
            Err(e) => {
                log::error!("Google Places details error for {}: {}", place_id, e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unconfigured_client_returns_empty() {
        let client = GooglePlacesClient::new(String::new());

        tokio_test::block_on(async {
            assert!(client.search_by_country("France", 20).await.is_empty());
            assert!(client
                .search_nearby(48.85, 2.35, 5000, Some("restaurant"))
                .await
                .is_empty());
            assert!(client.get_details("ChIJ123", None).await.is_none());
        });
    }

    #[test]
    fn test_parse_search_result_without_place_id() {
        // Malformed results keep deserializing; the reconciler skips them
        let payload = serde_json::json!({
            "results": [
                { "name": "Nameless Monument", "types": ["tourist_attraction"] },
                {
                    "place_id": "ChIJLouvre",
                    "name": "Louvre Museum",
                    "rating": 4.7,
                    "user_ratings_total": 250000,
                    "geometry": { "location": { "lat": 48.8606, "lng": 2.3376 } }
                }
            ],
            "status": "OK"
        });

        let response: GooglePlacesResponse = serde_json::from_value(payload).unwrap();
        assert_eq!(response.results.len(), 2);
        assert!(response.results[0].place_id.is_none());
        assert_eq!(
            response.results[1].place_id.as_deref(),
            Some("ChIJLouvre")
        );
        assert_eq!(response.results[1].rating, Some(4.7));
    }

    #[test]
    fn test_details_payload_round_trip() {
        let raw = serde_json::json!({
            "place_id": "ChIJEiffel",
            "name": "Eiffel Tower",
            "formatted_address": "Champ de Mars, Paris, France",
            "rating": 4.6,
            "opening_hours": { "open_now": true, "weekday_text": [] },
            "reviews": [ { "author_name": "A", "rating": 5 } ],
            "some_future_field": { "nested": 1 }
        });

        let place: GooglePlace = serde_json::from_value(raw.clone()).unwrap();
        let details = PlaceDetails { place, raw };

        // Unknown fields survive in the raw payload even though the typed
        // struct ignores them
        assert!(details.raw.get("some_future_field").is_some());
        assert_eq!(details.place.name.as_deref(), Some("Eiffel Tower"));
        assert!(details.place.opening_hours.is_some());
    }
}
