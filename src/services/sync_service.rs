// src/services/sync_service.rs
// DOCUMENTATION: Google Places synchronization service
// PURPOSE: Reconcile externally-fetched places with locally stored attractions

use crate::db::AttractionRepository;
use crate::errors::AttractionsError;
use crate::models::attraction::title_case_tag;
use crate::models::CreateAttractionRequest;
use crate::services::{GoogleAddressComponent, GooglePlace, PlaceDetails, PlacesProvider};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::PgPool;

/// Rating threshold above which an imported attraction is featured
const FEATURED_RATING_THRESHOLD: f32 = 4.0;

/// Synchronization statistics
/// DOCUMENTATION: Tracks results of a sync operation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncStats {
    /// Country that was synced
    pub country: String,
    /// Total places retrieved from the provider
    pub total_found: u32,
    /// Attractions newly created
    pub created: u32,
    /// Attractions updated in place
    pub updated: u32,
    /// Candidates skipped (missing identifier, missing details, storage failure)
    pub skipped: u32,
}

impl SyncStats {
    pub fn new(country: String) -> Self {
        Self {
            country,
            total_found: 0,
            created: 0,
            updated: 0,
            skipped: 0,
        }
    }
}

/// Extract a normalized country/city pair from provider address components
/// DOCUMENTATION: A country-typed component wins for the country name
/// (falling back to the requested country); locality or
/// administrative_area_level_1 wins for the city (empty fallback)
fn extract_country_city(
    components: Option<&[GoogleAddressComponent]>,
    fallback_country: &str,
) -> (String, String) {
    let mut country = fallback_country.to_string();
    let mut city = String::new();

    if let Some(components) = components {
        for component in components {
            if component.types.iter().any(|t| t == "country") {
                country = component.long_name.clone();
            } else if component
                .types
                .iter()
                .any(|t| t == "locality" || t == "administrative_area_level_1")
            {
                city = component.long_name.clone();
            }
        }
    }

    (country, city)
}

/// Sync service for Google Places integration
/// DOCUMENTATION: Handles bulk synchronization of attractions from the
/// places provider; generic over the provider so tests can substitute a fake
pub struct SyncService;

impl SyncService {
    /// Synchronize attractions for a country
    /// DOCUMENTATION: Main sync method
    ///
    /// Process:
    /// 1. Query the provider for up to `limit` candidate places
    /// 2. Skip candidates without a place identifier
    /// 3. Fetch full details per identifier; missing details are skipped
    /// 4. Parse address components into a country/city pair
    /// 5. Upsert into the catalog keyed by place_id - full population on
    ///    create, volatile fields only on update
    ///
    /// # Arguments
    /// * `pool` - Database connection pool
    /// * `provider` - Places provider (injected, fake in tests)
    /// * `country` - Country to search attractions for
    /// * `limit` - Maximum number of candidates to fetch
    /// * `place_type` - Place type used for the category label
    ///
    /// # Returns
    /// SyncStats with created/updated/skipped counts
    pub async fn sync_from_google<P: PlacesProvider>(
        pool: &PgPool,
        provider: &P,
        country: &str,
        limit: usize,
        place_type: &str,
    ) -> Result<SyncStats, AttractionsError> {
        let mut stats = SyncStats::new(country.to_string());

        log::info!("Starting sync for country: {}", country);

        let places = provider.search_by_country(country, limit).await;
        stats.total_found = places.len() as u32;

        let resolved = Self::resolve_candidates(provider, &places).await;
        stats.skipped += (places.len() - resolved.len()) as u32;

        for details in &resolved {
            let create_req = Self::to_create_request(details, country, place_type);

            match AttractionRepository::upsert_from_sync(pool, &create_req).await {
                Ok((attraction, true)) => {
                    stats.created += 1;
                    log::debug!("Created attraction: {}", attraction.name);
                }
                Ok((attraction, false)) => {
                    stats.updated += 1;
                    log::debug!("Updated attraction: {}", attraction.name);
                }
                Err(e) => {
                    log::warn!("Failed to store {}: {}", create_req.place_id, e);
                    stats.skipped += 1;
                }
            }
        }

        log::info!(
            "Sync completed for {}: {} found, {} created, {} updated, {} skipped",
            country,
            stats.total_found,
            stats.created,
            stats.updated,
            stats.skipped
        );

        Ok(stats)
    }

    /// Convert provider details to an attraction creation request
    /// DOCUMENTATION: Full field population for the create path of the
    /// upsert; the featured flag is derived from the rating threshold here
    ///
    /// # Arguments
    /// * `details` - Place details from the provider
    /// * `fallback_country` - Requested country, used when the address
    ///   components carry no country
    /// * `place_type` - Requested place type, becomes the category label
    pub fn to_create_request(
        details: &PlaceDetails,
        fallback_country: &str,
        place_type: &str,
    ) -> CreateAttractionRequest {
        let place = &details.place;

        let (country, city) =
            extract_country_city(place.address_components.as_deref(), fallback_country);

        let location = place
            .geometry
            .as_ref()
            .and_then(|g| g.location.as_ref());

        let rating = place.rating.unwrap_or(0.0);

        let (photo_reference, photos_count) = match place.photos.as_deref() {
            Some(photos) => (
                photos
                    .first()
                    .map(|p| p.photo_reference.clone())
                    .unwrap_or_default(),
                photos.len() as i32,
            ),
            None => (String::new(), 0),
        };

        CreateAttractionRequest {
            place_id: place.place_id.clone().unwrap_or_default(),
            name: place.name.clone().unwrap_or_default(),
            formatted_address: place.formatted_address.clone().unwrap_or_default(),
            country,
            city,
            category: title_case_tag(place_type),
            types: place.types.clone(),
            rating,
            user_ratings_total: place.user_ratings_total.unwrap_or(0),
            price_level: place.price_level,
            latitude: location.map(|l| l.lat),
            longitude: location.map(|l| l.lng),
            description: String::new(),
            website: place.website.clone().unwrap_or_default(),
            phone_number: place.formatted_phone_number.clone().unwrap_or_default(),
            photo_reference,
            photos_count,
            opening_hours: place
                .opening_hours
                .clone()
                .unwrap_or_else(|| Value::Object(serde_json::Map::new())),
            reviews: place
                .reviews
                .clone()
                .unwrap_or_else(|| Value::Array(Vec::new())),
            likes: 0,
            is_featured: Some(rating >= FEATURED_RATING_THRESHOLD),
            raw_data: details.raw.clone(),
        }
    }

    /// Resolve search candidates into full details
    /// DOCUMENTATION: Skips candidates without an identifier and candidates
    /// whose details lookup fails; the batch always continues
    pub async fn resolve_candidates<P: PlacesProvider>(
        provider: &P,
        candidates: &[GooglePlace],
    ) -> Vec<PlaceDetails> {
        let mut resolved = Vec::new();

        for candidate in candidates {
            let Some(place_id) = candidate.place_id.as_deref() else {
                log::debug!("Skipping search result without place_id");
                continue;
            };

            match provider.get_details(place_id, None).await {
                Some(details) => resolved.push(details),
                None => {
                    log::warn!("Could not fetch details for {}, skipping", place_id);
                }
            }
        }

        resolved
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::json;
    use std::collections::HashMap;

    /// Fake provider backed by in-memory payloads
    struct FakeProvider {
        search_results: Vec<GooglePlace>,
        details: HashMap<String, PlaceDetails>,
    }

    impl FakeProvider {
        fn new(search_results: Vec<GooglePlace>, details: Vec<Value>) -> Self {
            let details = details
                .into_iter()
                .map(|raw| {
                    let place: GooglePlace = serde_json::from_value(raw.clone()).unwrap();
                    let id = place.place_id.clone().unwrap();
                    (id, PlaceDetails { place, raw })
                })
                .collect();

            Self {
                search_results,
                details,
            }
        }
    }

    #[async_trait]
    impl PlacesProvider for FakeProvider {
        async fn search_by_country(&self, _country: &str, limit: usize) -> Vec<GooglePlace> {
            let mut results = self.search_results.clone();
            results.truncate(limit);
            results
        }

        async fn search_nearby(
            &self,
            _latitude: f64,
            _longitude: f64,
            _radius_m: u32,
            _place_type: Option<&str>,
        ) -> Vec<GooglePlace> {
            Vec::new()
        }

        async fn get_details(
            &self,
            place_id: &str,
            _fields: Option<&[&str]>,
        ) -> Option<PlaceDetails> {
            self.details.get(place_id).cloned()
        }
    }

    fn search_result(place_id: Option<&str>) -> GooglePlace {
        serde_json::from_value(match place_id {
            Some(id) => json!({ "place_id": id, "name": "Candidate" }),
            None => json!({ "name": "Candidate" }),
        })
        .unwrap()
    }

    fn details_payload(place_id: &str, rating: f32) -> Value {
        json!({
            "place_id": place_id,
            "name": "Mont Saint-Michel",
            "formatted_address": "50170 Mont Saint-Michel, France",
            "rating": rating,
            "user_ratings_total": 52000,
            "price_level": 1,
            "types": ["tourist_attraction", "point_of_interest"],
            "geometry": { "location": { "lat": 48.636, "lng": -1.5115 } },
            "address_components": [
                { "long_name": "Mont Saint-Michel", "short_name": "MSM", "types": ["locality", "political"] },
                { "long_name": "France", "short_name": "FR", "types": ["country", "political"] }
            ],
            "photos": [
                { "photo_reference": "ref-1", "width": 800, "height": 600 },
                { "photo_reference": "ref-2", "width": 800, "height": 600 }
            ],
            "opening_hours": { "open_now": true },
            "reviews": [ { "author_name": "A", "rating": 5 } ]
        })
    }

    #[tokio::test]
    async fn test_resolve_candidates_skips_unresolvable() {
        let provider = FakeProvider::new(
            vec![
                search_result(None),
                search_result(Some("with-details")),
                search_result(Some("without-details")),
            ],
            vec![details_payload("with-details", 4.5)],
        );

        let candidates = provider.search_by_country("France", 20).await;
        let resolved = SyncService::resolve_candidates(&provider, &candidates).await;

        // One candidate has no id, one has no details record
        assert_eq!(resolved.len(), 1);
        assert!(resolved.len() <= candidates.len());
        assert_eq!(
            resolved[0].place.place_id.as_deref(),
            Some("with-details")
        );
    }

    #[tokio::test]
    async fn test_search_respects_limit() {
        let provider = FakeProvider::new(
            vec![
                search_result(Some("a")),
                search_result(Some("b")),
                search_result(Some("c")),
            ],
            vec![],
        );

        let candidates = provider.search_by_country("France", 2).await;
        assert_eq!(candidates.len(), 2);
    }

    #[test]
    fn test_to_create_request_populates_all_fields() {
        let raw = details_payload("ChIJMSM", 4.5);
        let place: GooglePlace = serde_json::from_value(raw.clone()).unwrap();
        let details = PlaceDetails { place, raw };

        let req = SyncService::to_create_request(&details, "France", "tourist_attraction");

        assert_eq!(req.place_id, "ChIJMSM");
        assert_eq!(req.name, "Mont Saint-Michel");
        assert_eq!(req.country, "France");
        assert_eq!(req.city, "Mont Saint-Michel");
        assert_eq!(req.category, "Tourist Attraction");
        assert_eq!(req.rating, 4.5);
        assert_eq!(req.user_ratings_total, 52000);
        assert_eq!(req.price_level, Some(1));
        assert_eq!(req.latitude, Some(48.636));
        assert_eq!(req.longitude, Some(-1.5115));
        assert_eq!(req.photo_reference, "ref-1");
        assert_eq!(req.photos_count, 2);
        assert!(req.opening_hours.is_object());
        assert!(req.reviews.is_array());
        assert_eq!(req.raw_data, details.raw);
        assert_eq!(req.likes, 0);
        assert!(req.description.is_empty());
    }

    #[test]
    fn test_featured_flag_thresholds() {
        let make = |rating: f32| {
            let raw = details_payload("ChIJMSM", rating);
            let place: GooglePlace = serde_json::from_value(raw.clone()).unwrap();
            SyncService::to_create_request(
                &PlaceDetails { place, raw },
                "France",
                "tourist_attraction",
            )
        };

        assert_eq!(make(4.2).is_featured, Some(true));
        assert_eq!(make(4.0).is_featured, Some(true));
        assert_eq!(make(3.0).is_featured, Some(false));
    }

    #[test]
    fn test_extract_country_city() {
        let components = vec![
            GoogleAddressComponent {
                long_name: "Paris".to_string(),
                short_name: "Paris".to_string(),
                types: vec!["locality".to_string(), "political".to_string()],
            },
            GoogleAddressComponent {
                long_name: "France".to_string(),
                short_name: "FR".to_string(),
                types: vec!["country".to_string(), "political".to_string()],
            },
        ];

        let (country, city) = extract_country_city(Some(&components), "Requested");
        assert_eq!(country, "France");
        assert_eq!(city, "Paris");
    }

    #[test]
    fn test_extract_country_city_admin_level_fallback() {
        let components = vec![GoogleAddressComponent {
            long_name: "Normandie".to_string(),
            short_name: "Normandie".to_string(),
            types: vec![
                "administrative_area_level_1".to_string(),
                "political".to_string(),
            ],
        }];

        let (country, city) = extract_country_city(Some(&components), "France");
        assert_eq!(country, "France");
        assert_eq!(city, "Normandie");
    }

    #[test]
    fn test_extract_country_city_without_components() {
        let (country, city) = extract_country_city(None, "France");
        assert_eq!(country, "France");
        assert_eq!(city, "");
    }
}
