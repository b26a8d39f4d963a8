// src/services/mod.rs
// DOCUMENTATION: Services module organization
// PURPOSE: Re-export service components

pub mod attraction_service;
pub mod compilation_service;
pub mod google_places_client;
pub mod sync_service;

pub use attraction_service::*;
pub use compilation_service::*;
pub use google_places_client::*;
pub use sync_service::*;
