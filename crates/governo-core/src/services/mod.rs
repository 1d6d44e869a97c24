//! Domain services (business logic)

pub mod governo_item_service;

pub use governo_item_service::{GovernoItemService, ListingSource, PublicListing};
