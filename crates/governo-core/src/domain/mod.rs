//! # Governo Core - Domain Module
//! 
//! Domain entities and presentational value types.

pub mod governo_item;
pub mod time_label;

pub use governo_item::{duplicate_active_slugs, fallback_items, GovernoItem};
pub use time_label::{DateInput, LabelLocale, RenderedTimeLabel, TimeLabel};
