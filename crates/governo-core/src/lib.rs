//! # Governo Core
//! 
//! Domain entities, the time label renderer, the query cache, services,
//! and repository traits for the government-structure menu.

pub mod domain;
pub mod cache;
pub mod services;
pub mod repositories;
pub mod error;

// Re-export domain entities
pub use domain::*;
pub use cache::{QueryCache, QueryKey, QueryStatus};
pub use error::{DomainError, TimeLabelError};
