//! In-process query cache

pub mod query_cache;

pub use query_cache::{QueryCache, QueryKey, QueryStatus};
