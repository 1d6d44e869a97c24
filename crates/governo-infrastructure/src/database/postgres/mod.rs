//! PostgreSQL repository implementations

pub mod governo_item_repo_impl;

pub use governo_item_repo_impl::PgGovernoItemRepository;
