//! # Governo Infrastructure
//! 
//! Backend adapters for `governo_itens`: PostgREST over HTTP and Postgres.

pub mod database;
pub mod decode;
pub mod rest;

pub use database::{create_pool, PgGovernoItemRepository};
pub use rest::RestGovernoItemRepository;
