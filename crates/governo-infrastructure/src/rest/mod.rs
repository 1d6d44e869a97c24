//! PostgREST (Supabase) adapter

pub mod postgrest_repo_impl;

pub use postgrest_repo_impl::RestGovernoItemRepository;
