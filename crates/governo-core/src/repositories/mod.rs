//! Repository traits (ports)

pub mod governo_item_repository;

pub use governo_item_repository::GovernoItemRepository;
#[cfg(test)]
pub use governo_item_repository::MockGovernoItemRepository;
