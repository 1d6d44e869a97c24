//! HTTP handlers

pub mod governo;
pub mod health;
pub mod time_label;
