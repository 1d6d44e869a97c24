//! Application-wide constants

/// Remote table holding the government-structure menu.
pub const GOVERNO_ITENS_TABLE: &str = "governo_itens";

/// Query key of the public (active only, with fallback) listing.
pub const QUERY_KEY_PUBLIC: &str = "governo-itens";

/// Query key of the administrative (all rows) listing.
pub const QUERY_KEY_ADMIN: &str = "governo-itens-admin";

pub const DEFAULT_TIME_LABEL: &str = "Última atualização";
pub const DEFAULT_UTC_OFFSET_MINUTES: i32 = -180;
pub const DEFAULT_STALE_TIME_SECONDS: u64 = 60;
/// Stale time of a fallback served because the backend failed
pub const DEFAULT_DEGRADED_STALE_TIME_SECONDS: u64 = 5;
pub const DEFAULT_BACKEND_TIMEOUT_SECONDS: u64 = 10;
