//! Governo item repository trait (port)

use async_trait::async_trait;
use crate::domain::GovernoItem;
use crate::error::DomainError;

/// Read-only access to `governo_itens`. Implementations sort by `order`
/// ascending with `id` ascending as the tie-break.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GovernoItemRepository: Send + Sync {
    /// Rows with `active = true`.
    async fn list_active_ordered(&self) -> Result<Vec<GovernoItem>, DomainError>;

    /// Every row, active and inactive.
    async fn list_all_ordered(&self) -> Result<Vec<GovernoItem>, DomainError>;
}
