use std::sync::Arc;

use governo_core::domain::LabelLocale;
use governo_core::repositories::GovernoItemRepository;
use governo_core::services::GovernoItemService;

pub type SharedGovernoItemService = Arc<GovernoItemService<dyn GovernoItemRepository>>;

#[derive(Clone)]
pub struct AppState {
    pub items: SharedGovernoItemService,
    pub locale: LabelLocale,
}
