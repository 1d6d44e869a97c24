// ============================================================================
// Governo Core - Governo Item Service
// File: crates/governo-core/src/services/governo_item_service.rs
// ============================================================================
//! Public and administrative reads of the government-structure menu.
//!
//! The two reads differ on purpose. The public listing never fails: an error
//! or an empty result is replaced by [`fallback_items`]. The administrative
//! listing returns whatever the backend says, errors included.

use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, warn};

use crate::cache::{QueryCache, QueryKey, QueryStatus};
use crate::domain::{duplicate_active_slugs, fallback_items, GovernoItem};
use crate::error::DomainError;
use crate::repositories::GovernoItemRepository;

/// Where the public listing came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListingSource {
    Backend,
    /// Backend answered with no active rows
    FallbackEmpty,
    /// Backend failed; the listing is degraded
    FallbackError,
}

impl ListingSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            ListingSource::Backend => "backend",
            ListingSource::FallbackEmpty => "fallback_empty",
            ListingSource::FallbackError => "fallback_error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicListing {
    pub items: Vec<GovernoItem>,
    pub source: ListingSource,
}

impl PublicListing {
    pub fn is_degraded(&self) -> bool {
        self.source == ListingSource::FallbackError
    }
}

pub struct GovernoItemService<R: GovernoItemRepository + ?Sized> {
    repo: Arc<R>,
    public: QueryCache<PublicListing, DomainError>,
    admin: QueryCache<Vec<GovernoItem>, DomainError>,
}

impl<R: GovernoItemRepository + ?Sized + 'static> GovernoItemService<R> {
    /// `degraded_stale_time` bounds how long a fallback served because of a
    /// backend error is kept; it never exceeds `stale_time`.
    pub fn new(repo: Arc<R>, stale_time: Duration, degraded_stale_time: Duration) -> Self {
        let degraded_stale_time = degraded_stale_time.min(stale_time);
        Self {
            repo,
            public: QueryCache::new(stale_time).with_stale_policy(move |listing: &PublicListing| {
                if listing.is_degraded() {
                    degraded_stale_time
                } else {
                    stale_time
                }
            }),
            admin: QueryCache::new(stale_time),
        }
    }

    /// Active items ordered by `order`, or the fallback sequence.
    pub async fn public_items(&self) -> Vec<GovernoItem> {
        self.public_listing().await.items
    }

    /// Public items together with where they came from.
    pub async fn public_listing(&self) -> PublicListing {
        let repo = self.repo.clone();
        self.public
            .fetch(&QueryKey::PUBLIC_ITEMS, move || async move {
                Ok(Self::load_public(repo).await)
            })
            .await
            .unwrap_or_else(|_| PublicListing {
                items: fallback_items(),
                source: ListingSource::FallbackError,
            })
    }

    /// Cached public listing, without fetching.
    pub fn peek_public(&self) -> Option<PublicListing> {
        self.public.peek(&QueryKey::PUBLIC_ITEMS)
    }

    /// Every item ordered by `order`. Errors propagate; empty is valid.
    pub async fn admin_items(&self) -> Result<Vec<GovernoItem>, DomainError> {
        let repo = self.repo.clone();
        self.admin
            .fetch(&QueryKey::ADMIN_ITEMS, move || Self::load_admin(repo))
            .await
    }

    /// Drop the admin listing and read it from the backend again.
    pub async fn refetch_admin(&self) -> Result<Vec<GovernoItem>, DomainError> {
        let repo = self.repo.clone();
        self.admin
            .refetch(&QueryKey::ADMIN_ITEMS, move || Self::load_admin(repo))
            .await
    }

    /// Drop both listings, e.g. after the table was edited.
    pub fn invalidate_all(&self) {
        self.public.invalidate_all();
        self.admin.invalidate_all();
    }

    pub fn status(&self, key: &QueryKey) -> QueryStatus {
        if *key == QueryKey::PUBLIC_ITEMS {
            self.public.status(key)
        } else {
            self.admin.status(key)
        }
    }

    async fn load_admin(repo: Arc<R>) -> Result<Vec<GovernoItem>, DomainError> {
        let result = repo.list_all_ordered().await;
        match &result {
            Ok(items) => debug!("Admin governo items loaded: {} rows", items.len()),
            Err(e) => error!("Admin governo items failed: {}", e),
        }
        result
    }

    async fn load_public(repo: Arc<R>) -> PublicListing {
        match repo.list_active_ordered().await {
            Ok(items) if items.is_empty() => {
                warn!("Public governo items empty, serving fallback");
                PublicListing {
                    items: fallback_items(),
                    source: ListingSource::FallbackEmpty,
                }
            }
            Ok(items) => {
                let duplicates = duplicate_active_slugs(&items);
                if !duplicates.is_empty() {
                    warn!("Duplicate active governo slugs: {:?}", duplicates);
                }
                debug!("Public governo items loaded: {} rows", items.len());
                PublicListing {
                    items,
                    source: ListingSource::Backend,
                }
            }
            Err(e) => {
                warn!("Public governo items unavailable ({}), serving fallback", e);
                PublicListing {
                    items: fallback_items(),
                    source: ListingSource::FallbackError,
                }
            }
        }
    }
}
