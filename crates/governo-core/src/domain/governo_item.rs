// ============================================================================
// Governo Core - Governo Item Entity
// File: crates/governo-core/src/domain/governo_item.rs
// Description: Government-structure menu entry and its static fallback
// ============================================================================

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use validator::Validate;

static SLUG_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-z0-9]+(?:-[a-z0-9]+)*$").expect("slug pattern is valid")
});

/// Governo menu entry, as read from `governo_itens`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct GovernoItem {
    #[validate(length(min = 1, message = "Item id must not be empty"))]
    pub id: String,

    #[validate(length(min = 1, max = 255, message = "Item title must be between 1 and 255 characters"))]
    pub title: String,

    #[validate(regex(path = *SLUG_REGEX, message = "Item slug must be lowercase words joined by '-'"))]
    pub slug: String,

    pub order: i32,
    pub active: bool,
}

impl GovernoItem {
    pub fn new(
        id: String,
        title: String,
        slug: String,
        order: i32,
        active: bool,
    ) -> Result<Self, validator::ValidationErrors> {
        let item = Self {
            id: id.trim().to_string(),
            title: title.trim().to_string(),
            slug: slug.trim().to_string(),
            order,
            active,
        };

        item.validate()?;
        Ok(item)
    }

    /// Path segment used by the public menu.
    pub fn href(&self) -> String {
        format!("/governo/{}", self.slug)
    }
}

/// Static substitute for the public listing. Never persisted.
pub fn fallback_items() -> Vec<GovernoItem> {
    [
        ("fallback-1", "Prefeito", "prefeito"),
        ("fallback-2", "Vice-Prefeito", "vice-prefeito"),
        ("fallback-3", "Secretarias", "secretarias"),
        ("fallback-4", "Estrutura Organizacional", "estrutura-organizacional"),
    ]
    .into_iter()
    .zip(1..)
    .map(|((id, title, slug), order)| GovernoItem {
        id: id.to_string(),
        title: title.to_string(),
        slug: slug.to_string(),
        order,
        active: true,
    })
    .collect()
}

/// Slugs that appear more than once among active items.
pub fn duplicate_active_slugs(items: &[GovernoItem]) -> Vec<&str> {
    let mut seen = HashSet::new();
    let mut duplicates = Vec::new();
    for item in items.iter().filter(|i| i.active) {
        if !seen.insert(item.slug.as_str()) && !duplicates.contains(&item.slug.as_str()) {
            duplicates.push(item.slug.as_str());
        }
    }
    duplicates
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_item() {
        let item = GovernoItem::new(
            "42".to_string(),
            "  Secretarias ".to_string(),
            "secretarias".to_string(),
            3,
            true,
        );
        assert!(item.is_ok());
        let item = item.unwrap();
        assert_eq!(item.title, "Secretarias");
        assert_eq!(item.href(), "/governo/secretarias");
    }

    #[test]
    fn test_rejects_bad_slug() {
        let item = GovernoItem::new(
            "1".to_string(),
            "Prefeito".to_string(),
            "Prefeito Municipal".to_string(),
            1,
            true,
        );
        assert!(item.is_err());
    }

    #[test]
    fn test_rejects_empty_title() {
        let item = GovernoItem::new("1".to_string(), "   ".to_string(), "prefeito".to_string(), 1, true);
        assert!(item.is_err());
    }

    #[test]
    fn test_fallback_sequence() {
        let items = fallback_items();
        assert_eq!(items.len(), 4);
        let orders: Vec<i32> = items.iter().map(|i| i.order).collect();
        assert_eq!(orders, vec![1, 2, 3, 4]);
        assert!(items.iter().all(|i| i.active));
        assert!(items.iter().all(|i| i.validate().is_ok()));
        assert!(duplicate_active_slugs(&items).is_empty());
    }

    #[test]
    fn test_duplicate_slugs_ignore_inactive() {
        let mut items = fallback_items();
        let mut inactive = items[0].clone();
        inactive.id = "old".to_string();
        inactive.active = false;
        items.push(inactive);
        assert!(duplicate_active_slugs(&items).is_empty());

        let mut twin = items[1].clone();
        twin.id = "twin".to_string();
        items.push(twin);
        assert_eq!(duplicate_active_slugs(&items), vec!["vice-prefeito"]);
    }
}
