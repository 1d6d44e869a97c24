// ============================================================================
// Governo Infrastructure - PostgreSQL Governo Item Repository
// File: crates/governo-infrastructure/src/database/postgres/governo_item_repo_impl.rs
// ============================================================================

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{debug, error};

use governo_core::domain::GovernoItem;
use governo_core::error::DomainError;
use governo_core::repositories::GovernoItemRepository;

use crate::decode::{decode_rows, GovernoItemRow};

pub struct PgGovernoItemRepository {
    pool: PgPool,
}

impl PgGovernoItemRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl GovernoItemRepository for PgGovernoItemRepository {
    async fn list_active_ordered(&self) -> Result<Vec<GovernoItem>, DomainError> {
        let rows: Vec<GovernoItemRow> = sqlx::query_as(
            r#"
            SELECT
                id::text AS id, title, slug, "order"::int4 AS "order", active
            FROM governo_itens
            WHERE active = true
            ORDER BY governo_itens."order" ASC, governo_itens.id ASC
            "#
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e: sqlx::Error| {
            error!("Database error listing active governo items: {}", e);
            DomainError::DatabaseError(e.to_string())
        })?;

        debug!("Fetched {} active governo rows", rows.len());
        decode_rows(rows)
    }

    async fn list_all_ordered(&self) -> Result<Vec<GovernoItem>, DomainError> {
        let rows: Vec<GovernoItemRow> = sqlx::query_as(
            r#"
            SELECT
                id::text AS id, title, slug, "order"::int4 AS "order", active
            FROM governo_itens
            ORDER BY governo_itens."order" ASC, governo_itens.id ASC
            "#
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e: sqlx::Error| {
            error!("Database error listing governo items: {}", e);
            DomainError::DatabaseError(e.to_string())
        })?;

        debug!("Fetched {} governo rows", rows.len());
        decode_rows(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use crate::database::connection::create_pool;

    /// Single-connection pool with a temporary `governo_itens` shadowing any real one.
    async fn seeded_repository() -> Option<PgGovernoItemRepository> {
        let url = std::env::var("DATABASE_URL").ok()?;
        let pool = create_pool(&url, 1, Duration::from_secs(5)).unwrap();

        sqlx::query(
            r#"CREATE TEMPORARY TABLE governo_itens (
                id int PRIMARY KEY, title text NOT NULL, slug text NOT NULL,
                "order" int NOT NULL, active bool NOT NULL
            )"#,
        )
        .execute(&pool)
        .await
        .unwrap();
        sqlx::query(
            r#"INSERT INTO governo_itens (id, title, slug, "order", active) VALUES
                (10, 'Prefeito', 'prefeito', 1, true),
                (9, 'Vice-Prefeito', 'vice-prefeito', 1, true),
                (2, 'Secretarias', 'secretarias', 3, true),
                (5, 'Arquivo', 'arquivo', 0, false)"#,
        )
        .execute(&pool)
        .await
        .unwrap();

        Some(PgGovernoItemRepository::new(pool))
    }

    fn ids(items: &[GovernoItem]) -> Vec<&str> {
        items.iter().map(|i| i.id.as_str()).collect()
    }

    #[tokio::test]
    #[ignore = "needs DATABASE_URL"]
    async fn test_active_rows_tie_break_on_numeric_id() {
        let Some(repo) = seeded_repository().await else {
            return;
        };

        let items = repo.list_active_ordered().await.unwrap();
        assert_eq!(ids(&items), vec!["9", "10", "2"]);
        assert!(items.iter().all(|i| i.active));
    }

    #[tokio::test]
    #[ignore = "needs DATABASE_URL"]
    async fn test_all_rows_include_inactive() {
        let Some(repo) = seeded_repository().await else {
            return;
        };

        let items = repo.list_all_ordered().await.unwrap();
        assert_eq!(ids(&items), vec!["5", "9", "10", "2"]);
        assert!(!items[0].active);
    }
}
