// ============================================================================
// Governo Infrastructure - PostgREST Governo Item Repository
// File: crates/governo-infrastructure/src/rest/postgrest_repo_impl.rs
// Description: Reads governo_itens through a Supabase-style REST endpoint
// ============================================================================

use async_trait::async_trait;
use reqwest::{header, Client};
use std::time::Duration;
use tracing::{debug, error, warn};

use governo_core::domain::GovernoItem;
use governo_core::error::DomainError;
use governo_core::repositories::GovernoItemRepository;
use governo_shared::config::BackendSettings;
use governo_shared::constants::GOVERNO_ITENS_TABLE;

use crate::decode::decode_json;

const SELECT_COLUMNS: &str = "id,title,slug,order,active";
const ORDER_CLAUSE: &str = "order.asc,id.asc";

#[derive(Clone)]
pub struct RestGovernoItemRepository {
    client: Client,
    table_url: String,
    anon_key: String,
    service_key: Option<String>,
}

impl RestGovernoItemRepository {
    pub fn new(settings: &BackendSettings) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(settings.timeout_seconds))
                .build()
                .unwrap_or_else(|_| Client::new()),
            table_url: format!(
                "{}/rest/v1/{}",
                settings.url.trim_end_matches('/'),
                GOVERNO_ITENS_TABLE
            ),
            anon_key: settings.anon_key.clone(),
            service_key: settings
                .service_key
                .clone()
                .filter(|key| !key.is_empty()),
        }
    }

    fn list_url(&self, active_only: bool) -> String {
        let filter = if active_only { "&active=eq.true" } else { "" };
        format!(
            "{}?select={}{}&order={}",
            self.table_url, SELECT_COLUMNS, filter, ORDER_CLAUSE
        )
    }

    async fn get_rows(&self, url: &str, key: &str) -> Result<Vec<GovernoItem>, DomainError> {
        debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .header("apikey", key)
            .header(header::AUTHORIZATION, format!("Bearer {}", key))
            .header(header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| {
                error!("Failed to reach governo backend: {}", e);
                DomainError::Transport(e.to_string())
            })?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            warn!("Governo backend returned {}: {}", status, message);
            return Err(DomainError::Backend { status, message });
        }

        let body: serde_json::Value = response.json().await.map_err(|e| {
            error!("Governo backend sent a non-JSON body: {}", e);
            DomainError::MalformedResponse(e.to_string())
        })?;

        decode_json(body)
    }
}

#[async_trait]
impl GovernoItemRepository for RestGovernoItemRepository {
    async fn list_active_ordered(&self) -> Result<Vec<GovernoItem>, DomainError> {
        self.get_rows(&self.list_url(true), &self.anon_key).await
    }

    async fn list_all_ordered(&self) -> Result<Vec<GovernoItem>, DomainError> {
        // Inactive rows are usually hidden from the anon role
        let key = self.service_key.as_deref().unwrap_or(&self.anon_key);
        self.get_rows(&self.list_url(false), key).await
    }
}
