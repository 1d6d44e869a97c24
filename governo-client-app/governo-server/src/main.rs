use axum::http::Method;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info};

use governo_api::{build_router, AppState};
use governo_core::domain::LabelLocale;
use governo_core::repositories::GovernoItemRepository;
use governo_core::services::GovernoItemService;
use governo_infrastructure::{create_pool, PgGovernoItemRepository, RestGovernoItemRepository};
use governo_shared::config::{AppConfig, BackendKind};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize telemetry
    governo_shared::telemetry::init_telemetry("info,governo_server=debug");

    info!("Governo server starting...");

    // Load configuration (also reads .env)
    let config = match AppConfig::load() {
        Ok(c) => c,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    let repository = build_repository(&config)?;

    let locale = LabelLocale::new(config.locale.utc_offset_minutes, config.locale.default_label.clone())
        .ok_or_else(|| anyhow::anyhow!("locale.utc_offset_minutes out of range: {}", config.locale.utc_offset_minutes))?;

    let state = AppState {
        items: Arc::new(GovernoItemService::new(
            repository,
            Duration::from_secs(config.cache.stale_time_seconds),
            Duration::from_secs(config.cache.degraded_stale_time_seconds),
        )),
        locale,
    };

    let app = build_router(state).layer(
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS]),
    );

    // Bind address
    let host: std::net::IpAddr = config.app.host.parse()?;
    let addr = SocketAddr::from((host, config.app.port));
    info!("{} listening on {}", config.app.name, addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn build_repository(config: &AppConfig) -> anyhow::Result<Arc<dyn GovernoItemRepository>> {
    match config.backend.kind {
        BackendKind::Rest => {
            info!("Reading governo items from {}", config.backend.url);
            Ok(Arc::new(RestGovernoItemRepository::new(&config.backend)))
        }
        BackendKind::Postgres => {
            let url = config
                .database
                .url
                .as_deref()
                .ok_or_else(|| anyhow::anyhow!("database.url is required when backend.kind = postgres"))?;
            info!("Reading governo items from Postgres");
            let pool = create_pool(
                url,
                config.database.max_connections,
                Duration::from_secs(config.backend.timeout_seconds),
            )?;
            Ok(Arc::new(PgGovernoItemRepository::new(pool)))
        }
    }
}
