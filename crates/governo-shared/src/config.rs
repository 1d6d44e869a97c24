//! Configuration management

use config::{builder::DefaultState, Config, ConfigBuilder, ConfigError, Environment, File};
use serde::Deserialize;

use crate::error::AppError;
use crate::constants::{
    DEFAULT_BACKEND_TIMEOUT_SECONDS, DEFAULT_DEGRADED_STALE_TIME_SECONDS,
    DEFAULT_STALE_TIME_SECONDS, DEFAULT_TIME_LABEL, DEFAULT_UTC_OFFSET_MINUTES,
};

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub app: AppSettings,
    pub backend: BackendSettings,
    pub database: DatabaseSettings,
    pub cache: CacheSettings,
    pub locale: LocaleSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppSettings {
    pub env: String,
    pub host: String,
    pub port: u16,
    pub name: String,
}

/// Which adapter serves the `governo_itens` reads.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    Rest,
    Postgres,
}

#[derive(Debug, Deserialize, Clone)]
pub struct BackendSettings {
    pub kind: BackendKind,
    pub url: String,
    pub anon_key: String,
    pub service_key: Option<String>,
    pub timeout_seconds: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseSettings {
    pub url: Option<String>,
    pub max_connections: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CacheSettings {
    pub stale_time_seconds: u64,
    pub degraded_stale_time_seconds: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LocaleSettings {
    pub utc_offset_minutes: i32,
    pub default_label: String,
}

impl AppConfig {
    pub fn load() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();

        let env = std::env::var("APP_ENV").unwrap_or_else(|_| "development".into());
        let config: AppConfig = Self::builder_with_defaults()?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(Environment::default().separator("__").try_parsing(true))
            .build()?
            .try_deserialize()?;
        config.check()?;
        Ok(config)
    }

    /// Cross-field checks serde cannot express.
    pub fn check(&self) -> Result<(), AppError> {
        if self.locale.utc_offset_minutes.abs() >= 24 * 60 {
            return Err(AppError::InvalidConfig(format!(
                "locale.utc_offset_minutes out of range: {}",
                self.locale.utc_offset_minutes
            )));
        }
        if self.backend.kind == BackendKind::Postgres && self.database.url.is_none() {
            return Err(AppError::InvalidConfig(
                "database.url is required when backend.kind = postgres".to_string(),
            ));
        }
        Ok(())
    }

    /// Builder pre-seeded with every default, without file or env sources.
    pub fn builder_with_defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        Config::builder()
            .set_default("app.env", "development")?
            .set_default("app.host", "127.0.0.1")?
            .set_default("app.port", 8080)?
            .set_default("app.name", "governo-server")?
            .set_default("backend.kind", "rest")?
            .set_default("backend.url", "http://127.0.0.1:54321")?
            .set_default("backend.anon_key", "")?
            .set_default("backend.timeout_seconds", DEFAULT_BACKEND_TIMEOUT_SECONDS)?
            .set_default("database.max_connections", 5)?
            .set_default("cache.stale_time_seconds", DEFAULT_STALE_TIME_SECONDS)?
            .set_default("cache.degraded_stale_time_seconds", DEFAULT_DEGRADED_STALE_TIME_SECONDS)?
            .set_default("locale.utc_offset_minutes", DEFAULT_UTC_OFFSET_MINUTES)?
            .set_default("locale.default_label", DEFAULT_TIME_LABEL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_deserialize() {
        let config: AppConfig = AppConfig::builder_with_defaults()
            .unwrap()
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(config.app.port, 8080);
        assert_eq!(config.backend.kind, BackendKind::Rest);
        assert!(config.backend.service_key.is_none());
        assert!(config.database.url.is_none());
        assert_eq!(config.cache.stale_time_seconds, 60);
        assert_eq!(config.cache.degraded_stale_time_seconds, 5);
        assert_eq!(config.locale.utc_offset_minutes, -180);
        assert_eq!(config.locale.default_label, "Última atualização");
        assert!(config.check().is_ok());
    }

    #[test]
    fn test_check_rejects_postgres_without_url() {
        let config: AppConfig = AppConfig::builder_with_defaults()
            .unwrap()
            .set_override("backend.kind", "postgres")
            .unwrap()
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();
        assert!(matches!(config.check(), Err(AppError::InvalidConfig(_))));
    }

    #[test]
    fn test_check_rejects_offset_out_of_range() {
        let config: AppConfig = AppConfig::builder_with_defaults()
            .unwrap()
            .set_override("locale.utc_offset_minutes", 1500)
            .unwrap()
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();
        assert!(matches!(config.check(), Err(AppError::InvalidConfig(_))));
    }

    #[test]
    fn test_overrides_apply() {
        let config: AppConfig = AppConfig::builder_with_defaults()
            .unwrap()
            .set_override("backend.kind", "postgres")
            .unwrap()
            .set_override("database.url", "postgres://localhost/governo")
            .unwrap()
            .set_override("backend.service_key", "service")
            .unwrap()
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(config.backend.kind, BackendKind::Postgres);
        assert_eq!(config.database.url.as_deref(), Some("postgres://localhost/governo"));
        assert_eq!(config.backend.service_key.as_deref(), Some("service"));
    }
}
