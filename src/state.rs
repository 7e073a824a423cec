//! Shared application state
//!
//! Este módulo define el estado compartido de la aplicación que se pasa
//! a través del router de Axum.

use std::sync::Arc;
use anyhow::Context;
use tracing::{info, warn};

use crate::config::database::mask_database_url;
use crate::config::{DatabaseConfig, EnvironmentConfig, GatewayBackend};
use crate::gateway::{DataGateway, InMemoryGateway, PostgresGateway, PostgrestGateway};

#[derive(Clone)]
pub struct AppState {
    pub gateway: Arc<dyn DataGateway>,
    pub config: EnvironmentConfig,
}

impl AppState {
    pub fn new(gateway: Arc<dyn DataGateway>, config: EnvironmentConfig) -> Self {
        Self { gateway, config }
    }

    /// Construir el gateway según `GATEWAY_BACKEND`
    pub async fn connect(config: EnvironmentConfig) -> anyhow::Result<Self> {
        let gateway: Arc<dyn DataGateway> = match &config.backend {
            GatewayBackend::Supabase { url, anon_key } => {
                info!("🔗 Usando backend alojado: {}", url);
                Arc::new(PostgrestGateway::new(url, anon_key, config.gateway_timeout)?)
            }
            GatewayBackend::Postgres { database_url } => {
                info!("🔗 Conectando a PostgreSQL: {}", mask_database_url(database_url));
                let pool = DatabaseConfig::new(database_url, config.gateway_timeout)
                    .create_pool()
                    .await?;
                Arc::new(PostgresGateway::new(pool))
            }
            GatewayBackend::Memory { seed_path } => {
                info!("🧪 Usando gateway en memoria");
                let gateway = InMemoryGateway::new();
                if let Some(path) = seed_path {
                    let raw = tokio::fs::read_to_string(path)
                        .await
                        .with_context(|| format!("Cannot read MEMORY_SEED_PATH '{}'", path))?;
                    let fixture: serde_json::Value = serde_json::from_str(&raw)
                        .with_context(|| format!("Invalid JSON fixture '{}'", path))?;
                    let loaded = gateway.load_fixture(fixture).await?;
                    info!("📥 {} filas cargadas desde {}", loaded, path);
                } else {
                    warn!("⚠️ Gateway en memoria sin MEMORY_SEED_PATH: las tablas empiezan vacías");
                }
                Arc::new(gateway)
            }
        };

        Ok(Self::new(gateway, config))
    }
}
