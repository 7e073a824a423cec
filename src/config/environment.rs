//! Configuración de variables de entorno
//!
//! Este módulo maneja la configuración del entorno: servidor HTTP, backend de
//! datos y el retardo de recarga tras una acción.

use anyhow::{anyhow, Context, Result};
use std::env;
use std::time::Duration;

/// Backend de datos seleccionado con `GATEWAY_BACKEND`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayBackend {
    /// Servicio alojado (REST)
    Supabase { url: String, anon_key: String },
    /// Conexión directa a PostgreSQL
    Postgres { database_url: String },
    /// Tablas en memoria (desarrollo local), opcionalmente cargadas desde un fixture JSON
    Memory { seed_path: Option<String> },
}

/// Configuración del entorno
#[derive(Debug, Clone)]
pub struct EnvironmentConfig {
    pub environment: String,
    pub port: u16,
    pub host: String,
    pub cors_origins: Vec<String>,
    pub backend: GatewayBackend,
    pub gateway_timeout: Duration,
    pub reload_delay: Duration,
}

impl EnvironmentConfig {
    /// Leer la configuración de las variables de entorno del proceso
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| lookup(key).ok_or_else(|| anyhow!("{} must be set", key));

        let port = match lookup("PORT") {
            Some(port) => port.parse().context("PORT must be a valid number")?,
            None => 3000,
        };

        let backend = match lookup("GATEWAY_BACKEND")
            .unwrap_or_else(|| "supabase".to_string())
            .to_lowercase()
            .as_str()
        {
            "supabase" => GatewayBackend::Supabase {
                url: required("SUPABASE_URL")?,
                anon_key: required("SUPABASE_ANON_KEY")?,
            },
            "postgres" => GatewayBackend::Postgres {
                database_url: required("DATABASE_URL")?,
            },
            "memory" => GatewayBackend::Memory {
                seed_path: lookup("MEMORY_SEED_PATH").filter(|path| !path.trim().is_empty()),
            },
            other => return Err(anyhow!("Unknown GATEWAY_BACKEND '{}'", other)),
        };

        let gateway_timeout = match lookup("GATEWAY_TIMEOUT_SECS") {
            Some(secs) => Duration::from_secs(
                secs.parse().context("GATEWAY_TIMEOUT_SECS must be a valid number")?,
            ),
            None => Duration::from_secs(30),
        };

        let reload_delay = match lookup("RELOAD_DELAY_MS") {
            Some(ms) => Duration::from_millis(
                ms.parse().context("RELOAD_DELAY_MS must be a valid number")?,
            ),
            None => Duration::from_millis(1500),
        };

        Ok(Self {
            environment: lookup("ENVIRONMENT").unwrap_or_else(|| "development".to_string()),
            port,
            host: lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            cors_origins: lookup("CORS_ORIGINS")
                .map(|origins| {
                    origins
                        .split(',')
                        .map(|s| s.trim().to_string())
                        .filter(|s| !s.is_empty())
                        .collect()
                })
                .unwrap_or_default(),
            backend,
            gateway_timeout,
            reload_delay,
        })
    }

    /// Verificar si estamos en modo desarrollo
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    pub fn backend_name(&self) -> &'static str {
        match self.backend {
            GatewayBackend::Supabase { .. } => "supabase",
            GatewayBackend::Postgres { .. } => "postgres",
            GatewayBackend::Memory { .. } => "memory",
        }
    }

    /// Obtener la dirección del servidor
    pub fn server_url(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_with_supabase() {
        let config = EnvironmentConfig::from_lookup(lookup(&[
            ("SUPABASE_URL", "https://demo.supabase.co"),
            ("SUPABASE_ANON_KEY", "anon"),
        ]))
        .unwrap();

        assert_eq!(config.port, 3000);
        assert_eq!(config.reload_delay, Duration::from_millis(1500));
        assert!(config.is_development());
        assert_eq!(
            config.backend,
            GatewayBackend::Supabase {
                url: "https://demo.supabase.co".to_string(),
                anon_key: "anon".to_string(),
            }
        );
    }

    #[test]
    fn test_supabase_requires_credentials() {
        assert!(EnvironmentConfig::from_lookup(lookup(&[])).is_err());
    }

    #[test]
    fn test_memory_backend_and_overrides() {
        let config = EnvironmentConfig::from_lookup(lookup(&[
            ("GATEWAY_BACKEND", "memory"),
            ("PORT", "8080"),
            ("RELOAD_DELAY_MS", "2000"),
            ("CORS_ORIGINS", "http://a.test, http://b.test"),
            ("MEMORY_SEED_PATH", "fixtures/machines.json"),
        ]))
        .unwrap();

        assert_eq!(
            config.backend,
            GatewayBackend::Memory {
                seed_path: Some("fixtures/machines.json".to_string())
            }
        );
        assert_eq!(config.backend_name(), "memory");
        assert_eq!(config.server_url(), "0.0.0.0:8080");
        assert_eq!(config.reload_delay, Duration::from_millis(2000));
        assert_eq!(config.cors_origins, vec!["http://a.test", "http://b.test"]);
    }

    #[test]
    fn test_unknown_backend_is_rejected() {
        assert!(EnvironmentConfig::from_lookup(lookup(&[("GATEWAY_BACKEND", "mongo")])).is_err());
    }
}
