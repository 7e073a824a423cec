//! Cliente HTTP para el backend alojado (dialecto REST de PostgREST)
//!
//! Las tablas se exponen en `<base>/rest/v1/<tabla>` y los filtros se
//! expresan como parámetros `columna=eq.valor`.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, error};

use super::{scalar_text, validate_column, DataGateway, Filter, GatewayError, Row, Table};

/// Cliente del gateway alojado
#[derive(Clone)]
pub struct PostgrestGateway {
    client: Client,
    base_url: String,
    anon_key: String,
}

impl PostgrestGateway {
    /// Crear nuevo cliente con URL base y clave anónima
    pub fn new(base_url: &str, anon_key: &str, timeout: Duration) -> Result<Self, GatewayError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            anon_key: anon_key.to_string(),
        })
    }

    fn table_url(&self, table: Table) -> String {
        format!("{}/rest/v1/{}", self.base_url, table.name())
    }

    /// Parámetros de query para un filtro
    fn filter_params(filter: &Filter) -> Result<Vec<(String, String)>, GatewayError> {
        filter
            .conditions()
            .iter()
            .map(|(column, value)| {
                validate_column(column)?;
                Ok((column.clone(), format!("eq.{}", scalar_text(value))))
            })
            .collect()
    }

    fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
        builder
            .header("apikey", &self.anon_key)
            .bearer_auth(&self.anon_key)
            .header("Accept", "application/json")
    }

    async fn rows(response: Response) -> Result<Vec<Row>, GatewayError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("❌ Gateway respondió {}: {}", status, body);
            return Err(GatewayError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let rows: Vec<Value> = response.json().await?;
        Ok(rows
            .into_iter()
            .filter_map(|row| match row {
                Value::Object(map) => Some(map),
                _ => None,
            })
            .collect())
    }
}

#[async_trait]
impl DataGateway for PostgrestGateway {
    async fn select(&self, table: Table, filter: &Filter) -> Result<Vec<Row>, GatewayError> {
        let mut params = vec![("select".to_string(), "*".to_string())];
        params.extend(Self::filter_params(filter)?);
        debug!("📥 SELECT {} {:?}", table, params);

        let response = self
            .authorized(self.client.get(self.table_url(table)))
            .query(&params)
            .send()
            .await?;

        Self::rows(response).await
    }

    async fn insert(&self, table: Table, record: Row) -> Result<Row, GatewayError> {
        debug!("💾 INSERT {} {:?}", table, record);

        let response = self
            .authorized(self.client.post(self.table_url(table)))
            .header("Prefer", "return=representation")
            .json(&record)
            .send()
            .await?;

        Self::rows(response).await?.into_iter().next().ok_or_else(|| {
            GatewayError::Unavailable(format!("insert into {} returned no row", table))
        })
    }

    async fn update(&self, table: Table, filter: &Filter, patch: Row) -> Result<Vec<Row>, GatewayError> {
        let params = Self::filter_params(filter)?;
        debug!("✏️ UPDATE {} {:?} {:?}", table, params, patch);

        let response = self
            .authorized(self.client.patch(self.table_url(table)))
            .header("Prefer", "return=representation")
            .query(&params)
            .json(&patch)
            .send()
            .await?;

        Self::rows(response).await
    }
}
