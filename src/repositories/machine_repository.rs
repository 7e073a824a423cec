use crate::gateway::{from_row, DataGateway, Filter, Table};
use crate::models::{Machine, ModelRecord};
use crate::utils::errors::AppError;
use serde_json::{json, Map};
use std::sync::Arc;
use tracing::warn;

pub struct MachineRepository {
    gateway: Arc<dyn DataGateway>,
}

impl MachineRepository {
    pub fn new(gateway: Arc<dyn DataGateway>) -> Self {
        Self { gateway }
    }

    pub async fn find_by_id(&self, machine_id: &str) -> Result<Option<Machine>, AppError> {
        let rows = self
            .gateway
            .select(Table::Machines, &Filter::new().eq("machine_id", machine_id))
            .await?;

        if rows.len() > 1 {
            warn!("⚠️ {} filas en machines para machine_id '{}'", rows.len(), machine_id);
        }

        match rows.into_iter().next() {
            Some(row) => Ok(Some(from_row(row)?)),
            None => Ok(None),
        }
    }

    /// Comprobar que la fila existe sin decodificarla
    pub async fn exists(&self, machine_id: &str) -> Result<bool, AppError> {
        let rows = self
            .gateway
            .select(Table::Machines, &Filter::new().eq("machine_id", machine_id))
            .await?;
        Ok(!rows.is_empty())
    }

    /// Escribir `machines.status`; devuelve cuántas filas se actualizaron
    pub async fn update_status(&self, machine_id: &str, status: &str) -> Result<usize, AppError> {
        let mut patch = Map::new();
        patch.insert("status".to_string(), json!(status));

        let updated = self
            .gateway
            .update(Table::Machines, &Filter::new().eq("machine_id", machine_id), patch)
            .await?;

        if updated.is_empty() {
            warn!("⚠️ Ninguna máquina actualizada para machine_id '{}'", machine_id);
        }

        Ok(updated.len())
    }
}

pub struct ModelRepository {
    gateway: Arc<dyn DataGateway>,
}

impl ModelRepository {
    pub fn new(gateway: Arc<dyn DataGateway>) -> Self {
        Self { gateway }
    }

    pub async fn find_by_id(&self, model_id: &str) -> Result<Option<ModelRecord>, AppError> {
        let rows = self
            .gateway
            .select(Table::Model, &Filter::new().eq("model_id", model_id))
            .await?;

        match rows.into_iter().next() {
            Some(row) => Ok(Some(from_row(row)?)),
            None => Ok(None),
        }
    }
}
