//! Modelo de Machine
//!
//! Mapea la tabla `machines` y la tabla `model`. El campo `status` es texto
//! libre con mayúsculas inconsistentes; se normaliza en `MachineStatus`.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{de_ident, de_opt_date, de_opt_text};

/// Estado declarado en `machines.status`, normalizado
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MachineStatus {
    Available,
    Rented,
    Maintenance,
    Unknown(String),
}

impl MachineStatus {
    /// Valores escritos por el workflow en `machines.status`
    pub const RENTED_TEXT: &'static str = "Rented";
    pub const AVAILABLE_TEXT: &'static str = "Available";
    pub const MAINTENANCE_TEXT: &'static str = "maintenance";

    /// Normalizar el texto libre (sin distinguir mayúsculas)
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "available" => MachineStatus::Available,
            "rented" => MachineStatus::Rented,
            "maintenance" => MachineStatus::Maintenance,
            _ => MachineStatus::Unknown(raw.to_string()),
        }
    }

    pub fn from_raw(raw: Option<&str>) -> Self {
        raw.map(Self::parse)
            .unwrap_or_else(|| MachineStatus::Unknown(String::new()))
    }
}

/// Machine - fila de la tabla machines
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Machine {
    #[serde(deserialize_with = "de_ident")]
    pub machine_id: String,
    #[serde(default, deserialize_with = "de_opt_text")]
    pub serial_number: Option<String>,
    #[serde(default, deserialize_with = "de_opt_text")]
    pub model_id: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default, serialize_with = "rust_decimal::serde::float_option::serialize")]
    pub capacity: Option<Decimal>,
    #[serde(default, deserialize_with = "de_opt_date")]
    pub purchase_date: Option<NaiveDate>,
    #[serde(default)]
    pub status: Option<String>,
    /// Columnas adicionales que no se tipan
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Model - fila de la tabla model (solo lectura)
///
/// Los campos ausentes no se serializan para no pisar los de la máquina al
/// superponerlos.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelRecord {
    #[serde(default, deserialize_with = "de_opt_text", skip_serializing_if = "Option::is_none")]
    pub model_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_name: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
