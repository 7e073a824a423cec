//! Gateway de datos remoto
//!
//! Este módulo define la interfaz con el backend relacional alojado.
//! Toda la persistencia y el filtrado ocurren del lado del gateway; aquí solo
//! se describen las operaciones `select`, `insert` y `update` por tabla.

pub mod memory;
pub mod postgres;
pub mod postgrest;

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

pub use memory::InMemoryGateway;
pub use postgres::PostgresGateway;
pub use postgrest::PostgrestGateway;

/// Fila devuelta por el gateway (objeto JSON)
pub type Row = Map<String, Value>;

/// Tablas expuestas por el backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Table {
    Machines,
    Model,
    Rentals,
    Customers,
    Operators,
}

impl Table {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "machines" => Some(Table::Machines),
            "model" => Some(Table::Model),
            "rentals" => Some(Table::Rentals),
            "customers" => Some(Table::Customers),
            "operators" => Some(Table::Operators),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Table::Machines => "machines",
            Table::Model => "model",
            Table::Rentals => "rentals",
            Table::Customers => "customers",
            Table::Operators => "operators",
        }
    }
}

impl std::fmt::Display for Table {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Filtro de igualdad `columna = valor`, combinado con AND
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Filter {
    conditions: Vec<(String, Value)>,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Agregar una condición de igualdad
    pub fn eq(mut self, column: &str, value: impl Into<Value>) -> Self {
        self.conditions.push((column.to_string(), value.into()));
        self
    }

    pub fn conditions(&self) -> &[(String, Value)] {
        &self.conditions
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    /// Verificar si una fila cumple todas las condiciones.
    /// Los valores se comparan como texto para tolerar ids numéricos vs. string.
    pub fn matches(&self, row: &Row) -> bool {
        self.conditions.iter().all(|(column, expected)| {
            row.get(column)
                .map(|actual| scalar_text(actual) == scalar_text(expected))
                .unwrap_or(false)
        })
    }
}

/// Representación textual de un escalar JSON (sin comillas para strings)
pub fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Errores del gateway remoto
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Gateway returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Decode error: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Invalid column name: {0}")]
    InvalidColumn(String),

    #[error("Unknown table: {0}")]
    UnknownTable(String),

    #[error("Gateway unavailable: {0}")]
    Unavailable(String),
}

/// Operaciones con ámbito de tabla del backend alojado
#[async_trait]
pub trait DataGateway: Send + Sync {
    /// Seleccionar filas que cumplen el filtro
    async fn select(&self, table: Table, filter: &Filter) -> Result<Vec<Row>, GatewayError>;

    /// Insertar un registro y devolver la fila creada
    async fn insert(&self, table: Table, record: Row) -> Result<Row, GatewayError>;

    /// Actualizar las filas que cumplen el filtro y devolverlas
    async fn update(&self, table: Table, filter: &Filter, patch: Row) -> Result<Vec<Row>, GatewayError>;
}

/// Convertir un valor serializable en una fila JSON
pub fn to_row<T: Serialize>(value: &T) -> Result<Row, GatewayError> {
    match serde_json::to_value(value)? {
        Value::Object(map) => Ok(map),
        other => Err(GatewayError::Unavailable(format!(
            "expected a JSON object, got {}",
            other
        ))),
    }
}

/// Decodificar una fila en un tipo del dominio
pub fn from_row<T: DeserializeOwned>(row: Row) -> Result<T, GatewayError> {
    Ok(serde_json::from_value(Value::Object(row))?)
}

/// Validar que un nombre de columna sea un identificador simple
pub fn validate_column(column: &str) -> Result<(), GatewayError> {
    let mut chars = column.chars();
    let valid = match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    };

    if valid {
        Ok(())
    } else {
        Err(GatewayError::InvalidColumn(column.to_string()))
    }
}
