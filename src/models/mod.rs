//! Modelos del sistema
//!
//! Este módulo contiene los modelos de datos que mapean las tablas del
//! gateway (`machines`, `model`, `rentals`, `customers`, `operators`) y el
//! view model que se construye en cada carga de página.

pub mod machine;
pub mod party;
pub mod rental;
pub mod view;

pub use machine::*;
pub use party::*;
pub use rental::*;
pub use view::*;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Identificadores: el backend puede devolverlos como texto o como entero
pub fn de_ident<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "invalid identifier: {}",
            other
        ))),
    }
}

/// Igual que `de_ident` pero tolera null
pub fn de_opt_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(other) => Err(serde::de::Error::custom(format!(
            "invalid text value: {}",
            other
        ))),
    }
}

/// Fechas: acepta `YYYY-MM-DD` o un timestamp ISO (se toma la parte de fecha)
pub fn de_opt_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(text) => {
            let date_part = text.get(..10).unwrap_or(text);
            NaiveDate::parse_from_str(date_part, "%Y-%m-%d")
                .map(Some)
                .map_err(serde::de::Error::custom)
        }
    }
}
