//! Modelo de Rental
//!
//! Un rental `Active` marca la máquina como alquilada. Solo debería existir
//! uno activo por máquina, pero el backend no lo garantiza.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{de_ident, de_opt_date, de_opt_text};

/// Estado del rental - valores enumerados de `rentals.rental_status`
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum RentalStatus {
    Active,
    Completed,
}

impl RentalStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RentalStatus::Active => "Active",
            RentalStatus::Completed => "Completed",
        }
    }
}

/// Rental - fila de la tabla rentals
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Rental {
    #[serde(default, deserialize_with = "de_opt_text")]
    pub rental_id: Option<String>,
    #[serde(deserialize_with = "de_ident")]
    pub machine_id: String,
    #[serde(default, deserialize_with = "de_opt_text")]
    pub customer_id: Option<String>,
    #[serde(default, deserialize_with = "de_opt_text")]
    pub operator_id: Option<String>,
    #[serde(default, deserialize_with = "de_opt_date")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "de_opt_date")]
    pub expected_return_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "de_opt_date")]
    pub actual_return_date: Option<NaiveDate>,
    #[serde(default)]
    pub rental_status: Option<String>,
}

/// Request para insertar un rental nuevo
#[derive(Debug, Clone, Serialize)]
pub struct NewRental {
    pub machine_id: String,
    pub customer_id: String,
    pub operator_id: String,
    pub start_date: NaiveDate,
    pub expected_return_date: NaiveDate,
    pub rental_status: RentalStatus,
}

/// Rental activo con los nombres de cliente y operador desnormalizados
#[derive(Debug, Clone, Serialize)]
pub struct ActiveRental {
    #[serde(flatten)]
    pub rental: Rental,
    pub customer_name: Option<String>,
    pub operator_name: Option<String>,
}
