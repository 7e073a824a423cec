//! Clientes y operadores (solo lectura, para los selectores del formulario)

use serde::{Deserialize, Serialize};

use super::{de_ident, de_opt_text};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Customer {
    #[serde(deserialize_with = "de_ident")]
    pub customer_id: String,
    #[serde(default, deserialize_with = "de_opt_text")]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Operator {
    #[serde(deserialize_with = "de_ident")]
    pub operator_id: String,
    #[serde(default, deserialize_with = "de_opt_text")]
    pub name: Option<String>,
}
