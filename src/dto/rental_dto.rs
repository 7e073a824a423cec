use serde::{Deserialize, Serialize};
use std::time::Duration;
use validator::Validate;

use crate::models::ActionKind;
use crate::utils::validation::validate_not_empty;

// Formulario del modal de checkout
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct CheckoutRequest {
    #[serde(default)]
    #[validate(custom = "validate_not_empty")]
    pub customer_id: String,

    #[serde(default)]
    #[validate(custom = "validate_not_empty")]
    pub operator_id: String,

    #[serde(default)]
    #[validate(custom = "validate_not_empty")]
    pub start_date: String,

    #[serde(default)]
    #[validate(custom = "validate_not_empty")]
    pub expected_return_date: String,
}

// Confirmación sí/no de check-in y mantenimiento
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct ConfirmRequest {
    #[serde(default)]
    pub confirmed: bool,
}

// Resultado de una transición; la página recarga tras `reload_after_ms`
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ActionOutcome {
    pub action: ActionKind,
    pub performed: bool,
    pub message: String,
    pub reload_after_ms: Option<u64>,
}

impl ActionOutcome {
    pub fn completed(action: ActionKind, message: &str, reload_after: Duration) -> Self {
        Self {
            action,
            performed: true,
            message: message.to_string(),
            reload_after_ms: Some(reload_after.as_millis() as u64),
        }
    }

    pub fn cancelled(action: ActionKind) -> Self {
        Self {
            action,
            performed: false,
            message: format!("{} cancelled", action),
            reload_after_ms: None,
        }
    }
}
