//! Sistema de manejo de errores
//!
//! Este módulo define los tipos de errores del sistema y su conversión a
//! respuestas HTTP. Solo se devuelve texto legible; los códigos sirven para
//! que la presentación elija la vista (error terminal vs. mensaje transitorio).

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::gateway::GatewayError;

/// Errores principales de la aplicación
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Gateway error: {0}")]
    Gateway(#[from] GatewayError),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),
}

/// Respuesta de error para la API
#[derive(Debug, serde::Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    code: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_response) = match self {
            AppError::NotFound(msg) => {
                tracing::warn!("🔍 Resource not found: {}", msg);
                (
                    StatusCode::NOT_FOUND,
                    ErrorResponse {
                        error: "Not Found".to_string(),
                        message: msg,
                        details: None,
                        code: Some("NOT_FOUND".to_string()),
                    },
                )
            }

            AppError::Gateway(e) => {
                tracing::error!("❌ Gateway error: {}", e);
                (
                    StatusCode::BAD_GATEWAY,
                    ErrorResponse {
                        error: "Gateway Error".to_string(),
                        message: "An error occurred while communicating with the data service".to_string(),
                        details: Some(json!({ "gateway_error": e.to_string() })),
                        code: Some("GATEWAY_ERROR".to_string()),
                    },
                )
            }

            AppError::Validation(e) => {
                tracing::warn!("⚠️ Validation error: {}", e);
                (
                    StatusCode::BAD_REQUEST,
                    ErrorResponse {
                        error: "Validation Error".to_string(),
                        message: validation_message(&e).to_string(),
                        details: Some(json!(e)),
                        code: Some("VALIDATION_ERROR".to_string()),
                    },
                )
            }
        };

        (status, Json(error_response)).into_response()
    }
}

/// Mensaje legible según el validador que falló
fn validation_message(errors: &validator::ValidationErrors) -> &'static str {
    let bad_date = errors
        .field_errors()
        .values()
        .flat_map(|errors| errors.iter())
        .any(|error| error.code == "date");

    if bad_date {
        "Dates must use the YYYY-MM-DD format"
    } else {
        "Please fill in all required fields"
    }
}

/// Resultado tipado para operaciones que pueden fallar
pub type AppResult<T> = Result<T, AppError>;

/// Función helper para crear errores de recurso no encontrado
pub fn not_found_error(resource: &str, id: &str) -> AppError {
    AppError::NotFound(format!("{} with id '{}' not found", resource, id))
}
