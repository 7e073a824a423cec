//! Utilidades de validación
//!
//! Funciones helper para validar campos de formulario y convertir tipos.

use chrono::NaiveDate;
use validator::ValidationError;

/// Validar y convertir string a fecha
pub fn validate_date(value: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| {
        let mut error = ValidationError::new("date");
        error.add_param("value".into(), &value.to_string());
        error.add_param("format".into(), &"YYYY-MM-DD".to_string());
        error
    })
}

/// Validar que un string no esté vacío
pub fn validate_not_empty(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut error = ValidationError::new("not_empty");
        error.add_param("value".into(), &value.to_string());
        return Err(error);
    }
    Ok(())
}

/// Extraer el identificador de máquina de la query; `None` si falta o está vacío
pub fn machine_id_param(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_date() {
        assert!(validate_date("2024-01-15").is_ok());
        assert!(validate_date(" 2024-01-15 ").is_ok());
        assert!(validate_date("2024/01/15").is_err());
        assert!(validate_date("").is_err());
    }

    #[test]
    fn test_validate_not_empty() {
        assert!(validate_not_empty("Acme").is_ok());
        assert!(validate_not_empty("   ").is_err());
    }

    #[test]
    fn test_machine_id_param() {
        assert_eq!(machine_id_param(Some(" M-200 ")), Some("M-200".to_string()));
        assert_eq!(machine_id_param(Some("")), None);
        assert_eq!(machine_id_param(None), None);
    }
}
