//! View model de la página de máquina
//!
//! Se reconstruye en cada carga: fila de `machines` + fila de `model`
//! (superpuesta) + rental activo opcional. El estado efectivo se deriva de la
//! existencia del rental activo, nunca del texto de `machines.status`.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use tracing::warn;

use super::{de_ident, de_opt_date, de_opt_text, ActiveRental, Machine, MachineStatus, ModelRecord};

/// Estado efectivo de la máquina
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RentalState {
    Available,
    Rented,
    Maintenance,
}

impl RentalState {
    /// El rental activo manda; el texto declarado solo distingue mantenimiento
    pub fn reconcile(has_active_rental: bool, declared: &MachineStatus) -> Self {
        if has_active_rental {
            RentalState::Rented
        } else if *declared == MachineStatus::Maintenance {
            RentalState::Maintenance
        } else {
            RentalState::Available
        }
    }

    /// Controles que la presentación debe ofrecer en este estado
    pub fn offered_actions(&self) -> Vec<ActionKind> {
        match self {
            RentalState::Available => vec![ActionKind::Checkout, ActionKind::Maintenance],
            RentalState::Rented => vec![ActionKind::CheckIn, ActionKind::Maintenance],
            // check-in sin rental activo devuelve la máquina a "Available"
            RentalState::Maintenance => vec![ActionKind::Checkout, ActionKind::CheckIn],
        }
    }
}

/// Transiciones disponibles
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    Checkout,
    CheckIn,
    Maintenance,
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ActionKind::Checkout => "checkout",
            ActionKind::CheckIn => "check-in",
            ActionKind::Maintenance => "maintenance",
        };
        f.write_str(label)
    }
}

/// Atributos de máquina con los del modelo ya superpuestos
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MachineAttributes {
    #[serde(deserialize_with = "de_ident")]
    pub machine_id: String,
    #[serde(default, deserialize_with = "de_opt_text")]
    pub serial_number: Option<String>,
    #[serde(default, deserialize_with = "de_opt_text")]
    pub model_id: Option<String>,
    #[serde(default, deserialize_with = "de_opt_text")]
    pub model_name: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default, serialize_with = "rust_decimal::serde::float_option::serialize")]
    pub capacity: Option<Decimal>,
    #[serde(default, deserialize_with = "de_opt_date")]
    pub purchase_date: Option<NaiveDate>,
    /// Texto crudo de `machines.status`
    #[serde(default)]
    pub status: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// View model completo
#[derive(Debug, Clone, Serialize)]
pub struct MachineView {
    #[serde(flatten)]
    pub attributes: MachineAttributes,
    pub rental_data: Option<ActiveRental>,
    pub rented: bool,
    pub state: RentalState,
    pub actions: Vec<ActionKind>,
    pub title: String,
    pub description: String,
}

impl MachineView {
    /// Superponer modelo sobre máquina y adjuntar el rental activo.
    ///
    /// Las columnas nulas del modelo no pisan las de la máquina. Si la
    /// superposición no encaja en los tipos de la máquina, se descartan las
    /// columnas extra del modelo y solo se conservan su id y su nombre.
    pub fn merge(
        machine: Machine,
        model: Option<ModelRecord>,
        rental: Option<ActiveRental>,
    ) -> Result<Self, serde_json::Error> {
        let base = match serde_json::to_value(&machine)? {
            Value::Object(map) => map,
            _ => Map::new(),
        };

        let Some(model) = model else {
            let attributes: MachineAttributes = serde_json::from_value(Value::Object(base))?;
            return Ok(Self::from_parts(attributes, rental));
        };

        let mut merged = base.clone();
        if let Value::Object(fields) = serde_json::to_value(&model)? {
            merged.extend(fields.into_iter().filter(|(_, value)| !value.is_null()));
        }

        let attributes = match serde_json::from_value::<MachineAttributes>(Value::Object(merged)) {
            Ok(attributes) => attributes,
            Err(e) => {
                warn!(
                    "⚠️ Columnas del modelo incompatibles con la máquina '{}', se ignoran: {}",
                    machine.machine_id, e
                );
                let mut attributes: MachineAttributes = serde_json::from_value(Value::Object(base))?;
                if model.model_id.is_some() {
                    attributes.model_id = model.model_id;
                }
                attributes.model_name = model.model_name;
                attributes
            }
        };

        Ok(Self::from_parts(attributes, rental))
    }

    pub fn from_parts(attributes: MachineAttributes, rental: Option<ActiveRental>) -> Self {
        let rented = rental.is_some();
        let declared = MachineStatus::from_raw(attributes.status.as_deref());
        let state = RentalState::reconcile(rented, &declared);

        let model_name = attributes.model_name.as_deref().unwrap_or("N/A");
        let title = format!("{} - Machine {}", model_name, attributes.machine_id);
        let description = format!(
            "Model: {}, Category: {}, Capacity: {} tons",
            model_name,
            attributes.category.as_deref().unwrap_or("N/A"),
            attributes
                .capacity
                .map(|c| c.to_string())
                .unwrap_or_else(|| "N/A".to_string()),
        );

        Self {
            attributes,
            rental_data: rental,
            rented,
            state,
            actions: state.offered_actions(),
            title,
            description,
        }
    }

    pub fn offers(&self, action: ActionKind) -> bool {
        self.actions.contains(&action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Rental;
    use serde_json::json;

    fn machine(status: &str) -> Machine {
        serde_json::from_value(json!({
            "machine_id": "M-200",
            "serial_number": "SN-200",
            "model_id": 4,
            "category": "Excavator",
            "capacity": 12,
            "status": status
        }))
        .unwrap()
    }

    fn active_rental() -> ActiveRental {
        let rental: Rental = serde_json::from_value(json!({
            "rental_id": 1,
            "machine_id": "M-200",
            "customer_id": 9,
            "rental_status": "Active"
        }))
        .unwrap();
        ActiveRental {
            rental,
            customer_name: Some("Acme".to_string()),
            operator_name: None,
        }
    }

    #[test]
    fn test_active_rental_wins_over_declared_status() {
        let view = MachineView::merge(machine("available"), None, Some(active_rental())).unwrap();
        assert!(view.rented);
        assert_eq!(view.state, RentalState::Rented);
        assert!(view.offers(ActionKind::CheckIn));
        assert!(!view.offers(ActionKind::Checkout));
    }

    #[test]
    fn test_declared_rented_without_rental_is_available() {
        let view = MachineView::merge(machine("Rented"), None, None).unwrap();
        assert!(!view.rented);
        assert_eq!(view.state, RentalState::Available);
        assert!(view.offers(ActionKind::Checkout));
    }

    #[test]
    fn test_maintenance_is_kept_when_not_rented() {
        let view = MachineView::merge(machine("Maintenance"), None, None).unwrap();
        assert_eq!(view.state, RentalState::Maintenance);
    }

    #[test]
    fn test_model_fields_overlay_machine_fields() {
        let model: ModelRecord = serde_json::from_value(json!({
            "model_id": 4,
            "model_name": "CAT 320",
            "category": "Heavy Excavator"
        }))
        .unwrap();

        let view = MachineView::merge(machine("available"), Some(model), None).unwrap();
        assert_eq!(view.attributes.model_name.as_deref(), Some("CAT 320"));
        assert_eq!(view.attributes.category.as_deref(), Some("Heavy Excavator"));
        assert_eq!(view.attributes.serial_number.as_deref(), Some("SN-200"));
        assert_eq!(view.title, "CAT 320 - Machine M-200");
        assert_eq!(
            view.description,
            "Model: CAT 320, Category: Heavy Excavator, Capacity: 12 tons"
        );
    }

    #[test]
    fn test_view_serializes_rental_sub_field() {
        let view = MachineView::merge(machine("available"), None, Some(active_rental())).unwrap();
        let value = serde_json::to_value(&view).unwrap();
        assert_eq!(value["rented"], json!(true));
        assert_eq!(value["rental_data"]["customer_name"], json!("Acme"));
        assert_eq!(value["machine_id"], json!("M-200"));
        assert_eq!(value["title"], json!("N/A - Machine M-200"));
    }

    #[test]
    fn test_null_model_column_keeps_machine_value() {
        let model: ModelRecord = serde_json::from_value(json!({
            "model_id": 4,
            "model_name": "Genie S-65",
            "category": null
        }))
        .unwrap();

        let view = MachineView::merge(machine("available"), Some(model), None).unwrap();
        assert_eq!(view.attributes.category.as_deref(), Some("Excavator"));
        assert_eq!(view.attributes.model_name.as_deref(), Some("Genie S-65"));
    }

    #[test]
    fn test_mistyped_model_column_falls_back_to_machine_attributes() {
        let model: ModelRecord = serde_json::from_value(json!({
            "model_id": 4,
            "model_name": "CAT 320",
            "capacity": "20 t"
        }))
        .unwrap();

        let view = MachineView::merge(machine("available"), Some(model), None).unwrap();
        assert_eq!(view.attributes.capacity, Some(Decimal::from(12)));
        assert_eq!(view.attributes.model_name.as_deref(), Some("CAT 320"));
        assert_eq!(view.title, "CAT 320 - Machine M-200");
    }

    #[test]
    fn test_capacity_serializes_as_number() {
        let view = MachineView::merge(machine("available"), None, None).unwrap();
        let value = serde_json::to_value(&view).unwrap();
        assert_eq!(value["capacity"], json!(12.0));
    }
}
