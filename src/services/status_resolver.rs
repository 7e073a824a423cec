//! Resolución del estado de una máquina
//!
//! Construye el view model a partir de tres lecturas secuenciales: máquina,
//! modelo y rental activo. Solo la lectura de la máquina es fatal; las otras
//! dos degradan a datos parciales o a "sin rental".

use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::gateway::{DataGateway, GatewayError};
use crate::models::{ActiveRental, MachineView, ModelRecord};
use crate::repositories::{
    CustomerRepository, MachineRepository, ModelRepository, OperatorRepository, RentalRepository,
};
use crate::utils::errors::{not_found_error, AppError, AppResult};

pub struct StatusResolver {
    machines: MachineRepository,
    models: ModelRepository,
    rentals: RentalRepository,
    customers: CustomerRepository,
    operators: OperatorRepository,
}

impl StatusResolver {
    pub fn new(gateway: Arc<dyn DataGateway>) -> Self {
        Self {
            machines: MachineRepository::new(gateway.clone()),
            models: ModelRepository::new(gateway.clone()),
            rentals: RentalRepository::new(gateway.clone()),
            customers: CustomerRepository::new(gateway.clone()),
            operators: OperatorRepository::new(gateway),
        }
    }

    /// Resolver el view model de una máquina
    pub async fn resolve(&self, machine_id: &str) -> AppResult<MachineView> {
        info!("🔍 Resolviendo máquina '{}'", machine_id);

        let machine = self
            .machines
            .find_by_id(machine_id)
            .await?
            .ok_or_else(|| not_found_error("Machine", machine_id))?;

        let model = match machine.model_id.as_deref() {
            Some(model_id) => self.model(model_id).await,
            None => None,
        };

        let rental = self.active_rental(machine_id).await;

        let view = MachineView::merge(machine, model, rental)
            .map_err(|e| AppError::Gateway(GatewayError::Decode(e)))?;

        debug!(
            "✅ Máquina '{}' resuelta: rented={} state={:?}",
            machine_id, view.rented, view.state
        );
        Ok(view)
    }

    async fn model(&self, model_id: &str) -> Option<ModelRecord> {
        match self.models.find_by_id(model_id).await {
            Ok(model) => model,
            Err(e) => {
                warn!("⚠️ Error obteniendo modelo '{}', se continúa sin datos de modelo: {}", model_id, e);
                None
            }
        }
    }

    /// Rental activo con nombres desnormalizados; cualquier fallo cuenta como "sin rental"
    async fn active_rental(&self, machine_id: &str) -> Option<ActiveRental> {
        let rentals = match self.rentals.find_active_by_machine(machine_id).await {
            Ok(rentals) => rentals,
            Err(e) => {
                warn!("⚠️ Error obteniendo rental activo de '{}', se asume sin rental: {}", machine_id, e);
                return None;
            }
        };

        if rentals.len() > 1 {
            warn!(
                "⚠️ {} rentals activos para la máquina '{}', se usa el primero",
                rentals.len(),
                machine_id
            );
        }

        let rental = rentals.into_iter().next()?;

        let customer_name = match rental.customer_id.as_deref() {
            Some(id) => self.customers.find_name(id).await.unwrap_or_else(|e| {
                warn!("⚠️ Error obteniendo cliente '{}': {}", id, e);
                None
            }),
            None => None,
        };

        let operator_name = match rental.operator_id.as_deref() {
            Some(id) => self.operators.find_name(id).await.unwrap_or_else(|e| {
                warn!("⚠️ Error obteniendo operador '{}': {}", id, e);
                None
            }),
            None => None,
        };

        Some(ActiveRental {
            rental,
            customer_name,
            operator_name,
        })
    }
}
