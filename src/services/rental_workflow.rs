//! Workflow de acciones sobre la máquina
//!
//! Checkout, check-in y mantenimiento como secuencias de escrituras remotas
//! estrictamente ordenadas y sin transacción. Tras un éxito la página recarga
//! y vuelve a resolver el estado desde cero.

use chrono::NaiveDate;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};
use validator::{Validate, ValidationErrors};

use crate::dto::{ActionOutcome, CheckoutRequest};
use crate::gateway::DataGateway;
use crate::models::{ActionKind, MachineStatus, NewRental, RentalStatus};
use crate::repositories::{MachineRepository, RentalRepository};
use crate::utils::errors::{not_found_error, AppError, AppResult};
use crate::utils::validation::validate_date;

pub struct RentalWorkflow {
    machines: MachineRepository,
    rentals: RentalRepository,
    reload_delay: Duration,
}

impl RentalWorkflow {
    pub fn new(gateway: Arc<dyn DataGateway>, reload_delay: Duration) -> Self {
        Self {
            machines: MachineRepository::new(gateway.clone()),
            rentals: RentalRepository::new(gateway),
            reload_delay,
        }
    }

    /// Checkout: insertar rental Active y marcar la máquina como "Rented".
    ///
    /// La máquina debe existir antes de insertar el rental. Si el insert falla
    /// no se toca la máquina. Si falla la actualización de la máquina, el
    /// rental queda Active y el error se devuelve igualmente.
    pub async fn checkout(&self, machine_id: &str, request: CheckoutRequest) -> AppResult<ActionOutcome> {
        request.validate()?;
        let start_date = parse_date("start_date", &request.start_date)?;
        let expected_return_date = parse_date("expected_return_date", &request.expected_return_date)?;

        if !self.machines.exists(machine_id).await? {
            return Err(not_found_error("Machine", machine_id));
        }

        let new_rental = NewRental {
            machine_id: machine_id.to_string(),
            customer_id: request.customer_id.trim().to_string(),
            operator_id: request.operator_id.trim().to_string(),
            start_date,
            expected_return_date,
            rental_status: RentalStatus::Active,
        };

        let rental = self.rentals.create(&new_rental).await.map_err(|e| {
            error!("❌ Error creando rental para '{}': {}", machine_id, e);
            e
        })?;

        if let Err(e) = self.mark(machine_id, MachineStatus::RENTED_TEXT).await {
            error!(
                "❌ Rental {:?} creado pero la máquina '{}' no se actualizó: {}",
                rental.rental_id, machine_id, e
            );
            return Err(e);
        }

        info!("✅ Checkout de '{}' registrado (rental {:?})", machine_id, rental.rental_id);
        Ok(ActionOutcome::completed(
            ActionKind::Checkout,
            "Machine checked out successfully",
            self.reload_delay,
        ))
    }

    /// Check-in: completar el rental activo y marcar la máquina como "Available".
    ///
    /// Un fallo al completar el rental se registra y se continúa con la máquina.
    pub async fn check_in(&self, machine_id: &str, confirmed: bool, today: NaiveDate) -> AppResult<ActionOutcome> {
        if !confirmed {
            return Ok(ActionOutcome::cancelled(ActionKind::CheckIn));
        }

        match self.rentals.complete_active(machine_id, today).await {
            Ok(0) => warn!("⚠️ '{}' no tenía rental activo que completar", machine_id),
            Ok(count) => info!("📦 {} rental(s) de '{}' completados", count, machine_id),
            Err(e) => warn!("⚠️ Error completando rental de '{}', se continúa: {}", machine_id, e),
        }

        self.mark(machine_id, MachineStatus::AVAILABLE_TEXT)
            .await
            .map_err(|e| {
                error!("❌ Error actualizando estado de '{}': {}", machine_id, e);
                e
            })?;

        info!("✅ Check-in de '{}' registrado", machine_id);
        Ok(ActionOutcome::completed(
            ActionKind::CheckIn,
            "Machine checked in successfully",
            self.reload_delay,
        ))
    }

    /// Mantenimiento: solo se escribe `machines.status`
    pub async fn set_maintenance(&self, machine_id: &str, confirmed: bool) -> AppResult<ActionOutcome> {
        if !confirmed {
            return Ok(ActionOutcome::cancelled(ActionKind::Maintenance));
        }

        self.mark(machine_id, MachineStatus::MAINTENANCE_TEXT)
            .await
            .map_err(|e| {
                error!("❌ Error marcando '{}' en mantenimiento: {}", machine_id, e);
                e
            })?;

        info!("🔧 '{}' marcada en mantenimiento", machine_id);
        Ok(ActionOutcome::completed(
            ActionKind::Maintenance,
            "Machine marked for maintenance",
            self.reload_delay,
        ))
    }

    /// Escribir el estado; ninguna fila actualizada cuenta como máquina inexistente
    async fn mark(&self, machine_id: &str, status: &str) -> AppResult<()> {
        match self.machines.update_status(machine_id, status).await? {
            0 => Err(not_found_error("Machine", machine_id)),
            _ => Ok(()),
        }
    }
}

fn parse_date(field: &'static str, value: &str) -> AppResult<NaiveDate> {
    validate_date(value).map_err(|e| {
        let mut errors = ValidationErrors::new();
        errors.add(field, e);
        AppError::Validation(errors)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::memory::Operation;
    use crate::gateway::{InMemoryGateway, Table};
    use serde_json::json;

    const DELAY: Duration = Duration::from_millis(1500);

    async fn gateway() -> InMemoryGateway {
        let gateway = InMemoryGateway::new();
        gateway
            .seed(Table::Machines, json!({ "machine_id": "M-200", "status": "available" }))
            .await;
        gateway
    }

    fn form() -> CheckoutRequest {
        CheckoutRequest {
            customer_id: "5".to_string(),
            operator_id: "8".to_string(),
            start_date: "2024-05-01".to_string(),
            expected_return_date: "2024-05-10".to_string(),
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 12).unwrap()
    }

    #[tokio::test]
    async fn test_checkout_with_missing_fields_writes_nothing() {
        let gateway = gateway().await;
        let workflow = RentalWorkflow::new(Arc::new(gateway.clone()), DELAY);

        for blank in 0..4 {
            let mut request = form();
            match blank {
                0 => request.customer_id.clear(),
                1 => request.operator_id = "  ".to_string(),
                2 => request.start_date.clear(),
                _ => request.expected_return_date.clear(),
            }
            let result = workflow.checkout("M-200", request).await;
            assert!(matches!(result, Err(AppError::Validation(_))));
        }

        assert!(gateway.writes().await.is_empty());
    }

    #[tokio::test]
    async fn test_checkout_with_bad_date_writes_nothing() {
        let gateway = gateway().await;
        let workflow = RentalWorkflow::new(Arc::new(gateway.clone()), DELAY);

        let mut request = form();
        request.start_date = "05/01/2024".to_string();
        assert!(matches!(
            workflow.checkout("M-200", request).await,
            Err(AppError::Validation(_))
        ));
        assert!(gateway.writes().await.is_empty());
    }

    #[tokio::test]
    async fn test_checkout_inserts_then_updates() {
        let gateway = gateway().await;
        let workflow = RentalWorkflow::new(Arc::new(gateway.clone()), DELAY);

        let outcome = workflow.checkout("M-200", form()).await.unwrap();
        assert!(outcome.performed);
        assert_eq!(outcome.reload_after_ms, Some(1500));

        let writes = gateway.writes().await;
        assert_eq!(writes.len(), 2);
        assert_eq!((writes[0].operation, writes[0].table), (Operation::Insert, Table::Rentals));
        assert_eq!(writes[0].payload["rental_status"], json!("Active"));
        assert_eq!((writes[1].operation, writes[1].table), (Operation::Update, Table::Machines));
        assert_eq!(writes[1].payload["status"], json!("Rented"));
    }

    #[tokio::test]
    async fn test_checkout_insert_failure_skips_machine_update() {
        let gateway = gateway().await;
        gateway.fail_on(Operation::Insert, Table::Rentals).await;
        let workflow = RentalWorkflow::new(Arc::new(gateway.clone()), DELAY);

        assert!(matches!(
            workflow.checkout("M-200", form()).await,
            Err(AppError::Gateway(_))
        ));
        assert!(gateway.writes().await.is_empty());
    }

    #[tokio::test]
    async fn test_checkout_machine_failure_leaves_rental_active() {
        let gateway = gateway().await;
        gateway.fail_on(Operation::Update, Table::Machines).await;
        let workflow = RentalWorkflow::new(Arc::new(gateway.clone()), DELAY);

        assert!(workflow.checkout("M-200", form()).await.is_err());
        let rentals = gateway.rows(Table::Rentals).await;
        assert_eq!(rentals.len(), 1);
        assert_eq!(rentals[0]["rental_status"], json!("Active"));
    }

    #[tokio::test]
    async fn test_check_in_completes_rental_and_frees_machine() {
        let gateway = gateway().await;
        gateway
            .seed(Table::Rentals, json!({ "rental_id": 1, "machine_id": "M-200", "rental_status": "Active" }))
            .await;
        let workflow = RentalWorkflow::new(Arc::new(gateway.clone()), DELAY);

        let outcome = workflow.check_in("M-200", true, today()).await.unwrap();
        assert!(outcome.performed);

        let rentals = gateway.rows(Table::Rentals).await;
        assert_eq!(rentals[0]["rental_status"], json!("Completed"));
        assert_eq!(rentals[0]["actual_return_date"], json!("2024-05-12"));
        let machines = gateway.rows(Table::Machines).await;
        assert_eq!(machines[0]["status"], json!("Available"));
    }

    #[tokio::test]
    async fn test_check_in_continues_when_rental_update_fails() {
        let gateway = gateway().await;
        gateway.fail_on(Operation::Update, Table::Rentals).await;
        let workflow = RentalWorkflow::new(Arc::new(gateway.clone()), DELAY);

        let outcome = workflow.check_in("M-200", true, today()).await.unwrap();
        assert!(outcome.performed);
        let machines = gateway.rows(Table::Machines).await;
        assert_eq!(machines[0]["status"], json!("Available"));
    }

    #[tokio::test]
    async fn test_check_in_surfaces_machine_failure() {
        let gateway = gateway().await;
        gateway.fail_on(Operation::Update, Table::Machines).await;
        let workflow = RentalWorkflow::new(Arc::new(gateway.clone()), DELAY);

        assert!(matches!(
            workflow.check_in("M-200", true, today()).await,
            Err(AppError::Gateway(_))
        ));
    }

    #[tokio::test]
    async fn test_unconfirmed_actions_write_nothing() {
        let gateway = gateway().await;
        let workflow = RentalWorkflow::new(Arc::new(gateway.clone()), DELAY);

        let outcome = workflow.check_in("M-200", false, today()).await.unwrap();
        assert!(!outcome.performed);
        assert_eq!(outcome.reload_after_ms, None);
        let outcome = workflow.set_maintenance("M-200", false).await.unwrap();
        assert!(!outcome.performed);

        assert!(gateway.writes().await.is_empty());
    }

    #[tokio::test]
    async fn test_maintenance_only_writes_machine_status() {
        let gateway = gateway().await;
        gateway
            .seed(Table::Rentals, json!({ "rental_id": 1, "machine_id": "M-200", "rental_status": "Active" }))
            .await;
        let workflow = RentalWorkflow::new(Arc::new(gateway.clone()), DELAY);

        workflow.set_maintenance("M-200", true).await.unwrap();

        let writes = gateway.writes().await;
        assert_eq!(writes.len(), 1);
        assert_eq!(writes[0].table, Table::Machines);
        assert_eq!(writes[0].payload["status"], json!("maintenance"));
        assert_eq!(gateway.rows(Table::Rentals).await[0]["rental_status"], json!("Active"));
    }

    #[tokio::test]
    async fn test_checkout_unknown_machine_creates_no_rental() {
        let gateway = gateway().await;
        let workflow = RentalWorkflow::new(Arc::new(gateway.clone()), DELAY);

        assert!(matches!(
            workflow.checkout("M-404", form()).await,
            Err(AppError::NotFound(_))
        ));
        assert!(gateway.writes().await.is_empty());
        assert!(gateway.rows(Table::Rentals).await.is_empty());
    }

    #[tokio::test]
    async fn test_status_writes_on_unknown_machine_are_not_found() {
        let gateway = gateway().await;
        let workflow = RentalWorkflow::new(Arc::new(gateway.clone()), DELAY);

        assert!(matches!(
            workflow.set_maintenance("M-404", true).await,
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            workflow.check_in("M-404", true, today()).await,
            Err(AppError::NotFound(_))
        ));
        assert_eq!(gateway.rows(Table::Machines).await[0]["status"], json!("available"));
    }
}
