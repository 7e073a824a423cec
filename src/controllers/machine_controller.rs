use crate::dto::{ActionOutcome, ApiResponse, CheckoutRequest, ConfirmRequest};
use crate::gateway::DataGateway;
use crate::models::MachineView;
use crate::services::{RentalWorkflow, StatusResolver};
use crate::utils::errors::{AppError, AppResult};
use crate::utils::validation::machine_id_param;
use chrono::{Local, NaiveDate};
use std::sync::Arc;
use std::time::Duration;

pub struct MachineController {
    resolver: StatusResolver,
    workflow: RentalWorkflow,
}

impl MachineController {
    pub fn new(gateway: Arc<dyn DataGateway>, reload_delay: Duration) -> Self {
        Self {
            resolver: StatusResolver::new(gateway.clone()),
            workflow: RentalWorkflow::new(gateway, reload_delay),
        }
    }

    /// Carga de página: sin identificador no hay vista de información
    pub async fn get_machine(&self, machine_id: Option<&str>) -> AppResult<ApiResponse<MachineView>> {
        let machine_id = machine_id_param(machine_id)
            .ok_or_else(|| AppError::NotFound("No machine_id provided".to_string()))?;

        let view = self.resolver.resolve(&machine_id).await?;
        Ok(ApiResponse::success(view))
    }

    pub async fn checkout(
        &self,
        machine_id: &str,
        request: CheckoutRequest,
    ) -> AppResult<ApiResponse<ActionOutcome>> {
        let outcome = self.workflow.checkout(machine_id, request).await?;
        Ok(Self::respond(outcome))
    }

    pub async fn check_in(
        &self,
        machine_id: &str,
        request: ConfirmRequest,
    ) -> AppResult<ApiResponse<ActionOutcome>> {
        let outcome = self
            .workflow
            .check_in(machine_id, request.confirmed, today())
            .await?;
        Ok(Self::respond(outcome))
    }

    pub async fn maintenance(
        &self,
        machine_id: &str,
        request: ConfirmRequest,
    ) -> AppResult<ApiResponse<ActionOutcome>> {
        let outcome = self
            .workflow
            .set_maintenance(machine_id, request.confirmed)
            .await?;
        Ok(Self::respond(outcome))
    }

    fn respond(outcome: ActionOutcome) -> ApiResponse<ActionOutcome> {
        let message = outcome.message.clone();
        ApiResponse::success_with_message(outcome, message)
    }
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}
