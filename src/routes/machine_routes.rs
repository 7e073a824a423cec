use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use crate::controllers::MachineController;
use crate::dto::{ActionOutcome, ApiResponse, CheckoutRequest, ConfirmRequest};
use crate::models::MachineView;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_machine_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_machine))
        .route("/:machine_id/checkout", post(checkout))
        .route("/:machine_id/checkin", post(check_in))
        .route("/:machine_id/maintenance", post(maintenance))
}

#[derive(Debug, Deserialize)]
struct MachineQuery {
    machine_id: Option<String>,
}

fn controller(state: &AppState) -> MachineController {
    MachineController::new(state.gateway.clone(), state.config.reload_delay)
}

async fn get_machine(
    State(state): State<AppState>,
    Query(query): Query<MachineQuery>,
) -> Result<Json<ApiResponse<MachineView>>, AppError> {
    let response = controller(&state).get_machine(query.machine_id.as_deref()).await?;
    Ok(Json(response))
}

async fn checkout(
    State(state): State<AppState>,
    Path(machine_id): Path<String>,
    Json(request): Json<CheckoutRequest>,
) -> Result<Json<ApiResponse<ActionOutcome>>, AppError> {
    let response = controller(&state).checkout(&machine_id, request).await?;
    Ok(Json(response))
}

async fn check_in(
    State(state): State<AppState>,
    Path(machine_id): Path<String>,
    Json(request): Json<ConfirmRequest>,
) -> Result<Json<ApiResponse<ActionOutcome>>, AppError> {
    let response = controller(&state).check_in(&machine_id, request).await?;
    Ok(Json(response))
}

async fn maintenance(
    State(state): State<AppState>,
    Path(machine_id): Path<String>,
    Json(request): Json<ConfirmRequest>,
) -> Result<Json<ApiResponse<ActionOutcome>>, AppError> {
    let response = controller(&state).maintenance(&machine_id, request).await?;
    Ok(Json(response))
}
