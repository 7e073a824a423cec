use axum::{extract::State, routing::get, Json, Router};
use crate::controllers::DirectoryController;
use crate::dto::ApiResponse;
use crate::models::{Customer, Operator};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_directory_router() -> Router<AppState> {
    Router::new()
        .route("/api/customers", get(list_customers))
        .route("/api/operators", get(list_operators))
}

async fn list_customers(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<Customer>>>, AppError> {
    let controller = DirectoryController::new(state.gateway.clone());
    Ok(Json(controller.list_customers().await?))
}

async fn list_operators(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<Operator>>>, AppError> {
    let controller = DirectoryController::new(state.gateway.clone());
    Ok(Json(controller.list_operators().await?))
}
