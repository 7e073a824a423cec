use crate::dto::ApiResponse;
use crate::gateway::DataGateway;
use crate::models::{Customer, Operator};
use crate::repositories::{CustomerRepository, OperatorRepository};
use crate::utils::errors::AppResult;
use std::sync::Arc;

/// Listados para los selectores del formulario de checkout
pub struct DirectoryController {
    customers: CustomerRepository,
    operators: OperatorRepository,
}

impl DirectoryController {
    pub fn new(gateway: Arc<dyn DataGateway>) -> Self {
        Self {
            customers: CustomerRepository::new(gateway.clone()),
            operators: OperatorRepository::new(gateway),
        }
    }

    pub async fn list_customers(&self) -> AppResult<ApiResponse<Vec<Customer>>> {
        Ok(ApiResponse::success(self.customers.list().await?))
    }

    pub async fn list_operators(&self) -> AppResult<ApiResponse<Vec<Operator>>> {
        Ok(ApiResponse::success(self.operators.list().await?))
    }
}
