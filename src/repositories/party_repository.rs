use crate::gateway::{from_row, DataGateway, Filter, Table};
use crate::models::{Customer, Operator};
use crate::utils::errors::AppError;
use std::sync::Arc;

pub struct CustomerRepository {
    gateway: Arc<dyn DataGateway>,
}

impl CustomerRepository {
    pub fn new(gateway: Arc<dyn DataGateway>) -> Self {
        Self { gateway }
    }

    pub async fn list(&self) -> Result<Vec<Customer>, AppError> {
        let rows = self.gateway.select(Table::Customers, &Filter::new()).await?;

        let mut customers = Vec::with_capacity(rows.len());
        for row in rows {
            customers.push(from_row::<Customer>(row)?);
        }
        customers.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(customers)
    }

    pub async fn find_name(&self, customer_id: &str) -> Result<Option<String>, AppError> {
        let rows = self
            .gateway
            .select(Table::Customers, &Filter::new().eq("customer_id", customer_id))
            .await?;

        match rows.into_iter().next() {
            Some(row) => Ok(from_row::<Customer>(row)?.name),
            None => Ok(None),
        }
    }
}

pub struct OperatorRepository {
    gateway: Arc<dyn DataGateway>,
}

impl OperatorRepository {
    pub fn new(gateway: Arc<dyn DataGateway>) -> Self {
        Self { gateway }
    }

    pub async fn list(&self) -> Result<Vec<Operator>, AppError> {
        let rows = self.gateway.select(Table::Operators, &Filter::new()).await?;

        let mut operators = Vec::with_capacity(rows.len());
        for row in rows {
            operators.push(from_row::<Operator>(row)?);
        }
        operators.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(operators)
    }

    pub async fn find_name(&self, operator_id: &str) -> Result<Option<String>, AppError> {
        let rows = self
            .gateway
            .select(Table::Operators, &Filter::new().eq("operator_id", operator_id))
            .await?;

        match rows.into_iter().next() {
            Some(row) => Ok(from_row::<Operator>(row)?.name),
            None => Ok(None),
        }
    }
}
