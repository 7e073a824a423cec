use crate::gateway::{from_row, to_row, DataGateway, Filter, Table};
use crate::models::{NewRental, Rental, RentalStatus};
use crate::utils::errors::AppError;
use chrono::NaiveDate;
use serde_json::{json, Map};
use std::sync::Arc;

pub struct RentalRepository {
    gateway: Arc<dyn DataGateway>,
}

impl RentalRepository {
    pub fn new(gateway: Arc<dyn DataGateway>) -> Self {
        Self { gateway }
    }

    fn active_filter(machine_id: &str) -> Filter {
        Filter::new()
            .eq("machine_id", machine_id)
            .eq("rental_status", RentalStatus::Active.as_str())
    }

    /// Todos los rentals activos de la máquina (debería haber como mucho uno)
    pub async fn find_active_by_machine(&self, machine_id: &str) -> Result<Vec<Rental>, AppError> {
        let rows = self
            .gateway
            .select(Table::Rentals, &Self::active_filter(machine_id))
            .await?;

        let mut rentals = Vec::with_capacity(rows.len());
        for row in rows {
            rentals.push(from_row(row)?);
        }
        Ok(rentals)
    }

    pub async fn create(&self, rental: &NewRental) -> Result<Rental, AppError> {
        let row = self.gateway.insert(Table::Rentals, to_row(rental)?).await?;
        Ok(from_row(row)?)
    }

    /// Pasar los rentals activos de la máquina a Completed con la fecha de devolución
    pub async fn complete_active(
        &self,
        machine_id: &str,
        returned_on: NaiveDate,
    ) -> Result<usize, AppError> {
        let mut patch = Map::new();
        patch.insert(
            "rental_status".to_string(),
            json!(RentalStatus::Completed.as_str()),
        );
        patch.insert(
            "actual_return_date".to_string(),
            json!(returned_on.format("%Y-%m-%d").to_string()),
        );

        let updated = self
            .gateway
            .update(Table::Rentals, &Self::active_filter(machine_id), patch)
            .await?;

        Ok(updated.len())
    }
}
