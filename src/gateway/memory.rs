//! Gateway en memoria
//!
//! Mantiene las tablas en memoria y registra cada escritura. Se usa en tests
//! y para ejecuciones locales sin backend (`GATEWAY_BACKEND=memory`).

use async_trait::async_trait;
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::RwLock;

use super::{DataGateway, Filter, GatewayError, Row, Table};

/// Tipo de operación sobre el gateway
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Select,
    Insert,
    Update,
}

/// Escritura registrada
#[derive(Debug, Clone, PartialEq)]
pub struct WriteRecord {
    pub operation: Operation,
    pub table: Table,
    pub filter: Option<Filter>,
    pub payload: Row,
}

#[derive(Default)]
struct Inner {
    tables: HashMap<Table, Vec<Row>>,
    writes: Vec<WriteRecord>,
    failures: HashSet<(Operation, Table)>,
    next_id: HashMap<Table, i64>,
}

#[derive(Clone, Default)]
pub struct InMemoryGateway {
    inner: Arc<RwLock<Inner>>,
}

impl InMemoryGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cargar una fila directamente, sin registrarla como escritura
    pub async fn seed(&self, table: Table, row: Value) {
        if let Value::Object(map) = row {
            let mut inner = self.inner.write().await;
            inner.tables.entry(table).or_default().push(map);
        }
    }

    /// Cargar un fixture `{ "<tabla>": [filas...] }`; devuelve cuántas filas se cargaron
    pub async fn load_fixture(&self, fixture: Value) -> Result<usize, GatewayError> {
        let tables: HashMap<String, Vec<Row>> = serde_json::from_value(fixture)?;

        let mut parsed = Vec::with_capacity(tables.len());
        for (name, rows) in tables {
            let table = Table::from_name(&name).ok_or(GatewayError::UnknownTable(name))?;
            parsed.push((table, rows));
        }

        let mut inner = self.inner.write().await;
        let mut loaded = 0;
        for (table, rows) in parsed {
            loaded += rows.len();
            inner.tables.entry(table).or_default().extend(rows);
        }
        Ok(loaded)
    }

    /// Hacer fallar todas las llamadas `operation` sobre `table`
    pub async fn fail_on(&self, operation: Operation, table: Table) {
        self.inner.write().await.failures.insert((operation, table));
    }

    pub async fn rows(&self, table: Table) -> Vec<Row> {
        self.inner
            .read()
            .await
            .tables
            .get(&table)
            .cloned()
            .unwrap_or_default()
    }

    pub async fn writes(&self) -> Vec<WriteRecord> {
        self.inner.read().await.writes.clone()
    }

    fn check(inner: &Inner, operation: Operation, table: Table) -> Result<(), GatewayError> {
        if inner.failures.contains(&(operation, table)) {
            return Err(GatewayError::Unavailable(format!(
                "injected {:?} failure on {}",
                operation, table
            )));
        }
        Ok(())
    }

    fn id_column(table: Table) -> &'static str {
        match table {
            Table::Machines => "machine_id",
            Table::Model => "model_id",
            Table::Rentals => "rental_id",
            Table::Customers => "customer_id",
            Table::Operators => "operator_id",
        }
    }
}

#[async_trait]
impl DataGateway for InMemoryGateway {
    async fn select(&self, table: Table, filter: &Filter) -> Result<Vec<Row>, GatewayError> {
        let inner = self.inner.read().await;
        Self::check(&inner, Operation::Select, table)?;

        Ok(inner
            .tables
            .get(&table)
            .map(|rows| rows.iter().filter(|row| filter.matches(row)).cloned().collect())
            .unwrap_or_default())
    }

    async fn insert(&self, table: Table, record: Row) -> Result<Row, GatewayError> {
        let mut inner = self.inner.write().await;
        Self::check(&inner, Operation::Insert, table)?;

        inner.writes.push(WriteRecord {
            operation: Operation::Insert,
            table,
            filter: None,
            payload: record.clone(),
        });

        let mut row = record;
        let id_column = Self::id_column(table);
        if !row.contains_key(id_column) {
            let next = inner.next_id.entry(table).or_insert(0);
            *next += 1;
            row.insert(id_column.to_string(), Value::from(*next));
        }

        inner.tables.entry(table).or_default().push(row.clone());
        Ok(row)
    }

    async fn update(&self, table: Table, filter: &Filter, patch: Row) -> Result<Vec<Row>, GatewayError> {
        let mut inner = self.inner.write().await;
        Self::check(&inner, Operation::Update, table)?;

        inner.writes.push(WriteRecord {
            operation: Operation::Update,
            table,
            filter: Some(filter.clone()),
            payload: patch.clone(),
        });

        let mut updated = Vec::new();
        if let Some(rows) = inner.tables.get_mut(&table) {
            for row in rows.iter_mut().filter(|row| filter.matches(row)) {
                for (key, value) in &patch {
                    row.insert(key.clone(), value.clone());
                }
                updated.push(row.clone());
            }
        }

        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_insert_assigns_id_and_logs_write() {
        let gateway = InMemoryGateway::new();
        let record = json!({ "machine_id": "M-1", "rental_status": "Active" })
            .as_object()
            .cloned()
            .unwrap();

        let row = gateway.insert(Table::Rentals, record).await.unwrap();
        assert_eq!(row["rental_id"], json!(1));

        let writes = gateway.writes().await;
        assert_eq!(writes.len(), 1);
        assert_eq!(writes[0].operation, Operation::Insert);
    }

    #[tokio::test]
    async fn test_update_only_touches_matching_rows() {
        let gateway = InMemoryGateway::new();
        gateway.seed(Table::Machines, json!({ "machine_id": "M-1", "status": "available" })).await;
        gateway.seed(Table::Machines, json!({ "machine_id": "M-2", "status": "available" })).await;

        let patch = json!({ "status": "Rented" }).as_object().cloned().unwrap();
        let updated = gateway
            .update(Table::Machines, &Filter::new().eq("machine_id", "M-2"), patch)
            .await
            .unwrap();

        assert_eq!(updated.len(), 1);
        let rows = gateway.rows(Table::Machines).await;
        assert_eq!(rows[0]["status"], json!("available"));
        assert_eq!(rows[1]["status"], json!("Rented"));
    }

    #[tokio::test]
    async fn test_load_fixture_fills_tables() {
        let gateway = InMemoryGateway::new();
        let loaded = gateway
            .load_fixture(json!({
                "machines": [{ "machine_id": "M-1", "status": "available" }],
                "customers": [{ "customer_id": 1, "name": "Acme" }, { "customer_id": 2, "name": "Beta" }]
            }))
            .await
            .unwrap();

        assert_eq!(loaded, 3);
        assert_eq!(gateway.rows(Table::Customers).await.len(), 2);
        assert!(gateway.writes().await.is_empty());
    }

    #[tokio::test]
    async fn test_load_fixture_rejects_unknown_table() {
        let gateway = InMemoryGateway::new();
        let result = gateway.load_fixture(json!({ "trucks": [] })).await;
        assert!(matches!(result, Err(GatewayError::UnknownTable(name)) if name == "trucks"));
        assert!(gateway.load_fixture(json!([1, 2])).await.is_err());
    }

    #[tokio::test]
    async fn test_injected_failure() {
        let gateway = InMemoryGateway::new();
        gateway.fail_on(Operation::Select, Table::Model).await;
        assert!(gateway.select(Table::Model, &Filter::new()).await.is_err());
        assert!(gateway.select(Table::Machines, &Filter::new()).await.is_ok());
    }
}
