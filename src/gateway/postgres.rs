//! Gateway sobre conexión directa a PostgreSQL
//!
//! Ofrece las mismas operaciones que el backend alojado usando SQLx.
//! Las filas se devuelven con `row_to_json` y los registros se aplican con
//! `json_populate_record`, así que los tipos de columna los resuelve Postgres.

use async_trait::async_trait;
use serde_json::Value;
use sqlx::PgPool;
use tracing::debug;

use super::{scalar_text, validate_column, DataGateway, Filter, GatewayError, Row, Table};

pub struct PostgresGateway {
    pool: PgPool,
}

impl PostgresGateway {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Construir la cláusula WHERE; los parámetros empiezan en `$first`
    fn where_clause(filter: &Filter, first: usize) -> Result<(String, Vec<String>), GatewayError> {
        if filter.is_empty() {
            return Ok((String::new(), Vec::new()));
        }

        let mut clauses = Vec::new();
        let mut binds = Vec::new();
        for (offset, (column, value)) in filter.conditions().iter().enumerate() {
            validate_column(column)?;
            clauses.push(format!("t.{}::text = ${}", column, first + offset));
            binds.push(scalar_text(value));
        }

        Ok((format!(" WHERE {}", clauses.join(" AND ")), binds))
    }

    fn columns(record: &Row) -> Result<Vec<String>, GatewayError> {
        record
            .keys()
            .map(|column| validate_column(column).map(|_| column.clone()))
            .collect()
    }

    fn into_rows(values: Vec<Value>) -> Vec<Row> {
        values
            .into_iter()
            .filter_map(|value| match value {
                Value::Object(map) => Some(map),
                _ => None,
            })
            .collect()
    }

    fn select_sql(table: Table, where_sql: &str) -> String {
        format!("SELECT row_to_json(t) FROM {} t{}", table.name(), where_sql)
    }

    fn insert_sql(table: Table, columns: &[String]) -> String {
        let list = columns.join(", ");
        format!(
            "INSERT INTO {table} AS t ({list}) SELECT {list} FROM json_populate_record(NULL::{table}, $1::json) RETURNING row_to_json(t)",
            table = table.name(),
            list = list,
        )
    }

    fn update_sql(table: Table, columns: &[String], where_sql: &str) -> String {
        let assignments = columns
            .iter()
            .map(|c| format!("{c} = r.{c}", c = c))
            .collect::<Vec<_>>()
            .join(", ");
        format!(
            "UPDATE {table} AS t SET {assignments} FROM json_populate_record(NULL::{table}, $1::json) r{where_sql} RETURNING row_to_json(t)",
            table = table.name(),
            assignments = assignments,
            where_sql = where_sql,
        )
    }
}

#[async_trait]
impl DataGateway for PostgresGateway {
    async fn select(&self, table: Table, filter: &Filter) -> Result<Vec<Row>, GatewayError> {
        let (where_sql, binds) = Self::where_clause(filter, 1)?;
        let sql = Self::select_sql(table, &where_sql);
        debug!("📥 {}", sql);

        let mut query = sqlx::query_scalar::<_, Value>(&sql);
        for bind in binds {
            query = query.bind(bind);
        }

        let values = query.fetch_all(&self.pool).await?;
        Ok(Self::into_rows(values))
    }

    async fn insert(&self, table: Table, record: Row) -> Result<Row, GatewayError> {
        let columns = Self::columns(&record)?;
        let sql = Self::insert_sql(table, &columns);
        debug!("💾 {}", sql);

        let value = sqlx::query_scalar::<_, Value>(&sql)
            .bind(Value::Object(record))
            .fetch_one(&self.pool)
            .await?;

        match value {
            Value::Object(map) => Ok(map),
            other => Err(GatewayError::Unavailable(format!(
                "insert into {} returned {}",
                table, other
            ))),
        }
    }

    async fn update(&self, table: Table, filter: &Filter, patch: Row) -> Result<Vec<Row>, GatewayError> {
        let columns = Self::columns(&patch)?;
        let (where_sql, binds) = Self::where_clause(filter, 2)?;
        let sql = Self::update_sql(table, &columns, &where_sql);
        debug!("✏️ {}", sql);

        let mut query = sqlx::query_scalar::<_, Value>(&sql).bind(Value::Object(patch));
        for bind in binds {
            query = query.bind(bind);
        }

        let values = query.fetch_all(&self.pool).await?;
        Ok(Self::into_rows(values))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_where_clause_numbers_params() {
        let filter = Filter::new().eq("machine_id", "M-1").eq("rental_status", "Active");
        let (sql, binds) = PostgresGateway::where_clause(&filter, 2).unwrap();
        assert_eq!(sql, " WHERE t.machine_id::text = $2 AND t.rental_status::text = $3");
        assert_eq!(binds, vec!["M-1".to_string(), "Active".to_string()]);
    }

    #[test]
    fn test_update_sql() {
        let patch = json!({ "status": "Rented" }).as_object().cloned().unwrap();
        let columns = PostgresGateway::columns(&patch).unwrap();
        let sql = PostgresGateway::update_sql(Table::Machines, &columns, " WHERE t.machine_id::text = $2");
        assert_eq!(
            sql,
            "UPDATE machines AS t SET status = r.status FROM json_populate_record(NULL::machines, $1::json) r WHERE t.machine_id::text = $2 RETURNING row_to_json(t)"
        );
    }

    #[test]
    fn test_insert_rejects_bad_column() {
        let record = json!({ "status) VALUES (1); --": "x" }).as_object().cloned().unwrap();
        assert!(PostgresGateway::columns(&record).is_err());
    }
}
