//! Warehouse connector: SQL over the Postgres wire protocol.
//!
//! The connection is a scoped resource: `execute` opens it, fetches at most
//! one row, and closes it before returning on every path, so a failure
//! later in normalization can never leak a connection.

use crate::config::Capability;
use crate::error::DamonError;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use sqlx::postgres::PgConnection;
use sqlx::{Column, Connection, Row, TypeInfo};
use tracing::warn;

/// Settings for the Postgres backend.
#[derive(Debug, Clone, Deserialize)]
pub struct PostgresSettings {
    pub url: String,
    #[serde(default = "default_schema")]
    pub schema: String,
}

fn default_schema() -> String {
    "public".to_string()
}

impl PostgresSettings {
    pub fn from_table(table: toml::value::Table) -> Result<Self, DamonError> {
        super::settings_from_table(Capability::Warehouse, table)
    }
}

/// One result row: column descriptors paired with decoded values, in
/// column order.
#[derive(Debug, Clone)]
pub struct WarehouseRow {
    pub fields: Vec<(String, Value)>,
}

impl WarehouseRow {
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value)
    }
}

/// Executes a statement and returns the first row with its column
/// descriptors, or `None` when the statement yields no rows. No-rows is
/// never an error; only genuine backend or connection failures are.
#[async_trait]
pub trait WarehouseConnector: Send + Sync {
    async fn execute(&self, sql: &str) -> Result<Option<WarehouseRow>, DamonError>;

    /// Schema the connector's tables live in, for statement building.
    fn schema(&self) -> &str;
}

pub struct PostgresWarehouse {
    settings: PostgresSettings,
}

impl PostgresWarehouse {
    pub fn new(settings: PostgresSettings) -> Self {
        Self { settings }
    }
}

#[async_trait]
impl WarehouseConnector for PostgresWarehouse {
    async fn execute(&self, sql: &str) -> Result<Option<WarehouseRow>, DamonError> {
        let mut conn = PgConnection::connect(&self.settings.url)
            .await
            .map_err(|e| DamonError::Warehouse(format!("Failed to connect: {}", e)))?;

        let fetched = sqlx::query(sql).fetch_optional(&mut conn).await;

        // Release before surfacing the query result, on every path.
        if let Err(e) = conn.close().await {
            warn!("Failed to close warehouse connection: {}", e);
        }

        let row = fetched.map_err(|e| DamonError::Warehouse(format!("Query failed: {}", e)))?;
        Ok(row.as_ref().map(decode_row))
    }

    fn schema(&self) -> &str {
        &self.settings.schema
    }
}

fn decode_row(row: &sqlx::postgres::PgRow) -> WarehouseRow {
    let fields = row
        .columns()
        .iter()
        .enumerate()
        .map(|(i, column)| (column.name().to_string(), decode_column(row, i, column)))
        .collect();
    WarehouseRow { fields }
}

fn decode_column(
    row: &sqlx::postgres::PgRow,
    index: usize,
    column: &sqlx::postgres::PgColumn,
) -> Value {
    let decoded = match column.type_info().name() {
        "INT2" => row
            .try_get::<Option<i16>, _>(index)
            .ok()
            .flatten()
            .map(|v| Value::from(v as i64)),
        "INT4" => row
            .try_get::<Option<i32>, _>(index)
            .ok()
            .flatten()
            .map(|v| Value::from(v as i64)),
        "INT8" => row
            .try_get::<Option<i64>, _>(index)
            .ok()
            .flatten()
            .map(Value::from),
        "FLOAT4" => row
            .try_get::<Option<f32>, _>(index)
            .ok()
            .flatten()
            .map(|v| Value::from(v as f64)),
        "FLOAT8" => row
            .try_get::<Option<f64>, _>(index)
            .ok()
            .flatten()
            .map(Value::from),
        "BOOL" => row
            .try_get::<Option<bool>, _>(index)
            .ok()
            .flatten()
            .map(Value::from),
        "TIMESTAMP" => row
            .try_get::<Option<chrono::NaiveDateTime>, _>(index)
            .ok()
            .flatten()
            .map(|ts| Value::from(ts.format("%Y-%m-%d %H:%M:%S").to_string())),
        "TIMESTAMPTZ" => row
            .try_get::<Option<chrono::DateTime<chrono::Utc>>, _>(index)
            .ok()
            .flatten()
            .map(|ts| Value::from(ts.format("%Y-%m-%d %H:%M:%S").to_string())),
        _ => row
            .try_get::<Option<String>, _>(index)
            .ok()
            .flatten()
            .map(Value::from),
    };
    decoded.unwrap_or(Value::Null)
}

/// Escape a string for embedding as a SQL literal.
pub fn quote_literal(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}
