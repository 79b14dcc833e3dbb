//! `metrics`: latest run, partition, storage, and warehouse metrics for
//! one asset.
//!
//! Every field defaults independently to the "unavailable" sentinel:
//! missing data in one backend never prevents rendering data available
//! from the others.

use crate::asset::AssetKey;
use crate::connector::warehouse::quote_literal;
use crate::connector::{
    ObjectStoreConnector, ObjectSummary, OrchestratorConnector, WarehouseConnector, WarehouseRow,
};
use crate::error::DamonError;
use crate::metadata::unavailable;
use crate::render::{
    format_elapsed, format_size, format_timestamp, package_output, OutputMap,
};
use serde_json::{Map, Value};
use tracing::warn;

/// GraphQL query for one asset's latest materialization and partition
/// statistics.
pub fn metrics_query(key: &AssetKey) -> String {
    format!(
        r#"
query AssetMetricsByKey {{
  assetOrError(assetKey: {{path: {}}}) {{
    __typename
    ... on Asset {{
      id
      assetMaterializations(limit: 1) {{
        runId
        timestamp
        stepStats {{
          stepKey
          status
          startTime
          endTime
        }}
      }}
      definition {{
        partitionStats {{
          numPartitions
          numMaterialized
          numFailed
        }}
      }}
    }}
    ... on AssetNotFoundError {{
      message
    }}
  }}
}}
"#,
        key.to_json_array()
    )
}

/// Row count and on-disk size looked up in the warehouse.
pub fn table_metrics_sql(schema: &str, key: &AssetKey) -> String {
    format!(
        "SELECT c.reltuples::bigint AS row_count, \
         pg_total_relation_size(c.oid)::bigint AS total_bytes \
         FROM pg_class c JOIN pg_namespace n ON n.oid = c.relnamespace \
         WHERE n.nspname = {} AND c.relname = {}",
        quote_literal(schema),
        quote_literal(key.name())
    )
}

fn orchestrator_field(raw: Option<&Value>, pointer: &str) -> Value {
    raw.and_then(|r| r.pointer(pointer))
        .filter(|v| !v.is_null())
        .cloned()
        .unwrap_or_else(unavailable)
}

fn time_field(raw: Option<&Value>, pointer: &str) -> Value {
    raw.and_then(|r| r.pointer(pointer))
        .and_then(Value::as_f64)
        .and_then(format_timestamp)
        .map(Value::from)
        .unwrap_or_else(unavailable)
}

/// Merge the raw orchestrator response, the object-store aggregate for the
/// asset's prefix, and the optional warehouse row into the canonical
/// mapping.
pub fn normalize(
    raw: Option<&Value>,
    store: Option<&ObjectSummary>,
    warehouse: Option<&WarehouseRow>,
) -> OutputMap {
    const MATERIALIZATION: &str = "/data/assetOrError/assetMaterializations/0";
    const STEP_STATS: &str = "/data/assetOrError/assetMaterializations/0/stepStats";
    const PARTITIONS: &str = "/data/assetOrError/definition/partitionStats";

    let mut latest = Map::new();
    latest.insert(
        "Run ID".to_string(),
        orchestrator_field(raw, &format!("{}/runId", MATERIALIZATION)),
    );
    latest.insert(
        "Status".to_string(),
        orchestrator_field(raw, &format!("{}/status", STEP_STATS)),
    );
    latest.insert(
        "Start time".to_string(),
        time_field(raw, &format!("{}/startTime", STEP_STATS)),
    );
    latest.insert(
        "End time".to_string(),
        time_field(raw, &format!("{}/endTime", STEP_STATS)),
    );
    let elapsed = raw
        .and_then(|r| r.pointer(&format!("{}/startTime", STEP_STATS)))
        .and_then(Value::as_f64)
        .zip(
            raw.and_then(|r| r.pointer(&format!("{}/endTime", STEP_STATS)))
                .and_then(Value::as_f64),
        )
        .map(|(start, end)| Value::from(format_elapsed(end - start)))
        .unwrap_or_else(unavailable);
    latest.insert("Elapsed time".to_string(), elapsed);

    let mut partitions = Map::new();
    partitions.insert(
        "Number of partitions".to_string(),
        orchestrator_field(raw, &format!("{}/numPartitions", PARTITIONS)),
    );
    partitions.insert(
        "Materialized partitions".to_string(),
        orchestrator_field(raw, &format!("{}/numMaterialized", PARTITIONS)),
    );
    partitions.insert(
        "Failed partitions".to_string(),
        orchestrator_field(raw, &format!("{}/numFailed", PARTITIONS)),
    );

    let mut object_store = Map::new();
    object_store.insert(
        "Files".to_string(),
        store
            .map(|s| Value::from(s.num_files))
            .unwrap_or_else(unavailable),
    );
    object_store.insert(
        "Size".to_string(),
        store
            .map(|s| Value::from(format_size(s.size_bytes)))
            .unwrap_or_else(unavailable),
    );
    object_store.insert(
        "Last modified".to_string(),
        store
            .and_then(|s| s.last_modified)
            .map(|ts| Value::from(ts.format("%Y-%m-%d %H:%M:%S").to_string()))
            .unwrap_or_else(unavailable),
    );

    let mut data_warehouse = Map::new();
    data_warehouse.insert(
        "Row count".to_string(),
        warehouse
            .and_then(|row| row.get("row_count"))
            .filter(|v| !v.is_null())
            .cloned()
            .unwrap_or_else(unavailable),
    );
    data_warehouse.insert(
        "Bytes".to_string(),
        warehouse
            .and_then(|row| row.get("total_bytes"))
            .and_then(Value::as_u64)
            .map(|bytes| Value::from(format_size(bytes)))
            .unwrap_or_else(unavailable),
    );

    let mut sections = Map::new();
    sections.insert("Latest materialization".to_string(), Value::Object(latest));
    sections.insert("Partitions".to_string(), Value::Object(partitions));
    sections.insert("Object store".to_string(), Value::Object(object_store));
    sections.insert("Data warehouse".to_string(), Value::Object(data_warehouse));
    package_output("metrics", Value::Object(sections))
}

/// Run `metrics`: the orchestrator is required; the object store and the
/// warehouse are optional and degrade to "unavailable" sections on absence
/// or failure.
pub async fn run(
    orchestrator: Option<&dyn OrchestratorConnector>,
    store: Option<&dyn ObjectStoreConnector>,
    warehouse: Option<&dyn WarehouseConnector>,
    asset: &str,
) -> Result<OutputMap, DamonError> {
    let connector = orchestrator
        .ok_or_else(|| DamonError::Config("No orchestrator profile configured".to_string()))?;
    let key = AssetKey::parse(asset);
    let raw = connector.execute(&metrics_query(&key)).await?;

    let summary = match store {
        Some(store) => match store.list(&key.to_string()).await {
            // Most recent item stands in for the asset's storage footprint.
            Ok(items) => items.into_iter().next(),
            Err(e) => {
                warn!("Object store listing failed, continuing without it: {}", e);
                None
            }
        },
        None => None,
    };

    let warehouse_row = match warehouse {
        Some(warehouse) => {
            match warehouse
                .execute(&table_metrics_sql(warehouse.schema(), &key))
                .await
            {
                Ok(row) => row,
                Err(e) => {
                    warn!("Warehouse lookup failed, continuing without it: {}", e);
                    None
                }
            }
        }
        None => None,
    };

    Ok(normalize(Some(&raw), summary.as_ref(), warehouse_row.as_ref()))
}
