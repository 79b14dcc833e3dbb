//! `show`: definition, lineage, and latest-materialization metadata for
//! one asset.

use crate::asset::AssetKey;
use crate::connector::warehouse::quote_literal;
use crate::connector::{OrchestratorConnector, WarehouseConnector, WarehouseRow};
use crate::error::DamonError;
use crate::metadata::{decode_entry, unavailable};
use crate::render::{package_output, OutputMap};
use serde_json::{Map, Value};
use tracing::warn;

/// GraphQL query for one asset by key: definition fields, lineage, and the
/// most recent materialization's metadata entries.
pub fn asset_query(key: &AssetKey) -> String {
    format!(
        r#"
query AssetByKey {{
  assetOrError(assetKey: {{path: {}}}) {{
    __typename
    ... on Asset {{
      definition {{
        description
        computeKind
        autoMaterializePolicy {{
          policyType
        }}
        freshnessPolicy {{
          maximumLagMinutes
          cronSchedule
        }}
        isPartitioned
        dependedByKeys {{
          path
        }}
        dependencyKeys {{
          path
        }}
      }}
      assetMaterializations(limit: 1) {{
        timestamp
        metadataEntries {{
          __typename
          label
          ... on FloatMetadataEntry {{
            floatValue
          }}
          ... on IntMetadataEntry {{
            intValue
          }}
          ... on JsonMetadataEntry {{
            jsonString
          }}
          ... on BoolMetadataEntry {{
            boolValue
          }}
          ... on MarkdownMetadataEntry {{
            mdStr
          }}
          ... on PathMetadataEntry {{
            path
          }}
          ... on NotebookMetadataEntry {{
            path
          }}
          ... on PythonArtifactMetadataEntry {{
            module
            name
          }}
          ... on TextMetadataEntry {{
            text
          }}
          ... on UrlMetadataEntry {{
            url
          }}
          ... on PipelineRunMetadataEntry {{
            runId
          }}
          ... on AssetMetadataEntry {{
            assetKey {{
              path
            }}
          }}
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

/// Table facts looked up in the warehouse for the shown asset.
pub fn table_info_sql(schema: &str, key: &AssetKey) -> String {
    format!(
        "SELECT t.table_type AS \"Table type\", \
         (SELECT count(*) FROM information_schema.columns c \
          WHERE c.table_schema = t.table_schema AND c.table_name = t.table_name)::bigint AS \"Columns\" \
         FROM information_schema.tables t \
         WHERE t.table_schema = {} AND t.table_name = {}",
        quote_literal(schema),
        quote_literal(key.name())
    )
}

fn key_list(definition: &Value, field: &str) -> Value {
    let keys: Vec<Value> = definition
        .get(field)
        .and_then(Value::as_array)
        .map(|entries| {
            entries
                .iter()
                .filter_map(|entry| entry.get("path"))
                .filter_map(Value::as_array)
                .map(|path| {
                    let segments: Vec<&str> =
                        path.iter().filter_map(Value::as_str).collect();
                    Value::from(segments.join("/"))
                })
                .collect()
        })
        .unwrap_or_default();
    Value::Array(keys)
}

fn definition_field(definition: &Value, pointer: &str) -> Value {
    definition
        .pointer(pointer)
        .filter(|v| !v.is_null())
        .cloned()
        .unwrap_or_else(unavailable)
}

/// Flatten the raw asset response (typed union: Asset | AssetNotFoundError)
/// and optional warehouse row into the canonical mapping.
///
/// A not-found discriminant short-circuits: the output is solely the error
/// message, with no lineage or metadata sections.
pub fn normalize(raw: &Value, warehouse: Option<&WarehouseRow>) -> OutputMap {
    let asset = raw
        .pointer("/data/assetOrError")
        .cloned()
        .unwrap_or(Value::Null);

    let mut sections = Map::new();

    if asset.get("__typename").and_then(Value::as_str) == Some("AssetNotFoundError") {
        let message = asset
            .get("message")
            .filter(|v| !v.is_null())
            .cloned()
            .unwrap_or_else(unavailable);
        sections.insert("Error".to_string(), message);
        return package_output("show", Value::Object(sections));
    }

    let definition = asset.get("definition").cloned().unwrap_or(Value::Null);

    sections.insert(
        "Description".to_string(),
        definition_field(&definition, "/description"),
    );
    sections.insert(
        "Compute kind".to_string(),
        definition_field(&definition, "/computeKind"),
    );
    sections.insert(
        "Is partitioned".to_string(),
        definition_field(&definition, "/isPartitioned"),
    );
    sections.insert(
        "Auto-materialization policy".to_string(),
        definition_field(&definition, "/autoMaterializePolicy/policyType"),
    );
    sections.insert(
        "Freshness policy (maximum lag minutes)".to_string(),
        definition_field(&definition, "/freshnessPolicy/maximumLagMinutes"),
    );
    sections.insert(
        "Freshness policy (cron schedule)".to_string(),
        definition_field(&definition, "/freshnessPolicy/cronSchedule"),
    );
    sections.insert(
        "Upstream assets".to_string(),
        key_list(&definition, "dependencyKeys"),
    );
    sections.insert(
        "Downstream assets".to_string(),
        key_list(&definition, "dependedByKeys"),
    );

    let metadata = asset
        .pointer("/assetMaterializations/0/metadataEntries")
        .and_then(Value::as_array)
        .map(|entries| {
            let mut decoded = Map::new();
            for entry in entries {
                let (label, value) = decode_entry(entry);
                decoded.insert(label, value);
            }
            Value::Object(decoded)
        })
        .unwrap_or_else(unavailable);
    sections.insert("Latest materialization metadata".to_string(), metadata);

    if let Some(row) = warehouse {
        let mut table = Map::new();
        for (name, value) in &row.fields {
            table.insert(name.clone(), value.clone());
        }
        sections.insert("Data warehouse".to_string(), Value::Object(table));
    }

    package_output("show", Value::Object(sections))
}

/// Run `show`: query the orchestrator (required) and the warehouse
/// (optional; failures degrade to an absent section).
pub async fn run(
    orchestrator: Option<&dyn OrchestratorConnector>,
    warehouse: Option<&dyn WarehouseConnector>,
    asset: &str,
) -> Result<OutputMap, DamonError> {
    let connector = orchestrator
        .ok_or_else(|| DamonError::Config("No orchestrator profile configured".to_string()))?;
    let key = AssetKey::parse(asset);
    let raw = connector.execute(&asset_query(&key)).await?;

    let warehouse_row = match warehouse {
        Some(warehouse) => {
            match warehouse
                .execute(&table_info_sql(warehouse.schema(), &key))
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

    Ok(normalize(&raw, warehouse_row.as_ref()))
}
