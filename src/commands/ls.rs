//! `ls`: list the platform's data assets.

use crate::asset::AssetKey;
use crate::connector::OrchestratorConnector;
use crate::error::DamonError;
use crate::render::{package_output, OutputMap};
use serde_json::{Map, Value};

/// GraphQL query listing asset keys, optionally under a key prefix.
pub fn assets_query(prefix: Option<&AssetKey>) -> String {
    match prefix {
        Some(prefix) => format!(
            r#"
query AssetsQuery {{
  assetsOrError(prefix: {}) {{
    ... on AssetConnection {{
      nodes {{
        key {{
          path
        }}
      }}
    }}
  }}
}}
"#,
            prefix.to_json_array()
        ),
        None => r#"
query AssetsQuery {
  assetsOrError {
    ... on AssetConnection {
      nodes {
        key {
          path
        }
      }
    }
  }
}
"#
        .to_string(),
    }
}

/// Flatten the raw asset-listing response into the canonical mapping: one
/// section holding asset-key strings in response order.
pub fn normalize(raw: Option<&Value>) -> OutputMap {
    let keys: Vec<Value> = raw
        .and_then(|r| r.pointer("/data/assetsOrError/nodes"))
        .and_then(Value::as_array)
        .map(|nodes| {
            nodes
                .iter()
                .filter_map(|node| node.pointer("/key/path"))
                .filter_map(Value::as_array)
                .map(|path| {
                    let segments: Vec<&str> =
                        path.iter().filter_map(Value::as_str).collect();
                    Value::from(segments.join("/"))
                })
                .collect()
        })
        .unwrap_or_default();

    let mut sections = Map::new();
    sections.insert("Assets".to_string(), Value::Array(keys));
    package_output("ls", Value::Object(sections))
}

/// Run `ls`: query the orchestrator and normalize the listing. The
/// orchestrator is required for this command.
pub async fn run(
    orchestrator: Option<&dyn OrchestratorConnector>,
    prefix: Option<&str>,
) -> Result<OutputMap, DamonError> {
    let connector = orchestrator
        .ok_or_else(|| DamonError::Config("No orchestrator profile configured".to_string()))?;
    let key_prefix = prefix.map(AssetKey::parse);
    let raw = connector.execute(&assets_query(key_prefix.as_ref())).await?;
    Ok(normalize(Some(&raw)))
}
