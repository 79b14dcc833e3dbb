//! Metadata entry decoding.
//!
//! The orchestrator reports materialization metadata as a polymorphic
//! union discriminated by `__typename`. Each entry flattens to exactly one
//! (label, value) pair in the canonical output mapping. Decoding is total:
//! every known kind yields its documented field, and an unrecognized kind
//! degrades to the "unavailable" sentinel instead of aborting the command.

use serde::Deserialize;
use serde_json::Value;

/// Sentinel for data a backend did not provide. Distinct from the literal
/// `Null` produced by the null metadata kind.
pub const UNAVAILABLE: &str = "unavailable";

/// The sentinel as a canonical-mapping scalar.
pub fn unavailable() -> Value {
    Value::String(UNAVAILABLE.to_string())
}

/// An asset key as it appears inside metadata entries.
#[derive(Debug, Clone, Deserialize)]
pub struct AssetKeyPath {
    pub path: Vec<String>,
}

/// Closed union of metadata entry kinds. The `Unknown` catch-all is
/// explicit so adding a new kind upstream is a visible gap here, not a
/// silent fallthrough.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "__typename", rename_all_fields = "camelCase")]
pub enum MetadataEntry {
    FloatMetadataEntry { float_value: Option<f64> },
    IntMetadataEntry { int_value: Option<i64> },
    JsonMetadataEntry { json_string: Option<String> },
    BoolMetadataEntry { bool_value: Option<bool> },
    MarkdownMetadataEntry { md_str: Option<String> },
    PathMetadataEntry { path: Option<String> },
    NotebookMetadataEntry { path: Option<String> },
    PythonArtifactMetadataEntry {
        module: Option<String>,
        name: Option<String>,
    },
    TextMetadataEntry { text: Option<String> },
    UrlMetadataEntry { url: Option<String> },
    PipelineRunMetadataEntry { run_id: Option<String> },
    AssetMetadataEntry { asset_key: Option<AssetKeyPath> },
    NullMetadataEntry {},
    #[serde(other)]
    Unknown,
}

impl MetadataEntry {
    /// Flatten to a single canonical scalar. Missing fields resolve to the
    /// "unavailable" sentinel; the null kind yields the literal `Null`.
    pub fn scalar(&self) -> Value {
        match self {
            MetadataEntry::FloatMetadataEntry { float_value } => {
                float_value.map(Value::from).unwrap_or_else(unavailable)
            }
            MetadataEntry::IntMetadataEntry { int_value } => {
                int_value.map(Value::from).unwrap_or_else(unavailable)
            }
            // Raw JSON text is passed through as-is, not re-parsed.
            MetadataEntry::JsonMetadataEntry { json_string } => {
                json_string.clone().map(Value::from).unwrap_or_else(unavailable)
            }
            MetadataEntry::BoolMetadataEntry { bool_value } => {
                bool_value.map(Value::from).unwrap_or_else(unavailable)
            }
            MetadataEntry::MarkdownMetadataEntry { md_str } => {
                md_str.clone().map(Value::from).unwrap_or_else(unavailable)
            }
            MetadataEntry::PathMetadataEntry { path }
            | MetadataEntry::NotebookMetadataEntry { path } => {
                path.clone().map(Value::from).unwrap_or_else(unavailable)
            }
            MetadataEntry::PythonArtifactMetadataEntry { module, name } => {
                match (module, name) {
                    (Some(module), Some(name)) => {
                        Value::from(format!("module: {}, name: {}", module, name))
                    }
                    _ => unavailable(),
                }
            }
            MetadataEntry::TextMetadataEntry { text } => {
                text.clone().map(Value::from).unwrap_or_else(unavailable)
            }
            MetadataEntry::UrlMetadataEntry { url } => {
                url.clone().map(Value::from).unwrap_or_else(unavailable)
            }
            MetadataEntry::PipelineRunMetadataEntry { run_id } => {
                run_id.clone().map(Value::from).unwrap_or_else(unavailable)
            }
            MetadataEntry::AssetMetadataEntry { asset_key } => asset_key
                .as_ref()
                .map(|key| Value::from(key.path.join("/")))
                .unwrap_or_else(unavailable),
            MetadataEntry::NullMetadataEntry {} => Value::from("Null"),
            MetadataEntry::Unknown => unavailable(),
        }
    }
}

/// Decode one raw metadata entry into its (label, value) pair. Never
/// fails: malformed or unrecognized entries decode as the sentinel.
pub fn decode_entry(raw: &Value) -> (String, Value) {
    let label = raw
        .get("label")
        .and_then(Value::as_str)
        .unwrap_or(UNAVAILABLE)
        .to_string();
    let entry: MetadataEntry =
        serde_json::from_value(raw.clone()).unwrap_or(MetadataEntry::Unknown);
    (label, entry.scalar())
}
