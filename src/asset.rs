//! Asset keys: ordered path segments identifying a data asset.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Ordered sequence of path segments identifying a data asset.
///
/// The canonical string form joins segments with `/`; the two forms
/// round-trip losslessly as long as no segment contains `/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetKey(Vec<String>);

impl AssetKey {
    pub fn new(segments: Vec<String>) -> Self {
        AssetKey(segments)
    }

    /// Parse the canonical string form (`a/b/c`) into segments.
    pub fn parse(key: &str) -> Self {
        AssetKey(key.split('/').map(String::from).collect())
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }

    /// Last segment: the bare asset name, used as the warehouse table name.
    pub fn name(&self) -> &str {
        self.0.last().map(String::as_str).unwrap_or("")
    }

    /// Segments as a JSON array literal, for embedding in GraphQL query
    /// text (e.g. `["a", "b"]`).
    pub fn to_json_array(&self) -> String {
        serde_json::to_string(&self.0).unwrap_or_else(|_| "[]".to_string())
    }
}

impl fmt::Display for AssetKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join("/"))
    }
}
