//! Error types for the damon data asset monitor.

use thiserror::Error;

/// Errors surfaced by connectors, normalizers, and the CLI boundary.
///
/// Required-backend failures propagate to the binary and terminate with a
/// non-zero exit; optional-backend failures are caught at the normalization
/// boundary and converted to "unavailable" data.
#[derive(Debug, Error)]
pub enum DamonError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Warehouse error: {0}")]
    Warehouse(String),

    #[error("Object store error: {0}")]
    ObjectStore(String),

    #[error("Output error: {0}")]
    Output(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<toml::de::Error> for DamonError {
    fn from(err: toml::de::Error) -> Self {
        DamonError::Config(err.to_string())
    }
}
