//! Connector abstraction.
//!
//! A closed set of backend connectors, one per capability (orchestrator,
//! object store, warehouse), constructed from configuration by the factory
//! functions below. An unconfigured capability yields `None`, which callers
//! treat as "skip this data source"; a configured but unresolvable profile
//! is a configuration error.

use crate::config::{Capability, ConnectorsConfig};
use crate::error::DamonError;

pub mod object_store;
pub mod orchestrator;
pub mod warehouse;

pub use object_store::{ObjectKind, ObjectStoreConnector, ObjectSummary, S3ObjectStore};
pub use orchestrator::{DagsterOrchestrator, OrchestratorConnector};
pub use warehouse::{PostgresWarehouse, WarehouseConnector, WarehouseRow};

/// Construct the orchestrator connector for `profile`, or `None` when the
/// capability is absent from the configuration.
pub fn orchestrator(
    config: &ConnectorsConfig,
    profile: Option<&str>,
) -> Result<Option<Box<dyn OrchestratorConnector>>, DamonError> {
    if !config.has_capability(Capability::Orchestrator) {
        return Ok(None);
    }
    let resolved = config.resolve(Capability::Orchestrator, profile)?;
    match resolved.backend_type.as_str() {
        "dagster" => {
            let settings = orchestrator::DagsterSettings::from_table(resolved.settings)?;
            Ok(Some(Box::new(DagsterOrchestrator::new(settings)?)))
        }
        other => Err(DamonError::Config(format!(
            "Unknown orchestrator backend type '{}'",
            other
        ))),
    }
}

/// Construct the object-store connector for `profile`, or `None` when the
/// capability is absent from the configuration.
pub fn object_store(
    config: &ConnectorsConfig,
    profile: Option<&str>,
) -> Result<Option<Box<dyn ObjectStoreConnector>>, DamonError> {
    if !config.has_capability(Capability::ObjectStore) {
        return Ok(None);
    }
    let resolved = config.resolve(Capability::ObjectStore, profile)?;
    match resolved.backend_type.as_str() {
        "s3" => {
            let settings = object_store::S3Settings::from_table(resolved.settings)?;
            Ok(Some(Box::new(S3ObjectStore::new(settings)?)))
        }
        other => Err(DamonError::Config(format!(
            "Unknown object store backend type '{}'",
            other
        ))),
    }
}

/// Construct the warehouse connector for `profile`, or `None` when the
/// capability is absent from the configuration.
pub fn warehouse(
    config: &ConnectorsConfig,
    profile: Option<&str>,
) -> Result<Option<Box<dyn WarehouseConnector>>, DamonError> {
    if !config.has_capability(Capability::Warehouse) {
        return Ok(None);
    }
    let resolved = config.resolve(Capability::Warehouse, profile)?;
    match resolved.backend_type.as_str() {
        "postgres" => {
            let settings = warehouse::PostgresSettings::from_table(resolved.settings)?;
            Ok(Some(Box::new(PostgresWarehouse::new(settings))))
        }
        other => Err(DamonError::Config(format!(
            "Unknown warehouse backend type '{}'",
            other
        ))),
    }
}

/// Deserialize a profile settings table into a typed settings struct.
pub(crate) fn settings_from_table<T: serde::de::DeserializeOwned>(
    capability: Capability,
    table: toml::value::Table,
) -> Result<T, DamonError> {
    toml::Value::Table(table).try_into().map_err(|e| {
        DamonError::Config(format!(
            "Invalid '{}' profile settings: {}",
            capability.config_key(),
            e
        ))
    })
}
