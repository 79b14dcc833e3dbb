//! End-to-end command flows against fake backends

use async_trait::async_trait;
use damon::commands::{ls, metrics, show};
use damon::connector::{
    ObjectStoreConnector, OrchestratorConnector, S3ObjectStore, WarehouseConnector, WarehouseRow,
};
use damon::error::DamonError;
use damon::metadata::UNAVAILABLE;
use damon::render;
use object_store::memory::InMemory;
use object_store::path::Path as StorePath;
use object_store::{ObjectStore, PutPayload};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};

/// Orchestrator that records queries and replies with a canned response.
struct FakeOrchestrator {
    response: Value,
    queries: Mutex<Vec<String>>,
}

impl FakeOrchestrator {
    fn new(response: Value) -> Self {
        Self {
            response,
            queries: Mutex::new(Vec::new()),
        }
    }

    fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl OrchestratorConnector for FakeOrchestrator {
    async fn execute(&self, query: &str) -> Result<Value, DamonError> {
        self.queries.lock().unwrap().push(query.to_string());
        Ok(self.response.clone())
    }
}

struct FakeWarehouse {
    row: Option<WarehouseRow>,
}

#[async_trait]
impl WarehouseConnector for FakeWarehouse {
    async fn execute(&self, _sql: &str) -> Result<Option<WarehouseRow>, DamonError> {
        Ok(self.row.clone())
    }

    fn schema(&self) -> &str {
        "analytics"
    }
}

struct FailingWarehouse;

#[async_trait]
impl WarehouseConnector for FailingWarehouse {
    async fn execute(&self, _sql: &str) -> Result<Option<WarehouseRow>, DamonError> {
        Err(DamonError::Warehouse("connection refused".to_string()))
    }

    fn schema(&self) -> &str {
        "analytics"
    }
}

#[tokio::test]
async fn test_ls_flow_lists_assets_in_response_order() {
    let orchestrator = FakeOrchestrator::new(json!({
        "data": {
            "assetsOrError": {
                "nodes": [
                    {"key": {"path": ["raw", "orders"]}},
                    {"key": {"path": ["analytics", "daily_orders"]}}
                ]
            }
        }
    }));

    let packaged = ls::run(Some(&orchestrator), None).await.unwrap();
    assert_eq!(
        packaged.get("ls").unwrap().pointer("/Assets").unwrap(),
        &json!(["raw/orders", "analytics/daily_orders"])
    );
    assert_eq!(orchestrator.queries().len(), 1);
    assert!(!orchestrator.queries()[0].contains("prefix"));
}

#[tokio::test]
async fn test_ls_flow_passes_prefix_into_query() {
    let orchestrator = FakeOrchestrator::new(json!({
        "data": {"assetsOrError": {"nodes": []}}
    }));
    ls::run(Some(&orchestrator), Some("raw/orders")).await.unwrap();
    assert!(orchestrator.queries()[0].contains(r#"prefix: ["raw","orders"]"#));
}

#[tokio::test]
async fn test_ls_without_orchestrator_is_config_error() {
    let err = ls::run(None, None).await.unwrap_err();
    assert!(matches!(err, DamonError::Config(_)));
}

#[tokio::test]
async fn test_show_flow_not_found_renders_single_error_field() {
    let orchestrator = FakeOrchestrator::new(json!({
        "data": {
            "assetOrError": {
                "__typename": "AssetNotFoundError",
                "message": "Asset key analytics/nope not found"
            }
        }
    }));
    let warehouse = FakeWarehouse {
        row: Some(WarehouseRow {
            fields: vec![("Table type".to_string(), json!("BASE TABLE"))],
        }),
    };

    let packaged = show::run(Some(&orchestrator), Some(&warehouse), "analytics/nope")
        .await
        .unwrap();
    let sections = packaged.get("show").unwrap().as_object().unwrap();
    assert_eq!(sections.len(), 1);
    assert_eq!(
        sections.get("Error"),
        Some(&json!("Asset key analytics/nope not found"))
    );
}

#[tokio::test]
async fn test_show_flow_warehouse_failure_degrades_to_absent_section() {
    let orchestrator = FakeOrchestrator::new(json!({
        "data": {
            "assetOrError": {
                "__typename": "Asset",
                "definition": {"description": "Orders", "computeKind": "dbt"},
                "assetMaterializations": []
            }
        }
    }));

    let packaged = show::run(Some(&orchestrator), Some(&FailingWarehouse), "orders")
        .await
        .unwrap();
    let sections = packaged.get("show").unwrap();
    assert_eq!(sections.pointer("/Description"), Some(&json!("Orders")));
    assert!(sections.get("Data warehouse").is_none());
}

#[tokio::test]
async fn test_metrics_flow_merges_store_and_orchestrator() {
    let orchestrator = FakeOrchestrator::new(json!({
        "data": {
            "assetOrError": {
                "__typename": "Asset",
                "id": "abc",
                "assetMaterializations": [{
                    "runId": "run-7",
                    "timestamp": "1718000000000",
                    "stepStats": {
                        "stepKey": "orders",
                        "status": "SUCCESS",
                        "startTime": 1718000000.0,
                        "endTime": 1718000120.0
                    }
                }],
                "definition": {"partitionStats": null}
            }
        }
    }));

    let memory = InMemory::new();
    memory
        .put(
            &StorePath::from("orders/part-1.parquet"),
            PutPayload::from(vec![0u8; 2048]),
        )
        .await
        .unwrap();
    let store = S3ObjectStore::from_store(Arc::new(memory), "");

    let packaged = metrics::run(
        Some(&orchestrator),
        Some(&store as &dyn ObjectStoreConnector),
        None,
        "orders",
    )
    .await
    .unwrap();
    let sections = packaged.get("metrics").unwrap();

    assert_eq!(
        sections.pointer("/Latest materialization/Run ID"),
        Some(&json!("run-7"))
    );
    assert_eq!(
        sections.pointer("/Latest materialization/Elapsed time"),
        Some(&json!("0:02:00"))
    );
    assert_eq!(sections.pointer("/Object store/Files"), Some(&json!(1)));
    assert_eq!(sections.pointer("/Object store/Size"), Some(&json!("2.00 KB")));
    assert_eq!(
        sections.pointer("/Data warehouse/Row count"),
        Some(&json!(UNAVAILABLE))
    );
}

#[tokio::test]
async fn test_metrics_flow_all_optional_backends_absent() {
    let orchestrator = FakeOrchestrator::new(json!({
        "data": {
            "assetOrError": {
                "__typename": "Asset",
                "id": "abc",
                "assetMaterializations": [],
                "definition": null
            }
        }
    }));

    let packaged = metrics::run(Some(&orchestrator), None, None, "orders")
        .await
        .unwrap();
    let sections = packaged.get("metrics").unwrap().as_object().unwrap();

    // All four sections render even with nothing to report.
    assert_eq!(sections.len(), 4);
    let rendered = render::render_markdown(&packaged);
    assert!(rendered.contains("Latest materialization:"));
    assert!(rendered.contains(&format!("- Files: {}", UNAVAILABLE)));
}
