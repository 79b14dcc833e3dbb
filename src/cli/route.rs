//! CLI route: run context and dispatch to command runners and renderers.

use crate::cli::parse::Commands;
use crate::commands::{ls, metrics, show};
use crate::config::ConnectorsConfig;
use crate::connector;
use crate::error::DamonError;
use crate::render::{self, OutputMap, OutputMode};
use std::path::PathBuf;
use tokio::runtime::Runtime;
use tracing::debug;

/// Runtime context for CLI execution: the parsed connector configuration
/// and the async runtime backend calls run on. Connectors are created
/// fresh per command from the configuration.
pub struct RunContext {
    config: ConnectorsConfig,
    runtime: Runtime,
}

impl RunContext {
    /// Create run context from an optional config path override.
    pub fn new(config_path: Option<PathBuf>) -> Result<Self, DamonError> {
        let config = ConnectorsConfig::load(config_path.as_deref())?;
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| DamonError::Output(format!("Failed to start async runtime: {}", e)))?;
        Ok(Self { config, runtime })
    }

    /// Execute a command and return its rendered output.
    pub fn execute(&self, command: &Commands) -> Result<String, DamonError> {
        match command {
            Commands::Ls {
                prefix,
                orchestrator,
                output,
            } => {
                let orchestrator = connector::orchestrator(&self.config, orchestrator.as_deref())?;
                debug!(prefix = ?prefix, "running ls");
                let packaged = self
                    .runtime
                    .block_on(ls::run(orchestrator.as_deref(), prefix.as_deref()))?;
                self.render(&packaged, *output)
            }
            Commands::Show {
                asset,
                orchestrator,
                data_warehouse,
                output,
            } => {
                let orchestrator = connector::orchestrator(&self.config, orchestrator.as_deref())?;
                let warehouse = connector::warehouse(&self.config, data_warehouse.as_deref())?;
                debug!(asset = %asset, "running show");
                let packaged = self.runtime.block_on(show::run(
                    orchestrator.as_deref(),
                    warehouse.as_deref(),
                    asset,
                ))?;
                self.render(&packaged, *output)
            }
            Commands::Metrics {
                asset,
                orchestrator,
                io_manager,
                data_warehouse,
                output,
            } => {
                let orchestrator = connector::orchestrator(&self.config, orchestrator.as_deref())?;
                let store = connector::object_store(&self.config, io_manager.as_deref())?;
                let warehouse = connector::warehouse(&self.config, data_warehouse.as_deref())?;
                debug!(asset = %asset, "running metrics");
                let packaged = self.runtime.block_on(metrics::run(
                    orchestrator.as_deref(),
                    store.as_deref(),
                    warehouse.as_deref(),
                    asset,
                ))?;
                self.render(&packaged, *output)
            }
        }
    }

    fn render(&self, packaged: &OutputMap, mode: OutputMode) -> Result<String, DamonError> {
        match mode {
            OutputMode::Json => render::render_json(packaged),
            OutputMode::Terminal => Ok(render::render_terminal(packaged)),
            OutputMode::Copy => {
                let markdown = render::render_markdown(packaged);
                render::copy_to_clipboard(&markdown)?;
                Ok("Output copied to clipboard".to_string())
            }
        }
    }
}
