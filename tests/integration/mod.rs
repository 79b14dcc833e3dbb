//! Integration tests for the damon CLI

mod cli_parse;
mod command_flows;
mod config_loading;
