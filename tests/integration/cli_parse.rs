//! CLI argument parsing

use clap::Parser;
use damon::cli::{Cli, Commands};
use damon::render::OutputMode;

#[test]
fn test_ls_defaults() {
    let cli = Cli::try_parse_from(["damon", "ls"]).unwrap();
    match cli.command {
        Commands::Ls {
            prefix,
            orchestrator,
            output,
        } => {
            assert!(prefix.is_none());
            assert!(orchestrator.is_none());
            assert_eq!(output, OutputMode::Terminal);
        }
        _ => panic!("expected ls"),
    }
}

#[test]
fn test_ls_with_prefix_and_profile() {
    let cli = Cli::try_parse_from([
        "damon",
        "ls",
        "--prefix",
        "raw/orders",
        "--orchestrator",
        "staging",
        "--output",
        "json",
    ])
    .unwrap();
    match cli.command {
        Commands::Ls {
            prefix,
            orchestrator,
            output,
        } => {
            assert_eq!(prefix.as_deref(), Some("raw/orders"));
            assert_eq!(orchestrator.as_deref(), Some("staging"));
            assert_eq!(output, OutputMode::Json);
        }
        _ => panic!("expected ls"),
    }
}

#[test]
fn test_show_requires_asset() {
    assert!(Cli::try_parse_from(["damon", "show"]).is_err());
}

#[test]
fn test_show_with_warehouse_profile() {
    let cli = Cli::try_parse_from([
        "damon",
        "show",
        "analytics/orders",
        "--data-warehouse",
        "prod",
        "--output",
        "copy",
    ])
    .unwrap();
    match cli.command {
        Commands::Show {
            asset,
            data_warehouse,
            output,
            ..
        } => {
            assert_eq!(asset, "analytics/orders");
            assert_eq!(data_warehouse.as_deref(), Some("prod"));
            assert_eq!(output, OutputMode::Copy);
        }
        _ => panic!("expected show"),
    }
}

#[test]
fn test_metrics_accepts_all_profile_flags() {
    let cli = Cli::try_parse_from([
        "damon",
        "metrics",
        "analytics/orders",
        "--orchestrator",
        "prod",
        "--io-manager",
        "prod",
        "--data-warehouse",
        "prod",
    ])
    .unwrap();
    match cli.command {
        Commands::Metrics {
            asset,
            orchestrator,
            io_manager,
            data_warehouse,
            output,
        } => {
            assert_eq!(asset, "analytics/orders");
            assert_eq!(orchestrator.as_deref(), Some("prod"));
            assert_eq!(io_manager.as_deref(), Some("prod"));
            assert_eq!(data_warehouse.as_deref(), Some("prod"));
            assert_eq!(output, OutputMode::Terminal);
        }
        _ => panic!("expected metrics"),
    }
}

#[test]
fn test_unknown_output_mode_rejected() {
    assert!(Cli::try_parse_from(["damon", "ls", "--output", "yaml"]).is_err());
}

#[test]
fn test_global_logging_flags() {
    let cli = Cli::try_parse_from([
        "damon",
        "--verbose",
        "--log-format",
        "json",
        "ls",
    ])
    .unwrap();
    assert!(cli.verbose);
    assert_eq!(cli.log_format.as_deref(), Some("json"));
}
