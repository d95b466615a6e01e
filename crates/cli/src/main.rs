//! wealthlens CLI: wealth management analytics over a Snowflake warehouse.
//!
//! Every command shares one session and one query cache for the life of the
//! process.
//!
//! # Commands
//!
//! - `session`: Acquire a warehouse session and report the strategy used.
//! - `kpis`: Headline client, advisor and AUM figures.
//! - `report`: Run a named report from the catalog.
//! - `reports`: List the catalog.
//! - `query`: Run ad-hoc SQL with positional parameters.

use anyhow::Context;
use clap::{Parser, Subcommand};
use dotenv::dotenv;
use owo_colors::OwoColorize;
use wealthlens_analytics::ReportParams;
use wealthlens_common::config::AppConfig;
use wealthlens_common::logging::init_logging;
use wealthlens_error::WealthlensError;

mod commands;
mod exit_codes;
mod output;

use output::OutputFormat;

#[derive(Parser)]
#[command(name = "wealthlens")]
#[command(about = "Wealth management analytics on Snowflake", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format (human, json, yaml)
    #[arg(long, global = true, value_enum, default_value = "human")]
    output: OutputFormat,

    /// Configuration file (YAML or TOML)
    #[arg(long, global = true, env = "WEALTHLENS_CONFIG")]
    config: Option<String>,

    /// Override the query cache TTL in seconds
    #[arg(long, global = true, value_parser = clap::value_parser!(u64).range(1..))]
    ttl: Option<u64>,
}

#[derive(Subcommand)]
enum Commands {
    /// Acquire a warehouse session and report which strategy produced it
    Session,
    /// Client and advisor counts, AUM and year-to-date growth
    Kpis,
    /// Run a report from the catalog
    Report {
        /// Report name, see `wealthlens reports`
        name: String,
        /// Client for client-level reports
        #[arg(long)]
        client_id: Option<String>,
        /// Interaction window for advisor productivity
        #[arg(long, allow_negative_numbers = true)]
        window_days: Option<i64>,
    },
    /// List available reports
    Reports,
    /// Run ad-hoc SQL
    Query {
        /// Statement text, with `?` placeholders for parameters
        sql: String,
        /// Positional parameter, repeatable. Prefix with `str:` to force text.
        #[arg(long = "param", short = 'p')]
        params: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    dotenv().ok();

    let cli = Cli::parse();

    if let Err(e) = run_cli(&cli).await {
        let exit_code = exit_codes::for_error(&e);
        if cli.output.is_machine_readable() {
            output::print_error(cli.output, &e, exit_code).ok();
        } else {
            eprintln!("{} {}", "Error:".red().bold(), e);
            let hint = e
                .downcast_ref::<WealthlensError>()
                .and_then(|err| err.hint.as_deref());
            if let Some(hint) = hint {
                eprintln!("{} {}", "Hint:".yellow().bold(), hint);
            }
        }
        std::process::exit(exit_code);
    }

    Ok(())
}

/// Load the configuration and apply command line overrides.
fn load_config(path: Option<&str>, ttl: Option<u64>) -> anyhow::Result<AppConfig> {
    let mut config = AppConfig::load(path)?;
    if let Some(ttl) = ttl {
        config.cache.ttl_seconds = ttl;
    }
    Ok(config)
}

async fn run_cli(cli: &Cli) -> Result<(), anyhow::Error> {
    let config = load_config(cli.config.as_deref(), cli.ttl)?;
    init_logging(&config.logging).context("Failed to initialize logging")?;

    if let Commands::Reports = &cli.command {
        return commands::reports(cli.output);
    }

    let service = commands::build_service(&config);
    match &cli.command {
        Commands::Session => commands::session(&service, cli.output).await?,
        Commands::Kpis => commands::kpis(&service, cli.output).await?,
        Commands::Report {
            name,
            client_id,
            window_days,
        } => {
            let params = ReportParams {
                client_id: client_id.clone(),
                window_days: *window_days,
            };
            commands::report(&service, name, params, cli.output).await?;
        }
        Commands::Query { sql, params } => {
            commands::query(&service, sql, params, cli.output).await?;
        }
        Commands::Reports => commands::reports(cli.output)?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use std::io::Write;
    use wealthlens_error::ErrorCode;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_report_flags_parse() {
        let cli = Cli::parse_from([
            "wealthlens",
            "--output",
            "json",
            "report",
            "advisor-productivity",
            "--window-days",
            "30",
        ]);
        assert_eq!(cli.output, OutputFormat::Json);
        match cli.command {
            Commands::Report {
                name, window_days, ..
            } => {
                assert_eq!(name, "advisor-productivity");
                assert_eq!(window_days, Some(30));
            }
            _ => panic!("expected report command"),
        }
    }

    #[test]
    fn test_query_params_repeat() {
        let cli = Cli::parse_from([
            "wealthlens",
            "query",
            "SELECT ?, ?",
            "-p",
            "1",
            "--param",
            "CLI_001",
        ]);
        match cli.command {
            Commands::Query { params, .. } => assert_eq!(params, vec!["1", "CLI_001"]),
            _ => panic!("expected query command"),
        }
    }

    #[test]
    fn test_zero_ttl_is_rejected() {
        assert!(Cli::try_parse_from(["wealthlens", "--ttl", "0", "kpis"]).is_err());
    }

    #[test]
    fn test_ttl_flag_overrides_file() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(file, "cache:\n  ttl_seconds: 120").unwrap();
        let path = file.path().to_str().unwrap();

        assert_eq!(load_config(Some(path), None).unwrap().cache.ttl_seconds, 120);
        assert_eq!(load_config(Some(path), Some(5)).unwrap().cache.ttl_seconds, 5);
    }

    #[test]
    fn test_invalid_config_is_config_error() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(file, "cache:\n  ttl_seconds: 0").unwrap();
        let path = file.path().to_str().unwrap();

        let err = load_config(Some(path), None).unwrap_err();
        let known = err.downcast_ref::<WealthlensError>().unwrap();
        assert_eq!(known.code, ErrorCode::ValidationFailed);
        assert_eq!(exit_codes::for_error(&err), exit_codes::CONFIG_ERROR);
    }

    #[test]
    fn test_missing_config_file_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.yaml");

        let err = load_config(path.to_str(), None).unwrap_err();
        let known = err.downcast_ref::<WealthlensError>().unwrap();
        assert_eq!(known.code, ErrorCode::InvalidConfig);
        assert_eq!(exit_codes::for_error(&err), exit_codes::CONFIG_ERROR);
    }
}
