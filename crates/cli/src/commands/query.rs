use super::helpers::{parse_param, QueryResult};
use crate::output::{print_success, render_table, OutputFormat};
use anyhow::Result;
use owo_colors::OwoColorize;
use wealthlens_runtime::{QueryRequest, QueryService};

/// Run ad-hoc SQL with positional `?` parameters.
pub async fn query(
    service: &QueryService,
    sql: &str,
    params: &[String],
    format: OutputFormat,
) -> Result<()> {
    let request = QueryRequest::new(sql).with_params(params.iter().map(|p| parse_param(p)));
    let outcome = service.execute(&request).await?;

    if !format.is_machine_readable() {
        if outcome.table.columns().is_empty() {
            println!("{}", "Statement returned no result set.".dimmed());
        } else {
            print!("{}", render_table(&outcome.table));
        }
        let source = if outcome.cache_status.is_hit() {
            "cache hit"
        } else {
            "warehouse"
        };
        println!(
            "{}",
            format!("{} rows ({})", outcome.table.row_count(), source).dimmed()
        );
    }

    print_success(
        format,
        QueryResult {
            cache_hit: outcome.cache_status.is_hit(),
            cache_key: outcome.cache_key.as_str().to_string(),
            row_count: outcome.table.row_count(),
            rows: &outcome.table,
        },
    )
}
