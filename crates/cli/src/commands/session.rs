use super::helpers::SessionResult;
use crate::output::{print_success, OutputFormat};
use anyhow::Result;
use owo_colors::OwoColorize;
use std::time::Instant;
use wealthlens_runtime::QueryService;

/// Acquire the warehouse session and report which strategy produced it.
pub async fn session(service: &QueryService, format: OutputFormat) -> Result<()> {
    let strategy = service.provider().strategy_kind();
    if !format.is_machine_readable() {
        println!(
            "{} {}",
            "Acquiring session via".bold().cyan(),
            strategy.to_string().bold()
        );
    }

    let started = Instant::now();
    service.get_session().await?;
    let elapsed_ms = started.elapsed().as_millis() as u64;

    if !format.is_machine_readable() {
        println!(
            "{} Session ready {}",
            "✔".green(),
            format!("({} ms)", elapsed_ms).dimmed()
        );
    }

    print_success(
        format,
        SessionResult {
            strategy,
            connected: true,
            elapsed_ms,
        },
    )
}
