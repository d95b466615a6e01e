//! Shared helpers for CLI commands.
//!
//! - **Wiring**: `build_service` connects config to the Snowflake driver and query cache.
//! - **Parsing**: `parse_param` turns `--param` strings into typed bind values.
//! - **Result Types**: serializable structs for machine-readable (JSON/YAML) output.

use serde::Serialize;
use std::sync::Arc;
use wealthlens_analytics::Report;
use wealthlens_common::config::AppConfig;
use wealthlens_common::{BindValue, ResultTable};
use wealthlens_runtime::QueryService;
use wealthlens_warehouse::{SessionProvider, SnowflakeDriver, StrategyKind};

/// Query service over the real warehouse, with the session strategy picked
/// from the environment.
pub fn build_service(config: &AppConfig) -> QueryService {
    let provider = SessionProvider::detect(
        Arc::new(SnowflakeDriver::new()),
        &config.warehouse_settings(),
    );
    QueryService::new(provider, &config.cache)
}

/// Infer a bind value from its command line spelling.
///
/// `null`, `true`/`false`, integers and floats are typed; a `str:` prefix
/// forces text (`str:00123` binds the string `00123`).
pub fn parse_param(raw: &str) -> BindValue {
    if let Some(text) = raw.strip_prefix("str:") {
        return BindValue::Text(text.to_string());
    }
    match raw {
        "null" | "NULL" => return BindValue::Null,
        "true" | "TRUE" => return BindValue::Boolean(true),
        "false" | "FALSE" => return BindValue::Boolean(false),
        _ => {}
    }
    if let Ok(v) = raw.parse::<i64>() {
        return BindValue::Integer(v);
    }
    if let Ok(v) = raw.parse::<f64>() {
        if v.is_finite() {
            return BindValue::Float(v);
        }
    }
    BindValue::Text(raw.to_string())
}

/// Compact currency figure for headline numbers: `$1.25B`, `$830.0M`, `$12.4K`.
pub fn compact_amount(value: f64) -> String {
    let sign = if value < 0.0 { "-" } else { "" };
    let abs = value.abs();
    if abs >= 1e9 {
        format!("{}${:.2}B", sign, abs / 1e9)
    } else if abs >= 1e6 {
        format!("{}${:.1}M", sign, abs / 1e6)
    } else if abs >= 1e3 {
        format!("{}${:.1}K", sign, abs / 1e3)
    } else {
        format!("{}${:.2}", sign, abs)
    }
}

// ===== Result Types =====

#[derive(Serialize)]
pub struct SessionResult {
    pub strategy: StrategyKind,
    pub connected: bool,
    pub elapsed_ms: u64,
}

#[derive(Serialize)]
pub struct QueryResult<'a> {
    pub cache_hit: bool,
    pub cache_key: String,
    pub row_count: usize,
    pub rows: &'a ResultTable,
}

#[derive(Serialize)]
pub struct ReportSummary {
    pub name: &'static str,
    pub description: &'static str,
    pub requires_client_id: bool,
}

impl From<&Report> for ReportSummary {
    fn from(report: &Report) -> Self {
        Self {
            name: report.name(),
            description: report.description(),
            requires_client_id: report.requires_client_id(),
        }
    }
}
