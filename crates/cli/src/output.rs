//! Structured output handling for CLI commands.

use serde::Serialize;
use wealthlens_common::{ResultTable, Scalar};

/// Cells wider than this are cut and end in `...` in human output.
pub const MAX_CELL_WIDTH: usize = 40;

#[derive(clap::ValueEnum, Clone, Debug, Default, PartialEq, Eq, Copy)]
pub enum OutputFormat {
    #[default]
    Human,
    Json,
    Yaml,
}

impl OutputFormat {
    /// Returns true if the output format is intended for machine consumption
    pub fn is_machine_readable(&self) -> bool {
        match self {
            OutputFormat::Human => false,
            OutputFormat::Json | OutputFormat::Yaml => true,
        }
    }
}

/// Envelope for JSON/YAML responses
#[derive(Serialize)]
pub struct CommandResponse<T> {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
    pub exit_code: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> CommandResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            status: "success".to_string(),
            code: None,
            message: None,
            hint: None,
            exit_code: 0,
            data: Some(data),
        }
    }
}

impl CommandResponse<()> {
    pub fn error(e: &anyhow::Error, exit_code: i32) -> Self {
        let known = e.downcast_ref::<wealthlens_error::WealthlensError>();
        Self {
            status: "error".to_string(),
            code: known.map(|err| err.code.to_string()),
            message: Some(known.map(|err| err.message.clone()).unwrap_or_else(|| e.to_string())),
            hint: known.and_then(|err| err.hint.clone()),
            exit_code,
            data: None,
        }
    }
}

/// Serialize `data` to stdout in the requested machine format
pub fn print_output<T: Serialize>(format: OutputFormat, data: T) -> anyhow::Result<()> {
    match format {
        OutputFormat::Human => {
            // Human output is printed by each command as it goes
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&data)?;
            println!("{}", json);
        }
        OutputFormat::Yaml => {
            let yaml = serde_yaml::to_string(&data)?;
            println!("{}", yaml);
        }
    }
    Ok(())
}

/// Print a structured success response for machine outputs
pub fn print_success<T: Serialize>(format: OutputFormat, data: T) -> anyhow::Result<()> {
    if format == OutputFormat::Human {
        return Ok(());
    }
    print_output(format, CommandResponse::success(data))
}

/// Print a structured error response for machine outputs.
/// Human errors are printed to stderr by main.
pub fn print_error(format: OutputFormat, e: &anyhow::Error, exit_code: i32) -> anyhow::Result<()> {
    if format == OutputFormat::Human {
        return Ok(());
    }
    print_output(format, CommandResponse::error(e, exit_code))
}

fn cell_text(value: &Scalar) -> String {
    let text = match value {
        Scalar::Null => "NULL".to_string(),
        Scalar::Float(v) if v.is_finite() && v.fract() != 0.0 => format!("{:.2}", v),
        other => other.to_string(),
    };
    let text = text.replace(['\n', '\r'], " ");
    if text.chars().count() > MAX_CELL_WIDTH {
        let cut: String = text.chars().take(MAX_CELL_WIDTH - 3).collect();
        format!("{}...", cut)
    } else {
        text
    }
}

/// Plain-text grid for a result table. Numbers are right-aligned.
pub fn render_table(table: &ResultTable) -> String {
    let headers: Vec<&str> = table.column_names().collect();
    if headers.is_empty() {
        return String::new();
    }

    let cells: Vec<Vec<String>> = table
        .rows()
        .iter()
        .map(|row| row.iter().map(cell_text).collect())
        .collect();

    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in &cells {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(cell.chars().count());
        }
    }

    let numeric: Vec<bool> = table
        .columns()
        .iter()
        .map(|c| c.data_type.is_numeric())
        .collect();

    let pad = |i: usize, text: &str| {
        if numeric[i] {
            format!("{:>width$}", text, width = widths[i])
        } else {
            format!("{:<width$}", text, width = widths[i])
        }
    };

    let mut out = String::new();
    let header_line: Vec<String> = headers.iter().enumerate().map(|(i, h)| pad(i, *h)).collect();
    out.push_str(header_line.join("  ").trim_end());
    out.push('\n');

    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    out.push_str(&rule.join("  "));
    out.push('\n');

    for row in &cells {
        let line: Vec<String> = row
            .iter()
            .enumerate()
            .map(|(i, cell)| pad(i, cell.as_str()))
            .collect();
        out.push_str(line.join("  ").trim_end());
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use wealthlens_common::{Column, ColumnType};
    use wealthlens_error::{ErrorCode, WealthlensError};

    fn sample() -> ResultTable {
        ResultTable::try_from_rows(
            vec![
                Column::new("CLIENT_ID", ColumnType::Text),
                Column::new("AUM", ColumnType::Float),
            ],
            vec![
                vec![Scalar::Text("CLI_001".to_string()), Scalar::Float(1250.5)],
                vec![Scalar::Text("CLI_2".to_string()), Scalar::Null],
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_render_table_aligns_columns() {
        let rendered = render_table(&sample());
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines[0], "CLIENT_ID      AUM");
        assert_eq!(lines[1], "---------  -------");
        assert_eq!(lines[2], "CLI_001    1250.50");
        assert_eq!(lines[3], "CLI_2         NULL");
    }

    #[test]
    fn test_render_table_without_columns_is_empty() {
        assert_eq!(render_table(&ResultTable::empty(Vec::new())), "");
    }

    #[test]
    fn test_long_cells_are_cut() {
        let long = "x".repeat(100);
        let text = cell_text(&Scalar::Text(long));
        assert_eq!(text.chars().count(), MAX_CELL_WIDTH);
        assert!(text.ends_with("..."));
    }

    #[test]
    fn test_error_response_carries_code_and_hint() {
        let err = anyhow::Error::new(
            WealthlensError::new(ErrorCode::SessionUnavailable, "No session")
                .with_hint("Set SNOWFLAKE_USER"),
        );
        let json = serde_json::to_value(CommandResponse::error(&err, 4)).unwrap();
        assert_eq!(json["status"], "error");
        assert_eq!(json["code"], "WL-1001");
        assert_eq!(json["hint"], "Set SNOWFLAKE_USER");
        assert_eq!(json["exit_code"], 4);
        assert!(json.get("data").is_none());
    }
}
