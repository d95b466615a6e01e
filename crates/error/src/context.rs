//! # Error Contexts
//!
//! Structured metadata attached to errors for programmatic handling.

use serde::{Deserialize, Serialize};

/// Structured context for an error.
///
/// Each variant carries the fields relevant to that failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ErrorContext {
    /// Context for session acquisition failures (WL-1001..1004)
    Connection {
        /// Which session strategy was active ("ambient" or "constructed")
        strategy: String,
        account: Option<String>,
        host: Option<String>,
    },

    /// Context for WL-1001: every required connection setting that was absent
    MissingSettings { fields: Vec<String> },

    /// Context for statement failures (WL-2001..2005)
    Statement {
        /// Scrubbed, truncated SQL text
        sql_preview: String,
        sql_state: Option<String>,
        vendor_code: Option<String>,
        statement_handle: Option<String>,
    },

    /// Context for WL-2006: a cell that did not match its declared type
    Decode { column: String, raw: String },

    /// Context for WL-3001/3002
    Config {
        file_path: Option<String>,
        field: Option<String>,
    },
}
