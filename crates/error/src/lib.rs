//! # wealthlens-error
//!
//! Unified error types for the wealthlens warehouse access layer.
//!
//! Every failure carries:
//! - A stable numeric code (WL-XXXX) whose range encodes the category
//! - Optional structured JSON context
//! - An optional hint a dashboard can show next to the message

mod code;
mod context;
mod convert;

pub use code::{ErrorCategory, ErrorCode};
pub use context::ErrorContext;

use serde::{Deserialize, Serialize};
use std::fmt;

/// The unified error type for all wealthlens operations.
///
/// Connection failures (no usable warehouse session) and query failures
/// (the warehouse rejected a statement) are distinguished by
/// [`ErrorCode::category`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WealthlensError {
    /// Numeric error code (e.g., "WL-2001")
    pub code: ErrorCode,

    /// Human-readable error message
    pub message: String,

    /// Structured context for programmatic handling
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<ErrorContext>,

    /// Suggestion shown alongside the message
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,

    /// Correlation ID, usually the warehouse statement handle
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace_id: Option<String>,
}

impl WealthlensError {
    /// Create a new error with code and message
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            context: None,
            hint: None,
            trace_id: None,
        }
    }

    /// Add structured context
    pub fn with_context(mut self, context: ErrorContext) -> Self {
        self.context = Some(context);
        self
    }

    /// Add a hint
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    /// Add trace ID for correlation
    pub fn with_trace_id(mut self, trace_id: impl Into<String>) -> Self {
        self.trace_id = Some(trace_id.into());
        self
    }

    pub fn category(&self) -> ErrorCategory {
        self.code.category()
    }

    /// True when no usable warehouse session could be established.
    pub fn is_connection_error(&self) -> bool {
        self.category() == ErrorCategory::Connection
    }

    /// True when the warehouse rejected or failed a statement.
    pub fn is_query_error(&self) -> bool {
        self.category() == ErrorCategory::Query
    }

    /// Serialize to JSON for machine-readable output
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|e| {
            tracing::warn!("Failed to serialize WealthlensError: {}", e);
            format!(
                r#"{{"code":"{}","message":"Serialization failed"}}"#,
                self.code
            )
        })
    }

    /// Serialize to pretty JSON for logging
    pub fn to_json_pretty(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| self.to_json())
    }
}

impl fmt::Display for WealthlensError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        if let Some(hint) = &self.hint {
            write!(f, " (Hint: {})", hint)?;
        }
        Ok(())
    }
}

impl std::error::Error for WealthlensError {}

/// Result type alias for wealthlens operations
pub type Result<T> = std::result::Result<T, WealthlensError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_builder() {
        let err = WealthlensError::new(ErrorCode::SessionUnavailable, "No session")
            .with_hint("Configure credentials")
            .with_trace_id("01b2-handle");

        assert_eq!(err.code, ErrorCode::SessionUnavailable);
        assert_eq!(err.message, "No session");
        assert_eq!(err.hint, Some("Configure credentials".to_string()));
        assert_eq!(err.trace_id, Some("01b2-handle".to_string()));
        assert!(err.context.is_none());
    }

    #[test]
    fn test_display_implementation() {
        let err = WealthlensError::new(ErrorCode::SyntaxError, "unexpected 'FORM'")
            .with_hint("Check the statement near FORM");

        assert_eq!(
            err.to_string(),
            "[WL-2001] unexpected 'FORM' (Hint: Check the statement near FORM)"
        );

        let err_no_hint = WealthlensError::new(ErrorCode::Internal, "Crash");
        assert_eq!(err_no_hint.to_string(), "[WL-5002] Crash");
    }

    #[test]
    fn test_category_helpers() {
        let conn = WealthlensError::new(ErrorCode::WarehouseUnreachable, "down");
        assert!(conn.is_connection_error());
        assert!(!conn.is_query_error());

        let query = WealthlensError::new(ErrorCode::PermissionDenied, "no grant");
        assert!(query.is_query_error());
        assert!(!query.is_connection_error());
    }

    #[test]
    fn test_json_output() {
        let err = WealthlensError::new(ErrorCode::StatementTimeout, "Statement timed out");
        let json = err.to_json();

        assert!(json.contains("\"code\":\"WL-2004\""));
        assert!(json.contains("\"message\":\"Statement timed out\""));
        assert!(!json.contains("hint"));
    }
}
