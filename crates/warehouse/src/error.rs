use thiserror::Error;
use wealthlens_error::{ErrorCode, ErrorContext, WealthlensError};

/// Failures raised by a warehouse driver.
#[derive(Error, Debug)]
pub enum DriverError {
    #[error("Warehouse endpoint {url} is unreachable: {source}")]
    Unreachable {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Warehouse rejected the credentials (HTTP {status}): {message}")]
    CredentialsRejected { status: u16, message: String },

    #[error("Session token at {path} is unreadable: {source}")]
    TokenUnreadable {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Session probe failed: {message}")]
    ProbeFailed { message: String },

    #[error("{message}")]
    Statement {
        message: String,
        sql_preview: String,
        sql_state: Option<String>,
        vendor_code: Option<String>,
        statement_handle: Option<String>,
    },

    #[error("Cannot decode value {raw:?} in column {column}: {reason}")]
    Decode {
        column: String,
        raw: String,
        reason: String,
    },

    #[error("Unexpected warehouse response: {0}")]
    Protocol(String),
}

impl DriverError {
    /// Demote a statement failure to a probe failure. Used while opening a
    /// session, where any rejection means no usable session.
    pub fn into_probe_failure(self) -> Self {
        match self {
            DriverError::Statement { message, .. } | DriverError::Protocol(message) => {
                DriverError::ProbeFailed { message }
            }
            DriverError::Decode { reason, .. } => DriverError::ProbeFailed { message: reason },
            other => other,
        }
    }
}

impl From<DriverError> for WealthlensError {
    fn from(err: DriverError) -> Self {
        let message = err.to_string();
        match err {
            DriverError::Unreachable { url, .. } => {
                WealthlensError::new(ErrorCode::WarehouseUnreachable, message)
                    .with_hint(format!("Check network access to {}", url))
            }
            DriverError::CredentialsRejected { .. } => {
                WealthlensError::new(ErrorCode::CredentialsRejected, message).with_hint(
                    "Check SNOWFLAKE_USER and SNOWFLAKE_PASSWORD (or snowflake.credential)",
                )
            }
            DriverError::TokenUnreadable { .. } => {
                WealthlensError::new(ErrorCode::AmbientTokenUnreadable, message)
            }
            DriverError::ProbeFailed { .. } => {
                WealthlensError::new(ErrorCode::SessionUnavailable, message)
            }
            DriverError::Statement {
                message,
                sql_preview,
                sql_state,
                vendor_code,
                statement_handle,
            } => {
                let code = ErrorCode::from_warehouse(vendor_code.as_deref(), sql_state.as_deref());
                let mut error = WealthlensError::new(code, message);
                if let Some(handle) = &statement_handle {
                    error = error.with_trace_id(handle.clone());
                }
                error.with_context(ErrorContext::Statement {
                    sql_preview,
                    sql_state,
                    vendor_code,
                    statement_handle,
                })
            }
            DriverError::Decode { column, raw, .. } => {
                WealthlensError::new(ErrorCode::ResultDecodeFailed, message)
                    .with_context(ErrorContext::Decode { column, raw })
            }
            DriverError::Protocol(_) => WealthlensError::new(ErrorCode::ExecutionFailed, message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wealthlens_error::ErrorCategory;

    fn statement(vendor: &str, state: &str) -> DriverError {
        DriverError::Statement {
            message: "SQL compilation error".to_string(),
            sql_preview: "SELEC 1".to_string(),
            sql_state: Some(state.to_string()),
            vendor_code: Some(vendor.to_string()),
            statement_handle: Some("01b2-handle".to_string()),
        }
    }

    #[test]
    fn test_statement_failure_is_query_error() {
        let err: WealthlensError = statement("001003", "42000").into();
        assert_eq!(err.code, ErrorCode::SyntaxError);
        assert!(err.is_query_error());
        assert_eq!(err.trace_id.as_deref(), Some("01b2-handle"));
        assert!(matches!(err.context, Some(ErrorContext::Statement { .. })));
    }

    #[test]
    fn test_probe_failure_is_connection_error() {
        let err: WealthlensError = statement("002043", "02000").into_probe_failure().into();
        assert_eq!(err.code, ErrorCode::SessionUnavailable);
        assert_eq!(err.category(), ErrorCategory::Connection);
    }

    #[test]
    fn test_credentials_rejected_carries_hint() {
        let err: WealthlensError = DriverError::CredentialsRejected {
            status: 401,
            message: "Invalid OAuth access token".to_string(),
        }
        .into();
        assert!(err.is_connection_error());
        assert!(err.hint.is_some());
    }
}
