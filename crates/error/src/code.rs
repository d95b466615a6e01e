use serde::{Deserialize, Serialize};
use std::fmt;

/// Numeric error codes following the WL-XXXX format.
///
/// ## Code Ranges
/// - **1000-1999**: Connection errors (no usable warehouse session)
/// - **2000-2999**: Query errors (the warehouse rejected or failed a statement)
/// - **3000-3999**: Configuration errors
/// - **5000-5999**: Internal errors
///
/// Codes are stable across versions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
#[non_exhaustive]
pub enum ErrorCode {
    // === Connection Errors (1000-1999) ===
    /// WL-1001: No ambient session and no usable credentials
    SessionUnavailable = 1001,
    /// WL-1002: Warehouse endpoint could not be reached
    WarehouseUnreachable = 1002,
    /// WL-1003: Credential or token rejected by the warehouse
    CredentialsRejected = 1003,
    /// WL-1004: Host-injected session token could not be read
    AmbientTokenUnreadable = 1004,

    // === Query Errors (2000-2999) ===
    /// WL-2001: SQL compilation / syntax error
    SyntaxError = 2001,
    /// WL-2002: Table, view or column does not exist
    ObjectNotFound = 2002,
    /// WL-2003: Role lacks privileges for the statement
    PermissionDenied = 2003,
    /// WL-2004: Statement exceeded the warehouse timeout
    StatementTimeout = 2004,
    /// WL-2005: Statement failed for any other reason
    ExecutionFailed = 2005,
    /// WL-2006: Result set could not be decoded
    ResultDecodeFailed = 2006,
    /// WL-2007: Report parameter rejected before execution
    InvalidParameter = 2007,

    // === Configuration Errors (3000-3999) ===
    /// WL-3001: Config file missing, unreadable or malformed
    InvalidConfig = 3001,
    /// WL-3002: Config values failed validation
    ValidationFailed = 3002,

    // === Internal Errors (5000-5999) ===
    /// WL-5001: Serialization/deserialization failed
    SerializationFailed = 5001,
    /// WL-5002: Unexpected internal state
    Internal = 5002,

    /// WL-9999: Unknown/unclassified error
    Unknown = 9999,
}

impl ErrorCode {
    /// Get the numeric code value
    pub fn as_u16(&self) -> u16 {
        *self as u16
    }

    /// Get the formatted code string (e.g., "WL-2002")
    pub fn as_str(&self) -> String {
        format!("WL-{:04}", self.as_u16())
    }

    /// Get the error category
    pub fn category(&self) -> ErrorCategory {
        match self.as_u16() {
            1000..=1999 => ErrorCategory::Connection,
            2000..=2999 => ErrorCategory::Query,
            3000..=3999 => ErrorCategory::Config,
            _ => ErrorCategory::Internal,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<ErrorCode> for String {
    fn from(code: ErrorCode) -> String {
        code.as_str()
    }
}

impl TryFrom<String> for ErrorCode {
    type Error = String;

    fn try_from(s: String) -> std::result::Result<Self, Self::Error> {
        let num: u16 = s
            .strip_prefix("WL-")
            .and_then(|n| n.parse().ok())
            .ok_or_else(|| "Invalid format".to_string())?;
        Self::try_from(num).map_err(|_| "Unknown code".to_string())
    }
}

impl TryFrom<u16> for ErrorCode {
    type Error = String;

    fn try_from(n: u16) -> std::result::Result<Self, Self::Error> {
        match n {
            1001 => Ok(Self::SessionUnavailable),
            1002 => Ok(Self::WarehouseUnreachable),
            1003 => Ok(Self::CredentialsRejected),
            1004 => Ok(Self::AmbientTokenUnreadable),
            2001 => Ok(Self::SyntaxError),
            2002 => Ok(Self::ObjectNotFound),
            2003 => Ok(Self::PermissionDenied),
            2004 => Ok(Self::StatementTimeout),
            2005 => Ok(Self::ExecutionFailed),
            2006 => Ok(Self::ResultDecodeFailed),
            2007 => Ok(Self::InvalidParameter),
            3001 => Ok(Self::InvalidConfig),
            3002 => Ok(Self::ValidationFailed),
            5001 => Ok(Self::SerializationFailed),
            5002 => Ok(Self::Internal),
            9999 => Ok(Self::Unknown),
            _ => Err(format!("Unknown error code: {}", n)),
        }
    }
}

/// High-level error category, used for exit codes and user-facing messaging
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum ErrorCategory {
    Connection,
    Query,
    Config,
    Internal,
}
