//! Structured exit codes so scripts can tell failure kinds apart.

use wealthlens_error::{ErrorCategory, WealthlensError};

/// General error (fallback for unknown errors)
pub const GENERAL_ERROR: i32 = 1;

/// Configuration error (unreadable file, failed validation)
pub const CONFIG_ERROR: i32 = 3;

/// Connection error (no session, unreachable warehouse, rejected credentials)
pub const CONNECTION_ERROR: i32 = 4;

/// Query error (the warehouse rejected or failed a statement)
pub const QUERY_ERROR: i32 = 5;

pub fn for_error(e: &anyhow::Error) -> i32 {
    match e.downcast_ref::<WealthlensError>() {
        Some(err) => for_category(err.category()),
        None => GENERAL_ERROR,
    }
}

pub fn for_category(category: ErrorCategory) -> i32 {
    match category {
        ErrorCategory::Connection => CONNECTION_ERROR,
        ErrorCategory::Query => QUERY_ERROR,
        ErrorCategory::Config => CONFIG_ERROR,
        ErrorCategory::Internal => GENERAL_ERROR,
        _ => GENERAL_ERROR,
    }
}
