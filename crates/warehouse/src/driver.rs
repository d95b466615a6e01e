//! The seam between query execution and a concrete warehouse.

use crate::error::DriverError;
use async_trait::async_trait;
use secrecy::SecretString;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use url::Url;
use wealthlens_common::{BindValue, ResultTable};

/// Shared, opaque warehouse session.
pub type SessionHandle = Arc<dyn WarehouseSession>;

/// How the warehouse should interpret the bearer token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// Host-injected OAuth token
    OAuth,
    /// Credential issued to a named user
    ProgrammaticAccessToken,
}

impl TokenKind {
    pub fn header_value(&self) -> &'static str {
        match self {
            TokenKind::OAuth => "OAUTH",
            TokenKind::ProgrammaticAccessToken => "PROGRAMMATIC_ACCESS_TOKEN",
        }
    }
}

/// Where the bearer token comes from.
#[derive(Clone)]
pub enum TokenSource {
    Static(SecretString, TokenKind),
    /// Re-read on every request; hosts rotate this file in place.
    File(PathBuf),
}

impl TokenSource {
    pub fn kind(&self) -> TokenKind {
        match self {
            TokenSource::Static(_, kind) => *kind,
            TokenSource::File(_) => TokenKind::OAuth,
        }
    }

    pub async fn resolve(&self) -> Result<SecretString, DriverError> {
        match self {
            TokenSource::Static(secret, _) => Ok(secret.clone()),
            TokenSource::File(path) => {
                let token = tokio::fs::read_to_string(path).await.map_err(|source| {
                    DriverError::TokenUnreadable {
                        path: path.display().to_string(),
                        source,
                    }
                })?;
                Ok(SecretString::from(token.trim().to_string()))
            }
        }
    }
}

impl fmt::Debug for TokenSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenSource::Static(_, kind) => f
                .debug_tuple("Static")
                .field(&"[REDACTED]")
                .field(kind)
                .finish(),
            TokenSource::File(path) => f.debug_tuple("File").field(path).finish(),
        }
    }
}

/// Everything a driver needs to open a session.
#[derive(Debug, Clone)]
pub struct ConnectionDescriptor {
    pub base_url: Url,
    pub account: Option<String>,
    pub user: Option<String>,
    pub credential: TokenSource,
    pub database: Option<String>,
    pub schema: Option<String>,
    pub warehouse: Option<String>,
    pub role: Option<String>,
    pub statement_timeout: Duration,
}

impl ConnectionDescriptor {
    /// Host portion of the base URL, for logs and error contexts.
    pub fn host(&self) -> Option<String> {
        self.base_url.host_str().map(str::to_string)
    }
}

/// An open warehouse session.
///
/// Implementations need not support concurrent statements; callers serialize
/// `execute` on a single handle.
#[async_trait]
pub trait WarehouseSession: Send + Sync + fmt::Debug {
    /// Run one statement with positional `?` parameters and materialize every row.
    async fn execute(&self, sql: &str, params: &[BindValue]) -> Result<ResultTable, DriverError>;
}

#[async_trait]
pub trait WarehouseDriver: Send + Sync {
    /// Open and verify a session. Failures here mean no usable session.
    async fn open(&self, descriptor: &ConnectionDescriptor) -> Result<SessionHandle, DriverError>;
}
