//! Session acquisition.
//!
//! A hosting environment may inject a ready-made session (an OAuth token file
//! plus the `SNOWFLAKE_HOST` variable). When it does, that ambient session is
//! used; otherwise a session is constructed from [`WarehouseSettings`]. The
//! choice is made once, when the provider is built, and the opened handle is
//! memoized for the provider's lifetime.

use crate::driver::{ConnectionDescriptor, SessionHandle, TokenKind, TokenSource, WarehouseDriver};
use async_trait::async_trait;
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::OnceCell;
use url::Url;
use wealthlens_common::config::WarehouseSettings;
use wealthlens_error::{ErrorCode, ErrorContext, Result, WealthlensError};

pub const AMBIENT_HOST_VAR: &str = "SNOWFLAKE_HOST";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StrategyKind {
    Ambient,
    Constructed,
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StrategyKind::Ambient => f.write_str("ambient"),
            StrategyKind::Constructed => f.write_str("constructed"),
        }
    }
}

/// One way of obtaining a session.
#[async_trait]
pub trait SessionStrategy: Send + Sync {
    fn kind(&self) -> StrategyKind;

    /// Build the descriptor this strategy would connect with.
    fn descriptor(&self) -> Result<ConnectionDescriptor>;

    async fn connect(&self, driver: &dyn WarehouseDriver) -> Result<SessionHandle> {
        let descriptor = self.descriptor()?;
        driver.open(&descriptor).await.map_err(|e| {
            let error = WealthlensError::from(e);
            match error.context {
                Some(_) => error,
                None => error.with_context(ErrorContext::Connection {
                    strategy: self.kind().to_string(),
                    account: descriptor.account.clone(),
                    host: descriptor.host(),
                }),
            }
        })
    }
}

/// Reuses the session the hosting environment injected.
#[derive(Debug, Clone)]
pub struct AmbientSessionStrategy {
    base_url: String,
    token_path: PathBuf,
    account: Option<String>,
    database: Option<String>,
    schema: Option<String>,
    warehouse: Option<String>,
    role: Option<String>,
    statement_timeout: Duration,
}

impl AmbientSessionStrategy {
    /// Capability probe: an ambient session exists when the token file is
    /// readable and `SNOWFLAKE_HOST` is set.
    ///
    /// Object names fall back to `settings` when the host does not provide them.
    pub fn probe<F>(settings: &WarehouseSettings, lookup: F) -> Option<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let token_path = PathBuf::from(&settings.ambient_token_path);
        if !token_readable(&token_path) {
            return None;
        }
        let host = lookup(AMBIENT_HOST_VAR).filter(|h| !h.trim().is_empty())?;
        let base_url = if host.contains("://") {
            host
        } else {
            format!("https://{}", host.trim())
        };

        let env_or = |name: &str, fallback: &Option<String>| {
            lookup(&format!("SNOWFLAKE_{}", name))
                .filter(|v| !v.is_empty())
                .or_else(|| fallback.clone())
        };

        Some(Self {
            base_url,
            token_path,
            account: env_or("ACCOUNT", &settings.account),
            database: env_or("DATABASE", &settings.database),
            schema: env_or("SCHEMA", &settings.schema),
            warehouse: env_or("WAREHOUSE", &settings.warehouse),
            role: env_or("ROLE", &settings.role),
            statement_timeout: settings.statement_timeout(),
        })
    }
}

fn token_readable(path: &Path) -> bool {
    path.is_file() && std::fs::File::open(path).is_ok()
}

#[async_trait]
impl SessionStrategy for AmbientSessionStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Ambient
    }

    fn descriptor(&self) -> Result<ConnectionDescriptor> {
        let base_url = Url::parse(&self.base_url).map_err(|e| {
            WealthlensError::new(
                ErrorCode::SessionUnavailable,
                format!("{} is not a valid host: {}", AMBIENT_HOST_VAR, e),
            )
        })?;

        Ok(ConnectionDescriptor {
            base_url,
            account: self.account.clone(),
            user: None,
            credential: TokenSource::File(self.token_path.clone()),
            database: self.database.clone(),
            schema: self.schema.clone(),
            warehouse: self.warehouse.clone(),
            role: self.role.clone(),
            statement_timeout: self.statement_timeout,
        })
    }
}

/// Opens a new session from explicit connection settings.
#[derive(Debug, Clone)]
pub struct ConstructedSessionStrategy {
    settings: WarehouseSettings,
}

impl ConstructedSessionStrategy {
    pub fn new(settings: WarehouseSettings) -> Self {
        Self { settings }
    }
}

#[async_trait]
impl SessionStrategy for ConstructedSessionStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Constructed
    }

    fn descriptor(&self) -> Result<ConnectionDescriptor> {
        let missing = self.settings.missing_required();
        if !missing.is_empty() {
            return Err(WealthlensError::new(
                ErrorCode::SessionUnavailable,
                format!(
                    "No ambient session and missing connection settings: {}",
                    missing.join(", ")
                ),
            )
            .with_context(ErrorContext::MissingSettings {
                fields: missing.iter().map(|f| f.to_string()).collect(),
            })
            .with_hint(
                "Set SNOWFLAKE_<FIELD> environment variables or the snowflake section of wealthlens.yaml",
            ));
        }

        let (Some(account), Some(credential)) = (&self.settings.account, &self.settings.credential)
        else {
            return Err(WealthlensError::new(
                ErrorCode::SessionUnavailable,
                "Connection settings are incomplete",
            ));
        };

        let raw_url = self
            .settings
            .host
            .clone()
            .unwrap_or_else(|| format!("https://{}.snowflakecomputing.com", account.trim()));
        let base_url = Url::parse(&raw_url).map_err(|e| {
            WealthlensError::new(
                ErrorCode::SessionUnavailable,
                format!("Invalid warehouse URL '{}': {}", raw_url, e),
            )
            .with_context(ErrorContext::Connection {
                strategy: self.kind().to_string(),
                account: Some(account.clone()),
                host: None,
            })
        })?;

        Ok(ConnectionDescriptor {
            base_url,
            account: Some(account.clone()),
            user: self.settings.user.clone(),
            credential: TokenSource::Static(credential.clone(), TokenKind::ProgrammaticAccessToken),
            database: self.settings.database.clone(),
            schema: self.settings.schema.clone(),
            warehouse: self.settings.warehouse.clone(),
            role: self.settings.role.clone(),
            statement_timeout: self.settings.statement_timeout(),
        })
    }
}

/// Hands out one warehouse session, opened on first use.
///
/// A failed attempt is not remembered; the next call tries again.
pub struct SessionProvider {
    driver: Arc<dyn WarehouseDriver>,
    strategy: Box<dyn SessionStrategy>,
    session: OnceCell<SessionHandle>,
}

impl SessionProvider {
    pub fn new(driver: Arc<dyn WarehouseDriver>, strategy: Box<dyn SessionStrategy>) -> Self {
        Self {
            driver,
            strategy,
            session: OnceCell::new(),
        }
    }

    /// Choose ambient or constructed from the process environment.
    pub fn detect(driver: Arc<dyn WarehouseDriver>, settings: &WarehouseSettings) -> Self {
        Self::detect_with(driver, settings, |k| std::env::var(k).ok())
    }

    pub fn detect_with<F>(
        driver: Arc<dyn WarehouseDriver>,
        settings: &WarehouseSettings,
        lookup: F,
    ) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let ambient = AmbientSessionStrategy::probe(settings, &lookup);
        let strategy: Box<dyn SessionStrategy> = match ambient {
            Some(ambient) => Box::new(ambient),
            None => Box::new(ConstructedSessionStrategy::new(
                settings.clone().with_env_overrides(&lookup),
            )),
        };

        tracing::info!(
            target: "session",
            strategy = %strategy.kind(),
            "Session strategy selected"
        );
        Self::new(driver, strategy)
    }

    pub fn strategy_kind(&self) -> StrategyKind {
        self.strategy.kind()
    }

    pub fn is_connected(&self) -> bool {
        self.session.initialized()
    }

    /// The memoized session, opening it on first call.
    pub async fn get_session(&self) -> Result<SessionHandle> {
        let session = self
            .session
            .get_or_try_init(|| async {
                let started = Instant::now();
                let result = self.strategy.connect(self.driver.as_ref()).await;
                match &result {
                    Ok(_) => tracing::info!(
                        target: "session",
                        strategy = %self.strategy.kind(),
                        elapsed_ms = started.elapsed().as_millis() as u64,
                        "Warehouse session opened"
                    ),
                    Err(e) => tracing::warn!(
                        target: "session",
                        strategy = %self.strategy.kind(),
                        code = %e.code,
                        "Warehouse session unavailable: {}",
                        e.message
                    ),
                }
                result
            })
            .await?;
        Ok(Arc::clone(session))
    }
}

impl fmt::Debug for SessionProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionProvider")
            .field("strategy", &self.strategy.kind())
            .field("connected", &self.is_connected())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::SecretString;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |k| map.get(k).cloned()
    }

    fn complete_settings() -> WarehouseSettings {
        WarehouseSettings {
            account: Some("xy12345".to_string()),
            user: Some("ANALYST".to_string()),
            credential: Some(SecretString::from("pat".to_string())),
            warehouse: Some("COMPUTE_WH".to_string()),
            database: Some("FSI_DEMOS".to_string()),
            schema: Some("WEALTH_360".to_string()),
            ambient_token_path: "/nonexistent/token".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_ambient_requires_token_and_host() {
        let token = tempfile::NamedTempFile::new().unwrap();
        let settings = WarehouseSettings {
            ambient_token_path: token.path().display().to_string(),
            ..Default::default()
        };

        assert!(AmbientSessionStrategy::probe(&settings, lookup(&[])).is_none());
        assert!(AmbientSessionStrategy::probe(
            &WarehouseSettings::default(),
            lookup(&[("SNOWFLAKE_HOST", "acct.snowflakecomputing.com")])
        )
        .is_none());

        let ambient = AmbientSessionStrategy::probe(
            &settings,
            lookup(&[
                ("SNOWFLAKE_HOST", "acct.snowflakecomputing.com"),
                ("SNOWFLAKE_DATABASE", "FSI_DEMOS"),
            ]),
        )
        .unwrap();
        let descriptor = ambient.descriptor().unwrap();
        assert_eq!(descriptor.base_url.as_str(), "https://acct.snowflakecomputing.com/");
        assert_eq!(descriptor.database.as_deref(), Some("FSI_DEMOS"));
        assert_eq!(descriptor.credential.kind(), TokenKind::OAuth);
    }

    #[test]
    fn test_constructed_descriptor_uses_account_url() {
        let descriptor = ConstructedSessionStrategy::new(complete_settings())
            .descriptor()
            .unwrap();
        assert_eq!(
            descriptor.base_url.as_str(),
            "https://xy12345.snowflakecomputing.com/"
        );
        assert_eq!(descriptor.credential.kind(), TokenKind::ProgrammaticAccessToken);
        assert_eq!(descriptor.statement_timeout, Duration::from_secs(60));
    }

    #[test]
    fn test_constructed_reports_every_missing_field() {
        let err = ConstructedSessionStrategy::new(WarehouseSettings::default())
            .descriptor()
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::SessionUnavailable);
        assert!(err.is_connection_error());
        match err.context {
            Some(ErrorContext::MissingSettings { fields }) => assert_eq!(
                fields,
                vec!["USER", "CREDENTIAL", "ACCOUNT", "WAREHOUSE", "DATABASE", "SCHEMA"]
            ),
            other => panic!("unexpected context: {:?}", other),
        }
    }

    #[test]
    fn test_detect_falls_back_to_constructed() {
        let driver: Arc<dyn WarehouseDriver> = Arc::new(crate::SnowflakeDriver::new());
        let provider = SessionProvider::detect_with(
            driver,
            &complete_settings(),
            lookup(&[("SNOWFLAKE_HOST", "acct.snowflakecomputing.com")]),
        );
        assert_eq!(provider.strategy_kind(), StrategyKind::Constructed);
        assert!(!provider.is_connected());
    }
}
