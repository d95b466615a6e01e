//! Session detection driven by process environment variables.

use serial_test::serial;
use std::sync::Arc;
use wealthlens_common::config::WarehouseSettings;
use wealthlens_error::{ErrorCode, ErrorContext};
use wealthlens_warehouse::{SessionProvider, SnowflakeDriver, StrategyKind};

const SNOWFLAKE_VARS: &[&str] = &[
    "SNOWFLAKE_HOST",
    "SNOWFLAKE_ACCOUNT",
    "SNOWFLAKE_USER",
    "SNOWFLAKE_PASSWORD",
    "SNOWFLAKE_CREDENTIAL",
    "SNOWFLAKE_WAREHOUSE",
    "SNOWFLAKE_DATABASE",
    "SNOWFLAKE_SCHEMA",
    "SNOWFLAKE_ROLE",
];

/// Sets variables for the duration of a test and clears every
/// `SNOWFLAKE_*` variable on drop.
struct EnvGuard;

impl EnvGuard {
    fn new(vars: &[(&str, &str)]) -> Self {
        for key in SNOWFLAKE_VARS {
            std::env::remove_var(key);
        }
        for (k, v) in vars {
            std::env::set_var(k, v);
        }
        EnvGuard
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        for key in SNOWFLAKE_VARS {
            std::env::remove_var(key);
        }
    }
}

fn settings_with_token(path: &std::path::Path) -> WarehouseSettings {
    WarehouseSettings {
        ambient_token_path: path.display().to_string(),
        ..Default::default()
    }
}

#[tokio::test]
#[serial]
async fn test_nothing_configured_is_connection_error() {
    let _env = EnvGuard::new(&[]);
    let settings = WarehouseSettings {
        ambient_token_path: "/nonexistent/token".to_string(),
        ..Default::default()
    };

    let provider = SessionProvider::detect(Arc::new(SnowflakeDriver::new()), &settings);
    assert_eq!(provider.strategy_kind(), StrategyKind::Constructed);

    let err = provider.get_session().await.unwrap_err();
    assert_eq!(err.code, ErrorCode::SessionUnavailable);
    assert!(err.is_connection_error());
    assert!(matches!(err.context, Some(ErrorContext::MissingSettings { .. })));
}

#[tokio::test]
#[serial]
async fn test_env_password_alias_fills_credential() {
    let _env = EnvGuard::new(&[
        ("SNOWFLAKE_USER", "ANALYST"),
        ("SNOWFLAKE_PASSWORD", "pat"),
        ("SNOWFLAKE_ACCOUNT", "xy12345"),
        ("SNOWFLAKE_WAREHOUSE", "COMPUTE_WH"),
        ("SNOWFLAKE_DATABASE", "FSI_DEMOS"),
    ]);
    let settings = WarehouseSettings {
        ambient_token_path: "/nonexistent/token".to_string(),
        ..Default::default()
    };

    let provider = SessionProvider::detect(Arc::new(SnowflakeDriver::new()), &settings);
    let err = provider.get_session().await.unwrap_err();
    match err.context {
        Some(ErrorContext::MissingSettings { fields }) => assert_eq!(fields, vec!["SCHEMA"]),
        other => panic!("unexpected context: {:?}", other),
    }
}

#[test]
#[serial]
fn test_token_file_and_host_select_ambient() {
    let token = tempfile::NamedTempFile::new().unwrap();
    std::fs::write(token.path(), "oauth-token").unwrap();

    let _env = EnvGuard::new(&[("SNOWFLAKE_HOST", "acct.snowflakecomputing.com")]);
    let provider = SessionProvider::detect(
        Arc::new(SnowflakeDriver::new()),
        &settings_with_token(token.path()),
    );
    assert_eq!(provider.strategy_kind(), StrategyKind::Ambient);
}

#[test]
#[serial]
fn test_token_file_without_host_is_constructed() {
    let token = tempfile::NamedTempFile::new().unwrap();

    let _env = EnvGuard::new(&[]);
    let provider = SessionProvider::detect(
        Arc::new(SnowflakeDriver::new()),
        &settings_with_token(token.path()),
    );
    assert_eq!(provider.strategy_kind(), StrategyKind::Constructed);
}
