use secrecy::SecretString;
use serde::Deserialize;
use std::time::Duration;
use validator::Validate;
use wealthlens_error::{ErrorCode, ErrorContext, WealthlensError};

// Default constants
pub const DEFAULT_QUERY_TTL_SECS: u64 = 600;
pub const DEFAULT_STATEMENT_TIMEOUT_SECS: u64 = 60;
pub const DEFAULT_AMBIENT_TOKEN_PATH: &str = "/snowflake/session/token";
pub const DEFAULT_LOG_LEVEL: &str = "info";
pub const DEFAULT_CONFIG_FILE: &str = "wealthlens.yaml";

/// Prefix for structured overrides, e.g. `WEALTHLENS__CACHE__TTL_SECONDS=30`.
pub const ENV_PREFIX: &str = "WEALTHLENS";
/// Prefix for the flat per-field connection variables, e.g. `SNOWFLAKE_USER`.
pub const WAREHOUSE_ENV_PREFIX: &str = "SNOWFLAKE";

fn deserialize_secret<'de, D>(deserializer: D) -> Result<Option<SecretString>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    Ok(s.filter(|v| !v.is_empty()).map(SecretString::from))
}

#[derive(Debug, Deserialize, Default, Clone, Validate)]
pub struct AppConfig {
    #[serde(default)]
    #[validate(nested)]
    pub snowflake: WarehouseSettings,
    #[serde(default)]
    #[validate(nested)]
    pub cache: QueryCacheConfig,
    #[serde(default)]
    pub logging: LoggingSettings,
}

/// Connection descriptor fields as they arrive from the configuration source.
///
/// Every identity field is optional here; which ones are required depends on
/// whether the session is ambient or constructed.
#[derive(Debug, Deserialize, Clone, Validate)]
pub struct WarehouseSettings {
    pub account: Option<String>,
    pub user: Option<String>,
    /// Programmatic access token. `password` is accepted as an alias.
    #[serde(default, alias = "password", deserialize_with = "deserialize_secret")]
    pub credential: Option<SecretString>,
    pub warehouse: Option<String>,
    pub database: Option<String>,
    pub schema: Option<String>,
    pub role: Option<String>,
    /// Base URL override; defaults to `https://{account}.snowflakecomputing.com`.
    #[validate(url)]
    pub host: Option<String>,
    #[serde(default = "default_statement_timeout")]
    #[validate(range(min = 1, max = 172800))]
    pub statement_timeout_secs: u64,
    #[serde(default = "default_ambient_token_path")]
    #[validate(length(min = 1))]
    pub ambient_token_path: String,
}

impl Default for WarehouseSettings {
    fn default() -> Self {
        Self {
            account: None,
            user: None,
            credential: None,
            warehouse: None,
            database: None,
            schema: None,
            role: None,
            host: None,
            statement_timeout_secs: default_statement_timeout(),
            ambient_token_path: default_ambient_token_path(),
        }
    }
}

fn default_statement_timeout() -> u64 {
    DEFAULT_STATEMENT_TIMEOUT_SECS
}

fn default_ambient_token_path() -> String {
    DEFAULT_AMBIENT_TOKEN_PATH.to_string()
}

impl WarehouseSettings {
    /// Overlay `SNOWFLAKE_<FIELD>` values on top of the file settings.
    ///
    /// Non-empty variables win over the file. `lookup` is usually
    /// `|k| std::env::var(k).ok()`.
    pub fn with_env_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |field: &str| {
            lookup(&format!("{}_{}", WAREHOUSE_ENV_PREFIX, field)).filter(|v| !v.is_empty())
        };

        if let Some(v) = get("ACCOUNT") {
            self.account = Some(v);
        }
        if let Some(v) = get("USER") {
            self.user = Some(v);
        }
        if let Some(v) = get("CREDENTIAL").or_else(|| get("PASSWORD")) {
            self.credential = Some(SecretString::from(v));
        }
        if let Some(v) = get("WAREHOUSE") {
            self.warehouse = Some(v);
        }
        if let Some(v) = get("DATABASE") {
            self.database = Some(v);
        }
        if let Some(v) = get("SCHEMA") {
            self.schema = Some(v);
        }
        if let Some(v) = get("ROLE") {
            self.role = Some(v);
        }
        self
    }

    /// Names of the settings a constructed session needs but does not have,
    /// in the order they are reported to the user.
    pub fn missing_required(&self) -> Vec<&'static str> {
        let present = |v: &Option<String>| v.as_deref().is_some_and(|s| !s.trim().is_empty());

        let mut missing = Vec::new();
        if !present(&self.user) {
            missing.push("USER");
        }
        if self.credential.is_none() {
            missing.push("CREDENTIAL");
        }
        if !present(&self.account) {
            missing.push("ACCOUNT");
        }
        if !present(&self.warehouse) {
            missing.push("WAREHOUSE");
        }
        if !present(&self.database) {
            missing.push("DATABASE");
        }
        if !present(&self.schema) {
            missing.push("SCHEMA");
        }
        missing
    }

    pub fn statement_timeout(&self) -> Duration {
        Duration::from_secs(self.statement_timeout_secs)
    }
}

// Query result cache configuration
#[derive(Debug, Deserialize, Clone, Validate)]
pub struct QueryCacheConfig {
    #[serde(default = "default_cache_ttl_seconds")]
    #[validate(range(min = 1))]
    pub ttl_seconds: u64,
    /// Capacity bound with least-recently-used eviction. `None` is unbounded.
    #[serde(default)]
    #[validate(range(min = 1))]
    pub max_entries: Option<usize>,
}

impl Default for QueryCacheConfig {
    fn default() -> Self {
        Self {
            ttl_seconds: default_cache_ttl_seconds(),
            max_entries: None,
        }
    }
}

impl QueryCacheConfig {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_seconds)
    }
}

fn default_cache_ttl_seconds() -> u64 {
    DEFAULT_QUERY_TTL_SECS
}

#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub format: LogFormat,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

impl AppConfig {
    /// Build the configuration from an optional file plus `WEALTHLENS__*`
    /// environment overrides, then validate it.
    ///
    /// A missing `wealthlens.yaml` is not an error; everything has a default
    /// and the connection fields can still arrive through `SNOWFLAKE_*`
    /// variables. A file named explicitly must exist.
    pub fn load(path: Option<&str>) -> wealthlens_error::Result<Self> {
        let explicit = path.is_some();
        let path = path.unwrap_or(DEFAULT_CONFIG_FILE);
        let builder = config::Config::builder();

        let builder = if std::path::Path::new(path).exists() {
            builder.add_source(config::File::with_name(path))
        } else if explicit {
            return Err(WealthlensError::new(
                ErrorCode::InvalidConfig,
                format!("Configuration file not found: {}", path),
            )
            .with_context(ErrorContext::Config {
                file_path: Some(path.to_string()),
                field: None,
            })
            .with_hint("Check the --config path or WEALTHLENS_CONFIG"));
        } else {
            builder
        };

        // WEALTHLENS__CACHE__TTL_SECONDS -> cache.ttl_seconds
        let builder = builder.add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true),
        );

        let config_error = |e: config::ConfigError| {
            WealthlensError::new(ErrorCode::InvalidConfig, e.to_string()).with_context(
                ErrorContext::Config {
                    file_path: Some(path.to_string()),
                    field: None,
                },
            )
        };

        let app_config: AppConfig = builder
            .build()
            .map_err(config_error)?
            .try_deserialize()
            .map_err(config_error)?;

        app_config.validate().map_err(|e| {
            WealthlensError::new(
                ErrorCode::ValidationFailed,
                format!("Configuration validation failed: {}", e),
            )
            .with_context(ErrorContext::Config {
                file_path: Some(path.to_string()),
                field: e.field_errors().keys().next().map(|k| k.to_string()),
            })
        })?;

        Ok(app_config)
    }

    /// Connection settings with `SNOWFLAKE_*` process variables applied.
    pub fn warehouse_settings(&self) -> WarehouseSettings {
        self.snowflake
            .clone()
            .with_env_overrides(|k| std::env::var(k).ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;
    use std::collections::HashMap;
    use std::io::Write;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |k| map.get(k).cloned()
    }

    #[test]
    fn test_app_config_defaults_validate() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.cache.ttl_seconds, 600);
        assert_eq!(config.cache.max_entries, None);
        assert_eq!(config.snowflake.ambient_token_path, "/snowflake/session/token");
    }

    #[test]
    fn test_yaml_parsing_with_password_alias() {
        let yaml = r#"
snowflake:
  account: xy12345
  user: ANALYST
  password: "pat-secret"
  warehouse: COMPUTE_WH
  database: FSI_DEMOS
  schema: WEALTH_360
cache:
  ttl_seconds: 30
logging:
  format: json
"#;
        let config: AppConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.snowflake.account.as_deref(), Some("xy12345"));
        assert_eq!(
            config.snowflake.credential.as_ref().map(|s| s.expose_secret()),
            Some("pat-secret")
        );
        assert_eq!(config.cache.ttl_seconds, 30);
        assert_eq!(config.logging.format, LogFormat::Json);
        assert!(config.snowflake.missing_required().is_empty());
    }

    #[test]
    fn test_credential_is_redacted_in_debug() {
        let settings = WarehouseSettings::default()
            .with_env_overrides(lookup(&[("SNOWFLAKE_CREDENTIAL", "super-secret")]));
        let debug = format!("{:?}", settings);
        assert!(!debug.contains("super-secret"));
    }

    #[test]
    fn test_env_overrides_win_over_file() {
        let settings = WarehouseSettings {
            account: Some("file_account".to_string()),
            user: Some("file_user".to_string()),
            ..Default::default()
        }
        .with_env_overrides(lookup(&[
            ("SNOWFLAKE_ACCOUNT", "env_account"),
            ("SNOWFLAKE_USER", ""),
            ("SNOWFLAKE_PASSWORD", "pw"),
            ("SNOWFLAKE_ROLE", "ANALYST_ROLE"),
        ]));

        assert_eq!(settings.account.as_deref(), Some("env_account"));
        // Empty variables are ignored
        assert_eq!(settings.user.as_deref(), Some("file_user"));
        assert_eq!(settings.role.as_deref(), Some("ANALYST_ROLE"));
        assert!(settings.credential.is_some());
    }

    #[test]
    fn test_missing_required_reports_all_fields_in_order() {
        let settings = WarehouseSettings {
            account: Some("xy12345".to_string()),
            schema: Some("   ".to_string()),
            ..Default::default()
        };
        assert_eq!(
            settings.missing_required(),
            vec!["USER", "CREDENTIAL", "WAREHOUSE", "DATABASE", "SCHEMA"]
        );
    }

    #[test]
    fn test_invalid_host_fails_validation() {
        let settings = WarehouseSettings {
            host: Some("not a url".to_string()),
            ..Default::default()
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_zero_ttl_fails_validation() {
        let cache = QueryCacheConfig {
            ttl_seconds: 0,
            max_entries: None,
        };
        assert!(cache.validate().is_err());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(
            file,
            "snowflake:\n  account: abc\n  statement_timeout_secs: 120\ncache:\n  max_entries: 64"
        )
        .unwrap();

        let config = AppConfig::load(file.path().to_str()).unwrap();
        assert_eq!(config.snowflake.account.as_deref(), Some("abc"));
        assert_eq!(config.snowflake.statement_timeout_secs, 120);
        assert_eq!(config.cache.max_entries, Some(64));
        assert_eq!(config.cache.ttl_seconds, DEFAULT_QUERY_TTL_SECS);
    }

    #[test]
    fn test_load_rejects_invalid_values() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(file, "cache:\n  ttl_seconds: 0").unwrap();

        let err = AppConfig::load(file.path().to_str()).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
    }

    #[test]
    fn test_load_without_file_uses_defaults() {
        let config = AppConfig::load(None).unwrap();
        assert_eq!(config.cache.ttl_seconds, DEFAULT_QUERY_TTL_SECS);
    }

    #[test]
    fn test_load_rejects_missing_explicit_file() {
        let err = AppConfig::load(Some("/nonexistent/wealthlens.yaml")).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidConfig);
        assert!(err.hint.is_some());
        match err.context {
            Some(ErrorContext::Config { file_path, .. }) => {
                assert_eq!(file_path.as_deref(), Some("/nonexistent/wealthlens.yaml"));
            }
            other => panic!("unexpected context: {:?}", other),
        }
    }
}
