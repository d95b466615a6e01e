#![allow(dead_code)]

use async_trait::async_trait;
use secrecy::SecretString;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use wealthlens_common::config::{QueryCacheConfig, WarehouseSettings};
use wealthlens_common::{BindValue, Column, ColumnType, ResultTable, Scalar};
use wealthlens_runtime::{ManualClock, QueryService};
use wealthlens_warehouse::{
    ConnectionDescriptor, ConstructedSessionStrategy, DriverError, SessionHandle, SessionProvider,
    WarehouseDriver, WarehouseSession,
};

type Responder = dyn Fn(&str, &[BindValue]) -> Result<ResultTable, DriverError> + Send + Sync;

/// In-process driver answering statements from a closure and counting calls.
#[derive(Clone)]
pub struct FakeDriver {
    pub opens: Arc<AtomicUsize>,
    pub executions: Arc<AtomicUsize>,
    pub in_flight: Arc<AtomicUsize>,
    pub max_in_flight: Arc<AtomicUsize>,
    pub fail_open: bool,
    pub latency: Duration,
    responder: Arc<Responder>,
}

impl FakeDriver {
    pub fn new<F>(responder: F) -> Self
    where
        F: Fn(&str, &[BindValue]) -> Result<ResultTable, DriverError> + Send + Sync + 'static,
    {
        Self {
            opens: Arc::new(AtomicUsize::new(0)),
            executions: Arc::new(AtomicUsize::new(0)),
            in_flight: Arc::new(AtomicUsize::new(0)),
            max_in_flight: Arc::new(AtomicUsize::new(0)),
            fail_open: false,
            latency: Duration::ZERO,
            responder: Arc::new(responder),
        }
    }

    /// Answers `SELECT 1 AS X` and rejects anything starting with `SELEC `.
    pub fn scripted() -> Self {
        Self::new(|sql, _| {
            if sql.starts_with("SELEC ") {
                return Err(DriverError::Statement {
                    message: "SQL compilation error: syntax error".to_string(),
                    sql_preview: sql.to_string(),
                    sql_state: Some("42000".to_string()),
                    vendor_code: Some("001003".to_string()),
                    statement_handle: None,
                });
            }
            Ok(single_int("X", 1))
        })
    }

    pub fn executions(&self) -> usize {
        self.executions.load(Ordering::SeqCst)
    }

    pub fn opens(&self) -> usize {
        self.opens.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl WarehouseDriver for FakeDriver {
    async fn open(&self, _descriptor: &ConnectionDescriptor) -> Result<SessionHandle, DriverError> {
        self.opens.fetch_add(1, Ordering::SeqCst);
        if self.fail_open {
            return Err(DriverError::CredentialsRejected {
                status: 401,
                message: "Incorrect username or password".to_string(),
            });
        }
        Ok(Arc::new(FakeSession {
            driver: self.clone(),
        }))
    }
}

pub struct FakeSession {
    driver: FakeDriver,
}

impl std::fmt::Debug for FakeSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("FakeSession")
    }
}

#[async_trait]
impl WarehouseSession for FakeSession {
    async fn execute(&self, sql: &str, params: &[BindValue]) -> Result<ResultTable, DriverError> {
        let d = &self.driver;
        d.executions.fetch_add(1, Ordering::SeqCst);
        let now = d.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        d.max_in_flight.fetch_max(now, Ordering::SeqCst);
        if !d.latency.is_zero() {
            tokio::time::sleep(d.latency).await;
        }
        let result = (d.responder)(sql, params);
        d.in_flight.fetch_sub(1, Ordering::SeqCst);
        result
    }
}

pub fn single_int(column: &str, value: i64) -> ResultTable {
    ResultTable::try_from_rows(
        vec![Column::new(column, ColumnType::Integer)],
        vec![vec![Scalar::Integer(value)]],
    )
    .expect("one column, one cell")
}

pub fn complete_settings() -> WarehouseSettings {
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

pub fn service_with(
    driver: &FakeDriver,
    settings: WarehouseSettings,
) -> (QueryService, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::new());
    let provider = SessionProvider::new(
        Arc::new(driver.clone()),
        Box::new(ConstructedSessionStrategy::new(settings)),
    );
    let service = QueryService::with_clock(provider, &QueryCacheConfig::default(), clock.clone());
    (service, clock)
}

pub fn service(driver: &FakeDriver) -> (QueryService, Arc<ManualClock>) {
    service_with(driver, complete_settings())
}
