#![allow(dead_code)]

use async_trait::async_trait;
use secrecy::SecretString;
use std::sync::{Arc, Mutex};
use wealthlens_common::config::{QueryCacheConfig, WarehouseSettings};
use wealthlens_common::{BindValue, Column, ColumnType, ResultTable, Scalar};
use wealthlens_runtime::QueryService;
use wealthlens_warehouse::{
    ConnectionDescriptor, ConstructedSessionStrategy, DriverError, SessionHandle, SessionProvider,
    WarehouseDriver, WarehouseSession,
};

/// One statement as the warehouse saw it.
#[derive(Debug, Clone)]
pub struct Executed {
    pub sql: String,
    pub params: Vec<BindValue>,
}

type Route = (String, ResultTable);

/// Warehouse stand-in that answers by matching a fragment of the SQL text.
/// Unrouted statements return an empty table.
#[derive(Clone, Default)]
pub struct RoutedWarehouse {
    routes: Arc<Mutex<Vec<Route>>>,
    log: Arc<Mutex<Vec<Executed>>>,
}

impl RoutedWarehouse {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn route(self, fragment: &str, table: ResultTable) -> Self {
        self.routes
            .lock()
            .unwrap()
            .push((fragment.to_string(), table));
        self
    }

    pub fn executed(&self) -> Vec<Executed> {
        self.log.lock().unwrap().clone()
    }

    pub fn execution_count(&self) -> usize {
        self.log.lock().unwrap().len()
    }

    fn answer(&self, sql: &str, params: &[BindValue]) -> ResultTable {
        self.log.lock().unwrap().push(Executed {
            sql: sql.to_string(),
            params: params.to_vec(),
        });
        self.routes
            .lock()
            .unwrap()
            .iter()
            .find(|(fragment, _)| sql.contains(fragment.as_str()))
            .map(|(_, table)| table.clone())
            .unwrap_or_else(|| ResultTable::empty(Vec::new()))
    }

    pub fn service(&self) -> QueryService {
        let settings = WarehouseSettings {
            account: Some("xy12345".to_string()),
            user: Some("ANALYST".to_string()),
            credential: Some(SecretString::from("pat".to_string())),
            warehouse: Some("COMPUTE_WH".to_string()),
            database: Some("FSI_DEMOS".to_string()),
            schema: Some("WEALTH_360".to_string()),
            ..Default::default()
        };
        let provider = SessionProvider::new(
            Arc::new(self.clone()),
            Box::new(ConstructedSessionStrategy::new(settings)),
        );
        QueryService::new(provider, &QueryCacheConfig::default())
    }
}

#[async_trait]
impl WarehouseDriver for RoutedWarehouse {
    async fn open(&self, _descriptor: &ConnectionDescriptor) -> Result<SessionHandle, DriverError> {
        Ok(Arc::new(RoutedSession {
            warehouse: self.clone(),
        }))
    }
}

pub struct RoutedSession {
    warehouse: RoutedWarehouse,
}

impl std::fmt::Debug for RoutedSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("RoutedSession")
    }
}

#[async_trait]
impl WarehouseSession for RoutedSession {
    async fn execute(&self, sql: &str, params: &[BindValue]) -> Result<ResultTable, DriverError> {
        Ok(self.warehouse.answer(sql, params))
    }
}

pub fn table(columns: &[(&str, ColumnType)], rows: Vec<Vec<Scalar>>) -> ResultTable {
    ResultTable::try_from_rows(
        columns
            .iter()
            .map(|(name, ty)| Column::new(*name, *ty))
            .collect(),
        rows,
    )
    .expect("rows match columns")
}

pub fn text(value: &str) -> Scalar {
    Scalar::Text(value.to_string())
}
