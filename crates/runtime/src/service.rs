use crate::cache::{CacheStatus, TimedCache};
use crate::clock::{Clock, SystemClock};
use crate::request::{CacheKey, QueryRequest};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::{info, warn};
use wealthlens_common::config::QueryCacheConfig;
use wealthlens_common::scrubber::sql_preview;
use wealthlens_common::ResultTable;
use wealthlens_error::{Result, WealthlensError};
use wealthlens_warehouse::{SessionHandle, SessionProvider};

/// A result table plus how it was obtained.
#[derive(Debug, Clone)]
pub struct QueryOutcome {
    pub table: ResultTable,
    pub cache_status: CacheStatus,
    pub cache_key: CacheKey,
}

/// Runs statements through the provider's session, caching results.
///
/// Statements on the shared session are serialized; cache hits are served
/// without waiting for in-flight statements.
#[derive(Debug)]
pub struct QueryService {
    provider: SessionProvider,
    cache: TimedCache<CacheKey, ResultTable>,
    default_ttl: Duration,
    execution: Mutex<()>,
}

impl QueryService {
    pub fn new(provider: SessionProvider, cache_config: &QueryCacheConfig) -> Self {
        Self::with_clock(provider, cache_config, Arc::new(SystemClock))
    }

    pub fn with_clock(
        provider: SessionProvider,
        cache_config: &QueryCacheConfig,
        clock: Arc<dyn Clock>,
    ) -> Self {
        info!(
            target: "cache",
            ttl_seconds = cache_config.ttl_seconds,
            max_entries = ?cache_config.max_entries,
            "Initializing query cache"
        );
        Self {
            provider,
            cache: TimedCache::new(clock).with_max_entries(cache_config.max_entries),
            default_ttl: cache_config.ttl(),
            execution: Mutex::new(()),
        }
    }

    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    pub fn provider(&self) -> &SessionProvider {
        &self.provider
    }

    pub async fn get_session(&self) -> Result<SessionHandle> {
        self.provider.get_session().await
    }

    pub async fn run_query(&self, request: &QueryRequest) -> Result<ResultTable> {
        self.execute(request).await.map(|outcome| outcome.table)
    }

    /// Convenience for parameterless statements with the default TTL.
    pub async fn run_sql(&self, sql: &str) -> Result<ResultTable> {
        self.run_query(&QueryRequest::new(sql)).await
    }

    pub async fn execute(&self, request: &QueryRequest) -> Result<QueryOutcome> {
        let key = request.cache_key();
        let ttl = request.ttl().unwrap_or(self.default_ttl);
        let started = Instant::now();

        let lookup = self
            .cache
            .get_or_compute(key.clone(), ttl, || self.execute_uncached(request))
            .await;

        match lookup {
            Ok(lookup) => {
                info!(
                    target: "queries",
                    cache_key = %key,
                    cache_hit = lookup.status.is_hit(),
                    rows = lookup.value.row_count(),
                    ttl_seconds = ttl.as_secs(),
                    duration_ms = started.elapsed().as_millis() as u64,
                    sql = %sql_preview(request.sql()),
                    "Query completed"
                );
                Ok(QueryOutcome {
                    table: lookup.value,
                    cache_status: lookup.status,
                    cache_key: key,
                })
            }
            Err(e) => {
                warn!(
                    target: "queries",
                    cache_key = %key,
                    code = %e.code,
                    duration_ms = started.elapsed().as_millis() as u64,
                    sql = %sql_preview(request.sql()),
                    "Query failed: {}",
                    e.message
                );
                Err(e)
            }
        }
    }

    async fn execute_uncached(&self, request: &QueryRequest) -> Result<ResultTable> {
        let session = self.provider.get_session().await?;
        let _guard = self.execution.lock().await;
        session
            .execute(request.sql(), request.params())
            .await
            .map_err(WealthlensError::from)
    }

    /// Drop the cached result for `request`, if any.
    pub async fn invalidate(&self, request: &QueryRequest) -> bool {
        self.cache.invalidate(&request.cache_key()).await
    }

    pub async fn clear_cache(&self) {
        self.cache.clear().await;
    }

    pub async fn cached_entries(&self) -> usize {
        self.cache.len().await
    }
}
