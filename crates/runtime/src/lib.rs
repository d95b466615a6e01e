//! Cached query execution.
//!
//! [`QueryService`] owns a [`SessionProvider`](wealthlens_warehouse::SessionProvider)
//! and a [`TimedCache`] of result tables keyed by statement text and bind
//! parameters. A repeated request inside its TTL is answered from the cache
//! without touching the warehouse.
//!
//! ```text
//! QueryRequest ──► CacheKey ──► TimedCache ──hit──► ResultTable
//!                                   │
//!                                  miss
//!                                   ▼
//!                 SessionProvider ──► WarehouseSession::execute
//! ```

pub mod cache;
pub mod clock;
pub mod request;
pub mod service;

pub use cache::{CacheStatus, Lookup, TimedCache};
pub use clock::{Clock, ManualClock, SystemClock};
pub use request::{CacheKey, QueryRequest};
pub use service::{QueryOutcome, QueryService};
