//! Warehouse access for wealthlens.
//!
//! - [`driver`]: the `WarehouseDriver` / `WarehouseSession` seam and the
//!   connection descriptor passed across it.
//! - [`snowflake`]: a driver speaking the Snowflake SQL API v2 over HTTPS.
//! - [`session`]: ambient vs constructed session strategies and the memoizing
//!   `SessionProvider`.
pub mod driver;
pub mod error;
pub mod session;
pub mod snowflake;

pub use driver::{
    ConnectionDescriptor, SessionHandle, TokenKind, TokenSource, WarehouseDriver,
    WarehouseSession,
};
pub use error::DriverError;
pub use session::{
    AmbientSessionStrategy, ConstructedSessionStrategy, SessionProvider, SessionStrategy,
    StrategyKind,
};
pub use snowflake::SnowflakeDriver;
