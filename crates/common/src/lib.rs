//! Common utilities, types, and configuration shared across wealthlens crates.
//!
//! - **Configuration**: Strongly typed application configuration (`config`).
//! - **Result model**: Warehouse result tables and scalar values (`table`, `value`).
//! - **Logging**: `tracing-subscriber` setup (`logging`).
//! - **Scrubbing**: PII-safe SQL previews for log lines (`scrubber`).
pub mod config;
pub mod logging;
pub mod scrubber;
pub mod table;
pub mod value;

pub use crate::table::{Column, ColumnType, Record, ResultTable};
pub use crate::value::{BindValue, Scalar};
