//! CLI command implementations.

mod helpers;
mod query;
mod report;
mod session;

pub use helpers::build_service;
pub use query::query;
pub use report::{kpis, report, reports};
pub use session::session;
