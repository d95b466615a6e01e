//! Wealth management report catalog.
//!
//! Each report is fixed SQL against the `CLIENTS` / `PORTFOLIOS` /
//! `POSITION_HISTORY` schema, run through a [`wealthlens_runtime::QueryService`]
//! so repeated renders within the cache TTL never reach the warehouse.
pub mod queries;
pub mod reports;

pub use reports::{
    Analytics, Customer360, GlobalKpis, Report, ReportOutput, ReportParams, WealthNarrative,
    DEFAULT_WINDOW_DAYS,
};
