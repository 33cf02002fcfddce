//! # Domain Module
//!
//! Business logic of the sales dashboard. Everything here is pure
//! computation over already-fetched reports, apart from
//! [`DashboardService`], which asks a report source for data on each refresh.
//!
//! ## Key Components
//!
//! - **transaction_grouping**: Folds line items into purchases by invoice number
//! - **sales_trend**: Per-day totals for the trend chart
//! - **sales_summary**: Headline numbers from the server aggregate
//! - **dashboard_service**: Composes the views and owns the refresh cycle
//! - **export_service**: CSV exports of purchases and trend points
//! - **models**: Domain types shared by the modules above

pub mod dashboard_service;
pub mod export_service;
pub mod models;
pub mod sales_summary;
pub mod sales_trend;
pub mod transaction_grouping;

pub use dashboard_service::{build_dashboard, DashboardError, DashboardService};
pub use export_service::ExportService;
pub use sales_summary::{derive_summary, round_currency, summary_from_aggregate};
pub use sales_trend::{bucket_trend, daily_totals, DEFAULT_TREND_WINDOW_DAYS};
pub use transaction_grouping::{group_transactions, group_transactions_in};

#[cfg(test)]
mod properties;
