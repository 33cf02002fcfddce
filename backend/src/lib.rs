//! Sales aggregation core for the lottery point-of-sale dashboard.
//!
//! Turns one report from the sales reporting endpoint into the three views
//! the dashboard renders: grouped recent purchases, a daily trend series and
//! the summary cards.

pub mod config;
pub mod domain;
pub mod io;

pub use config::{ConfigError, DashboardConfig, TimezoneSetting};
pub use domain::{build_dashboard, DashboardError, DashboardService, ExportService};
pub use io::report_source::{JsonFileReportSource, ReportFetchError, SalesReportSource, StaticReportSource};
