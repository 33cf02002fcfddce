//! # Sales report sources
//!
//! The dashboard never talks to the network itself. It asks a
//! [`SalesReportSource`] for one completed report per refresh and turns that
//! into views. Implementations decide where the report comes from: the live
//! reporting endpoint, a JSON dump on disk, or a fixed value in tests.
//!
//! Session problems are reported as [`ReportFetchError::Unauthenticated`];
//! tearing down the session is the caller's job.

use async_trait::async_trait;
use shared::{SalesReport, SalesReportRequest};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::{debug, info, warn};

use crate::config::TimezoneSetting;
use crate::io::report_decoder::{decode_sales_report, ValidationError};

#[derive(Debug, thiserror::Error)]
pub enum ReportFetchError {
    /// HTTP 401 or a token-related failure
    #[error("Unauthenticated")]
    Unauthenticated,
    #[error("Reporting endpoint returned {status}: {message}")]
    Http { status: u16, message: String },
    #[error("Failed to read report: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse report JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Invalid(#[from] ValidationError),
}

impl ReportFetchError {
    /// Classify a non-success response from the reporting endpoint.
    ///
    /// 401, or any failure whose body mentions a token (expired, invalid,
    /// missing), means the session is gone. Returns `None` for 2xx.
    pub fn from_status(status: u16, body: &str) -> Option<Self> {
        if (200..300).contains(&status) {
            return None;
        }
        if status == 401 || body.to_ascii_lowercase().contains("token") {
            return Some(ReportFetchError::Unauthenticated);
        }
        Some(ReportFetchError::Http {
            status,
            message: body.trim().to_string(),
        })
    }

    pub fn is_unauthenticated(&self) -> bool {
        matches!(self, ReportFetchError::Unauthenticated)
    }
}

/// Source of completed sales reports
#[async_trait]
pub trait SalesReportSource: Send + Sync {
    /// Fetch one report for the requested window
    async fn fetch_report(&self, request: &SalesReportRequest) -> Result<SalesReport, ReportFetchError>;
}

/// Apply a request's date range and size cap to the line items.
///
/// The aggregate is left as reported, exactly like the live endpoint, whose
/// counters cover the whole window even when the item list is capped.
/// Records without a usable date are dropped when a range is given.
pub fn apply_request(mut report: SalesReport, request: &SalesReportRequest, timezone: TimezoneSetting) -> SalesReport {
    if request.start_date.is_some() || request.end_date.is_some() {
        report.records.retain(|record| {
            let Some(date) = record.created_at.as_deref().and_then(|raw| timezone.date_of(raw)) else {
                return false;
            };
            request.start_date.map_or(true, |start| date >= start)
                && request.end_date.map_or(true, |end| date <= end)
        });
    }
    if let Some(limit) = request.limit {
        report.records.truncate(limit as usize);
    }
    report
}

/// Reads a saved response of the reporting endpoint from disk
#[derive(Debug, Clone)]
pub struct JsonFileReportSource {
    path: PathBuf,
    timezone: TimezoneSetting,
}

impl JsonFileReportSource {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            timezone: TimezoneSetting::default(),
        }
    }

    /// Timezone used to resolve the request's date range
    pub fn with_timezone(mut self, timezone: TimezoneSetting) -> Self {
        self.timezone = timezone;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl SalesReportSource for JsonFileReportSource {
    async fn fetch_report(&self, request: &SalesReportRequest) -> Result<SalesReport, ReportFetchError> {
        info!("Reading sales report from {}", self.path.display());
        let content = tokio::fs::read_to_string(&self.path).await?;
        let value: serde_json::Value = serde_json::from_str(&content)?;
        let report = decode_sales_report(value)?;
        let fetched = report.records.len();

        let report = apply_request(report, request, self.timezone);
        debug!(
            "Report window kept {} of {} sale records (request: {:?})",
            report.records.len(),
            fetched,
            request
        );
        Ok(report)
    }
}

/// Returns the same outcome on every fetch and counts how often it was asked
#[derive(Debug)]
pub struct StaticReportSource {
    outcome: StaticOutcome,
    fetch_count: AtomicUsize,
}

#[derive(Debug)]
enum StaticOutcome {
    Report(SalesReport),
    Failure { status: u16, body: String },
}

impl StaticReportSource {
    pub fn new(report: SalesReport) -> Self {
        Self {
            outcome: StaticOutcome::Report(report),
            fetch_count: AtomicUsize::new(0),
        }
    }

    /// Fails every fetch as if the endpoint answered with `status` and `body`
    pub fn failing(status: u16, body: &str) -> Self {
        Self {
            outcome: StaticOutcome::Failure {
                status,
                body: body.to_string(),
            },
            fetch_count: AtomicUsize::new(0),
        }
    }

    pub fn fetch_count(&self) -> usize {
        self.fetch_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SalesReportSource for StaticReportSource {
    async fn fetch_report(&self, request: &SalesReportRequest) -> Result<SalesReport, ReportFetchError> {
        self.fetch_count.fetch_add(1, Ordering::SeqCst);
        match &self.outcome {
            StaticOutcome::Report(report) => Ok(apply_request(report.clone(), request, TimezoneSetting::Utc)),
            StaticOutcome::Failure { status, body } => {
                let error = ReportFetchError::from_status(*status, body).unwrap_or_else(|| ReportFetchError::Http {
                    status: *status,
                    message: body.clone(),
                });
                warn!("Static report source failing with: {}", error);
                Err(error)
            }
        }
    }
}
