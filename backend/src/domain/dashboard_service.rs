//! Dashboard composition.
//!
//! [`build_dashboard`] is the pure part: one report plus a reference time in,
//! all three dashboard views out. [`DashboardService`] wraps it with the fetch
//! step so that every refresh (initial load, pull-to-refresh, screen refocus)
//! recomputes the views from a freshly fetched report.

use chrono::{DateTime, Local, TimeZone, Utc};
use shared::{DashboardView, SalesReport, SalesReportRequest};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::config::{DashboardConfig, TimezoneSetting};
use crate::domain::sales_summary::summary_from_aggregate;
use crate::domain::sales_trend::bucket_trend;
use crate::domain::transaction_grouping::group_transactions_in;
use crate::io::mappers::TransactionMapper;
use crate::io::report_source::{ReportFetchError, SalesReportSource};

#[derive(Debug, thiserror::Error)]
pub enum DashboardError {
    /// The session is gone; the caller should sign the user out
    #[error("Session is no longer authenticated")]
    Unauthenticated,
    #[error("Failed to fetch sales report: {0}")]
    Fetch(#[source] ReportFetchError),
}

impl From<ReportFetchError> for DashboardError {
    fn from(error: ReportFetchError) -> Self {
        match error {
            ReportFetchError::Unauthenticated => DashboardError::Unauthenticated,
            other => DashboardError::Fetch(other),
        }
    }
}

/// Compute all dashboard views from one report.
pub fn build_dashboard<Tz: TimeZone>(
    report: &SalesReport,
    reference_now: &DateTime<Tz>,
    config: &DashboardConfig,
) -> DashboardView {
    let summary = summary_from_aggregate(&report.aggregate);

    let mut transactions = group_transactions_in(&report.records, &reference_now.timezone());
    transactions.truncate(config.recent_limit);

    let trend = bucket_trend(&report.records, reference_now, config.window_days);

    DashboardView {
        summary,
        recent_transactions: TransactionMapper::to_rows(&transactions),
        trend,
    }
}

pub struct DashboardService {
    source: Arc<dyn SalesReportSource>,
    config: DashboardConfig,
    /// Serializes refreshes so at most one fetch is in flight
    refresh_gate: Mutex<()>,
}

impl DashboardService {
    pub fn new(source: Arc<dyn SalesReportSource>, config: DashboardConfig) -> Self {
        Self {
            source,
            config,
            refresh_gate: Mutex::new(()),
        }
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    /// Fetch and compute using the current time
    pub async fn refresh(&self, request: &SalesReportRequest) -> Result<DashboardView, DashboardError> {
        self.refresh_from(request, Utc::now()).await
    }

    /// Fetch and compute with `now` viewed in the configured timezone
    pub async fn refresh_from(
        &self,
        request: &SalesReportRequest,
        now: DateTime<Utc>,
    ) -> Result<DashboardView, DashboardError> {
        match self.config.timezone {
            TimezoneSetting::Local => self.refresh_at(request, &now.with_timezone(&Local)).await,
            TimezoneSetting::Utc => self.refresh_at(request, &now).await,
            TimezoneSetting::Fixed(offset) => self.refresh_at(request, &now.with_timezone(&offset)).await,
        }
    }

    /// Fetch one report and compute the views relative to `reference_now`
    pub async fn refresh_at<Tz: TimeZone>(
        &self,
        request: &SalesReportRequest,
        reference_now: &DateTime<Tz>,
    ) -> Result<DashboardView, DashboardError> {
        let _gate = self.refresh_gate.lock().await;

        info!("🔄 DASHBOARD: Refreshing with request: {:?}", request);
        let report = match self.source.fetch_report(request).await {
            Ok(report) => report,
            Err(error) => {
                warn!("❌ DASHBOARD: Refresh failed: {}", error);
                return Err(error.into());
            }
        };

        let view = build_dashboard(&report, reference_now, &self.config);
        info!(
            "✅ DASHBOARD: Refreshed from {} sale records: {} recent transactions, {} trend points",
            report.records.len(),
            view.recent_transactions.len(),
            view.trend.len()
        );
        Ok(view)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::report_source::StaticReportSource;
    use shared::{DashboardSummary, LooseAmount, RecordId, ReportAggregate, SaleRecord, TrendPoint};

    fn sale(id: i64, invoice: Option<&str>, created_at: &str, total: &str) -> SaleRecord {
        SaleRecord {
            id: RecordId::Int(id),
            invoice_number: invoice.map(str::to_string),
            created_at: Some(created_at.to_string()),
            total: Some(LooseAmount::from(total)),
            product_name: Some("Mega Millions".to_string()),
            qty: None,
            unit_price: None,
        }
    }

    fn now() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2025-06-13T18:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    fn utc_config() -> DashboardConfig {
        DashboardConfig {
            timezone: TimezoneSetting::Utc,
            ..DashboardConfig::default()
        }
    }

    fn sample_report() -> SalesReport {
        SalesReport {
            records: vec![
                sale(1, Some("A"), "2025-06-13T09:00:00Z", "10"),
                sale(2, Some("A"), "2025-06-13T09:00:00Z", "20"),
                sale(3, None, "2025-06-12T12:00:00Z", "5"),
                sale(4, None, "2025-06-11T12:00:00Z", "1"),
                sale(5, None, "2025-06-10T12:00:00Z", "1"),
                sale(6, None, "2025-06-09T12:00:00Z", "1"),
                sale(7, None, "2025-06-08T12:00:00Z", "1"),
            ],
            aggregate: ReportAggregate {
                total_amount: Some(LooseAmount::from("500")),
                total_records: Some(LooseAmount::Number(40.0)),
            },
        }
    }

    #[test]
    fn test_empty_report() {
        let view = build_dashboard(&SalesReport::default(), &now(), &utc_config());

        assert_eq!(view.summary, DashboardSummary::default());
        assert!(view.recent_transactions.is_empty());
        assert_eq!(
            view.trend,
            vec![TrendPoint {
                label: "No Sales".to_string(),
                value: 0.0
            }]
        );
    }

    #[test]
    fn test_full_report() {
        let view = build_dashboard(&sample_report(), &now(), &utc_config());

        // Summary trusts the aggregate, not the line items
        assert_eq!(view.summary.total_sales, 500.0);
        assert_eq!(view.summary.total_transactions, 40);
        assert_eq!(view.summary.average_sale, 12.5);

        assert_eq!(view.recent_transactions.len(), 5);
        assert!(view.recent_transactions[0].is_group);
        assert_eq!(view.recent_transactions[0].total, 30.0);
        assert_eq!(view.recent_transactions[1].id, "3");

        let labels: Vec<&str> = view.trend.iter().map(|p| p.label.as_str()).collect();
        assert_eq!(labels, vec!["Sun", "Mon", "Tue", "Wed", "Yesterday", "Today"]);
    }

    #[test]
    fn test_recent_limit_from_config() {
        let config = DashboardConfig {
            recent_limit: 2,
            ..utc_config()
        };

        let view = build_dashboard(&sample_report(), &now(), &config);

        assert_eq!(view.recent_transactions.len(), 2);
    }

    #[test]
    fn test_recent_order_uses_reference_timezone() {
        let config = DashboardConfig {
            recent_limit: 1,
            ..utc_config()
        };
        let report = SalesReport {
            records: vec![
                sale(1, None, "2025-06-13 10:00:00", "1"),
                sale(2, None, "2025-06-13T08:00:00Z", "1"),
            ],
            aggregate: ReportAggregate::default(),
        };
        let plus_three = chrono::FixedOffset::east_opt(3 * 3600).unwrap();

        let view = build_dashboard(&report, &now().with_timezone(&plus_three), &config);

        let ids: Vec<&str> = view.recent_transactions.iter().map(|row| row.id.as_str()).collect();
        assert_eq!(ids, vec!["2"]);
    }

    #[tokio::test]
    async fn test_refresh_fetches_once_per_call() {
        let source = Arc::new(StaticReportSource::new(sample_report()));
        let service = DashboardService::new(source.clone(), utc_config());

        let first = service.refresh_from(&SalesReportRequest::default(), now()).await.unwrap();
        let second = service.refresh_from(&SalesReportRequest::default(), now()).await.unwrap();

        assert_eq!(source.fetch_count(), 2);
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_concurrent_refreshes_each_fetch() {
        let source = Arc::new(StaticReportSource::new(sample_report()));
        let service = Arc::new(DashboardService::new(source.clone(), utc_config()));

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let service = service.clone();
                tokio::spawn(async move { service.refresh_from(&SalesReportRequest::default(), now()).await })
            })
            .collect();
        for handle in handles {
            assert!(handle.await.unwrap().is_ok());
        }

        assert_eq!(source.fetch_count(), 4);
    }

    #[tokio::test]
    async fn test_unauthenticated_is_surfaced() {
        let source = Arc::new(StaticReportSource::failing(401, "Unauthenticated."));
        let service = DashboardService::new(source, utc_config());

        let result = service.refresh(&SalesReportRequest::default()).await;

        assert!(matches!(result, Err(DashboardError::Unauthenticated)));
    }

    #[tokio::test]
    async fn test_other_failures_are_fetch_errors() {
        let source = Arc::new(StaticReportSource::failing(500, "Server Error"));
        let service = DashboardService::new(source, utc_config());

        let result = service.refresh(&SalesReportRequest::default()).await;

        match result {
            Err(DashboardError::Fetch(ReportFetchError::Http { status, .. })) => assert_eq!(status, 500),
            other => panic!("expected fetch error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_refresh_at_fixed_offset() {
        let source = Arc::new(StaticReportSource::new(SalesReport {
            records: vec![sale(1, None, "2025-06-12T22:30:00Z", "3")],
            aggregate: ReportAggregate::default(),
        }));
        let service = DashboardService::new(source, utc_config());
        let plus_three = chrono::FixedOffset::east_opt(3 * 3600).unwrap();

        let view = service
            .refresh_at(&SalesReportRequest::default(), &now().with_timezone(&plus_three))
            .await
            .unwrap();

        assert_eq!(view.trend[0].label, "Today");
    }
}
