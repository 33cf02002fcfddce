//! Headline numbers for the dashboard cards.
//!
//! These come from the endpoint's aggregate counters and are never recomputed
//! from the fetched line items. The aggregate covers the whole reporting
//! window, while the line items may be capped, so the two can disagree.

use shared::{DashboardSummary, ReportAggregate};

/// Round to two decimal places, mapping non-finite values to 0
pub fn round_currency(value: f64) -> f64 {
    if !value.is_finite() {
        return 0.0;
    }
    (value * 100.0).round() / 100.0
}

/// Derive the summary from upstream totals.
///
/// `average_sale` is 0 when there are no transactions.
pub fn derive_summary(total_amount: Option<f64>, total_records: Option<u64>) -> DashboardSummary {
    let total_sales = round_currency(total_amount.unwrap_or(0.0));
    let total_transactions = total_records.unwrap_or(0);
    let average_sale = if total_transactions == 0 {
        0.0
    } else {
        round_currency(total_sales / total_transactions as f64)
    };

    DashboardSummary {
        total_sales,
        total_transactions,
        average_sale,
    }
}

/// Derive the summary from the endpoint's loosely typed aggregate.
///
/// Record counts are truncated toward zero and never negative.
pub fn summary_from_aggregate(aggregate: &ReportAggregate) -> DashboardSummary {
    let total_amount = aggregate.total_amount.as_ref().map(|amount| amount.value());
    let total_records = aggregate
        .total_records
        .as_ref()
        .map(|count| count.value().trunc().max(0.0) as u64);
    derive_summary(total_amount, total_records)
}
