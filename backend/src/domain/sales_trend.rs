//! Daily sales trend for the dashboard chart.
//!
//! Buckets are the most recent calendar dates that actually have sales, not
//! the last N days counted back from today. A week with two trading days
//! therefore produces a two-point series.

use chrono::{DateTime, NaiveDate, TimeZone};
use shared::{SaleRecord, TrendPoint};
use std::collections::BTreeMap;
use tracing::debug;

use crate::domain::models::{sale_date, TrendLabel};

/// Default number of dated buckets shown on the chart
pub const DEFAULT_TREND_WINDOW_DAYS: usize = 7;

/// Sum record totals per local calendar date in `tz`.
///
/// Records whose timestamp cannot be parsed have no date and are skipped.
pub fn daily_totals<Tz: TimeZone>(records: &[SaleRecord], tz: &Tz) -> BTreeMap<NaiveDate, f64> {
    let mut totals: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    let mut undated = 0usize;

    for record in records {
        match sale_date(record.created_at.as_deref(), tz) {
            Some(date) => *totals.entry(date).or_insert(0.0) += record.total_amount(),
            None => undated += 1,
        }
    }

    if undated > 0 {
        debug!("Skipped {} sale records without a usable timestamp", undated);
    }
    totals
}

/// Build the trend series relative to `reference_now`.
///
/// Returns between 1 and `window_days` points in chronological order. When no
/// record has a usable date the series is a single `"No Sales"` point.
/// A `window_days` of 0 is treated as 1.
pub fn bucket_trend<Tz: TimeZone>(
    records: &[SaleRecord],
    reference_now: &DateTime<Tz>,
    window_days: usize,
) -> Vec<TrendPoint> {
    let window_days = window_days.max(1);
    let reference_date = reference_now.date_naive();
    let totals = daily_totals(records, &reference_now.timezone());

    if totals.is_empty() {
        return vec![TrendPoint {
            label: TrendLabel::NoSales.to_string(),
            value: 0.0,
        }];
    }

    let mut recent: Vec<(NaiveDate, f64)> = totals.into_iter().rev().take(window_days).collect();
    recent.reverse();

    recent
        .into_iter()
        .map(|(date, value)| TrendPoint {
            label: TrendLabel::for_date(date, reference_date).to_string(),
            value,
        })
        .collect()
}
