//! Property tests over generated record sets.

use chrono::{DateTime, Utc};
use proptest::prelude::*;
use shared::{LooseAmount, RecordId, SaleRecord};
use std::collections::HashMap;

use crate::domain::sales_summary::derive_summary;
use crate::domain::sales_trend::{bucket_trend, daily_totals};
use crate::domain::transaction_grouping::group_transactions;

const EPSILON: f64 = 1e-6;

fn created_at_strategy() -> impl Strategy<Value = Option<String>> {
    prop_oneof![
        8 => (1u32..=20, 0u32..24, 0u32..60)
            .prop_map(|(day, hour, minute)| Some(format!("2025-06-{:02}T{:02}:{:02}:00Z", day, hour, minute))),
        1 => Just(Some("not a date".to_string())),
        1 => Just(None),
    ]
}

fn total_strategy() -> impl Strategy<Value = Option<LooseAmount>> {
    prop_oneof![
        6 => (0u32..100_000).prop_map(|cents| Some(LooseAmount::Number(f64::from(cents) / 100.0))),
        3 => (0u32..100_000).prop_map(|cents| Some(LooseAmount::Text(format!("{:.2}", f64::from(cents) / 100.0)))),
        1 => Just(Some(LooseAmount::from("n/a"))),
        1 => Just(None),
    ]
}

fn invoice_strategy() -> impl Strategy<Value = Option<String>> {
    prop_oneof![
        Just(None),
        Just(Some(" ".to_string())),
        "[A-E]".prop_map(Some),
    ]
}

fn records_strategy() -> impl Strategy<Value = Vec<SaleRecord>> {
    prop::collection::vec((invoice_strategy(), created_at_strategy(), total_strategy()), 0..40).prop_map(
        |fields| {
            fields
                .into_iter()
                .enumerate()
                .map(|(index, (invoice_number, created_at, total))| SaleRecord {
                    id: RecordId::Int(index as i64),
                    invoice_number,
                    created_at,
                    total,
                    product_name: None,
                    qty: None,
                    unit_price: None,
                })
                .collect()
        },
    )
}

fn reference_now() -> DateTime<Utc> {
    DateTime::parse_from_rfc3339("2025-06-20T23:00:00Z")
        .unwrap()
        .with_timezone(&Utc)
}

fn record_sum(records: &[SaleRecord]) -> f64 {
    records.iter().map(SaleRecord::total_amount).sum()
}

proptest! {
    #[test]
    fn grouping_preserves_totals(records in records_strategy()) {
        let views = group_transactions(&records);

        let view_sum: f64 = views.iter().map(|view| view.total()).sum();
        prop_assert!((view_sum - record_sum(&records)).abs() < EPSILON);

        for view in &views {
            prop_assert!(view.total().is_finite());
            prop_assert!((view.total() - record_sum(view.items())).abs() < EPSILON);
        }
    }

    #[test]
    fn grouping_places_each_record_once(records in records_strategy()) {
        let views = group_transactions(&records);

        let mut seen: HashMap<String, usize> = HashMap::new();
        for view in &views {
            for item in view.items() {
                *seen.entry(item.id.to_string()).or_insert(0) += 1;
            }
        }

        prop_assert_eq!(seen.len(), records.len());
        prop_assert!(seen.values().all(|&count| count == 1));
    }

    #[test]
    fn grouping_orders_most_recent_first(records in records_strategy()) {
        let views = group_transactions(&records);

        for pair in views.windows(2) {
            prop_assert!(pair[0].sort_key() >= pair[1].sort_key());
        }
    }

    #[test]
    fn regrouping_flattened_views_keeps_totals(records in records_strategy()) {
        let views = group_transactions(&records);

        // One invoice-less record per purchase, carrying the purchase total
        let flattened: Vec<SaleRecord> = views
            .iter()
            .enumerate()
            .map(|(index, view)| SaleRecord {
                id: RecordId::Int(index as i64),
                invoice_number: None,
                created_at: view.created_at().map(str::to_string),
                total: Some(LooseAmount::Number(view.total())),
                product_name: None,
                qty: None,
                unit_price: None,
            })
            .collect();

        let regrouped = group_transactions(&flattened);

        prop_assert_eq!(regrouped.len(), views.len());
        prop_assert!(regrouped.iter().all(|view| !view.is_group()));

        let mut first: Vec<f64> = views.iter().map(|view| view.total()).collect();
        let mut second: Vec<f64> = regrouped.iter().map(|view| view.total()).collect();
        first.sort_by(f64::total_cmp);
        second.sort_by(f64::total_cmp);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn trend_has_bounded_chronological_buckets(records in records_strategy(), window_days in 0usize..10) {
        let now = reference_now();
        let trend = bucket_trend(&records, &now, window_days);

        prop_assert!(!trend.is_empty());
        prop_assert!(trend.len() <= window_days.max(1));

        let totals = daily_totals(&records, &Utc);
        if totals.is_empty() {
            prop_assert_eq!(trend.len(), 1);
            prop_assert_eq!(trend[0].label.as_str(), "No Sales");
            prop_assert_eq!(trend[0].value, 0.0);
        } else {
            // Values follow the most recent dated buckets in ascending date order
            let expected: Vec<f64> = totals.values().rev().take(trend.len()).rev().copied().collect();
            let actual: Vec<f64> = trend.iter().map(|point| point.value).collect();
            prop_assert_eq!(actual, expected);
            prop_assert_eq!(trend.len(), totals.len().min(window_days.max(1)));
        }
    }

    #[test]
    fn average_is_zero_without_transactions(amount in proptest::option::of(-1.0e9f64..1.0e9)) {
        let summary = derive_summary(amount, Some(0));
        prop_assert_eq!(summary.average_sale, 0.0);
        prop_assert_eq!(summary.total_transactions, 0);
    }
}
