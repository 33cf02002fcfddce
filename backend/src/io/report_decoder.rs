//! Decoding of raw reporting-endpoint JSON into typed reports.
//!
//! Only structural problems are rejected here: a record list that is not a
//! list, an entry that is not an object, or an object without a usable id.
//! Everything else (odd totals, missing timestamps, numeric invoice numbers)
//! is normalized by the lenient field types in `shared`.

use serde_json::Value;
use shared::{ReportAggregate, SaleRecord, SalesReport};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("Sale records must be a list, found {found}")]
    NotAList { found: &'static str },
    #[error("Sale record {index} must be an object, found {found}")]
    NotARecord { index: usize, found: &'static str },
    #[error("Sale record {index} is malformed: {reason}")]
    InvalidRecord { index: usize, reason: String },
    #[error("Report aggregate must be an object, found {found}")]
    NotAnAggregate { found: &'static str },
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}

/// Decode a list of sale records.
pub fn decode_sale_records(value: Value) -> Result<Vec<SaleRecord>, ValidationError> {
    let items = match value {
        Value::Array(items) => items,
        other => {
            return Err(ValidationError::NotAList {
                found: json_kind(&other),
            })
        }
    };

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            if !item.is_object() {
                return Err(ValidationError::NotARecord {
                    index,
                    found: json_kind(&item),
                });
            }
            serde_json::from_value(item).map_err(|e| ValidationError::InvalidRecord {
                index,
                reason: e.to_string(),
            })
        })
        .collect()
}

/// Decode a report aggregate; `null` reads as an empty aggregate.
pub fn decode_aggregate(value: Value) -> Result<ReportAggregate, ValidationError> {
    match value {
        Value::Null => Ok(ReportAggregate::default()),
        Value::Object(_) => serde_json::from_value(value).map_err(|_| ValidationError::NotAnAggregate {
            found: "an object with unusable fields",
        }),
        other => Err(ValidationError::NotAnAggregate {
            found: json_kind(&other),
        }),
    }
}

/// Decode a full report.
///
/// Accepts the endpoint envelope `{ "data": [...], "summary": {...} }`, the
/// same envelope keyed `records` / `aggregate`, or a bare list of records.
pub fn decode_sales_report(value: Value) -> Result<SalesReport, ValidationError> {
    match value {
        Value::Array(_) => Ok(SalesReport {
            records: decode_sale_records(value)?,
            aggregate: ReportAggregate::default(),
        }),
        Value::Object(mut envelope) => {
            let records = envelope
                .remove("data")
                .or_else(|| envelope.remove("records"))
                .unwrap_or(Value::Null);
            let aggregate = envelope
                .remove("summary")
                .or_else(|| envelope.remove("aggregate"))
                .unwrap_or(Value::Null);

            Ok(SalesReport {
                records: decode_sale_records(records)?,
                aggregate: decode_aggregate(aggregate)?,
            })
        }
        other => Err(ValidationError::NotAList {
            found: json_kind(&other),
        }),
    }
}
