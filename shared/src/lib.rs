use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Identifier of a sale line item as issued by the reporting endpoint.
///
/// The endpoint is not consistent about whether ids are numeric or textual,
/// so both are accepted and kept as-is.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Int(i64),
    Text(String),
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordId::Int(id) => write!(f, "{}", id),
            RecordId::Text(id) => write!(f, "{}", id),
        }
    }
}

/// A monetary or quantity field that upstream may send as a number, a numeric
/// string, or something unusable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LooseAmount {
    Number(f64),
    Text(String),
    Other(serde_json::Value),
}

impl LooseAmount {
    /// Numeric value of the field. Unparseable and non-finite values are 0.
    pub fn value(&self) -> f64 {
        let parsed = match self {
            LooseAmount::Number(n) => *n,
            LooseAmount::Text(text) => text.trim().parse::<f64>().unwrap_or(0.0),
            LooseAmount::Other(_) => 0.0,
        };
        if parsed.is_finite() {
            parsed
        } else {
            0.0
        }
    }
}

impl From<f64> for LooseAmount {
    fn from(value: f64) -> Self {
        LooseAmount::Number(value)
    }
}

impl From<&str> for LooseAmount {
    fn from(value: &str) -> Self {
        LooseAmount::Text(value.to_string())
    }
}

/// Numeric value of an optional loose field, 0 when absent.
pub fn amount_or_zero(amount: Option<&LooseAmount>) -> f64 {
    amount.map(LooseAmount::value).unwrap_or(0.0)
}

/// Accepts strings and numbers for text fields; anything else reads as absent.
fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(text)) => Some(text),
        Some(serde_json::Value::Number(number)) => Some(number.to_string()),
        _ => None,
    })
}

/// One sold line item as returned by the sales reporting endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaleRecord {
    pub id: RecordId,
    /// Records sharing a non-empty invoice number belong to the same purchase
    #[serde(default, alias = "invoiceNumber", deserialize_with = "lenient_text")]
    pub invoice_number: Option<String>,
    /// Sale timestamp as sent by upstream (RFC 3339, naive datetime, or epoch millis)
    #[serde(default, alias = "createdAt", deserialize_with = "lenient_text")]
    pub created_at: Option<String>,
    /// Line total; missing or unparseable totals count as 0
    #[serde(default)]
    pub total: Option<LooseAmount>,
    #[serde(default, alias = "productName", deserialize_with = "lenient_text")]
    pub product_name: Option<String>,
    #[serde(default)]
    pub qty: Option<LooseAmount>,
    #[serde(default, alias = "unitPrice")]
    pub unit_price: Option<LooseAmount>,
}

impl SaleRecord {
    /// Numeric line total (0 when missing or unparseable)
    pub fn total_amount(&self) -> f64 {
        amount_or_zero(self.total.as_ref())
    }

    /// Invoice number when it is present and not blank
    pub fn invoice_key(&self) -> Option<&str> {
        self.invoice_number
            .as_deref()
            .map(str::trim)
            .filter(|invoice| !invoice.is_empty())
    }
}

/// Server-computed totals for the requested reporting window
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportAggregate {
    #[serde(default, alias = "totalAmount")]
    pub total_amount: Option<LooseAmount>,
    #[serde(default, alias = "totalRecords")]
    pub total_records: Option<LooseAmount>,
}

/// Completed result of one call to the sales reporting endpoint
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SalesReport {
    /// Line items in the fetched window (may be capped by the endpoint)
    #[serde(default, alias = "data")]
    pub records: Vec<SaleRecord>,
    /// Aggregate counters, independent of the line-item window
    #[serde(default, alias = "summary")]
    pub aggregate: ReportAggregate,
}

/// Parameters for fetching a sales report
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SalesReportRequest {
    /// First calendar date to include (inclusive)
    pub start_date: Option<NaiveDate>,
    /// Last calendar date to include (inclusive)
    pub end_date: Option<NaiveDate>,
    /// Maximum number of line items to return
    pub limit: Option<u32>,
}

/// Flat transaction shape consumed by the dashboard list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionRow {
    pub id: String,
    pub invoice_number: Option<String>,
    pub created_at: Option<String>,
    pub total: f64,
    pub product_name: Option<String>,
    pub qty: Option<LooseAmount>,
    pub unit_price: Option<LooseAmount>,
    pub is_group: bool,
    pub items: Vec<SaleRecord>,
}

/// One calendar-day bucket of the sales trend chart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendPoint {
    pub label: String,
    pub value: f64,
}

/// Headline numbers shown on the dashboard cards
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardSummary {
    pub total_sales: f64,
    pub total_transactions: u64,
    pub average_sale: f64,
}

/// Everything the dashboard screen renders after a refresh
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardView {
    pub summary: DashboardSummary,
    pub recent_transactions: Vec<TransactionRow>,
    pub trend: Vec<TrendPoint>,
}

/// A generated CSV document ready to be saved or handed to a share sheet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportedCsv {
    pub csv_content: String,
    pub filename: String,
    pub row_count: usize,
}
