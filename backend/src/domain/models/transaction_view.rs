//! Domain model for one logical purchase on the dashboard.
use chrono::{DateTime, TimeZone, Utc};
use shared::SaleRecord;

use super::sale_time::parse_sale_timestamp;

/// Two or more line items sold under the same invoice number
#[derive(Debug, Clone, PartialEq)]
pub struct InvoiceGroup {
    pub invoice_number: String,
    /// Taken from the first member encountered for the invoice
    pub created_at: Option<String>,
    /// Sum of member totals
    pub total: f64,
    /// Members in original encounter order
    pub items: Vec<SaleRecord>,
}

/// A purchase consisting of exactly one line item
#[derive(Debug, Clone, PartialEq)]
pub struct SingleSale {
    pub record: SaleRecord,
    pub total: f64,
}

impl SingleSale {
    pub fn from_record(record: SaleRecord) -> Self {
        let total = record.total_amount();
        Self { record, total }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TransactionView {
    Grouped(InvoiceGroup),
    Single(SingleSale),
}

impl TransactionView {
    pub fn is_group(&self) -> bool {
        matches!(self, TransactionView::Grouped(_))
    }

    /// Display identifier: the invoice number for groups, the record id otherwise
    pub fn id(&self) -> String {
        match self {
            TransactionView::Grouped(group) => group.invoice_number.clone(),
            TransactionView::Single(single) => single.record.id.to_string(),
        }
    }

    pub fn invoice_number(&self) -> Option<&str> {
        match self {
            TransactionView::Grouped(group) => Some(&group.invoice_number),
            TransactionView::Single(single) => single.record.invoice_key(),
        }
    }

    pub fn created_at(&self) -> Option<&str> {
        match self {
            TransactionView::Grouped(group) => group.created_at.as_deref(),
            TransactionView::Single(single) => single.record.created_at.as_deref(),
        }
    }

    pub fn total(&self) -> f64 {
        match self {
            TransactionView::Grouped(group) => group.total,
            TransactionView::Single(single) => single.total,
        }
    }

    pub fn items(&self) -> &[SaleRecord] {
        match self {
            TransactionView::Grouped(group) => &group.items,
            TransactionView::Single(single) => std::slice::from_ref(&single.record),
        }
    }

    /// Point in time used for ordering, reading naive timestamps as UTC
    pub fn sort_key(&self) -> Option<DateTime<Utc>> {
        self.sort_key_in(&Utc)
    }

    /// Point in time used for ordering, reading naive timestamps as wall-clock
    /// time in `tz`. `None` sorts as the earliest possible time.
    pub fn sort_key_in<Tz: TimeZone>(&self, tz: &Tz) -> Option<DateTime<Utc>> {
        self.created_at()
            .and_then(|raw| parse_sale_timestamp(raw, tz))
            .map(|timestamp| timestamp.with_timezone(&Utc))
    }
}
