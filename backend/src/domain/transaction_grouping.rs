//! Invoice grouping for the recent transactions list.
//!
//! The reporting endpoint returns one record per sold line item. A customer
//! buying several tickets at once produces several records that share an
//! invoice number; the dashboard shows those as a single purchase.
//!
//! Grouping never drops or duplicates a record: every input record ends up in
//! exactly one [`TransactionView`], and each view's total is the sum of its
//! items' totals.

use chrono::{TimeZone, Utc};
use shared::SaleRecord;
use std::cmp::Reverse;
use std::collections::HashMap;
use tracing::debug;

use crate::domain::models::{InvoiceGroup, SingleSale, TransactionView};

/// Running state for one invoice number while scanning the input
struct InvoiceAccumulator {
    invoice_number: String,
    created_at: Option<String>,
    total: f64,
    items: Vec<SaleRecord>,
}

impl InvoiceAccumulator {
    fn new(invoice_number: &str, first: &SaleRecord) -> Self {
        Self {
            invoice_number: invoice_number.to_string(),
            created_at: first.created_at.clone(),
            total: 0.0,
            items: Vec::new(),
        }
    }

    fn push(&mut self, record: &SaleRecord) {
        self.total += record.total_amount();
        self.items.push(record.clone());
    }

    /// Single-member invoices are shown like ungrouped sales
    fn into_view(mut self) -> TransactionView {
        if self.items.len() == 1 {
            if let Some(record) = self.items.pop() {
                return TransactionView::Single(SingleSale::from_record(record));
            }
        }
        TransactionView::Grouped(InvoiceGroup {
            invoice_number: self.invoice_number,
            created_at: self.created_at,
            total: self.total,
            items: self.items,
        })
    }
}

/// Group sale records into purchases, most recent first.
///
/// Records sharing a non-empty invoice number become one grouped view (or a
/// single view when the invoice has one member). Records without an invoice
/// number become single views. Views are stable-sorted by `created_at`
/// descending; unparseable timestamps sort last. Timestamps without an offset
/// are read as UTC; use [`group_transactions_in`] to read them in another zone.
pub fn group_transactions(records: &[SaleRecord]) -> Vec<TransactionView> {
    group_transactions_in(records, &Utc)
}

/// [`group_transactions`] with naive timestamps read as wall-clock time in `tz`
pub fn group_transactions_in<Tz: TimeZone>(records: &[SaleRecord], tz: &Tz) -> Vec<TransactionView> {
    let mut invoice_index: HashMap<String, usize> = HashMap::new();
    let mut invoices: Vec<InvoiceAccumulator> = Vec::new();
    let mut ungrouped: Vec<TransactionView> = Vec::new();

    for record in records {
        match record.invoice_key() {
            Some(invoice) => {
                let index = *invoice_index.entry(invoice.to_string()).or_insert_with(|| {
                    invoices.push(InvoiceAccumulator::new(invoice, record));
                    invoices.len() - 1
                });
                invoices[index].push(record);
            }
            None => ungrouped.push(TransactionView::Single(SingleSale::from_record(record.clone()))),
        }
    }

    debug!(
        "Grouped {} sale records into {} invoices and {} ungrouped sales",
        records.len(),
        invoices.len(),
        ungrouped.len()
    );

    let mut views: Vec<TransactionView> = invoices
        .into_iter()
        .map(InvoiceAccumulator::into_view)
        .chain(ungrouped)
        .collect();

    // None orders before Some, so the reversed key puts unparseable timestamps last
    views.sort_by_cached_key(|view| Reverse(view.sort_key_in(tz)));
    views
}
