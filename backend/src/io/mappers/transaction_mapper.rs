use crate::domain::models::TransactionView;
use shared::TransactionRow;

pub struct TransactionMapper;

impl TransactionMapper {
    /// Flatten a domain view into the row shape the dashboard list renders.
    ///
    /// Single sales carry their record's descriptive fields; groups only
    /// carry the invoice-level fields and their items.
    pub fn to_row(view: &TransactionView) -> TransactionRow {
        match view {
            TransactionView::Grouped(group) => TransactionRow {
                id: group.invoice_number.clone(),
                invoice_number: Some(group.invoice_number.clone()),
                created_at: group.created_at.clone(),
                total: group.total,
                product_name: None,
                qty: None,
                unit_price: None,
                is_group: true,
                items: group.items.clone(),
            },
            TransactionView::Single(single) => TransactionRow {
                id: single.record.id.to_string(),
                invoice_number: single.record.invoice_key().map(str::to_string),
                created_at: single.record.created_at.clone(),
                total: single.total,
                product_name: single.record.product_name.clone(),
                qty: single.record.qty.clone(),
                unit_price: single.record.unit_price.clone(),
                is_group: false,
                items: vec![single.record.clone()],
            },
        }
    }

    pub fn to_rows(views: &[TransactionView]) -> Vec<TransactionRow> {
        views.iter().map(Self::to_row).collect()
    }
}
