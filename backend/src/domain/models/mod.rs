pub mod sale_time;
pub mod transaction_view;
pub mod trend_label;

pub use sale_time::{parse_sale_timestamp, sale_date};
pub use transaction_view::{InvoiceGroup, SingleSale, TransactionView};
pub use trend_label::TrendLabel;
