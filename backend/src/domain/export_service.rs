//! CSV export of dashboard data.
//!
//! Exports are built in memory first so a caller can either write them to a
//! directory or hand the content to something else (share sheet, upload).

use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::Serialize;
use shared::{ExportedCsv, TransactionRow, TrendPoint};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Serialize)]
struct TransactionCsvRow<'a> {
    transaction_id: &'a str,
    invoice_number: &'a str,
    created_at: &'a str,
    item_count: usize,
    description: String,
    total: String,
}

#[derive(Serialize)]
struct TrendCsvRow<'a> {
    label: &'a str,
    value: String,
}

#[derive(Debug, Clone, Default)]
pub struct ExportService;

impl ExportService {
    pub fn new() -> Self {
        Self
    }

    /// One CSV row per purchase, in the order given
    pub fn export_transactions_csv(&self, rows: &[TransactionRow], reference_date: NaiveDate) -> Result<ExportedCsv> {
        info!("📄 EXPORT: Exporting {} transactions as CSV", rows.len());
        let mut writer = csv::Writer::from_writer(Vec::new());

        for row in rows {
            let description = if row.is_group {
                format!("{} items", row.items.len())
            } else {
                row.product_name.clone().unwrap_or_default()
            };
            writer.serialize(TransactionCsvRow {
                transaction_id: &row.id,
                invoice_number: row.invoice_number.as_deref().unwrap_or_default(),
                created_at: row.created_at.as_deref().unwrap_or_default(),
                item_count: row.items.len(),
                description,
                total: format!("{:.2}", row.total),
            })?;
        }

        let export = ExportedCsv {
            csv_content: Self::finish(writer)?,
            filename: format!("sales_transactions_{}.csv", reference_date.format("%Y%m%d")),
            row_count: rows.len(),
        };
        info!(
            "✅ EXPORT: Exported {} transactions ({} bytes) as {}",
            export.row_count,
            export.csv_content.len(),
            export.filename
        );
        Ok(export)
    }

    pub fn export_trend_csv(&self, points: &[TrendPoint], reference_date: NaiveDate) -> Result<ExportedCsv> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        for point in points {
            writer.serialize(TrendCsvRow {
                label: &point.label,
                value: format!("{:.2}", point.value),
            })?;
        }

        let export = ExportedCsv {
            csv_content: Self::finish(writer)?,
            filename: format!("sales_trend_{}.csv", reference_date.format("%Y%m%d")),
            row_count: points.len(),
        };
        info!("✅ EXPORT: Exported {} trend points as {}", export.row_count, export.filename);
        Ok(export)
    }

    /// Write an export into `dir`, creating it if needed. Returns the file path.
    pub fn write_to_dir(&self, export: &ExportedCsv, dir: &Path) -> Result<PathBuf> {
        fs::create_dir_all(dir).with_context(|| format!("Failed to create export directory {}", dir.display()))?;
        let file_path = dir.join(&export.filename);
        fs::write(&file_path, &export.csv_content)
            .with_context(|| format!("Failed to write export file {}", file_path.display()))?;
        info!("📁 EXPORT: Wrote {} to {}", export.filename, file_path.display());
        Ok(file_path)
    }

    fn finish(writer: csv::Writer<Vec<u8>>) -> Result<String> {
        let bytes = writer.into_inner().context("Failed to flush CSV writer")?;
        Ok(String::from_utf8(bytes)?)
    }
}
