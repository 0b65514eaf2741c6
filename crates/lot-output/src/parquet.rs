//! Parquet output backend (feature `parquet`).
//!
//! Creates two files in the configured output directory:
//! - `month_summaries.parquet`
//! - `regimen_stocks.parquet`
//!
//! Dates and lines are stored as UTF-8 strings (`2024-03-01`, `2L`).

use std::fs::File;
use std::path::Path;
use std::sync::Arc;

use arrow::array::{Float64Builder, StringBuilder};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use parquet::basic::Compression;
use parquet::file::properties::WriterProperties;

use crate::writer::OutputWriter;
use crate::{MonthSummaryRow, OutputResult, RegimenStockRow};

fn summary_schema() -> Arc<Schema> {
    Arc::new(Schema::new(vec![
        Field::new("date",          DataType::Utf8,    false),
        Field::new("new_starts_1l", DataType::Float64, false),
        Field::new("total_1l",      DataType::Float64, false),
        Field::new("total_2l",      DataType::Float64, false),
        Field::new("total_3l",      DataType::Float64, false),
        Field::new("total_4l_plus", DataType::Float64, false),
    ]))
}

fn stock_schema() -> Arc<Schema> {
    Arc::new(Schema::new(vec![
        Field::new("date",     DataType::Utf8,    false),
        Field::new("line",     DataType::Utf8,    false),
        Field::new("regimen",  DataType::Utf8,    false),
        Field::new("patients", DataType::Float64, false),
    ]))
}

fn snappy_props() -> WriterProperties {
    WriterProperties::builder()
        .set_compression(Compression::SNAPPY)
        .build()
}

/// Writes simulation output to two Parquet files.
///
/// `finish()` **must** be called to write the Parquet file footer; files
/// written without calling `finish()` cannot be opened by Parquet readers.
pub struct ParquetWriter {
    summaries:    Option<ArrowWriter<File>>,
    stocks:       Option<ArrowWriter<File>>,
    summ_schema:  Arc<Schema>,
    stock_schema: Arc<Schema>,
}

impl ParquetWriter {
    /// Create both Parquet files in `dir`.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let summ_schema = summary_schema();
        let stock_schema = stock_schema();

        let summ_file = File::create(dir.join("month_summaries.parquet"))?;
        let summaries = ArrowWriter::try_new(
            summ_file,
            Arc::clone(&summ_schema),
            Some(snappy_props()),
        )?;

        let stock_file = File::create(dir.join("regimen_stocks.parquet"))?;
        let stocks = ArrowWriter::try_new(
            stock_file,
            Arc::clone(&stock_schema),
            Some(snappy_props()),
        )?;

        Ok(Self {
            summaries: Some(summaries),
            stocks: Some(stocks),
            summ_schema,
            stock_schema,
        })
    }
}

impl OutputWriter for ParquetWriter {
    fn write_summary(&mut self, row: &MonthSummaryRow) -> OutputResult<()> {
        let Some(writer) = self.summaries.as_mut() else {
            return Ok(());
        };

        let mut dates      = StringBuilder::new();
        let mut new_starts = Float64Builder::new();
        let mut total_1l   = Float64Builder::new();
        let mut total_2l   = Float64Builder::new();
        let mut total_3l   = Float64Builder::new();
        let mut total_4l   = Float64Builder::new();

        dates.append_value(row.date.to_string());
        new_starts.append_value(row.new_starts_1l);
        total_1l.append_value(row.total_1l);
        total_2l.append_value(row.total_2l);
        total_3l.append_value(row.total_3l);
        total_4l.append_value(row.total_4l_plus);

        let batch = RecordBatch::try_new(
            Arc::clone(&self.summ_schema),
            vec![
                Arc::new(dates.finish()),
                Arc::new(new_starts.finish()),
                Arc::new(total_1l.finish()),
                Arc::new(total_2l.finish()),
                Arc::new(total_3l.finish()),
                Arc::new(total_4l.finish()),
            ],
        )?;
        writer.write(&batch)?;
        Ok(())
    }

    fn write_regimen_stocks(&mut self, rows: &[RegimenStockRow]) -> OutputResult<()> {
        if rows.is_empty() {
            return Ok(());
        }
        let Some(writer) = self.stocks.as_mut() else {
            return Ok(());
        };

        let mut dates    = StringBuilder::new();
        let mut lines    = StringBuilder::new();
        let mut regimens = StringBuilder::new();
        let mut patients = Float64Builder::new();

        for row in rows {
            dates.append_value(row.date.to_string());
            lines.append_value(row.line.as_str());
            regimens.append_value(&row.regimen);
            patients.append_value(row.patients);
        }

        let batch = RecordBatch::try_new(
            Arc::clone(&self.stock_schema),
            vec![
                Arc::new(dates.finish()),
                Arc::new(lines.finish()),
                Arc::new(regimens.finish()),
                Arc::new(patients.finish()),
            ],
        )?;
        writer.write(&batch)?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if let Some(w) = self.summaries.take() {
            w.close()?;
        }
        if let Some(w) = self.stocks.take() {
            w.close()?;
        }
        Ok(())
    }
}
