//! CSV output backend.
//!
//! Creates two files in the configured output directory:
//! - `month_summaries.csv`
//! - `regimen_stocks.csv`

use std::fs::File;
use std::path::Path;

use csv::Writer;

use crate::{MonthSummaryRow, OutputResult, RegimenStockRow};
use crate::writer::OutputWriter;

/// Writes simulation output to two CSV files.
pub struct CsvWriter {
    summaries: Writer<File>,
    stocks:    Writer<File>,
    finished:  bool,
}

impl CsvWriter {
    /// Open (or create) the two CSV files in `dir` and write the header rows.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let mut summaries = Writer::from_path(dir.join("month_summaries.csv"))?;
        summaries.write_record([
            "date", "new_starts_1l", "total_1l", "total_2l", "total_3l", "total_4l_plus",
        ])?;

        let mut stocks = Writer::from_path(dir.join("regimen_stocks.csv"))?;
        stocks.write_record(["date", "line", "regimen", "patients"])?;

        Ok(Self {
            summaries,
            stocks,
            finished: false,
        })
    }
}

impl OutputWriter for CsvWriter {
    fn write_summary(&mut self, row: &MonthSummaryRow) -> OutputResult<()> {
        self.summaries.write_record(&[
            row.date.to_string(),
            row.new_starts_1l.to_string(),
            row.total_1l.to_string(),
            row.total_2l.to_string(),
            row.total_3l.to_string(),
            row.total_4l_plus.to_string(),
        ])?;
        Ok(())
    }

    fn write_regimen_stocks(&mut self, rows: &[RegimenStockRow]) -> OutputResult<()> {
        for row in rows {
            self.stocks.write_record(&[
                row.date.to_string(),
                row.line.to_string(),
                row.regimen.clone(),
                row.patients.to_string(),
            ])?;
        }
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.summaries.flush()?;
        self.stocks.flush()?;
        Ok(())
    }
}
