//! The `OutputWriter` trait implemented by all backend writers.

use lot_sim::SimulationTable;

use crate::{MonthSummaryRow, OutputResult, RegimenStockRow};

/// Trait implemented by CSV, SQLite, and Parquet writers.
///
/// When driven by [`SimOutputObserver`][crate::SimOutputObserver] errors are
/// stored and retrieved with `take_error` after the run.
pub trait OutputWriter {
    /// Write one month summary row.
    fn write_summary(&mut self, row: &MonthSummaryRow) -> OutputResult<()>;

    /// Write a batch of long-format regimen stocks.
    fn write_regimen_stocks(&mut self, rows: &[RegimenStockRow]) -> OutputResult<()>;

    /// Flush and close all underlying file handles.
    ///
    /// Idempotent: safe to call more than once.
    fn finish(&mut self) -> OutputResult<()>;
}

/// Write a completed table through `writer` and finish it.
///
/// Used for sweep results, which are produced without an observer.
pub fn write_table<W: OutputWriter>(writer: &mut W, table: &SimulationTable) -> OutputResult<()> {
    for agg in &table.rows {
        writer.write_summary(&MonthSummaryRow::from(agg))?;
        writer.write_regimen_stocks(&RegimenStockRow::from_aggregate(agg))?;
    }
    writer.finish()
}
