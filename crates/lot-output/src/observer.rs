//! `SimOutputObserver<W>` — bridges `SimObserver` to an `OutputWriter`.

use lot_core::YearMonth;
use lot_sim::{MonthlyAggregate, SimObserver};

use crate::row::{MonthSummaryRow, RegimenStockRow};
use crate::writer::OutputWriter;
use crate::{OutputError, OutputResult};

/// A [`SimObserver`] that streams month summaries and regimen stocks to any
/// [`OutputWriter`] backend (CSV, SQLite, Parquet, …).
///
/// Errors from the writer are stored internally because `SimObserver` methods
/// have no return value.  After `sim.run()` returns, check for errors with
/// [`take_error`][Self::take_error].
pub struct SimOutputObserver<W: OutputWriter> {
    writer:     W,
    last_error: Option<OutputError>,
}

impl<W: OutputWriter> SimOutputObserver<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, last_error: None }
    }

    /// Take the stored write error (if any) after `sim.run()` returns.
    ///
    /// Returns `None` if all writes succeeded.
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    /// Unwrap the inner writer.
    pub fn into_writer(self) -> W {
        self.writer
    }

    fn store_err(&mut self, result: OutputResult<()>) {
        if let Err(e) = result {
            // Keep only the first error.
            if self.last_error.is_none() {
                self.last_error = Some(e);
            }
        }
    }
}

impl<W: OutputWriter> SimObserver for SimOutputObserver<W> {
    fn on_month_end(&mut self, row: &MonthlyAggregate) {
        let result = self.writer.write_summary(&MonthSummaryRow::from(row));
        self.store_err(result);

        let stocks = RegimenStockRow::from_aggregate(row);
        if !stocks.is_empty() {
            let result = self.writer.write_regimen_stocks(&stocks);
            self.store_err(result);
        }
    }

    fn on_sim_end(&mut self, _final_month: YearMonth) {
        let result = self.writer.finish();
        self.store_err(result);
    }
}
