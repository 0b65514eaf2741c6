//! Simulation observer trait for progress reporting and data collection.

use lot_core::YearMonth;

use crate::MonthlyAggregate;

/// Callbacks invoked by [`Sim::run`][crate::Sim::run] at key points in the
/// monthly loop.
///
/// All methods have default no-op implementations so implementors only need to
/// override what they care about.
///
/// # Example: progress printer
///
/// ```rust,ignore
/// struct YearlyPrinter;
///
/// impl SimObserver for YearlyPrinter {
///     fn on_month_end(&mut self, row: &MonthlyAggregate) {
///         if row.date.month == 12 {
///             println!("{}: {:.0} on treatment", row.date, row.on_treatment());
///         }
///     }
/// }
/// ```
pub trait SimObserver {
    /// Called at the very start of each month, before any processing.
    fn on_month_start(&mut self, _date: YearMonth) {}

    /// Called once the month's aggregate row is complete.
    fn on_month_end(&mut self, _row: &MonthlyAggregate) {}

    /// Called after each prune sweep with the number of cohorts removed and
    /// the number still held.
    fn on_prune(&mut self, _date: YearMonth, _removed: usize, _remaining: usize) {}

    /// Called once after the final month completes.
    fn on_sim_end(&mut self, _final_month: YearMonth) {}
}

/// A [`SimObserver`] that does nothing.  Use when you need to call `run` but
/// don't want progress callbacks.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}
