//! `lot-output` — result writers for the line-of-therapy simulator.
//!
//! Three streaming backends are provided behind Cargo features:
//!
//! | Feature   | Backend | Files created                                       |
//! |-----------|---------|-----------------------------------------------------|
//! | *(none)*  | CSV     | `month_summaries.csv`, `regimen_stocks.csv`         |
//! | `sqlite`  | SQLite  | `output.db`                                         |
//! | `parquet` | Parquet | `month_summaries.parquet`, `regimen_stocks.parquet` |
//!
//! Both tables are encodings of one [`lot_sim::SimulationTable`]: the month
//! summaries hold one row per `MonthlyAggregate` and the regimen stocks hold
//! its `regimen_stock` map in long format, keyed by date, line and regimen.
//!
//! All backends implement [`OutputWriter`] and are driven either live by
//! [`SimOutputObserver`] (which implements `lot_sim::SimObserver`) or after
//! the fact by [`write_table`].
//!
//! [`write_wide_csv`] produces the single wide table used by dashboards:
//! one row per month, one column per line total and per populated regimen.
//!
//! # Usage
//!
//! ```rust,ignore
//! use lot_output::{CsvWriter, SimOutputObserver};
//!
//! let writer = CsvWriter::new(Path::new("./output"))?;
//! let mut obs = SimOutputObserver::new(writer);
//! let table = sim.run(&mut obs);
//! if let Some(e) = obs.take_error() { eprintln!("output error: {e}"); }
//! lot_output::write_wide_csv(&table, Path::new("./output/lot_wide.csv"))?;
//! ```

pub mod csv;
pub mod error;
pub mod observer;
pub mod row;
pub mod wide;
pub mod writer;

#[cfg(feature = "sqlite")]
pub mod sqlite;

#[cfg(feature = "parquet")]
pub mod parquet;


pub use csv::CsvWriter;
pub use error::{OutputError, OutputResult};
pub use observer::SimOutputObserver;
pub use row::{MonthSummaryRow, RegimenStockRow};
pub use wide::{write_wide, write_wide_csv};
pub use writer::{OutputWriter, write_table};

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteWriter;

#[cfg(feature = "parquet")]
pub use parquet::ParquetWriter;
