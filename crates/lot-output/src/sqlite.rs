//! SQLite output backend (feature `sqlite`).
//!
//! Creates a single `output.db` file in the configured output directory with
//! two tables: `month_summaries` and `regimen_stocks`.

use std::path::Path;

use rusqlite::Connection;

use crate::{MonthSummaryRow, OutputResult, RegimenStockRow};
use crate::writer::OutputWriter;

/// Writes simulation output to an SQLite database.
pub struct SqliteWriter {
    conn:     Connection,
    finished: bool,
}

impl SqliteWriter {
    /// Open (or create) `output.db` in `dir` and initialise the schema.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let conn = Connection::open(dir.join("output.db"))?;

        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous  = NORMAL;
             CREATE TABLE IF NOT EXISTS month_summaries (
                 date          TEXT PRIMARY KEY,
                 new_starts_1l REAL NOT NULL,
                 total_1l      REAL NOT NULL,
                 total_2l      REAL NOT NULL,
                 total_3l      REAL NOT NULL,
                 total_4l_plus REAL NOT NULL
             );
             CREATE TABLE IF NOT EXISTS regimen_stocks (
                 date     TEXT NOT NULL,
                 line     TEXT NOT NULL,
                 regimen  TEXT NOT NULL,
                 patients REAL NOT NULL
             );",
        )?;

        Ok(Self { conn, finished: false })
    }
}

impl OutputWriter for SqliteWriter {
    fn write_summary(&mut self, row: &MonthSummaryRow) -> OutputResult<()> {
        self.conn.execute(
            "INSERT INTO month_summaries \
             (date, new_starts_1l, total_1l, total_2l, total_3l, total_4l_plus) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            rusqlite::params![
                row.date.to_string(),
                row.new_starts_1l,
                row.total_1l,
                row.total_2l,
                row.total_3l,
                row.total_4l_plus,
            ],
        )?;
        Ok(())
    }

    fn write_regimen_stocks(&mut self, rows: &[RegimenStockRow]) -> OutputResult<()> {
        if rows.is_empty() {
            return Ok(());
        }
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT INTO regimen_stocks (date, line, regimen, patients) \
                 VALUES (?1, ?2, ?3, ?4)",
            )?;
            for row in rows {
                stmt.execute(rusqlite::params![
                    row.date.to_string(),
                    row.line.as_str(),
                    row.regimen,
                    row.patients,
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.conn
            .execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
        Ok(())
    }
}
