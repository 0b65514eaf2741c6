//! Wide-table CSV export.
//!
//! Columns: `Date,New_Starts_1L,Total_1L,Total_2L,Total_3L,Total_4L+`, then
//! one `<line>_<regimen>` column per (line, regimen) populated in any month,
//! ordered by line then name.  Months where a regimen has no stock hold `0`.

use std::io::Write;
use std::path::Path;

use lot_core::Line;
use lot_sim::SimulationTable;

use crate::OutputResult;

/// Write `table` to a new CSV file at `path`.
pub fn write_wide_csv(table: &SimulationTable, path: &Path) -> OutputResult<()> {
    let file = std::fs::File::create(path)?;
    write_wide(table, file)
}

/// Like [`write_wide_csv`] but accepts any `Write` sink.
pub fn write_wide<W: Write>(table: &SimulationTable, sink: W) -> OutputResult<()> {
    let columns = table.regimen_columns();
    let mut out = csv::Writer::from_writer(sink);

    let mut header: Vec<String> = ["Date", "New_Starts_1L"].map(str::to_owned).into();
    header.extend(Line::ALL.iter().map(|l| format!("Total_{l}")));
    header.extend(
        columns
            .iter()
            .map(|(line, name)| SimulationTable::column_name(*line, name)),
    );
    out.write_record(&header)?;

    for row in &table.rows {
        let mut record = Vec::with_capacity(header.len());
        record.push(row.date.to_string());
        record.push(row.new_starts_1l.to_string());
        record.extend(row.line_totals.iter().map(f64::to_string));
        record.extend(columns.iter().map(|(line, name)| row.regimen(*line, name).to_string()));
        out.write_record(&record)?;
    }
    out.flush()?;
    Ok(())
}
