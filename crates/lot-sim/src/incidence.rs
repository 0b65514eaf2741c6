//! Monthly incidence series and its CSV loader.
//!
//! # CSV format
//!
//! ```csv
//! year,month,cases
//! 2019,1,2710.5
//! 2019,1,311.0
//! 2019,2,2650.0
//! ```
//!
//! Rows sharing a month (e.g. demographic strata) are summed, so the series
//! holds exactly one value per month.

use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use lot_core::YearMonth;

use crate::{SimError, SimResult};

#[derive(Deserialize)]
struct IncidenceRecord {
    year:  i32,
    month: u8,
    cases: f64,
}

/// Ordered `(month → incident cases)` mapping, one entry per month.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct IncidenceSeries {
    months: BTreeMap<YearMonth, f64>,
}

impl IncidenceSeries {
    /// Build from `(month, cases)` pairs, summing duplicates.
    ///
    /// Negative or non-finite counts are rejected.
    pub fn from_records<I>(records: I) -> SimResult<Self>
    where
        I: IntoIterator<Item = (YearMonth, f64)>,
    {
        let mut months: BTreeMap<YearMonth, f64> = BTreeMap::new();
        for (date, cases) in records {
            if !(cases.is_finite() && cases >= 0.0) {
                return Err(SimError::Incidence(format!(
                    "{date}: incidence must be a non-negative number, got {cases}"
                )));
            }
            *months.entry(date).or_default() += cases;
        }
        Ok(Self { months })
    }

    /// Cases recorded for `date`; zero outside the series.
    #[inline]
    pub fn get(&self, date: YearMonth) -> f64 {
        self.months.get(&date).copied().unwrap_or(0.0)
    }

    pub fn first(&self) -> Option<YearMonth> {
        self.months.keys().next().copied()
    }

    pub fn last(&self) -> Option<YearMonth> {
        self.months.keys().next_back().copied()
    }

    pub fn len(&self) -> usize {
        self.months.len()
    }

    pub fn is_empty(&self) -> bool {
        self.months.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (YearMonth, f64)> + '_ {
        self.months.iter().map(|(&d, &c)| (d, c))
    }

    /// The latest calendar year with all twelve months present.
    pub fn last_complete_year(&self) -> Option<i32> {
        let mut counts: BTreeMap<i32, u8> = BTreeMap::new();
        for date in self.months.keys() {
            *counts.entry(date.year).or_default() += 1;
        }
        counts
            .into_iter()
            .rev()
            .find(|&(_, n)| n == 12)
            .map(|(year, _)| year)
    }

    /// Extend the series through `end` by replaying the last complete year:
    /// each projected month takes the value of the same calendar month in
    /// that year.  Observed months are never overwritten.
    pub fn project_to(&self, end: YearMonth) -> SimResult<Self> {
        let Some(last) = self.last() else {
            return Err(SimError::Incidence("cannot project an empty series".into()));
        };
        if end <= last {
            return Ok(self.clone());
        }
        let base_year = self.last_complete_year().ok_or_else(|| {
            SimError::Incidence("no complete calendar year to project from".into())
        })?;

        let mut months = self.months.clone();
        for date in last.next().range_inclusive(end) {
            let source = YearMonth { year: base_year, month: date.month };
            months.insert(date, self.get(source));
        }
        Ok(Self { months })
    }
}

/// Load an [`IncidenceSeries`] from a CSV file.
pub fn load_incidence_csv(path: &Path) -> SimResult<IncidenceSeries> {
    let file = std::fs::File::open(path)?;
    load_incidence_reader(file)
}

/// Like [`load_incidence_csv`] but accepts any `Read` source.
pub fn load_incidence_reader<R: Read>(reader: R) -> SimResult<IncidenceSeries> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut records = Vec::new();
    for result in csv_reader.deserialize::<IncidenceRecord>() {
        let row = result.map_err(|e| SimError::Incidence(e.to_string()))?;
        records.push((YearMonth::new(row.year, row.month)?, row.cases));
    }
    IncidenceSeries::from_records(records)
}
