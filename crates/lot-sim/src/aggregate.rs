//! Per-month output rows and the run's output table.

use std::collections::{BTreeMap, BTreeSet};

use lot_cohort::StepTotals;
use lot_core::{Line, YearMonth};
use lot_regimen::RegimenCatalog;

/// One simulated month.
///
/// Invariant: `line_totals[l]` equals the sum of `regimen_stock` entries on
/// line `l`.
#[derive(Clone, Debug, PartialEq)]
pub struct MonthlyAggregate {
    pub date:          YearMonth,
    /// Patients starting first-line treatment this month.
    pub new_starts_1l: f64,
    /// Patients on each line after this month's update, by `Line::index`.
    pub line_totals:   [f64; 4],
    /// Patients per (line, regimen name).  Sparse: only populated pairs.
    pub regimen_stock: BTreeMap<(Line, String), f64>,
    /// Patients progressing off each line this month.
    pub progressed:    [f64; 4],
    /// Deaths on each line this month.
    pub died:          [f64; 4],
}

impl MonthlyAggregate {
    /// Convert an update pass's totals into an output row.
    pub(crate) fn from_totals(
        date:          YearMonth,
        new_starts_1l: f64,
        totals:        &StepTotals,
        catalog:       &RegimenCatalog,
    ) -> Self {
        let mut regimen_stock = BTreeMap::new();
        let mut line_totals = [0.0; 4];

        for (&(line, regimen), &patients) in &totals.stock {
            let Some(r) = catalog.get(regimen) else {
                continue;
            };
            line_totals[line.index()] += patients;
            regimen_stock.insert((line, r.name.clone()), patients);
        }

        Self {
            date,
            new_starts_1l,
            line_totals,
            regimen_stock,
            progressed: totals.progressed,
            died: totals.died,
        }
    }

    #[inline]
    pub fn total(&self, line: Line) -> f64 {
        self.line_totals[line.index()]
    }

    /// Patients on every line.
    pub fn on_treatment(&self) -> f64 {
        self.line_totals.iter().sum()
    }

    /// Stock for one (line, regimen) pair; zero if unpopulated this month.
    pub fn regimen(&self, line: Line, name: &str) -> f64 {
        self.regimen_stock
            .get(&(line, name.to_owned()))
            .copied()
            .unwrap_or(0.0)
    }
}

/// Every month of a run, in calendar order.  The sole output artifact.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SimulationTable {
    pub rows: Vec<MonthlyAggregate>,
}

impl SimulationTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn last(&self) -> Option<&MonthlyAggregate> {
        self.rows.last()
    }

    /// Every (line, regimen) pair populated in at least one month, sorted by
    /// line then name.  These become the wide table's regimen columns.
    pub fn regimen_columns(&self) -> BTreeSet<(Line, String)> {
        self.rows
            .iter()
            .flat_map(|row| row.regimen_stock.keys().cloned())
            .collect()
    }

    /// Wide-table column name for a regimen, e.g. `2L_Kd`.
    pub fn column_name(line: Line, regimen: &str) -> String {
        format!("{line}_{regimen}")
    }
}
