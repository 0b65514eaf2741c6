//! Plain data row types written by output backends.

use lot_core::{Line, YearMonth};
use lot_sim::MonthlyAggregate;

/// Line totals for one simulated month.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonthSummaryRow {
    pub date:          YearMonth,
    pub new_starts_1l: f64,
    pub total_1l:      f64,
    pub total_2l:      f64,
    pub total_3l:      f64,
    pub total_4l_plus: f64,
}

impl From<&MonthlyAggregate> for MonthSummaryRow {
    fn from(agg: &MonthlyAggregate) -> Self {
        Self {
            date:          agg.date,
            new_starts_1l: agg.new_starts_1l,
            total_1l:      agg.total(Line::First),
            total_2l:      agg.total(Line::Second),
            total_3l:      agg.total(Line::Third),
            total_4l_plus: agg.total(Line::FourthPlus),
        }
    }
}

/// One (month, line, regimen) stock in long format.
#[derive(Debug, Clone, PartialEq)]
pub struct RegimenStockRow {
    pub date:     YearMonth,
    pub line:     Line,
    pub regimen:  String,
    pub patients: f64,
}

impl RegimenStockRow {
    /// Every populated regimen of `agg`, ordered by line then name.
    pub fn from_aggregate(agg: &MonthlyAggregate) -> Vec<Self> {
        agg.regimen_stock
            .iter()
            .map(|((line, regimen), &patients)| Self {
                date: agg.date,
                line: *line,
                regimen: regimen.clone(),
                patients,
            })
            .collect()
    }
}
