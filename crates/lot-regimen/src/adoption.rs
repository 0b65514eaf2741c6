//! `AdoptionEngine` — time-varying market-share split among regimens.
//!
//! # Algorithm
//!
//! For a request `(date, line, eligibility)`:
//!
//! 1. **Candidates**: regimens declared for `line` whose eligibility is the
//!    requested class or `Both`.
//! 2. **Score**: each candidate's logistic adoption curve evaluated at
//!    `date.year_fraction() − approval_year` (zero before approval).
//! 3. **Normalise**: divide by the score total.  If the total is ~0 (every
//!    candidate still pre-approval) fall back to an equal split.
//!
//! No candidates → empty split; the caller treats that as "no inflow
//! allocable".

use std::collections::BTreeMap;

use lot_core::{Eligibility, Line, YearMonth};

use crate::RegimenCatalog;

/// Score totals at or below this are treated as zero.
const MIN_TOTAL_SCORE: f64 = 1e-9;

/// Regimen name → share.  Ordered by name so iteration is deterministic.
pub type ShareSplit<'a> = BTreeMap<&'a str, f64>;

/// Computes normalised market shares from the catalog's adoption curves.
#[derive(Clone, Copy, Debug)]
pub struct AdoptionEngine<'a> {
    catalog: &'a RegimenCatalog,
}

impl<'a> AdoptionEngine<'a> {
    pub fn new(catalog: &'a RegimenCatalog) -> Self {
        Self { catalog }
    }

    /// Shares of every eligible regimen for patients entering `line` in
    /// `date`.  Non-empty results sum to 1.0.
    pub fn get_market_share(
        &self,
        date:        YearMonth,
        line:        Line,
        eligibility: Eligibility,
    ) -> ShareSplit<'a> {
        let now = date.year_fraction();

        let raw: Vec<(&'a str, f64)> = self
            .catalog
            .iter()
            .map(|(_, r)| r)
            .filter(|r| r.serves(line, eligibility))
            .map(|r| (r.name.as_str(), r.adoption.score(now - r.approval_year)))
            .collect();

        if raw.is_empty() {
            return ShareSplit::new();
        }

        let total: f64 = raw.iter().map(|(_, s)| s).sum();
        if total <= MIN_TOTAL_SCORE {
            let equal = 1.0 / raw.len() as f64;
            return raw.into_iter().map(|(name, _)| (name, equal)).collect();
        }

        raw.into_iter().map(|(name, s)| (name, s / total)).collect()
    }
}
