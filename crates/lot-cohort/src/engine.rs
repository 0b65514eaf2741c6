//! `CohortEngine` — arena of active cohorts.
//!
//! # Storage
//!
//! Cohorts live in a flat `Vec<Cohort>` with O(1) append.  Nothing is ever
//! removed during an update pass; negligible cohorts are dropped by
//! [`CohortEngine::prune`], a single order-preserving `retain` sweep the
//! driver runs every `prune_interval_months`.
//!
//! # Update pass
//!
//! [`CohortEngine::step`] updates every cohort against its own previous size
//! and returns the month's totals.  Spawns for the month are computed by the
//! caller from those totals *after* the pass, so a cohort created this month
//! never influences another cohort's update.

use std::collections::BTreeMap;

use log::{debug, warn};

use lot_core::{CohortId, Eligibility, Line, ModelConfig, RegimenId, YearMonth};
use lot_regimen::{RegimenCatalog, ShareSplit};

use crate::Cohort;

// ── StepTotals ────────────────────────────────────────────────────────────────

/// Aggregates accumulated during one update pass.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StepTotals {
    /// Patients progressing off each line this month, indexed by `Line::index`.
    pub progressed: [f64; 4],
    /// Deaths on each line this month.
    pub died: [f64; 4],
    /// Post-update stock per (line, regimen), active cohorts only.
    pub stock: BTreeMap<(Line, RegimenId), f64>,
}

impl StepTotals {
    #[inline]
    pub fn progressed(&self, line: Line) -> f64 {
        self.progressed[line.index()]
    }

    #[inline]
    pub fn died(&self, line: Line) -> f64 {
        self.died[line.index()]
    }

    /// Sum of regimen stocks on `line`.
    pub fn line_stock(&self, line: Line) -> f64 {
        self.stock
            .iter()
            .filter(|((l, _), _)| *l == line)
            .map(|(_, v)| v)
            .sum()
    }
}

// ── CohortEngine ──────────────────────────────────────────────────────────────

/// Owns every cohort of one simulation run.
#[derive(Clone, Debug)]
pub struct CohortEngine {
    cohorts:  Vec<Cohort>,
    next_id:  u32,
    min_size: f64,
}

impl CohortEngine {
    /// Empty engine; cohorts of `min_size` patients or fewer are negligible.
    pub fn new(min_size: f64) -> Self {
        Self {
            cohorts: Vec::new(),
            next_id: 0,
            min_size,
        }
    }

    /// Create one cohort unless `size` is negligible.
    ///
    /// Ids are serial per engine, so one run holds at most `u32::MAX`
    /// cohorts; past that, spawning fails with a warning.  Sweep scenarios
    /// each own an engine and do not share the counter.
    pub fn spawn(
        &mut self,
        entry:       YearMonth,
        line:        Line,
        eligibility: Eligibility,
        regimen:     RegimenId,
        size:        f64,
    ) -> Option<CohortId> {
        if size.is_nan() || size <= self.min_size {
            return None;
        }
        let Some(next) = self.next_id.checked_add(1) else {
            warn!("cohort id space exhausted; {size:.3} patients on {line} not allocated");
            return None;
        };
        let id = CohortId(self.next_id);
        self.next_id = next;
        self.cohorts.push(Cohort::new(id, entry, line, eligibility, regimen, size));
        Some(id)
    }

    /// Split `patients` across `split` and spawn one cohort per regimen.
    ///
    /// Shares naming a regimen absent from `catalog` are skipped (treated as
    /// zero).  Returns the number of cohorts created.
    pub fn spawn_allocated(
        &mut self,
        entry:       YearMonth,
        line:        Line,
        eligibility: Eligibility,
        patients:    f64,
        split:       &ShareSplit<'_>,
        catalog:     &RegimenCatalog,
    ) -> usize {
        let mut spawned = 0;
        for (&name, &share) in split {
            let Some(regimen) = catalog.id_of(name) else {
                debug!("{entry} {line}: share for unknown regimen {name:?} skipped");
                continue;
            };
            if self
                .spawn(entry, line, eligibility, regimen, patients * share)
                .is_some()
            {
                spawned += 1;
            }
        }
        spawned
    }

    /// Advance every cohort to `now` and collect the month's totals.
    pub fn step(
        &mut self,
        now:     YearMonth,
        catalog: &RegimenCatalog,
        config:  &ModelConfig,
    ) -> StepTotals {
        let mut totals = StepTotals::default();

        for cohort in &mut self.cohorts {
            if !cohort.is_active(self.min_size) {
                continue;
            }
            let Some(regimen) = catalog.get(cohort.regimen) else {
                continue;
            };

            let mortality = config.mortality.for_line(cohort.line);
            let outcome = cohort.update(now, regimen, mortality, self.min_size);

            let li = cohort.line.index();
            totals.progressed[li] += outcome.progressed;
            totals.died[li] += outcome.died;

            if cohort.is_active(self.min_size) {
                *totals.stock.entry((cohort.line, cohort.regimen)).or_default() += cohort.size;
            }
        }

        totals
    }

    /// Drop every negligible cohort.  Returns how many were removed.
    ///
    /// Negligible cohorts are already excluded from [`step`][Self::step]
    /// totals, so pruning never changes any aggregate.
    pub fn prune(&mut self) -> usize {
        let before = self.cohorts.len();
        let min_size = self.min_size;
        self.cohorts.retain(|c| c.is_active(min_size));
        before - self.cohorts.len()
    }

    /// Cohorts currently held (including not-yet-pruned negligible ones).
    pub fn cohorts(&self) -> &[Cohort] {
        &self.cohorts
    }

    pub fn len(&self) -> usize {
        self.cohorts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cohorts.is_empty()
    }

    #[cfg(test)]
    pub(crate) fn with_next_id(mut self, next_id: u32) -> Self {
        self.next_id = next_id;
        self
    }

    /// Total cohorts ever spawned.
    pub fn spawned_total(&self) -> u32 {
        self.next_id
    }

    pub fn min_size(&self) -> f64 {
        self.min_size
    }
}
