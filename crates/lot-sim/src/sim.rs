//! The `Sim` struct and its monthly loop.

use log::{debug, info};

use lot_cohort::CohortEngine;
use lot_core::{Eligibility, Line, ModelConfig, YearMonth};
use lot_regimen::{AdoptionEngine, RegimenCatalog};

use crate::{IncidenceSeries, MonthlyAggregate, SimObserver, SimulationTable};

/// The main simulation runner.
///
/// `Sim` owns its cohort engine and configuration and borrows the catalog and
/// incidence series, so many runs can share one copy of each.  Each month is
/// processed strictly after the previous one: every cohort update reads last
/// month's size, and this month's spawns depend only on pools accumulated in
/// this month's update pass.
///
/// Create via [`SimBuilder`][crate::SimBuilder].
pub struct Sim<'a> {
    /// Immutable run configuration.
    pub config: ModelConfig,

    /// Every cohort spawned so far and not yet pruned.
    pub cohorts: CohortEngine,

    pub(crate) catalog:    &'a RegimenCatalog,
    pub(crate) incidence:  &'a IncidenceSeries,
    pub(crate) start:      YearMonth,
    pub(crate) end:        YearMonth,
    /// Next month to simulate.
    pub(crate) current:    YearMonth,
    pub(crate) months_run: u32,
}

impl<'a> Sim<'a> {
    // ── Public API ────────────────────────────────────────────────────────

    /// Run from the current month through the end month and return every
    /// row produced.
    ///
    /// Calls observer hooks at every month boundary.  Use
    /// [`NoopObserver`][crate::NoopObserver] if you don't need callbacks.
    pub fn run<O: SimObserver>(&mut self, observer: &mut O) -> SimulationTable {
        let remaining = (self.end.months_since(self.current) + 1).max(0) as usize;
        info!(
            "simulating {remaining} months ({} → {}) over {} regimens",
            self.current,
            self.end,
            self.catalog.len()
        );

        let mut table = SimulationTable { rows: Vec::with_capacity(remaining) };
        while self.current <= self.end {
            table.rows.push(self.step_month(observer));
        }

        observer.on_sim_end(self.end);
        info!(
            "simulation complete: {} cohorts spawned, {} held",
            self.cohorts.spawned_total(),
            self.cohorts.len()
        );
        table
    }

    /// Run exactly `n` months from the current position (ignores the end
    /// month).  Useful for tests and incremental stepping.
    pub fn run_months<O: SimObserver>(&mut self, n: u32, observer: &mut O) -> Vec<MonthlyAggregate> {
        (0..n).map(|_| self.step_month(observer)).collect()
    }

    /// The next month to be simulated.
    pub fn current_month(&self) -> YearMonth {
        self.current
    }

    pub fn start_month(&self) -> YearMonth {
        self.start
    }

    pub fn end_month(&self) -> YearMonth {
        self.end
    }

    // ── Core month processing ─────────────────────────────────────────────

    fn step_month<O: SimObserver>(&mut self, observer: &mut O) -> MonthlyAggregate {
        let now = self.current;
        observer.on_month_start(now);

        let adoption = AdoptionEngine::new(self.catalog);
        let min_size = self.config.min_cohort_size;

        // ── Phase 1–2: lagged incidence → new 1L cohorts ──────────────────
        let lagged = now.add_months(-(self.config.uptake.dx_to_1l_delay_months as i64));
        let new_starts_1l = self.incidence.get(lagged) * self.config.uptake.treated_fraction;

        let te = self.config.te_fraction;
        for (eligibility, fraction) in [(Eligibility::Te, te), (Eligibility::Ti, 1.0 - te)] {
            let split = adoption.get_market_share(now, Line::First, eligibility);
            if split.is_empty() {
                debug!("{now}: no 1L regimen for {eligibility}; inflow not allocated");
                continue;
            }
            self.cohorts.spawn_allocated(
                now,
                Line::First,
                eligibility,
                new_starts_1l * fraction,
                &split,
                self.catalog,
            );
        }

        // ── Phase 3: update every cohort against last month's size ────────
        let totals = self.cohorts.step(now, self.catalog, &self.config);

        // ── Phase 4: propagate progression pools downstream ───────────────
        //
        // Uses only this pass's pools; cohorts spawned here are first
        // updated next month.  4L+ has no next line: its progression is
        // absorbed.
        for line in Line::ALL {
            let Some(next) = line.next() else {
                continue;
            };
            let pool = totals.progressed(line) * self.config.attrition.advance_prob(line);
            if pool <= min_size {
                continue;
            }
            let split = adoption.get_market_share(now, next, Eligibility::Both);
            if split.is_empty() {
                debug!("{now}: no {next} regimen; {pool:.3} progressing patients not allocated");
                continue;
            }
            self.cohorts
                .spawn_allocated(now, next, Eligibility::Both, pool, &split, self.catalog);
        }

        // ── Phase 5: emit ─────────────────────────────────────────────────
        let row = MonthlyAggregate::from_totals(now, new_starts_1l, &totals, self.catalog);

        // ── Phase 6: periodic prune ───────────────────────────────────────
        self.months_run += 1;
        if self.months_run.is_multiple_of(self.config.prune_interval_months) {
            let removed = self.cohorts.prune();
            debug!("{now}: pruned {removed} cohorts, {} remain", self.cohorts.len());
            observer.on_prune(now, removed, self.cohorts.len());
        }

        observer.on_month_end(&row);
        self.current = now.next();
        row
    }
}
