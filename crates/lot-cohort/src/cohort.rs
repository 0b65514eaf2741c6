//! The `Cohort` entity and its monthly competing-risk update.

use lot_core::{CohortId, Eligibility, Line, RegimenId, YearMonth};
use lot_regimen::{Regimen, RegimenCatalog};

/// Patients leaving a cohort during one update.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct CohortOutcome {
    /// Progressed off the current regimen (feeds the next line).
    pub progressed: f64,
    /// Died on treatment.
    pub died:       f64,
}

/// Scale `p_progress` and `p_death` down proportionally when they sum past 1.
///
/// Not a cause-specific decomposition: each probability is computed as if it
/// alone acted on the full cohort, then both are capped jointly.  The
/// `p_progress : p_death` ratio is preserved.
#[inline]
pub fn competing_probabilities(p_progress: f64, p_death: f64) -> (f64, f64) {
    let total = p_progress + p_death;
    if total > 1.0 {
        (p_progress / total, p_death / total)
    } else {
        (p_progress, p_death)
    }
}

/// A homogeneous sub-population sharing entry month, line, eligibility and
/// regimen, tracked as one shrinking mass.
#[derive(Clone, Debug, PartialEq)]
pub struct Cohort {
    pub id:           CohortId,
    /// Month of creation; ages are measured from here.
    pub entry:        YearMonth,
    pub line:         Line,
    pub eligibility:  Eligibility,
    pub regimen:      RegimenId,
    pub initial_size: f64,
    /// Never negative; only decreases after creation.
    pub size:         f64,
}

impl Cohort {
    pub fn new(
        id:          CohortId,
        entry:       YearMonth,
        line:        Line,
        eligibility: Eligibility,
        regimen:     RegimenId,
        size:        f64,
    ) -> Self {
        Self {
            id,
            entry,
            line,
            eligibility,
            regimen,
            initial_size: size,
            size,
        }
    }

    /// Whole months since entry (0 in the month of creation).
    #[inline]
    pub fn age_months(&self, now: YearMonth) -> i64 {
        now.months_since(self.entry).max(0)
    }

    /// `true` while the cohort is above the negligible-size threshold.
    #[inline]
    pub fn is_active(&self, min_size: f64) -> bool {
        self.size > min_size
    }

    /// Advance one month.
    ///
    /// Progression comes from the regimen's survival curve at the cohort's
    /// age; death from the line's constant `mortality_rate`.  A negligible
    /// cohort is left untouched and reports no outflow.
    pub fn update(
        &mut self,
        now:            YearMonth,
        regimen:        &Regimen,
        mortality_rate: f64,
        min_size:       f64,
    ) -> CohortOutcome {
        if !self.is_active(min_size) {
            return CohortOutcome::default();
        }

        let age = self.age_months(now) as f64;
        let (p_progress, p_death) = competing_probabilities(
            regimen.survival.monthly_transition_prob(age, 1.0),
            mortality_rate,
        );

        let progressed = self.size * p_progress;
        let died = self.size * p_death;
        self.size = (self.size - progressed - died).max(0.0);

        CohortOutcome { progressed, died }
    }

    /// Human-readable identity: `<entry>_<line>_<eligibility>_<regimen>`.
    pub fn label(&self, catalog: &RegimenCatalog) -> String {
        let regimen = catalog
            .get(self.regimen)
            .map(|r| r.name.as_str())
            .unwrap_or("?");
        format!(
            "{:04}-{:02}_{}_{}_{}",
            self.entry.year, self.entry.month, self.line, self.eligibility, regimen
        )
    }
}
