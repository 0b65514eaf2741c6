//! `Regimen` — one competing treatment option.

use lot_core::{Eligibility, Line};

use crate::SurvivalModel;

/// Logistic diffusion parameters for a regimen's adoption curve.
///
/// ```text
/// score(y) = peak_share / (1 + exp(-speed · (y − time_to_peak)))
/// ```
///
/// where `y` is years since approval.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct AdoptionParams {
    /// Ceiling of the curve, in [0, 1].
    pub peak_share:   f64,
    /// Ramp speed `k` (per year).
    pub speed:        f64,
    /// Inflection point, years after approval.
    pub time_to_peak: f64,
}

impl Default for AdoptionParams {
    fn default() -> Self {
        Self { peak_share: 0.5, speed: 1.0, time_to_peak: 2.0 }
    }
}

impl AdoptionParams {
    /// Raw (unnormalised) adoption score `years_since_approval` after launch.
    /// Zero before approval.
    #[inline]
    pub fn score(&self, years_since_approval: f64) -> f64 {
        if years_since_approval < 0.0 {
            return 0.0;
        }
        self.peak_share
            / (1.0 + (-self.speed * (years_since_approval - self.time_to_peak)).exp())
    }
}

/// Immutable description of a treatment option.
///
/// Created once at load time and shared by every cohort that uses it (cohorts
/// hold a `RegimenId`, not a copy).
#[derive(Clone, Debug, PartialEq)]
pub struct Regimen {
    /// Unique key within the catalog.
    pub name:          String,
    pub line:          Line,
    pub eligibility:   Eligibility,
    /// Approval as a fractional calendar year.
    pub approval_year: f64,
    /// Median progression-free survival in months, as supplied.
    pub pfs_median:    f64,
    /// Time-to-progression curve derived from `pfs_median`.
    pub survival:      SurvivalModel,
    pub adoption:      AdoptionParams,
    /// Display-only metadata.
    pub hazard_ratio:  Option<f64>,
    pub citation:      String,
}

impl Regimen {
    /// Build a regimen, deriving its survival curve from `pfs_median` and
    /// `weibull_shape`.  Adoption parameters start at their defaults.
    pub fn new(
        name:          impl Into<String>,
        line:          Line,
        eligibility:   Eligibility,
        approval_year: f64,
        pfs_median:    f64,
        weibull_shape: f64,
    ) -> Self {
        Self {
            name: name.into(),
            line,
            eligibility,
            approval_year,
            pfs_median,
            survival: SurvivalModel::from_median(pfs_median, weibull_shape),
            adoption: AdoptionParams::default(),
            hazard_ratio: None,
            citation: String::new(),
        }
    }

    pub fn with_adoption(mut self, adoption: AdoptionParams) -> Self {
        self.adoption = adoption;
        self
    }

    pub fn with_hazard_ratio(mut self, hr: f64) -> Self {
        self.hazard_ratio = Some(hr);
        self
    }

    pub fn with_citation(mut self, citation: impl Into<String>) -> Self {
        self.citation = citation.into();
        self
    }

    /// `true` if this regimen competes for patients entering `line` with the
    /// given eligibility.
    #[inline]
    pub fn serves(&self, line: Line, eligibility: Eligibility) -> bool {
        self.line == line && self.eligibility.admits(eligibility)
    }
}
