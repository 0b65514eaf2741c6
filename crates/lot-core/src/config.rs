//! Model configuration.
//!
//! One immutable [`ModelConfig`] value is built before the run and passed by
//! reference into the driver and every cohort update.  There is no global
//! state.  Field names mirror the parameter file layout so that a JSON
//! document deserialises directly (feature `serde`):
//!
//! ```json
//! {
//!   "uptake":    { "treated_fraction": 0.85, "dx_to_1l_delay_months": 1 },
//!   "attrition": { "p_reach_2l": 0.8, "p_reach_3l_given_2l": 0.6 },
//!   "mortality": { "monthly_death_hazard_1l": 0.004,
//!                  "monthly_death_hazard_2l": 0.008,
//!                  "monthly_death_hazard_3l_plus": 0.02 },
//!   "durations_months_median": { "1l": 24, "2l": 16, "3l_plus": 6 }
//! }
//! ```

use crate::{Line, LotError, LotResult};

const DEFAULT_TE_FRACTION: f64 = 0.4;
const DEFAULT_WEIBULL_SHAPE: f64 = 1.3;
const DEFAULT_MIN_COHORT_SIZE: f64 = 1e-4;
const DEFAULT_PRUNE_INTERVAL_MONTHS: u32 = 12;

fn default_te_fraction() -> f64 { DEFAULT_TE_FRACTION }
fn default_weibull_shape() -> f64 { DEFAULT_WEIBULL_SHAPE }
fn default_min_cohort_size() -> f64 { DEFAULT_MIN_COHORT_SIZE }
fn default_prune_interval() -> u32 { DEFAULT_PRUNE_INTERVAL_MONTHS }

// ── Sections ──────────────────────────────────────────────────────────────────

/// Diagnosis → first-line treatment uptake.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UptakeConfig {
    /// Share of incident patients that start 1L treatment.
    pub treated_fraction: f64,
    /// Lag between diagnosis and 1L start.
    pub dx_to_1l_delay_months: u32,
}

/// Probabilities that a progressing patient starts the next line.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AttritionConfig {
    pub p_reach_2l: f64,
    pub p_reach_3l_given_2l: f64,
    /// 3L → 4L+ advancement.  Implicit when absent: reuses `p_reach_3l_given_2l`.
    #[cfg_attr(feature = "serde", serde(default))]
    pub p_reach_4l_given_3l: Option<f64>,
}

impl AttritionConfig {
    /// Probability that a patient progressing out of `from` starts the next
    /// line.  Zero for the terminal line.
    pub fn advance_prob(&self, from: Line) -> f64 {
        match from {
            Line::First      => self.p_reach_2l,
            Line::Second     => self.p_reach_3l_given_2l,
            Line::Third      => self.p_reach_4l_given_3l.unwrap_or(self.p_reach_3l_given_2l),
            Line::FourthPlus => 0.0,
        }
    }
}

/// Constant monthly death hazard per line (independent of regimen).
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MortalityConfig {
    pub monthly_death_hazard_1l: f64,
    pub monthly_death_hazard_2l: f64,
    pub monthly_death_hazard_3l_plus: f64,
    /// 4L+ override.  Falls back to the 3L+ hazard when absent.
    #[cfg_attr(feature = "serde", serde(default))]
    pub monthly_death_hazard_4l_plus: Option<f64>,
}

impl MortalityConfig {
    pub fn for_line(&self, line: Line) -> f64 {
        match line {
            Line::First      => self.monthly_death_hazard_1l,
            Line::Second     => self.monthly_death_hazard_2l,
            Line::Third      => self.monthly_death_hazard_3l_plus,
            Line::FourthPlus => self
                .monthly_death_hazard_4l_plus
                .unwrap_or(self.monthly_death_hazard_3l_plus),
        }
    }
}

/// Median time on treatment per line, in months.  Used for reference curves
/// and reporting only; cohort hazards come from the regimen catalog.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DurationConfig {
    #[cfg_attr(feature = "serde", serde(rename = "1l"))]
    pub first: f64,
    #[cfg_attr(feature = "serde", serde(rename = "2l"))]
    pub second: f64,
    #[cfg_attr(feature = "serde", serde(rename = "3l_plus"))]
    pub third_plus: f64,
}

impl DurationConfig {
    pub fn median_for(&self, line: Line) -> f64 {
        match line {
            Line::First  => self.first,
            Line::Second => self.second,
            Line::Third | Line::FourthPlus => self.third_plus,
        }
    }
}

impl Default for DurationConfig {
    fn default() -> Self {
        Self { first: 24.0, second: 16.0, third_plus: 6.0 }
    }
}

// ── ModelConfig ───────────────────────────────────────────────────────────────

/// Top-level simulation configuration.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ModelConfig {
    pub uptake: UptakeConfig,
    pub attrition: AttritionConfig,
    pub mortality: MortalityConfig,

    #[cfg_attr(feature = "serde", serde(default, rename = "durations_months_median"))]
    pub durations: DurationConfig,

    /// Share of new 1L entrants that are transplant-eligible; the rest are TI.
    #[cfg_attr(feature = "serde", serde(default = "default_te_fraction"))]
    pub te_fraction: f64,

    /// Weibull shape applied to every regimen's time-to-progression curve.
    /// Catalogs are built with it; `SimBuilder` rejects a catalog whose
    /// regimens disagree.
    #[cfg_attr(feature = "serde", serde(default = "default_weibull_shape"))]
    pub weibull_shape: f64,

    /// Cohorts smaller than this (patients) are never spawned and are
    /// dropped at the next prune sweep.
    #[cfg_attr(feature = "serde", serde(default = "default_min_cohort_size"))]
    pub min_cohort_size: f64,

    /// Months between prune sweeps.
    #[cfg_attr(feature = "serde", serde(default = "default_prune_interval"))]
    pub prune_interval_months: u32,
}

impl ModelConfig {
    /// A config with the given sections and every tunable at its default.
    pub fn new(
        uptake:    UptakeConfig,
        attrition: AttritionConfig,
        mortality: MortalityConfig,
    ) -> Self {
        Self {
            uptake,
            attrition,
            mortality,
            durations:             DurationConfig::default(),
            te_fraction:           default_te_fraction(),
            weibull_shape:         default_weibull_shape(),
            min_cohort_size:       default_min_cohort_size(),
            prune_interval_months: default_prune_interval(),
        }
    }

    /// Reject values that would produce an undefined or infinite hazard.
    ///
    /// Called by `SimBuilder::build`; a config that passes here never makes
    /// the simulation fail.
    pub fn validate(&self) -> LotResult<()> {
        check_prob("uptake.treated_fraction", self.uptake.treated_fraction)?;
        check_prob("attrition.p_reach_2l", self.attrition.p_reach_2l)?;
        check_prob("attrition.p_reach_3l_given_2l", self.attrition.p_reach_3l_given_2l)?;
        if let Some(p) = self.attrition.p_reach_4l_given_3l {
            check_prob("attrition.p_reach_4l_given_3l", p)?;
        }
        for line in Line::ALL {
            check_prob(&format!("mortality[{line}]"), self.mortality.for_line(line))?;
        }
        check_prob("te_fraction", self.te_fraction)?;

        if !(self.weibull_shape.is_finite() && self.weibull_shape > 0.0) {
            return Err(LotError::Config(format!(
                "weibull_shape must be positive and finite, got {}",
                self.weibull_shape
            )));
        }
        if !(self.min_cohort_size.is_finite() && self.min_cohort_size >= 0.0) {
            return Err(LotError::Config(format!(
                "min_cohort_size must be non-negative, got {}",
                self.min_cohort_size
            )));
        }
        if self.prune_interval_months == 0 {
            return Err(LotError::Config("prune_interval_months must be at least 1".into()));
        }
        Ok(())
    }
}

fn check_prob(name: &str, p: f64) -> LotResult<()> {
    if p.is_finite() && (0.0..=1.0).contains(&p) {
        Ok(())
    } else {
        Err(LotError::Config(format!("{name} must be a probability in [0, 1], got {p}")))
    }
}
