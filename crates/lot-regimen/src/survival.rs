//! Parametric (Weibull) time-to-progression curves.
//!
//! ```text
//! S(t) = exp(-(t / scale)^shape)          t ≥ 0,  S(t) = 1 for t < 0
//! scale = median / ln(2)^(1 / shape)      so that S(median) = 0.5
//! ```
//!
//! `t` is always months since cohort entry, never calendar time.

use std::f64::consts::LN_2;

/// Degenerate parameterisation used when a regimen has no usable median:
/// nearly the whole cohort progresses in its first month.
const DEGENERATE_SCALE: f64 = 0.1;
const DEGENERATE_SHAPE: f64 = 1.0;

/// Weibull survival curve.  Pure and stateless given its two parameters.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SurvivalModel {
    pub scale: f64,
    pub shape: f64,
}

impl SurvivalModel {
    /// Derive the curve whose median time-to-event is `median_months`.
    ///
    /// A median that is non-positive or NaN (incomplete regimen data), or a
    /// shape that is not a positive finite number, yields the degenerate
    /// fast-decay curve (`scale = 0.1`, `shape = 1`) instead of an error.
    pub fn from_median(median_months: f64, shape: f64) -> Self {
        let usable = median_months.is_finite()
            && median_months > 0.0
            && shape.is_finite()
            && shape > 0.0;
        if !usable {
            return Self::degenerate();
        }
        Self {
            scale: median_months / LN_2.powf(1.0 / shape),
            shape,
        }
    }

    pub fn degenerate() -> Self {
        Self { scale: DEGENERATE_SCALE, shape: DEGENERATE_SHAPE }
    }

    pub fn is_degenerate(&self) -> bool {
        *self == Self::degenerate()
    }

    /// Probability that the event has not occurred by `t` months.
    #[inline]
    pub fn survival_prob(&self, t: f64) -> f64 {
        if t < 0.0 {
            return 1.0;
        }
        (-(t / self.scale).powf(self.shape)).exp()
    }

    /// Instantaneous hazard `h(t) = (k/λ)(t/λ)^(k-1)`; zero at `t ≤ 0`.
    pub fn hazard_rate(&self, t: f64) -> f64 {
        if t <= 0.0 {
            return 0.0;
        }
        (self.shape / self.scale) * (t / self.scale).powf(self.shape - 1.0)
    }

    /// Conditional probability of the event in `[t, t + dt)` given survival
    /// to `t`: `1 − S(t+dt)/S(t)`.
    ///
    /// Returns `1.0` once `S(t)` has underflowed to zero: the survivor pool
    /// is numerically exhausted and must transition.
    pub fn monthly_transition_prob(&self, t: f64, dt: f64) -> f64 {
        let s_now = self.survival_prob(t);
        if s_now == 0.0 {
            return 1.0;
        }
        let s_next = self.survival_prob(t + dt);
        (1.0 - s_next / s_now).clamp(0.0, 1.0)
    }

    /// Time at which `S(t) = 0.5`.
    pub fn median(&self) -> f64 {
        self.scale * LN_2.powf(1.0 / self.shape)
    }

    /// Expected months a monthly-updated cohort stays on treatment, counting
    /// end-of-month survivors: `Σ_{n=1..=horizon} S(n)`.
    ///
    /// Multiplying a constant monthly inflow by this value gives the
    /// steady-state stock with zero competing mortality.
    pub fn discrete_residence(&self, horizon_months: u32) -> f64 {
        (1..=horizon_months).map(|n| self.survival_prob(n as f64)).sum()
    }
}
