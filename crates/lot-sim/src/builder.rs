//! Fluent builder for constructing a [`Sim`].

use log::warn;

use lot_cohort::CohortEngine;
use lot_core::{Line, ModelConfig, YearMonth};
use lot_regimen::RegimenCatalog;

use crate::{IncidenceSeries, Sim, SimError, SimResult};

/// Fluent builder for [`Sim`].
///
/// # Required inputs
///
/// - [`ModelConfig`] — uptake, attrition, mortality, tunables
/// - [`RegimenCatalog`] — shared read-only
/// - [`IncidenceSeries`] — shared read-only
///
/// # Optional inputs (have defaults)
///
/// | Method      | Default                             |
/// |-------------|-------------------------------------|
/// | `.start(m)` | First month of the incidence series |
/// | `.end(m)`   | Last month of the incidence series  |
///
/// Months outside the incidence series contribute no new patients; extend
/// the series with [`IncidenceSeries::project_to`] to simulate past it.
///
/// # Example
///
/// ```rust,ignore
/// let mut sim = SimBuilder::new(config, &catalog, &incidence)
///     .end(YearMonth::new(2030, 12)?)
///     .build()?;
/// let table = sim.run(&mut NoopObserver);
/// ```
pub struct SimBuilder<'a> {
    config:    ModelConfig,
    catalog:   &'a RegimenCatalog,
    incidence: &'a IncidenceSeries,
    start:     Option<YearMonth>,
    end:       Option<YearMonth>,
}

impl<'a> SimBuilder<'a> {
    /// Create a builder with all required inputs.
    pub fn new(
        config:    ModelConfig,
        catalog:   &'a RegimenCatalog,
        incidence: &'a IncidenceSeries,
    ) -> Self {
        Self {
            config,
            catalog,
            incidence,
            start: None,
            end:   None,
        }
    }

    /// First simulated month.
    pub fn start(mut self, month: YearMonth) -> Self {
        self.start = Some(month);
        self
    }

    /// Last simulated month (inclusive).
    pub fn end(mut self, month: YearMonth) -> Self {
        self.end = Some(month);
        self
    }

    /// Validate inputs and return a ready-to-run [`Sim`].
    ///
    /// Every non-degenerate regimen in the catalog must carry the config's
    /// `weibull_shape`; load the catalog with that shape.
    pub fn build(self) -> SimResult<Sim<'a>> {
        self.config.validate()?;

        let start = self.start.or(self.incidence.first()).ok_or_else(|| {
            SimError::Config("no start month: incidence series is empty".into())
        })?;
        let end = self.end.or(self.incidence.last()).ok_or_else(|| {
            SimError::Config("no end month: incidence series is empty".into())
        })?;
        if end < start {
            return Err(SimError::Config(format!("end month {end} precedes start month {start}")));
        }

        let shape = self.config.weibull_shape;
        for (_, r) in self.catalog.iter() {
            if !r.survival.is_degenerate() && (r.survival.shape - shape).abs() > 1e-12 {
                return Err(SimError::Config(format!(
                    "regimen {:?} uses Weibull shape {} but the config declares {shape}",
                    r.name, r.survival.shape
                )));
            }
        }

        for line in Line::ALL {
            if self.catalog.for_line(line).next().is_none() {
                warn!("no regimen declared for {line}; patients reaching it are not allocated");
            }
        }

        Ok(Sim {
            cohorts:    CohortEngine::new(self.config.min_cohort_size),
            config:     self.config,
            catalog:    self.catalog,
            incidence:  self.incidence,
            start,
            end,
            current:    start,
            months_run: 0,
        })
    }
}
