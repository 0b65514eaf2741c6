//! Independent scenario runs (parameter sweeps, sensitivity analysis).
//!
//! Every scenario builds its own [`Sim`][crate::Sim] and cohort engine; only
//! the regimen catalog and incidence series are shared, read-only.  With the
//! `parallel` feature scenarios run on Rayon's thread pool.  Results are
//! returned in input order either way, and each table is identical to a
//! standalone run of the same scenario.

use lot_core::{ModelConfig, YearMonth};
use lot_regimen::RegimenCatalog;

use crate::{IncidenceSeries, NoopObserver, SimBuilder, SimResult, SimulationTable};

/// One named configuration to simulate.
#[derive(Clone, Debug)]
pub struct Scenario {
    pub name:   String,
    pub config: ModelConfig,
    /// Optional last month; defaults to the end of the incidence series.
    pub end:    Option<YearMonth>,
}

impl Scenario {
    pub fn new(name: impl Into<String>, config: ModelConfig) -> Self {
        Self { name: name.into(), config, end: None }
    }
}

/// Outcome of one sweep scenario.
#[derive(Debug)]
pub struct ScenarioResult {
    pub name:  String,
    pub table: SimResult<SimulationTable>,
}

/// Run every scenario and return their tables in input order.
pub fn run_sweep(
    scenarios: &[Scenario],
    catalog:   &RegimenCatalog,
    incidence: &IncidenceSeries,
) -> Vec<ScenarioResult> {
    #[cfg(not(feature = "parallel"))]
    {
        scenarios
            .iter()
            .map(|s| run_one(s, catalog, incidence))
            .collect()
    }

    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;

        scenarios
            .par_iter()
            .map(|s| run_one(s, catalog, incidence))
            .collect()
    }
}

fn run_one(
    scenario:  &Scenario,
    catalog:   &RegimenCatalog,
    incidence: &IncidenceSeries,
) -> ScenarioResult {
    let mut builder = SimBuilder::new(scenario.config.clone(), catalog, incidence);
    if let Some(end) = scenario.end {
        builder = builder.end(end);
    }
    let table = builder.build().map(|mut sim| sim.run(&mut NoopObserver));
    ScenarioResult { name: scenario.name.clone(), table }
}
