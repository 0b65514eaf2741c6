//! `lot-sim` — monthly loop orchestrator for the line-of-therapy simulator.
//!
//! # Monthly loop
//!
//! ```text
//! for month in start..=end:
//!   ① Inflow    — new_1L = incidence[month − delay] × treated_fraction,
//!                 split TE / TI by te_fraction.
//!   ② Spawn 1L  — AdoptionEngine shares for (month, 1L, TE|TI) → cohorts.
//!   ③ Update    — every active cohort ages one month (competing progression
//!                 vs. death); progression pools and stocks are accumulated.
//!   ④ Propagate — each line's pool × advancement probability is spawned
//!                 into the next line via shares for (month, next, Both).
//!                 4L+ progression is absorbed.
//!   ⑤ Emit      — one MonthlyAggregate row.
//!   ⑥ Prune     — every prune_interval_months, drop negligible cohorts.
//! ```
//!
//! The loop is single-threaded and deterministic: identical inputs give
//! bit-identical tables.  Independent scenarios can run in parallel through
//! [`run_sweep`] with the `parallel` feature.
//!
//! # Cargo features
//!
//! | Feature    | Effect                                                 |
//! |------------|--------------------------------------------------------|
//! | `parallel` | Runs sweep scenarios on Rayon's thread pool.           |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use lot_sim::{NoopObserver, SimBuilder};
//!
//! let mut sim = SimBuilder::new(config, &catalog, &incidence).build()?;
//! let table = sim.run(&mut NoopObserver);
//! ```

pub mod aggregate;
pub mod builder;
pub mod error;
pub mod incidence;
pub mod observer;
pub mod sim;
pub mod sweep;


pub use aggregate::{MonthlyAggregate, SimulationTable};
pub use builder::SimBuilder;
pub use error::{SimError, SimResult};
pub use incidence::{IncidenceSeries, load_incidence_csv, load_incidence_reader};
pub use observer::{NoopObserver, SimObserver};
pub use sim::Sim;
pub use sweep::{Scenario, ScenarioResult, run_sweep};
