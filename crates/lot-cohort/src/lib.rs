//! `lot-cohort` — cohort lifecycle: spawn, monthly update, prune.
//!
//! # Cohort states
//!
//! ```text
//!            update()                    size ≤ threshold        prune()
//!  ACTIVE ───────────────► ACTIVE ──────────────────► PRUNABLE ─────────► REMOVED
//!     │  mass splits into:
//!     ├── PROGRESSED  → next line's inflow pool (absorbed at 4L+)
//!     └── DECEASED    → leaves the model
//! ```
//!
//! [`CohortEngine`] owns every cohort in a flat arena.  A month's update pass
//! only mutates each cohort in place and accumulates totals; spawning and
//! removal happen outside the pass, so iteration order never affects results.

pub mod cohort;
pub mod engine;

#[cfg(test)]
mod tests;

pub use cohort::{Cohort, CohortOutcome, competing_probabilities};
pub use engine::{CohortEngine, StepTotals};
