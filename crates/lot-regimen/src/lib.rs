//! `lot-regimen` — everything known about treatment options before the run.
//!
//! # Overview
//!
//! ```text
//! regimens.csv ──load_catalog_csv──► RegimenCatalog (immutable, Vec<Regimen>)
//!                                        │
//!              Regimen ── SurvivalModel  │  (Weibull, derived from median PFS)
//!                     └── AdoptionParams │  (logistic diffusion)
//!                                        ▼
//!                               AdoptionEngine::get_market_share(date, line, elig)
//!                                        │
//!                                        ▼
//!                               { regimen name → share }, Σ = 1
//! ```
//!
//! Every structure here is read-only once built; cohorts refer to regimens
//! by [`RegimenId`][lot_core::RegimenId].

pub mod adoption;
pub mod catalog;
pub mod error;
pub mod loader;
pub mod regimen;
pub mod survival;

#[cfg(test)]
mod tests;

pub use adoption::{AdoptionEngine, ShareSplit};
pub use catalog::RegimenCatalog;
pub use error::{RegimenError, RegimenResult};
pub use loader::{load_catalog_csv, load_catalog_reader};
pub use regimen::{AdoptionParams, Regimen};
pub use survival::SurvivalModel;
