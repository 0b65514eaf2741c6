//! `lot-core` — foundational types for the line-of-therapy cohort simulator.
//!
//! This crate is a dependency of every other `lot-*` crate.  It intentionally
//! has no `lot-*` dependencies and minimal external ones (only `thiserror`,
//! plus optional `serde`).
//!
//! # What lives here
//!
//! | Module          | Contents                                              |
//! |-----------------|-------------------------------------------------------|
//! | [`ids`]         | `CohortId`, `RegimenId`                               |
//! | [`time`]        | `YearMonth` calendar month                            |
//! | [`line`]        | `Line`, `Eligibility` enums                           |
//! | [`config`]      | `ModelConfig` and its sections                        |
//! | [`error`]       | `LotError`, `LotResult`                               |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod config;
pub mod error;
pub mod ids;
pub mod line;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::{
    AttritionConfig, DurationConfig, ModelConfig, MortalityConfig, UptakeConfig,
};
pub use error::{LotError, LotResult};
pub use ids::{CohortId, RegimenId};
pub use line::{Eligibility, Line};
pub use time::YearMonth;
