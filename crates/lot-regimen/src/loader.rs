//! CSV regimen catalog loader.
//!
//! # CSV format
//!
//! One row per regimen.  Only `name`, `line` and `approval_year` are
//! required; empty or missing optional columns take their defaults.
//!
//! ```csv
//! name,line,eligibility,approval_year,pfs_median,peak_share,speed,time_to_peak,hazard_ratio,citation
//! VRd,1L,Both,2010,41,0.6,1.0,2.0,,SWOG S0777
//! Dara-VRd,1L,TE,2019.5,,0.5,1.5,1.5,0.42,PERSEUS
//! Teclistamab,4L+,Both,2022.8,11.3,,,,,MajesTEC-1
//! ```
//!
//! | Column          | Default                                         |
//! |-----------------|-------------------------------------------------|
//! | `eligibility`   | `Both`                                          |
//! | `pfs_median`    | `0` → degenerate survival curve (logged)        |
//! | `peak_share`    | `0.5`                                           |
//! | `speed`         | `1.0`                                           |
//! | `time_to_peak`  | `2.0` (years)                                   |
//!
//! Non-finite numbers and a `peak_share` outside `[0, 1]` are rejected by
//! [`RegimenCatalog::new`].

use std::io::Read;
use std::path::Path;

use log::warn;
use serde::Deserialize;

use lot_core::{Eligibility, Line};

use crate::{AdoptionParams, Regimen, RegimenCatalog, RegimenError, RegimenResult};

// ── CSV record ────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct RegimenRecord {
    name:          String,
    line:          String,
    #[serde(default)]
    eligibility:   Option<String>,
    approval_year: f64,
    #[serde(default)]
    pfs_median:    Option<f64>,
    #[serde(default)]
    peak_share:    Option<f64>,
    #[serde(default)]
    speed:         Option<f64>,
    #[serde(default)]
    time_to_peak:  Option<f64>,
    #[serde(default)]
    hazard_ratio:  Option<f64>,
    #[serde(default)]
    citation:      Option<String>,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Load a [`RegimenCatalog`] from a CSV file, applying `weibull_shape` to
/// every regimen's survival curve.
pub fn load_catalog_csv(path: &Path, weibull_shape: f64) -> RegimenResult<RegimenCatalog> {
    let file = std::fs::File::open(path).map_err(RegimenError::Io)?;
    load_catalog_reader(file, weibull_shape)
}

/// Like [`load_catalog_csv`] but accepts any `Read` source.
pub fn load_catalog_reader<R: Read>(reader: R, weibull_shape: f64) -> RegimenResult<RegimenCatalog> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut regimens = Vec::new();
    for result in csv_reader.deserialize::<RegimenRecord>() {
        let row = result.map_err(|e| RegimenError::Parse(e.to_string()))?;
        regimens.push(build_regimen(row, weibull_shape)?);
    }

    RegimenCatalog::new(regimens)
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn build_regimen(row: RegimenRecord, weibull_shape: f64) -> RegimenResult<Regimen> {
    let line: Line = row.line.parse()?;
    let eligibility: Eligibility = match row.eligibility.as_deref() {
        Some(s) => s.parse()?,
        None    => Eligibility::Both,
    };

    let defaults = AdoptionParams::default();
    let adoption = AdoptionParams {
        peak_share:   row.peak_share.unwrap_or(defaults.peak_share),
        speed:        row.speed.unwrap_or(defaults.speed),
        time_to_peak: row.time_to_peak.unwrap_or(defaults.time_to_peak),
    };

    let mut regimen = Regimen::new(
        row.name,
        line,
        eligibility,
        row.approval_year,
        row.pfs_median.unwrap_or(0.0),
        weibull_shape,
    )
    .with_adoption(adoption)
    .with_citation(row.citation.unwrap_or_default());

    if let Some(hr) = row.hazard_ratio {
        regimen = regimen.with_hazard_ratio(hr);
    }

    if regimen.survival.is_degenerate() {
        warn!(
            "regimen {:?} has no usable median PFS ({}); using the fast-decay fallback curve",
            regimen.name, regimen.pfs_median
        );
    }

    Ok(regimen)
}
