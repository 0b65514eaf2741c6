//! myeloma — multiple myeloma line-of-therapy projection.
//!
//! Usage: `myeloma [params.json] [regimens.csv] [incidence.csv]`
//!
//! Any argument left out falls back to the embedded default below.  Without
//! an incidence file a flat US-scale series (~35 K cases/year) with a mild
//! seasonal swing is generated for 2018–2023.  Observed incidence is
//! projected to `HORIZON` by replaying the last complete year.
//!
//! Writes `output/myeloma/{month_summaries,regimen_stocks,lot_wide}.csv` and
//! prints a short line-total summary plus a treated-fraction sweep.

use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use log::info;

use lot_core::{Line, ModelConfig, YearMonth};
use lot_output::{CsvWriter, OutputWriter, SimOutputObserver, write_wide_csv};
use lot_regimen::{RegimenCatalog, SurvivalModel, load_catalog_csv, load_catalog_reader};
use lot_sim::{
    IncidenceSeries, MonthlyAggregate, Scenario, SimBuilder, SimObserver, load_incidence_csv,
    run_sweep,
};

// ── Constants ─────────────────────────────────────────────────────────────────

const OUTPUT_DIR:         &str  = "output/myeloma";
const HORIZON_YEAR:       i32   = 2030;
const BASE_MONTHLY_CASES: f64   = 2_900.0;
const SWEEP_FRACTIONS:    [f64; 3] = [0.75, 0.85, 0.95];

// ── Embedded defaults ─────────────────────────────────────────────────────────

const PARAMS_JSON: &str = r#"{
  "uptake":    { "treated_fraction": 0.85, "dx_to_1l_delay_months": 1 },
  "attrition": { "p_reach_2l": 0.80, "p_reach_3l_given_2l": 0.65, "p_reach_4l_given_3l": 0.55 },
  "mortality": {
    "monthly_death_hazard_1l": 0.004,
    "monthly_death_hazard_2l": 0.008,
    "monthly_death_hazard_3l_plus": 0.020
  },
  "durations_months_median": { "1l": 24, "2l": 16, "3l_plus": 6 }
}"#;

const REGIMENS_CSV: &str = "\
name,line,eligibility,approval_year,pfs_median,peak_share,speed,time_to_peak,hazard_ratio,citation\n\
VRd,1L,Both,2010,41,0.6,1.0,2.0,,SWOG S0777\n\
DRd,1L,TI,2019.5,61.9,0.6,1.2,2.0,0.53,MAIA\n\
D-VRd,1L,TE,2019.8,72,0.7,1.5,1.5,0.42,PERSEUS\n\
Kd,2L,Both,2012.5,18.7,0.4,1.0,2.0,,ENDEAVOR\n\
DKd,2L,Both,2020.6,28.6,0.5,1.3,2.0,0.59,CANDOR\n\
Isa-Kd,2L,Both,2021.2,35.7,0.4,1.2,2.0,0.58,IKEMA\n\
Pd,3L,Both,2013.1,4.0,0.3,1.0,2.0,,MM-003\n\
DPd,3L,Both,2017.4,12.4,0.5,1.0,2.0,0.63,APOLLO\n\
Ide-cel,4L+,Both,2021.2,8.8,0.4,1.0,2.5,,KarMMa\n\
Cilta-cel,4L+,Both,2022.2,34.9,0.5,1.2,2.5,,CARTITUDE-1\n\
Teclistamab,4L+,Both,2022.8,11.3,0.5,1.5,1.5,,MajesTEC-1\n\
";

// ── Observer wrapper to count rows ────────────────────────────────────────────

struct CountingObserver<W: OutputWriter> {
    inner:        SimOutputObserver<W>,
    months:       usize,
    stock_rows:   usize,
    prune_sweeps: usize,
}

impl<W: OutputWriter> CountingObserver<W> {
    fn new(inner: SimOutputObserver<W>) -> Self {
        Self { inner, months: 0, stock_rows: 0, prune_sweeps: 0 }
    }
}

impl<W: OutputWriter> SimObserver for CountingObserver<W> {
    fn on_month_end(&mut self, row: &MonthlyAggregate) {
        self.months += 1;
        self.stock_rows += row.regimen_stock.len();
        self.inner.on_month_end(row);
    }

    fn on_prune(&mut self, date: YearMonth, removed: usize, remaining: usize) {
        self.prune_sweeps += 1;
        self.inner.on_prune(date, removed, remaining);
    }

    fn on_sim_end(&mut self, final_month: YearMonth) {
        self.inner.on_sim_end(final_month);
    }
}

// ── Input loading ─────────────────────────────────────────────────────────────

fn load_config(path: Option<&Path>) -> Result<ModelConfig> {
    let text = match path {
        Some(p) => std::fs::read_to_string(p).with_context(|| format!("reading {}", p.display()))?,
        None => PARAMS_JSON.to_owned(),
    };
    let config: ModelConfig = serde_json::from_str(&text).context("parsing model parameters")?;
    config.validate()?;
    Ok(config)
}

fn load_catalog(path: Option<&Path>, shape: f64) -> Result<RegimenCatalog> {
    let catalog = match path {
        Some(p) => load_catalog_csv(p, shape)?,
        None => load_catalog_reader(Cursor::new(REGIMENS_CSV), shape)?,
    };
    Ok(catalog)
}

/// Flat monthly incidence with a ±5 % seasonal swing.
fn synthetic_incidence() -> Result<IncidenceSeries> {
    let start = YearMonth::new(2018, 1)?;
    let end = YearMonth::new(2023, 12)?;
    let records = start.range_inclusive(end).map(|date| {
        let phase = (date.month as f64 - 1.0) / 12.0 * std::f64::consts::TAU;
        (date, BASE_MONTHLY_CASES * (1.0 + 0.05 * phase.cos()))
    });
    Ok(IncidenceSeries::from_records(records)?)
}

fn load_incidence(path: Option<&Path>) -> Result<IncidenceSeries> {
    let observed = match path {
        Some(p) => load_incidence_csv(p)?,
        None => synthetic_incidence()?,
    };
    let horizon = YearMonth::new(HORIZON_YEAR, 12)?;
    Ok(observed.project_to(horizon)?)
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<PathBuf> = std::env::args_os().skip(1).map(PathBuf::from).collect();
    let arg = |i: usize| args.get(i).map(PathBuf::as_path);

    println!("=== myeloma — line-of-therapy cohort projection ===");

    // 1. Inputs.
    let config = load_config(arg(0))?;
    let catalog = load_catalog(arg(1), config.weibull_shape)?;
    let incidence = load_incidence(arg(2))?;
    info!(
        "loaded {} regimens, {} incidence months ({:?} → {:?})",
        catalog.len(),
        incidence.len(),
        incidence.first(),
        incidence.last()
    );

    // 2. Build sim.
    let mut sim = SimBuilder::new(config.clone(), &catalog, &incidence).build()?;
    println!(
        "Sim: {} → {}, treated fraction {:.2}, TE share {:.2}",
        sim.start_month(),
        sim.end_month(),
        config.uptake.treated_fraction,
        config.te_fraction
    );

    // 3. Set up output.
    let out_dir = Path::new(OUTPUT_DIR);
    std::fs::create_dir_all(out_dir)?;
    let writer = CsvWriter::new(out_dir)?;
    let mut obs = CountingObserver::new(SimOutputObserver::new(writer));

    // 4. Run.
    let t0 = Instant::now();
    let table = sim.run(&mut obs);
    let elapsed = t0.elapsed();

    if let Some(e) = obs.inner.take_error() {
        eprintln!("output error: {e}");
    }
    write_wide_csv(&table, &out_dir.join("lot_wide.csv"))?;

    // 5. Summary.
    println!("Simulation complete in {:.3} s", elapsed.as_secs_f64());
    println!("  month_summaries.csv : {} rows", obs.months);
    println!("  regimen_stocks.csv  : {} rows", obs.stock_rows);
    println!("  lot_wide.csv        : {} regimen columns", table.regimen_columns().len());
    println!("  prune sweeps        : {} ({} cohorts held)", obs.prune_sweeps, sim.cohorts.len());
    println!();

    let Some(last) = table.last() else {
        return Ok(());
    };
    println!("{:<6} {:>12}", "Line", last.date.to_string());
    println!("{}", "-".repeat(19));
    for line in Line::ALL {
        println!("{:<6} {:>12.0}", line.as_str(), last.total(line));
    }
    // Steady-state 1L stock if starts held at this month's level and nobody
    // left 1L except by progression. Later lines depend on attrition and
    // mortality, so they get no reference.
    let curve = SurvivalModel::from_median(config.durations.median_for(Line::First), config.weibull_shape);
    let reference = curve.discrete_residence(600) * last.new_starts_1l;
    println!("1L steady-state reference (no attrition or death): {reference:.0}");
    println!();

    println!("{:<24} {:>12}", "Regimen", "Patients");
    println!("{}", "-".repeat(37));
    for ((line, name), patients) in &last.regimen_stock {
        println!("{:<24} {:>12.0}", format!("{line} {name}"), patients);
    }
    println!();

    // 6. Treated-fraction sweep.
    let scenarios: Vec<Scenario> = SWEEP_FRACTIONS
        .iter()
        .map(|&f| {
            let mut cfg = config.clone();
            cfg.uptake.treated_fraction = f;
            Scenario::new(format!("treated={f:.2}"), cfg)
        })
        .collect();
    println!("{:<16} {:>10} {:>10} {:>10}", "Scenario", "1L", "2L", "On tx");
    println!("{}", "-".repeat(49));
    for result in run_sweep(&scenarios, &catalog, &incidence) {
        let table = result.table.with_context(|| format!("scenario {}", result.name))?;
        if let Some(row) = table.last() {
            println!(
                "{:<16} {:>10.0} {:>10.0} {:>10.0}",
                result.name,
                row.total(Line::First),
                row.total(Line::Second),
                row.on_treatment()
            );
        }
    }

    Ok(())
}
