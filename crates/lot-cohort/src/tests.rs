//! Unit tests for lot-cohort.

use lot_core::{
    AttritionConfig, Eligibility, Line, ModelConfig, MortalityConfig, RegimenId, UptakeConfig,
    YearMonth,
};
use lot_regimen::{Regimen, RegimenCatalog};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn ym(y: i32, m: u8) -> YearMonth {
    YearMonth::new(y, m).unwrap()
}

fn test_config(mortality: f64) -> ModelConfig {
    ModelConfig::new(
        UptakeConfig { treated_fraction: 1.0, dx_to_1l_delay_months: 0 },
        AttritionConfig {
            p_reach_2l:          0.5,
            p_reach_3l_given_2l: 0.5,
            p_reach_4l_given_3l: None,
        },
        MortalityConfig {
            monthly_death_hazard_1l:      mortality,
            monthly_death_hazard_2l:      mortality,
            monthly_death_hazard_3l_plus: mortality,
            monthly_death_hazard_4l_plus: None,
        },
    )
}

fn catalog() -> RegimenCatalog {
    RegimenCatalog::new(vec![
        Regimen::new("VRd", Line::First, Eligibility::Both, 2010.0, 24.0, 1.3),
        Regimen::new("Kd",  Line::Second, Eligibility::Both, 2016.0, 6.0, 1.3),
        Regimen::new("Unknown-PFS", Line::Third, Eligibility::Both, 2016.0, 0.0, 1.3),
    ])
    .unwrap()
}

// ── Competing risks ───────────────────────────────────────────────────────────

#[cfg(test)]
mod competing {
    use crate::competing_probabilities;

    #[test]
    fn untouched_when_sum_below_one() {
        assert_eq!(competing_probabilities(0.3, 0.2), (0.3, 0.2));
    }

    #[test]
    fn rescaled_to_exactly_one_preserving_ratio() {
        let (p, d) = competing_probabilities(0.9, 0.3);
        assert!((p + d - 1.0).abs() < 1e-15);
        assert!((p / d - 3.0).abs() < 1e-12);
    }

    #[test]
    fn never_exceeds_one() {
        for i in 0..=20 {
            for j in 0..=20 {
                let (p, d) = competing_probabilities(i as f64 / 20.0, j as f64 / 20.0);
                assert!(p + d <= 1.0 + 1e-15);
                assert!(p >= 0.0 && d >= 0.0);
            }
        }
    }
}

// ── Cohort update ─────────────────────────────────────────────────────────────

#[cfg(test)]
mod cohort_update {
    use lot_core::CohortId;

    use super::*;
    use crate::Cohort;

    fn cohort(size: f64) -> Cohort {
        Cohort::new(CohortId(0), ym(2020, 1), Line::First, Eligibility::Te, RegimenId(0), size)
    }

    #[test]
    fn first_month_uses_age_zero() {
        let cat = catalog();
        let vrd = cat.get(RegimenId(0)).unwrap();
        let mut c = cohort(1_000.0);
        let out = c.update(ym(2020, 1), vrd, 0.0, 1e-4);

        let p = vrd.survival.monthly_transition_prob(0.0, 1.0);
        assert!((out.progressed - 1_000.0 * p).abs() < 1e-9);
        assert_eq!(out.died, 0.0);
        assert!((c.size - 1_000.0 * (1.0 - p)).abs() < 1e-9);
        assert_eq!(c.initial_size, 1_000.0);
    }

    #[test]
    fn age_counts_whole_months() {
        let c = cohort(1.0);
        assert_eq!(c.age_months(ym(2020, 1)), 0);
        assert_eq!(c.age_months(ym(2021, 3)), 14);
        assert_eq!(c.age_months(ym(2019, 6)), 0);
    }

    #[test]
    fn size_never_negative_nor_increasing() {
        let cat = catalog();
        let kd = cat.get(RegimenId(1)).unwrap();
        let mut c = cohort(500.0);
        let mut prev = c.size;
        for now in ym(2020, 1).range_inclusive(ym(2030, 1)) {
            let out = c.update(now, kd, 0.2, 1e-4);
            assert!(c.size >= 0.0);
            assert!(c.size <= prev);
            assert!(out.progressed >= 0.0 && out.died >= 0.0);
            prev = c.size;
        }
    }

    #[test]
    fn degenerate_regimen_with_mortality_is_rescaled() {
        let cat = catalog();
        let degenerate = cat.get(RegimenId(2)).unwrap();
        assert!(degenerate.survival.is_degenerate());

        let mut c = cohort(100.0);
        let out = c.update(ym(2020, 1), degenerate, 0.5, 1e-4);
        let p_raw = degenerate.survival.monthly_transition_prob(0.0, 1.0);

        // p_raw + 0.5 > 1 ⇒ whole cohort leaves, split in the raw ratio.
        assert!((out.progressed + out.died - 100.0).abs() < 1e-9);
        assert!((out.progressed / out.died - p_raw / 0.5).abs() < 1e-9);
        assert!(c.size < 1e-9);
    }

    #[test]
    fn negligible_cohort_is_noop() {
        let cat = catalog();
        let vrd = cat.get(RegimenId(0)).unwrap();
        let mut c = cohort(5e-5);
        let out = c.update(ym(2020, 6), vrd, 0.1, 1e-4);
        assert_eq!(out.progressed, 0.0);
        assert_eq!(out.died, 0.0);
        assert_eq!(c.size, 5e-5);
    }

    #[test]
    fn label_encodes_identity() {
        let cat = catalog();
        assert_eq!(cohort(1.0).label(&cat), "2020-01_1L_TE_VRd");
    }
}

// ── Engine ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod engine {
    use lot_core::CohortId;
    use lot_regimen::{AdoptionEngine, ShareSplit};

    use super::*;
    use crate::CohortEngine;

    #[test]
    fn spawn_skips_negligible_sizes() {
        let mut engine = CohortEngine::new(1e-4);
        assert!(engine.spawn(ym(2020, 1), Line::First, Eligibility::Te, RegimenId(0), 1e-4).is_none());
        assert!(engine.spawn(ym(2020, 1), Line::First, Eligibility::Te, RegimenId(0), 0.0).is_none());
        assert!(engine.spawn(ym(2020, 1), Line::First, Eligibility::Te, RegimenId(0), f64::NAN).is_none());
        assert!(engine.spawn(ym(2020, 1), Line::First, Eligibility::Te, RegimenId(0), 2e-4).is_some());
        assert_eq!(engine.len(), 1);
    }

    #[test]
    fn ids_are_serial() {
        let mut engine = CohortEngine::new(1e-4);
        let a = engine.spawn(ym(2020, 1), Line::First, Eligibility::Te, RegimenId(0), 1.0).unwrap();
        let b = engine.spawn(ym(2020, 1), Line::First, Eligibility::Ti, RegimenId(0), 1.0).unwrap();
        assert!(a < b);
        assert_eq!(engine.spawned_total(), 2);
    }

    #[test]
    fn id_space_exhaustion_refuses_spawn() {
        let mut engine = CohortEngine::new(1e-4).with_next_id(u32::MAX - 1);
        let last = engine.spawn(ym(2020, 1), Line::First, Eligibility::Te, RegimenId(0), 5.0);
        assert_eq!(last, Some(CohortId(u32::MAX - 1)));
        assert!(engine.spawn(ym(2020, 1), Line::First, Eligibility::Te, RegimenId(0), 5.0).is_none());
        assert_eq!(engine.len(), 1);
        assert_eq!(engine.spawned_total(), u32::MAX);
    }

    #[test]
    fn spawn_allocated_skips_unknown_regimens() {
        let cat = catalog();
        let mut split = ShareSplit::new();
        split.insert("VRd", 0.7);
        split.insert("Ghost", 0.3);

        let mut engine = CohortEngine::new(1e-4);
        let n = engine.spawn_allocated(ym(2020, 1), Line::First, Eligibility::Te, 100.0, &split, &cat);
        assert_eq!(n, 1);
        assert!((engine.cohorts()[0].size - 70.0).abs() < 1e-12);
    }

    #[test]
    fn spawn_allocated_from_adoption_engine() {
        let cat = catalog();
        let split = AdoptionEngine::new(&cat).get_market_share(ym(2020, 1), Line::Second, Eligibility::Both);
        let mut engine = CohortEngine::new(1e-4);
        let n = engine.spawn_allocated(ym(2020, 1), Line::Second, Eligibility::Both, 40.0, &split, &cat);
        assert_eq!(n, 1);
        assert_eq!(engine.cohorts()[0].regimen, RegimenId(1));
        assert!((engine.cohorts()[0].size - 40.0).abs() < 1e-12);
    }

    #[test]
    fn step_totals_line_equals_sum_of_regimens() {
        let cat = catalog();
        let cfg = test_config(0.01);
        let mut engine = CohortEngine::new(1e-4);
        engine.spawn(ym(2020, 1), Line::First, Eligibility::Te, RegimenId(0), 400.0);
        engine.spawn(ym(2020, 1), Line::First, Eligibility::Ti, RegimenId(0), 600.0);
        engine.spawn(ym(2020, 1), Line::Second, Eligibility::Both, RegimenId(1), 50.0);

        let totals = engine.step(ym(2020, 2), &cat, &cfg);
        let first = totals.stock[&(Line::First, RegimenId(0))];
        assert!((totals.line_stock(Line::First) - first).abs() < 1e-12);

        let remaining: f64 = engine.cohorts().iter().map(|c| c.size).sum();
        let outflow: f64 = totals.progressed.iter().sum::<f64>() + totals.died.iter().sum::<f64>();
        assert!((remaining + outflow - 1_050.0).abs() < 1e-9);
        assert!((totals.died(Line::First) - 10.0).abs() < 1e-9);
        assert!(totals.progressed(Line::Second) > 0.0);
    }

    #[test]
    fn update_order_does_not_change_results() {
        let cat = catalog();
        let cfg = test_config(0.02);
        let specs = [
            (ym(2019, 3), Line::First,  Eligibility::Te,   RegimenId(0), 120.0),
            (ym(2019, 9), Line::First,  Eligibility::Ti,   RegimenId(0), 80.0),
            (ym(2020, 1), Line::Second, Eligibility::Both, RegimenId(1), 33.0),
            (ym(2020, 2), Line::Third,  Eligibility::Both, RegimenId(2), 7.0),
        ];

        let mut forward = CohortEngine::new(1e-4);
        for &(e, l, el, r, s) in &specs {
            forward.spawn(e, l, el, r, s);
        }
        let mut reverse = CohortEngine::new(1e-4);
        for &(e, l, el, r, s) in specs.iter().rev() {
            reverse.spawn(e, l, el, r, s);
        }

        let mut last = None;
        for now in ym(2020, 3).range_inclusive(ym(2021, 3)) {
            last = Some((forward.step(now, &cat, &cfg), reverse.step(now, &cat, &cfg)));
        }
        let (tf, tr) = last.unwrap();

        for c in forward.cohorts() {
            let twin = reverse
                .cohorts()
                .iter()
                .find(|o| o.entry == c.entry && o.line == c.line && o.eligibility == c.eligibility)
                .unwrap();
            assert_eq!(c.size, twin.size);
        }
        for line in Line::ALL {
            assert!((tf.line_stock(line) - tr.line_stock(line)).abs() < 1e-9);
            assert!((tf.progressed(line) - tr.progressed(line)).abs() < 1e-9);
        }
    }

    #[test]
    fn prune_removes_only_negligible_and_keeps_totals() {
        let cat = catalog();
        let cfg = test_config(0.0);
        let mut engine = CohortEngine::new(1e-4);
        // Degenerate regimen: gone after a couple of months.
        engine.spawn(ym(2020, 1), Line::Third, Eligibility::Both, RegimenId(2), 1.0);
        engine.spawn(ym(2020, 1), Line::First, Eligibility::Te, RegimenId(0), 100.0);

        for now in ym(2020, 1).range_inclusive(ym(2020, 4)) {
            engine.step(now, &cat, &cfg);
        }
        let mut unpruned = engine.clone();

        assert_eq!(engine.prune(), 1);
        assert_eq!(engine.len(), 1);
        assert_eq!(engine.cohorts()[0].line, Line::First);

        let a = engine.step(ym(2020, 5), &cat, &cfg);
        let b = unpruned.step(ym(2020, 5), &cat, &cfg);
        assert_eq!(a, b);
    }
}
