//! Unit tests for lot-regimen.

#[cfg(test)]
mod survival {
    use crate::SurvivalModel;

    #[test]
    fn scale_from_median() {
        // 24 / ln(2)^(1/1.3) ≈ 31.82
        let m = SurvivalModel::from_median(24.0, 1.3);
        let expected = 24.0 / std::f64::consts::LN_2.powf(1.0 / 1.3);
        assert!((m.scale - expected).abs() < 1e-12);
        assert!((m.scale - 31.82).abs() < 0.01, "got {}", m.scale);
        assert_eq!(m.shape, 1.3);
    }

    #[test]
    fn survival_at_median_is_half() {
        let m = SurvivalModel::from_median(24.0, 1.3);
        assert!((m.survival_prob(24.0) - 0.5).abs() < 1e-12);
        assert!((m.median() - 24.0).abs() < 1e-9);
    }

    #[test]
    fn survival_at_zero_and_before() {
        let m = SurvivalModel::from_median(16.0, 1.3);
        assert_eq!(m.survival_prob(0.0), 1.0);
        assert_eq!(m.survival_prob(-3.0), 1.0);
    }

    #[test]
    fn first_month_transition_matches_weibull() {
        let m = SurvivalModel::from_median(24.0, 1.3);
        let expected = 1.0 - (-(1.0 / m.scale).powf(1.3)).exp();
        let p = m.monthly_transition_prob(0.0, 1.0);
        assert!(p > 0.0);
        assert!((p - expected).abs() < 1e-15);
    }

    #[test]
    fn transition_is_conditional_on_survival() {
        let m = SurvivalModel::from_median(12.0, 1.3);
        let t = 10.0;
        let expected = 1.0 - m.survival_prob(11.0) / m.survival_prob(10.0);
        assert!((m.monthly_transition_prob(t, 1.0) - expected).abs() < 1e-15);
        // Shape > 1 ⇒ increasing hazard.
        assert!(m.monthly_transition_prob(20.0, 1.0) > m.monthly_transition_prob(2.0, 1.0));
    }

    #[test]
    fn exhausted_pool_forces_transition() {
        let m = SurvivalModel::from_median(1.0, 3.0);
        assert_eq!(m.survival_prob(1_000.0), 0.0);
        assert_eq!(m.monthly_transition_prob(1_000.0, 1.0), 1.0);
    }

    #[test]
    fn non_positive_median_is_degenerate() {
        for median in [0.0, -5.0, f64::NAN] {
            let m = SurvivalModel::from_median(median, 1.3);
            assert!(m.is_degenerate());
            assert_eq!(m.scale, 0.1);
            assert_eq!(m.shape, 1.0);
            // Fast decay, but still a finite, valid probability.
            let p = m.monthly_transition_prob(0.0, 1.0);
            assert!(p > 0.999 && p <= 1.0);
        }
    }

    #[test]
    fn hazard_rate_is_zero_at_origin() {
        let m = SurvivalModel::from_median(24.0, 1.3);
        assert_eq!(m.hazard_rate(0.0), 0.0);
        assert!(m.hazard_rate(12.0) > 0.0);
    }

    #[test]
    fn discrete_residence_sums_survivors() {
        let m = SurvivalModel::from_median(24.0, 1.3);
        let direct: f64 = (1..=3).map(|n| m.survival_prob(n as f64)).sum();
        assert!((m.discrete_residence(3) - direct).abs() < 1e-12);
        assert_eq!(m.discrete_residence(0), 0.0);
    }
}

#[cfg(test)]
mod adoption {
    use lot_core::{Eligibility, Line, YearMonth};

    use crate::{AdoptionEngine, AdoptionParams, Regimen, RegimenCatalog};

    fn reg(name: &str, line: Line, elig: Eligibility, approval: f64, peak: f64) -> Regimen {
        Regimen::new(name, line, elig, approval, 20.0, 1.3).with_adoption(AdoptionParams {
            peak_share:   peak,
            speed:        1.0,
            time_to_peak: 2.0,
        })
    }

    fn june_2020() -> YearMonth {
        YearMonth::new(2020, 6).unwrap()
    }

    #[test]
    fn logistic_score_five_years_after_approval() {
        let p = AdoptionParams { peak_share: 0.6, speed: 1.0, time_to_peak: 2.0 };
        let expected = 0.6 / (1.0 + (-3.0f64).exp());
        assert!((p.score(5.0) - expected).abs() < 1e-12);
        assert!((p.score(5.0) - 0.572).abs() < 1e-3);
        assert_eq!(p.score(-0.1), 0.0);
    }

    #[test]
    fn two_candidates_normalised() {
        let now = june_2020().year_fraction();
        let catalog = RegimenCatalog::new(vec![
            reg("A", Line::Second, Eligibility::Both, now - 5.0, 0.6),
            reg("B", Line::Second, Eligibility::Both, now - 1.0, 0.4),
        ])
        .unwrap();
        let shares = AdoptionEngine::new(&catalog)
            .get_market_share(june_2020(), Line::Second, Eligibility::Both);

        let a = 0.6 / (1.0 + (-3.0f64).exp());
        let b = 0.4 / (1.0 + 1.0f64.exp());
        assert_eq!(shares.len(), 2);
        assert!((shares["A"] - a / (a + b)).abs() < 1e-12);
        assert!((shares["B"] - b / (a + b)).abs() < 1e-12);
        assert!((shares.values().sum::<f64>() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn eligibility_filter() {
        let catalog = RegimenCatalog::new(vec![
            reg("te_only", Line::First, Eligibility::Te, 2000.0, 0.5),
            reg("ti_only", Line::First, Eligibility::Ti, 2000.0, 0.5),
            reg("both",    Line::First, Eligibility::Both, 2000.0, 0.5),
        ])
        .unwrap();
        let engine = AdoptionEngine::new(&catalog);

        let te = engine.get_market_share(june_2020(), Line::First, Eligibility::Te);
        assert_eq!(te.keys().copied().collect::<Vec<_>>(), vec!["both", "te_only"]);

        let both = engine.get_market_share(june_2020(), Line::First, Eligibility::Both);
        assert_eq!(both.keys().copied().collect::<Vec<_>>(), vec!["both"]);
        assert!((both["both"] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn fourth_line_request_matches_fourth_plus_regimens() {
        let catalog = RegimenCatalog::new(vec![
            reg("bispecific", "4L+".parse().unwrap(), Eligibility::Both, 2015.0, 0.5),
        ])
        .unwrap();
        let requested: Line = "4L".parse().unwrap();
        let shares = AdoptionEngine::new(&catalog)
            .get_market_share(june_2020(), requested, Eligibility::Both);
        assert_eq!(shares.len(), 1);
    }

    #[test]
    fn all_pre_approval_falls_back_to_equal_split() {
        let catalog = RegimenCatalog::new(vec![
            reg("X", Line::Third, Eligibility::Both, 2030.0, 0.5),
            reg("Y", Line::Third, Eligibility::Both, 2031.0, 0.5),
            reg("Z", Line::Third, Eligibility::Both, 2032.0, 0.5),
        ])
        .unwrap();
        let shares = AdoptionEngine::new(&catalog)
            .get_market_share(june_2020(), Line::Third, Eligibility::Both);
        assert_eq!(shares.len(), 3);
        for s in shares.values() {
            assert!((s - 1.0 / 3.0).abs() < 1e-12);
        }
    }

    #[test]
    fn pre_approval_candidate_gets_zero_share() {
        let catalog = RegimenCatalog::new(vec![
            reg("old", Line::Second, Eligibility::Both, 2010.0, 0.5),
            reg("new", Line::Second, Eligibility::Both, 2025.0, 0.5),
        ])
        .unwrap();
        let shares = AdoptionEngine::new(&catalog)
            .get_market_share(june_2020(), Line::Second, Eligibility::Both);
        assert_eq!(shares["new"], 0.0);
        assert!((shares["old"] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn no_candidates_yields_empty_split() {
        let catalog = RegimenCatalog::new(vec![
            reg("A", Line::First, Eligibility::Both, 2000.0, 0.5),
        ])
        .unwrap();
        let shares = AdoptionEngine::new(&catalog)
            .get_market_share(june_2020(), Line::Third, Eligibility::Both);
        assert!(shares.is_empty());
    }

    #[test]
    fn shares_always_sum_to_one_over_time() {
        let catalog = RegimenCatalog::new(vec![
            reg("A", Line::First, Eligibility::Both, 2005.0, 0.7),
            reg("B", Line::First, Eligibility::Te,   2012.3, 0.3),
            reg("C", Line::First, Eligibility::Ti,   2018.9, 0.9),
            reg("D", Line::First, Eligibility::Both, 2021.0, 0.05),
        ])
        .unwrap();
        let engine = AdoptionEngine::new(&catalog);
        let start = YearMonth::new(2000, 1).unwrap();
        for date in start.range_inclusive(YearMonth::new(2030, 12).unwrap()) {
            for elig in [Eligibility::Te, Eligibility::Ti, Eligibility::Both] {
                let shares = engine.get_market_share(date, Line::First, elig);
                assert!(!shares.is_empty());
                let total: f64 = shares.values().sum();
                assert!((total - 1.0).abs() < 1e-9, "{date} {elig}: {total}");
            }
        }
    }
}

#[cfg(test)]
mod catalog {
    use lot_core::{Eligibility, Line, RegimenId};

    use crate::{AdoptionParams, Regimen, RegimenCatalog, RegimenError};

    #[test]
    fn lookup_by_name_and_id() {
        let catalog = RegimenCatalog::new(vec![
            Regimen::new("VRd", Line::First, Eligibility::Both, 2010.0, 41.0, 1.3),
            Regimen::new("Kd",  Line::Second, Eligibility::Both, 2016.0, 18.0, 1.3),
        ])
        .unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.id_of("Kd"), Some(RegimenId(1)));
        assert_eq!(catalog.get(RegimenId(0)).unwrap().name, "VRd");
        assert!(catalog.id_of("missing").is_none());
        assert!(catalog.get(RegimenId(9)).is_none());
        assert_eq!(catalog.for_line(Line::Second).count(), 1);
    }

    #[test]
    fn duplicate_names_rejected() {
        let result = RegimenCatalog::new(vec![
            Regimen::new("VRd", Line::First, Eligibility::Both, 2010.0, 41.0, 1.3),
            Regimen::new("VRd", Line::Second, Eligibility::Both, 2010.0, 41.0, 1.3),
        ]);
        assert!(matches!(result, Err(RegimenError::DuplicateName(n)) if n == "VRd"));
    }

    #[test]
    fn out_of_range_peak_share_rejected() {
        let r = Regimen::new("VRd", Line::First, Eligibility::Both, 2010.0, 41.0, 1.3)
            .with_adoption(AdoptionParams { peak_share: -0.5, ..Default::default() });
        let result = RegimenCatalog::new(vec![r]);
        assert!(matches!(result, Err(RegimenError::InvalidParameter { regimen, .. }) if regimen == "VRd"));
    }

    #[test]
    fn boundary_peak_shares_accepted() {
        let catalog = RegimenCatalog::new(vec![
            Regimen::new("A", Line::First, Eligibility::Both, 2010.0, 41.0, 1.3)
                .with_adoption(AdoptionParams { peak_share: 0.0, ..Default::default() }),
            Regimen::new("B", Line::First, Eligibility::Both, 2010.0, 41.0, 1.3)
                .with_adoption(AdoptionParams { peak_share: 1.0, ..Default::default() }),
        ]);
        assert!(catalog.is_ok());
    }
}

#[cfg(test)]
mod loader {
    use std::io::Cursor;

    use lot_core::{Eligibility, Line};

    use crate::{load_catalog_reader, RegimenError};

    const CSV: &str = "\
name,line,eligibility,approval_year,pfs_median,peak_share,speed,time_to_peak,hazard_ratio,citation
VRd,1L,Both,2010,41,0.6,1.0,2.0,,SWOG S0777
Dara-VRd,1l,TE,2019.5,,0.5,1.5,1.5,0.42,PERSEUS
Teclistamab,4L_PLUS,,2022.8,11.3,,,,,MajesTEC-1
";

    #[test]
    fn parses_rows_with_defaults() {
        let catalog = load_catalog_reader(Cursor::new(CSV), 1.3).unwrap();
        assert_eq!(catalog.len(), 3);

        let vrd = catalog.get(catalog.id_of("VRd").unwrap()).unwrap();
        assert_eq!(vrd.line, Line::First);
        assert_eq!(vrd.adoption.peak_share, 0.6);
        assert!(vrd.hazard_ratio.is_none());
        assert_eq!(vrd.citation, "SWOG S0777");
        assert!((vrd.survival.median() - 41.0).abs() < 1e-9);

        let dara = catalog.get(catalog.id_of("Dara-VRd").unwrap()).unwrap();
        assert_eq!(dara.eligibility, Eligibility::Te);
        assert_eq!(dara.hazard_ratio, Some(0.42));
        assert!(dara.survival.is_degenerate());

        let tec = catalog.get(catalog.id_of("Teclistamab").unwrap()).unwrap();
        assert_eq!(tec.line, Line::FourthPlus);
        assert_eq!(tec.eligibility, Eligibility::Both);
        assert_eq!(tec.adoption.speed, 1.0);
        assert_eq!(tec.adoption.time_to_peak, 2.0);
    }

    #[test]
    fn minimal_columns_accepted() {
        let csv = "name,line,approval_year\nA,2L,2015\n";
        let catalog = load_catalog_reader(Cursor::new(csv), 1.3).unwrap();
        let a = catalog.get(catalog.id_of("A").unwrap()).unwrap();
        assert_eq!(a.adoption.peak_share, 0.5);
        assert!(a.survival.is_degenerate());
    }

    #[test]
    fn bad_line_is_error() {
        let csv = "name,line,approval_year\nA,9L,2015\n";
        assert!(load_catalog_reader(Cursor::new(csv), 1.3).is_err());
    }

    fn rejects(csv: &str) -> bool {
        matches!(
            load_catalog_reader(Cursor::new(csv), 1.3),
            Err(RegimenError::InvalidParameter { .. })
        )
    }

    #[test]
    fn peak_share_outside_unit_interval_rejected() {
        assert!(rejects("name,line,approval_year,peak_share\nA,1L,2015,-0.2\n"));
        assert!(rejects("name,line,approval_year,peak_share\nA,1L,2015,1.5\n"));
        assert!(rejects("name,line,approval_year,peak_share\nA,1L,2015,NaN\n"));
    }

    #[test]
    fn non_finite_approval_year_rejected() {
        assert!(rejects("name,line,approval_year\nA,1L,NaN\n"));
        assert!(rejects("name,line,approval_year\nA,1L,inf\n"));
    }

    #[test]
    fn non_finite_diffusion_parameters_rejected() {
        assert!(rejects("name,line,approval_year,speed\nA,1L,2015,inf\n"));
        assert!(rejects("name,line,approval_year,time_to_peak\nA,1L,2015,NaN\n"));
    }

    #[test]
    fn missing_required_column_is_error() {
        let csv = "name,line\nA,2L\n";
        assert!(load_catalog_reader(Cursor::new(csv), 1.3).is_err());
    }
}
