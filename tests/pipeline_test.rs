#[cfg(test)]
mod tests {
    use datasus_dm::classify::DatasetKind;
    use datasus_dm::config::{ProviderConfig, StudyConfig};
    use datasus_dm::error::Result;
    use datasus_dm::export::Cell;
    use datasus_dm::models::case::Sex;
    use datasus_dm::models::raw::{MortalityRaw, MorbidityRaw, YearBatch};
    use datasus_dm::source::RecordSource;
    use datasus_dm::study::{run_comparison, run_full, run_morbidity, run_mortality};

    fn default_config() -> StudyConfig {
        StudyConfig {
            provider: ProviderConfig::Synthetic { seed: 42 },
            ..Default::default()
        }
    }

    #[test]
    fn test_full_run_invariants() {
        let config = default_config();
        let study = run_full(&config).unwrap();

        // Age and diagnosis invariants over every accepted case
        for case in &study.mortality.cases {
            assert!(case.age_years <= 14);
            assert!(
                ["E10", "E11", "E12", "E13", "E14"]
                    .iter()
                    .any(|prefix| case.diagnosis_code.starts_with(prefix))
            );
        }
        for case in &study.morbidity.cases {
            assert!(case.age_years <= 14);
            assert!(
                case.diagnosis_code.starts_with("E10") || case.diagnosis_code.starts_with("E11")
            );
        }

        // Count conservation per pipeline
        let mortality = &study.mortality.filter_report;
        assert_eq!(mortality.accepted + mortality.rejected, mortality.input);
        let morbidity = &study.morbidity.filter_report;
        assert_eq!(morbidity.accepted + morbidity.rejected, morbidity.input);

        // The synthetic source yields records for every requested year
        assert!(study.mortality.acquisition.failed_years.is_empty());
        assert!(!study.mortality.acquisition.used_fallback);
    }

    #[test]
    fn test_comparison_years_are_the_intersection() {
        let config = default_config();
        let study = run_full(&config).unwrap();

        let mortality_years: Vec<i32> = study.mortality.year_counts.keys().copied().collect();
        let morbidity_years: Vec<i32> = study.morbidity.year_counts.keys().copied().collect();
        let expected: Vec<i32> = mortality_years
            .iter()
            .copied()
            .filter(|year| morbidity_years.contains(year))
            .collect();

        let comparison_years: Vec<i32> =
            study.comparison.rows.iter().map(|row| row.year).collect();
        assert_eq!(comparison_years, expected);

        // Default config: mortality 2010-2023, morbidity 2020-2025, and the
        // synthetic source produces cases every year
        assert_eq!(comparison_years, vec![2020, 2021, 2022, 2023]);

        for row in &study.comparison.rows {
            assert_eq!(
                row.mortality_count,
                study.mortality.year_counts[&row.year]
            );
            assert_eq!(
                row.morbidity_count,
                study.morbidity.year_counts[&row.year]
            );
        }
    }

    #[test]
    fn test_export_table_sets() {
        let config = default_config();
        let study = run_full(&config).unwrap();

        let mortality_names: Vec<&str> =
            study.mortality.tables.iter().map(|table| table.name).collect();
        assert_eq!(
            mortality_names,
            vec![
                "cases",
                "cases_by_year",
                "cases_by_sex",
                "cases_by_age_band",
                "summary"
            ]
        );

        let morbidity_names: Vec<&str> =
            study.morbidity.tables.iter().map(|table| table.name).collect();
        assert_eq!(
            morbidity_names,
            vec![
                "cases",
                "yearly_aggregate",
                "cases_by_type_per_year",
                "cases_by_sex_per_year",
                "yearly_length_of_stay",
                "yearly_cost",
                "summary"
            ]
        );

        assert_eq!(study.comparison.table.name, "mortality_vs_morbidity");

        // The row-per-case tables carry one row per accepted case
        assert_eq!(
            study.mortality.tables[0].rows.len(),
            study.mortality.cases.len()
        );
        assert_eq!(
            study.morbidity.tables[0].rows.len(),
            study.morbidity.cases.len()
        );
    }

    #[test]
    fn test_same_seed_reproduces_the_study() {
        let config = default_config();
        let first = run_full(&config).unwrap();
        let second = run_full(&config).unwrap();

        assert_eq!(first.mortality.year_counts, second.mortality.year_counts);
        assert_eq!(first.morbidity.year_counts, second.morbidity.year_counts);
        assert_eq!(first.comparison.table, second.comparison.table);
        assert_eq!(first.morbidity.tables, second.morbidity.tables);
    }

    #[test]
    fn test_invalid_config_is_a_contract_error() {
        let mut config = default_config();
        config.mortality_start_year = 2024;
        config.mortality_end_year = 2010;

        assert!(run_full(&config).is_err());
    }

    /// Fixed-batch source replaying the documented filtering scenario
    #[derive(Debug)]
    struct ScenarioSource;

    impl RecordSource for ScenarioSource {
        fn name(&self) -> &'static str {
            "scenario"
        }

        fn mortality_year(&self, year: i32, _region: &str) -> Result<YearBatch<MortalityRaw>> {
            let record = |age_days: i64, sex: &str, cause: &str| MortalityRaw {
                age_days: Some(age_days),
                sex_code: Some(sex.to_string()),
                cause_code: Some(cause.to_string()),
                year,
                ..Default::default()
            };

            Ok(YearBatch::new(
                year,
                vec![
                    record(400, "1", "E109"),
                    record(6000, "2", "E10"),
                    record(300, "1", "J10"),
                ],
            ))
        }

        fn morbidity_year(&self, year: i32, _region: &str) -> Result<YearBatch<MorbidityRaw>> {
            let record = |diagnosis: &str| MorbidityRaw {
                age_years: Some(8),
                sex_code: Some("1".to_string()),
                principal_diagnosis: Some(diagnosis.to_string()),
                stay_days: Some(5),
                total_cost: Some(1000.0),
                year,
                ..Default::default()
            };

            Ok(YearBatch::new(
                year,
                vec![record("E100"), record("E100"), record("E100"), record("E110")],
            ))
        }
    }

    #[test]
    fn test_documented_mortality_scenario() {
        let config = StudyConfig {
            mortality_start_year: 2020,
            mortality_end_year: 2020,
            ..default_config()
        };

        let study = run_mortality(&config, &ScenarioSource).unwrap();

        // Of the three records only the 400-day E109 one survives: the
        // 6000-day record exceeds the raw age bound and J10 is not a
        // diabetes code
        assert_eq!(study.cases.len(), 1);
        let case = &study.cases[0];
        assert_eq!(case.age_years, 1);
        assert_eq!(case.sex, Sex::Male);
        assert_eq!(case.year, 2020);

        assert_eq!(study.year_counts.len(), 1);
        assert_eq!(study.year_counts[&2020], 1);

        assert_eq!(study.filter_report.dataset, DatasetKind::Mortality);
        assert_eq!(study.filter_report.input, 3);
        assert_eq!(study.filter_report.rejected, 2);
    }

    #[test]
    fn test_documented_type_pivot_scenario() {
        let config = StudyConfig {
            morbidity_start_year: 2021,
            morbidity_end_year: 2021,
            ..default_config()
        };

        let study = run_morbidity(&config, &ScenarioSource).unwrap();

        let pivot = study
            .tables
            .iter()
            .find(|table| table.name == "cases_by_type_per_year")
            .unwrap();
        assert_eq!(pivot.columns, vec!["year", "type1", "type2"]);
        assert_eq!(
            pivot.rows[0],
            vec![Cell::Int(2021), Cell::Int(3), Cell::Int(1)]
        );
    }

    #[test]
    fn test_empty_intersection_skips_comparison() {
        let mortality_config = StudyConfig {
            mortality_start_year: 2010,
            mortality_end_year: 2012,
            ..default_config()
        };
        let morbidity_config = StudyConfig {
            morbidity_start_year: 2020,
            morbidity_end_year: 2021,
            ..default_config()
        };

        let source = mortality_config.build_source();
        let mortality = run_mortality(&mortality_config, source.as_ref()).unwrap();
        let morbidity = run_morbidity(&morbidity_config, source.as_ref()).unwrap();

        let comparison = run_comparison(&mortality, &morbidity);
        assert!(comparison.rows.is_empty());
        assert!(comparison.table.is_empty());
    }
}
