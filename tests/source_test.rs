#[cfg(test)]
mod tests {
    use std::path::Path;

    use datasus_dm::error::{Result, StudyError};
    use datasus_dm::models::raw::{MortalityRaw, MorbidityRaw, YearBatch};
    use datasus_dm::source::synthetic::SyntheticSource;
    use datasus_dm::source::{RecordSource, acquire_morbidity, acquire_mortality};

    /// A source whose fetches always fail, to exercise the fallback path
    #[derive(Debug)]
    struct FailingSource;

    impl RecordSource for FailingSource {
        fn name(&self) -> &'static str {
            "failing"
        }

        fn mortality_year(&self, year: i32, _region: &str) -> Result<YearBatch<MortalityRaw>> {
            Err(StudyError::parquet(
                Path::new("missing"),
                format!("no extract for {year}"),
            ))
        }

        fn morbidity_year(&self, year: i32, _region: &str) -> Result<YearBatch<MorbidityRaw>> {
            Err(StudyError::parquet(
                Path::new("missing"),
                format!("no extract for {year}"),
            ))
        }
    }

    /// A source that fails for odd years only
    #[derive(Debug)]
    struct FlakySource {
        inner: SyntheticSource,
    }

    impl RecordSource for FlakySource {
        fn name(&self) -> &'static str {
            "flaky"
        }

        fn mortality_year(&self, year: i32, region: &str) -> Result<YearBatch<MortalityRaw>> {
            if year % 2 == 1 {
                return Err(StudyError::parquet(Path::new("missing"), "transient"));
            }
            self.inner.mortality_year(year, region)
        }

        fn morbidity_year(&self, year: i32, region: &str) -> Result<YearBatch<MorbidityRaw>> {
            self.inner.morbidity_year(year, region)
        }
    }

    #[test]
    fn test_synthetic_is_deterministic() {
        let first = SyntheticSource::with_seed(42);
        let second = SyntheticSource::with_seed(42);

        let batch_a = first.mortality_year(2020, "AM").unwrap();
        let batch_b = second.mortality_year(2020, "AM").unwrap();

        assert_eq!(batch_a.records.len(), batch_b.records.len());
        for (a, b) in batch_a.records.iter().zip(&batch_b.records) {
            assert_eq!(a.age_days, b.age_days);
            assert_eq!(a.cause_code, b.cause_code);
            assert_eq!(a.sex_code, b.sex_code);
            assert_eq!(a.death_date, b.death_date);
        }
    }

    #[test]
    fn test_synthetic_is_independent_of_fetch_order() {
        let source = SyntheticSource::new();

        let late_first = source.morbidity_year(2023, "AM").unwrap();
        let _ = source.morbidity_year(2020, "AM").unwrap();
        let late_again = source.morbidity_year(2023, "AM").unwrap();

        assert_eq!(late_first.records.len(), late_again.records.len());
        for (a, b) in late_first.records.iter().zip(&late_again.records) {
            assert_eq!(a.principal_diagnosis, b.principal_diagnosis);
            assert_eq!(a.total_cost, b.total_cost);
        }
    }

    #[test]
    fn test_synthetic_volumes_and_values() {
        let source = SyntheticSource::new();

        for year in 2020..=2023 {
            let mortality = source.mortality_year(year, "AM").unwrap();
            assert!((1..=5).contains(&mortality.records.len()));
            for record in &mortality.records {
                let age = record.age_days.unwrap();
                assert!((365..5110).contains(&age));
                let cause = record.cause_code.as_deref().unwrap();
                assert!(cause.starts_with('E'));
            }

            let morbidity = source.morbidity_year(year, "AM").unwrap();
            assert!((50..=150).contains(&morbidity.records.len()));
            for record in &morbidity.records {
                let diagnosis = record.principal_diagnosis.as_deref().unwrap();
                assert!(diagnosis.starts_with("E10") || diagnosis.starts_with("E11"));
                assert!((0..=14).contains(&record.age_years.unwrap()));
                assert!(record.stay_days.unwrap() >= 1);
                assert!(record.total_cost.unwrap() >= 500.0);
            }
        }
    }

    #[test]
    fn test_acquisition_skips_failed_years() {
        let source = FlakySource {
            inner: SyntheticSource::new(),
        };

        let acquisition = acquire_mortality(&source, 2020, 2023, "AM");
        assert_eq!(acquisition.report.failed_years, vec![2021, 2023]);
        assert!(!acquisition.report.used_fallback);
        assert!(acquisition.report.records > 0);
        assert!(
            acquisition
                .batches
                .iter()
                .all(|batch| batch.year % 2 == 0)
        );
    }

    #[test]
    fn test_total_failure_falls_back_to_synthetic() {
        let acquisition = acquire_mortality(&FailingSource, 2020, 2022, "AM");
        assert!(acquisition.report.used_fallback);
        assert!(acquisition.report.records > 0);
        assert_eq!(acquisition.batches.len(), 3);

        let acquisition = acquire_morbidity(&FailingSource, 2020, 2022, "AM");
        assert!(acquisition.report.used_fallback);
        assert!(acquisition.report.records > 0);
    }

    #[test]
    fn test_fallback_is_reproducible() {
        let first = acquire_morbidity(&FailingSource, 2021, 2021, "AM");
        let second = acquire_morbidity(&FailingSource, 2021, 2021, "AM");

        let a = &first.batches[0].records;
        let b = &second.batches[0].records;
        assert_eq!(a.len(), b.len());
        for (left, right) in a.iter().zip(b) {
            assert_eq!(left.principal_diagnosis, right.principal_diagnosis);
            assert_eq!(left.total_cost, right.total_cost);
        }
    }
}
