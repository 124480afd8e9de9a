#[cfg(test)]
mod tests {
    use datasus_dm::aggregate::{
        Dimension, GroupSpec, KeyValue, Statistic, aggregate, year_counts,
    };
    use datasus_dm::models::case::{DiabetesType, MorbidityCase, Sex};

    fn case(year: i32, age: u8, sex: Sex, stay: i64, cost: f64) -> MorbidityCase {
        MorbidityCase {
            admission_date: None,
            discharge_date: None,
            age_years: age,
            sex,
            diagnosis_code: "E100".to_string(),
            diabetes_type: DiabetesType::Type1,
            municipality: None,
            length_of_stay_days: stay,
            cost,
            year,
        }
    }

    fn year_spec() -> GroupSpec<MorbidityCase> {
        GroupSpec::by(vec![Dimension::new("year", |c: &MorbidityCase| {
            KeyValue::Year(c.year)
        })])
    }

    #[test]
    fn test_single_dimension_counts() {
        let cases = vec![
            case(2020, 5, Sex::Male, 3, 100.0),
            case(2020, 7, Sex::Female, 4, 200.0),
            case(2021, 9, Sex::Male, 5, 300.0),
        ];

        let rows = aggregate(&cases, &year_spec());
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].key[0], KeyValue::Year(2020));
        assert_eq!(rows[0].count, 2);
        assert_eq!(rows[1].key[0], KeyValue::Year(2021));
        assert_eq!(rows[1].count, 1);
    }

    #[test]
    fn test_rows_are_sorted_by_key() {
        let cases = vec![
            case(2023, 5, Sex::Male, 1, 1.0),
            case(2019, 5, Sex::Male, 1, 1.0),
            case(2021, 5, Sex::Male, 1, 1.0),
        ];

        let rows = aggregate(&cases, &year_spec());
        let years: Vec<KeyValue> = rows.iter().map(|row| row.key[0]).collect();
        assert_eq!(
            years,
            vec![
                KeyValue::Year(2019),
                KeyValue::Year(2021),
                KeyValue::Year(2023)
            ]
        );
    }

    #[test]
    fn test_statistics_over_groups() {
        let cases = vec![
            case(2020, 4, Sex::Male, 2, 100.0),
            case(2020, 8, Sex::Male, 4, 200.0),
            case(2020, 12, Sex::Male, 6, 600.0),
        ];

        let spec = year_spec()
            .with_stat("mean_age", Statistic::Mean, |c: &MorbidityCase| {
                f64::from(c.age_years)
            })
            .with_stat("median_age", Statistic::Median, |c: &MorbidityCase| {
                f64::from(c.age_years)
            })
            .with_stat("total_stay", Statistic::Sum, |c: &MorbidityCase| {
                c.length_of_stay_days as f64
            })
            .with_stat("std_cost", Statistic::StdDev, |c: &MorbidityCase| c.cost);

        let rows = aggregate(&cases, &spec);
        assert_eq!(rows.len(), 1);

        let row = &rows[0];
        assert_eq!(row.count, 3);
        assert_eq!(row.stat("mean_age"), Some(8.0));
        assert_eq!(row.stat("median_age"), Some(8.0));
        assert_eq!(row.stat("total_stay"), Some(12.0));
        // Sample std-dev of 100, 200, 600 is ~264.58
        let std_cost = row.stat("std_cost").unwrap();
        assert!((std_cost - 264.575).abs() < 0.01);
    }

    #[test]
    fn test_multi_key_grouping() {
        let cases = vec![
            case(2020, 5, Sex::Male, 1, 1.0),
            case(2020, 6, Sex::Female, 1, 1.0),
            case(2020, 7, Sex::Male, 1, 1.0),
            case(2021, 8, Sex::Female, 1, 1.0),
        ];

        let spec = GroupSpec::by(vec![
            Dimension::new("year", |c: &MorbidityCase| KeyValue::Year(c.year)),
            Dimension::new("sex", |c: &MorbidityCase| KeyValue::Sex(c.sex)),
        ]);

        let rows = aggregate(&cases, &spec);
        assert_eq!(rows.len(), 3);

        let male_2020 = rows
            .iter()
            .find(|row| row.key[0] == KeyValue::Year(2020) && row.key[1] == KeyValue::Sex(Sex::Male))
            .unwrap();
        assert_eq!(male_2020.count, 2);
    }

    #[test]
    fn test_unknown_sex_forms_its_own_group() {
        let cases = vec![
            case(2020, 5, Sex::Male, 1, 1.0),
            case(2020, 6, Sex::Unknown, 1, 1.0),
        ];

        let spec = GroupSpec::by(vec![Dimension::new("sex", |c: &MorbidityCase| {
            KeyValue::Sex(c.sex)
        })]);

        let rows = aggregate(&cases, &spec);
        assert_eq!(rows.len(), 2);
        assert!(
            rows.iter()
                .any(|row| row.key[0] == KeyValue::Sex(Sex::Unknown) && row.count == 1)
        );
    }

    #[test]
    fn test_empty_input_emits_no_rows() {
        let rows = aggregate(&[], &year_spec());
        assert!(rows.is_empty());
    }

    #[test]
    fn test_total_consistency_with_year_grouping() {
        let cases: Vec<MorbidityCase> = (0..37)
            .map(|i| case(2020 + (i % 3), 5, Sex::Male, 1, 1.0))
            .collect();

        let rows = aggregate(&cases, &year_spec());
        let total: u64 = rows.iter().map(|row| row.count).sum();
        assert_eq!(total as usize, cases.len());
    }

    #[test]
    fn test_aggregation_is_idempotent() {
        let cases = vec![
            case(2020, 4, Sex::Male, 2, 150.0),
            case(2021, 9, Sex::Female, 5, 950.0),
            case(2020, 11, Sex::Unknown, 7, 420.0),
        ];

        let spec = year_spec()
            .with_stat("mean_cost", Statistic::Mean, |c: &MorbidityCase| c.cost)
            .with_stat("median_stay", Statistic::Median, |c: &MorbidityCase| {
                c.length_of_stay_days as f64
            });

        let first = aggregate(&cases, &spec);
        let second = aggregate(&cases, &spec);
        assert_eq!(first, second);
    }

    #[test]
    fn test_year_counts_series() {
        let cases = vec![
            case(2021, 5, Sex::Male, 1, 1.0),
            case(2020, 5, Sex::Male, 1, 1.0),
            case(2021, 5, Sex::Male, 1, 1.0),
        ];

        let counts = year_counts(&cases, |c| c.year);
        assert_eq!(counts.len(), 2);
        assert_eq!(counts[&2020], 1);
        assert_eq!(counts[&2021], 2);

        // BTreeMap iterates ascending
        let years: Vec<i32> = counts.keys().copied().collect();
        assert_eq!(years, vec![2020, 2021]);
    }
}
