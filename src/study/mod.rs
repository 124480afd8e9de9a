//! Study orchestration: source to export tables, per dataset.
//!
//! Each dataset runs through its own acquire -> filter -> aggregate ->
//! export pass; the comparison step only reads the two year-count series.
//! Every stage returns typed results so callers decide how to surface
//! counts and timings.

use std::collections::BTreeMap;

use log::info;

use crate::aggregate::pivot::pivot_year_counts;
use crate::aggregate::{Dimension, GroupSpec, KeyValue, Statistic, aggregate, year_counts};
use crate::classify::DatasetKind;
use crate::compare::{ComparisonRow, compare_years};
use crate::config::StudyConfig;
use crate::error::Result;
use crate::export::{self, Table};
use crate::filter::{FilterReport, filter_morbidity, filter_mortality};
use crate::models::case::{DiabetesType, MortalityCase, MorbidityCase, Sex};
use crate::source::{AcquisitionReport, RecordSource, acquire_morbidity, acquire_mortality};

/// High-level indicators for one dataset run
#[derive(Debug, Clone)]
pub struct StudySummary {
    /// Which dataset the summary describes
    pub dataset: DatasetKind,
    /// Total accepted cases
    pub total_cases: usize,
    /// First requested year
    pub start_year: i32,
    /// Last requested year
    pub end_year: i32,
    /// Region the records were restricted to
    pub region: String,
}

impl StudySummary {
    fn entries(&self) -> Vec<(&'static str, String)> {
        let mut entries = vec![
            ("total_cases", self.total_cases.to_string()),
            ("period", format!("{}-{}", self.start_year, self.end_year)),
            ("region", self.region.clone()),
            ("age_range", "0-14".to_string()),
        ];
        if self.dataset == DatasetKind::Morbidity {
            entries.push(("diabetes_types", "type1 (E10), type2 (E11)".to_string()));
            entries.push(("source_system", self.dataset.source_system().to_string()));
        }
        entries
    }
}

/// Output of the mortality pipeline
#[derive(Debug, Clone)]
pub struct MortalityStudy {
    /// Accepted cases, in source order
    pub cases: Vec<MortalityCase>,
    /// Case counts per year, ascending
    pub year_counts: BTreeMap<i32, u64>,
    /// Export tables, in renderer order
    pub tables: Vec<Table>,
    /// Filter stage report
    pub filter_report: FilterReport,
    /// Acquisition report
    pub acquisition: AcquisitionReport,
    /// High-level indicators
    pub summary: StudySummary,
}

/// Output of the morbidity pipeline
#[derive(Debug, Clone)]
pub struct MorbidityStudy {
    /// Accepted cases, in source order
    pub cases: Vec<MorbidityCase>,
    /// Case counts per year, ascending
    pub year_counts: BTreeMap<i32, u64>,
    /// Export tables, in renderer order
    pub tables: Vec<Table>,
    /// Filter stage report
    pub filter_report: FilterReport,
    /// Acquisition report
    pub acquisition: AcquisitionReport,
    /// High-level indicators
    pub summary: StudySummary,
}

/// Output of the comparison step
#[derive(Debug, Clone)]
pub struct ComparisonStudy {
    /// Paired yearly counts over the common year range
    pub rows: Vec<ComparisonRow>,
    /// Export table
    pub table: Table,
}

/// All three outputs of one full run
#[derive(Debug, Clone)]
pub struct FullStudy {
    /// Mortality pipeline output
    pub mortality: MortalityStudy,
    /// Morbidity pipeline output
    pub morbidity: MorbidityStudy,
    /// Comparison over the common year range
    pub comparison: ComparisonStudy,
}

/// Run the mortality pipeline end to end
pub fn run_mortality(config: &StudyConfig, source: &dyn RecordSource) -> Result<MortalityStudy> {
    config.validate()?;

    let acquisition = acquire_mortality(
        source,
        config.mortality_start_year,
        config.mortality_end_year,
        &config.region,
    );
    let output = filter_mortality(&acquisition.batches);
    let cases = output.cases;

    let by_year = aggregate(
        &cases,
        &GroupSpec::by(vec![Dimension::new("year", |c: &MortalityCase| {
            KeyValue::Year(c.year)
        })]),
    );
    let by_sex = aggregate(
        &cases,
        &GroupSpec::by(vec![Dimension::new("sex", |c: &MortalityCase| {
            KeyValue::Sex(c.sex)
        })]),
    );
    let by_band = aggregate(
        &cases,
        &GroupSpec::by(vec![Dimension::new("age_band", |c: &MortalityCase| {
            KeyValue::Band(c.age_band())
        })]),
    );

    let summary = StudySummary {
        dataset: DatasetKind::Mortality,
        total_cases: cases.len(),
        start_year: config.mortality_start_year,
        end_year: config.mortality_end_year,
        region: config.region.clone(),
    };

    let tables = vec![
        export::mortality_cases(&cases),
        export::count_table(export::TABLE_CASES_BY_YEAR, "year", &by_year),
        export::count_table(export::TABLE_CASES_BY_SEX, "sex", &by_sex),
        export::count_table(export::TABLE_CASES_BY_AGE_BAND, "age_band", &by_band),
        export::summary_table(&summary.entries()),
    ];

    info!(
        "mortality: study complete, {} cases across {} years",
        cases.len(),
        by_year.len()
    );

    Ok(MortalityStudy {
        year_counts: year_counts(&cases, |c| c.year),
        cases,
        tables,
        filter_report: output.report,
        acquisition: acquisition.report,
        summary,
    })
}

/// Run the morbidity pipeline end to end
pub fn run_morbidity(config: &StudyConfig, source: &dyn RecordSource) -> Result<MorbidityStudy> {
    config.validate()?;

    let acquisition = acquire_morbidity(
        source,
        config.morbidity_start_year,
        config.morbidity_end_year,
        &config.region,
    );
    let output = filter_morbidity(&acquisition.batches);
    let cases = output.cases;

    let yearly = aggregate(
        &cases,
        &GroupSpec::by(vec![Dimension::new("year", |c: &MorbidityCase| {
            KeyValue::Year(c.year)
        })])
        .with_stat("mean_age", Statistic::Mean, |c: &MorbidityCase| {
            f64::from(c.age_years)
        })
        .with_stat("median_age", Statistic::Median, |c: &MorbidityCase| {
            f64::from(c.age_years)
        })
        .with_stat("mean_length_of_stay", Statistic::Mean, |c: &MorbidityCase| {
            c.length_of_stay_days as f64
        })
        .with_stat(
            "median_length_of_stay",
            Statistic::Median,
            |c: &MorbidityCase| c.length_of_stay_days as f64,
        )
        .with_stat(
            "total_length_of_stay",
            Statistic::Sum,
            |c: &MorbidityCase| c.length_of_stay_days as f64,
        )
        .with_stat("mean_cost", Statistic::Mean, |c: &MorbidityCase| c.cost)
        .with_stat("median_cost", Statistic::Median, |c: &MorbidityCase| c.cost)
        .with_stat("total_cost", Statistic::Sum, |c: &MorbidityCase| c.cost),
    );

    let stay_stats = aggregate(
        &cases,
        &GroupSpec::by(vec![Dimension::new("year", |c: &MorbidityCase| {
            KeyValue::Year(c.year)
        })])
        .with_stat("mean", Statistic::Mean, |c: &MorbidityCase| {
            c.length_of_stay_days as f64
        })
        .with_stat("median", Statistic::Median, |c: &MorbidityCase| {
            c.length_of_stay_days as f64
        })
        .with_stat("std_dev", Statistic::StdDev, |c: &MorbidityCase| {
            c.length_of_stay_days as f64
        }),
    );

    let cost_stats = aggregate(
        &cases,
        &GroupSpec::by(vec![Dimension::new("year", |c: &MorbidityCase| {
            KeyValue::Year(c.year)
        })])
        .with_stat("mean", Statistic::Mean, |c: &MorbidityCase| c.cost)
        .with_stat("median", Statistic::Median, |c: &MorbidityCase| c.cost)
        .with_stat("std_dev", Statistic::StdDev, |c: &MorbidityCase| c.cost),
    );

    let type_pivot = pivot_year_counts(
        &cases,
        |c| c.year,
        |c| c.diabetes_type,
        &[
            (DiabetesType::Type1, "type1"),
            (DiabetesType::Type2, "type2"),
        ],
    );
    let sex_pivot = pivot_year_counts(
        &cases,
        |c| c.year,
        |c| c.sex,
        &[
            (Sex::Male, "male"),
            (Sex::Female, "female"),
            (Sex::Unknown, "unknown"),
        ],
    );

    let summary = StudySummary {
        dataset: DatasetKind::Morbidity,
        total_cases: cases.len(),
        start_year: config.morbidity_start_year,
        end_year: config.morbidity_end_year,
        region: config.region.clone(),
    };

    let tables = vec![
        export::morbidity_cases(&cases),
        export::yearly_aggregate(&yearly),
        export::pivot(export::TABLE_CASES_BY_TYPE_PER_YEAR, &type_pivot),
        export::pivot(export::TABLE_CASES_BY_SEX_PER_YEAR, &sex_pivot),
        export::yearly_stats(export::TABLE_YEARLY_LENGTH_OF_STAY, &stay_stats),
        export::yearly_stats(export::TABLE_YEARLY_COST, &cost_stats),
        export::summary_table(&summary.entries()),
    ];

    info!(
        "morbidity: study complete, {} cases across {} years",
        cases.len(),
        yearly.len()
    );

    Ok(MorbidityStudy {
        year_counts: year_counts(&cases, |c| c.year),
        cases,
        tables,
        filter_report: output.report,
        acquisition: acquisition.report,
        summary,
    })
}

/// Pair the two studies over their common year range
#[must_use]
pub fn run_comparison(mortality: &MortalityStudy, morbidity: &MorbidityStudy) -> ComparisonStudy {
    let rows = compare_years(&mortality.year_counts, &morbidity.year_counts);
    if rows.is_empty() {
        info!("comparison: no overlapping years between the datasets, skipping");
    } else {
        info!("comparison: {} overlapping years", rows.len());
    }

    ComparisonStudy {
        table: export::comparison(&rows),
        rows,
    }
}

/// Run both pipelines and the comparison with one configured source
pub fn run_full(config: &StudyConfig) -> Result<FullStudy> {
    config.validate()?;
    let source = config.build_source();

    let mortality = run_mortality(config, source.as_ref())?;
    let morbidity = run_morbidity(config, source.as_ref())?;
    let comparison = run_comparison(&mortality, &morbidity);

    Ok(FullStudy {
        mortality,
        morbidity,
        comparison,
    })
}
