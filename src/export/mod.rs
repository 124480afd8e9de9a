//! Export table shapes consumed by the external report writer.
//!
//! Table names and column order are a compatibility surface: the report
//! renderer consumes them as-is, so they must not change. The core's
//! responsibility ends at producing these in-memory tables; writing files
//! is the collaborator's job. Derived statistics are rounded to two
//! decimals here, at presentation time.

use serde::Serialize;

use crate::aggregate::pivot::PivotTable;
use crate::aggregate::stats::round2;
use crate::aggregate::{AggregateRow, KeyValue};
use crate::compare::ComparisonRow;
use crate::models::case::{MortalityCase, MorbidityCase};

/// Row-per-case table
pub const TABLE_CASES: &str = "cases";
/// Mortality: case counts per year
pub const TABLE_CASES_BY_YEAR: &str = "cases_by_year";
/// Mortality: case counts per sex
pub const TABLE_CASES_BY_SEX: &str = "cases_by_sex";
/// Mortality: case counts per clinical age band
pub const TABLE_CASES_BY_AGE_BAND: &str = "cases_by_age_band";
/// Morbidity: the full yearly aggregate
pub const TABLE_YEARLY_AGGREGATE: &str = "yearly_aggregate";
/// Morbidity: diabetes-type counts pivoted by year
pub const TABLE_CASES_BY_TYPE_PER_YEAR: &str = "cases_by_type_per_year";
/// Morbidity: sex counts pivoted by year
pub const TABLE_CASES_BY_SEX_PER_YEAR: &str = "cases_by_sex_per_year";
/// Morbidity: yearly length-of-stay statistics
pub const TABLE_YEARLY_LENGTH_OF_STAY: &str = "yearly_length_of_stay";
/// Morbidity: yearly cost statistics
pub const TABLE_YEARLY_COST: &str = "yearly_cost";
/// Cross-dataset comparison over the common year range
pub const TABLE_COMPARISON: &str = "mortality_vs_morbidity";
/// Per-dataset indicator summary
pub const TABLE_SUMMARY: &str = "summary";

/// Column order of the mortality row-per-case table
pub const MORTALITY_CASE_COLUMNS: [&str; 6] =
    ["date", "age_years", "sex", "diagnosis_code", "region", "year"];

/// Column order of the morbidity row-per-case table
pub const MORBIDITY_CASE_COLUMNS: [&str; 9] = [
    "date",
    "age_years",
    "sex",
    "diagnosis_code",
    "region",
    "year",
    "diabetes_type",
    "length_of_stay_days",
    "cost",
];

/// Column order of the morbidity yearly aggregate table
pub const YEARLY_AGGREGATE_COLUMNS: [&str; 10] = [
    "year",
    "cases",
    "mean_age",
    "median_age",
    "mean_length_of_stay",
    "median_length_of_stay",
    "total_length_of_stay",
    "mean_cost",
    "median_cost",
    "total_cost",
];

/// Column order of the yearly statistic tables (length-of-stay, cost)
pub const YEARLY_STAT_COLUMNS: [&str; 4] = ["year", "mean", "median", "std_dev"];

/// Column order of the comparison table
pub const COMPARISON_COLUMNS: [&str; 3] = ["year", "mortality_count", "morbidity_count"];

/// A single table cell
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Cell {
    /// Integer value
    Int(i64),
    /// Floating-point value, already rounded for presentation
    Float(f64),
    /// Text value; empty string for an absent optional field
    Text(String),
}

impl From<i64> for Cell {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<u64> for Cell {
    fn from(value: u64) -> Self {
        Self::Int(value as i64)
    }
}

impl From<i32> for Cell {
    fn from(value: i32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for Cell {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// A named, column-ordered output table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Table {
    /// Table identifier
    pub name: &'static str,
    /// Column names, in output order
    pub columns: Vec<&'static str>,
    /// Data rows, each aligned with `columns`
    pub rows: Vec<Vec<Cell>>,
}

impl Table {
    /// Create an empty table with the given shape
    #[must_use]
    pub fn new(name: &'static str, columns: &[&'static str]) -> Self {
        Self {
            name,
            columns: columns.to_vec(),
            rows: Vec::new(),
        }
    }

    /// Append a row; the cell count must match the column count
    pub fn push_row(&mut self, row: Vec<Cell>) {
        debug_assert_eq!(row.len(), self.columns.len());
        self.rows.push(row);
    }

    /// Whether the table has no data rows
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

fn key_cell(value: &KeyValue) -> Cell {
    match value {
        KeyValue::Year(year) => Cell::from(*year),
        other => Cell::Text(other.label()),
    }
}

fn year_of(row: &AggregateRow) -> Cell {
    debug_assert!(matches!(row.key.first(), Some(KeyValue::Year(_))));
    row.key.first().map_or(Cell::Int(0), key_cell)
}

fn date_cell(date: Option<chrono::NaiveDate>) -> Cell {
    Cell::Text(date.map(|d| d.format("%Y-%m-%d").to_string()).unwrap_or_default())
}

fn optional_text(value: Option<&str>) -> Cell {
    Cell::Text(value.unwrap_or_default().to_string())
}

/// Build the mortality row-per-case table
#[must_use]
pub fn mortality_cases(cases: &[MortalityCase]) -> Table {
    let mut table = Table::new(TABLE_CASES, &MORTALITY_CASE_COLUMNS);
    for case in cases {
        table.push_row(vec![
            date_cell(case.date),
            Cell::Int(i64::from(case.age_years)),
            Cell::from(case.sex.label()),
            Cell::from(case.diagnosis_code.as_str()),
            optional_text(case.municipality.as_deref()),
            Cell::from(case.year),
        ]);
    }
    table
}

/// Build the morbidity row-per-case table
#[must_use]
pub fn morbidity_cases(cases: &[MorbidityCase]) -> Table {
    let mut table = Table::new(TABLE_CASES, &MORBIDITY_CASE_COLUMNS);
    for case in cases {
        table.push_row(vec![
            date_cell(case.admission_date),
            Cell::Int(i64::from(case.age_years)),
            Cell::from(case.sex.label()),
            Cell::from(case.diagnosis_code.as_str()),
            optional_text(case.municipality.as_deref()),
            Cell::from(case.year),
            Cell::from(case.diabetes_type.label()),
            Cell::Int(case.length_of_stay_days),
            Cell::Float(round2(case.cost)),
        ]);
    }
    table
}

/// Build a two-column `key, cases` count table from single-dimension rows
#[must_use]
pub fn count_table(
    name: &'static str,
    key_column: &'static str,
    rows: &[AggregateRow],
) -> Table {
    let mut table = Table::new(name, &[key_column, "cases"]);
    for row in rows {
        let key = row.key.first().map_or(Cell::Int(0), key_cell);
        table.push_row(vec![key, Cell::from(row.count)]);
    }
    table
}

/// Build the morbidity yearly aggregate table
///
/// Expects rows grouped by year carrying the eight statistic columns of
/// [`YEARLY_AGGREGATE_COLUMNS`] in order.
#[must_use]
pub fn yearly_aggregate(rows: &[AggregateRow]) -> Table {
    let mut table = Table::new(TABLE_YEARLY_AGGREGATE, &YEARLY_AGGREGATE_COLUMNS);
    for row in rows {
        debug_assert_eq!(row.stats.len(), YEARLY_AGGREGATE_COLUMNS.len() - 2);
        let mut cells = vec![year_of(row), Cell::from(row.count)];
        cells.extend(row.stats.iter().map(|(_, value)| Cell::Float(round2(*value))));
        table.push_row(cells);
    }
    table
}

/// Build a `year, mean, median, std_dev` statistics table
#[must_use]
pub fn yearly_stats(name: &'static str, rows: &[AggregateRow]) -> Table {
    let mut table = Table::new(name, &YEARLY_STAT_COLUMNS);
    for row in rows {
        debug_assert_eq!(row.stats.len(), YEARLY_STAT_COLUMNS.len() - 1);
        let mut cells = vec![year_of(row)];
        cells.extend(row.stats.iter().map(|(_, value)| Cell::Float(round2(*value))));
        table.push_row(cells);
    }
    table
}

/// Build a pivoted count table with `year` as the leading column
#[must_use]
pub fn pivot(name: &'static str, pivot: &PivotTable) -> Table {
    let mut columns = vec!["year"];
    columns.extend(pivot.columns.iter().copied());

    let mut table = Table::new(name, &columns);
    for row in &pivot.rows {
        let mut cells = vec![Cell::from(row.year)];
        cells.extend(row.counts.iter().map(|&count| Cell::from(count)));
        table.push_row(cells);
    }
    table
}

/// Build the mortality-vs-morbidity comparison table
#[must_use]
pub fn comparison(rows: &[ComparisonRow]) -> Table {
    let mut table = Table::new(TABLE_COMPARISON, &COMPARISON_COLUMNS);
    for row in rows {
        table.push_row(vec![
            Cell::from(row.year),
            Cell::from(row.mortality_count),
            Cell::from(row.morbidity_count),
        ]);
    }
    table
}

/// Build an `indicator, value` summary table
#[must_use]
pub fn summary_table(entries: &[(&'static str, String)]) -> Table {
    let mut table = Table::new(TABLE_SUMMARY, &["indicator", "value"]);
    for (indicator, value) in entries {
        table.push_row(vec![Cell::from(*indicator), Cell::from(value.clone())]);
    }
    table
}
