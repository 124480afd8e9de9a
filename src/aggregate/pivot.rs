//! Zero-filled pivoted views: years as rows, a categorical dimension as
//! columns.
//!
//! Every row carries a cell for every declared category, so a year with no
//! cases in some category reports 0 rather than an absent value.

use std::collections::BTreeMap;

/// A pivoted count table keyed by year
#[derive(Debug, Clone)]
pub struct PivotTable {
    /// Column labels, in the declared category order
    pub columns: Vec<&'static str>,
    /// Rows in ascending year order
    pub rows: Vec<PivotRow>,
}

/// One pivot row: a year and a zero-filled count per category
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PivotRow {
    /// The year
    pub year: i32,
    /// Counts aligned with the table's columns
    pub counts: Vec<u64>,
}

impl PivotTable {
    /// The counts row for a given year, if the year is present
    #[must_use]
    pub fn row(&self, year: i32) -> Option<&PivotRow> {
        self.rows.iter().find(|row| row.year == year)
    }
}

/// Pivot record counts by year against a declared category set
///
/// `categories` is the full value set of the dimension with its column
/// labels; combinations absent from the data are zero-filled. Rows exist
/// for every year with at least one record.
#[must_use]
pub fn pivot_year_counts<R, C>(
    records: &[R],
    year: fn(&R) -> i32,
    category: fn(&R) -> C,
    categories: &[(C, &'static str)],
) -> PivotTable
where
    C: Copy + PartialEq,
{
    let mut by_year: BTreeMap<i32, Vec<u64>> = BTreeMap::new();

    for record in records {
        let counts = by_year
            .entry(year(record))
            .or_insert_with(|| vec![0; categories.len()]);

        let value = category(record);
        if let Some(position) = categories.iter().position(|(c, _)| *c == value) {
            counts[position] += 1;
        }
    }

    PivotTable {
        columns: categories.iter().map(|(_, label)| *label).collect(),
        rows: by_year
            .into_iter()
            .map(|(year, counts)| PivotRow { year, counts })
            .collect(),
    }
}
