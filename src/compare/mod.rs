//! Cross-dataset comparison over the common year range.
//!
//! The two aggregate sets are reduced to `year -> count` series upstream;
//! the comparison pairs them over the intersection of their years. Years
//! present in only one dataset are excluded. An empty intersection is a
//! legitimate outcome meaning "no comparable years", not a fault.

use std::collections::BTreeMap;

use serde::Serialize;

/// Paired yearly counts for the mortality/morbidity comparison
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ComparisonRow {
    /// Year present in both datasets
    pub year: i32,
    /// Mortality case count for the year
    pub mortality_count: u64,
    /// Morbidity case count for the year
    pub morbidity_count: u64,
}

/// Pair two yearly count series over their year intersection, ascending
#[must_use]
pub fn compare_years(
    mortality: &BTreeMap<i32, u64>,
    morbidity: &BTreeMap<i32, u64>,
) -> Vec<ComparisonRow> {
    mortality
        .iter()
        .filter_map(|(&year, &mortality_count)| {
            morbidity.get(&year).map(|&morbidity_count| ComparisonRow {
                year,
                mortality_count,
                morbidity_count,
            })
        })
        .collect()
}
