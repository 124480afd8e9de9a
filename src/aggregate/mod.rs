//! Grouped aggregation over case records.
//!
//! One generic routine, driven by an explicit [`GroupSpec`]: a list of
//! named key extractors plus a list of statistic specs. Groups with no
//! records are never emitted; rows are sorted ascending by key, which is
//! part of the output contract, not an implementation detail.

pub mod pivot;
pub mod stats;

use std::collections::BTreeMap;

use itertools::Itertools;
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::models::case::{AgeBand, DiabetesType, Sex};

/// One grouping key component
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum KeyValue {
    /// Reference year
    Year(i32),
    /// Sex of the individual
    Sex(Sex),
    /// Diabetes type
    Type(DiabetesType),
    /// Clinical age band
    Band(AgeBand),
}

impl KeyValue {
    /// Presentation label for the key component
    #[must_use]
    pub fn label(&self) -> String {
        match self {
            Self::Year(year) => year.to_string(),
            Self::Sex(sex) => sex.label().to_string(),
            Self::Type(diabetes_type) => diabetes_type.label().to_string(),
            Self::Band(band) => band.label().to_string(),
        }
    }
}

/// A grouping key: the extracted component per requested dimension
pub type GroupKey = SmallVec<[KeyValue; 2]>;

/// A named grouping dimension
#[derive(Debug, Clone)]
pub struct Dimension<R> {
    /// Dimension name, used in export column headers
    pub name: &'static str,
    /// Key extractor for a record
    pub extract: fn(&R) -> KeyValue,
}

impl<R> Dimension<R> {
    /// Create a named dimension
    #[must_use]
    pub fn new(name: &'static str, extract: fn(&R) -> KeyValue) -> Self {
        Self { name, extract }
    }
}

/// Which statistic to compute over a numeric field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Statistic {
    /// Arithmetic mean
    Mean,
    /// Median
    Median,
    /// Sample standard deviation
    StdDev,
    /// Sum
    Sum,
}

impl Statistic {
    /// Compute the statistic over a non-empty value slice
    #[must_use]
    pub fn compute(self, values: &[f64]) -> f64 {
        match self {
            Self::Mean => stats::mean(values),
            Self::Median => stats::median(values),
            Self::StdDev => stats::std_dev(values),
            Self::Sum => stats::sum(values),
        }
    }
}

/// A named statistic over a numeric field of the record
#[derive(Debug, Clone)]
pub struct StatSpec<R> {
    /// Output column name
    pub column: &'static str,
    /// Statistic to compute
    pub statistic: Statistic,
    /// Numeric field extractor
    pub extract: fn(&R) -> f64,
}

/// A full aggregation request: dimensions plus statistics
#[derive(Debug, Clone)]
pub struct GroupSpec<R> {
    /// Grouping dimensions, in key order
    pub dimensions: Vec<Dimension<R>>,
    /// Statistics to compute per group, in output order
    pub stats: Vec<StatSpec<R>>,
}

impl<R> GroupSpec<R> {
    /// Create a spec grouping by the given dimensions, with no statistics
    #[must_use]
    pub fn by(dimensions: Vec<Dimension<R>>) -> Self {
        Self {
            dimensions,
            stats: Vec::new(),
        }
    }

    /// Add a statistic column to the spec
    #[must_use]
    pub fn with_stat(
        mut self,
        column: &'static str,
        statistic: Statistic,
        extract: fn(&R) -> f64,
    ) -> Self {
        self.stats.push(StatSpec {
            column,
            statistic,
            extract,
        });
        self
    }
}

/// One output row: a grouping key with its statistics
#[derive(Debug, Clone, PartialEq)]
pub struct AggregateRow {
    /// The grouping key, one component per requested dimension
    pub key: GroupKey,
    /// Number of records in the group, always at least 1
    pub count: u64,
    /// Computed statistics, `(column, value)` in spec order, unrounded
    pub stats: Vec<(&'static str, f64)>,
}

impl AggregateRow {
    /// Value of a named statistic column, if present
    #[must_use]
    pub fn stat(&self, column: &str) -> Option<f64> {
        self.stats
            .iter()
            .find(|(name, _)| *name == column)
            .map(|(_, value)| *value)
    }
}

/// Aggregate records into one row per occupied group, sorted by key
#[must_use]
pub fn aggregate<R>(records: &[R], spec: &GroupSpec<R>) -> Vec<AggregateRow> {
    let mut groups: FxHashMap<GroupKey, Vec<usize>> = FxHashMap::default();
    for (index, record) in records.iter().enumerate() {
        let key: GroupKey = spec
            .dimensions
            .iter()
            .map(|dimension| (dimension.extract)(record))
            .collect();
        groups.entry(key).or_default().push(index);
    }

    groups
        .into_iter()
        .sorted_by(|a, b| a.0.cmp(&b.0))
        .map(|(key, indices)| {
            let stat_values = spec
                .stats
                .iter()
                .map(|stat| {
                    let values: Vec<f64> = indices
                        .iter()
                        .map(|&index| (stat.extract)(&records[index]))
                        .collect();
                    (stat.column, stat.statistic.compute(&values))
                })
                .collect();

            AggregateRow {
                key,
                count: indices.len() as u64,
                stats: stat_values,
            }
        })
        .collect()
}

/// Reduce records to an ascending `year -> count` series
#[must_use]
pub fn year_counts<R>(records: &[R], year: fn(&R) -> i32) -> BTreeMap<i32, u64> {
    let mut counts = BTreeMap::new();
    for record in records {
        *counts.entry(year(record)).or_insert(0) += 1;
    }
    counts
}
