//! The filter stage: raw year batches in, ordered case records out.
//!
//! The filter is stable (case records preserve the relative order of their
//! source records) and never fails on data quality: every anomaly is a
//! counted rejection. Empty input yields empty output.

use std::time::{Duration, Instant};

use log::{info, warn};
use rustc_hash::FxHashMap;

use crate::classify::{
    Classification, ColumnChecks, DatasetKind, RejectReason, classify_morbidity,
    classify_mortality,
};
use crate::models::case::{MortalityCase, MorbidityCase};
use crate::models::raw::{MortalityRaw, MorbidityRaw, YearBatch};

/// Typed result of one filter run, for observability
#[derive(Debug, Clone)]
pub struct FilterReport {
    /// Which dataset was filtered
    pub dataset: DatasetKind,
    /// Number of raw records examined
    pub input: usize,
    /// Number of records accepted as cases
    pub accepted: usize,
    /// Number of records rejected
    pub rejected: usize,
    /// Rejection counts broken down by reason
    pub rejected_by_reason: FxHashMap<RejectReason, usize>,
    /// Wall-clock time spent filtering
    pub elapsed: Duration,
}

impl FilterReport {
    /// Rejection count for a specific reason
    #[must_use]
    pub fn rejected_for(&self, reason: RejectReason) -> usize {
        self.rejected_by_reason.get(&reason).copied().unwrap_or(0)
    }
}

/// Cases plus the report describing how they were obtained
#[derive(Debug, Clone)]
pub struct FilterOutput<C> {
    /// Accepted case records, in source order
    pub cases: Vec<C>,
    /// Stage report
    pub report: FilterReport,
}

/// Filter raw mortality batches into mortality cases
#[must_use]
pub fn filter_mortality(batches: &[YearBatch<MortalityRaw>]) -> FilterOutput<MortalityCase> {
    run_filter(DatasetKind::Mortality, batches, classify_mortality)
}

/// Filter raw morbidity batches into morbidity cases
#[must_use]
pub fn filter_morbidity(batches: &[YearBatch<MorbidityRaw>]) -> FilterOutput<MorbidityCase> {
    run_filter(DatasetKind::Morbidity, batches, classify_morbidity)
}

fn warn_absent_columns<R>(dataset: DatasetKind, batch: &YearBatch<R>) {
    let presence = &batch.columns;
    if !presence.age {
        warn!(
            "{dataset}: age column absent from the {} schema, skipping the age filter stage",
            batch.year
        );
    }
    if !presence.diagnosis {
        warn!(
            "{dataset}: diagnosis column absent from the {} schema, skipping the diagnosis filter stage",
            batch.year
        );
    }
    if !presence.sex {
        warn!(
            "{dataset}: sex column absent from the {} schema, sex will be reported as unknown",
            batch.year
        );
    }
    if dataset == DatasetKind::Morbidity {
        if !presence.length_of_stay {
            warn!(
                "{dataset}: length-of-stay column absent from the {} schema, its records cannot be projected",
                batch.year
            );
        }
        if !presence.cost {
            warn!(
                "{dataset}: cost column absent from the {} schema, its records cannot be projected",
                batch.year
            );
        }
    }
}

fn run_filter<R, C>(
    dataset: DatasetKind,
    batches: &[YearBatch<R>],
    classify: impl Fn(&R, ColumnChecks) -> Classification<C>,
) -> FilterOutput<C> {
    let start = Instant::now();

    let input: usize = batches.iter().map(|batch| batch.records.len()).sum();
    let mut cases = Vec::with_capacity(input);
    let mut rejected_by_reason: FxHashMap<RejectReason, usize> = FxHashMap::default();

    for batch in batches {
        warn_absent_columns(dataset, batch);
        let checks = ColumnChecks::from_presence(&batch.columns);

        for record in &batch.records {
            match classify(record, checks) {
                Classification::Accepted(case) => cases.push(case),
                Classification::Rejected(reason) => {
                    *rejected_by_reason.entry(reason).or_insert(0) += 1;
                }
            }
        }
    }

    let rejected: usize = rejected_by_reason.values().sum();
    let report = FilterReport {
        dataset,
        input,
        accepted: cases.len(),
        rejected,
        rejected_by_reason,
        elapsed: start.elapsed(),
    };

    info!(
        "{dataset}: filtered {} raw records into {} cases ({} rejected) in {:?}",
        report.input, report.accepted, report.rejected, report.elapsed
    );

    FilterOutput { cases, report }
}
