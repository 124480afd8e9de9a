//! Record sources and the per-year acquisition loop.
//!
//! A [`RecordSource`] supplies one year of raw records at a time.
//! Acquisition runs per year, sequentially, with continue-on-error: a
//! failed year is logged and skipped. When no year yields any records the
//! acquisition falls back to the deterministic synthetic source so demo
//! output stays reproducible; the core consumes real and synthetic input
//! indistinguishably.

pub mod parquet;
pub mod synthetic;

use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, info, warn};

use crate::classify::DatasetKind;
use crate::error::Result;
use crate::models::raw::{MortalityRaw, MorbidityRaw, YearBatch};
use crate::source::synthetic::SyntheticSource;

/// Progress bar template for the acquisition loop
const ACQUIRE_TEMPLATE: &str =
    "{spinner} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}";

/// A provider of raw records, one year at a time
pub trait RecordSource {
    /// Short provider name for logs
    fn name(&self) -> &'static str;

    /// Whether this source generates synthetic records
    fn is_synthetic(&self) -> bool {
        false
    }

    /// Fetch one year of cause-of-death records for a region
    fn mortality_year(&self, year: i32, region: &str) -> Result<YearBatch<MortalityRaw>>;

    /// Fetch one year of hospitalization records for a region
    fn morbidity_year(&self, year: i32, region: &str) -> Result<YearBatch<MorbidityRaw>>;
}

/// Summary of one acquisition run, for observability
#[derive(Debug, Clone)]
pub struct AcquisitionReport {
    /// Which dataset was acquired
    pub dataset: DatasetKind,
    /// Years requested, ascending
    pub requested_years: Vec<i32>,
    /// Years whose fetch failed and was skipped
    pub failed_years: Vec<i32>,
    /// Total records acquired across all years
    pub records: usize,
    /// Whether the synthetic fallback replaced the configured source
    pub used_fallback: bool,
}

/// Acquired batches plus the report describing the run
#[derive(Debug, Clone)]
pub struct Acquisition<R> {
    /// Non-empty year batches, in requested-year order
    pub batches: Vec<YearBatch<R>>,
    /// Acquisition report
    pub report: AcquisitionReport,
}

/// Acquire mortality records for a year range, with synthetic fallback
pub fn acquire_mortality(
    source: &dyn RecordSource,
    start_year: i32,
    end_year: i32,
    region: &str,
) -> Acquisition<MortalityRaw> {
    let mut acquisition = acquire_years(DatasetKind::Mortality, source.name(), start_year, end_year, |year| {
        source.mortality_year(year, region)
    });

    if acquisition.report.records == 0 && !source.is_synthetic() {
        warn!(
            "mortality: no records acquired from {} for {start_year}-{end_year}, falling back to the synthetic source",
            source.name()
        );
        let fallback = SyntheticSource::new();
        acquisition = acquire_years(DatasetKind::Mortality, fallback.name(), start_year, end_year, |year| {
            fallback.mortality_year(year, region)
        });
        acquisition.report.used_fallback = true;
    }

    acquisition
}

/// Acquire morbidity records for a year range, with synthetic fallback
pub fn acquire_morbidity(
    source: &dyn RecordSource,
    start_year: i32,
    end_year: i32,
    region: &str,
) -> Acquisition<MorbidityRaw> {
    let mut acquisition = acquire_years(DatasetKind::Morbidity, source.name(), start_year, end_year, |year| {
        source.morbidity_year(year, region)
    });

    if acquisition.report.records == 0 && !source.is_synthetic() {
        warn!(
            "morbidity: no records acquired from {} for {start_year}-{end_year}, falling back to the synthetic source",
            source.name()
        );
        let fallback = SyntheticSource::new();
        acquisition = acquire_years(DatasetKind::Morbidity, fallback.name(), start_year, end_year, |year| {
            fallback.morbidity_year(year, region)
        });
        acquisition.report.used_fallback = true;
    }

    acquisition
}

fn acquire_years<R>(
    dataset: DatasetKind,
    source_name: &str,
    start_year: i32,
    end_year: i32,
    mut fetch: impl FnMut(i32) -> Result<YearBatch<R>>,
) -> Acquisition<R> {
    let requested_years: Vec<i32> = (start_year..=end_year).collect();
    info!(
        "{dataset}: acquiring {} years from {source_name} ({start_year}-{end_year})",
        requested_years.len()
    );

    let progress = ProgressBar::new(requested_years.len() as u64);
    progress.set_style(
        ProgressStyle::default_bar()
            .template(ACQUIRE_TEMPLATE)
            .unwrap()
            .progress_chars("#>-"),
    );

    let mut batches = Vec::with_capacity(requested_years.len());
    let mut failed_years = Vec::new();
    let mut records = 0;

    for &year in &requested_years {
        progress.set_message(format!("{dataset} {year}"));
        match fetch(year) {
            Ok(batch) => {
                if batch.records.is_empty() {
                    debug!("{dataset}: no records for {year}");
                } else {
                    records += batch.records.len();
                    batches.push(batch);
                }
            }
            Err(error) => {
                warn!("{dataset}: acquisition failed for {year}: {error}, skipping year");
                failed_years.push(year);
            }
        }
        progress.inc(1);
    }
    progress.finish_and_clear();

    info!(
        "{dataset}: acquired {records} records across {} years ({} failed)",
        batches.len(),
        failed_years.len()
    );

    Acquisition {
        batches,
        report: AcquisitionReport {
            dataset,
            requested_years,
            failed_years,
            records,
            used_fallback: false,
        },
    }
}
