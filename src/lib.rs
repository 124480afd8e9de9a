//! Classification and aggregation pipeline for pediatric diabetes mellitus
//! records from the DATASUS SIM-DO (cause-of-death) and SIH-SUS
//! (hospitalization) registries.
//!
//! Raw per-year record batches are filtered to children aged 0-14 with
//! diabetes diagnosis codes, aggregated into yearly statistical summaries,
//! and shaped into the export tables a downstream report renderer consumes.

pub mod aggregate;
pub mod classify;
pub mod compare;
pub mod config;
pub mod error;
pub mod export;
pub mod filter;
pub mod models;
pub mod source;
pub mod study;

// Re-export the most common types for easier use
// Core types
pub use config::{ProviderConfig, StudyConfig};
pub use error::{Result, StudyError};

// Record models
pub use models::case::{AgeBand, DiabetesType, MortalityCase, MorbidityCase, Sex};
pub use models::raw::{ColumnPresence, MortalityRaw, MorbidityRaw, YearBatch};

// Pipeline stages
pub use classify::{Classification, ColumnChecks, DatasetKind, RejectReason};
pub use filter::{FilterOutput, FilterReport, filter_morbidity, filter_mortality};
pub use aggregate::{AggregateRow, Dimension, GroupSpec, KeyValue, Statistic, aggregate};
pub use compare::{ComparisonRow, compare_years};
pub use export::Table;

// Sources
pub use source::parquet::ParquetSource;
pub use source::synthetic::SyntheticSource;
pub use source::{Acquisition, AcquisitionReport, RecordSource};

// Orchestration
pub use study::{FullStudy, run_comparison, run_full, run_morbidity, run_mortality};
