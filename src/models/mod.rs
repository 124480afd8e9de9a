//! Data models for the study pipeline.
//!
//! Raw records mirror the source registry layouts with optional fields;
//! case records are the validated, typed projections produced by the
//! filter stage and consumed by the aggregator.

pub mod case;
pub mod raw;

pub use case::{AgeBand, DiabetesType, MortalityCase, MorbidityCase, Sex};
pub use raw::{ColumnPresence, MortalityRaw, MorbidityRaw, YearBatch, parse_source_date};
