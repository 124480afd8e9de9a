//! Study configuration.
//!
//! Provider selection is an explicit configuration choice resolved once at
//! startup, not a runtime feature-detection branch inside the pipeline.

use std::fmt;
use std::path::PathBuf;

use crate::error::{Result, StudyError};
use crate::source::RecordSource;
use crate::source::parquet::ParquetSource;
use crate::source::synthetic::{DEFAULT_SEED, SyntheticSource};

/// Which record provider to use
#[derive(Debug, Clone)]
pub enum ProviderConfig {
    /// Deterministic seeded generator
    Synthetic {
        /// Generator seed
        seed: u64,
    },
    /// Local per-year parquet extracts
    Parquet {
        /// Directory holding the extract files
        root: PathBuf,
    },
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self::Synthetic { seed: DEFAULT_SEED }
    }
}

impl fmt::Display for ProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Synthetic { seed } => write!(f, "synthetic (seed {seed})"),
            Self::Parquet { root } => write!(f, "parquet ({})", root.display()),
        }
    }
}

/// Configuration for a full study run
#[derive(Debug, Clone)]
pub struct StudyConfig {
    /// First mortality year, inclusive
    pub mortality_start_year: i32,
    /// Last mortality year, inclusive
    pub mortality_end_year: i32,
    /// First morbidity year, inclusive
    pub morbidity_start_year: i32,
    /// Last morbidity year, inclusive
    pub morbidity_end_year: i32,
    /// Two-letter region code the records are restricted to
    pub region: String,
    /// Record provider to resolve at startup
    pub provider: ProviderConfig,
}

impl Default for StudyConfig {
    fn default() -> Self {
        Self {
            mortality_start_year: 2010,
            mortality_end_year: 2023,
            morbidity_start_year: 2020,
            morbidity_end_year: 2025,
            region: "AM".to_string(),
            provider: ProviderConfig::default(),
        }
    }
}

impl fmt::Display for StudyConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Study Configuration:")?;
        writeln!(
            f,
            "  Mortality Years: {}-{}",
            self.mortality_start_year, self.mortality_end_year
        )?;
        writeln!(
            f,
            "  Morbidity Years: {}-{}",
            self.morbidity_start_year, self.morbidity_end_year
        )?;
        writeln!(f, "  Region: {}", self.region)?;
        writeln!(f, "  Provider: {}", self.provider)?;
        Ok(())
    }
}

impl StudyConfig {
    /// Check the configuration for contract violations
    pub fn validate(&self) -> Result<()> {
        if self.mortality_start_year > self.mortality_end_year {
            return Err(StudyError::Config(format!(
                "mortality year range is inverted: {}-{}",
                self.mortality_start_year, self.mortality_end_year
            )));
        }
        if self.morbidity_start_year > self.morbidity_end_year {
            return Err(StudyError::Config(format!(
                "morbidity year range is inverted: {}-{}",
                self.morbidity_start_year, self.morbidity_end_year
            )));
        }
        if self.region.trim().is_empty() {
            return Err(StudyError::Config("region must not be empty".to_string()));
        }
        Ok(())
    }

    /// Resolve the configured provider into a record source
    #[must_use]
    pub fn build_source(&self) -> Box<dyn RecordSource> {
        match &self.provider {
            ProviderConfig::Synthetic { seed } => Box::new(SyntheticSource::with_seed(*seed)),
            ProviderConfig::Parquet { root } => Box::new(ParquetSource::new(root.clone())),
        }
    }
}
