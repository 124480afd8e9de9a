//! Raw record types as delivered by a record source.
//!
//! One struct per dataset kind, with optional fields: the source schemas
//! vary by year and registry revision, so every value a record may lack is
//! an `Option`. Field names follow the registry layouts (SIM-DO:
//! DTOBITO/IDADE/SEXO/CAUSABAS/MUNRES; SIH-RD: DT_INTER/DT_SAIDA/IDADE/
//! SEXO/DIAG_PRINC/MUNRES/DIAS_PERM/VAL_TOT) expressed as Rust identifiers.

use chrono::NaiveDate;

/// Date layouts seen in registry extracts, tried in order
const SOURCE_DATE_FORMATS: [&str; 2] = ["%d%m%Y", "%Y%m%d"];

/// Parse a registry date string into a `NaiveDate`
///
/// Returns `None` for empty or unparsable values; dates never cause a
/// record to be rejected.
#[must_use]
pub fn parse_source_date(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    SOURCE_DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(trimmed, format).ok())
}

/// A raw cause-of-death record from the SIM-DO registry
#[derive(Debug, Clone, Default)]
pub struct MortalityRaw {
    /// Date of death as recorded at the source (DTOBITO)
    pub death_date: Option<String>,
    /// Age at death in raw days (IDADE)
    pub age_days: Option<i64>,
    /// Sex code as recorded at the source (SEXO)
    pub sex_code: Option<String>,
    /// Underlying cause of death, ICD-10 (CAUSABAS)
    pub cause_code: Option<String>,
    /// Municipality of residence code (MUNRES)
    pub municipality: Option<String>,
    /// Reference year the record was acquired for
    pub year: i32,
}

/// A raw hospitalization record from the SIH-RD registry
#[derive(Debug, Clone, Default)]
pub struct MorbidityRaw {
    /// Admission date as recorded at the source (DT_INTER)
    pub admission_date: Option<String>,
    /// Discharge date as recorded at the source (DT_SAIDA)
    pub discharge_date: Option<String>,
    /// Age in whole years (IDADE)
    pub age_years: Option<i64>,
    /// Sex code as recorded at the source (SEXO)
    pub sex_code: Option<String>,
    /// Principal diagnosis, ICD-10 (DIAG_PRINC)
    pub principal_diagnosis: Option<String>,
    /// Municipality of residence code (MUNRES)
    pub municipality: Option<String>,
    /// Length of stay in days (DIAS_PERM)
    pub stay_days: Option<i64>,
    /// Total cost of the hospitalization (VAL_TOT)
    pub total_cost: Option<f64>,
    /// Reference year the record was acquired for
    pub year: i32,
}

/// Which relevant columns exist in a year's source schema
///
/// Providers report this per batch so the filter can degrade per-column
/// (skip the corresponding stage with a warning) instead of failing when a
/// schema revision drops a column.
#[derive(Debug, Clone, Copy)]
pub struct ColumnPresence {
    /// Age column present
    pub age: bool,
    /// Diagnosis/cause column present
    pub diagnosis: bool,
    /// Sex column present
    pub sex: bool,
    /// Length-of-stay column present (morbidity only)
    pub length_of_stay: bool,
    /// Cost column present (morbidity only)
    pub cost: bool,
}

impl Default for ColumnPresence {
    fn default() -> Self {
        Self {
            age: true,
            diagnosis: true,
            sex: true,
            length_of_stay: true,
            cost: true,
        }
    }
}

/// One year's worth of raw records from a source, with its schema report
#[derive(Debug, Clone)]
pub struct YearBatch<R> {
    /// The year the batch was acquired for
    pub year: i32,
    /// Records in source order
    pub records: Vec<R>,
    /// Which relevant columns the year's schema carried
    pub columns: ColumnPresence,
}

impl<R> YearBatch<R> {
    /// Create a batch with a complete column set
    #[must_use]
    pub fn new(year: i32, records: Vec<R>) -> Self {
        Self {
            year,
            records,
            columns: ColumnPresence::default(),
        }
    }
}
